//! Common error infrastructure for skirmish-core.
//!
//! Domain-specific errors (e.g. [`MachineError`](crate::fsm::MachineError),
//! [`SpawnError`](crate::world::SpawnError)) are defined in their respective
//! modules alongside the operations they guard. This module provides the
//! shared severity classification used to decide how an error is surfaced:
//! expected refusals stay silent, missing configuration is always logged,
//! and nothing in this crate is allowed to unwind through gameplay logic.

/// Severity level of an error, used for categorization and logging policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Expected refusal - the operation may succeed later or with different
    /// input, and nothing is wrong with the game's configuration.
    ///
    /// Examples: attack on cooldown, empty hand slot, inventory full.
    /// Policy: silent, surfaced to the caller as a boolean/optional only.
    Recoverable,

    /// Invalid input - the request itself was malformed and retrying without
    /// changes will not help.
    ///
    /// Examples: unknown state name, unknown attack name.
    /// Policy: logged once with context, operation is a no-op.
    Validation,

    /// Internal inconsistency - something the setup code promised is missing
    /// or out of sync.
    ///
    /// Examples: item without a world scene mapping, spawn failure after a
    /// committed extraction. Policy: logged with enough context to diagnose
    /// without reproducing (actor, item id, quantities).
    Internal,

    /// Unrecoverable - the acting component cannot continue.
    ///
    /// Nothing in this crate currently escalates this far; the variant exists
    /// so hosts can classify their own wrapper errors consistently.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is an expected refusal.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a configuration or logic bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all skirmish-core errors.
///
/// Error enums derive `thiserror::Error` for Display and implement this
/// trait so hosts can apply one logging policy across subsystems.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
