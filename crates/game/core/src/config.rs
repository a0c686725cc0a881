/// Game configuration constants and tunable parameters.
///
/// Per-component tunables (throw impulse, flight duration, ...) live next to
/// their components; this struct holds the handful of global knobs plus the
/// compile-time sizing constants used as type parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Radius (world units) of the fallback distance scan used for pickup
    /// when no interaction region overlap produced a candidate.
    pub pickup_range: f32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Directly-selectable quickbar slots (the first one is the hand slot).
    pub const QUICKBAR_SLOTS: usize = 5;
    /// General backpack slots.
    pub const BACKPACK_SLOTS: usize = 24;
    /// Transitions remembered by a state machine for gating logic.
    pub const MAX_TRANSITION_HISTORY: usize = 16;
    /// Chained transitions processed per drain before the machine bails out.
    /// Two states requesting each other from Enter/Exit would otherwise spin.
    pub const MAX_TRANSITION_CHAIN: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_PICKUP_RANGE: f32 = 150.0;

    pub fn new() -> Self {
        Self {
            pickup_range: Self::DEFAULT_PICKUP_RANGE,
        }
    }

    pub fn with_pickup_range(pickup_range: f32) -> Self {
        Self { pickup_range }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
