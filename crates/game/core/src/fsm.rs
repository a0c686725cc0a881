//! Cooperative state machine driving per-actor behavior.
//!
//! One machine per actor, one state active at a time. Transitions are
//! strict: `exit` on the old state runs to completion, the current pointer
//! swaps, then `enter` on the new state runs. States never call back into
//! the machine; they request transitions through the [`TransitionQueue`]
//! handed to every hook, and requests made during an in-flight transition
//! are processed strictly FIFO after it completes - a transition can never
//! interrupt another one re-entrantly.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::actor::ActorId;
use crate::config::GameConfig;
use crate::env::GameWorld;
use crate::error::{ErrorSeverity, GameError};
use crate::events::GameEvent;

/// Errors surfaced by state machine operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MachineError {
    /// `change_state` named a state the machine does not own.
    #[error("unknown state '{name}'")]
    UnknownState { name: &'static str },
}

impl GameError for MachineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownState { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownState { .. } => "FSM_UNKNOWN_STATE",
        }
    }
}

/// Behavior of one state, polymorphic over the actor context `C`.
///
/// Implementations are constructed once at machine setup and reused across
/// activations; anything that must reset per activation belongs in `enter`.
pub trait State<C> {
    /// Name this state is addressed by.
    fn name(&self) -> &'static str;

    fn enter(&mut self, _ctx: &mut C, _world: &mut dyn GameWorld, _queue: &mut TransitionQueue) {}

    fn exit(&mut self, _ctx: &mut C, _world: &mut dyn GameWorld, _queue: &mut TransitionQueue) {}

    fn physics_update(
        &mut self,
        _ctx: &mut C,
        _world: &mut dyn GameWorld,
        _delta: f32,
        _queue: &mut TransitionQueue,
    ) {
    }
}

/// FIFO of requested transitions.
///
/// States push here from any hook; the machine drains between hook calls.
#[derive(Debug, Default)]
pub struct TransitionQueue {
    requests: VecDeque<&'static str>,
}

impl TransitionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a transition to the named state.
    pub fn change_state(&mut self, name: &'static str) {
        self.requests.push_back(name);
    }

    fn pop(&mut self) -> Option<&'static str> {
        self.requests.pop_front()
    }

    fn append(&mut self, other: &mut TransitionQueue) {
        self.requests.append(&mut other.requests);
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// State machine owning a set of named states and the current pointer.
pub struct StateMachine<C> {
    owner: ActorId,
    states: Vec<Box<dyn State<C>>>,
    current: Option<usize>,
    queue: TransitionQueue,
    history: ArrayVec<&'static str, { GameConfig::MAX_TRANSITION_HISTORY }>,
}

impl<C> StateMachine<C> {
    pub fn new(owner: ActorId) -> Self {
        Self {
            owner,
            states: Vec::new(),
            current: None,
            queue: TransitionQueue::new(),
            history: ArrayVec::new(),
        }
    }

    /// Registers a state. A duplicate name is logged and the earlier
    /// registration wins.
    pub fn add_state(&mut self, state: Box<dyn State<C>>) -> &mut Self {
        if self.find(state.name()).is_some() {
            tracing::warn!(
                actor = self.owner.0,
                state = state.name(),
                "duplicate state registration ignored"
            );
            return self;
        }
        self.states.push(state);
        self
    }

    /// Pure query: does the machine own a state with this name?
    pub fn has_state(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Name of the active state, `None` before the machine is started.
    pub fn current_state(&self) -> Option<&'static str> {
        self.current.map(|i| self.states[i].name())
    }

    /// Most recent completed transitions, oldest first.
    pub fn history(&self) -> &[&'static str] {
        &self.history
    }

    /// The state active before the current one.
    pub fn previous_state(&self) -> Option<&'static str> {
        let len = self.history.len();
        (len >= 2).then(|| self.history[len - 2])
    }

    /// Requests a transition and processes it (plus any follow-ups the
    /// involved states request). Unknown names are validated up front so
    /// direct callers get an error; the machine state is untouched.
    pub fn try_change_state(
        &mut self,
        ctx: &mut C,
        world: &mut dyn GameWorld,
        name: &'static str,
    ) -> Result<(), MachineError> {
        if self.find(name).is_none() {
            return Err(MachineError::UnknownState { name });
        }
        self.queue.change_state(name);
        self.drain(ctx, world);
        Ok(())
    }

    /// Like [`try_change_state`](Self::try_change_state) but logs the
    /// unknown-name case and leaves the current state unchanged.
    pub fn change_state(&mut self, ctx: &mut C, world: &mut dyn GameWorld, name: &'static str) {
        if let Err(err) = self.try_change_state(ctx, world, name) {
            tracing::warn!(actor = self.owner.0, %err, "state change refused");
        }
    }

    /// Forwards the tick to the active state, then processes any requested
    /// transitions.
    pub fn physics_update(&mut self, ctx: &mut C, world: &mut dyn GameWorld, delta: f32) {
        if let Some(index) = self.current {
            let mut local = TransitionQueue::new();
            self.states[index].physics_update(ctx, world, delta, &mut local);
            self.queue.append(&mut local);
        }
        self.drain(ctx, world);
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.states.iter().position(|s| s.name() == name)
    }

    /// Processes queued transition requests in FIFO order.
    ///
    /// Each request runs exit → pointer swap → enter to completion before
    /// the next request is looked at; requests pushed by those hooks join
    /// the back of the queue. A chain cap guards against two states
    /// requesting each other forever from enter/exit.
    fn drain(&mut self, ctx: &mut C, world: &mut dyn GameWorld) {
        let mut processed = 0;
        while let Some(name) = self.queue.pop() {
            if processed >= GameConfig::MAX_TRANSITION_CHAIN {
                tracing::error!(
                    actor = self.owner.0,
                    dropped = name,
                    "transition chain exceeded cap; dropping remaining requests"
                );
                while self.queue.pop().is_some() {}
                break;
            }
            processed += 1;

            let Some(target) = self.find(name) else {
                tracing::warn!(actor = self.owner.0, state = name, "unknown state requested");
                continue;
            };

            let from = self.current.map(|i| self.states[i].name());
            let mut local = TransitionQueue::new();
            if let Some(index) = self.current {
                self.states[index].exit(ctx, world, &mut local);
            }
            self.current = Some(target);
            self.states[target].enter(ctx, world, &mut local);
            self.queue.append(&mut local);

            if self.history.is_full() {
                self.history.remove(0);
            }
            self.history.push(name);

            world.events().push(GameEvent::StateChanged {
                actor: self.owner,
                from,
                to: name,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::TestWorld;

    #[derive(Default)]
    struct Trace {
        log: Vec<String>,
    }

    /// Minimal state that records lifecycle calls and optionally requests a
    /// follow-up transition from enter or exit.
    struct Probe {
        name: &'static str,
        on_enter: Option<&'static str>,
        on_exit: Option<&'static str>,
    }

    impl Probe {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                on_enter: None,
                on_exit: None,
            }
        }
    }

    impl State<Trace> for Probe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn enter(&mut self, ctx: &mut Trace, _world: &mut dyn GameWorld, queue: &mut TransitionQueue) {
            ctx.log.push(format!("enter:{}", self.name));
            if let Some(next) = self.on_enter.take() {
                queue.change_state(next);
            }
        }

        fn exit(&mut self, ctx: &mut Trace, _world: &mut dyn GameWorld, queue: &mut TransitionQueue) {
            ctx.log.push(format!("exit:{}", self.name));
            if let Some(next) = self.on_exit.take() {
                queue.change_state(next);
            }
        }
    }

    fn machine_with(states: Vec<Probe>) -> StateMachine<Trace> {
        let mut machine = StateMachine::new(ActorId(7));
        for s in states {
            machine.add_state(Box::new(s));
        }
        machine
    }

    #[test]
    fn transition_order_is_exit_then_enter() {
        let mut machine = machine_with(vec![Probe::new("a"), Probe::new("b")]);
        let mut ctx = Trace::default();
        let mut world = TestWorld::new();
        machine.change_state(&mut ctx, &mut world, "a");
        machine.change_state(&mut ctx, &mut world, "b");
        assert_eq!(ctx.log, vec!["enter:a", "exit:a", "enter:b"]);
        assert_eq!(machine.current_state(), Some("b"));
    }

    #[test]
    fn unknown_state_is_a_noop() {
        let mut machine = machine_with(vec![Probe::new("a")]);
        let mut ctx = Trace::default();
        let mut world = TestWorld::new();
        machine.change_state(&mut ctx, &mut world, "a");
        assert!(matches!(
            machine.try_change_state(&mut ctx, &mut world, "nope"),
            Err(MachineError::UnknownState { .. })
        ));
        assert_eq!(machine.current_state(), Some("a"));
    }

    #[test]
    fn exit_requests_run_after_the_pending_enter() {
        // a.exit requests c while transitioning a -> b; c must be entered
        // only after b's enter completed (strict FIFO, no re-entrancy).
        let mut a = Probe::new("a");
        a.on_exit = Some("c");
        let mut machine = machine_with(vec![a, Probe::new("b"), Probe::new("c")]);
        let mut ctx = Trace::default();
        let mut world = TestWorld::new();
        machine.change_state(&mut ctx, &mut world, "a");
        machine.change_state(&mut ctx, &mut world, "b");
        assert_eq!(
            ctx.log,
            vec!["enter:a", "exit:a", "enter:b", "exit:b", "enter:c"]
        );
        assert_eq!(machine.current_state(), Some("c"));
    }

    #[test]
    fn runaway_chains_are_capped() {
        // a and b request each other from enter forever
        let mut machine = StateMachine::new(ActorId(1));
        struct PingPong {
            name: &'static str,
            next: &'static str,
        }
        impl State<Trace> for PingPong {
            fn name(&self) -> &'static str {
                self.name
            }
            fn enter(
                &mut self,
                _ctx: &mut Trace,
                _world: &mut dyn GameWorld,
                queue: &mut TransitionQueue,
            ) {
                queue.change_state(self.next);
            }
        }
        machine.add_state(Box::new(PingPong { name: "a", next: "b" }));
        machine.add_state(Box::new(PingPong { name: "b", next: "a" }));
        let mut ctx = Trace::default();
        let mut world = TestWorld::new();
        // terminates and one state ends up active
        machine.change_state(&mut ctx, &mut world, "a");
        assert!(machine.current_state().is_some());
    }

    #[test]
    fn history_tracks_transitions() {
        let mut machine = machine_with(vec![Probe::new("a"), Probe::new("b")]);
        let mut ctx = Trace::default();
        let mut world = TestWorld::new();
        machine.change_state(&mut ctx, &mut world, "a");
        machine.change_state(&mut ctx, &mut world, "b");
        assert_eq!(machine.history(), &["a", "b"]);
        assert_eq!(machine.previous_state(), Some("a"));
    }
}
