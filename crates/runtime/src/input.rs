//! Scripted input source for headless sessions.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use skirmish_core::{InputAction, InputIntent};

#[derive(Debug, Default)]
struct InputState {
    pressed: HashSet<InputAction>,
    held: HashSet<InputAction>,
}

/// Input intent driven by test/tool code instead of devices.
///
/// Clones share the same underlying state: keep one handle for scripting
/// and hand another to the player context.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    state: Rc<RefCell<InputState>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a press for the next tick only.
    pub fn press(&self, action: InputAction) {
        self.state.borrow_mut().pressed.insert(action);
    }

    /// Starts holding an action until released.
    pub fn hold(&self, action: InputAction) {
        self.state.borrow_mut().held.insert(action);
    }

    pub fn release(&self, action: InputAction) {
        self.state.borrow_mut().held.remove(&action);
    }

    pub fn release_all(&self) {
        let mut state = self.state.borrow_mut();
        state.held.clear();
        state.pressed.clear();
    }

    /// Clears edge-triggered presses; the session calls this after each
    /// tick so `just_pressed` behaves like a real input backend.
    pub fn end_tick(&self) {
        self.state.borrow_mut().pressed.clear();
    }
}

impl InputIntent for ScriptedInput {
    fn just_pressed(&self, action: InputAction) -> bool {
        self.state.borrow().pressed.contains(&action)
    }

    fn held(&self, action: InputAction) -> bool {
        let state = self.state.borrow();
        state.held.contains(&action) || state.pressed.contains(&action)
    }
}
