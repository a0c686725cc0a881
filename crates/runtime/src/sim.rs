//! Deterministic simulation collaborators: bodies, scenes, animation sinks.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use glam::Vec2;

use skirmish_core::{AnimationSink, ItemId, PhysicsBody, SceneHandle, SceneResolver};

/// Downward gravity acceleration of the simulation, world units/s².
pub const GRAVITY: f32 = 980.0;

#[derive(Debug)]
struct BodyState {
    position: Vec2,
    velocity: Vec2,
    frozen: bool,
    gravity_scale: f32,
}

/// Kinematic physics body integrated by [`SimSpace`].
///
/// Clones share the same state, mirroring an engine where the entity holds
/// a handle to a body the physics world owns.
#[derive(Clone, Debug)]
pub struct SimBody {
    state: Rc<RefCell<BodyState>>,
}

impl SimBody {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(BodyState {
                position: Vec2::ZERO,
                velocity: Vec2::ZERO,
                frozen: true,
                gravity_scale: 1.0,
            })),
        }
    }

    fn downgrade(&self) -> Weak<RefCell<BodyState>> {
        Rc::downgrade(&self.state)
    }
}

impl Default for SimBody {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsBody for SimBody {
    fn position(&self) -> Vec2 {
        self.state.borrow().position
    }

    fn set_position(&mut self, position: Vec2) {
        self.state.borrow_mut().position = position;
    }

    fn velocity(&self) -> Vec2 {
        self.state.borrow().velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.state.borrow_mut().velocity = velocity;
    }

    fn is_frozen(&self) -> bool {
        self.state.borrow().frozen
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.state.borrow_mut().frozen = frozen;
    }

    fn gravity_scale(&self) -> f32 {
        self.state.borrow().gravity_scale
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.state.borrow_mut().gravity_scale = scale;
    }
}

/// Steps every live body it has handed out.
#[derive(Default)]
pub struct SimSpace {
    bodies: Vec<Weak<RefCell<BodyState>>>,
}

impl SimSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, body: &SimBody) {
        self.bodies.push(body.downgrade());
    }

    /// Integrates velocity and gravity for every unfrozen body.
    pub fn step(&mut self, delta: f32) {
        self.bodies.retain(|weak| {
            let Some(state) = weak.upgrade() else {
                return false;
            };
            let mut state = state.borrow_mut();
            if !state.frozen {
                let gravity = GRAVITY * state.gravity_scale;
                state.velocity.y += gravity * delta;
                let velocity = state.velocity;
                state.position += velocity * delta;
            }
            true
        });
    }
}

/// Scene resolver over a fixed set of item ids, producing [`SimBody`]s.
///
/// The space handle lets every instantiated body join the integration loop,
/// the way an engine parents spawned scenes into its physics world.
pub struct SimScenes {
    known: HashSet<String>,
    space: Rc<RefCell<SimSpace>>,
    /// Force instantiation failures, for recovery-path scenarios.
    pub fail_instantiation: bool,
}

impl SimScenes {
    pub fn new(space: Rc<RefCell<SimSpace>>, items: &[&str]) -> Self {
        Self {
            known: items.iter().map(|s| (*s).to_owned()).collect(),
            space,
            fail_instantiation: false,
        }
    }

    pub fn map_item(&mut self, item: &str) {
        self.known.insert(item.to_owned());
    }
}

impl SceneResolver for SimScenes {
    fn resolve_world_scene(&mut self, item: &ItemId) -> Option<SceneHandle> {
        if self.known.contains(item.as_str()) {
            // handle content is irrelevant to the sim; ids are stable hashes
            Some(SceneHandle(1))
        } else {
            None
        }
    }

    fn instantiate(&mut self, _handle: SceneHandle) -> Option<Box<dyn PhysicsBody>> {
        if self.fail_instantiation {
            return None;
        }
        let body = SimBody::new();
        self.space.borrow_mut().track(&body);
        Some(Box::new(body))
    }
}

/// Animation sink that records every request for assertions.
#[derive(Clone, Debug, Default)]
pub struct RecordingAnimations {
    log: Rc<RefCell<Vec<String>>>,
}

impl RecordingAnimations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.log.borrow().last().cloned()
    }
}

impl AnimationSink for RecordingAnimations {
    fn play(&mut self, name: &str, _looping: bool, _speed: f32) {
        self.log.borrow_mut().push(name.to_owned());
    }
}
