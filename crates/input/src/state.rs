use crate::action::{Action, Key};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Raw events delivered by the host between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Relative pointer motion in pixels.
    MouseMove { dx: f32, dy: f32 },
    /// Pointer lock engaged or released.
    PointerLock(bool),
}

/// Snapshot of held movement keys and pending look motion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    mouse_look: bool,
    mouse_delta: Vec2,
    jump_held: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the snapshot. Returns the discrete action the event
    /// triggered, if any (currently only a fresh jump press).
    pub fn apply(&mut self, event: InputEvent) -> Option<Action> {
        match event {
            InputEvent::KeyDown(key) => {
                let action = Action::from_key(key);
                match action {
                    Action::Jump => {
                        // Ignore key auto-repeat while the key stays down.
                        let fresh = !self.jump_held;
                        self.jump_held = true;
                        return fresh.then_some(Action::Jump);
                    }
                    _ if action.is_movement() => self.set_held(action, true),
                    _ => {}
                }
                None
            }
            InputEvent::KeyUp(key) => {
                let action = Action::from_key(key);
                if action == Action::Jump {
                    self.jump_held = false;
                } else if action.is_movement() {
                    self.set_held(action, false);
                }
                None
            }
            InputEvent::MouseMove { dx, dy } => {
                if self.mouse_look {
                    self.mouse_delta += Vec2::new(dx, dy);
                }
                None
            }
            InputEvent::PointerLock(locked) => {
                if self.mouse_look != locked {
                    tracing::debug!(locked, "pointer lock changed");
                }
                self.mouse_look = locked;
                if !locked {
                    self.mouse_delta = Vec2::ZERO;
                }
                None
            }
        }
    }

    fn set_held(&mut self, action: Action, down: bool) {
        match action {
            Action::MoveForward => self.forward = down,
            Action::MoveBackward => self.backward = down,
            Action::MoveLeft => self.left = down,
            Action::MoveRight => self.right = down,
            Action::Jump | Action::Noop => {}
        }
    }

    /// Whether look control is captured by pointer lock.
    pub fn mouse_look(&self) -> bool {
        self.mouse_look
    }

    /// Look motion accumulated since the last `take_mouse_delta`.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Drain the accumulated look motion.
    pub fn take_mouse_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Movement intent in input space: `x` is right, `y` is forward.
    /// Unit length when any key is held, zero otherwise.
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.forward {
            dir.y += 1.0;
        }
        if self.backward {
            dir.y -= 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        // Opposing keys cancel to zero, which must not be normalized.
        dir.normalize_or_zero()
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        *self = Self {
            mouse_look: self.mouse_look,
            ..Self::default()
        };
    }
}
