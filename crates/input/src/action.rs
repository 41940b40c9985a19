use serde::{Deserialize, Serialize};

/// Physical keys the controller cares about. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
    Other,
}

/// A high-level action produced from a key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,
    /// Bound to nothing.
    Noop,
}

impl Action {
    /// Default key bindings: WASD or arrows to move, Space to jump.
    pub fn from_key(key: Key) -> Self {
        match key {
            Key::W | Key::ArrowUp => Self::MoveForward,
            Key::S | Key::ArrowDown => Self::MoveBackward,
            Key::A | Key::ArrowLeft => Self::MoveLeft,
            Key::D | Key::ArrowRight => Self::MoveRight,
            Key::Space => Self::Jump,
            Key::Escape | Key::Other => Self::Noop,
        }
    }

    /// Held actions contribute to the movement vector while down.
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Self::MoveForward | Self::MoveBackward | Self::MoveLeft | Self::MoveRight
        )
    }
}
