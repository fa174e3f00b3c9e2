use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One planned action. Direction is implied by the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandToken {
    MoveLeft,
    MoveRight,
    Jump,
    JumpLeft,
    JumpRight,
    Wait,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("unrecognized command '{0}'")]
    Unrecognized(String),
}

impl CommandToken {
    pub const ALL: [CommandToken; 6] = [
        CommandToken::MoveLeft,
        CommandToken::MoveRight,
        CommandToken::Jump,
        CommandToken::JumpLeft,
        CommandToken::JumpRight,
        CommandToken::Wait,
    ];

    pub fn is_jump_class(self) -> bool {
        matches!(self, Self::Jump | Self::JumpLeft | Self::JumpRight)
    }

    pub fn horizontal_sign(self) -> f32 {
        match self {
            Self::MoveLeft | Self::JumpLeft => -1.0,
            Self::MoveRight | Self::JumpRight => 1.0,
            Self::Jump | Self::Wait => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::MoveLeft => "Left",
            Self::MoveRight => "Right",
            Self::Jump => "Jump",
            Self::JumpLeft => "Jump Left",
            Self::JumpRight => "Jump Right",
            Self::Wait => "Wait",
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Self::MoveLeft => "move_left",
            Self::MoveRight => "move_right",
            Self::Jump => "jump",
            Self::JumpLeft => "jump_left",
            Self::JumpRight => "jump_right",
            Self::Wait => "wait",
        }
    }
}

impl fmt::Display for CommandToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CommandToken {
    type Err = ParseCommandError;

    /// Accepts canonical token names and the arrow tile names (`up`,
    /// `upleft`, `upright`, ...), ignoring case and surrounding whitespace.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        let token = match normalized.as_str() {
            "move_left" | "left" => Self::MoveLeft,
            "move_right" | "right" => Self::MoveRight,
            "jump" | "up" => Self::Jump,
            "jump_left" | "upleft" => Self::JumpLeft,
            "jump_right" | "upright" => Self::JumpRight,
            "wait" => Self::Wait,
            _ => return Err(ParseCommandError::Unrecognized(raw.trim().to_string())),
        };
        Ok(token)
    }
}
