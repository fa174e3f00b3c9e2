use crate::playback::CommandToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
    JumpLeft,
    JumpRight,
    Wait,
    Undo,
    ClearPlan,
    Play,
    Restart,
    Quit,
}

const ACTION_COUNT: usize = 11;

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Jump,
        InputAction::JumpLeft,
        InputAction::JumpRight,
        InputAction::Wait,
        InputAction::Undo,
        InputAction::ClearPlan,
        InputAction::Play,
        InputAction::Restart,
        InputAction::Quit,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveLeft => 0,
            InputAction::MoveRight => 1,
            InputAction::Jump => 2,
            InputAction::JumpLeft => 3,
            InputAction::JumpRight => 4,
            InputAction::Wait => 5,
            InputAction::Undo => 6,
            InputAction::ClearPlan => 7,
            InputAction::Play => 8,
            InputAction::Restart => 9,
            InputAction::Quit => 10,
        }
    }

    /// Planning keys map to the command they record.
    pub fn command_token(self) -> Option<CommandToken> {
        match self {
            InputAction::MoveLeft => Some(CommandToken::MoveLeft),
            InputAction::MoveRight => Some(CommandToken::MoveRight),
            InputAction::Jump => Some(CommandToken::Jump),
            InputAction::JumpLeft => Some(CommandToken::JumpLeft),
            InputAction::JumpRight => Some(CommandToken::JumpRight),
            InputAction::Wait => Some(CommandToken::Wait),
            InputAction::Undo
            | InputAction::ClearPlan
            | InputAction::Play
            | InputAction::Restart
            | InputAction::Quit => None,
        }
    }
}

/// Held state plus a press edge that survives until `clear_edges`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
    pressed: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        let index = action.index();
        if is_down && !self.down[index] {
            self.pressed[index] = true;
        }
        self.down[index] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed[action.index()]
    }

    pub(crate) fn clear_edges(&mut self) {
        self.pressed = [false; ACTION_COUNT];
    }
}
