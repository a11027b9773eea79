//! Per-frame input as seen by the simulation.  The terminal front end fills
//! these in; the core never touches a keyboard.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Player 1 then player 2; the second entry is ignored in single player.
    pub players: [PlayerInput; 2],
    pub pause: bool,
}

impl FrameInput {
    pub fn single(input: PlayerInput) -> Self {
        FrameInput { players: [input, PlayerInput::default()], pause: false }
    }

    pub fn player(&self, id: usize) -> PlayerInput {
        self.players.get(id).copied().unwrap_or_default()
    }
}

/// Menu navigation intent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavIntent {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
}
