use crate::app::Vec2;
use crate::playback::{PlaybackTuning, ScriptedSequencer, TurnSetup, DEFAULT_HORIZONTAL_FORCE};

pub const DEFAULT_LEVEL_NAME: &str = "Sandbox";
pub const DEFAULT_CAMERA_SIZE: f32 = 5.0;
pub const DEFAULT_FLOOR_Y: f32 = -3.0;
pub const DEFAULT_MAX_INPUTS_PER_TURN: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct ActorSpawnDef {
    pub position: Vec2,
    pub tuning: PlaybackTuning,
}

/// Everything needed to set up one match.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelDef {
    pub name: String,
    pub camera_size: f32,
    pub floor_y: f32,
    pub player: ActorSpawnDef,
    pub adversary: ActorSpawnDef,
    pub max_inputs_per_turn: Option<usize>,
    pub script: ScriptedSequencer,
}

impl Default for LevelDef {
    fn default() -> Self {
        Self {
            name: DEFAULT_LEVEL_NAME.to_string(),
            camera_size: DEFAULT_CAMERA_SIZE,
            floor_y: DEFAULT_FLOOR_Y,
            player: ActorSpawnDef {
                position: Vec2::new(-6.0, DEFAULT_FLOOR_Y + 0.5),
                tuning: PlaybackTuning::default(),
            },
            adversary: ActorSpawnDef {
                position: Vec2::new(4.0, DEFAULT_FLOOR_Y + 0.5),
                tuning: default_adversary_tuning(),
            },
            max_inputs_per_turn: Some(DEFAULT_MAX_INPUTS_PER_TURN),
            script: ScriptedSequencer::default(),
        }
    }
}

impl LevelDef {
    pub fn turn_setup(&self) -> TurnSetup {
        TurnSetup {
            player_tuning: self.player.tuning,
            adversary_tuning: self.adversary.tuning,
            max_inputs_per_turn: self.max_inputs_per_turn,
            sequencer: self.script.clone(),
        }
    }
}

/// The scripted actor's plain jump drifts toward the player.
pub fn default_adversary_tuning() -> PlaybackTuning {
    PlaybackTuning {
        jump_drift: -DEFAULT_HORIZONTAL_FORCE,
        ..PlaybackTuning::default()
    }
}
