mod compiler;
mod discovery;
mod level;

pub use compiler::{load_level, parse_level, ContentErrorCode, LevelLoadError, SourceLocation};
pub use discovery::discover_levels;
pub use level::{
    default_adversary_tuning, ActorSpawnDef, LevelDef, DEFAULT_CAMERA_SIZE, DEFAULT_FLOOR_Y,
    DEFAULT_LEVEL_NAME, DEFAULT_MAX_INPUTS_PER_TURN,
};
