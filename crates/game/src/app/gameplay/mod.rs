use engine::playback::{
    ActorBody, ActorRole, MatchOutcome, PlaybackEvent, TurnDirector, TurnEvent, TurnPhase,
};
use engine::{
    Camera2D, EntityId, HudState, InputAction, InputSnapshot, LevelDef, RenderableDesc,
    RenderableKind, Scene, SceneCommand, SceneWorld, Vec2,
};
use tracing::{debug, info, warn};

const GRAVITY_UNITS_PER_SECOND_SQUARED: f32 = -9.81;
const GROUND_PROBE_DISTANCE: f32 = 0.05;
const ACTOR_HALF_EXTENT: f32 = 0.5;

include!("physics.rs");
include!("outcome.rs");
include!("scene_impl.rs");

pub(crate) fn build_scene(level: LevelDef) -> Box<dyn Scene> {
    Box::new(PuzzleScene::new(level))
}
