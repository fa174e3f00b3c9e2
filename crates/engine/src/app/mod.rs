mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    letterbox_rect, pixels_per_world, world_to_screen, PixelRect, Renderer, Viewport, ViewportRect,
};
pub use scene::{
    Camera2D, Entity, EntityId, HudState, InputSnapshot, RenderableDesc, RenderableKind, Scene,
    SceneCommand, SceneWorld, Vec2, DEFAULT_ORTHOGRAPHIC_SIZE, DEFAULT_TARGET_ASPECT,
};
