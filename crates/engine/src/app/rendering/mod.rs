mod renderer;
mod transform;

pub use renderer::Renderer;
pub use transform::{
    letterbox_rect, pixels_per_world, world_to_screen, PixelRect, Viewport, ViewportRect,
};
