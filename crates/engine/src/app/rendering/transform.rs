use crate::app::{Camera2D, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Camera rect in normalized window coordinates, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewportRect {
    pub const FULL: ViewportRect = ViewportRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn to_pixels(self, window: Viewport) -> PixelRect {
        let left = (self.x * window.width as f32).round() as i32;
        let top = (self.y * window.height as f32).round() as i32;
        let right = ((self.x + self.width) * window.width as f32).round() as i32;
        let bottom = ((self.y + self.height) * window.height as f32).round() as i32;
        PixelRect {
            x: left,
            y: top,
            width: (right - left).max(0) as u32,
            height: (bottom - top).max(0) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.width as i32
            && y < self.y + self.height as i32
    }
}

/// Keeps the camera at `target_aspect` inside any window shape. A window
/// narrower than the target gets bars top and bottom; a wider one gets bars
/// left and right.
pub fn letterbox_rect(window_width: u32, window_height: u32, target_aspect: f32) -> ViewportRect {
    if window_width == 0 || window_height == 0 || !target_aspect.is_finite() || target_aspect <= 0.0
    {
        return ViewportRect::FULL;
    }

    let window_aspect = window_width as f32 / window_height as f32;
    let scale_height = window_aspect / target_aspect;

    if scale_height < 1.0 {
        ViewportRect {
            x: 0.0,
            y: (1.0 - scale_height) * 0.5,
            width: 1.0,
            height: scale_height,
        }
    } else {
        let scale_width = 1.0 / scale_height;
        ViewportRect {
            x: (1.0 - scale_width) * 0.5,
            y: 0.0,
            width: scale_width,
            height: 1.0,
        }
    }
}

pub fn pixels_per_world(camera: &Camera2D, rect: PixelRect) -> f32 {
    rect.height as f32 / camera.visible_height()
}

pub fn world_to_screen(world: Vec2, camera: &Camera2D, rect: PixelRect) -> (i32, i32) {
    let scale = pixels_per_world(camera, rect);
    let center_x = rect.x as f32 + rect.width as f32 * 0.5;
    let center_y = rect.y as f32 + rect.height as f32 * 0.5;
    let x = center_x + (world.x - camera.position.x) * scale;
    let y = center_y - (world.y - camera.position.y) * scale;
    (x.round() as i32, y.round() as i32)
}
