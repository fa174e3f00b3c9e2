use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::{HudState, RenderableKind, SceneWorld, Vec2};
use crate::playback::{ActorRole, CommandToken, MatchOutcome};

use super::transform::{letterbox_rect, pixels_per_world, world_to_screen, PixelRect, Viewport};

const LETTERBOX_COLOR: [u8; 4] = [0, 0, 0, 255];
const CLEAR_COLOR: [u8; 4] = [20, 22, 28, 255];
const GROUND_COLOR: [u8; 4] = [96, 104, 118, 255];
const PLAYER_COLOR: [u8; 4] = [80, 200, 255, 255];
const ADVERSARY_COLOR: [u8; 4] = [255, 110, 90, 255];
const SLOT_EMPTY_COLOR: [u8; 4] = [52, 58, 70, 255];
const SLOT_PLAYING_OUTLINE_COLOR: [u8; 4] = [255, 236, 120, 255];
const WIN_BAND_COLOR: [u8; 4] = [70, 190, 110, 255];
const LOSE_BAND_COLOR: [u8; 4] = [200, 60, 60, 255];
const STRIP_CELL_HALF_SIZE_PX: i32 = 9;
const STRIP_CELL_GAP_PX: i32 = 6;
const STRIP_MARGIN_PX: i32 = 14;
const OUTCOME_BAND_HEIGHT_PX: i32 = 6;

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_world(&mut self, world: &SceneWorld) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }

        let width = self.viewport.width;
        let camera = world.camera();
        let rect = letterbox_rect(width, self.viewport.height, camera.effective_aspect())
            .to_pixels(self.viewport);
        let frame = self.pixels.frame_mut();

        paint_background(frame, width, rect);

        if let Some(ground_y) = world.ground_y() {
            let (_, screen_y) = world_to_screen(Vec2::new(camera.position.x, ground_y), camera, rect);
            draw_horizontal_span(frame, width, rect, screen_y, GROUND_COLOR);
        }

        let scale = pixels_per_world(camera, rect);
        for entity in world.entities() {
            let (cx, cy) = world_to_screen(entity.position, camera, rect);
            let half_size = ((entity.half_extent * scale).round() as i32).max(1);
            draw_square(
                frame,
                width,
                rect,
                cx,
                cy,
                half_size,
                renderable_color(entity.renderable.kind),
            );
        }

        draw_plan_strip(frame, width, rect, world.hud());
        if let Some(outcome) = world.hud().outcome {
            draw_outcome_band(frame, width, rect, outcome);
        }

        self.pixels.render()
    }
}

fn renderable_color(kind: RenderableKind) -> [u8; 4] {
    match kind {
        RenderableKind::Actor(ActorRole::Player) => PLAYER_COLOR,
        RenderableKind::Actor(ActorRole::Adversary) => ADVERSARY_COLOR,
    }
}

fn token_color(token: CommandToken) -> [u8; 4] {
    match token {
        CommandToken::MoveLeft => [90, 150, 255, 255],
        CommandToken::MoveRight => [90, 220, 160, 255],
        CommandToken::Jump => [240, 200, 80, 255],
        CommandToken::JumpLeft => [200, 130, 240, 255],
        CommandToken::JumpRight => [240, 140, 190, 255],
        CommandToken::Wait => [150, 150, 150, 255],
    }
}

fn paint_background(frame: &mut [u8], width: u32, rect: PixelRect) {
    for (index, chunk) in frame.chunks_exact_mut(4).enumerate() {
        let x = (index % width as usize) as i32;
        let y = (index / width as usize) as i32;
        let color = if rect.contains(x, y) {
            CLEAR_COLOR
        } else {
            LETTERBOX_COLOR
        };
        chunk.copy_from_slice(&color);
    }
}

/// One cell per planned token along the top of the view. While a playback
/// runs, the remaining tokens are drawn outlined after the planned ones.
fn draw_plan_strip(frame: &mut [u8], width: u32, rect: PixelRect, hud: &HudState) {
    let step = STRIP_CELL_HALF_SIZE_PX * 2 + STRIP_CELL_GAP_PX;
    let top = rect.y + STRIP_MARGIN_PX + STRIP_CELL_HALF_SIZE_PX;
    let mut cx = rect.x + STRIP_MARGIN_PX + STRIP_CELL_HALF_SIZE_PX;

    let slot_count = hud
        .plan_capacity
        .unwrap_or(hud.planned.len())
        .max(hud.planned.len());
    for slot in 0..slot_count {
        let color = hud
            .planned
            .get(slot)
            .copied()
            .map(token_color)
            .unwrap_or(SLOT_EMPTY_COLOR);
        draw_square(frame, width, rect, cx, top, STRIP_CELL_HALF_SIZE_PX, color);
        cx += step;
    }

    if hud.playing.is_empty() {
        return;
    }
    cx += step;
    for token in &hud.playing {
        draw_square(
            frame,
            width,
            rect,
            cx,
            top,
            STRIP_CELL_HALF_SIZE_PX - 3,
            token_color(*token),
        );
        draw_square_outline(
            frame,
            width,
            rect,
            cx,
            top,
            STRIP_CELL_HALF_SIZE_PX,
            SLOT_PLAYING_OUTLINE_COLOR,
        );
        cx += step;
    }
}

fn draw_outcome_band(frame: &mut [u8], width: u32, rect: PixelRect, outcome: MatchOutcome) {
    let color = match outcome {
        MatchOutcome::PlayerWins => WIN_BAND_COLOR,
        MatchOutcome::AdversaryWins => LOSE_BAND_COLOR,
    };
    let bottom = rect.y + rect.height as i32;
    for y in (bottom - OUTCOME_BAND_HEIGHT_PX)..bottom {
        draw_horizontal_span(frame, width, rect, y, color);
    }
}

fn draw_horizontal_span(frame: &mut [u8], width: u32, rect: PixelRect, y: i32, color: [u8; 4]) {
    for x in rect.x..rect.x + rect.width as i32 {
        write_pixel_clipped(frame, width, rect, x, y, color);
    }
}

fn write_pixel_clipped(frame: &mut [u8], width: u32, clip: PixelRect, x: i32, y: i32, color: [u8; 4]) {
    if !clip.contains(x, y) || x < 0 || y < 0 || x >= width as i32 {
        return;
    }
    let Some(pixel_offset) = (y as usize)
        .checked_mul(width as usize)
        .and_then(|row| row.checked_add(x as usize))
    else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    frame[byte_offset..end].copy_from_slice(&color);
}

fn draw_square(
    frame: &mut [u8],
    width: u32,
    clip: PixelRect,
    cx: i32,
    cy: i32,
    half_size: i32,
    color: [u8; 4],
) {
    for y in (cy - half_size)..=(cy + half_size) {
        for x in (cx - half_size)..=(cx + half_size) {
            write_pixel_clipped(frame, width, clip, x, y, color);
        }
    }
}

fn draw_square_outline(
    frame: &mut [u8],
    width: u32,
    clip: PixelRect,
    cx: i32,
    cy: i32,
    half_size: i32,
    color: [u8; 4],
) {
    let left = cx - half_size;
    let right = cx + half_size;
    let top = cy - half_size;
    let bottom = cy + half_size;

    for x in left..=right {
        write_pixel_clipped(frame, width, clip, x, top, color);
        write_pixel_clipped(frame, width, clip, x, bottom, color);
    }
    for y in top..=bottom {
        write_pixel_clipped(frame, width, clip, left, y, color);
        write_pixel_clipped(frame, width, clip, right, y, color);
    }
}
