use crate::app::Vec2;

const MOVE_DISTANCE_DIVISOR: f32 = 10.0;

/// Physics collaborator for a single actor.
pub trait ActorBody {
    fn is_grounded(&self) -> bool;
    /// Fire-and-forget impulse.
    fn apply_impulse(&mut self, impulse: Vec2);
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
}

pub trait ViewportMetrics {
    fn visible_width(&self) -> f32;
}

/// One tenth of the visible width: `half_width * 2 / 10`.
pub fn move_distance(viewport: &dyn ViewportMetrics) -> f32 {
    let half_width = viewport.visible_width() * 0.5;
    half_width * 2.0 / MOVE_DISTANCE_DIVISOR
}

pub(crate) fn lerp_vec2(start: Vec2, end: Vec2, t: f32) -> Vec2 {
    let t = t.clamp(0.0, 1.0);
    Vec2 {
        x: start.x + (end.x - start.x) * t,
        y: start.y + (end.y - start.y) * t,
    }
}
