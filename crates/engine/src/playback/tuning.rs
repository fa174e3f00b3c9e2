pub const DEFAULT_MOVE_DURATION_SECONDS: f32 = 1.0;
pub const DEFAULT_MOVE_SPEED_SCALE: f32 = 2.0;
pub const DEFAULT_JUMP_FORCE: f32 = 5.0;
pub const DEFAULT_HORIZONTAL_FORCE: f32 = 2.0;
pub const DEFAULT_GROUND_POLL_INTERVAL_SECONDS: f32 = 0.5;
pub const DEFAULT_SETTLE_DURATION_SECONDS: f32 = 1.5;
pub const DEFAULT_STALL_REPORT_AFTER_SECONDS: f32 = 2.0;
pub const DEFAULT_GROUND_WAIT_TIMEOUT_SECONDS: f32 = 10.0;

/// Per-actor playback constants.
///
/// `move_speed_scale` makes the interpolation clock run faster than the wall
/// clock: with a 1s `move_duration` and a scale of 2 a move finishes in 0.5s
/// of simulated time. The ratio is configuration; values below 1 are raised
/// to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackTuning {
    pub move_duration: f32,
    pub move_speed_scale: f32,
    pub jump_force: f32,
    pub horizontal_force: f32,
    pub jump_drift: f32,
    pub ground_poll_interval: f32,
    pub settle_duration: f32,
    pub stall_report_after: f32,
    pub ground_wait_timeout: Option<f32>,
}

impl Default for PlaybackTuning {
    fn default() -> Self {
        Self {
            move_duration: DEFAULT_MOVE_DURATION_SECONDS,
            move_speed_scale: DEFAULT_MOVE_SPEED_SCALE,
            jump_force: DEFAULT_JUMP_FORCE,
            horizontal_force: DEFAULT_HORIZONTAL_FORCE,
            jump_drift: 0.0,
            ground_poll_interval: DEFAULT_GROUND_POLL_INTERVAL_SECONDS,
            settle_duration: DEFAULT_SETTLE_DURATION_SECONDS,
            stall_report_after: DEFAULT_STALL_REPORT_AFTER_SECONDS,
            ground_wait_timeout: Some(DEFAULT_GROUND_WAIT_TIMEOUT_SECONDS),
        }
    }
}

impl PlaybackTuning {
    pub fn effective_move_speed_scale(&self) -> f32 {
        if self.move_speed_scale.is_finite() {
            self.move_speed_scale.max(1.0)
        } else {
            DEFAULT_MOVE_SPEED_SCALE
        }
    }

    pub fn effective_poll_interval(&self) -> f32 {
        if self.ground_poll_interval.is_finite() && self.ground_poll_interval > 0.0 {
            self.ground_poll_interval
        } else {
            DEFAULT_GROUND_POLL_INTERVAL_SECONDS
        }
    }
}
