use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::ActionStates;
use super::metrics::MetricsAccumulator;
use super::scene::SceneHost;
use super::{Camera2D, InputAction, InputSnapshot, Renderer, Scene, SceneCommand};

pub const SLOW_FRAME_ENV_VAR: &str = "STEPWISE_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
    pub camera: Camera2D,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Stepwise".to_string(),
            window_width: 1280,
            window_height: 720,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(5),
            simulated_slow_frame_ms: 0,
            max_render_fps: Some(120),
            camera: Camera2D::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig, scene: Box<dyn Scene>) -> Result<(), AppError> {
    let mut host = SceneHost::new(scene, config.camera);

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut clock = FrameClock::from_config(&config);
    let slow_frame_delay = slow_frame_delay(env::var(SLOW_FRAME_ENV_VAR), config.simulated_slow_frame_ms);
    let mut input_collector = InputCollector::new(config.window_width, config.window_height);

    host.load();
    info!(
        entity_count = host.world().entity_count(),
        target_tps = clock.target_tps(),
        max_ticks_per_frame = clock.max_ticks_per_frame,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        render_fps_cap = ?clock.render_fps_cap,
        "loop_started"
    );

    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics = MetricsAccumulator::new(
        non_zero_or(config.metrics_log_interval, Duration::from_secs(5)),
        Instant::now(),
    );
    let mut shown_title: Option<String> = None;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    input_collector.mark_quit_requested();
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    input_collector.set_window_size(size.width, size.height);
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    if !slow_frame_delay.is_zero() {
                        thread::sleep(slow_frame_delay);
                    }

                    let now = Instant::now();
                    let frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    let budget = clock.advance(frame_dt);
                    for _ in 0..budget.ticks {
                        let snapshot = input_collector.snapshot_for_tick();
                        if host.update(clock.fixed_dt_seconds(), &snapshot) == SceneCommand::Restart {
                            host.restart();
                            info!(entity_count = host.world().entity_count(), "scene_restarted");
                        }
                    }
                    metrics.record_ticks(budget.ticks);
                    if !budget.dropped_backlog.is_zero() {
                        metrics.record_clamped_frame();
                        warn!(
                            dropped_backlog_ms = budget.dropped_backlog.as_millis() as u64,
                            "sim_backlog_dropped"
                        );
                    }

                    let render_wait =
                        clock.render_wait(Instant::now().saturating_duration_since(last_present_instant));
                    if !render_wait.is_zero() {
                        thread::sleep(render_wait);
                    }
                    host.render();
                    if let Err(error) = renderer.render_world(host.world()) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();

                    let title = host.debug_title();
                    if title != shown_title {
                        window.set_title(title.as_deref().unwrap_or(&config.window_title));
                        shown_title = title;
                    }

                    metrics.record_frame(frame_dt);
                    if let Some(snapshot) = metrics.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            clamped_frames = snapshot.clamped_frames,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => window.request_redraw(),
            Event::LoopExiting => {
                host.shutdown();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Fixed-step pacing. Frame time is clamped, accumulated and paid out as
/// whole ticks; backlog past the per-frame tick cap is dropped.
#[derive(Debug, Clone)]
struct FrameClock {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    render_fps_cap: Option<u32>,
    accumulator: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TickBudget {
    ticks: u32,
    dropped_backlog: Duration,
}

impl FrameClock {
    fn from_config(config: &LoopConfig) -> Self {
        let target_tps = config.target_tps.max(1);
        Self {
            fixed_dt: Duration::from_secs_f64(1.0 / f64::from(target_tps)),
            max_frame_delta: non_zero_or(config.max_frame_delta, Duration::from_millis(250)),
            max_ticks_per_frame: config.max_ticks_per_frame.max(1),
            render_fps_cap: config.max_render_fps.filter(|fps| *fps > 0),
            accumulator: Duration::ZERO,
        }
    }

    fn target_tps(&self) -> u32 {
        (1.0 / self.fixed_dt.as_secs_f64()).round() as u32
    }

    fn fixed_dt_seconds(&self) -> f32 {
        self.fixed_dt.as_secs_f32()
    }

    fn advance(&mut self, frame_dt: Duration) -> TickBudget {
        self.accumulator = self
            .accumulator
            .saturating_add(frame_dt.min(self.max_frame_delta));

        let mut ticks = 0;
        while self.accumulator >= self.fixed_dt && ticks < self.max_ticks_per_frame {
            self.accumulator -= self.fixed_dt;
            ticks += 1;
        }
        let dropped_backlog = if self.accumulator >= self.fixed_dt {
            std::mem::take(&mut self.accumulator)
        } else {
            Duration::ZERO
        };
        TickBudget {
            ticks,
            dropped_backlog,
        }
    }

    /// Sleep needed before presenting so frames stay under the render cap.
    fn render_wait(&self, since_last_present: Duration) -> Duration {
        self.render_fps_cap
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)))
            .map_or(Duration::ZERO, |frame| frame.saturating_sub(since_last_present))
    }
}

fn non_zero_or(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

/// The env var wins over config when it parses.
fn slow_frame_delay(env_value: Result<String, env::VarError>, config_ms: u64) -> Duration {
    let fallback = Duration::from_millis(config_ms);
    match env_value {
        Ok(raw) => raw.trim().parse::<u64>().map(Duration::from_millis).unwrap_or_else(|_| {
            warn!(env_var = SLOW_FRAME_ENV_VAR, value = raw.as_str(), "slow_frame_env_invalid");
            fallback
        }),
        Err(env::VarError::NotPresent) => fallback,
        Err(error) => {
            warn!(env_var = SLOW_FRAME_ENV_VAR, error = %error, "slow_frame_env_unreadable");
            fallback
        }
    }
}

/// Collects key events between ticks. Press edges are handed to exactly one
/// tick snapshot.
#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    action_states: ActionStates,
    window_width: u32,
    window_height: u32,
}

impl InputCollector {
    fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            window_width,
            window_height,
            ..Self::default()
        }
    }

    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.update_action_state_from_physical_key(key_event.physical_key, is_pressed);
    }

    fn update_action_state_from_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        let Some(action) = action_for_key(key) else {
            return;
        };
        self.action_states.set(action, is_pressed);
        if action == InputAction::Quit && is_pressed {
            self.mark_quit_requested();
        }
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(
            self.quit_requested,
            self.action_states,
            self.window_width,
            self.window_height,
        );
        self.action_states.clear_edges();
        snapshot
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }
}

fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let action = match code {
        KeyCode::KeyA | KeyCode::ArrowLeft => InputAction::MoveLeft,
        KeyCode::KeyD | KeyCode::ArrowRight => InputAction::MoveRight,
        KeyCode::KeyW | KeyCode::ArrowUp | KeyCode::Space => InputAction::Jump,
        KeyCode::KeyQ => InputAction::JumpLeft,
        KeyCode::KeyE => InputAction::JumpRight,
        KeyCode::KeyS | KeyCode::ArrowDown => InputAction::Wait,
        KeyCode::Backspace | KeyCode::KeyZ => InputAction::Undo,
        KeyCode::KeyC | KeyCode::Delete => InputAction::ClearPlan,
        KeyCode::Enter | KeyCode::NumpadEnter => InputAction::Play,
        KeyCode::KeyR => InputAction::Restart,
        KeyCode::Escape => InputAction::Quit,
        _ => return None,
    };
    Some(action)
}
