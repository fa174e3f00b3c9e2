use tracing::{debug, warn};

use crate::app::Vec2;

use super::body::{lerp_vec2, move_distance, ActorBody, ViewportMetrics};
use super::command::CommandToken;
use super::queue::CommandQueue;
use super::sensor::GroundSensor;
use super::tuning::PlaybackTuning;

const TIMER_EPSILON_SECONDS: f32 = 1e-5;

/// Tolerance for the running move and wait totals, which accumulate in f64.
const TIMER_EPSILON_SECONDS_F64: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Started { queued: usize },
    IgnoredBusy,
    IgnoredDisabled,
    IgnoredEmpty,
}

impl RunOutcome {
    pub fn started(self) -> bool {
        matches!(self, Self::Started { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Busy,
    Drained,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    ActionStarted { token: CommandToken },
    ActionCompleted { token: CommandToken },
    JumpImpulse { token: CommandToken, impulse: Vec2 },
    Stalled { token: CommandToken, waited_seconds: f32 },
    GroundWaitTimedOut { token: CommandToken, waited_seconds: f32 },
    Drained { completed: usize },
    Cancelled { discarded: usize },
}

/// Collaborators borrowed for one tick.
pub struct ExecutionContext<'a> {
    pub body: &'a mut dyn ActorBody,
    pub sensor: &'a mut GroundSensor,
    pub viewport: &'a dyn ViewportMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ActionPhase {
    Moving {
        start: Vec2,
        target: Vec2,
        elapsed: f64,
    },
    AwaitingGround {
        since_poll: f32,
        waited: f32,
        stall_reported: bool,
    },
    Settling {
        remaining: f64,
    },
    Waiting {
        remaining: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveAction {
    token: CommandToken,
    phase: ActionPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Running,
    Done,
}

/// Exists only for one drain of one queue.
#[derive(Debug)]
struct ExecutorSession {
    queue: CommandQueue,
    active: Option<ActiveAction>,
    completed: usize,
}

#[derive(Debug)]
enum ExecutorState {
    Idle,
    Draining(ExecutorSession),
}

/// Single-flight drain of a command queue, advanced once per simulation tick.
#[derive(Debug)]
pub struct CommandExecutor {
    label: &'static str,
    tuning: PlaybackTuning,
    state: ExecutorState,
}

impl CommandExecutor {
    pub fn new(label: &'static str, tuning: PlaybackTuning) -> Self {
        Self {
            label,
            tuning,
            state: ExecutorState::Idle,
        }
    }

    pub fn tuning(&self) -> &PlaybackTuning {
        &self.tuning
    }

    pub fn is_draining(&self) -> bool {
        matches!(self.state, ExecutorState::Draining(_))
    }

    pub fn is_stalled(&self) -> bool {
        match &self.state {
            ExecutorState::Draining(session) => matches!(
                session.active,
                Some(ActiveAction {
                    phase: ActionPhase::AwaitingGround {
                        stall_reported: true,
                        ..
                    },
                    ..
                })
            ),
            ExecutorState::Idle => false,
        }
    }

    pub fn current_token(&self) -> Option<CommandToken> {
        match &self.state {
            ExecutorState::Draining(session) => session.active.map(|action| action.token),
            ExecutorState::Idle => None,
        }
    }

    /// Active token first, then whatever is still queued.
    pub fn pending_tokens(&self) -> Vec<CommandToken> {
        match &self.state {
            ExecutorState::Draining(session) => session
                .active
                .map(|action| action.token)
                .into_iter()
                .chain(session.queue.iter())
                .collect(),
            ExecutorState::Idle => Vec::new(),
        }
    }

    /// Takes ownership of the queue contents when idle and non-empty.
    /// Otherwise the queue is left untouched.
    pub fn run(&mut self, queue: &mut CommandQueue) -> RunOutcome {
        if self.is_draining() {
            debug!(actor = self.label, queued = queue.len(), "run_ignored_busy");
            return RunOutcome::IgnoredBusy;
        }
        if queue.is_empty() {
            debug!(actor = self.label, "run_ignored_empty");
            return RunOutcome::IgnoredEmpty;
        }

        let queued = queue.len();
        self.state = ExecutorState::Draining(ExecutorSession {
            queue: queue.take(),
            active: None,
            completed: 0,
        });
        debug!(actor = self.label, queued, "playback_started");
        RunOutcome::Started { queued }
    }

    pub fn tick(
        &mut self,
        dt_seconds: f32,
        ctx: &mut ExecutionContext<'_>,
        events: &mut Vec<PlaybackEvent>,
    ) -> TickOutcome {
        let label = self.label;
        let tuning = self.tuning;
        let ExecutorState::Draining(session) = &mut self.state else {
            return TickOutcome::Idle;
        };

        if let Some(active) = session.active.as_mut() {
            match advance_action(label, &tuning, active, dt_seconds, ctx, events) {
                Progress::Running => return TickOutcome::Busy,
                Progress::Done => {
                    events.push(PlaybackEvent::ActionCompleted {
                        token: active.token,
                    });
                    session.completed = session.completed.saturating_add(1);
                    session.active = None;
                }
            }
        }

        loop {
            if session.queue.is_empty() {
                let completed = session.completed;
                self.state = ExecutorState::Idle;
                events.push(PlaybackEvent::Drained { completed });
                debug!(actor = label, completed, "playback_drained");
                return TickOutcome::Drained;
            }

            let token = match session.queue.dequeue() {
                Ok(token) => token,
                Err(error) => {
                    warn!(actor = label, error = %error, "dequeue_failed");
                    continue;
                }
            };
            events.push(PlaybackEvent::ActionStarted { token });
            let (action, progress) = begin_action(label, &tuning, token, ctx, events);
            match progress {
                Progress::Running => {
                    session.active = Some(action);
                    return TickOutcome::Busy;
                }
                Progress::Done => {
                    events.push(PlaybackEvent::ActionCompleted { token });
                    session.completed = session.completed.saturating_add(1);
                }
            }
        }
    }

    /// Stops a drain early. An in-flight move is force-completed to its target.
    pub fn cancel(&mut self, body: &mut dyn ActorBody, events: &mut Vec<PlaybackEvent>) -> bool {
        let state = std::mem::replace(&mut self.state, ExecutorState::Idle);
        let ExecutorState::Draining(session) = state else {
            return false;
        };

        if let Some(ActiveAction {
            phase: ActionPhase::Moving { target, .. },
            ..
        }) = session.active
        {
            body.set_position(target);
        }
        let discarded = session.queue.len() + usize::from(session.active.is_some());
        events.push(PlaybackEvent::Cancelled { discarded });
        debug!(actor = self.label, discarded, "playback_cancelled");
        true
    }
}

fn begin_action(
    label: &'static str,
    tuning: &PlaybackTuning,
    token: CommandToken,
    ctx: &mut ExecutionContext<'_>,
    events: &mut Vec<PlaybackEvent>,
) -> (ActiveAction, Progress) {
    match token {
        CommandToken::MoveLeft | CommandToken::MoveRight => {
            let start = ctx.body.position();
            let distance = move_distance(ctx.viewport);
            let target = Vec2 {
                x: start.x + token.horizontal_sign() * distance,
                y: start.y,
            };
            let action = ActiveAction {
                token,
                phase: ActionPhase::Moving {
                    start,
                    target,
                    elapsed: 0.0,
                },
            };
            if tuning.move_duration <= 0.0 {
                ctx.body.set_position(target);
                return (action, Progress::Done);
            }
            (action, Progress::Running)
        }
        CommandToken::Jump | CommandToken::JumpLeft | CommandToken::JumpRight => {
            let mut action = ActiveAction {
                token,
                phase: ActionPhase::AwaitingGround {
                    since_poll: 0.0,
                    waited: 0.0,
                    stall_reported: false,
                },
            };
            let progress = poll_ground_and_jump(label, tuning, &mut action, ctx, events);
            (action, progress)
        }
        CommandToken::Wait => timer_action(token, tuning.move_duration, |remaining| {
            ActionPhase::Waiting { remaining }
        }),
    }
}

fn timer_action(
    token: CommandToken,
    duration: f32,
    phase: impl FnOnce(f64) -> ActionPhase,
) -> (ActiveAction, Progress) {
    let action = ActiveAction {
        token,
        phase: phase(f64::from(duration)),
    };
    let progress = if duration <= TIMER_EPSILON_SECONDS {
        Progress::Done
    } else {
        Progress::Running
    };
    (action, progress)
}

fn advance_action(
    label: &'static str,
    tuning: &PlaybackTuning,
    action: &mut ActiveAction,
    dt_seconds: f32,
    ctx: &mut ExecutionContext<'_>,
    events: &mut Vec<PlaybackEvent>,
) -> Progress {
    match &mut action.phase {
        ActionPhase::Moving {
            start,
            target,
            elapsed,
        } => {
            let scale = f64::from(tuning.effective_move_speed_scale());
            *elapsed += f64::from(dt_seconds) * scale;
            let duration = f64::from(tuning.move_duration);
            if *elapsed + TIMER_EPSILON_SECONDS_F64 >= duration {
                ctx.body.set_position(*target);
                Progress::Done
            } else {
                let t = (*elapsed / duration) as f32;
                ctx.body.set_position(lerp_vec2(*start, *target, t));
                Progress::Running
            }
        }
        ActionPhase::AwaitingGround {
            since_poll,
            waited,
            stall_reported,
        } => {
            *waited += dt_seconds;
            *since_poll += dt_seconds;
            let waited_seconds = *waited;

            if !*stall_reported && waited_seconds >= tuning.stall_report_after {
                *stall_reported = true;
                warn!(
                    actor = label,
                    token = action.token.as_token(),
                    waited_seconds,
                    "ground_wait_stalled"
                );
                events.push(PlaybackEvent::Stalled {
                    token: action.token,
                    waited_seconds,
                });
            }

            let interval = tuning.effective_poll_interval();
            if *since_poll + TIMER_EPSILON_SECONDS < interval {
                return Progress::Running;
            }
            *since_poll %= interval;

            match poll_ground_and_jump(label, tuning, action, ctx, events) {
                Progress::Done => Progress::Done,
                Progress::Running if is_awaiting_ground(action) => {
                    match tuning.ground_wait_timeout {
                        Some(timeout) if waited_seconds >= timeout => {
                            warn!(
                                actor = label,
                                token = action.token.as_token(),
                                waited_seconds,
                                "ground_wait_timed_out"
                            );
                            events.push(PlaybackEvent::GroundWaitTimedOut {
                                token: action.token,
                                waited_seconds,
                            });
                            Progress::Done
                        }
                        _ => Progress::Running,
                    }
                }
                Progress::Running => Progress::Running,
            }
        }
        ActionPhase::Settling { remaining } | ActionPhase::Waiting { remaining } => {
            *remaining -= f64::from(dt_seconds);
            if *remaining <= TIMER_EPSILON_SECONDS_F64 {
                Progress::Done
            } else {
                Progress::Running
            }
        }
    }
}

fn is_awaiting_ground(action: &ActiveAction) -> bool {
    matches!(action.phase, ActionPhase::AwaitingGround { .. })
}

/// Applies the impulse once the sensor reports ground, then moves to settling.
fn poll_ground_and_jump(
    label: &'static str,
    tuning: &PlaybackTuning,
    action: &mut ActiveAction,
    ctx: &mut ExecutionContext<'_>,
    events: &mut Vec<PlaybackEvent>,
) -> Progress {
    if !ctx.sensor.is_grounded() {
        return Progress::Running;
    }

    let horizontal = match action.token {
        CommandToken::JumpLeft | CommandToken::JumpRight => {
            action.token.horizontal_sign() * tuning.horizontal_force
        }
        _ => tuning.jump_drift,
    };
    let impulse = Vec2 {
        x: horizontal,
        y: tuning.jump_force,
    };
    ctx.body.apply_impulse(impulse);
    ctx.sensor.mark_airborne();
    events.push(PlaybackEvent::JumpImpulse {
        token: action.token,
        impulse,
    });
    debug!(
        actor = label,
        token = action.token.as_token(),
        impulse_x = impulse.x,
        impulse_y = impulse.y,
        "jump_impulse"
    );

    let (settling, progress) = timer_action(action.token, tuning.settle_duration, |remaining| {
        ActionPhase::Settling { remaining }
    });
    *action = settling;
    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use CommandToken::*;

    #[derive(Default)]
    struct FakeBody {
        position: Vec2,
        grounded: bool,
        impulses: Vec<Vec2>,
    }

    impl ActorBody for FakeBody {
        fn is_grounded(&self) -> bool {
            self.grounded
        }
        fn apply_impulse(&mut self, impulse: Vec2) {
            self.impulses.push(impulse);
        }
        fn position(&self) -> Vec2 {
            self.position
        }
        fn set_position(&mut self, position: Vec2) {
            self.position = position;
        }
    }

    struct FixedViewport(f32);

    impl ViewportMetrics for FixedViewport {
        fn visible_width(&self) -> f32 {
            self.0
        }
    }

    struct Rig {
        executor: CommandExecutor,
        body: FakeBody,
        sensor: GroundSensor,
        viewport: FixedViewport,
        events: Vec<PlaybackEvent>,
    }

    impl Rig {
        fn new(tuning: PlaybackTuning) -> Self {
            Self {
                executor: CommandExecutor::new("test", tuning),
                body: FakeBody {
                    grounded: true,
                    ..FakeBody::default()
                },
                sensor: GroundSensor::default(),
                viewport: FixedViewport(20.0),
                events: Vec::new(),
            }
        }

        fn tick(&mut self, dt: f32) -> TickOutcome {
            self.sensor.refresh(&self.body);
            let mut ctx = ExecutionContext {
                body: &mut self.body,
                sensor: &mut self.sensor,
                viewport: &self.viewport,
            };
            self.executor.tick(dt, &mut ctx, &mut self.events)
        }

        fn drain(&mut self, dt: f32, max_ticks: usize) -> usize {
            for tick in 1..=max_ticks {
                match self.tick(dt) {
                    TickOutcome::Drained => return tick,
                    TickOutcome::Idle => panic!("executor idle before drain finished"),
                    TickOutcome::Busy => {}
                }
            }
            panic!("drain did not finish within {max_ticks} ticks");
        }

        fn completed_tokens(&self) -> Vec<CommandToken> {
            self.events
                .iter()
                .filter_map(|event| match event {
                    PlaybackEvent::ActionCompleted { token } => Some(*token),
                    _ => None,
                })
                .collect()
        }
    }

    fn queue_of(tokens: &[CommandToken]) -> CommandQueue {
        tokens.iter().copied().collect()
    }

    #[test]
    fn drains_every_token_in_fifo_order() {
        let mut rig = Rig::new(PlaybackTuning::default());
        let plan = [MoveRight, Wait, Jump, MoveLeft, JumpRight];
        let mut queue = queue_of(&plan);

        assert!(!rig.executor.is_draining());
        assert_eq!(rig.executor.run(&mut queue), RunOutcome::Started { queued: 5 });
        assert!(rig.executor.is_draining());
        rig.drain(0.05, 10_000);

        assert!(!rig.executor.is_draining());
        assert_eq!(rig.completed_tokens(), plan.to_vec());
        assert_eq!(
            rig.events.last(),
            Some(&PlaybackEvent::Drained { completed: 5 })
        );
    }

    #[test]
    fn second_run_while_draining_is_a_no_op() {
        let mut rig = Rig::new(PlaybackTuning::default());
        let mut first = queue_of(&[MoveLeft, MoveLeft]);
        let mut second = queue_of(&[Jump, Wait, Wait]);

        assert!(rig.executor.run(&mut first).started());
        rig.tick(0.016);
        assert_eq!(rig.executor.run(&mut second), RunOutcome::IgnoredBusy);
        assert_eq!(second.len(), 3);
        assert_eq!(rig.executor.pending_tokens(), vec![MoveLeft, MoveLeft]);
    }

    #[test]
    fn empty_queue_does_not_start_a_session() {
        let mut rig = Rig::new(PlaybackTuning::default());
        let mut queue = CommandQueue::new();
        assert_eq!(rig.executor.run(&mut queue), RunOutcome::IgnoredEmpty);
        assert!(!rig.executor.is_draining());
        assert_eq!(rig.tick(0.1), TickOutcome::Idle);
    }

    #[test]
    fn move_lands_exactly_one_distance_for_any_step_size() {
        for dt in [0.001_f32, 0.016, 0.1, 0.3, 0.7, 2.5] {
            let mut rig = Rig::new(PlaybackTuning {
                move_duration: 1.0,
                move_speed_scale: 2.0,
                ..PlaybackTuning::default()
            });
            rig.body.position = Vec2 { x: -3.0, y: 0.5 };
            let mut queue = queue_of(&[MoveRight]);
            rig.executor.run(&mut queue);
            rig.drain(dt, 100_000);

            assert_eq!(rig.body.position, Vec2 { x: -1.0, y: 0.5 }, "dt={dt}");
        }
    }

    #[test]
    fn move_interpolates_on_the_faster_clock() {
        let mut rig = Rig::new(PlaybackTuning::default());
        let mut queue = queue_of(&[MoveLeft]);
        rig.executor.run(&mut queue);

        rig.tick(0.0);
        rig.tick(0.25);
        // 0.25s of wall clock at scale 2 is halfway through a 1s move.
        assert!((rig.body.position.x + 1.0).abs() < 1e-5);
        assert_eq!(rig.tick(0.25), TickOutcome::Drained);
        assert_eq!(rig.body.position.x, -2.0);
    }

    #[test]
    fn move_distance_is_read_at_dispatch_time() {
        let mut rig = Rig::new(PlaybackTuning::default());
        let mut queue = queue_of(&[MoveRight, MoveRight]);
        rig.executor.run(&mut queue);
        rig.tick(0.0);
        rig.viewport = FixedViewport(40.0);
        rig.drain(0.1, 1_000);

        // First move was planned at width 20, second at width 40.
        assert!((rig.body.position.x - 6.0).abs() < 1e-5);
    }

    #[test]
    fn jump_waits_for_ground_and_fires_once() {
        let poll_interval = 0.5;
        for failing_polls in [0usize, 1, 3, 6] {
            let mut rig = Rig::new(PlaybackTuning {
                ground_poll_interval: poll_interval,
                ground_wait_timeout: None,
                stall_report_after: 100.0,
                ..PlaybackTuning::default()
            });
            rig.body.grounded = failing_polls == 0;
            let mut queue = queue_of(&[Jump]);
            rig.executor.run(&mut queue);

            // The first poll happens when the jump is dispatched.
            rig.tick(0.0);
            for _ in 1..failing_polls {
                assert_eq!(rig.tick(poll_interval), TickOutcome::Busy);
                assert!(rig.body.impulses.is_empty());
            }
            rig.body.grounded = true;
            if failing_polls > 0 {
                assert!(rig.body.impulses.is_empty());
                rig.tick(poll_interval);
            }
            assert_eq!(rig.body.impulses.len(), 1, "failing_polls={failing_polls}");

            rig.drain(0.1, 1_000);
            assert_eq!(rig.body.impulses.len(), 1);
        }
    }

    #[test]
    fn ground_is_only_polled_on_the_interval() {
        let mut rig = Rig::new(PlaybackTuning {
            ground_wait_timeout: None,
            ..PlaybackTuning::default()
        });
        rig.body.grounded = false;
        let mut queue = queue_of(&[Jump]);
        rig.executor.run(&mut queue);
        rig.tick(0.0);

        rig.body.grounded = true;
        rig.tick(0.2);
        assert!(rig.body.impulses.is_empty());
        rig.tick(0.2);
        assert!(rig.body.impulses.is_empty());
        rig.tick(0.1);
        assert_eq!(rig.body.impulses.len(), 1);
    }

    #[test]
    fn jump_impulse_direction_follows_kind_and_tuning() {
        let mut rig = Rig::new(PlaybackTuning {
            jump_force: 5.0,
            horizontal_force: 2.0,
            jump_drift: -2.0,
            ..PlaybackTuning::default()
        });
        let mut queue = queue_of(&[Jump, JumpLeft, JumpRight]);
        rig.executor.run(&mut queue);
        rig.drain(0.1, 1_000);

        assert_eq!(
            rig.body.impulses,
            vec![
                Vec2 { x: -2.0, y: 5.0 },
                Vec2 { x: -2.0, y: 5.0 },
                Vec2 { x: 2.0, y: 5.0 },
            ]
        );
    }

    #[test]
    fn settle_period_delays_next_token() {
        let mut rig = Rig::new(PlaybackTuning {
            settle_duration: 1.5,
            ..PlaybackTuning::default()
        });
        let mut queue = queue_of(&[Jump, Wait]);
        rig.executor.run(&mut queue);

        rig.tick(0.0);
        for _ in 0..5 {
            rig.tick(0.25);
            assert_eq!(rig.executor.current_token(), Some(Jump));
        }
        rig.tick(0.25);
        assert_eq!(rig.executor.current_token(), Some(Wait));
    }

    #[test]
    fn wait_suspends_for_move_duration() {
        let mut rig = Rig::new(PlaybackTuning {
            move_duration: 1.0,
            ..PlaybackTuning::default()
        });
        let mut queue = queue_of(&[Wait]);
        rig.executor.run(&mut queue);

        assert_eq!(rig.tick(0.0), TickOutcome::Busy);
        let ticks = rig.drain(0.25, 100);
        assert_eq!(ticks, 4);
        assert_eq!(rig.body.position, Vec2::default());
    }

    #[test]
    fn long_timers_finish_on_the_exact_tick() {
        let dt = 1.0 / 60.0;
        let mut rig = Rig::new(PlaybackTuning {
            move_duration: 5.0,
            ..PlaybackTuning::default()
        });
        let mut queue = queue_of(&[MoveRight]);
        rig.executor.run(&mut queue);
        assert_eq!(rig.tick(0.0), TickOutcome::Busy);
        assert_eq!(rig.drain(dt, 10_000), 150);
        assert_eq!(rig.body.position.x, 2.0);

        let mut rig = Rig::new(PlaybackTuning {
            move_duration: 30.0,
            ..PlaybackTuning::default()
        });
        let mut queue = queue_of(&[Wait]);
        rig.executor.run(&mut queue);
        assert_eq!(rig.tick(0.0), TickOutcome::Busy);
        assert_eq!(rig.drain(dt, 10_000), 1800);
    }

    #[test]
    fn zero_length_actions_chain_within_one_tick() {
        let mut rig = Rig::new(PlaybackTuning {
            move_duration: 0.0,
            ..PlaybackTuning::default()
        });
        let mut queue = queue_of(&[Wait, MoveRight, Wait]);
        rig.executor.run(&mut queue);

        assert_eq!(rig.tick(0.016), TickOutcome::Drained);
        assert_eq!(rig.completed_tokens(), vec![Wait, MoveRight, Wait]);
        assert_eq!(rig.body.position.x, 2.0);
    }

    #[test]
    fn long_ground_wait_reports_stall_once() {
        let mut rig = Rig::new(PlaybackTuning {
            stall_report_after: 2.0,
            ground_wait_timeout: None,
            ..PlaybackTuning::default()
        });
        rig.body.grounded = false;
        let mut queue = queue_of(&[Jump]);
        rig.executor.run(&mut queue);

        rig.tick(0.0);
        for _ in 0..20 {
            rig.tick(0.5);
        }

        let stalls = rig
            .events
            .iter()
            .filter(|event| matches!(event, PlaybackEvent::Stalled { .. }))
            .count();
        assert_eq!(stalls, 1);
        assert!(rig.executor.is_stalled());
        assert!(rig.executor.is_draining());
    }

    #[test]
    fn ground_wait_timeout_abandons_jump_and_continues() {
        let mut rig = Rig::new(PlaybackTuning {
            ground_wait_timeout: Some(3.0),
            ..PlaybackTuning::default()
        });
        rig.body.grounded = false;
        let mut queue = queue_of(&[JumpRight, MoveRight]);
        rig.executor.run(&mut queue);
        rig.drain(0.5, 1_000);

        assert!(rig.body.impulses.is_empty());
        assert!(rig
            .events
            .iter()
            .any(|event| matches!(event, PlaybackEvent::GroundWaitTimedOut { token: JumpRight, .. })));
        assert_eq!(rig.completed_tokens(), vec![JumpRight, MoveRight]);
        assert!(!rig.executor.is_stalled());
    }

    #[test]
    fn cancel_snaps_in_flight_move_and_discards_rest() {
        let mut rig = Rig::new(PlaybackTuning::default());
        let mut queue = queue_of(&[MoveRight, Wait, Jump]);
        rig.executor.run(&mut queue);
        rig.tick(0.0);
        rig.tick(0.1);

        assert!(rig.executor.cancel(&mut rig.body, &mut rig.events));
        assert_eq!(rig.body.position.x, 2.0);
        assert!(!rig.executor.is_draining());
        assert_eq!(
            rig.events.last(),
            Some(&PlaybackEvent::Cancelled { discarded: 3 })
        );
        assert!(!rig.executor.cancel(&mut rig.body, &mut rig.events));
    }
}
