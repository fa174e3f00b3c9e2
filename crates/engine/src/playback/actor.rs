use tracing::{debug, info};

use super::body::{ActorBody, ViewportMetrics};
use super::executor::{
    CommandExecutor, ExecutionContext, PlaybackEvent, RunOutcome, TickOutcome,
};
use super::queue::CommandQueue;
use super::sensor::GroundSensor;
use super::tuning::PlaybackTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorRole {
    Player,
    Adversary,
}

impl ActorRole {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Adversary => "adversary",
        }
    }
}

/// Per-actor mutable state. `grounded` is derived each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorState {
    pub grounded: bool,
    pub executing: bool,
    pub turn_counter: u32,
    pub enabled: bool,
}

impl Default for ActorState {
    fn default() -> Self {
        Self {
            grounded: true,
            executing: false,
            turn_counter: 0,
            enabled: true,
        }
    }
}

#[derive(Debug)]
pub struct ActorController {
    role: ActorRole,
    state: ActorState,
    sensor: GroundSensor,
    executor: CommandExecutor,
}

impl ActorController {
    pub fn new(role: ActorRole, tuning: PlaybackTuning) -> Self {
        Self {
            role,
            state: ActorState::default(),
            sensor: GroundSensor::default(),
            executor: CommandExecutor::new(role.as_token(), tuning),
        }
    }

    pub fn role(&self) -> ActorRole {
        self.role
    }

    pub fn state(&self) -> &ActorState {
        &self.state
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    pub fn is_executing(&self) -> bool {
        self.state.executing
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.state.enabled != enabled {
            info!(actor = self.role.as_token(), enabled, "actor_enabled_changed");
        }
        self.state.enabled = enabled;
    }

    pub fn run(&mut self, queue: &mut CommandQueue) -> RunOutcome {
        if !self.state.enabled {
            debug!(actor = self.role.as_token(), "run_ignored_disabled");
            return RunOutcome::IgnoredDisabled;
        }
        if self.state.executing {
            debug!(actor = self.role.as_token(), "run_ignored_busy");
            return RunOutcome::IgnoredBusy;
        }

        let outcome = self.executor.run(queue);
        if outcome.started() {
            self.state.executing = true;
        }
        outcome
    }

    pub fn tick(
        &mut self,
        dt_seconds: f32,
        body: &mut dyn ActorBody,
        viewport: &dyn ViewportMetrics,
        events: &mut Vec<PlaybackEvent>,
    ) -> TickOutcome {
        self.state.grounded = self.sensor.refresh(body);

        let mut ctx = ExecutionContext {
            body,
            sensor: &mut self.sensor,
            viewport,
        };
        let outcome = self.executor.tick(dt_seconds, &mut ctx, events);
        self.state.grounded = self.sensor.is_grounded();

        if outcome == TickOutcome::Drained {
            self.state.executing = false;
            if self.role == ActorRole::Player {
                self.state.turn_counter = self.state.turn_counter.saturating_add(1);
            }
            info!(
                actor = self.role.as_token(),
                turn_counter = self.state.turn_counter,
                "actor_playback_complete"
            );
        }
        outcome
    }

    pub fn cancel(&mut self, body: &mut dyn ActorBody, events: &mut Vec<PlaybackEvent>) -> bool {
        let cancelled = self.executor.cancel(body, events);
        self.state.executing = false;
        cancelled
    }
}
