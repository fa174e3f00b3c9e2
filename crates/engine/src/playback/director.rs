use tracing::{debug, info};

use super::actor::{ActorController, ActorRole};
use super::body::{ActorBody, ViewportMetrics};
use super::command::CommandToken;
use super::executor::{PlaybackEvent, RunOutcome, TickOutcome};
use super::planner::MovementPlanner;
use super::queue::CommandQueue;
use super::sequencer::ScriptedSequencer;
use super::slots::CommandSlots;
use super::tuning::PlaybackTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Planning,
    PlayerPlayback,
    AdversaryPlayback,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    PlayerWins,
    AdversaryWins,
}

impl MatchOutcome {
    pub fn banner(self) -> &'static str {
        match self {
            Self::PlayerWins => "Player Wins!!",
            Self::AdversaryWins => "Enemy Wins...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnEvent {
    Player(PlaybackEvent),
    Adversary(PlaybackEvent),
    AdversaryTurnStarted { turn: u32, planned: usize },
    TurnCompleted { turn: u32 },
    Resolved { outcome: MatchOutcome },
}

#[derive(Debug, Clone, Default)]
pub struct TurnSetup {
    pub player_tuning: PlaybackTuning,
    pub adversary_tuning: PlaybackTuning,
    pub max_inputs_per_turn: Option<usize>,
    pub sequencer: ScriptedSequencer,
}

/// Alternates player playback and scripted adversary playback.
///
/// A turn is the player's drain followed by the adversary's drain. Input
/// recorded while either actor plays edits the plan for the next turn.
#[derive(Debug)]
pub struct TurnDirector {
    phase: TurnPhase,
    planner: MovementPlanner,
    player: ActorController,
    adversary: ActorController,
    sequencer: ScriptedSequencer,
    adversary_queue: CommandQueue,
    outcome: Option<MatchOutcome>,
    scratch: Vec<PlaybackEvent>,
}

impl TurnDirector {
    pub fn new(setup: TurnSetup) -> Self {
        Self {
            phase: TurnPhase::Planning,
            planner: MovementPlanner::new(setup.max_inputs_per_turn),
            player: ActorController::new(ActorRole::Player, setup.player_tuning),
            adversary: ActorController::new(ActorRole::Adversary, setup.adversary_tuning),
            sequencer: setup.sequencer,
            adversary_queue: CommandQueue::new(),
            outcome: None,
            scratch: Vec::new(),
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub fn planner(&self) -> &MovementPlanner {
        &self.planner
    }

    pub fn player(&self) -> &ActorController {
        &self.player
    }

    pub fn adversary(&self) -> &ActorController {
        &self.adversary
    }

    pub fn sequencer(&self) -> &ScriptedSequencer {
        &self.sequencer
    }

    /// Number of completed player playbacks.
    pub fn turn(&self) -> u32 {
        self.player.state().turn_counter
    }

    pub fn accepts_input(&self) -> bool {
        self.phase != TurnPhase::Resolved
    }

    pub fn record_input(&mut self, token: CommandToken) -> bool {
        self.accepts_input() && self.planner.record_input(token)
    }

    pub fn undo_last(&mut self) -> Option<CommandToken> {
        if !self.accepts_input() {
            return None;
        }
        self.planner.undo_last()
    }

    pub fn clear_plan(&mut self) {
        if self.accepts_input() {
            self.planner.clear_all();
        }
    }

    pub fn load_slots(&mut self, slots: &CommandSlots) -> usize {
        if !self.accepts_input() {
            return 0;
        }
        self.planner.rebuild_from_slots(slots)
    }

    /// Starts the player's playback. Only honored while planning.
    pub fn trigger(&mut self) -> RunOutcome {
        match self.phase {
            TurnPhase::Planning => {}
            TurnPhase::Resolved => return RunOutcome::IgnoredDisabled,
            TurnPhase::PlayerPlayback | TurnPhase::AdversaryPlayback => {
                debug!(phase = ?self.phase, "trigger_ignored_busy");
                return RunOutcome::IgnoredBusy;
            }
        }

        let outcome = self.planner.submit_to(&mut self.player);
        if let RunOutcome::Started { queued } = outcome {
            self.phase = TurnPhase::PlayerPlayback;
            info!(turn = self.turn() + 1, queued, "player_turn_started");
        }
        outcome
    }

    pub fn tick(
        &mut self,
        dt_seconds: f32,
        player_body: &mut dyn ActorBody,
        adversary_body: &mut dyn ActorBody,
        viewport: &dyn ViewportMetrics,
        events: &mut Vec<TurnEvent>,
    ) {
        // Adversary first so a drain that starts this tick dispatches on the next one.
        let adversary_outcome =
            self.adversary
                .tick(dt_seconds, adversary_body, viewport, &mut self.scratch);
        events.extend(self.scratch.drain(..).map(TurnEvent::Adversary));

        let player_outcome = self
            .player
            .tick(dt_seconds, player_body, viewport, &mut self.scratch);
        events.extend(self.scratch.drain(..).map(TurnEvent::Player));

        if self.phase == TurnPhase::AdversaryPlayback && adversary_outcome == TickOutcome::Drained
        {
            self.finish_turn(events);
        }
        if self.phase == TurnPhase::PlayerPlayback && player_outcome == TickOutcome::Drained {
            self.start_adversary_turn(events);
        }
    }

    fn start_adversary_turn(&mut self, events: &mut Vec<TurnEvent>) {
        let turn = self.turn();
        let planned = self.sequencer.plan_for_turn(turn, &mut self.adversary_queue);
        events.push(TurnEvent::AdversaryTurnStarted { turn, planned });
        info!(turn, planned, "adversary_turn_started");

        if self.adversary.run(&mut self.adversary_queue).started() {
            self.phase = TurnPhase::AdversaryPlayback;
        } else {
            self.finish_turn(events);
        }
    }

    fn finish_turn(&mut self, events: &mut Vec<TurnEvent>) {
        let turn = self.turn();
        self.phase = TurnPhase::Planning;
        events.push(TurnEvent::TurnCompleted { turn });
        info!(turn, "turn_completed");
    }

    /// Ends the match. Both actors stop and ignore further runs.
    pub fn resolve(
        &mut self,
        outcome: MatchOutcome,
        player_body: &mut dyn ActorBody,
        adversary_body: &mut dyn ActorBody,
        events: &mut Vec<TurnEvent>,
    ) -> bool {
        if self.phase == TurnPhase::Resolved {
            return false;
        }

        self.player.set_enabled(false);
        self.adversary.set_enabled(false);
        self.player.cancel(player_body, &mut self.scratch);
        events.extend(self.scratch.drain(..).map(TurnEvent::Player));
        self.adversary.cancel(adversary_body, &mut self.scratch);
        events.extend(self.scratch.drain(..).map(TurnEvent::Adversary));
        self.adversary_queue.clear();

        self.phase = TurnPhase::Resolved;
        self.outcome = Some(outcome);
        events.push(TurnEvent::Resolved { outcome });
        info!(outcome = outcome.banner(), turn = self.turn(), "match_resolved");
        true
    }
}
