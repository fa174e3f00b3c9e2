mod actor;
mod body;
mod command;
mod director;
mod executor;
mod planner;
mod queue;
mod sensor;
mod sequencer;
mod slots;
mod tuning;

pub use actor::{ActorController, ActorRole, ActorState};
pub use body::{move_distance, ActorBody, ViewportMetrics};
pub use command::{CommandToken, ParseCommandError};
pub use director::{MatchOutcome, TurnDirector, TurnEvent, TurnPhase, TurnSetup};
pub use executor::{CommandExecutor, ExecutionContext, PlaybackEvent, RunOutcome, TickOutcome};
pub use planner::{plan_summary, MovementPlanner};
pub use queue::{CommandList, CommandQueue, QueueError};
pub use sensor::GroundSensor;
pub use sequencer::ScriptedSequencer;
pub use slots::{CommandSlots, DragSession, DragSource, DropResult};
pub use tuning::{
    PlaybackTuning, DEFAULT_GROUND_POLL_INTERVAL_SECONDS, DEFAULT_GROUND_WAIT_TIMEOUT_SECONDS,
    DEFAULT_HORIZONTAL_FORCE, DEFAULT_JUMP_FORCE, DEFAULT_MOVE_DURATION_SECONDS,
    DEFAULT_MOVE_SPEED_SCALE, DEFAULT_SETTLE_DURATION_SECONDS, DEFAULT_STALL_REPORT_AFTER_SECONDS,
};
