use tracing::debug;

use super::actor::ActorController;
use super::command::CommandToken;
use super::executor::RunOutcome;
use super::queue::{CommandList, CommandQueue};
use super::slots::CommandSlots;

/// Collects player input into the plan for the next playback.
///
/// The list and the queue always hold the same tokens in the same order;
/// edits go to the list first and the queue is rebuilt from it.
#[derive(Debug, Clone, Default)]
pub struct MovementPlanner {
    list: CommandList,
    queue: CommandQueue,
    max_inputs_per_turn: Option<usize>,
}

impl MovementPlanner {
    pub fn new(max_inputs_per_turn: Option<usize>) -> Self {
        Self {
            list: CommandList::default(),
            queue: CommandQueue::new(),
            max_inputs_per_turn,
        }
    }

    pub fn max_inputs_per_turn(&self) -> Option<usize> {
        self.max_inputs_per_turn
    }

    pub fn list(&self) -> &CommandList {
        &self.list
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn is_full(&self) -> bool {
        self.max_inputs_per_turn
            .is_some_and(|cap| self.list.len() >= cap)
    }

    /// Returns false when the per-turn cap is already reached.
    pub fn record_input(&mut self, token: CommandToken) -> bool {
        if self.is_full() {
            debug!(
                token = token.as_token(),
                planned = self.list.len(),
                "plan_input_capped"
            );
            return false;
        }
        self.list.push(token);
        self.queue.enqueue(token);
        debug!(token = token.as_token(), planned = self.list.len(), "plan_input_recorded");
        true
    }

    pub fn undo_last(&mut self) -> Option<CommandToken> {
        let removed = self.list.pop_last()?;
        self.queue.rebuild_from(self.list.as_slice());
        Some(removed)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<CommandToken> {
        let removed = self.list.remove_at(index)?;
        self.queue.rebuild_from(self.list.as_slice());
        Some(removed)
    }

    pub fn clear_all(&mut self) {
        self.list.clear();
        self.queue.clear();
    }

    /// Replaces the plan with the filled slots, in slot order.
    pub fn rebuild_from_slots(&mut self, slots: &CommandSlots) -> usize {
        self.clear_all();
        for token in slots.filled() {
            if !self.record_input(token) {
                break;
            }
        }
        self.list.len()
    }

    /// Hands the queue to the actor. The list is cleared once playback starts.
    pub fn submit_to(&mut self, actor: &mut ActorController) -> RunOutcome {
        let outcome = actor.run(&mut self.queue);
        if outcome.started() {
            self.list.clear();
        }
        outcome
    }

    pub fn summary(&self) -> String {
        plan_summary(self.list.as_slice(), self.max_inputs_per_turn)
    }
}

pub fn plan_summary(tokens: &[CommandToken], cap: Option<usize>) -> String {
    let header = match cap {
        Some(cap) => format!("Plan {}/{}", tokens.len(), cap),
        None => "Plan".to_string(),
    };
    if tokens.is_empty() {
        return format!("{header}: (empty)");
    }
    let labels = tokens
        .iter()
        .map(|token| token.label())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{header}: {labels}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{ActorRole, PlaybackTuning};
    use CommandToken::*;

    #[test]
    fn cap_rejects_fourth_input() {
        let mut planner = MovementPlanner::new(Some(3));
        assert!(planner.record_input(MoveLeft));
        assert!(planner.record_input(MoveRight));
        assert!(planner.record_input(Jump));
        assert!(!planner.record_input(Wait));

        assert_eq!(planner.list().as_slice(), &[MoveLeft, MoveRight, Jump]);
        assert_eq!(planner.queue().len(), 3);
    }

    #[test]
    fn uncapped_planner_accepts_everything() {
        let mut planner = MovementPlanner::new(None);
        for _ in 0..20 {
            assert!(planner.record_input(Wait));
        }
        assert_eq!(planner.list().len(), 20);
        assert!(!planner.is_full());
    }

    #[test]
    fn undo_last_rebuilds_queue_from_list() {
        let mut planner = MovementPlanner::new(None);
        planner.record_input(MoveLeft);
        planner.record_input(MoveRight);
        planner.record_input(Jump);

        assert_eq!(planner.undo_last(), Some(Jump));
        assert_eq!(planner.list().as_slice(), &[MoveLeft, MoveRight]);
        let mut queue = planner.queue().clone();
        assert_eq!(queue.dequeue(), Ok(MoveLeft));
        assert_eq!(queue.dequeue(), Ok(MoveRight));
        assert!(queue.is_empty());
    }

    #[test]
    fn undo_on_empty_plan_is_none() {
        let mut planner = MovementPlanner::new(Some(3));
        assert_eq!(planner.undo_last(), None);
        assert!(planner.queue().is_empty());
    }

    #[test]
    fn remove_at_keeps_queue_in_sync() {
        let mut planner = MovementPlanner::new(None);
        planner.record_input(Wait);
        planner.record_input(JumpLeft);
        planner.record_input(MoveRight);

        assert_eq!(planner.remove_at(1), Some(JumpLeft));
        assert_eq!(
            planner.queue().iter().collect::<Vec<_>>(),
            planner.list().as_slice().to_vec()
        );
    }

    #[test]
    fn clear_all_empties_both() {
        let mut planner = MovementPlanner::new(Some(3));
        planner.record_input(Jump);
        planner.clear_all();
        assert!(planner.list().is_empty());
        assert!(planner.queue().is_empty());
        assert!(planner.record_input(Wait));
    }

    #[test]
    fn submit_hands_off_plan_and_clears_list() {
        let mut planner = MovementPlanner::new(Some(3));
        let mut actor = ActorController::new(ActorRole::Player, PlaybackTuning::default());
        planner.record_input(MoveRight);
        planner.record_input(Wait);

        assert_eq!(planner.submit_to(&mut actor), RunOutcome::Started { queued: 2 });
        assert!(planner.list().is_empty());
        assert!(planner.queue().is_empty());
        assert_eq!(actor.executor().pending_tokens(), vec![MoveRight, Wait]);

        planner.record_input(Jump);
        assert_eq!(planner.submit_to(&mut actor), RunOutcome::IgnoredBusy);
        assert_eq!(planner.list().as_slice(), &[Jump]);
        assert_eq!(planner.queue().len(), 1);
    }

    #[test]
    fn rebuild_from_slots_respects_slot_order_and_cap() {
        let mut slots = CommandSlots::new(5);
        slots.place(4, MoveLeft);
        slots.place(0, Jump);
        slots.place(2, Wait);
        slots.place(3, MoveRight);

        let mut planner = MovementPlanner::new(Some(3));
        planner.record_input(JumpRight);
        assert_eq!(planner.rebuild_from_slots(&slots), 3);
        assert_eq!(planner.list().as_slice(), &[Jump, Wait, MoveRight]);
    }

    #[test]
    fn summary_lists_labels_with_cap() {
        let mut planner = MovementPlanner::new(Some(3));
        assert_eq!(planner.summary(), "Plan 0/3: (empty)");
        planner.record_input(MoveLeft);
        planner.record_input(JumpRight);
        assert_eq!(planner.summary(), "Plan 2/3: Left, Jump Right");
        assert_eq!(plan_summary(&[Wait], None), "Plan: Wait");
    }
}
