use std::collections::BTreeMap;

use tracing::debug;

use super::command::CommandToken;
use super::queue::CommandQueue;

/// Turn-indexed script for the non-player actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedSequencer {
    table: BTreeMap<u32, Vec<CommandToken>>,
}

impl Default for ScriptedSequencer {
    fn default() -> Self {
        use CommandToken::*;
        Self::from_turns([
            (1, vec![MoveLeft, MoveLeft, Wait]),
            (2, vec![Jump, MoveLeft, MoveLeft]),
        ])
    }
}

impl ScriptedSequencer {
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    pub fn from_turns(turns: impl IntoIterator<Item = (u32, Vec<CommandToken>)>) -> Self {
        Self {
            table: turns.into_iter().collect(),
        }
    }

    /// Returns the previous plan for the turn, if any.
    pub fn insert_turn(&mut self, turn: u32, plan: Vec<CommandToken>) -> Option<Vec<CommandToken>> {
        self.table.insert(turn, plan)
    }

    pub fn scripted_turns(&self) -> usize {
        self.table.len()
    }

    pub fn plan(&self, turn: u32) -> &[CommandToken] {
        self.table.get(&turn).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Clears the queue and fills it with the turn's plan. Turns without an
    /// entry leave the queue empty.
    pub fn plan_for_turn(&self, turn: u32, queue: &mut CommandQueue) -> usize {
        let plan = self.plan(turn);
        queue.rebuild_from(plan);
        debug!(turn, planned = plan.len(), "adversary_planned");
        plan.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CommandToken::*;

    #[test]
    fn default_table_matches_two_scripted_turns() {
        let sequencer = ScriptedSequencer::default();
        assert_eq!(sequencer.scripted_turns(), 2);
        assert_eq!(sequencer.plan(1), &[MoveLeft, MoveLeft, Wait]);
        assert_eq!(sequencer.plan(2), &[Jump, MoveLeft, MoveLeft]);
    }

    #[test]
    fn plan_for_turn_replaces_queue_contents() {
        let sequencer = ScriptedSequencer::default();
        let mut queue: CommandQueue = [JumpRight, JumpRight].into_iter().collect();

        assert_eq!(sequencer.plan_for_turn(2, &mut queue), 3);
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![Jump, MoveLeft, MoveLeft]);
    }

    #[test]
    fn unscripted_turn_yields_empty_plan() {
        let sequencer = ScriptedSequencer::default();
        let mut queue: CommandQueue = [Wait].into_iter().collect();

        assert_eq!(sequencer.plan_for_turn(0, &mut queue), 0);
        assert!(queue.is_empty());
        assert!(sequencer.plan(9).is_empty());
    }

    #[test]
    fn insert_turn_overrides_existing_entry() {
        let mut sequencer = ScriptedSequencer::empty();
        assert_eq!(sequencer.insert_turn(3, vec![Wait]), None);
        assert_eq!(sequencer.insert_turn(3, vec![JumpLeft]), Some(vec![Wait]));
        assert_eq!(sequencer.plan(3), &[JumpLeft]);
    }
}
