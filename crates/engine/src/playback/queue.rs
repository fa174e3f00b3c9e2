use std::collections::VecDeque;

use thiserror::Error;

use super::command::CommandToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("dequeue on an empty command queue")]
    Empty,
}

/// FIFO of planned commands. Insertion order is execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandQueue {
    tokens: VecDeque<CommandToken>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, token: CommandToken) {
        self.tokens.push_back(token);
    }

    pub fn dequeue(&mut self) -> Result<CommandToken, QueueError> {
        self.tokens.pop_front().ok_or(QueueError::Empty)
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn rebuild_from(&mut self, ordered: &[CommandToken]) {
        self.tokens.clear();
        self.tokens.extend(ordered.iter().copied());
    }

    /// Moves every token out, leaving this queue empty.
    pub fn take(&mut self) -> CommandQueue {
        std::mem::take(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = CommandToken> + '_ {
        self.tokens.iter().copied()
    }
}

impl FromIterator<CommandToken> for CommandQueue {
    fn from_iter<I: IntoIterator<Item = CommandToken>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

/// Indexable mirror of the planning queue, used for undo and display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandList {
    tokens: Vec<CommandToken>,
}

impl CommandList {
    pub fn push(&mut self, token: CommandToken) {
        self.tokens.push(token);
    }

    pub fn remove_at(&mut self, index: usize) -> Option<CommandToken> {
        if index >= self.tokens.len() {
            return None;
        }
        Some(self.tokens.remove(index))
    }

    pub fn pop_last(&mut self) -> Option<CommandToken> {
        self.tokens.pop()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<CommandToken> {
        self.tokens.get(index).copied()
    }

    pub fn as_slice(&self) -> &[CommandToken] {
        &self.tokens
    }
}
