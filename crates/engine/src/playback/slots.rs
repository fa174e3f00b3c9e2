use tracing::debug;

use super::command::CommandToken;

/// Fixed row of command boxes a tile can be dropped into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSlots {
    slots: Vec<Option<CommandToken>>,
}

impl CommandSlots {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<CommandToken> {
        self.slots.get(index).copied().flatten()
    }

    /// Returns the token previously in the slot. Out-of-range is a no-op.
    pub fn place(&mut self, index: usize, token: CommandToken) -> Option<CommandToken> {
        let slot = self.slots.get_mut(index)?;
        slot.replace(token)
    }

    pub fn clear_slot(&mut self, index: usize) -> Option<CommandToken> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn filled(&self) -> impl Iterator<Item = CommandToken> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    Palette(CommandToken),
    Slot(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropResult {
    Placed { slot: usize, replaced: Option<CommandToken> },
    Returned,
    Discarded,
}

/// One drag gesture, from pick-up to drop. Owned by whoever handles input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    source: DragSource,
    token: CommandToken,
}

impl DragSession {
    /// Picks a tile up. Dragging from an empty slot starts nothing.
    pub fn begin(source: DragSource, slots: &CommandSlots) -> Option<Self> {
        let token = match source {
            DragSource::Palette(token) => token,
            DragSource::Slot(index) => slots.get(index)?,
        };
        debug!(token = token.as_token(), ?source, "drag_begin");
        Some(Self { source, token })
    }

    pub fn token(&self) -> CommandToken {
        self.token
    }

    pub fn source(&self) -> DragSource {
        self.source
    }

    /// Palette tiles are copied into the target; slot tiles are moved.
    /// A drop outside every slot leaves slot tiles where they were.
    pub fn drop_on(self, target: Option<usize>, slots: &mut CommandSlots) -> DropResult {
        let Some(target) = target.filter(|index| *index < slots.len()) else {
            return self.cancel();
        };

        if let DragSource::Slot(origin) = self.source {
            if origin == target {
                return DropResult::Returned;
            }
            slots.clear_slot(origin);
        }
        let replaced = slots.place(target, self.token);
        debug!(token = self.token.as_token(), slot = target, "drag_drop");
        DropResult::Placed {
            slot: target,
            replaced,
        }
    }

    pub fn cancel(self) -> DropResult {
        match self.source {
            DragSource::Palette(_) => DropResult::Discarded,
            DragSource::Slot(_) => DropResult::Returned,
        }
    }
}
