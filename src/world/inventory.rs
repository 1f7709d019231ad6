use serde::Serialize;

use crate::composter::ItemKind;

pub const MAX_STACK_SIZE: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryType {
    Hopper,
    Chest,
}

impl InventoryType {
    pub fn size(&self) -> usize {
        match self {
            Self::Hopper => 5,
            Self::Chest => 27,
        }
    }
}

/// Runtime item instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub count: u32,
}

impl ItemStack {
    pub fn new(kind: ItemKind, count: u32) -> Self {
        Self { kind, count }
    }
}

/// Takes one unit out of `slot`, clearing it once the stack runs out.
///
/// Returns whether there was anything to take.
pub fn take_one(slot: &mut Option<ItemStack>) -> bool {
    let Some(stack) = slot else {
        return false;
    };

    if stack.count <= 1 {
        *slot = None;
    } else {
        stack.count -= 1;
    }
    true
}

/// Fixed-size block inventory, empty slots are `None`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inventory {
    pub kind: InventoryType,
    pub slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    pub fn new(kind: InventoryType) -> Self {
        Self {
            kind,
            slots: vec![None; kind.size()],
        }
    }

    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// First slot (by index) holding `kind`.
    pub fn first_slot_of(&self, kind: &ItemKind) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|stack| &stack.kind == kind))
    }

    pub fn first_non_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_some)
    }

    /// Removes a single unit from `slot`.
    pub fn remove_one(&mut self, slot: usize) -> bool {
        self.slots.get_mut(slot).is_some_and(take_one)
    }

    /// Whether at least one unit of `kind` would fit.
    pub fn has_room_for(&self, kind: &ItemKind) -> bool {
        self.slots.iter().any(|s| match s {
            None => true,
            Some(stack) => &stack.kind == kind && stack.count < MAX_STACK_SIZE,
        })
    }

    /// Stacks `count` units of `kind` into the inventory: existing stacks of the
    /// same kind first, then empty slots.
    ///
    /// Returns how many units did not fit.
    pub fn add(&mut self, kind: &ItemKind, mut count: u32) -> u32 {
        for stack in self.slots.iter_mut().flatten() {
            if count == 0 {
                break;
            }
            if &stack.kind == kind && stack.count < MAX_STACK_SIZE {
                let moved = count.min(MAX_STACK_SIZE - stack.count);
                stack.count += moved;
                count -= moved;
            }
        }

        for slot in self.slots.iter_mut().filter(|s| s.is_none()) {
            if count == 0 {
                break;
            }
            let moved = count.min(MAX_STACK_SIZE);
            *slot = Some(ItemStack::new(kind.clone(), moved));
            count -= moved;
        }

        count
    }

    pub fn count_of(&self, kind: &ItemKind) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| &s.kind == kind)
            .map(|s| s.count)
            .sum()
    }
}
