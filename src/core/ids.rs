//! Identifiers for battle objects.
//!
//! Every creature and consumable item in a battle has a unique id allocated
//! by the `BattleState`. Ids are never reused within a battle, so a creature
//! that leaves the field can never be confused with a later one.
//!
//! ```
//! use creature_battle::core::{CreatureId, ItemId};
//!
//! let creature = CreatureId::new(3);
//! let item = ItemId::new(3);
//!
//! assert_eq!(creature.raw(), 3);
//! assert_eq!(format!("{creature}"), "Creature(3)");
//! assert_eq!(format!("{item}"), "Item(3)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a creature instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

impl CreatureId {
    /// Create a new creature ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Creature({})", self.0)
    }
}

/// Unique identifier for a tool or spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Create a new item ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Item({})", self.0)
    }
}

/// Monotonic id allocator shared by creatures and items.
///
/// Both id spaces draw from the same counter so log lines stay unambiguous.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Create an allocator starting at `start`.
    #[must_use]
    pub const fn starting_at(start: u32) -> Self {
        Self { next: start }
    }

    /// Allocate a creature id.
    pub fn creature(&mut self) -> CreatureId {
        CreatureId(self.bump())
    }

    /// Allocate an item id.
    pub fn item(&mut self) -> ItemId {
        ItemId(self.bump())
    }

    fn bump(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creature_id() {
        let id = CreatureId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(format!("{}", id), "Creature(7)");
    }

    #[test]
    fn test_creature_id_default() {
        assert_eq!(CreatureId::default(), CreatureId(0));
    }

    #[test]
    fn test_item_id() {
        let id = ItemId::new(2);
        assert_eq!(id.raw(), 2);
        assert_eq!(format!("{}", id), "Item(2)");
    }

    #[test]
    fn test_allocator_never_repeats() {
        let mut ids = IdAllocator::default();
        let a = ids.creature();
        let b = ids.item();
        let c = ids.creature();

        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);
        assert_eq!(c.raw(), 2);
    }

    #[test]
    fn test_allocator_starting_at() {
        let mut ids = IdAllocator::starting_at(100);
        assert_eq!(ids.creature(), CreatureId(100));
    }
}
