//! Battle sides and per-side data storage.
//!
//! ## Side
//!
//! A battle always has exactly two sides: the human-controlled `Player`
//! and the AI-controlled `Enemy`.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`, used for everything that exists
//! once per side (board, energy, effect timeline stamps).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two battle sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Human-controlled side. Acts first.
    Player,
    /// AI-controlled side.
    Enemy,
}

impl Side {
    /// Both sides in turn order.
    pub const ALL: [Side; 2] = [Side::Player, Side::Enemy];

    /// The opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Slot index (0 for player, 1 for enemy).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Enemy => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "Player"),
            Side::Enemy => write!(f, "Enemy"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use creature_battle::core::{Side, SideMap};
///
/// let mut energy: SideMap<u32> = SideMap::new(|_| 10);
/// energy[Side::Enemy] = 7;
///
/// assert_eq!(energy[Side::Player], 10);
/// assert_eq!(energy[Side::Enemy], 7);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a new SideMap with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::Player), factory(Side::Enemy)],
        }
    }

    /// Create a SideMap from explicit player and enemy values.
    pub fn from_pair(player: T, enemy: T) -> Self {
        Self { data: [player, enemy] }
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Borrow both sides mutably, the acting side first.
    pub fn split_mut(&mut self, acting: Side) -> (&mut T, &mut T) {
        let [player, enemy] = &mut self.data;
        match acting {
            Side::Player => (player, enemy),
            Side::Enemy => (enemy, player),
        }
    }

    /// Iterate over (Side, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Side, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::ALL.into_iter().zip(self.data.iter_mut())
    }

    /// Map values to a new SideMap.
    pub fn map<U>(&self, f: impl Fn(Side, &T) -> U) -> SideMap<U> {
        SideMap {
            data: [f(Side::Player, &self.data[0]), f(Side::Enemy, &self.data[1])],
        }
    }
}

impl<T: Default> Default for SideMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
