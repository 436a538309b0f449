//! Dice colors, the per-player dice pool, and structured costs.
//!
//! Dice pools are multisets of colored tokens. `Omni` is the wildcard color:
//! it pays for any requirement. Costs are structured requirements folded
//! through the value pipeline before payment, so discounts compose
//! deterministically.

use serde::{Deserialize, Serialize};

/// A dice color: seven elements plus the wildcard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiceColor {
    Cryo,
    Hydro,
    Pyro,
    Electro,
    Geo,
    Dendro,
    Anemo,
    /// Wildcard - pays for any color requirement.
    Omni,
}

impl DiceColor {
    /// The seven element colors, in the fixed default order.
    pub const ELEMENTS: [DiceColor; 7] = [
        DiceColor::Cryo,
        DiceColor::Hydro,
        DiceColor::Pyro,
        DiceColor::Electro,
        DiceColor::Geo,
        DiceColor::Dendro,
        DiceColor::Anemo,
    ];

    /// All colors that can be rolled, wildcard included.
    pub const ALL: [DiceColor; 8] = [
        DiceColor::Cryo,
        DiceColor::Hydro,
        DiceColor::Pyro,
        DiceColor::Electro,
        DiceColor::Geo,
        DiceColor::Dendro,
        DiceColor::Anemo,
        DiceColor::Omni,
    ];

    /// Is this a concrete element (not the wildcard)?
    #[must_use]
    pub const fn is_element(self) -> bool {
        !matches!(self, DiceColor::Omni)
    }
}

impl std::fmt::Display for DiceColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A player's dice pool: an ordered multiset of colored tokens.
///
/// Order is observable (selection is by index) and deterministic, so the pool
/// is a plain vector rather than a counter map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    dice: Vec<DiceColor>,
}

impl DicePool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool from the given colors.
    #[must_use]
    pub fn from_colors(colors: impl IntoIterator<Item = DiceColor>) -> Self {
        Self {
            dice: colors.into_iter().collect(),
        }
    }

    /// Number of dice in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    /// Is the pool empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// The colors in pool order.
    #[must_use]
    pub fn colors(&self) -> &[DiceColor] {
        &self.dice
    }

    /// Count dice of one color.
    #[must_use]
    pub fn count(&self, color: DiceColor) -> usize {
        self.dice.iter().filter(|&&c| c == color).count()
    }

    /// Add a die. The caller enforces the pool cap.
    pub fn push(&mut self, color: DiceColor) {
        self.dice.push(color);
    }

    /// Replace the die at `index` with a new color.
    ///
    /// Returns the previous color, or `None` if the index is out of range.
    pub fn replace(&mut self, index: usize, color: DiceColor) -> Option<DiceColor> {
        let slot = self.dice.get_mut(index)?;
        Some(std::mem::replace(slot, color))
    }

    /// Remove the dice at the given indices, returning the removed colors in
    /// the order the indices were given.
    ///
    /// Returns `None` if any index is out of range or duplicated - the pool
    /// is left untouched in that case.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Option<Vec<DiceColor>> {
        let mut seen = vec![false; self.dice.len()];
        for &i in indices {
            if i >= self.dice.len() || seen[i] {
                return None;
            }
            seen[i] = true;
        }

        let removed: Vec<DiceColor> = indices.iter().map(|&i| self.dice[i]).collect();
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        for i in sorted.into_iter().rev() {
            self.dice.remove(i);
        }
        Some(removed)
    }

    /// Drop every die in the pool.
    pub fn clear(&mut self) {
        self.dice.clear();
    }
}

/// The kind of payment a cost is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostKind {
    /// A character skill (including bursts, which also require charge).
    Skill,
    /// Playing a card from hand.
    Card,
    /// Switching the active character.
    Switch,
}

/// A structured dice requirement.
///
/// A cost combines up to three dice requirements plus a charge flag:
/// - `elemental_number` dice of exactly `elemental_color` (or omni),
/// - `same_number` dice of any single shared color (omni fills gaps),
/// - `any_number` dice of arbitrary colors,
/// - `charge` points of the active character's burst energy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    /// Color for the elemental requirement, if any.
    pub elemental_color: Option<DiceColor>,
    /// Number of dice of `elemental_color` required.
    pub elemental_number: u8,
    /// Number of same-color dice required.
    pub same_number: u8,
    /// Number of any-color dice required.
    pub any_number: u8,
    /// Charge (burst energy) required from the active character.
    pub charge: u8,
}

impl Cost {
    /// A cost of nothing.
    #[must_use]
    pub const fn free() -> Self {
        Self {
            elemental_color: None,
            elemental_number: 0,
            same_number: 0,
            any_number: 0,
            charge: 0,
        }
    }

    /// `number` dice of exactly `color` (omni accepted).
    #[must_use]
    pub const fn elemental(color: DiceColor, number: u8) -> Self {
        Self {
            elemental_color: Some(color),
            elemental_number: number,
            same_number: 0,
            any_number: 0,
            charge: 0,
        }
    }

    /// `number` dice all sharing one color.
    #[must_use]
    pub const fn same(number: u8) -> Self {
        Self {
            elemental_color: None,
            elemental_number: 0,
            same_number: number,
            any_number: 0,
            charge: 0,
        }
    }

    /// `number` dice of any colors.
    #[must_use]
    pub const fn any(number: u8) -> Self {
        Self {
            elemental_color: None,
            elemental_number: 0,
            same_number: 0,
            any_number: number,
            charge: 0,
        }
    }

    /// Add an any-color component (builder pattern).
    #[must_use]
    pub fn plus_any(mut self, number: u8) -> Self {
        self.any_number += number;
        self
    }

    /// Add a charge requirement (builder pattern).
    #[must_use]
    pub fn with_charge(mut self, charge: u8) -> Self {
        self.charge = charge;
        self
    }

    /// Total number of dice this cost consumes.
    #[must_use]
    pub const fn total_dice(&self) -> usize {
        self.elemental_number as usize + self.same_number as usize + self.any_number as usize
    }

    /// Does this cost consume no dice and no charge?
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.total_dice() == 0 && self.charge == 0
    }

    /// Reduce the dice requirement by `amount`, cheapest component first
    /// (any, then elemental, then same).
    ///
    /// Returns how much was actually removed. Modifier hooks use the return
    /// value to decide whether they contributed - a discount that removed
    /// nothing must not consume its usage.
    pub fn decrease(&mut self, amount: u8) -> u8 {
        let mut remaining = amount;
        for slot in [
            &mut self.any_number,
            &mut self.elemental_number,
            &mut self.same_number,
        ] {
            let taken = remaining.min(*slot);
            *slot -= taken;
            remaining -= taken;
            if remaining == 0 {
                break;
            }
        }
        amount - remaining
    }
}
