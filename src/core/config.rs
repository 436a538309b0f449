//! Match configuration.
//!
//! Hosts configure a match at startup: round structure numbers, per-player
//! rosters and deck lists. The engine never hardcodes content - rosters and
//! decks are names resolved through the host's `ObjectFactory`.

use serde::{Deserialize, Serialize};

use super::dice::DiceColor;
use super::position::PlayerId;

/// Static description of one character on a roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterBlueprint {
    /// Content name, resolved through the object factory.
    pub name: String,
    /// The character's element.
    pub element: DiceColor,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Maximum charge (burst energy).
    pub max_charge: u8,
}

impl CharacterBlueprint {
    /// Create a blueprint.
    pub fn new(
        name: impl Into<String>,
        element: DiceColor,
        max_hp: i32,
        max_charge: u8,
    ) -> Self {
        Self {
            name: name.into(),
            element,
            max_hp,
            max_charge,
        }
    }
}

/// Configuration for a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Round cap; reaching it ends the match in a draw.
    pub max_rounds: u32,
    /// Dice granted to each player in the roll phase.
    pub dice_per_round: usize,
    /// Reroll allowance per roll phase.
    pub reroll_times: u8,
    /// Hard cap on a dice pool.
    pub max_dice: usize,
    /// Hard cap on a hand; overdrawn cards are burned.
    pub max_hand_size: usize,
    /// Cards drawn during match start.
    pub initial_hand_size: usize,
    /// Cards drawn by each player at the end of every round.
    pub cards_per_round: usize,
    /// Per-player character rosters.
    pub rosters: [Vec<CharacterBlueprint>; 2],
    /// Per-player deck lists (card content names).
    pub decks: [Vec<String>; 2],
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_rounds: 15,
            dice_per_round: 8,
            reroll_times: 1,
            max_dice: 16,
            max_hand_size: 10,
            initial_hand_size: 5,
            cards_per_round: 2,
            rosters: [Vec::new(), Vec::new()],
            decks: [Vec::new(), Vec::new()],
        }
    }
}

impl MatchConfig {
    /// Create a configuration with default numbers and empty rosters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a player's roster (builder pattern).
    #[must_use]
    pub fn with_roster(
        mut self,
        player: PlayerId,
        roster: impl IntoIterator<Item = CharacterBlueprint>,
    ) -> Self {
        self.rosters[player.index()] = roster.into_iter().collect();
        self
    }

    /// Set a player's deck list (builder pattern).
    #[must_use]
    pub fn with_deck<S: Into<String>>(
        mut self,
        player: PlayerId,
        deck: impl IntoIterator<Item = S>,
    ) -> Self {
        self.decks[player.index()] = deck.into_iter().map(Into::into).collect();
        self
    }

    /// Set the round cap (builder pattern).
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Set the initial hand size (builder pattern).
    #[must_use]
    pub fn with_initial_hand_size(mut self, size: usize) -> Self {
        self.initial_hand_size = size;
        self
    }
}
