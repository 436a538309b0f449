//! Per-player table state.
//!
//! The table owns everything on one side of the board: the character roster,
//! the active-character index, the dice pool, hand, deck remainder, and the
//! team-status/summon/support zones.

use crate::core::{DicePool, EngineError, EngineResult, PlayerId, Position};

use super::character::CharacterState;
use super::object::ObjectSlot;

/// One player's side of the board.
#[derive(Debug)]
pub struct PlayerTable {
    player: PlayerId,
    /// Character roster in fixed order.
    pub characters: Vec<CharacterState>,
    active: usize,
    /// The dice pool.
    pub dice: DicePool,
    /// Cards in hand.
    pub hand: Vec<ObjectSlot>,
    /// Deck remainder as content names; top of deck is the end.
    pub deck: Vec<String>,
    /// Team-wide statuses.
    pub team_statuses: Vec<ObjectSlot>,
    /// Summon zone.
    pub summons: Vec<ObjectSlot>,
    /// Support zone.
    pub supports: Vec<ObjectSlot>,
    /// Has this player declared the round over?
    pub declared_end: bool,
    /// Rerolls remaining in the current roll phase.
    pub reroll_allowance: u8,
}

impl PlayerTable {
    /// Create an empty table for `player`.
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            characters: Vec::new(),
            active: 0,
            dice: DicePool::new(),
            hand: Vec::new(),
            deck: Vec::new(),
            team_statuses: Vec::new(),
            summons: Vec::new(),
            supports: Vec::new(),
            declared_end: false,
            reroll_allowance: 0,
        }
    }

    /// The seat this table belongs to.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Roster index of the active character.
    ///
    /// Exactly one character is active per table at all times.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Position of the active character.
    #[must_use]
    pub fn active_position(&self) -> Position {
        Position::character(self.player, self.active)
    }

    /// The active character.
    #[must_use]
    pub fn active_character(&self) -> &CharacterState {
        &self.characters[self.active]
    }

    /// The active character, mutably.
    pub fn active_character_mut(&mut self) -> &mut CharacterState {
        &mut self.characters[self.active]
    }

    /// Move the active slot to `index`.
    ///
    /// The target must exist and be alive; pointing the active slot at a
    /// dead character would break the one-active-character invariant.
    pub fn set_active(&mut self, index: usize) -> EngineResult<()> {
        let character = self.characters.get(index).ok_or_else(|| {
            EngineError::invariant_at(
                format!("active index {} beyond roster", index),
                Position::character(self.player, index),
            )
        })?;
        if !character.alive {
            return Err(EngineError::invariant_at(
                format!("active slot moved onto defeated character {}", character.name),
                Position::character(self.player, index),
            ));
        }
        self.active = index;
        Ok(())
    }

    /// Are all characters on this table defeated?
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.characters.iter().all(|c| !c.alive)
    }

    /// Elements of living characters, active character's element first.
    #[must_use]
    pub fn living_elements(&self) -> Vec<crate::core::DiceColor> {
        let mut out = Vec::new();
        if self.characters.get(self.active).is_some_and(|c| c.alive) {
            out.push(self.characters[self.active].element);
        }
        for (i, c) in self.characters.iter().enumerate() {
            if i != self.active && c.alive && !out.contains(&c.element) {
                out.push(c.element);
            }
        }
        out
    }

    /// Roster index of the next living character after `from`, wrapping,
    /// or `None` if the team is wiped.
    #[must_use]
    pub fn next_alive_after(&self, from: usize) -> Option<usize> {
        let n = self.characters.len();
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|&i| self.characters[i].alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CharacterBlueprint, Cost, DiceColor, ObjectId};
    use crate::objects::object::{GameObject, ObjectKind, Skill};

    #[derive(Clone)]
    struct Dummy;

    impl GameObject for Dummy {
        fn name(&self) -> &str {
            "dummy"
        }
        fn kind(&self) -> ObjectKind {
            ObjectKind::Character
        }
        fn skills(&self) -> Vec<Skill> {
            vec![Skill::new("Strike", Cost::any(1), 1)]
        }
        fn clone_box(&self) -> Box<dyn GameObject> {
            Box::new(self.clone())
        }
    }

    fn table_with_roster(n: usize) -> PlayerTable {
        let mut table = PlayerTable::new(PlayerId::FIRST);
        for i in 0..n {
            let blueprint = CharacterBlueprint::new(
                format!("char{}", i),
                DiceColor::Pyro,
                10,
                2,
            );
            table.characters.push(CharacterState::new(
                ObjectId::new(i as u32 + 1),
                &blueprint,
                Box::new(Dummy),
            ));
        }
        table
    }

    #[test]
    fn test_set_active_validates() {
        let mut table = table_with_roster(2);
        table.set_active(1).unwrap();
        assert_eq!(table.active_index(), 1);

        table.characters[0].alive = false;
        assert!(table.set_active(0).unwrap_err().is_fatal());
        assert!(table.set_active(5).unwrap_err().is_fatal());
    }

    #[test]
    fn test_defeated() {
        let mut table = table_with_roster(2);
        assert!(!table.is_defeated());
        table.characters[0].alive = false;
        table.characters[1].alive = false;
        assert!(table.is_defeated());
    }

    #[test]
    fn test_next_alive_after_wraps() {
        let mut table = table_with_roster(3);
        table.characters[1].alive = false;
        assert_eq!(table.next_alive_after(0), Some(2));
        assert_eq!(table.next_alive_after(2), Some(0));

        table.characters[0].alive = false;
        table.characters[2].alive = false;
        assert_eq!(table.next_alive_after(0), None);
    }

    #[test]
    fn test_living_elements_active_first() {
        let mut table = table_with_roster(2);
        table.characters[1].element = DiceColor::Cryo;
        table.set_active(1).unwrap();
        assert_eq!(
            table.living_elements(),
            vec![DiceColor::Cryo, DiceColor::Pyro]
        );
    }
}
