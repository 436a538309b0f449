//! Structured, read-only lookups over the board.
//!
//! A [`Query`] is a predicate built from a viewpoint player plus optional
//! filters. Evaluation walks the fixed position order (viewpoint's table
//! first, zone by zone, index by index), so `all()` results are stable and
//! `one()` means "the first in traversal order".

use crate::core::{AreaKind, EngineError, EngineResult, ObjectId, PlayerId, Position};
use crate::game::MatchState;

/// Which side of the board a query looks at, relative to its viewpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerRelation {
    /// The viewpoint player's own table.
    Own,
    /// The opposing table.
    Opponent,
    /// Both tables, viewpoint's first.
    Both,
}

/// Active/standby filter for character positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The character holding the active slot.
    Active,
    /// Living characters not holding the active slot.
    Standby,
}

/// A composable board lookup.
#[derive(Clone)]
pub struct Query<'a> {
    state: &'a MatchState,
    viewpoint: PlayerId,
    relation: PlayerRelation,
    area: Option<AreaKind>,
    alive_only: bool,
    role: Option<Role>,
    name: Option<String>,
    id: Option<ObjectId>,
}

impl<'a> Query<'a> {
    /// Start a query from `viewpoint`'s perspective, matching both tables.
    #[must_use]
    pub fn new(state: &'a MatchState, viewpoint: PlayerId) -> Self {
        Self {
            state,
            viewpoint,
            relation: PlayerRelation::Both,
            area: None,
            alive_only: false,
            role: None,
            name: None,
            id: None,
        }
    }

    /// Restrict to the viewpoint's own table.
    #[must_use]
    pub fn own(mut self) -> Self {
        self.relation = PlayerRelation::Own;
        self
    }

    /// Restrict to the opposing table.
    #[must_use]
    pub fn opponent(mut self) -> Self {
        self.relation = PlayerRelation::Opponent;
        self
    }

    /// Restrict to one area kind.
    #[must_use]
    pub fn area(mut self, area: AreaKind) -> Self {
        self.area = Some(area);
        self
    }

    /// Exclude defeated characters and their statuses.
    #[must_use]
    pub fn alive(mut self) -> Self {
        self.alive_only = true;
        self
    }

    /// Match only the active character (implies the character area).
    #[must_use]
    pub fn active(mut self) -> Self {
        self.role = Some(Role::Active);
        self
    }

    /// Match only living standby characters (implies the character area).
    #[must_use]
    pub fn standby(mut self) -> Self {
        self.role = Some(Role::Standby);
        self
    }

    /// Match objects with this content name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Match the object with this ID.
    #[must_use]
    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = Some(id);
        self
    }

    /// Every matching position, in traversal order. Empty is not an error.
    #[must_use]
    pub fn all(&self) -> Vec<Position> {
        self.state
            .ordered_positions_from(self.viewpoint, self.alive_only)
            .into_iter()
            .filter(|&pos| self.matches(pos))
            .collect()
    }

    /// The first matching position; [`EngineError::NotFound`] when nothing
    /// matches.
    pub fn one(&self) -> EngineResult<Position> {
        self.state
            .ordered_positions_from(self.viewpoint, self.alive_only)
            .into_iter()
            .find(|&pos| self.matches(pos))
            .ok_or_else(|| EngineError::NotFound(self.describe()))
    }

    fn matches(&self, pos: Position) -> bool {
        match self.relation {
            PlayerRelation::Own if pos.player != self.viewpoint => return false,
            PlayerRelation::Opponent if pos.player == self.viewpoint => return false,
            _ => {}
        }
        if self.area.is_some_and(|a| pos.area.kind() != a) {
            return false;
        }
        if let Some(role) = self.role {
            if pos.area.kind() != AreaKind::Character {
                return false;
            }
            let table = self.state.table(pos.player);
            let is_active = pos.index == table.active_index();
            match role {
                Role::Active if !is_active => return false,
                Role::Standby => {
                    let alive = table.characters.get(pos.index).is_some_and(|c| c.alive);
                    if is_active || !alive {
                        return false;
                    }
                }
                _ => {}
            }
        }
        if self.name.is_some() || self.id.is_some() {
            let Some((id, name)) = identity(self.state, pos) else {
                return false;
            };
            if self.name.as_deref().is_some_and(|n| n != name) {
                return false;
            }
            if self.id.is_some_and(|q| q != id) {
                return false;
            }
        }
        true
    }

    fn describe(&self) -> String {
        format!(
            "query from {} ({:?}, area {:?}, role {:?}, name {:?}, id {:?}) matched nothing",
            self.viewpoint, self.relation, self.area, self.role, self.name, self.id
        )
    }
}

/// ID and content name of whatever occupies `pos`.
fn identity(state: &MatchState, pos: Position) -> Option<(ObjectId, &str)> {
    use crate::core::Area;

    let table = state.table(pos.player);
    match pos.area {
        Area::Character => {
            let character = table.characters.get(pos.index)?;
            Some((character.id, character.name.as_str()))
        }
        Area::CharacterStatus { character } => {
            let slot = table.characters.get(character)?.statuses.get(pos.index)?;
            Some((slot.id, slot.name.as_str()))
        }
        Area::TeamStatus => table
            .team_statuses
            .get(pos.index)
            .map(|s| (s.id, s.name.as_str())),
        Area::Summon => table
            .summons
            .get(pos.index)
            .map(|s| (s.id, s.name.as_str())),
        Area::Support => table
            .supports
            .get(pos.index)
            .map(|s| (s.id, s.name.as_str())),
        Area::Hand => table.hand.get(pos.index).map(|s| (s.id, s.name.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CharacterBlueprint, DiceColor, MatchConfig};
    use crate::objects::{GameObject, ObjectFactory, ObjectKind, ObjectSlot};

    #[derive(Clone)]
    struct Vanilla(String, ObjectKind);

    impl GameObject for Vanilla {
        fn name(&self) -> &str {
            &self.0
        }
        fn kind(&self) -> ObjectKind {
            self.1
        }
        fn clone_box(&self) -> Box<dyn GameObject> {
            Box::new(self.clone())
        }
    }

    struct VanillaFactory;

    impl ObjectFactory for VanillaFactory {
        fn create(&self, name: &str) -> Option<Box<dyn GameObject>> {
            Some(Box::new(Vanilla(name.to_string(), ObjectKind::Character)))
        }
    }

    fn state() -> MatchState {
        let roster = vec![
            CharacterBlueprint::new("alpha", DiceColor::Pyro, 10, 2),
            CharacterBlueprint::new("beta", DiceColor::Cryo, 10, 2),
        ];
        let config = MatchConfig::new()
            .with_roster(PlayerId::FIRST, roster.clone())
            .with_roster(PlayerId::SECOND, roster);
        MatchState::new(config, Box::new(VanillaFactory), 1).unwrap()
    }

    #[test]
    fn test_all_orders_viewpoint_first() {
        let state = state();
        let found = Query::new(&state, PlayerId::SECOND)
            .area(AreaKind::Character)
            .all();
        assert_eq!(found.len(), 4);
        assert_eq!(found[0].player, PlayerId::SECOND);
        assert_eq!(found[2].player, PlayerId::FIRST);
    }

    #[test]
    fn test_named_lookup() {
        let state = state();
        let pos = Query::new(&state, PlayerId::FIRST)
            .own()
            .named("beta")
            .one()
            .unwrap();
        assert_eq!(pos, Position::character(PlayerId::FIRST, 1));
    }

    #[test]
    fn test_one_not_found_is_recoverable() {
        let state = state();
        let err = Query::new(&state, PlayerId::FIRST)
            .named("gamma")
            .one()
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_active_and_standby_roles() {
        let mut state = state();
        state.table_mut(PlayerId::FIRST).set_active(1).unwrap();

        let active = Query::new(&state, PlayerId::FIRST).own().active().one().unwrap();
        assert_eq!(active, Position::character(PlayerId::FIRST, 1));

        let standby = Query::new(&state, PlayerId::FIRST).own().standby().all();
        assert_eq!(standby, vec![Position::character(PlayerId::FIRST, 0)]);
    }

    #[test]
    fn test_alive_filter() {
        let mut state = state();
        state.table_mut(PlayerId::SECOND).characters[1].alive = false;

        let living = Query::new(&state, PlayerId::FIRST)
            .opponent()
            .area(AreaKind::Character)
            .alive()
            .all();
        assert_eq!(living, vec![Position::character(PlayerId::SECOND, 0)]);
    }

    #[test]
    fn test_id_lookup_in_zone() {
        let mut state = state();
        let object = Box::new(Vanilla("ember-summon".into(), ObjectKind::Summon));
        let id = crate::core::ObjectId::new(900);
        state
            .table_mut(PlayerId::FIRST)
            .summons
            .push(ObjectSlot::new(id, object));

        let pos = Query::new(&state, PlayerId::FIRST)
            .with_id(id)
            .one()
            .unwrap();
        assert_eq!(pos.area.kind(), AreaKind::Summon);
        assert_eq!(pos.index, 0);
    }
}
