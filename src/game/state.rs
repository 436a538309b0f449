//! The match root aggregate.
//!
//! `MatchState` owns both player tables, the phase machine position, the
//! seeded RNG, and the action log. Everything content-visible goes through
//! positions: the state hands out objects by position and takes them back,
//! which is what lets dispatch call `&mut` hooks while the hooks read the
//! rest of the match through `&MatchState`.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::actions::{Action, ActionRecord};
use crate::core::{
    Area, EngineError, EngineResult, MatchConfig, MatchRng, MatchRngState, ObjectId, PlayerId,
    Position,
};
use crate::objects::{CharacterState, GameObject, ObjectFactory, ObjectSlot, PlayerTable};

/// Where the match is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Setup: decks shuffled, initial hands drawn.
    Start,
    /// Per-round reset; round-prepare effects fire.
    RoundPrepare,
    /// Dice rolled; rerolls are legal here.
    Roll,
    /// Players alternate submitting actions.
    Action,
    /// End-of-round effects fire; terminal conditions are checked.
    RoundEnd,
    /// The match is over.
    MatchEnd,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// How a finished match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    /// One roster survived.
    Winner(PlayerId),
    /// Both rosters wiped simultaneously, or the round cap was reached.
    Draw,
}

/// Authoritative state of one match.
pub struct MatchState {
    pub(crate) config: MatchConfig,
    pub(crate) tables: [PlayerTable; 2],
    pub(crate) phase: Phase,
    pub(crate) round: u32,
    pub(crate) current_player: PlayerId,
    /// Seat that acts first next round: the first end-declarer of this one.
    pub(crate) next_first: PlayerId,
    pub(crate) rng: MatchRng,
    pub(crate) action_log: Vector<ActionRecord>,
    pub(crate) next_object_id: u32,
    pub(crate) factory: Box<dyn ObjectFactory>,
    pub(crate) result: Option<MatchResult>,
}

impl MatchState {
    /// Build a match from its configuration.
    ///
    /// Roster characters are instantiated through the factory immediately;
    /// a roster name the factory does not know is a setup error, not an
    /// invariant violation.
    pub fn new(
        config: MatchConfig,
        factory: Box<dyn ObjectFactory>,
        seed: u64,
    ) -> EngineResult<Self> {
        let mut next_object_id = 1;
        let mut tables = [
            PlayerTable::new(PlayerId::FIRST),
            PlayerTable::new(PlayerId::SECOND),
        ];
        for player in PlayerId::both() {
            let roster = &config.rosters[player.index()];
            if roster.is_empty() {
                return Err(EngineError::NotPermitted(format!(
                    "{} has an empty roster",
                    player
                )));
            }
            for blueprint in roster {
                let behavior = factory.create(&blueprint.name).ok_or_else(|| {
                    EngineError::NotFound(format!(
                        "no content registered for roster name {:?}",
                        blueprint.name
                    ))
                })?;
                let id = ObjectId::new(next_object_id);
                next_object_id += 1;
                tables[player.index()]
                    .characters
                    .push(CharacterState::new(id, blueprint, behavior));
            }
            tables[player.index()].deck = config.decks[player.index()].clone();
        }

        Ok(Self {
            config,
            tables,
            phase: Phase::Start,
            round: 0,
            current_player: PlayerId::FIRST,
            next_first: PlayerId::FIRST,
            rng: MatchRng::new(seed),
            action_log: Vector::new(),
            next_object_id,
            factory,
            result: None,
        })
    }

    /// The match configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current round number; 0 before the first round starts.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Whose turn it is to act.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// The result, once the match has ended.
    #[must_use]
    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }

    /// The executed-action log. Persistently shared; cloning is O(1).
    #[must_use]
    pub fn action_log(&self) -> &Vector<ActionRecord> {
        &self.action_log
    }

    /// Serializable RNG checkpoint.
    #[must_use]
    pub fn rng_state(&self) -> MatchRngState {
        self.rng.state()
    }

    /// One player's side of the board.
    #[must_use]
    pub fn table(&self, player: PlayerId) -> &PlayerTable {
        &self.tables[player.index()]
    }

    /// Mutable table access.
    ///
    /// Exposed for hosts that set up bespoke board states (tests, puzzle
    /// modes). In-match mutation belongs to the action executor.
    pub fn table_mut(&mut self, player: PlayerId) -> &mut PlayerTable {
        &mut self.tables[player.index()]
    }

    pub(crate) fn alloc_object_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_object_id);
        self.next_object_id += 1;
        id
    }

    pub(crate) fn record_action(&mut self, action: Action) {
        let sequence = self.action_log.len() as u32;
        self.action_log
            .push_back(ActionRecord::new(action, self.round, sequence));
    }

    /// Instantiate a content object mid-match. Unknown names at this point
    /// are content bugs.
    pub(crate) fn instantiate(&self, name: &str) -> EngineResult<Box<dyn GameObject>> {
        self.factory
            .create(name)
            .ok_or_else(|| EngineError::invariant(format!("unknown content name {:?}", name)))
    }

    /// The slot vector behind a zone area.
    ///
    /// `Character` is not a slot zone; asking for it is a malformed
    /// position shape.
    pub(crate) fn zone_slots_mut(
        &mut self,
        player: PlayerId,
        area: Area,
    ) -> EngineResult<&mut Vec<ObjectSlot>> {
        let table = &mut self.tables[player.index()];
        match area {
            Area::Character => Err(EngineError::invariant(
                "character area addressed as a slot zone",
            )),
            Area::CharacterStatus { character } => {
                let roster_len = table.characters.len();
                table
                    .characters
                    .get_mut(character)
                    .map(|c| &mut c.statuses)
                    .ok_or_else(|| {
                        EngineError::invariant_at(
                            format!("status owner {} beyond roster of {}", character, roster_len),
                            Position::character(player, character),
                        )
                    })
            }
            Area::TeamStatus => Ok(&mut table.team_statuses),
            Area::Summon => Ok(&mut table.summons),
            Area::Support => Ok(&mut table.supports),
            Area::Hand => Ok(&mut table.hand),
        }
    }

    /// Lift the object at `pos` out of its slot for a dispatch call.
    ///
    /// Returns `None` when the position does not resolve (stale index, or
    /// the object is already lifted).
    pub(crate) fn take_object(&mut self, pos: Position) -> Option<Box<dyn GameObject>> {
        let table = &mut self.tables[pos.player.index()];
        match pos.area {
            Area::Character => table.characters.get_mut(pos.index)?.take_behavior(),
            Area::CharacterStatus { character } => table
                .characters
                .get_mut(character)?
                .statuses
                .get_mut(pos.index)?
                .take(),
            Area::TeamStatus => table.team_statuses.get_mut(pos.index)?.take(),
            Area::Summon => table.summons.get_mut(pos.index)?.take(),
            Area::Support => table.supports.get_mut(pos.index)?.take(),
            Area::Hand => table.hand.get_mut(pos.index)?.take(),
        }
    }

    /// Return a lifted object to its slot.
    ///
    /// The slot vanishing while the object was out is an engine bug: no
    /// structural mutation is allowed during a dispatch call.
    pub(crate) fn put_object(
        &mut self,
        pos: Position,
        object: Box<dyn GameObject>,
    ) -> EngineResult<()> {
        let missing = || EngineError::invariant_at("slot vanished while object was lifted", pos);
        let table = &mut self.tables[pos.player.index()];
        match pos.area {
            Area::Character => table
                .characters
                .get_mut(pos.index)
                .ok_or_else(missing)?
                .put_behavior(object),
            Area::CharacterStatus { character } => table
                .characters
                .get_mut(character)
                .and_then(|c| c.statuses.get_mut(pos.index))
                .ok_or_else(missing)?
                .put_back(object),
            Area::TeamStatus => table
                .team_statuses
                .get_mut(pos.index)
                .ok_or_else(missing)?
                .put_back(object),
            Area::Summon => table
                .summons
                .get_mut(pos.index)
                .ok_or_else(missing)?
                .put_back(object),
            Area::Support => table
                .supports
                .get_mut(pos.index)
                .ok_or_else(missing)?
                .put_back(object),
            Area::Hand => table
                .hand
                .get_mut(pos.index)
                .ok_or_else(missing)?
                .put_back(object),
        }
        Ok(())
    }

    /// Borrow the object at `pos`, if it resolves.
    #[must_use]
    pub fn object_at(&self, pos: Position) -> Option<&dyn GameObject> {
        let table = self.table(pos.player);
        match pos.area {
            Area::Character => table.characters.get(pos.index)?.behavior(),
            Area::CharacterStatus { character } => table
                .characters
                .get(character)?
                .statuses
                .get(pos.index)?
                .object(),
            Area::TeamStatus => table.team_statuses.get(pos.index)?.object(),
            Area::Summon => table.summons.get(pos.index)?.object(),
            Area::Support => table.supports.get(pos.index)?.object(),
            Area::Hand => table.hand.get(pos.index)?.object(),
        }
    }

    /// The fixed traversal order used by dispatch and the value pipeline:
    /// live objects only, acting player's table first.
    #[must_use]
    pub fn dispatch_order(&self) -> Vec<Position> {
        self.ordered_positions_from(self.current_player, true)
    }

    /// Every position on the board, ordered from `viewpoint`'s side.
    ///
    /// Within a table: characters in roster order, each immediately followed
    /// by its own statuses, then team statuses, summons, supports, hand.
    /// With `live_only` set, defeated characters and their statuses are
    /// skipped.
    #[must_use]
    pub fn ordered_positions_from(&self, viewpoint: PlayerId, live_only: bool) -> Vec<Position> {
        let mut out = Vec::new();
        for player in [viewpoint, viewpoint.opponent()] {
            let table = self.table(player);
            for (ci, character) in table.characters.iter().enumerate() {
                if live_only && !character.alive {
                    continue;
                }
                out.push(Position::character(player, ci));
                for si in 0..character.statuses.len() {
                    out.push(Position::character_status(player, ci, si));
                }
            }
            for (area, zone) in [
                (Area::TeamStatus, &table.team_statuses),
                (Area::Summon, &table.summons),
                (Area::Support, &table.supports),
                (Area::Hand, &table.hand),
            ] {
                for i in 0..zone.len() {
                    out.push(Position::new(player, area, i));
                }
            }
        }
        out
    }
}

impl std::fmt::Debug for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchState")
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("current_player", &self.current_player)
            .field("result", &self.result)
            .field("actions", &self.action_log.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CharacterBlueprint, DiceColor};
    use crate::objects::ObjectKind;

    #[derive(Clone)]
    struct Vanilla(String);

    impl GameObject for Vanilla {
        fn name(&self) -> &str {
            &self.0
        }
        fn kind(&self) -> ObjectKind {
            ObjectKind::Character
        }
        fn clone_box(&self) -> Box<dyn GameObject> {
            Box::new(self.clone())
        }
    }

    struct VanillaFactory;

    impl ObjectFactory for VanillaFactory {
        fn create(&self, name: &str) -> Option<Box<dyn GameObject>> {
            Some(Box::new(Vanilla(name.to_string())))
        }
    }

    fn two_char_config() -> MatchConfig {
        let roster = vec![
            CharacterBlueprint::new("alpha", DiceColor::Pyro, 10, 2),
            CharacterBlueprint::new("beta", DiceColor::Cryo, 10, 2),
        ];
        MatchConfig::new()
            .with_roster(PlayerId::FIRST, roster.clone())
            .with_roster(PlayerId::SECOND, roster)
    }

    #[test]
    fn test_setup_instantiates_rosters() {
        let state = MatchState::new(two_char_config(), Box::new(VanillaFactory), 1).unwrap();
        assert_eq!(state.phase(), Phase::Start);
        assert_eq!(state.table(PlayerId::FIRST).characters.len(), 2);
        assert_eq!(state.table(PlayerId::SECOND).characters[1].name, "beta");
    }

    #[test]
    fn test_empty_roster_rejected() {
        let config = MatchConfig::new().with_roster(
            PlayerId::FIRST,
            [CharacterBlueprint::new("alpha", DiceColor::Pyro, 10, 2)],
        );
        let err = MatchState::new(config, Box::new(VanillaFactory), 1).unwrap_err();
        assert!(matches!(err, EngineError::NotPermitted(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_take_put_roundtrip() {
        let mut state = MatchState::new(two_char_config(), Box::new(VanillaFactory), 1).unwrap();
        let pos = Position::character(PlayerId::FIRST, 0);

        let object = state.take_object(pos).unwrap();
        // Lifted out: a second take resolves to nothing.
        assert!(state.take_object(pos).is_none());
        state.put_object(pos, object).unwrap();
        assert!(state.object_at(pos).is_some());
    }

    #[test]
    fn test_order_starts_with_acting_player() {
        let mut state = MatchState::new(two_char_config(), Box::new(VanillaFactory), 1).unwrap();
        state.current_player = PlayerId::SECOND;

        let order = state.dispatch_order();
        assert_eq!(order[0], Position::character(PlayerId::SECOND, 0));
        assert!(order.contains(&Position::character(PlayerId::FIRST, 1)));
    }

    #[test]
    fn test_order_skips_defeated() {
        let mut state = MatchState::new(two_char_config(), Box::new(VanillaFactory), 1).unwrap();
        state.table_mut(PlayerId::FIRST).characters[0].alive = false;

        let live = state.ordered_positions_from(PlayerId::FIRST, true);
        assert!(!live.contains(&Position::character(PlayerId::FIRST, 0)));

        let all = state.ordered_positions_from(PlayerId::FIRST, false);
        assert!(all.contains(&Position::character(PlayerId::FIRST, 0)));
    }
}
