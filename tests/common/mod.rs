//! Shared test content: a small factory of characters, statuses, summons,
//! supports, and cards exercising the engine's extension points.

// Each integration binary pulls in the subset it needs.
#![allow(dead_code)]

use omni_tcg::{
    Action, Area, CharacterBlueprint, Cost, DamageValue, DiceColor, EngineResult, Event,
    GameObject, MatchConfig, MatchState, ObjectFactory, ObjectKind, PlayerId, Position, Skill,
    Usage, Value, ValueMode,
};

/// A character with a cheap jab and a charge-gated burst.
#[derive(Clone)]
pub struct Striker;

impl GameObject for Striker {
    fn name(&self) -> &str {
        "striker"
    }
    fn kind(&self) -> ObjectKind {
        ObjectKind::Character
    }
    fn skills(&self) -> Vec<Skill> {
        vec![
            Skill::new("Jab", Cost::any(1), 1),
            Skill::new("Burst", Cost::any(2).with_charge(2), 3).with_charge_gain(0),
        ]
    }
    fn clone_box(&self) -> Box<dyn GameObject> {
        Box::new(self.clone())
    }
}

/// Character status: +1 damage to its owner's hits, two activations.
#[derive(Clone)]
pub struct PowerBoost {
    usage: Usage,
}

impl PowerBoost {
    pub fn new() -> Self {
        Self {
            usage: Usage::new(2),
        }
    }
}

impl GameObject for PowerBoost {
    fn name(&self) -> &str {
        "power-boost"
    }
    fn kind(&self) -> ObjectKind {
        ObjectKind::CharacterStatus
    }
    fn usage(&self) -> Option<Usage> {
        Some(self.usage)
    }
    fn usage_mut(&mut self) -> Option<&mut Usage> {
        Some(&mut self.usage)
    }
    fn modify_value(
        &mut self,
        value: &mut Value,
        pos: Position,
        _state: &MatchState,
        mode: ValueMode,
    ) -> EngineResult<()> {
        if self.usage.is_exhausted() {
            return Ok(());
        }
        let Area::CharacterStatus { character } = pos.area else {
            return Ok(());
        };
        let owner = Position::character(pos.player, character);
        if let Some(damage) = value.as_damage_mut() {
            if damage.source == owner {
                damage.amount += 1;
                if mode == ValueMode::Real {
                    self.usage.consume(1)?;
                }
            }
        }
        Ok(())
    }
    fn handle_event(&mut self, event: &Event, pos: Position, _state: &MatchState) -> Vec<Action> {
        match event {
            Event::DamageDealt { .. } if self.usage.is_exhausted() => {
                vec![Action::RemoveObject {
                    position: pos,
                    id: None,
                }]
            }
            _ => Vec::new(),
        }
    }
    fn clone_box(&self) -> Box<dyn GameObject> {
        Box::new(self.clone())
    }
}

/// Same contract as [`PowerBoost`] under a different content name, so a
/// character can carry both at once.
#[derive(Clone)]
pub struct KeenEdge {
    inner: PowerBoost,
}

impl KeenEdge {
    pub fn new() -> Self {
        Self {
            inner: PowerBoost::new(),
        }
    }
}

impl GameObject for KeenEdge {
    fn name(&self) -> &str {
        "keen-edge"
    }
    fn kind(&self) -> ObjectKind {
        ObjectKind::CharacterStatus
    }
    fn usage(&self) -> Option<Usage> {
        self.inner.usage()
    }
    fn usage_mut(&mut self) -> Option<&mut Usage> {
        self.inner.usage_mut()
    }
    fn modify_value(
        &mut self,
        value: &mut Value,
        pos: Position,
        state: &MatchState,
        mode: ValueMode,
    ) -> EngineResult<()> {
        self.inner.modify_value(value, pos, state, mode)
    }
    fn handle_event(&mut self, event: &Event, pos: Position, state: &MatchState) -> Vec<Action> {
        self.inner.handle_event(event, pos, state)
    }
    fn clone_box(&self) -> Box<dyn GameObject> {
        Box::new(self.clone())
    }
}

/// Support: one die off every cost, two activations.
#[derive(Clone)]
pub struct LuckyCharm {
    usage: Usage,
}

impl LuckyCharm {
    pub fn new() -> Self {
        Self {
            usage: Usage::new(2),
        }
    }
}

impl GameObject for LuckyCharm {
    fn name(&self) -> &str {
        "lucky-charm"
    }
    fn kind(&self) -> ObjectKind {
        ObjectKind::Support
    }
    fn usage(&self) -> Option<Usage> {
        Some(self.usage)
    }
    fn usage_mut(&mut self) -> Option<&mut Usage> {
        Some(&mut self.usage)
    }
    fn modify_value(
        &mut self,
        value: &mut Value,
        _pos: Position,
        _state: &MatchState,
        mode: ValueMode,
    ) -> EngineResult<()> {
        if self.usage.is_exhausted() {
            return Ok(());
        }
        if let Some(cost_value) = value.as_cost_mut() {
            let removed = cost_value.cost.decrease(1);
            if removed > 0 && mode == ValueMode::Real {
                self.usage.consume(1)?;
            }
        }
        Ok(())
    }
    fn clone_box(&self) -> Box<dyn GameObject> {
        Box::new(self.clone())
    }
}

/// Summon: 1 pyro damage to the opposing active character at every round
/// end, then burns down its own usage and removes itself at zero.
#[derive(Clone)]
pub struct EmberSummon {
    usage: Usage,
}

impl EmberSummon {
    pub fn new() -> Self {
        Self {
            usage: Usage::new(2),
        }
    }
}

impl GameObject for EmberSummon {
    fn name(&self) -> &str {
        "ember-summon"
    }
    fn kind(&self) -> ObjectKind {
        ObjectKind::Summon
    }
    fn usage(&self) -> Option<Usage> {
        Some(self.usage)
    }
    fn usage_mut(&mut self) -> Option<&mut Usage> {
        Some(&mut self.usage)
    }
    fn handle_event(&mut self, event: &Event, pos: Position, state: &MatchState) -> Vec<Action> {
        match event {
            Event::RoundEnd { .. } => {
                let target = state.table(pos.player.opponent()).active_position();
                vec![
                    Action::MakeDamage {
                        damage: DamageValue::new(1, Some(DiceColor::Pyro), pos, target),
                    },
                    Action::ChangeUsage {
                        position: pos,
                        delta: -1,
                    },
                ]
            }
            Event::UsageChanged {
                position,
                remaining: 0,
                ..
            } if *position == pos => vec![Action::RemoveObject {
                position: pos,
                id: None,
            }],
            _ => Vec::new(),
        }
    }
    fn clone_box(&self) -> Box<dyn GameObject> {
        Box::new(self.clone())
    }
}

/// A status that illegally consumes usage during TEST passes.
#[derive(Clone)]
pub struct Cheater {
    usage: Usage,
}

impl Cheater {
    pub fn new() -> Self {
        Self {
            usage: Usage::new(3),
        }
    }
}

impl GameObject for Cheater {
    fn name(&self) -> &str {
        "cheater"
    }
    fn kind(&self) -> ObjectKind {
        ObjectKind::TeamStatus
    }
    fn usage(&self) -> Option<Usage> {
        Some(self.usage)
    }
    fn usage_mut(&mut self) -> Option<&mut Usage> {
        Some(&mut self.usage)
    }
    fn modify_value(
        &mut self,
        value: &mut Value,
        _pos: Position,
        _state: &MatchState,
        _mode: ValueMode,
    ) -> EngineResult<()> {
        if let Some(damage) = value.as_damage_mut() {
            damage.amount += 1;
            // Consumes in both modes: the pipeline must catch this.
            self.usage.consume(1)?;
        }
        Ok(())
    }
    fn clone_box(&self) -> Box<dyn GameObject> {
        Box::new(self.clone())
    }
}

/// A card dealing 2 damage to the opposing active character.
#[derive(Clone)]
pub struct StrikeCard;

impl GameObject for StrikeCard {
    fn name(&self) -> &str {
        "strike-card"
    }
    fn kind(&self) -> ObjectKind {
        ObjectKind::Card
    }
    fn cost(&self) -> Option<Cost> {
        Some(Cost::any(1))
    }
    fn on_play(&mut self, pos: Position, state: &MatchState) -> Vec<Action> {
        let target = state.table(pos.player.opponent()).active_position();
        vec![Action::MakeDamage {
            damage: DamageValue::new(2, None, pos, target),
        }]
    }
    fn clone_box(&self) -> Box<dyn GameObject> {
        Box::new(self.clone())
    }
}

/// A free card that does nothing; tuning and draw fodder.
#[derive(Clone)]
pub struct BlankCard;

impl GameObject for BlankCard {
    fn name(&self) -> &str {
        "blank-card"
    }
    fn kind(&self) -> ObjectKind {
        ObjectKind::Card
    }
    fn clone_box(&self) -> Box<dyn GameObject> {
        Box::new(self.clone())
    }
}

/// Factory covering all test content.
pub struct TestFactory;

impl ObjectFactory for TestFactory {
    fn create(&self, name: &str) -> Option<Box<dyn GameObject>> {
        match name {
            "striker" => Some(Box::new(Striker)),
            "power-boost" => Some(Box::new(PowerBoost::new())),
            "keen-edge" => Some(Box::new(KeenEdge::new())),
            "lucky-charm" => Some(Box::new(LuckyCharm::new())),
            "ember-summon" => Some(Box::new(EmberSummon::new())),
            "cheater" => Some(Box::new(Cheater::new())),
            "strike-card" => Some(Box::new(StrikeCard)),
            "blank-card" => Some(Box::new(BlankCard)),
            _ => None,
        }
    }
}

/// Two strikers per side, 10 HP each, blank-card decks.
pub fn duel_config() -> MatchConfig {
    let roster = vec![
        CharacterBlueprint::new("striker", DiceColor::Pyro, 10, 2),
        CharacterBlueprint::new("striker", DiceColor::Cryo, 10, 2),
    ];
    MatchConfig::new()
        .with_roster(PlayerId::FIRST, roster.clone())
        .with_roster(PlayerId::SECOND, roster)
        .with_deck(PlayerId::FIRST, vec!["blank-card"; 20])
        .with_deck(PlayerId::SECOND, vec!["blank-card"; 20])
}

/// A fresh match on the standard duel config.
pub fn new_match(seed: u64) -> MatchState {
    MatchState::new(duel_config(), Box::new(TestFactory), seed).expect("valid test config")
}

/// Drive the match to its first action phase.
pub fn at_first_action(seed: u64) -> MatchState {
    let mut state = new_match(seed);
    state.run_until_action().expect("setup phases");
    state
}
