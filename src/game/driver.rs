//! The match driver: phase transitions and player submissions.
//!
//! Every submission is validated with a TEST pipeline pass before anything
//! commits; recoverable errors (`NotPermitted`, `CostUnmet`,
//! `InsufficientDice`) leave the match untouched. The REAL pass must agree
//! with the TEST pass or the match aborts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actions::{run_actions, Action};
use crate::core::{
    Area, Cost, CostKind, DiceColor, EngineError, EngineResult, PlayerId, Position,
};
use crate::events::{dispatch_event, Event};
use crate::selector::{cost_satisfied, select_for_cost, select_tuning, ColorPriority};
use crate::values::{compute_value, CostValue, Value, ValueMode};

use super::state::{MatchResult, MatchState, Phase};

/// What a player can submit during the action phase.
///
/// `dice` fields name pool indices for the payment; `None` delegates to the
/// default selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Cast the active character's skill `skill`.
    UseSkill {
        skill: usize,
        dice: Option<Vec<usize>>,
    },
    /// Play the card at `hand_index`. Fast: the turn does not pass.
    PlayCard {
        hand_index: usize,
        dice: Option<Vec<usize>>,
    },
    /// Switch the active character to roster index `to`.
    SwitchCharacter {
        to: usize,
        dice: Option<Vec<usize>>,
    },
    /// Discard the card at `hand_index` to convert one die to the active
    /// character's element. Fast: the turn does not pass.
    ElementalTuning {
        hand_index: usize,
        die_index: Option<usize>,
    },
    /// Stop acting this round. The first declarer goes first next round.
    DeclareEnd,
}

impl MatchState {
    /// Advance the phase machine by one transition.
    ///
    /// The action phase does not advance this way; it ends when both players
    /// declare end through [`MatchState::submit`].
    pub fn advance(&mut self) -> EngineResult<Phase> {
        match self.phase {
            Phase::Start => {
                for player in PlayerId::both() {
                    let (tables, rng) = (&mut self.tables, &mut self.rng);
                    rng.shuffle(&mut tables[player.index()].deck);
                }
                let draws = PlayerId::both()
                    .map(|player| Action::DrawCard {
                        player,
                        count: self.config.initial_hand_size,
                    })
                    .collect();
                run_actions(self, draws)?;
                self.current_player = self.next_first;
                self.phase = Phase::RoundPrepare;
            }

            Phase::RoundPrepare => {
                self.round += 1;
                for table in &mut self.tables {
                    table.declared_end = false;
                    table.reroll_allowance = self.config.reroll_times;
                    table.dice.clear();
                }
                let round = self.round;
                let reactions = dispatch_event(self, &Event::RoundPrepare { round })?;
                run_actions(self, reactions)?;
                self.settle();

                if self.phase != Phase::MatchEnd {
                    // Enter the roll phase with fresh pools already rolled;
                    // rerolls are legal until the next advance.
                    self.phase = Phase::Roll;
                    for player in PlayerId::both() {
                        let colors = self.rng.roll_colors(self.config.dice_per_round);
                        run_actions(self, vec![Action::CreateDice { player, colors }])?;
                    }
                }
            }

            Phase::Roll => {
                self.current_player = self.next_first;
                self.phase = Phase::Action;
            }

            Phase::Action => {
                return Err(EngineError::NotPermitted(
                    "the action phase advances through player submissions".into(),
                ));
            }

            Phase::RoundEnd => {
                let round = self.round;
                let reactions = dispatch_event(self, &Event::RoundEnd { round })?;
                run_actions(self, reactions)?;
                self.settle();

                if self.phase != Phase::MatchEnd {
                    let draws = PlayerId::both()
                        .map(|player| Action::DrawCard {
                            player,
                            count: self.config.cards_per_round,
                        })
                        .collect();
                    run_actions(self, draws)?;
                }

                if self.phase != Phase::MatchEnd {
                    if self.round >= self.config.max_rounds {
                        self.result = Some(MatchResult::Draw);
                        self.phase = Phase::MatchEnd;
                    } else {
                        self.phase = Phase::RoundPrepare;
                    }
                }
            }

            Phase::MatchEnd => {
                return Err(EngineError::NotPermitted("the match is over".into()));
            }
        }

        debug!(phase = %self.phase, round = self.round, "phase advanced");
        Ok(self.phase)
    }

    /// Advance until the match waits for a player (action phase) or ends.
    ///
    /// Skips the reroll window; hosts that want rerolls advance phase by
    /// phase and call [`MatchState::reroll`] during `Roll`.
    pub fn run_until_action(&mut self) -> EngineResult<Phase> {
        while !matches!(self.phase, Phase::Action | Phase::MatchEnd) {
            self.advance()?;
        }
        Ok(self.phase)
    }

    /// Spend one reroll: replace the dice at `indices` with fresh rolls.
    ///
    /// `None` delegates to the default reroll selector (keep omni and the
    /// roster's elements). Legal only during the roll phase while the
    /// player has allowance left.
    pub fn reroll(&mut self, player: PlayerId, indices: Option<Vec<usize>>) -> EngineResult<()> {
        if self.phase != Phase::Roll {
            return Err(EngineError::NotPermitted(format!(
                "reroll outside the roll phase ({})",
                self.phase
            )));
        }
        if self.table(player).reroll_allowance == 0 {
            return Err(EngineError::NotPermitted(
                "reroll allowance exhausted".into(),
            ));
        }

        let table = self.table(player);
        let indices = match indices {
            Some(indices) => {
                validate_indices(&indices, table.dice.len(), "reroll")?;
                indices
            }
            None => {
                let priority = ColorPriority::for_elements(&table.living_elements());
                crate::selector::select_reroll(&table.dice, &priority).to_vec()
            }
        };

        if indices.is_empty() {
            // Nothing worth rerolling; the allowance is not spent.
            return Ok(());
        }
        self.table_mut(player).reroll_allowance -= 1;

        let colors = self.rng.roll_colors(indices.len());
        run_actions(
            self,
            vec![
                Action::RemoveDice { player, indices },
                Action::CreateDice { player, colors },
            ],
        )
    }

    /// Submit one player action during the action phase.
    pub fn submit(&mut self, player: PlayerId, action: PlayerAction) -> EngineResult<()> {
        if self.phase != Phase::Action {
            return Err(EngineError::NotPermitted(format!(
                "submission outside the action phase ({})",
                self.phase
            )));
        }
        if player != self.current_player {
            return Err(EngineError::NotPermitted(format!(
                "not {}'s turn",
                player
            )));
        }
        if self.table(player).declared_end {
            return Err(EngineError::NotPermitted(
                "already declared end this round".into(),
            ));
        }
        debug!(%player, ?action, "player action submitted");

        match action {
            PlayerAction::DeclareEnd => {
                if !self.table(player.opponent()).declared_end {
                    self.next_first = player;
                    self.tables[player.index()].declared_end = true;
                    self.current_player = player.opponent();
                } else {
                    self.tables[player.index()].declared_end = true;
                    self.phase = Phase::RoundEnd;
                }
                Ok(())
            }

            PlayerAction::UseSkill { skill, dice } => {
                let table = self.table(player);
                let source = table.active_position();
                let character = table.active_character();
                let behavior = character.behavior().ok_or_else(|| {
                    EngineError::invariant_at("active character behavior lifted", source)
                })?;
                let skill_def = behavior
                    .skills()
                    .get(skill)
                    .cloned()
                    .ok_or_else(|| {
                        EngineError::NotFound(format!(
                            "{} has no skill {}",
                            character.name, skill
                        ))
                    })?;

                let (cost, indices) =
                    self.resolve_payment(player, skill_def.cost, CostKind::Skill, source, dice)?;
                let mut actions = self.payment_actions(player, &cost, indices);
                actions.push(Action::UseSkill {
                    position: source,
                    skill,
                });
                run_actions(self, actions)?;
                self.settle();
                self.pass_turn();
                Ok(())
            }

            PlayerAction::PlayCard { hand_index, dice } => {
                let table = self.table(player);
                let slot = table.hand.get(hand_index).ok_or_else(|| {
                    EngineError::NotFound(format!("no card at hand index {}", hand_index))
                })?;
                let base_cost = slot
                    .object()
                    .ok_or_else(|| {
                        EngineError::invariant(format!("hand card {:?} lifted", slot.name))
                    })?
                    .cost()
                    .unwrap_or_else(Cost::free);
                let position = Position::new(player, Area::Hand, hand_index);

                let (cost, indices) =
                    self.resolve_payment(player, base_cost, CostKind::Card, position, dice)?;
                let mut actions = self.payment_actions(player, &cost, indices);
                actions.push(Action::PlayCard { player, hand_index });
                run_actions(self, actions)?;
                self.settle();
                Ok(())
            }

            PlayerAction::SwitchCharacter { to, dice } => {
                let table = self.table(player);
                let target = table.characters.get(to).ok_or_else(|| {
                    EngineError::NotFound(format!("no character at roster index {}", to))
                })?;
                if !target.alive {
                    return Err(EngineError::NotPermitted(format!(
                        "{} is defeated",
                        target.name
                    )));
                }
                if to == table.active_index() {
                    return Err(EngineError::NotPermitted(format!(
                        "{} is already active",
                        target.name
                    )));
                }

                let position = Position::character(player, to);
                let (cost, indices) =
                    self.resolve_payment(player, Cost::any(1), CostKind::Switch, position, dice)?;
                let mut actions = self.payment_actions(player, &cost, indices);
                actions.push(Action::SwitchCharacter { player, to });
                run_actions(self, actions)?;
                self.settle();
                self.pass_turn();
                Ok(())
            }

            PlayerAction::ElementalTuning {
                hand_index,
                die_index,
            } => {
                let table = self.table(player);
                if table.hand.get(hand_index).is_none() {
                    return Err(EngineError::NotFound(format!(
                        "no card at hand index {}",
                        hand_index
                    )));
                }
                let target = table.active_character().element;
                let die_index = match die_index {
                    Some(index) => {
                        let color =
                            table.dice.colors().get(index).copied().ok_or_else(|| {
                                EngineError::NotPermitted(format!(
                                    "no die at index {}",
                                    index
                                ))
                            })?;
                        if color == DiceColor::Omni || color == target {
                            return Err(EngineError::NotPermitted(format!(
                                "a {} die cannot be tuned to {}",
                                color, target
                            )));
                        }
                        index
                    }
                    None => {
                        let priority = ColorPriority::for_elements(&table.living_elements());
                        select_tuning(&table.dice, target, &priority)?
                    }
                };

                run_actions(
                    self,
                    vec![
                        Action::DiscardCard { player, hand_index },
                        Action::RemoveDice {
                            player,
                            indices: vec![die_index],
                        },
                        Action::CreateDice {
                            player,
                            colors: vec![target],
                        },
                    ],
                )?;
                self.settle();
                Ok(())
            }
        }
    }

    /// Enumerate the player actions that would currently be accepted.
    ///
    /// Costs are probed with TEST pipeline passes (hence `&mut self`); the
    /// match is left untouched. Outside the player's turn the list is empty.
    pub fn available_actions(&mut self, player: PlayerId) -> EngineResult<Vec<PlayerAction>> {
        if self.phase != Phase::Action
            || player != self.current_player
            || self.table(player).declared_end
        {
            return Ok(Vec::new());
        }

        let mut out = vec![PlayerAction::DeclareEnd];

        let table = self.table(player);
        let source = table.active_position();
        let skills = table
            .active_character()
            .behavior()
            .map(|b| b.skills())
            .unwrap_or_default();
        for (skill, def) in skills.into_iter().enumerate() {
            if self.can_pay(player, def.cost, CostKind::Skill, source)? {
                out.push(PlayerAction::UseSkill { skill, dice: None });
            }
        }

        for hand_index in 0..self.table(player).hand.len() {
            let Some(object) = self.table(player).hand[hand_index].object() else {
                continue;
            };
            let cost = object.cost().unwrap_or_else(Cost::free);
            let position = Position::new(player, Area::Hand, hand_index);
            if self.can_pay(player, cost, CostKind::Card, position)? {
                out.push(PlayerAction::PlayCard {
                    hand_index,
                    dice: None,
                });
            }
        }

        let table = self.table(player);
        let active = table.active_index();
        let standby: Vec<usize> = (0..table.characters.len())
            .filter(|&i| i != active && table.characters[i].alive)
            .collect();
        let tunable = {
            let priority = ColorPriority::for_elements(&table.living_elements());
            !table.hand.is_empty()
                && select_tuning(&table.dice, table.active_character().element, &priority).is_ok()
        };
        for to in standby {
            let position = Position::character(player, to);
            if self.can_pay(player, Cost::any(1), CostKind::Switch, position)? {
                out.push(PlayerAction::SwitchCharacter { to, dice: None });
            }
        }
        if tunable {
            for hand_index in 0..self.table(player).hand.len() {
                out.push(PlayerAction::ElementalTuning {
                    hand_index,
                    die_index: None,
                });
            }
        }

        Ok(out)
    }

    /// Probe whether a cost is payable right now. Recoverable payment
    /// failures mean "no"; fatal pipeline errors propagate.
    fn can_pay(
        &mut self,
        player: PlayerId,
        base: Cost,
        kind: CostKind,
        position: Position,
    ) -> EngineResult<bool> {
        let test = compute_value(
            self,
            Value::Cost(CostValue::new(base, kind, position)),
            ValueMode::Test,
        )?;
        let Some(cost_value) = test.as_cost() else {
            return Err(EngineError::invariant(
                "cost pipeline returned a non-cost value",
            ));
        };
        let cost = cost_value.cost;

        let table = self.table(player);
        if cost.charge > table.active_character().charge {
            return Ok(false);
        }
        let priority = ColorPriority::for_elements(&table.living_elements());
        match select_for_cost(&table.dice, &cost, &priority) {
            Ok(_) => Ok(true),
            Err(err) if err.is_fatal() => Err(err),
            Err(_) => Ok(false),
        }
    }

    /// TEST-validate a payment, resolve the dice indices, then run the REAL
    /// pass. Returns the final cost and the indices to remove.
    fn resolve_payment(
        &mut self,
        player: PlayerId,
        base: Cost,
        kind: CostKind,
        position: Position,
        dice: Option<Vec<usize>>,
    ) -> EngineResult<(Cost, Vec<usize>)> {
        let non_cost =
            || EngineError::invariant("cost pipeline returned a non-cost value");

        let test = compute_value(
            self,
            Value::Cost(CostValue::new(base, kind, position)),
            ValueMode::Test,
        )?;
        let cost = test.as_cost().ok_or_else(non_cost)?.cost;

        let table = self.table(player);
        let charge = table.active_character().charge;
        if cost.charge > charge {
            return Err(EngineError::CostUnmet(format!(
                "requires {} charge, active character has {}",
                cost.charge, charge
            )));
        }

        let indices = match dice {
            Some(indices) => {
                validate_indices(&indices, table.dice.len(), "payment")?;
                let colors: Vec<DiceColor> = indices
                    .iter()
                    .map(|&i| table.dice.colors()[i])
                    .collect();
                if !cost_satisfied(&colors, &cost) {
                    return Err(EngineError::CostUnmet(format!(
                        "submitted dice {:?} do not cover {:?}",
                        colors, cost
                    )));
                }
                indices
            }
            None => {
                let priority = ColorPriority::for_elements(&table.living_elements());
                select_for_cost(&table.dice, &cost, &priority)?.to_vec()
            }
        };

        let real = compute_value(
            self,
            Value::Cost(CostValue::new(base, kind, position)),
            ValueMode::Real,
        )?;
        let real_cost = real.as_cost().ok_or_else(non_cost)?.cost;
        if real_cost != cost {
            return Err(EngineError::invariant(format!(
                "cost pipeline diverged between TEST ({:?}) and REAL ({:?})",
                cost, real_cost
            )));
        }

        Ok((real_cost, indices))
    }

    /// The dice/charge payment as actions.
    fn payment_actions(&self, player: PlayerId, cost: &Cost, indices: Vec<usize>) -> Vec<Action> {
        let mut actions = Vec::new();
        if !indices.is_empty() {
            actions.push(Action::RemoveDice { player, indices });
        }
        if cost.charge > 0 {
            actions.push(Action::Charge {
                player,
                character: self.table(player).active_index(),
                delta: -(cost.charge as i32),
            });
        }
        actions
    }

    /// Set the result once a roster is wiped.
    fn settle(&mut self) {
        if self.result.is_some() {
            return;
        }
        let first_wiped = self.table(PlayerId::FIRST).is_defeated();
        let second_wiped = self.table(PlayerId::SECOND).is_defeated();
        let result = match (first_wiped, second_wiped) {
            (true, true) => MatchResult::Draw,
            (true, false) => MatchResult::Winner(PlayerId::SECOND),
            (false, true) => MatchResult::Winner(PlayerId::FIRST),
            (false, false) => return,
        };
        debug!(?result, round = self.round, "match settled");
        self.result = Some(result);
        self.phase = Phase::MatchEnd;
    }

    /// Hand the turn to the opponent after a combat action, unless they
    /// have already declared end.
    fn pass_turn(&mut self) {
        if self.phase != Phase::Action {
            return;
        }
        let opponent = self.current_player.opponent();
        if !self.table(opponent).declared_end {
            self.current_player = opponent;
        }
    }
}

fn validate_indices(indices: &[usize], len: usize, what: &str) -> EngineResult<()> {
    let mut seen = vec![false; len];
    for &i in indices {
        if i >= len || seen[i] {
            return Err(EngineError::NotPermitted(format!(
                "{} dice indices {:?} invalid for pool of {}",
                what, indices, len
            )));
        }
        seen[i] = true;
    }
    Ok(())
}
