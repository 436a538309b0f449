//! The action execution loop.
//!
//! Execution is breadth-first: the loop pops the head of the queue, applies
//! its mutation, derives the event, dispatches it, and appends both the
//! action's own follow-ups and the handlers' reactions to the TAIL. Reactions
//! to a wave of actions therefore run strictly after the wave itself.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::core::{Area, EngineError, EngineResult, Position};
use crate::events::{dispatch_event, Event};
use crate::game::MatchState;
use crate::objects::ObjectSlot;
use crate::values::{compute_value, UsageValue, Value, ValueMode};

use super::Action;

/// What applying one action produced.
struct ActionOutcome {
    /// The event derived from the mutation.
    event: Event,
    /// Actions the mutation itself generates (auto-switch after a defeat,
    /// skill payloads, card payloads). Queued before the event's reactions.
    follow_up: Vec<Action>,
}

impl ActionOutcome {
    fn new(event: Event) -> Self {
        Self {
            event,
            follow_up: Vec::new(),
        }
    }

    fn with_follow_up(event: Event, follow_up: Vec<Action>) -> Self {
        Self { event, follow_up }
    }
}

/// Drain `initial` and everything it transitively generates.
///
/// Every popped action is appended to the match's action log before it
/// executes, no-ops included, so a replay drains the identical queue. A
/// [`Action::SkipPlayerAction`] clears whatever is still pending; fatal
/// errors abort the drain and poison the match.
pub fn run_actions(state: &mut MatchState, initial: Vec<Action>) -> EngineResult<()> {
    let mut queue: VecDeque<Action> = initial.into();

    while let Some(action) = queue.pop_front() {
        debug!(?action, pending = queue.len(), "executing action");
        state.record_action(action.clone());

        let Some(outcome) = apply_action(state, &action)? else {
            trace!(?action, "action resolved to no-op");
            continue;
        };

        if matches!(action, Action::SkipPlayerAction { .. }) {
            queue.clear();
        }

        queue.extend(outcome.follow_up);
        queue.extend(dispatch_event(state, &outcome.event)?);
    }

    Ok(())
}

/// Apply one action's mutation and derive its event.
///
/// `Ok(None)` means the action resolved to a no-op: its target no longer
/// exists (stale position, dead character, empty deck). Malformed actions
/// that cannot come from correct content are invariant violations instead.
fn apply_action(state: &mut MatchState, action: &Action) -> EngineResult<Option<ActionOutcome>> {
    match action {
        Action::MakeDamage { damage } => {
            // Shape and liveness gate the fold: a hit that cannot land
            // never reaches the modifier hooks.
            let target = damage.target;
            if target.area != Area::Character {
                return Err(EngineError::invariant_at(
                    "damage target is not a character position",
                    target,
                ));
            }
            {
                let Some(character) = state.table(target.player).characters.get(target.index)
                else {
                    return Err(EngineError::invariant_at(
                        "damage target beyond roster",
                        target,
                    ));
                };
                if !character.alive {
                    return Ok(None);
                }
            }

            let folded = compute_value(state, Value::Damage(damage.clone()), ValueMode::Real)?;
            let Some(damage) = folded.as_damage() else {
                return Err(EngineError::invariant(
                    "damage pipeline returned a non-damage value",
                ));
            };
            let amount = damage.amount;
            let element = damage.element;
            let source = damage.source;

            let table = state.table_mut(target.player);
            let was_active = table.active_index() == target.index;
            let Some(character) = table.characters.get_mut(target.index) else {
                return Err(EngineError::invariant_at(
                    "damage target beyond roster",
                    target,
                ));
            };

            character.hp = (character.hp - amount).max(0);
            let hp_after = character.hp;
            let defeated = hp_after == 0;
            if defeated {
                character.alive = false;
                character.charge = 0;
                character.statuses.clear();
            }

            let mut follow_up = Vec::new();
            if defeated && was_active {
                if let Some(next) = table.next_alive_after(target.index) {
                    follow_up.push(Action::SwitchCharacter {
                        player: target.player,
                        to: next,
                    });
                }
            }

            Ok(Some(ActionOutcome::with_follow_up(
                Event::DamageDealt {
                    source,
                    target,
                    element,
                    amount,
                    hp_after,
                    defeated,
                },
                follow_up,
            )))
        }

        Action::Heal { target, amount } => {
            if target.area != Area::Character {
                return Err(EngineError::invariant_at(
                    "heal target is not a character position",
                    *target,
                ));
            }
            let Some(character) = state
                .table_mut(target.player)
                .characters
                .get_mut(target.index)
            else {
                return Err(EngineError::invariant_at("heal target beyond roster", *target));
            };
            if !character.alive {
                return Ok(None);
            }

            let before = character.hp;
            character.hp = (character.hp + amount).min(character.max_hp);
            let hp_after = character.hp;
            Ok(Some(ActionOutcome::new(Event::Healed {
                target: *target,
                amount: hp_after - before,
                hp_after,
            })))
        }

        Action::CreateObject { player, area, name } => {
            if matches!(area.kind(), crate::core::AreaKind::Character) {
                return Err(EngineError::invariant(
                    "characters are fixed at setup, not created by actions",
                ));
            }

            // Renewal: a same-name object already in the zone is refreshed
            // in place instead of duplicated.
            let zone = state.zone_slots_mut(*player, *area)?;
            if let Some((index, slot)) = zone
                .iter_mut()
                .enumerate()
                .find(|(_, slot)| slot.name == *name)
            {
                if let Some(usage) = slot.object_mut().and_then(|o| o.usage_mut()) {
                    usage.restore();
                }
                let position = Position::new(*player, *area, index);
                return Ok(Some(ActionOutcome::new(Event::ObjectCreated {
                    position,
                    name: name.clone(),
                    renewed: true,
                })));
            }

            let object = state.instantiate(name)?;
            let id = state.alloc_object_id();
            let zone = state.zone_slots_mut(*player, *area)?;
            let index = zone.len();
            zone.push(ObjectSlot::new(id, object));

            Ok(Some(ActionOutcome::new(Event::ObjectCreated {
                position: Position::new(*player, *area, index),
                name: name.clone(),
                renewed: false,
            })))
        }

        Action::RemoveObject { position, id } => {
            if position.area == Area::Character {
                return Err(EngineError::invariant_at(
                    "characters are never removed, only defeated",
                    *position,
                ));
            }
            let zone = state.zone_slots_mut(position.player, position.area)?;
            let Some(slot) = zone.get(position.index) else {
                return Ok(None);
            };
            if id.is_some_and(|id| slot.id != id) {
                // The slot was reoccupied since this removal was queued.
                return Ok(None);
            }

            let slot = zone.remove(position.index);
            Ok(Some(ActionOutcome::new(Event::ObjectRemoved {
                position: *position,
                name: slot.name,
            })))
        }

        Action::ChangeUsage { position, delta } => {
            if position.area == Area::Character {
                return Err(EngineError::invariant_at(
                    "characters carry charge, not usage",
                    *position,
                ));
            }

            let folded = compute_value(
                state,
                Value::Usage(UsageValue::new(*delta, *position)),
                ValueMode::Real,
            )?;
            let Some(usage_value) = folded.as_usage() else {
                return Err(EngineError::invariant(
                    "usage pipeline returned a non-usage value",
                ));
            };
            let delta = usage_value.delta;

            let zone = state.zone_slots_mut(position.player, position.area)?;
            let Some(slot) = zone.get_mut(position.index) else {
                return Ok(None);
            };
            let Some(usage) = slot.object_mut().and_then(|o| o.usage_mut()) else {
                return Err(EngineError::invariant_at(
                    "usage change targets an object without a usage counter",
                    *position,
                ));
            };
            let remaining = usage
                .apply_delta(delta)
                .map_err(|_| EngineError::invariant_at("usage driven below zero", *position))?;

            Ok(Some(ActionOutcome::new(Event::UsageChanged {
                position: *position,
                delta,
                remaining,
            })))
        }

        Action::DrawCard { player, count } => {
            let max_hand = state.config().max_hand_size;
            let mut names = Vec::new();
            {
                let table = state.table_mut(*player);
                for _ in 0..*count {
                    match table.deck.pop() {
                        Some(name) => names.push(name),
                        None => break,
                    }
                }
            }
            if names.is_empty() {
                return Ok(None);
            }

            let drawn = names.len();
            let mut slots = Vec::new();
            for name in names {
                let object = state.instantiate(&name)?;
                let id = state.alloc_object_id();
                slots.push(ObjectSlot::new(id, object));
            }
            let table = state.table_mut(*player);
            for slot in slots {
                // Overdrawn cards are burned: drawn, then discarded unseen.
                if table.hand.len() < max_hand {
                    table.hand.push(slot);
                }
            }

            Ok(Some(ActionOutcome::new(Event::CardsDrawn {
                player: *player,
                count: drawn,
            })))
        }

        Action::DiscardCard { player, hand_index } => {
            let table = state.table_mut(*player);
            if *hand_index >= table.hand.len() {
                return Ok(None);
            }
            let slot = table.hand.remove(*hand_index);
            Ok(Some(ActionOutcome::new(Event::CardDiscarded {
                player: *player,
                name: slot.name,
            })))
        }

        Action::CreateDice { player, colors } => {
            let max_dice = state.config().max_dice;
            let table = state.table_mut(*player);
            let mut added = Vec::new();
            for &color in colors {
                if table.dice.len() >= max_dice {
                    break;
                }
                table.dice.push(color);
                added.push(color);
            }
            if added.is_empty() {
                return Ok(None);
            }
            Ok(Some(ActionOutcome::new(Event::DiceCreated {
                player: *player,
                colors: added,
            })))
        }

        Action::RemoveDice { player, indices } => {
            let table = state.table_mut(*player);
            let removed = table.dice.remove_indices(indices).ok_or_else(|| {
                EngineError::invariant(format!(
                    "dice removal indices {:?} invalid for pool of {}",
                    indices,
                    table.dice.len()
                ))
            })?;
            Ok(Some(ActionOutcome::new(Event::DiceRemoved {
                player: *player,
                count: removed.len(),
            })))
        }

        Action::Charge {
            player,
            character,
            delta,
        } => {
            let table = state.table_mut(*player);
            let Some(target) = table.characters.get_mut(*character) else {
                return Err(EngineError::invariant_at(
                    "charge target beyond roster",
                    Position::character(*player, *character),
                ));
            };
            if !target.alive {
                return Ok(None);
            }

            let next = target.charge as i32 + delta;
            if next < 0 {
                return Err(EngineError::invariant_at(
                    "charge driven below zero",
                    Position::character(*player, *character),
                ));
            }
            target.charge = (next as u8).min(target.max_charge);

            Ok(Some(ActionOutcome::new(Event::Charged {
                player: *player,
                character: *character,
                delta: *delta,
                charge: target.charge,
            })))
        }

        Action::SwitchCharacter { player, to } => {
            let table = state.table_mut(*player);
            let from = table.active_index();
            if from == *to {
                return Ok(None);
            }
            table.set_active(*to)?;
            Ok(Some(ActionOutcome::new(Event::CharacterSwitched {
                player: *player,
                from,
                to: *to,
            })))
        }

        Action::UseSkill { position, skill } => {
            if position.area != Area::Character {
                return Err(EngineError::invariant_at(
                    "skills are cast from character positions",
                    *position,
                ));
            }
            let alive = state
                .table(position.player)
                .characters
                .get(position.index)
                .is_some_and(|c| c.alive);
            if !alive {
                return Ok(None);
            }

            let Some(mut behavior) = state.take_object(*position) else {
                return Err(EngineError::invariant_at(
                    "skill cast while behavior lifted out",
                    *position,
                ));
            };
            let Some(name) = behavior.skills().get(*skill).map(|s| s.name.clone()) else {
                state.put_object(*position, behavior)?;
                return Err(EngineError::invariant_at(
                    format!("skill index {} out of range", skill),
                    *position,
                ));
            };
            let follow_up = behavior.use_skill(*skill, *position, state);
            state.put_object(*position, behavior)?;

            Ok(Some(ActionOutcome::with_follow_up(
                Event::SkillUsed {
                    source: *position,
                    skill: *skill,
                    name,
                },
                follow_up,
            )))
        }

        Action::PlayCard { player, hand_index } => {
            let table = state.table_mut(*player);
            if *hand_index >= table.hand.len() {
                return Ok(None);
            }
            let mut slot = table.hand.remove(*hand_index);
            let name = slot.name.clone();
            let Some(mut object) = slot.take() else {
                return Err(EngineError::invariant(format!(
                    "hand card {} has no behavior object",
                    name
                )));
            };

            let pos = Position::new(*player, Area::Hand, *hand_index);
            let follow_up = object.on_play(pos, state);

            Ok(Some(ActionOutcome::with_follow_up(
                Event::CardPlayed {
                    player: *player,
                    name,
                },
                follow_up,
            )))
        }

        Action::SkipPlayerAction { player } => Ok(Some(ActionOutcome::new(
            Event::PlayerActionSkipped { player: *player },
        ))),
    }
}
