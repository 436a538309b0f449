//! Property and scenario tests for the default dice selector.

use proptest::prelude::*;

use omni_tcg::{
    cost_satisfied, select_for_cost, ColorPriority, Cost, DiceColor, DicePool, EngineError,
};

fn any_color() -> impl Strategy<Value = DiceColor> {
    prop::sample::select(DiceColor::ALL.to_vec())
}

fn any_element() -> impl Strategy<Value = DiceColor> {
    prop::sample::select(DiceColor::ELEMENTS.to_vec())
}

proptest! {
    /// Whenever the selector succeeds, the selection is exactly the cost's
    /// size, index-unique, and covers the cost.
    #[test]
    fn selection_is_exact_and_covers(
        colors in prop::collection::vec(any_color(), 0..12),
        element in any_element(),
        elemental_number in 0u8..3,
        same_number in 0u8..3,
        any_number in 0u8..3,
    ) {
        let cost = Cost {
            elemental_color: (elemental_number > 0).then_some(element),
            elemental_number,
            same_number,
            any_number,
            charge: 0,
        };
        let pool = DicePool::from_colors(colors);
        let priority = ColorPriority::for_elements(&[element]);

        if let Ok(selection) = select_for_cost(&pool, &cost, &priority) {
            prop_assert_eq!(selection.len(), cost.total_dice());

            let mut sorted = selection.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), cost.total_dice());

            let paid: Vec<DiceColor> =
                selection.iter().map(|&i| pool.colors()[i]).collect();
            prop_assert!(cost_satisfied(&paid, &cost));
        }
    }

    /// An all-omni pool of sufficient size pays any dice cost.
    #[test]
    fn omni_pays_everything(
        element in any_element(),
        elemental_number in 0u8..3,
        same_number in 0u8..3,
        any_number in 0u8..3,
    ) {
        let cost = Cost {
            elemental_color: (elemental_number > 0).then_some(element),
            elemental_number,
            same_number,
            any_number,
            charge: 0,
        };
        let pool = DicePool::from_colors(vec![DiceColor::Omni; cost.total_dice()]);
        let priority = ColorPriority::for_elements(&[element]);

        let selection = select_for_cost(&pool, &cost, &priority);
        prop_assert!(selection.is_ok());
        prop_assert_eq!(selection.unwrap().len(), cost.total_dice());
    }

    /// Failure is always the recoverable insufficient-dice error and never
    /// fires when an obviously sufficient all-omni pool is offered.
    #[test]
    fn failure_is_recoverable(
        colors in prop::collection::vec(any_color(), 0..4),
        same_number in 4u8..6,
    ) {
        let pool = DicePool::from_colors(colors);
        let priority = ColorPriority::for_elements(&[DiceColor::Pyro]);
        // Pool is strictly smaller than the requirement.
        let err = select_for_cost(&pool, &Cost::same(same_number), &priority).unwrap_err();
        let insufficient = matches!(err, EngineError::InsufficientDice { .. });
        prop_assert!(insufficient);
        prop_assert!(!err.is_fatal());
    }
}

#[test]
fn one_of_each_color_selects_the_exact_element() {
    let pool = DicePool::from_colors(DiceColor::ELEMENTS);
    let priority = ColorPriority::for_elements(&[DiceColor::Electro]);
    let cost = Cost::elemental(DiceColor::Electro, 1);

    let selection = select_for_cost(&pool, &cost, &priority).unwrap();
    assert_eq!(pool.colors()[selection[0]], DiceColor::Electro);

    let without = DicePool::from_colors([DiceColor::Pyro, DiceColor::Cryo]);
    assert!(select_for_cost(&without, &cost, &priority).is_err());
}

#[test]
fn exact_payment_rejects_change() {
    let cost = Cost::any(2);
    assert!(cost_satisfied(&[DiceColor::Geo, DiceColor::Anemo], &cost));
    assert!(!cost_satisfied(
        &[DiceColor::Geo, DiceColor::Anemo, DiceColor::Geo],
        &cost
    ));
    assert!(!cost_satisfied(&[DiceColor::Geo], &cost));
}

#[test]
fn mixed_cost_spends_junk_before_useful_colors() {
    // Elemental pyro plus two any; junk geo/anemo should cover the any
    // part, leaving omni and cryo in the pool.
    let pool = DicePool::from_colors([
        DiceColor::Omni,
        DiceColor::Pyro,
        DiceColor::Cryo,
        DiceColor::Geo,
        DiceColor::Anemo,
    ]);
    let priority = ColorPriority::for_elements(&[DiceColor::Pyro, DiceColor::Cryo]);
    let cost = Cost::elemental(DiceColor::Pyro, 1).plus_any(2);

    let selection = select_for_cost(&pool, &cost, &priority).unwrap();
    let mut paid: Vec<DiceColor> = selection.iter().map(|&i| pool.colors()[i]).collect();
    paid.sort();
    let mut expected = vec![DiceColor::Pyro, DiceColor::Geo, DiceColor::Anemo];
    expected.sort();
    assert_eq!(paid, expected);
}
