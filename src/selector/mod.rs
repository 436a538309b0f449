//! Default dice selection.
//!
//! Players (or agents) may pick dice by hand; everything here is the default
//! policy the driver falls back to when a submission does not name indices.
//! Selection is driven by a [`ColorPriority`]: an ordering from most useful
//! to least useful, so payments spend junk dice first and rerolls keep the
//! colors the roster can actually use.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::{Cost, DiceColor, DicePool, EngineError, EngineResult};

/// Indices into a dice pool.
pub type DiceSelection = SmallVec<[usize; 8]>;

/// A usefulness ordering over dice colors.
///
/// Lower rank is more useful. Colors absent from the ordering share the
/// worst rank and are spent first.
#[derive(Clone, Debug)]
pub struct ColorPriority {
    order: Vec<DiceColor>,
    rank: FxHashMap<DiceColor, usize>,
    /// Ranks below this are "useful": worth keeping in a reroll.
    useful: usize,
}

impl ColorPriority {
    /// Build a priority from an explicit ordering, most useful first.
    /// Duplicates keep their first rank. Every listed color counts as
    /// useful; unlisted colors rank worst.
    pub fn new(order: impl IntoIterator<Item = DiceColor>) -> Self {
        let mut deduped = Vec::new();
        let mut rank = FxHashMap::default();
        for color in order {
            if !rank.contains_key(&color) {
                rank.insert(color, deduped.len());
                deduped.push(color);
            }
        }
        let useful = deduped.len();
        Self {
            order: deduped,
            rank,
            useful,
        }
    }

    /// The standard ordering for a roster: omni, then the given elements
    /// (the useful head), then every remaining element as junk.
    #[must_use]
    pub fn for_elements(elements: &[DiceColor]) -> Self {
        let mut priority = Self::new(
            std::iter::once(DiceColor::Omni)
                .chain(elements.iter().copied().filter(|c| c.is_element())),
        );
        for color in DiceColor::ELEMENTS {
            if !priority.rank.contains_key(&color) {
                priority.rank.insert(color, priority.order.len());
                priority.order.push(color);
            }
        }
        priority
    }

    /// Rank of a color; unknown colors rank worst.
    #[must_use]
    pub fn rank(&self, color: DiceColor) -> usize {
        self.rank.get(&color).copied().unwrap_or(self.order.len())
    }

    /// Is `color` worth keeping in a reroll?
    #[must_use]
    pub fn is_useful(&self, color: DiceColor) -> bool {
        self.rank(color) < self.useful
    }
}

/// Pick dice indices paying `cost` out of `pool`.
///
/// Requirements are filled in order: elemental (exact color first, omni to
/// fill), same-color (the candidate color spending the fewest omni, ties
/// broken toward the least useful color), then any-color (least useful dice
/// first). Fails with [`EngineError::InsufficientDice`] when the pool cannot
/// cover the cost; the charge component is the caller's concern.
pub fn select_for_cost(
    pool: &DicePool,
    cost: &Cost,
    priority: &ColorPriority,
) -> EngineResult<DiceSelection> {
    let colors = pool.colors();
    let mut used = vec![false; colors.len()];
    let mut selection = DiceSelection::new();

    let insufficient = || EngineError::InsufficientDice {
        needed: cost.total_dice(),
        available: pool.len(),
    };

    // Elemental requirement: exact color in pool order, then omni.
    if cost.elemental_number > 0 {
        let color = cost.elemental_color.ok_or_else(|| {
            EngineError::invariant("elemental cost component without a color")
        })?;
        let mut remaining = cost.elemental_number as usize;
        for pass_color in [color, DiceColor::Omni] {
            for (i, &c) in colors.iter().enumerate() {
                if remaining == 0 {
                    break;
                }
                if !used[i] && c == pass_color {
                    used[i] = true;
                    selection.push(i);
                    remaining -= 1;
                }
            }
        }
        if remaining > 0 {
            return Err(insufficient());
        }
    }

    // Same-color requirement: pick the candidate color that burns the
    // fewest omni; among equals, the least useful color.
    if cost.same_number > 0 {
        let needed = cost.same_number as usize;
        let omni_free = colors
            .iter()
            .enumerate()
            .filter(|&(i, &c)| !used[i] && c == DiceColor::Omni)
            .count();

        let mut best: Option<(usize, DiceColor)> = None;
        for candidate in DiceColor::ALL {
            let have = if candidate == DiceColor::Omni {
                omni_free
            } else {
                colors
                    .iter()
                    .enumerate()
                    .filter(|&(i, &c)| !used[i] && c == candidate)
                    .count()
            };
            let from_omni = if candidate == DiceColor::Omni {
                needed
            } else {
                needed.saturating_sub(have).min(omni_free)
            };
            let covered = if candidate == DiceColor::Omni {
                have
            } else {
                have.min(needed) + from_omni
            };
            if covered < needed {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_omni, best_color)) => {
                    from_omni < best_omni
                        || (from_omni == best_omni
                            && priority.rank(candidate) > priority.rank(best_color))
                }
            };
            if better {
                best = Some((from_omni, candidate));
            }
        }
        let (_, chosen) = best.ok_or_else(insufficient)?;

        let mut remaining = needed;
        for pass_color in [chosen, DiceColor::Omni] {
            for (i, &c) in colors.iter().enumerate() {
                if remaining == 0 {
                    break;
                }
                if !used[i] && c == pass_color {
                    used[i] = true;
                    selection.push(i);
                    remaining -= 1;
                }
            }
            if chosen == DiceColor::Omni {
                break;
            }
        }
        if remaining > 0 {
            return Err(insufficient());
        }
    }

    // Any-color requirement: least useful dice first.
    if cost.any_number > 0 {
        let mut free: Vec<usize> = (0..colors.len()).filter(|&i| !used[i]).collect();
        free.sort_by(|&a, &b| {
            priority
                .rank(colors[b])
                .cmp(&priority.rank(colors[a]))
                .then(a.cmp(&b))
        });
        if free.len() < cost.any_number as usize {
            return Err(insufficient());
        }
        for &i in free.iter().take(cost.any_number as usize) {
            used[i] = true;
            selection.push(i);
        }
    }

    Ok(selection)
}

/// Does an exact payment of `colors` cover the dice components of `cost`?
///
/// The payment must be exact: no change is given. The charge component is
/// not checked here.
#[must_use]
pub fn cost_satisfied(colors: &[DiceColor], cost: &Cost) -> bool {
    if colors.len() != cost.total_dice() {
        return false;
    }

    // Try every possible color for the same-color component; omni only
    // fills what exact colors cannot.
    DiceColor::ALL.iter().any(|&same_color| {
        let mut counts: FxHashMap<DiceColor, usize> = FxHashMap::default();
        for &c in colors {
            *counts.entry(c).or_insert(0) += 1;
        }

        let mut take = |color: DiceColor, n: usize| -> bool {
            let mut remaining = n;
            for source in [color, DiceColor::Omni] {
                let have = counts.entry(source).or_insert(0);
                let taken = remaining.min(*have);
                *have -= taken;
                remaining -= taken;
            }
            remaining == 0
        };

        if cost.elemental_number > 0 {
            let Some(elemental) = cost.elemental_color else {
                return false;
            };
            if !take(elemental, cost.elemental_number as usize) {
                return false;
            }
        }
        if cost.same_number > 0 && !take(same_color, cost.same_number as usize) {
            return false;
        }
        // Whatever remains covers the any component exactly, because the
        // total length matched up front.
        true
    })
}

/// Pick the dice worth rerolling: everything that is neither omni nor a
/// color the priority lists as useful.
#[must_use]
pub fn select_reroll(pool: &DicePool, priority: &ColorPriority) -> DiceSelection {
    pool.colors()
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c != DiceColor::Omni && !priority.is_useful(c))
        .map(|(i, _)| i)
        .collect()
}

/// Pick the die to convert during elemental tuning.
///
/// Omni and dice already showing `target` are never converted; among the
/// rest the least useful die is chosen.
pub fn select_tuning(
    pool: &DicePool,
    target: DiceColor,
    priority: &ColorPriority,
) -> EngineResult<usize> {
    pool.colors()
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c != DiceColor::Omni && c != target)
        .max_by_key(|&(i, &c)| (priority.rank(c), usize::MAX - i))
        .map(|(i, _)| i)
        .ok_or(EngineError::InsufficientDice {
            needed: 1,
            available: 0,
        })
}
