use std::collections::BTreeMap;

use crate::model::coords::{Coordinate, Domain, Group, TrialSize};
use crate::model::stats::{AggregateTable, SufficientStat};

/// How one coordinate axis is treated by [`marginalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis<T> {
    /// Part of the output key.
    Keep,
    /// Summed over every value.
    Sum,
    /// Restricted to one value, then dropped from the key.
    Fixed(T),
}

impl<T: PartialEq + Copy> Axis<T> {
    fn admits(&self, value: T) -> bool {
        match self {
            Axis::Fixed(v) => *v == value,
            Axis::Keep | Axis::Sum => true,
        }
    }

    fn key(&self, value: T) -> Option<T> {
        match self {
            Axis::Keep => Some(value),
            Axis::Sum | Axis::Fixed(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margin {
    pub group: Axis<Group>,
    pub domain: Axis<Domain>,
    pub trial_size: Axis<TrialSize>,
}

/// Kept-axis coordinate of a marginal view; summed or fixed axes are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarginKey {
    pub group: Option<Group>,
    pub domain: Option<Domain>,
    pub trial_size: Option<TrialSize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialSizeFilter {
    All,
    At(TrialSize),
}

impl TrialSizeFilter {
    fn axis(self) -> Axis<TrialSize> {
        match self {
            TrialSizeFilter::All => Axis::Sum,
            TrialSizeFilter::At(n) => Axis::Fixed(n),
        }
    }
}

/// Sums counts and score sums over the discarded axes. Every kept-axis key
/// present in the table appears in the result, zero-count keys included.
pub fn marginalize(table: &AggregateTable, margin: &Margin) -> BTreeMap<MarginKey, SufficientStat> {
    let mut out: BTreeMap<MarginKey, SufficientStat> = BTreeMap::new();
    for (coord, stat) in table.iter() {
        if !admits(margin, &coord) {
            continue;
        }
        let key = MarginKey {
            group: margin.group.key(coord.group),
            domain: margin.domain.key(coord.domain),
            trial_size: margin.trial_size.key(coord.trial_size),
        };
        *out.entry(key).or_default() += stat;
    }
    out
}

fn admits(margin: &Margin, coord: &Coordinate) -> bool {
    margin.group.admits(coord.group)
        && margin.domain.admits(coord.domain)
        && margin.trial_size.admits(coord.trial_size)
}

pub fn per_group(table: &AggregateTable) -> BTreeMap<Group, f64> {
    let margin = Margin {
        group: Axis::Keep,
        domain: Axis::Sum,
        trial_size: Axis::Sum,
    };
    marginalize(table, &margin)
        .into_iter()
        .filter_map(|(k, s)| Some((k.group?, s.mean())))
        .collect()
}

pub fn per_group_domain(
    table: &AggregateTable,
    trial_sizes: TrialSizeFilter,
) -> BTreeMap<(Group, Domain), f64> {
    let margin = Margin {
        group: Axis::Keep,
        domain: Axis::Keep,
        trial_size: trial_sizes.axis(),
    };
    marginalize(table, &margin)
        .into_iter()
        .filter_map(|(k, s)| Some(((k.group?, k.domain?), s.mean())))
        .collect()
}

pub fn per_group_trial_size(
    table: &AggregateTable,
    domain: Domain,
) -> BTreeMap<(Group, TrialSize), f64> {
    let margin = Margin {
        group: Axis::Keep,
        domain: Axis::Fixed(domain),
        trial_size: Axis::Keep,
    };
    marginalize(table, &margin)
        .into_iter()
        .filter_map(|(k, s)| Some(((k.group?, k.trial_size?), s.mean())))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_reduce.rs"]
mod tests;
