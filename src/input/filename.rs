use std::sync::LazyLock;

use regex::Regex;

use crate::model::coords::{Coordinate, Domain, Group, TrialSize};

static STANDARD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^results_(?P<group>[0-9])_(?P<domain>[0-9])_(?P<batch>[0-9])_(?P<n>[0-9]+)\.csv$")
        .expect("standard result pattern is valid")
});

static NULL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^results_(?P<group>[0-9])_nulls_(?P<n>[0-9]+)\.csv$")
        .expect("null result pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Standard {
        group: Group,
        domain: Domain,
        trial_size: TrialSize,
    },
    NullDomain {
        group: Group,
        trial_size: TrialSize,
    },
    Unclassifiable,
}

impl Classification {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match *self {
            Classification::Standard {
                group,
                domain,
                trial_size,
            } => Some(Coordinate::new(group, domain, trial_size)),
            Classification::NullDomain { group, trial_size } => {
                Some(Coordinate::new(group, Domain::Null, trial_size))
            }
            Classification::Unclassifiable => None,
        }
    }
}

/// Maps a result file name to its experimental coordinate. Digits are ASCII
/// only. A matching name keeps its captured values even when they fall outside
/// [`crate::model::coords::CoordinateSpace`]; the scan decides what to do
/// with such files.
pub fn classify(name: &str) -> Classification {
    parse_name(name).unwrap_or(Classification::Unclassifiable)
}

fn parse_name(name: &str) -> Option<Classification> {
    if let Some(caps) = STANDARD_PATTERN.captures(name) {
        Some(Classification::Standard {
            group: caps["group"].parse().ok()?,
            domain: caps["domain"].parse().ok()?,
            trial_size: caps["n"].parse().ok()?,
        })
    } else if let Some(caps) = NULL_PATTERN.captures(name) {
        Some(Classification::NullDomain {
            group: caps["group"].parse().ok()?,
            trial_size: caps["n"].parse().ok()?,
        })
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/filename.rs"]
mod tests;
