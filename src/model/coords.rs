use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type Group = u8;
pub type TrialSize = u32;

pub const GROUPS: [Group; 8] = [1, 2, 3, 4, 5, 6, 7, 8];
pub const DOMAINS: [Domain; 9] = [
    Domain::Labeled(1),
    Domain::Labeled(2),
    Domain::Labeled(3),
    Domain::Labeled(4),
    Domain::Labeled(5),
    Domain::Labeled(6),
    Domain::Labeled(7),
    Domain::Labeled(8),
    Domain::Null,
];
pub const TRIAL_SIZES: [TrialSize; 11] = [0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100];

/// Experimental domain of a result file. `Null` is the baseline condition and
/// orders after every labeled domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Domain {
    Labeled(u8),
    Null,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Labeled(d) => write!(f, "{d}"),
            Domain::Null => f.write_str("null"),
        }
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "null" {
            return Ok(Domain::Null);
        }
        s.parse::<u8>()
            .map(Domain::Labeled)
            .map_err(|_| format!("invalid domain label: {s:?}"))
    }
}

impl From<Domain> for String {
    fn from(value: Domain) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Domain {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub group: Group,
    pub domain: Domain,
    pub trial_size: TrialSize,
}

impl Coordinate {
    pub fn new(group: Group, domain: Domain, trial_size: TrialSize) -> Self {
        Self {
            group,
            domain,
            trial_size,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(group={}, domain={}, n={})",
            self.group, self.domain, self.trial_size
        )
    }
}

/// The declared coordinate space: the Cartesian product of [`GROUPS`],
/// [`DOMAINS`] and [`TRIAL_SIZES`]. Classifier, table and reducer all read
/// the axes from here.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateSpace;

impl CoordinateSpace {
    pub fn groups(&self) -> &'static [Group] {
        &GROUPS
    }

    pub fn domains(&self) -> &'static [Domain] {
        &DOMAINS
    }

    pub fn trial_sizes(&self) -> &'static [TrialSize] {
        &TRIAL_SIZES
    }

    pub fn len(&self) -> usize {
        GROUPS.len() * DOMAINS.len() * TRIAL_SIZES.len()
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        self.index_of(coord).is_some()
    }

    /// Dense row-major index (group, domain, trial size).
    pub fn index_of(&self, coord: &Coordinate) -> Option<usize> {
        let g = GROUPS.iter().position(|&g| g == coord.group)?;
        let d = DOMAINS.iter().position(|&d| d == coord.domain)?;
        let n = TRIAL_SIZES.iter().position(|&n| n == coord.trial_size)?;
        Some((g * DOMAINS.len() + d) * TRIAL_SIZES.len() + n)
    }

    /// Every coordinate, in the same order as [`CoordinateSpace::index_of`].
    pub fn iter(self) -> impl Iterator<Item = Coordinate> {
        GROUPS.iter().flat_map(|&group| {
            DOMAINS.iter().flat_map(move |&domain| {
                TRIAL_SIZES
                    .iter()
                    .map(move |&trial_size| Coordinate::new(group, domain, trial_size))
            })
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/coords.rs"]
mod tests;
