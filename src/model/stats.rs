use std::ops::{Add, AddAssign};

use crate::model::coords::{Coordinate, CoordinateSpace};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StatsError {
    #[error("coordinate {0} is outside the declared coordinate space")]
    OutOfSpace(Coordinate),
}

/// Count and score sum for one condition. The mean is derived on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SufficientStat {
    pub count: u64,
    pub score_sum: f64,
}

impl SufficientStat {
    pub fn new(count: u64, score_sum: f64) -> Self {
        Self { count, score_sum }
    }

    pub fn observe(&mut self, score: f64) {
        self.count += 1;
        self.score_sum += score;
    }

    /// Zero observations report a mean of 0.
    pub fn mean(&self) -> f64 {
        self.score_sum / self.count.max(1) as f64
    }
}

impl Add for SufficientStat {
    type Output = SufficientStat;

    fn add(self, rhs: Self) -> Self::Output {
        SufficientStat {
            count: self.count + rhs.count,
            score_sum: self.score_sum + rhs.score_sum,
        }
    }
}

impl AddAssign for SufficientStat {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Dense table with one statistic per coordinate of [`CoordinateSpace`].
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTable {
    cells: Vec<SufficientStat>,
}

impl Default for AggregateTable {
    fn default() -> Self {
        Self::initialize()
    }
}

impl AggregateTable {
    pub fn initialize() -> Self {
        Self {
            cells: vec![SufficientStat::default(); CoordinateSpace.len()],
        }
    }

    pub fn accumulate(&mut self, coord: Coordinate, score: f64) -> Result<(), StatsError> {
        let idx = CoordinateSpace
            .index_of(&coord)
            .ok_or(StatsError::OutOfSpace(coord))?;
        self.cells[idx].observe(score);
        Ok(())
    }

    /// Overwrites the statistic at `coord`. Used when restoring a snapshot.
    pub fn set(&mut self, coord: Coordinate, stat: SufficientStat) -> Result<(), StatsError> {
        let idx = CoordinateSpace
            .index_of(&coord)
            .ok_or(StatsError::OutOfSpace(coord))?;
        self.cells[idx] = stat;
        Ok(())
    }

    pub fn get(&self, coord: &Coordinate) -> Option<SufficientStat> {
        CoordinateSpace
            .index_of(coord)
            .map(|idx| self.cells[idx])
    }

    pub fn merge(&mut self, other: &AggregateTable) {
        for (cell, rhs) in self.cells.iter_mut().zip(&other.cells) {
            *cell += *rhs;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, SufficientStat)> + '_ {
        CoordinateSpace.iter().zip(self.cells.iter().copied())
    }

    pub fn total(&self) -> SufficientStat {
        self.cells
            .iter()
            .copied()
            .fold(SufficientStat::default(), Add::add)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/stats.rs"]
mod tests;
