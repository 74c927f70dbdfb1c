pub mod coords;
pub mod stats;
