//! Island simulation engine.
//!
//! A bounded grid of cells, each holding animals and a plant stock, advanced
//! one sweep at a time.

pub mod animal;
pub mod cell;
pub mod grid;
pub mod simulation;

pub use animal::Animal;
pub use cell::Cell;
pub use grid::{Grid, GridSnapshot};
pub use simulation::{Simulation, TickReport};
