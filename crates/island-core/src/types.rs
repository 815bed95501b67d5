//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an animal instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimalId(pub Uuid);

impl AnimalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnimalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position on the island
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Clamp into `[0, width) x [0, height)`. Edges absorb: a step past the
    /// border lands on the border.
    pub fn clamp(&self, width: i32, height: i32) -> Self {
        Self {
            x: self.x.clamp(0, width - 1),
            y: self.y.clamp(0, height - 1),
        }
    }

    pub fn in_bounds(&self, width: i32, height: i32) -> bool {
        (0..width).contains(&self.x) && (0..height).contains(&self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Feeding family. Decides which feeding strategy a species uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    Predator,
    Herbivore,
}

/// Every species living on the island
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Wolf,
    Fox,
    Bear,
    Eagle,
    Python,
    Rabbit,
    Horse,
    Deer,
    Mouse,
}

/// Static per-species parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesProfile {
    pub family: Family,
    pub initial_energy: i32,
    /// Chance out of 100 that a reproduction roll succeeds
    pub reproduction_chance: u32,
}

impl SpeciesProfile {
    const fn new(family: Family, initial_energy: i32, reproduction_chance: u32) -> Self {
        Self {
            family,
            initial_energy,
            reproduction_chance,
        }
    }
}

impl Species {
    pub fn profile(&self) -> SpeciesProfile {
        use Family::*;
        match self {
            Species::Wolf => SpeciesProfile::new(Predator, 50, 20),
            Species::Fox => SpeciesProfile::new(Predator, 40, 25),
            Species::Bear => SpeciesProfile::new(Predator, 60, 15),
            Species::Eagle => SpeciesProfile::new(Predator, 45, 10),
            Species::Python => SpeciesProfile::new(Predator, 55, 30),
            Species::Rabbit => SpeciesProfile::new(Herbivore, 30, 40),
            Species::Horse => SpeciesProfile::new(Herbivore, 50, 20),
            Species::Deer => SpeciesProfile::new(Herbivore, 40, 25),
            Species::Mouse => SpeciesProfile::new(Herbivore, 20, 50),
        }
    }

    pub fn family(&self) -> Family {
        self.profile().family
    }

    pub fn is_predator(&self) -> bool {
        self.family() == Family::Predator
    }

    pub fn is_herbivore(&self) -> bool {
        self.family() == Family::Herbivore
    }

    pub fn all() -> [Species; 9] {
        [
            Species::Wolf,
            Species::Fox,
            Species::Bear,
            Species::Eagle,
            Species::Python,
            Species::Rabbit,
            Species::Horse,
            Species::Deer,
            Species::Mouse,
        ]
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An initial animal placement used to seed the island
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub species: Species,
    pub position: Position,
}

impl Placement {
    pub fn new(species: Species, x: i32, y: i32) -> Self {
        Self {
            species,
            position: Position::new(x, y),
        }
    }
}
