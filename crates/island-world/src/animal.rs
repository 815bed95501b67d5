//! Animal state and the per-tick capabilities every species shares.

use crate::cell::Cell;
use crate::grid::Grid;
use island_core::{AnimalId, EcologyConfig, Family, Position, Result, Species};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const STEP_OFFSETS: [i32; 3] = [-1, 0, 1];

/// What a feeding attempt produced
#[derive(Debug)]
pub enum Meal {
    Nothing,
    Plant,
    Prey(Animal),
}

/// An animal on the island
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    pub species: Species,
    pub energy: i32,
}

impl Animal {
    /// A fresh animal at its species' starting energy
    pub fn new(species: Species) -> Self {
        Self {
            id: AnimalId::new(),
            species,
            energy: species.profile().initial_energy,
        }
    }

    pub fn family(&self) -> Family {
        self.species.family()
    }

    pub fn is_alive(&self) -> bool {
        self.energy > 0
    }

    pub fn add_energy(&mut self, amount: i32) {
        self.energy += amount;
    }

    /// Per-tick energy loss, identical for every species
    pub fn decay(&mut self, amount: i32) {
        self.energy -= amount;
    }

    /// Where this animal ends up after one random step from `from`.
    ///
    /// Each axis moves by -1, 0 or +1 and is clamped to the grid. A full
    /// destination keeps the animal where it is; staying put always works.
    pub fn next_position<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        from: Position,
        rng: &mut R,
    ) -> Result<Position> {
        let dx = *STEP_OFFSETS.choose(rng).unwrap_or(&0);
        let dy = *STEP_OFFSETS.choose(rng).unwrap_or(&0);
        let to = from.add(dx, dy).clamp(grid.width, grid.height);

        if to == from || !grid.at(to)?.is_full() {
            Ok(to)
        } else {
            Ok(from)
        }
    }

    /// Feed from `cell` using the family's strategy
    pub fn feed<R: Rng + ?Sized>(
        &mut self,
        cell: &mut Cell,
        ecology: &EcologyConfig,
        rng: &mut R,
    ) -> Meal {
        match self.family() {
            Family::Herbivore => {
                if cell.feed_herbivore(self, ecology.plant_energy) {
                    Meal::Plant
                } else {
                    Meal::Nothing
                }
            }
            Family::Predator => match cell.feed_predator(self, ecology, rng) {
                Some(prey) => Meal::Prey(prey),
                None => Meal::Nothing,
            },
        }
    }

    /// One reproduction roll. The parent pays nothing; the caller decides
    /// whether the offspring fits anywhere.
    pub fn attempt_reproduce<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Animal> {
        if rng.gen_range(0..100) < self.species.profile().reproduction_chance {
            Some(Animal::new(self.species))
        } else {
            None
        }
    }
}
