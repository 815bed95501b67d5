//! A single island location: the animals standing on it and its plant stock.

use crate::animal::Animal;
use island_core::{AnimalId, EcologyConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    animals: Vec<Animal>,
    plants: u32,
    capacity: usize,
}

impl Cell {
    pub fn new(plants: u32, capacity: usize) -> Self {
        Self {
            animals: Vec::with_capacity(capacity),
            plants,
            capacity,
        }
    }

    pub fn plants(&self) -> u32 {
        self.plants
    }

    pub fn set_plants(&mut self, plants: u32) {
        self.plants = plants;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn agent_count(&self) -> usize {
        self.animals.len()
    }

    pub fn is_full(&self) -> bool {
        self.animals.len() >= self.capacity
    }

    pub fn animals(&self) -> &[Animal] {
        &self.animals
    }

    pub fn animal_ids(&self) -> impl Iterator<Item = AnimalId> + '_ {
        self.animals.iter().map(|a| a.id)
    }

    pub fn contains(&self, id: AnimalId) -> bool {
        self.animals.iter().any(|a| a.id == id)
    }

    /// Add an animal. Returns `false` (and drops nothing into the cell) when
    /// the cell is full or the animal is already here.
    pub fn add_agent(&mut self, animal: Animal) -> bool {
        if self.is_full() || self.contains(animal.id) {
            return false;
        }
        self.animals.push(animal);
        true
    }

    /// Remove an animal by id. Absent ids are ignored.
    pub fn remove_agent(&mut self, id: AnimalId) -> Option<Animal> {
        let index = self.animals.iter().position(|a| a.id == id)?;
        Some(self.animals.swap_remove(index))
    }

    /// Herbivore grazing: one plant unit for `plant_energy`, if any is left.
    pub fn feed_herbivore(&mut self, animal: &mut Animal, plant_energy: i32) -> bool {
        if self.plants == 0 {
            return false;
        }
        self.plants -= 1;
        animal.add_energy(plant_energy);
        true
    }

    /// Predator hunt: pick a herbivore uniformly, then roll against the hunt
    /// chance. On success the prey leaves the cell and is returned.
    pub fn feed_predator<R: Rng + ?Sized>(
        &mut self,
        hunter: &mut Animal,
        ecology: &EcologyConfig,
        rng: &mut R,
    ) -> Option<Animal> {
        let prey: Vec<AnimalId> = self
            .animals
            .iter()
            .filter(|a| a.species.is_herbivore() && a.id != hunter.id)
            .map(|a| a.id)
            .collect();

        let target = *prey.choose(rng)?;
        if rng.gen_range(0..100) >= ecology.hunt_success_chance {
            return None;
        }

        let eaten = self.remove_agent(target)?;
        hunter.add_energy(ecology.prey_energy);
        Some(eaten)
    }
}
