//! Simulation engine for running the island.

use crate::animal::{Animal, Meal};
use crate::grid::{Grid, GridSnapshot};
use island_core::{AnimalId, Placement, Position, Result, SimulationConfig, Species};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// What happened during one sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub births: u32,
    pub deaths: u32,
    pub kills: u32,
    pub plants_eaten: u32,
    pub population: usize,
    pub snapshot: GridSnapshot,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Tick {} ===", self.tick)?;
        write!(f, "{}", self.snapshot)
    }
}

#[derive(Debug, Default)]
struct Tally {
    births: u32,
    deaths: u32,
    kills: u32,
    plants_eaten: u32,
}

pub struct Simulation<R = ChaCha8Rng> {
    grid: Grid,
    config: SimulationConfig,
    rng: R,
    tick: u64,
    reproduction_attempts: u64,
    reproduction_successes: u64,
    total_births: u64,
    total_deaths: u64,
    total_kills: u64,
}

impl Simulation<ChaCha8Rng> {
    /// Build a seeded simulation and place `config.placements`
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Build a simulation around an explicit random source
    pub fn with_rng(config: SimulationConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let grid = Grid::from_config(&config.world, &config.ecology, &mut rng);
        let placements = config.placements.clone();

        let mut sim = Self {
            grid,
            config,
            rng,
            tick: 0,
            reproduction_attempts: 0,
            reproduction_successes: 0,
            total_births: 0,
            total_deaths: 0,
            total_kills: 0,
        };
        sim.seed(&placements)?;
        Ok(sim)
    }

    /// Place animals at fresh starting energy. Placements into a full cell
    /// are skipped; out-of-bounds placements are an error.
    pub fn seed(&mut self, placements: &[Placement]) -> Result<usize> {
        // Reject the whole batch before touching the grid
        for placement in placements {
            self.grid.at(placement.position)?;
        }

        let mut placed = 0;
        for placement in placements {
            let cell = self.grid.at_mut(placement.position)?;
            if cell.add_agent(Animal::new(placement.species)) {
                placed += 1;
            } else {
                warn!(
                    species = %placement.species,
                    position = %placement.position,
                    "Cell is full, placement skipped"
                );
            }
        }
        info!("Seeded {} of {} animals", placed, placements.len());
        Ok(placed)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Number of completed sweeps
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn population(&self) -> usize {
        self.grid.population()
    }

    /// Living animals per species
    pub fn census(&self) -> BTreeMap<Species, usize> {
        let mut census = BTreeMap::new();
        for (_, cell) in self.grid.iter() {
            for animal in cell.animals() {
                *census.entry(animal.species).or_insert(0) += 1;
            }
        }
        census
    }

    /// Run one full sweep: every animal present when its cell is reached
    /// acts exactly once.
    #[instrument(skip(self), fields(tick = self.tick + 1))]
    pub fn step(&mut self) -> Result<TickReport> {
        self.tick += 1;
        let mut tally = Tally::default();
        // Animals that already acted this sweep, plus newborns
        let mut handled: HashSet<AnimalId> = HashSet::new();

        let positions: Vec<Position> = self.grid.positions().collect();
        for pos in positions {
            let roster: Vec<AnimalId> = self
                .grid
                .at(pos)?
                .animal_ids()
                .filter(|id| !handled.contains(id))
                .collect();

            for id in roster {
                handled.insert(id);
                self.process_animal(id, pos, &mut handled, &mut tally)?;
            }
        }

        self.total_births += tally.births as u64;
        self.total_deaths += tally.deaths as u64;
        self.total_kills += tally.kills as u64;

        let report = TickReport {
            tick: self.tick,
            births: tally.births,
            deaths: tally.deaths,
            kills: tally.kills,
            plants_eaten: tally.plants_eaten,
            population: self.grid.population(),
            snapshot: self.grid.snapshot(),
        };
        debug!(
            births = report.births,
            deaths = report.deaths,
            kills = report.kills,
            population = report.population,
            "Tick complete"
        );
        Ok(report)
    }

    /// move -> feed -> reproduce -> decay -> death check
    fn process_animal(
        &mut self,
        id: AnimalId,
        origin: Position,
        handled: &mut HashSet<AnimalId>,
        tally: &mut Tally,
    ) -> Result<()> {
        // Gone already: eaten earlier in this sweep
        let mut animal = match self.grid.at_mut(origin)?.remove_agent(id) {
            Some(animal) => animal,
            None => return Ok(()),
        };

        let dest = if self.config.rules.allow_movement {
            // The animal is out of `origin` while it decides, so staying put
            // always fits and moving checks only the destination.
            animal.next_position(&self.grid, origin, &mut self.rng)?
        } else {
            origin
        };

        let ecology = &self.config.ecology;
        let cell = self.grid.at_mut(dest)?;

        if animal.species.is_herbivore() || self.config.rules.allow_hunting {
            match animal.feed(cell, ecology, &mut self.rng) {
                Meal::Plant => {
                    tally.plants_eaten += 1;
                    debug!(species = %animal.species, position = %dest, "Ate a plant");
                }
                Meal::Prey(prey) => {
                    tally.kills += 1;
                    debug!(
                        hunter = %animal.species,
                        prey = %prey.species,
                        position = %dest,
                        "Hunt succeeded"
                    );
                }
                Meal::Nothing => {}
            }
        }

        let offspring = if self.config.rules.allow_reproduction {
            self.reproduction_attempts += 1;
            animal.attempt_reproduce(&mut self.rng)
        } else {
            None
        };

        // The parent still holds a slot while it reproduces
        let offspring = offspring.filter(|child| {
            let fits = cell.agent_count() + 1 < cell.capacity();
            if !fits {
                debug!(species = %child.species, position = %dest, "No room for offspring");
            }
            fits
        });

        animal.decay(ecology.decay_per_tick);

        if animal.is_alive() {
            let species = animal.species;
            if !cell.add_agent(animal) {
                warn!(species = %species, position = %dest, "Animal lost: no slot to return to");
            }
        } else {
            tally.deaths += 1;
            debug!(species = %animal.species, position = %dest, "Starved");
        }

        if let Some(child) = offspring {
            handled.insert(child.id);
            let species = child.species;
            if cell.add_agent(child) {
                self.reproduction_successes += 1;
                tally.births += 1;
                debug!(species = %species, position = %dest, "Born");
            }
        }

        Ok(())
    }

    /// Emit population metrics
    pub fn emit_population_metrics(&self) {
        let census = self.census();
        let success_rate = if self.reproduction_attempts > 0 {
            (self.reproduction_successes as f64 / self.reproduction_attempts as f64) * 100.0
        } else {
            0.0
        };

        info!(
            event = "population_metrics",
            tick = self.tick,
            total_population = self.grid.population(),
            total_plants = self.grid.total_plants(),
            reproduction_attempts = self.reproduction_attempts,
            reproduction_successes = self.reproduction_successes,
            reproduction_success_rate = format!("{:.2}%", success_rate),
            total_births = self.total_births,
            total_deaths = self.total_deaths,
            total_kills = self.total_kills,
            "Population metrics snapshot"
        );

        for (species, count) in &census {
            info!(
                gauge_name = "species_population",
                species = %species,
                gauge_value = count,
                tick = self.tick,
                "Species population"
            );
        }
    }
}
