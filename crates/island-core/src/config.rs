//! Configuration types for the simulation.

use crate::{Error, Placement, Result, Species};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the island grid
    pub width: i32,
    /// Height of the island grid
    pub height: i32,
    /// Lower bound (inclusive) of the plant stock a cell starts with
    pub min_initial_plants: u32,
    /// Upper bound (exclusive) of the plant stock a cell starts with
    pub max_initial_plants: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            min_initial_plants: 5,
            max_initial_plants: 20,
        }
    }
}

/// Energy and capacity rules shared by every species
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EcologyConfig {
    /// Maximum number of animals a single cell may hold
    pub cell_capacity: usize,
    /// Energy every animal loses per tick
    pub decay_per_tick: i32,
    /// Energy a herbivore gains from one plant unit
    pub plant_energy: i32,
    /// Energy a predator gains from a successful hunt
    pub prey_energy: i32,
    /// Chance out of 100 that a hunt succeeds
    pub hunt_success_chance: u32,
}

impl Default for EcologyConfig {
    fn default() -> Self {
        Self {
            cell_capacity: 10,
            decay_per_tick: 5,
            plant_energy: 10,
            prey_energy: 20,
            hunt_success_chance: 60,
        }
    }
}

/// Rule toggles, mostly useful for experiments and deterministic tests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicRules {
    pub allow_movement: bool,
    pub allow_hunting: bool,
    pub allow_reproduction: bool,
}

impl Default for DynamicRules {
    fn default() -> Self {
        Self {
            allow_movement: true,
            allow_hunting: true,
            allow_reproduction: true,
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    pub world: WorldConfig,
    pub ecology: EcologyConfig,
    pub rules: DynamicRules,
    /// Animals placed before the first tick
    pub placements: Vec<Placement>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world: WorldConfig::default(),
            ecology: EcologyConfig::default(),
            rules: DynamicRules::default(),
            placements: vec![
                Placement::new(Species::Wolf, 2, 2),
                Placement::new(Species::Rabbit, 3, 3),
                Placement::new(Species::Fox, 1, 1),
                Placement::new(Species::Deer, 4, 4),
            ],
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.world.width <= 0 || self.world.height <= 0 {
            return Err(Error::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if self.world.width.checked_mul(self.world.height).is_none() {
            return Err(Error::InvalidConfig(format!(
                "grid {}x{} has too many cells",
                self.world.width, self.world.height
            )));
        }
        if self.world.min_initial_plants >= self.world.max_initial_plants {
            return Err(Error::InvalidConfig(format!(
                "initial plant range [{}, {}) is empty",
                self.world.min_initial_plants, self.world.max_initial_plants
            )));
        }
        if self.ecology.cell_capacity == 0 {
            return Err(Error::InvalidConfig("cell capacity must be positive".to_string()));
        }
        if self.ecology.hunt_success_chance > 100 {
            return Err(Error::InvalidConfig(format!(
                "hunt success chance {} exceeds 100",
                self.ecology.hunt_success_chance
            )));
        }
        Ok(())
    }
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Wall-clock interval between ticks (milliseconds)
    pub tick_interval_ms: u64,
    /// Stop after this many completed ticks; run forever when unset
    pub max_ticks: Option<u64>,
    /// Emit population metrics every N ticks
    pub metrics_every: u64,
    /// Tracing filter used when `RUST_LOG` is not set
    pub log_filter: String,
    pub simulation: SimulationConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2000,
            max_ticks: None,
            metrics_every: 10,
            log_filter: "info,island_world=debug".to_string(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(Error::InvalidConfig("tick interval must be positive".to_string()));
        }
        if self.metrics_every == 0 {
            return Err(Error::InvalidConfig("metrics_every must be positive".to_string()));
        }
        self.simulation.validate()
    }
}
