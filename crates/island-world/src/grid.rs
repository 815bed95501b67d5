//! 2D bounded grid for the island.

use crate::cell::Cell;
use island_core::{AnimalId, EcologyConfig, Error, Position, Result, WorldConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed-size grid of cells, stored row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Grid with empty plant stocks
    pub fn new(width: i32, height: i32, capacity: usize) -> Self {
        let size = width.max(0) as usize * height.max(0) as usize;
        Self {
            width,
            height,
            cells: vec![Cell::new(0, capacity); size],
        }
    }

    /// Create a grid from world configuration, rolling each cell's plants
    pub fn from_config<R: Rng + ?Sized>(
        world: &WorldConfig,
        ecology: &EcologyConfig,
        rng: &mut R,
    ) -> Self {
        let mut grid = Self::new(world.width, world.height, ecology.cell_capacity);
        for cell in &mut grid.cells {
            cell.set_plants(rng.gen_range(world.min_initial_plants..world.max_initial_plants));
        }
        grid
    }

    /// Bounds-checked access
    pub fn at(&self, pos: Position) -> Result<&Cell> {
        let index = self.pos_to_index(pos)?;
        Ok(&self.cells[index])
    }

    pub fn at_mut(&mut self, pos: Position) -> Result<&mut Cell> {
        let index = self.pos_to_index(pos)?;
        Ok(&mut self.cells[index])
    }

    fn pos_to_index(&self, pos: Position) -> Result<usize> {
        if !pos.in_bounds(self.width, self.height) {
            return Err(Error::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    /// Iterator over all positions, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell))
    }

    /// Find the cell currently holding `id`
    pub fn locate(&self, id: AnimalId) -> Option<Position> {
        self.iter()
            .find(|(_, cell)| cell.contains(id))
            .map(|(pos, _)| pos)
    }

    pub fn population(&self) -> usize {
        self.cells.iter().map(Cell::agent_count).sum()
    }

    pub fn total_plants(&self) -> u64 {
        self.cells.iter().map(|c| c.plants() as u64).sum()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            width: self.width,
            height: self.height,
            counts: self.cells.iter().map(Cell::agent_count).collect(),
        }
    }
}

/// Per-cell animal counts, row-major. Read-only diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: i32,
    pub height: i32,
    pub counts: Vec<usize>,
}

impl GridSnapshot {
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.counts.chunks(self.width.max(1) as usize)
    }
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for count in row {
                write!(f, "[{}] ", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
