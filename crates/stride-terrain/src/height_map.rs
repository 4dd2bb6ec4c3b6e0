//! Discretized terrain heights.

use std::collections::HashMap;

use nalgebra::Vector2;

use crate::error::TerrainError;

/// Integer index of a square terrain cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i64,
    pub y: i64,
}

impl Cell {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Terrain height per cell.
///
/// Cell `(i, j)` covers `[i r, (i + 1) r) x [j r, (j + 1) r)` for resolution
/// `r`. Cells without a height are unknown terrain.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    resolution: f64,
    cells: HashMap<Cell, f64>,
}

impl HeightMap {
    /// Empty map with square cells of side `resolution` (meters).
    pub fn new(resolution: f64) -> Result<Self, TerrainError> {
        if resolution > 0.0 && resolution.is_finite() {
            Ok(Self {
                resolution,
                cells: HashMap::new(),
            })
        } else {
            Err(TerrainError::InvalidResolution(resolution))
        }
    }

    /// Map built from `(x, y, height)` samples. Later samples of the same
    /// cell overwrite earlier ones.
    pub fn from_points<I>(resolution: f64, points: I) -> Result<Self, TerrainError>
    where
        I: IntoIterator<Item = (f64, f64, f64)>,
    {
        let mut map = Self::new(resolution)?;
        for (x, y, height) in points {
            map.insert(&Vector2::new(x, y), height);
        }
        Ok(map)
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell containing `coord`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn coord_to_cell(&self, coord: &Vector2<f64>) -> Cell {
        Cell::new(
            (coord.x / self.resolution).floor() as i64,
            (coord.y / self.resolution).floor() as i64,
        )
    }

    /// Center of `cell`.
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_to_coord(&self, cell: Cell) -> Vector2<f64> {
        Vector2::new(
            (cell.x as f64 + 0.5) * self.resolution,
            (cell.y as f64 + 0.5) * self.resolution,
        )
    }

    /// Set the height of the cell containing `coord`.
    pub fn insert(&mut self, coord: &Vector2<f64>, height: f64) {
        let cell = self.coord_to_cell(coord);
        self.cells.insert(cell, height);
    }

    pub fn insert_cell(&mut self, cell: Cell, height: f64) {
        self.cells.insert(cell, height);
    }

    pub fn cell_height(&self, cell: Cell) -> Option<f64> {
        self.cells.get(&cell).copied()
    }

    /// Height of the cell containing `coord`, if known.
    pub fn height_at(&self, coord: &Vector2<f64>) -> Option<f64> {
        self.cell_height(self.coord_to_cell(coord))
    }
}
