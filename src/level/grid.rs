//! Symbolic level grids
//!
//! Content providers describe a level as a GRID_SIZE x GRID_SIZE grid of cell
//! tags. Row 0 is the top of the screen. Before a grid is turned into world
//! geometry it must satisfy a small playability contract: a solid ground row,
//! a starting platform, and coins/enemies only directly above walls.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{WorldLayout, ground_strip, level_length};
use crate::consts::*;
use crate::sim::state::{
    Coin, Decoration, DecorationKind, Enemy, EnemyKind, Platform, SurfaceKind,
};
use crate::sim::rect::Rect;

/// Bottom row, always solid
pub const GROUND_ROW: usize = GRID_SIZE - 1;
/// Row of the starting platform
pub const START_ROW: usize = GRID_SIZE - 2;
/// Columns of the starting platform
pub const START_COLS: std::ops::Range<usize> = 3..7;
/// Runs shorter than this are dropped when converting to platforms
pub const MIN_PLATFORM_RUN: usize = 2;
/// Below this many walls the repair pass adds extra ledges
pub const MIN_WALLS: usize = 50;
/// Platforms whose top is above this depth are stone, the rest wood
pub const STONE_DEPTH: f32 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Coin,
    Enemy,
    #[default]
    Empty,
}

impl Cell {
    pub fn symbol(&self) -> char {
        match self {
            Cell::Wall => 'W',
            Cell::Coin => 'C',
            Cell::Enemy => 'E',
            Cell::Empty => '.',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'W' => Some(Cell::Wall),
            'C' => Some(Cell::Coin),
            'E' => Some(Cell::Enemy),
            '.' | ' ' => Some(Cell::Empty),
            _ => None,
        }
    }
}

/// A grid that breaks the playability contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("grid must be 20 rows of 20 cells")]
    BadShape,
    #[error("unknown cell tag {0:?}")]
    UnknownTag(char),
    #[error("ground row has a gap at column {col}")]
    MissingGround { col: usize },
    #[error("starting platform has a gap at column {col}")]
    MissingStartPlatform { col: usize },
    #[error("{cell:?} at row {row}, column {col} is not directly above a wall")]
    Unsupported { cell: Cell, row: usize, col: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolicGrid {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Default for SymbolicGrid {
    fn default() -> Self {
        Self::empty()
    }
}

impl SymbolicGrid {
    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Parse one string per row using the `W C E .` symbols
    pub fn from_rows(rows: &[&str]) -> Result<Self, ContractViolation> {
        if rows.len() != GRID_SIZE {
            return Err(ContractViolation::BadShape);
        }
        let mut grid = Self::empty();
        for (row, text) in rows.iter().enumerate() {
            if text.chars().count() != GRID_SIZE {
                return Err(ContractViolation::BadShape);
            }
            for (col, c) in text.chars().enumerate() {
                grid.cells[row][col] = Cell::from_symbol(c).ok_or(ContractViolation::UnknownTag(c))?;
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    pub fn wall_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&c| c == Cell::Wall)
            .count()
    }

    /// All cells with the given tag, row-major
    pub fn positions(&self, cell: Cell) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(move |&(_, &c)| c == cell)
                .map(move |(col, _)| (row, col))
        })
    }

    fn is_supported(&self, row: usize, col: usize) -> bool {
        row < GROUND_ROW && self.cells[row + 1][col] == Cell::Wall
    }

    /// Try to drop `cell` at a random empty spot directly above a wall
    fn scatter(&mut self, rng: &mut impl Rng, cell: Cell) {
        let col = rng.random_range(1..=18);
        let row = rng.random_range(5..=17);
        if self.cells[row][col] == Cell::Empty && self.is_supported(row, col) {
            self.cells[row][col] = cell;
        }
    }

    /// Bring a raw grid into contract: solid ground row, starting platform,
    /// a few coins and enemies above walls, and extra ledges when sparse.
    pub fn repair(&mut self, rng: &mut impl Rng) {
        self.cells[GROUND_ROW] = [Cell::Wall; GRID_SIZE];
        for col in START_COLS {
            self.cells[START_ROW][col] = Cell::Wall;
        }

        for _ in 0..rng.random_range(3..=8) {
            self.scatter(rng, Cell::Coin);
        }
        for _ in 0..rng.random_range(2..=5) {
            self.scatter(rng, Cell::Enemy);
        }

        if self.wall_count() < MIN_WALLS {
            for _ in 0..rng.random_range(5..=10) {
                let col = rng.random_range(1..=18);
                let row = rng.random_range(10..=16);
                let len = rng.random_range(2..=5);
                for c in (col..col + len).filter(|&c| c < GROUND_ROW) {
                    self.cells[row][c] = Cell::Wall;
                }
            }
        }
    }

    pub fn check_contract(&self) -> Result<(), ContractViolation> {
        if let Some(col) = (0..GRID_SIZE).find(|&c| self.cells[GROUND_ROW][c] != Cell::Wall) {
            return Err(ContractViolation::MissingGround { col });
        }
        if let Some(col) = START_COLS
            .clone()
            .find(|&c| self.cells[START_ROW][c] != Cell::Wall)
        {
            return Err(ContractViolation::MissingStartPlatform { col });
        }
        for cell in [Cell::Coin, Cell::Enemy] {
            if let Some((row, col)) = self
                .positions(cell)
                .find(|&(row, col)| !self.is_supported(row, col))
            {
                return Err(ContractViolation::Unsupported { cell, row, col });
            }
        }
        Ok(())
    }

    /// Horizontal runs of walls as (row, first column, length)
    pub fn wall_runs(&self) -> Vec<(usize, usize, usize)> {
        let mut runs = Vec::new();
        for (row, cells) in self.cells.iter().enumerate() {
            let mut col = 0;
            while col < GRID_SIZE {
                if cells[col] != Cell::Wall {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < GRID_SIZE && cells[col] == Cell::Wall {
                    col += 1;
                }
                runs.push((row, start, col - start));
            }
        }
        runs
    }
}

impl fmt::Display for SymbolicGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

/// Convert a contract-checked grid to world-space content.
///
/// Columns scale to the level length, rows to the screen height. Wall runs of
/// at least two cells become platforms; single walls are dropped. The ground
/// strip is always the first platform.
pub fn to_world(grid: &SymbolicGrid, level: u32, enemy_speed: f32) -> WorldLayout {
    let length = level_length(level);
    let sx = length / GRID_SIZE as f32;
    let sy = SCREEN_HEIGHT / GRID_SIZE as f32;
    let cell_pos = |row: usize, col: usize| Vec2::new((col as f32 * sx).floor(), (row as f32 * sy).floor());

    let mut platforms = vec![ground_strip(length)];
    for (row, start, len) in grid.wall_runs() {
        if len < MIN_PLATFORM_RUN {
            continue;
        }
        let pos = cell_pos(row, start);
        let surface = if pos.y < GROUND_Y - STONE_DEPTH {
            SurfaceKind::Stone
        } else {
            SurfaceKind::Wood
        };
        platforms.push(Platform::new(
            pos.x,
            pos.y,
            (len as f32 * sx).floor(),
            PLATFORM_HEIGHT,
            surface,
        ));
    }

    // Kind alternates by cell parity so the conversion stays a pure function
    let enemies = grid
        .positions(Cell::Enemy)
        .map(|(row, col)| {
            let kind = if (row + col) % 2 == 0 {
                EnemyKind::Slime
            } else {
                EnemyKind::Bee
            };
            Enemy::new(cell_pos(row, col), kind, enemy_speed)
        })
        .collect();

    let coins = grid
        .positions(Cell::Coin)
        .map(|(row, col)| {
            let pos = cell_pos(row, col);
            Coin::new(pos.x, pos.y)
        })
        .collect();

    let span = (length - 400.0).max(1.0);
    let bush_x = 200.0 + ((grid.wall_count() * 97) as f32 % span).floor();
    let decorations = vec![Decoration {
        rect: Rect::new(bush_x, GROUND_Y - DECORATION_SIZE, BUSH_WIDTH, DECORATION_SIZE),
        kind: DecorationKind::Bush,
    }];

    WorldLayout {
        ground_y: GROUND_Y,
        length,
        platforms,
        hazards: Vec::new(),
        locks: Vec::new(),
        enemies,
        coins,
        decorations,
    }
}
