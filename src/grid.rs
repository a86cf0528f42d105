//! 5x5 frequency/monetary grid

use crate::error::{RfmError, RfmResult};
use crate::model::{ScoredCustomer, MAX_SCORE, MIN_SCORE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Customers sharing one (x, y) position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub count: usize,
    pub items: Vec<ScoredCustomer>,
}

/// All 25 cells keyed `"x-y"`, empty cells included
///
/// Only `bucketize` and `empty` build a grid, so the cell set is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Grid {
    cells: BTreeMap<String, GridCell>,
}

/// Build the `"x-y"` key for a cell
pub fn cell_key(x: u8, y: u8) -> String {
    format!("{x}-{y}")
}

/// Parse an `"x-y"` key, rejecting positions outside the grid
pub fn parse_cell_key(key: &str) -> RfmResult<(u8, u8)> {
    let invalid = || RfmError::InvalidCell {
        key: key.to_string(),
    };
    let (x, y) = key.trim().split_once('-').ok_or_else(invalid)?;
    let x: u8 = x.trim().parse().map_err(|_| invalid())?;
    let y: u8 = y.trim().parse().map_err(|_| invalid())?;
    if in_range(x) && in_range(y) {
        Ok((x, y))
    } else {
        Err(invalid())
    }
}

fn in_range(v: u8) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&v)
}

/// Reject a position outside the grid
pub fn check_cell(x: u8, y: u8) -> RfmResult<()> {
    if in_range(x) && in_range(y) {
        Ok(())
    } else {
        Err(RfmError::InvalidCell {
            key: cell_key(x, y),
        })
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    /// A grid with every cell present and empty
    pub fn empty() -> Self {
        let mut cells = BTreeMap::new();
        for x in MIN_SCORE..=MAX_SCORE {
            for y in MIN_SCORE..=MAX_SCORE {
                cells.insert(cell_key(x, y), GridCell::default());
            }
        }
        Self { cells }
    }

    pub fn cell(&self, x: u8, y: u8) -> Option<&GridCell> {
        self.cells.get(&cell_key(x, y))
    }

    /// Cells in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &GridCell)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of customers across all cells
    pub fn total(&self) -> usize {
        self.cells.values().map(|c| c.count).sum()
    }

    /// Largest single cell count, used for colour scaling
    pub fn max_count(&self) -> usize {
        self.cells.values().map(|c| c.count).max().unwrap_or(0)
    }

    /// Per-cell statistics in key order
    pub fn summary(&self) -> Vec<CellSummary> {
        let total = self.total();
        self.cells
            .iter()
            .map(|(key, cell)| {
                let mean_recency_score = if cell.count == 0 {
                    0.0
                } else {
                    cell.items
                        .iter()
                        .map(|c| f64::from(c.recency_score))
                        .sum::<f64>()
                        / cell.count as f64
                };
                CellSummary {
                    key: key.clone(),
                    count: cell.count,
                    share: if total == 0 {
                        0.0
                    } else {
                        cell.count as f64 / total as f64
                    },
                    mean_recency_score,
                }
            })
            .collect()
    }
}

/// Aggregate view of one cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSummary {
    pub key: String,
    pub count: usize,
    /// Fraction of all bucketed customers
    pub share: f64,
    pub mean_recency_score: f64,
}

/// Group customers into the grid by their (x, y) position
///
/// Customers whose position falls outside the grid are skipped.
pub fn bucketize(scores: &[ScoredCustomer]) -> Grid {
    let mut grid = Grid::empty();
    for customer in scores {
        match grid.cells.get_mut(&cell_key(customer.x, customer.y)) {
            Some(cell) => {
                cell.count += 1;
                cell.items.push(customer.clone());
            }
            None => log::warn!(
                "Skipping {} at out-of-range cell {}",
                customer.id,
                cell_key(customer.x, customer.y)
            ),
        }
    }
    grid
}
