//! Area completion: is the connected area of one edge type around a tile
//! closed off on every side?
//!
//! The search walks the board breadth-first, but only through edges of the
//! target type. An edge of that type that faces an empty hex is an open
//! boundary and ends the search immediately. Edges of any other type are
//! simply not followed.

use crate::board::HexGrid;
use crate::direction::{neighbor, opposite_index};
use crate::hex::Hex;
use crate::tile::EdgeType;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

/// Outcome of a completion check, with the tiles the area spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaStatus {
    /// Every edge of the area meets a placed tile
    Complete { tiles: Vec<Hex> },
    /// An edge of the area faces the empty hex `at`
    Open { at: Hex },
    /// The start hex is empty, the type is `None`, or the tile has no edge
    /// of that type
    NoArea,
}

impl AreaStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, AreaStatus::Complete { .. })
    }
}

/// Breadth-first completion search over a board
pub struct RegionCompletion<'a> {
    grid: &'a HexGrid,
}

impl<'a> RegionCompletion<'a> {
    pub fn new(grid: &'a HexGrid) -> Self {
        Self { grid }
    }

    /// Whether the `edge_type` area containing the tile at `start` is closed
    pub fn check(&self, start: Hex, edge_type: EdgeType) -> bool {
        self.status(start, edge_type).is_complete()
    }

    /// Full result of the completion search
    pub fn status(&self, start: Hex, edge_type: EdgeType) -> AreaStatus {
        if !edge_type.forms_area() {
            return AreaStatus::NoArea;
        }
        let Some(start_tile) = self.grid.tile(start) else {
            return AreaStatus::NoArea;
        };
        if !start_tile.has_edge_type(edge_type) {
            return AreaStatus::NoArea;
        }

        let mut visited: HashSet<Hex> = HashSet::new();
        let mut order: Vec<Hex> = Vec::new();
        let mut queue: VecDeque<Hex> = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            order.push(current);

            let Some(tile) = self.grid.tile(current) else {
                continue;
            };

            for direction in 0..6 {
                if tile.edge_facing(direction).edge_type != edge_type {
                    continue;
                }

                let next = neighbor(current, direction);
                let Some(next_tile) = self.grid.tile(next) else {
                    debug!(%start, %edge_type, open_at = %next, "area is open");
                    return AreaStatus::Open { at: next };
                };

                // Legal placements always agree here; a tile committed
                // without the legality check may not, and then the area
                // does not continue into it.
                if next_tile.edge_facing(opposite_index(direction)).edge_type != edge_type {
                    trace!(from = %current, to = %next, "area edge meets a different type");
                    continue;
                }

                if !visited.contains(&next) {
                    queue.push_back(next);
                }
            }
        }

        debug!(%start, %edge_type, tiles = order.len(), "area complete");
        AreaStatus::Complete { tiles: order }
    }
}
