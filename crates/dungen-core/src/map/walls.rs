//! Wall derivation, the final grid pass.
//!
//! Walls are not placed by any earlier stage; they are derived from the
//! occupancy that placement and carving produced. Every `Empty` cell with
//! an occupied tile (room floor, corridor or door) anywhere in its
//! 8-neighborhood becomes `Wall`, which hulls every occupied region in a
//! one-tile shell, including diagonal gaps.

use log::debug;

use super::grid::{GridPoint, MapGrid, TileType};

/// Derive wall tiles around all occupied regions.
///
/// Idempotent: walls are neither occupied nor empty afterwards, so a
/// second pass finds nothing new to convert.
pub fn derive_walls(grid: &mut MapGrid) {
    let size = grid.size();
    let mut walls = Vec::new();

    for x in 0..size.x {
        for z in 0..size.z {
            if grid.get(GridPoint::new(x, z)) == TileType::Empty
                && grid.is_adjacent_to_occupied(x, z)
            {
                walls.push(GridPoint::new(x, z));
            }
        }
    }

    for wall in &walls {
        grid.set(*wall, TileType::Wall);
    }
    debug!("derived {} wall tiles", walls.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walls_hull_a_room() {
        let mut grid = MapGrid::new(GridPoint::new(10, 10));
        for x in 3..6 {
            for z in 3..6 {
                grid.set(GridPoint::new(x, z), TileType::Room);
            }
        }

        derive_walls(&mut grid);

        // A 3x3 room gets a 16-tile shell, corners included.
        assert_eq!(grid.count(TileType::Wall), 16);
        assert_eq!(grid.get(GridPoint::new(2, 2)), TileType::Wall);
        assert_eq!(grid.get(GridPoint::new(6, 6)), TileType::Wall);
        assert_eq!(grid.get(GridPoint::new(1, 1)), TileType::Empty);
    }

    #[test]
    fn test_walls_hug_map_border() {
        let mut grid = MapGrid::new(GridPoint::new(6, 6));
        grid.set(GridPoint::new(0, 0), TileType::Corridor);

        derive_walls(&mut grid);

        // Only the in-bounds neighbors become walls.
        assert_eq!(grid.count(TileType::Wall), 3);
    }

    #[test]
    fn test_door_tiles_are_hulled() {
        let mut grid = MapGrid::new(GridPoint::new(8, 8));
        grid.set(GridPoint::new(4, 4), TileType::Door);

        derive_walls(&mut grid);

        assert_eq!(grid.count(TileType::Wall), 8);
        assert_eq!(grid.get(GridPoint::new(4, 4)), TileType::Door);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let mut grid = MapGrid::new(GridPoint::new(12, 12));
        for x in 2..5 {
            grid.set(GridPoint::new(x, 6), TileType::Corridor);
        }

        derive_walls(&mut grid);
        let after_first = grid.count(TileType::Wall);
        derive_walls(&mut grid);
        assert_eq!(grid.count(TileType::Wall), after_first);
    }

    #[test]
    fn test_existing_walls_never_spread() {
        let mut grid = MapGrid::new(GridPoint::new(8, 8));
        grid.set(GridPoint::new(3, 3), TileType::Wall);

        derive_walls(&mut grid);

        // A lone wall is not occupied, so nothing grows around it.
        assert_eq!(grid.count(TileType::Wall), 1);
    }
}
