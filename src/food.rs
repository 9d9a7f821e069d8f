use log::warn;
use rand::Rng;

use crate::error::Result;
use crate::grid::{Cell, GridState};
use crate::snake::Position;

/// Rejection-sampling budget per placement, as a multiple of the cell count.
pub const MAX_REJECTION_DRAWS_PER_CELL: usize = 4;

/// Picks a uniformly random empty cell.
///
/// Draws random positions until one is empty. After
/// `MAX_REJECTION_DRAWS_PER_CELL * cells` misses it chooses among the
/// enumerated empty cells instead, which keeps the distribution uniform with
/// a bounded cost. Returns `None` when the grid has no empty cell.
#[must_use]
pub fn random_empty_cell<R: Rng + ?Sized>(rng: &mut R, grid: &GridState) -> Option<Position> {
    let rows = i32::from(grid.rows());
    let cols = i32::from(grid.cols());
    if rows == 0 || cols == 0 {
        return None;
    }

    let budget = MAX_REJECTION_DRAWS_PER_CELL * grid.size().total_cells();
    for _ in 0..budget {
        let position = Position::new(rng.gen_range(0..rows), rng.gen_range(0..cols));
        if grid.cell_at(position).is_ok_and(Cell::is_empty) {
            return Some(position);
        }
    }

    let candidates = grid.empty_cells();
    if candidates.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

/// Places `count` food items on random empty cells.
///
/// Returns how many were placed; fewer than `count` only when the grid ran
/// out of empty cells.
pub fn spawn_food<R: Rng + ?Sized>(
    rng: &mut R,
    grid: &mut GridState,
    count: usize,
) -> Result<usize> {
    for placed in 0..count {
        let Some(position) = random_empty_cell(rng, grid) else {
            warn!(
                "no empty cell left for food; placed {placed} of {count} on a {}x{} grid",
                grid.rows(),
                grid.cols()
            );
            return Ok(placed);
        };
        grid.set_cell(position, Cell::Food)?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GridSize;
    use crate::grid::{Cell, GridState};
    use crate::snake::Position;

    use super::{random_empty_cell, spawn_food};

    #[test]
    fn food_spawn_never_overlaps_occupied_cells() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = GridState::new(GridSize::new(6, 8));
        for col in 0..3 {
            grid.set_cell(Position::new(0, col), Cell::body(1)).expect("in bounds");
        }

        for _ in 0..100 {
            let position = random_empty_cell(&mut rng, &grid).expect("grid has room");
            assert_eq!(grid.cell_at(position).ok(), Some(Cell::Empty));
        }
    }

    #[test]
    fn spawn_places_requested_count() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut grid = GridState::new(GridSize::new(5, 5));

        let placed = spawn_food(&mut rng, &mut grid, 6).expect("spawn should succeed");

        assert_eq!(placed, 6);
        assert_eq!(grid.count_food(), 6);
    }

    #[test]
    fn spawn_stops_when_grid_is_full() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = GridState::new(GridSize::new(2, 2));
        grid.set_cell(Position::new(0, 0), Cell::head(1)).expect("in bounds");

        let placed = spawn_food(&mut rng, &mut grid, 5).expect("spawn should succeed");

        assert_eq!(placed, 3);
        assert_eq!(grid.count_empty(), 0);
        assert_eq!(random_empty_cell(&mut rng, &grid), None);
    }

    #[test]
    fn last_free_cell_is_always_found() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut grid = GridState::new(GridSize::new(8, 8));
        for (position, _) in grid.clone().iter() {
            if position != Position::new(6, 1) {
                grid.set_cell(position, Cell::Food).expect("in bounds");
            }
        }

        assert_eq!(random_empty_cell(&mut rng, &grid), Some(Position::new(6, 1)));
    }

    #[test]
    fn spawn_is_reproducible_for_a_seed() {
        let size = GridSize::new(10, 10);
        let mut first = GridState::new(size);
        let mut second = GridState::new(size);

        spawn_food(&mut StdRng::seed_from_u64(42), &mut first, 4).expect("spawn should succeed");
        spawn_food(&mut StdRng::seed_from_u64(42), &mut second, 4).expect("spawn should succeed");

        assert_eq!(first, second);
    }
}
