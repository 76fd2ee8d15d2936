use crate::game::{BLANK, Board, Direction, Position, Slide, valid_moves};
use crate::heuristic::GoalTable;
use crate::path::Path;
use crate::solver::{SearchLimits, SolveError, Tracer};
use std::ops::{Deref, DerefMut};

/// Mutable state of the depth-first search: one board, mutated in place and
/// restored on backtrack, plus everything derived from it.
struct SearchContext<'g> {
    goal: &'g GoalTable,
    board: Board,
    /// positions[tile] = current cell of `tile`
    positions: Vec<Position>,
    h: u32,
    path: Path,
}

impl<'g> SearchContext<'g> {
    fn new(goal: &'g GoalTable, start: &Board) -> Self {
        let size = start.size();
        let mut positions = vec![Position(0, 0); size * size];
        for (idx, &tile) in start.tiles().iter().enumerate() {
            positions[tile as usize] = Position::from_index(idx, size);
        }
        SearchContext {
            goal,
            board: start.clone(),
            positions,
            h: goal.manhattan(start.tiles()),
            path: Path::with_capacity(64),
        }
    }

    /// Move the blank in `direction`. The returned guard undoes the move when
    /// dropped.
    fn advance(&mut self, direction: Direction) -> MoveGuard<'_, 'g> {
        let size = self.board.size();
        let target = self
            .board
            .blank()
            .step(direction, size)
            .unwrap_or_else(|| panic!("Cannot move blank {} from {}", direction, self.board.blank()));
        let tile = self.board.get(target);
        // The tile's position has to be read before the index is updated.
        let before = self.positions[tile as usize];
        debug_assert_eq!(before, target, "position index out of sync for tile {}", tile);

        let prev_h = self.h;
        self.h = self
            .goal
            .incremental(self.h, tile, before, direction.opposite());
        let slide = self.board.apply_move_in_place(direction);
        self.positions[tile as usize] = slide.to;
        self.positions[BLANK as usize] = slide.from;
        self.path.push(direction);

        MoveGuard {
            ctx: self,
            slide,
            prev_h,
        }
    }
}

/// Scoped move: applied by [`SearchContext::advance`], reverted on drop.
struct MoveGuard<'c, 'g> {
    ctx: &'c mut SearchContext<'g>,
    slide: Slide,
    prev_h: u32,
}

impl Drop for MoveGuard<'_, '_> {
    fn drop(&mut self) {
        let ctx = &mut *self.ctx;
        let popped = ctx.path.pop();
        debug_assert_eq!(popped, Some(self.slide.direction));
        ctx.board.undo_move(self.slide);
        ctx.positions[self.slide.tile as usize] = self.slide.from;
        ctx.positions[BLANK as usize] = self.slide.to;
        ctx.h = self.prev_h;
    }
}

impl<'g> Deref for MoveGuard<'_, 'g> {
    type Target = SearchContext<'g>;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl DerefMut for MoveGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

enum Step {
    Found(Path),
    /// Smallest f that exceeded the threshold, or u32::MAX if none did
    Bound(u32),
}

/// Iterative-deepening A*: repeated depth-first searches bounded by f.
///
/// Recursion depth equals the threshold of the last iteration, so it is
/// bounded by `SearchLimits::threshold_ceiling`.
pub struct IdaStar<'a, T: Tracer> {
    goal: &'a GoalTable,
    limits: SearchLimits,
    tracer: T,
    nodes_explored: usize,
    iterations: usize,
}

impl<'a, T: Tracer> IdaStar<'a, T> {
    pub fn new(goal: &'a GoalTable, limits: SearchLimits, tracer: T) -> Self {
        IdaStar {
            goal,
            limits,
            tracer,
            nodes_explored: 0,
            iterations: 0,
        }
    }

    /// Nodes visited over all iterations of the last run.
    pub fn nodes_explored(&self) -> usize {
        self.nodes_explored
    }

    /// Depth-first passes made during the last run.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Find a shortest path from `start` to the goal.
    /// Panics if `start` and the goal differ in size.
    pub fn solve(&mut self, start: &Board) -> Result<Path, SolveError> {
        assert_eq!(
            start.size(),
            self.goal.size(),
            "start is {0}x{0} but goal is {1}x{1}",
            start.size(),
            self.goal.size()
        );
        self.nodes_explored = 0;
        self.iterations = 0;

        let ceiling = self.limits.threshold_ceiling;
        let mut ctx = SearchContext::new(self.goal, start);
        let mut threshold = ctx.h;

        loop {
            if threshold > ceiling {
                log::debug!("IDA*: threshold {} passed ceiling {}", threshold, ceiling);
                let err = SolveError::ThresholdCeilingExceeded {
                    bound: threshold,
                    ceiling,
                };
                return Err(err.classify(start, self.goal));
            }

            self.iterations += 1;
            log::debug!(
                "IDA*: iteration {} with threshold {} ({} nodes so far)",
                self.iterations,
                threshold,
                self.nodes_explored
            );

            let step = self.search(&mut ctx, 0, threshold);
            debug_assert_eq!(&ctx.board, start, "board not restored after iteration");
            debug_assert!(ctx.path.is_empty());

            match step {
                Step::Found(path) => return Ok(path),
                Step::Bound(u32::MAX) => {
                    return Err(SolveError::Exhausted.classify(start, self.goal));
                }
                Step::Bound(bound) => threshold = bound,
            }
        }
    }

    fn search(&mut self, ctx: &mut SearchContext<'_>, depth: u32, threshold: u32) -> Step {
        let f = depth + ctx.h;
        self.nodes_explored += 1;
        self.tracer.trace(
            ctx.board.grid(),
            self.nodes_explored,
            threshold,
            f,
            depth,
            ctx.path.last(),
        );

        if f > threshold {
            return Step::Bound(f);
        }
        if ctx.h == 0 {
            debug_assert!(self.goal.is_goal(ctx.board.tiles()));
            return Step::Found(ctx.path.clone());
        }

        let size = ctx.board.size();
        let mut min = u32::MAX;
        for direction in valid_moves(ctx.board.blank(), size, ctx.path.last()) {
            let mut child = ctx.advance(direction);
            match self.search(&mut child, depth + 1, threshold) {
                found @ Step::Found(_) => return found,
                Step::Bound(bound) => min = min.min(bound),
            }
        }
        Step::Bound(min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Grid;
    use crate::replay::replay;
    use crate::scramble::scramble_seeded;
    use crate::solver::NullTracer;
    use std::cell::Cell;

    fn board(rows: &[&[u32]]) -> Board {
        let rows: Vec<Vec<u32>> = rows.iter().map(|r| r.to_vec()).collect();
        Board::from_rows(&rows).unwrap()
    }

    fn solve(start: &Board, goal: &Board, limits: SearchLimits) -> Result<Path, SolveError> {
        let table = GoalTable::new(goal);
        IdaStar::new(&table, limits, NullTracer).solve(start)
    }

    #[test]
    fn test_already_solved() {
        let goal = board(&[&[1, 2], &[3, 0]]);
        let path = solve(&goal, &goal, SearchLimits::for_size(2)).unwrap();
        assert_eq!(path.to_string(), "B");
    }

    #[test]
    fn test_one_move() {
        let start = board(&[&[1, 0], &[3, 2]]);
        let goal = board(&[&[1, 2], &[3, 0]]);
        let path = solve(&start, &goal, SearchLimits::for_size(2)).unwrap();
        assert_eq!(path.moves(), &[Direction::Down]);
    }

    #[test]
    fn test_two_moves_single_iteration() {
        let start = board(&[&[1, 2, 3], &[4, 5, 6], &[0, 7, 8]]);
        let goal = Board::solved(3);
        let table = GoalTable::new(&goal);
        assert_eq!(table.manhattan(start.tiles()), 2);

        let mut ida = IdaStar::new(&table, SearchLimits::for_size(3), NullTracer);
        let path = ida.solve(&start).unwrap();
        assert_eq!(path.to_string(), "Brr");
        assert_eq!(ida.iterations(), 1);
    }

    #[test]
    fn test_solution_replays_to_goal() {
        let goal = Board::solved(3);
        for seed in 0..10 {
            let start = scramble_seeded(&goal, 30, seed);
            let path = solve(&start, &goal, SearchLimits::for_size(3)).unwrap();
            assert!(path.len() <= 30);
            assert!(path.is_reversal_free());
            let boards = replay(&start, &path).unwrap();
            assert_eq!(boards.last(), Some(&goal));
        }
    }

    #[test]
    fn test_non_canonical_goal() {
        let goal = board(&[&[0, 1, 2], &[3, 4, 5], &[6, 7, 8]]);
        let start = scramble_seeded(&goal, 18, 99);
        let path = solve(&start, &goal, SearchLimits::for_size(3)).unwrap();
        let boards = replay(&start, &path).unwrap();
        assert_eq!(boards.last(), Some(&goal));
    }

    #[test]
    fn test_4x4_short_scramble() {
        let goal = Board::solved(4);
        let start = scramble_seeded(&goal, 20, 5);
        let path = solve(&start, &goal, SearchLimits::for_size(4)).unwrap();
        assert!(path.len() <= 20);
        assert_eq!(replay(&start, &path).unwrap().last(), Some(&goal));
    }

    #[test]
    fn test_move_guard_restores_context() {
        let goal = Board::solved(3);
        let start = board(&[&[1, 2, 3], &[4, 0, 6], &[7, 5, 8]]);
        let table = GoalTable::new(&goal);
        let mut ctx = SearchContext::new(&table, &start);
        let positions = ctx.positions.clone();
        let h = ctx.h;

        {
            let mut first = ctx.advance(Direction::Down);
            assert_eq!(first.h, table.manhattan(first.board.tiles()));
            {
                let second = first.advance(Direction::Right);
                assert_eq!(second.h, 0);
                assert_eq!(second.path.to_string(), "Bdr");
                assert_eq!(second.positions[BLANK as usize], Position(2, 2));
            }
            assert_eq!(first.path.to_string(), "Bd");
            assert_eq!(first.positions[5], Position(1, 1));
        }

        assert_eq!(ctx.board, start);
        assert_eq!(ctx.positions, positions);
        assert_eq!(ctx.h, h);
        assert!(ctx.path.is_empty());
    }

    #[test]
    fn test_unsolvable_2x2() {
        let start = board(&[&[2, 1], &[3, 0]]);
        let goal = board(&[&[1, 2], &[3, 0]]);
        assert_eq!(
            solve(&start, &goal, SearchLimits::for_size(2)),
            Err(SolveError::Unsolvable)
        );
    }

    #[test]
    fn test_unsolvable_3x3() {
        let start = board(&[&[2, 1, 3], &[4, 5, 6], &[7, 8, 0]]);
        let goal = Board::solved(3);
        let mut limits = SearchLimits::for_size(3);
        limits.threshold_ceiling = 12;
        assert_eq!(solve(&start, &goal, limits), Err(SolveError::Unsolvable));
    }

    #[test]
    fn test_ceiling_too_low() {
        let goal = Board::solved(3);
        let start = scramble_seeded(&goal, 20, 1);
        let table = GoalTable::new(&goal);
        let h = table.manhattan(start.tiles());
        let mut limits = SearchLimits::for_size(3);
        limits.threshold_ceiling = h;

        let mut ida = IdaStar::new(&table, limits, NullTracer);
        match ida.solve(&start) {
            Ok(path) => assert_eq!(path.len() as u32, h),
            Err(SolveError::ThresholdCeilingExceeded { bound, ceiling }) => {
                assert!(bound > h);
                assert_eq!(ceiling, h);
            }
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    struct CheckingTracer<'a> {
        goal: &'a GoalTable,
        calls: Cell<usize>,
    }

    impl Tracer for CheckingTracer<'_> {
        fn trace(
            &self,
            grid: Grid<'_>,
            nodes_explored: usize,
            threshold: u32,
            f_cost: u32,
            g_cost: u32,
            _direction: Option<Direction>,
        ) {
            self.calls.set(self.calls.get() + 1);
            assert_eq!(self.calls.get(), nodes_explored);
            // The incrementally maintained h must match a full recomputation.
            assert_eq!(f_cost - g_cost, self.goal.manhattan(grid.tiles()));
            assert!(g_cost <= threshold);
        }
    }

    #[test]
    fn test_incremental_heuristic_matches_full_during_search() {
        let goal = Board::solved(3);
        let table = GoalTable::new(&goal);
        let tracer = CheckingTracer {
            goal: &table,
            calls: Cell::new(0),
        };
        let start = scramble_seeded(&goal, 26, 17);
        let mut ida = IdaStar::new(&table, SearchLimits::for_size(3), tracer);
        ida.solve(&start).unwrap();
        assert_eq!(ida.tracer.calls.get(), ida.nodes_explored());
        assert!(ida.iterations() >= 1);
    }
}
