use crate::game::{BLANK, Board, Direction, Position, Tile};

/// Goal positions of every tile, computed once per run and shared by both engines.
#[derive(Debug, Clone)]
pub struct GoalTable {
    goal: Board,
    /// positions[tile] = cell of `tile` in the goal
    positions: Vec<Position>,
}

impl GoalTable {
    pub fn new(goal: &Board) -> Self {
        let size = goal.size();
        let mut positions = vec![Position(0, 0); size * size];
        for (idx, &tile) in goal.tiles().iter().enumerate() {
            positions[tile as usize] = Position::from_index(idx, size);
        }
        GoalTable {
            goal: goal.clone(),
            positions,
        }
    }

    pub fn size(&self) -> usize {
        self.goal.size()
    }

    pub fn board(&self) -> &Board {
        &self.goal
    }

    pub fn position(&self, tile: Tile) -> Position {
        self.positions[tile as usize]
    }

    pub fn is_goal(&self, tiles: &[Tile]) -> bool {
        tiles == self.goal.tiles()
    }

    /// Sum of the Manhattan distances of all non-blank tiles to their goal cells.
    pub fn manhattan(&self, tiles: &[Tile]) -> u32 {
        let size = self.size();
        tiles
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != BLANK)
            .map(|(idx, &tile)| Position::from_index(idx, size).distance(self.position(tile)))
            .sum()
    }

    /// Manhattan sum after `tile` slides one cell in `direction` from `before`.
    ///
    /// Only that tile's term changes, by exactly one. `before` must be the
    /// tile's position prior to the slide.
    pub fn incremental(&self, h: u32, tile: Tile, before: Position, direction: Direction) -> u32 {
        debug_assert_ne!(tile, BLANK);
        let goal = self.position(tile);
        let toward = match direction {
            Direction::Up => goal.0 < before.0,
            Direction::Down => goal.0 > before.0,
            Direction::Left => goal.1 < before.1,
            Direction::Right => goal.1 > before.1,
        };
        if toward {
            debug_assert!(h > 0, "tile {} moved toward goal with h = 0", tile);
            h - 1
        } else {
            h + 1
        }
    }
}

/// Estimates the number of moves needed to reach the goal.
pub trait Heuristic {
    fn estimate(&self, goal: &GoalTable, tiles: &[Tile]) -> u32;
}

/// Manhattan-distance heuristic, recomputed from scratch.
pub struct Manhattan;

impl Heuristic for Manhattan {
    fn estimate(&self, goal: &GoalTable, tiles: &[Tile]) -> u32 {
        goal.manhattan(tiles)
    }
}

/// Always zero. Turns A* into uniform-cost search.
pub struct NullHeuristic;

impl Heuristic for NullHeuristic {
    fn estimate(&self, _goal: &GoalTable, _tiles: &[Tile]) -> u32 {
        0
    }
}
