use crate::game::{Board, Direction, Grid, is_solvable};
use crate::heuristic::GoalTable;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    AStar,
    IdaStar,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::AStar => write!(f, "A*"),
            Algorithm::IdaStar => write!(f, "IDA*"),
        }
    }
}

/// Largest optimal solution length over all boards, where known.
fn known_diameter(size: usize) -> Option<u32> {
    match size {
        2 => Some(6),
        3 => Some(31),
        4 => Some(80),
        _ => None,
    }
}

const OPEN_NODES_PER_CELL: usize = 1 << 16;
const EXPANSIONS_PER_CELL: usize = 1 << 18;

/// Resource bounds of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Largest open set A* may hold
    pub open_capacity: usize,
    /// Most nodes A* may expand
    pub max_expansions: usize,
    /// Largest f bound either engine will search. Also bounds IDA* recursion depth.
    pub threshold_ceiling: u32,
    /// Skip A* nodes whose board was already reached at equal or lower cost
    pub transpositions: bool,
}

impl SearchLimits {
    pub fn for_size(size: usize) -> Self {
        let cells = size * size;
        let threshold_ceiling = known_diameter(size)
            .unwrap_or_else(|| 2 * (size as u32 - 1) * (cells as u32 - 1));
        SearchLimits {
            open_capacity: OPEN_NODES_PER_CELL * cells,
            max_expansions: EXPANSIONS_PER_CELL * cells,
            threshold_ceiling,
            transpositions: false,
        }
    }
}

/// Why a run ended without a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// The goal is provably unreachable from the start board
    Unsolvable,
    /// The open set drained on an instance that should be solvable
    Exhausted,
    /// The open set outgrew its capacity
    CapacityExceeded { capacity: usize },
    /// A* expanded its full node budget
    ExpansionLimit { limit: usize },
    /// The f bound rose past the ceiling
    ThresholdCeilingExceeded { bound: u32, ceiling: u32 },
}

impl SolveError {
    /// Reclassify a search failure as `Unsolvable` when parity rules the goal out.
    pub(crate) fn classify(self, start: &Board, goal: &GoalTable) -> SolveError {
        if is_solvable(start, goal.board()) {
            self
        } else {
            SolveError::Unsolvable
        }
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Unsolvable => write!(f, "goal is unreachable from start"),
            SolveError::Exhausted => write!(f, "open set exhausted without reaching goal"),
            SolveError::CapacityExceeded { capacity } => {
                write!(f, "open set exceeded capacity of {} nodes", capacity)
            }
            SolveError::ExpansionLimit { limit } => {
                write!(f, "expanded {} nodes without reaching goal", limit)
            }
            SolveError::ThresholdCeilingExceeded { bound, ceiling } => {
                write!(f, "bound {} exceeds ceiling {}", bound, ceiling)
            }
        }
    }
}

impl Error for SolveError {}

/// Observes search progress, one call per node visited.
pub trait Tracer {
    /// `threshold` is the IDA* bound in force, or the f ceiling for A*.
    /// `direction` is the move that produced the board, if any.
    fn trace(
        &self,
        grid: Grid<'_>,
        nodes_explored: usize,
        threshold: u32,
        f_cost: u32,
        g_cost: u32,
        direction: Option<Direction>,
    );
}

pub struct NullTracer;

impl Tracer for NullTracer {
    fn trace(
        &self,
        _grid: Grid<'_>,
        _nodes_explored: usize,
        _threshold: u32,
        _f_cost: u32,
        _g_cost: u32,
        _direction: Option<Direction>,
    ) {
    }
}

impl<T: Tracer> Tracer for Option<T> {
    fn trace(
        &self,
        grid: Grid<'_>,
        nodes_explored: usize,
        threshold: u32,
        f_cost: u32,
        g_cost: u32,
        direction: Option<Direction>,
    ) {
        if let Some(tracer) = self {
            tracer.trace(grid, nodes_explored, threshold, f_cost, g_cost, direction);
        }
    }
}
