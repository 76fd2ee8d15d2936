use crate::game::{Board, Grid, Position, valid_moves};
use crate::heuristic::{GoalTable, Heuristic};
use crate::path::Path;
use crate::pool::{BoardPool, Slot};
use crate::pqueue::PriorityQueue;
use crate::solver::{SearchLimits, SolveError, Tracer};
use crate::zobrist::{TranspositionTable, Zobrist};
use std::cmp::Ordering;

/// Open-set key: lower f first; among equal f, the deeper node first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    pub f: u32,
    pub g: u32,
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f.cmp(&other.f).then_with(|| other.g.cmp(&self.g))
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Node {
    path: Path,
    slot: Slot,
    blank: Position,
    g: u32,
    /// Zobrist hash of the board, or 0 when transpositions are off
    hash: u64,
}

/// Best-first search over a binary heap ordered by f = g + h.
pub struct AStar<'a, H: Heuristic, T: Tracer> {
    goal: &'a GoalTable,
    heuristic: H,
    limits: SearchLimits,
    tracer: T,
    nodes_explored: usize,
    peak_open: usize,
}

impl<'a, H: Heuristic, T: Tracer> AStar<'a, H, T> {
    pub fn new(goal: &'a GoalTable, heuristic: H, limits: SearchLimits, tracer: T) -> Self {
        AStar {
            goal,
            heuristic,
            limits,
            tracer,
            nodes_explored: 0,
            peak_open: 0,
        }
    }

    /// Nodes popped from the open set during the last run.
    pub fn nodes_explored(&self) -> usize {
        self.nodes_explored
    }

    /// Largest open set seen during the last run.
    pub fn peak_open(&self) -> usize {
        self.peak_open
    }

    /// Find a shortest path from `start` to the goal.
    /// Panics if `start` and the goal differ in size.
    pub fn solve(&mut self, start: &Board) -> Result<Path, SolveError> {
        let size = self.goal.size();
        assert_eq!(
            start.size(),
            size,
            "start is {0}x{0} but goal is {1}x{1}",
            start.size(),
            size
        );
        self.nodes_explored = 0;
        self.peak_open = 0;

        let mut pool = BoardPool::new(size);
        let mut open = PriorityQueue::new();
        let zobrist = self.limits.transpositions.then(|| Zobrist::new(size));
        let mut table = TranspositionTable::new();

        let hash = zobrist.as_ref().map_or(0, |z| z.hash(start.tiles()));
        if zobrist.is_some() {
            table.insert(hash, 0);
        }
        let h = self.heuristic.estimate(self.goal, start.tiles());
        let root = Node {
            path: Path::new(),
            slot: pool.insert(start.tiles()),
            blank: start.blank(),
            g: 0,
            hash,
        };
        open.push(Priority { f: h, g: 0 }, root);

        let result = self.search(&mut pool, &mut open, zobrist.as_ref(), &mut table);
        log::debug!(
            "A*: {} nodes explored, {} boards in transposition table, next f {:?}",
            self.nodes_explored,
            table.len(),
            open.peek_priority().map(|p| p.f)
        );

        for (_, node) in open.drain() {
            pool.release(node.slot);
        }
        debug_assert!(open.is_empty());
        debug_assert_eq!(pool.live(), 0, "boards leaked from pool");

        result.map_err(|err| err.classify(start, self.goal))
    }

    fn search(
        &mut self,
        pool: &mut BoardPool,
        open: &mut PriorityQueue<Priority, Node>,
        zobrist: Option<&Zobrist>,
        table: &mut TranspositionTable,
    ) -> Result<Path, SolveError> {
        let size = self.goal.size();
        let ceiling = self.limits.threshold_ceiling;

        while let Some((priority, node)) = open.pop_min() {
            if zobrist.is_some() && table.is_stale(node.hash, node.g) {
                pool.release(node.slot);
                continue;
            }
            if priority.f > ceiling {
                pool.release(node.slot);
                log::debug!("A*: f = {} passed ceiling {}", priority.f, ceiling);
                return Err(SolveError::ThresholdCeilingExceeded {
                    bound: priority.f,
                    ceiling,
                });
            }

            self.nodes_explored += 1;
            self.tracer.trace(
                Grid::new(size, pool.get(node.slot)),
                self.nodes_explored,
                ceiling,
                priority.f,
                node.g,
                node.path.last(),
            );

            if self.goal.is_goal(pool.get(node.slot)) {
                pool.release(node.slot);
                log::debug!(
                    "A*: goal at depth {} after {} nodes",
                    node.g,
                    self.nodes_explored
                );
                return Ok(node.path);
            }

            if self.nodes_explored >= self.limits.max_expansions {
                pool.release(node.slot);
                log::debug!("A*: expansion budget of {} spent", self.limits.max_expansions);
                return Err(SolveError::ExpansionLimit {
                    limit: self.limits.max_expansions,
                });
            }

            let g = node.g + 1;
            for direction in valid_moves(node.blank, size, node.path.last()) {
                let (slot, slide) = pool.insert_child(node.slot, node.blank, direction);
                let hash = match zobrist {
                    Some(z) => {
                        let hash = z.update(node.hash, &slide, size);
                        if table.should_skip(hash, g) {
                            pool.release(slot);
                            continue;
                        }
                        table.insert(hash, g);
                        hash
                    }
                    None => 0,
                };
                let h = self.heuristic.estimate(self.goal, pool.get(slot));
                let child = Node {
                    path: node.path.extended(direction),
                    slot,
                    blank: slide.from,
                    g,
                    hash,
                };
                open.push(Priority { f: g + h, g }, child);
            }
            pool.release(node.slot);

            self.peak_open = self.peak_open.max(open.len());
            if open.len() > self.limits.open_capacity {
                log::debug!(
                    "A*: open set of {} passed capacity {}",
                    open.len(),
                    self.limits.open_capacity
                );
                return Err(SolveError::CapacityExceeded {
                    capacity: self.limits.open_capacity,
                });
            }
        }

        Err(SolveError::Exhausted)
    }
}
