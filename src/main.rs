mod astar;
mod game;
mod heuristic;
mod ida;
mod path;
mod pool;
mod pqueue;
mod puzzles;
mod replay;
mod scramble;
mod solver;
mod zobrist;

use astar::AStar;
use clap::{Parser, ValueEnum};
use game::{Board, Direction, Grid, MAX_SIZE, MIN_SIZE, is_solvable};
use heuristic::{GoalTable, Heuristic, Manhattan, NullHeuristic};
use ida::IdaStar;
use path::Path;
use puzzles::Puzzle;
use replay::replay;
use solver::{Algorithm, SearchLimits, SolveError, Tracer};
use std::time::Instant;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmType {
    Astar,
    Ida,
    Both,
}

impl AlgorithmType {
    fn algorithms(self) -> &'static [Algorithm] {
        match self {
            AlgorithmType::Astar => &[Algorithm::AStar],
            AlgorithmType::Ida => &[Algorithm::IdaStar],
            AlgorithmType::Both => &[Algorithm::AStar, Algorithm::IdaStar],
        }
    }
}

fn print_solution(start: &Board, solution: &Path) {
    println!("Moves to get to the solution: {}", solution);
    let boards = match replay(start, solution) {
        Ok(boards) => boards,
        Err(e) => {
            eprintln!("Error replaying solution: {}", e);
            return;
        }
    };
    println!("The solution:");
    let total = solution.len();
    for (count, board) in boards.iter().enumerate() {
        if count == 0 {
            println!("\nStarting position:\n{}", board);
        } else {
            println!(
                " => {} ({}/{}):\n{}",
                solution.moves()[count - 1],
                count,
                total,
                board
            );
        }
    }
    println!("The end!");
}

struct VerboseTracer {
    trace_start: usize,
    trace_end: usize,
}

impl VerboseTracer {
    fn new(from_node: usize, to_node: usize) -> Self {
        Self {
            trace_start: from_node,
            trace_end: to_node,
        }
    }
}

impl Tracer for VerboseTracer {
    fn trace(
        &self,
        grid: Grid<'_>,
        nodes_explored: usize,
        threshold: u32,
        f_cost: u32,
        g_cost: u32,
        direction: Option<Direction>,
    ) {
        if self.trace_start <= nodes_explored && nodes_explored <= self.trace_end {
            let direction = direction.map_or("Start".to_string(), |d| d.to_string());
            println!(
                "move={}, count={}, f_cost={}, g_cost={}, threshold={}:\n{}",
                direction, nodes_explored, f_cost, g_cost, threshold, grid
            );
        }
    }
}

struct RunStats {
    solved: bool,
    steps: usize,
    states_explored: usize,
}

struct SolveOpts {
    algorithm: Algorithm,
    limits: SearchLimits,
    blind: bool,
    print_solution: bool,
    trace_range: Option<(usize, usize)>,
}

fn run_astar<H: Heuristic, T: Tracer>(
    goal: &GoalTable,
    heuristic: H,
    limits: SearchLimits,
    tracer: T,
    start: &Board,
) -> (Result<Path, SolveError>, usize) {
    let mut solver = AStar::new(goal, heuristic, limits, tracer);
    let result = solver.solve(start);
    log::info!("A*: peak open set {} nodes", solver.peak_open());
    (result, solver.nodes_explored())
}

fn solve_puzzle(puzzle: &Puzzle, goal: &GoalTable, opts: SolveOpts) -> RunStats {
    let tracer: Option<VerboseTracer> = opts
        .trace_range
        .map(|(trace_start, trace_end)| VerboseTracer::new(trace_start, trace_end));

    let start = Instant::now();
    let (result, states_explored) = match opts.algorithm {
        Algorithm::AStar if opts.blind => {
            run_astar(goal, NullHeuristic, opts.limits, tracer, puzzle.start())
        }
        Algorithm::AStar => run_astar(goal, Manhattan, opts.limits, tracer, puzzle.start()),
        Algorithm::IdaStar => {
            let mut solver = IdaStar::new(goal, opts.limits, tracer);
            let result = solver.solve(puzzle.start());
            log::info!("IDA*: {} iterations", solver.iterations());
            (result, solver.nodes_explored())
        }
    };
    let elapsed_ms = start.elapsed().as_millis();

    let (solved_char, steps, solved) = match &result {
        Ok(solution) => ('Y', solution.len(), true),
        Err(SolveError::Unsolvable) => ('X', 0, false),
        Err(_) => ('N', 0, false),
    };

    println!(
        "algorithm: {:<5} solved: {}  steps: {:<5}  states: {:<12}  elapsed: {} ms",
        opts.algorithm.to_string(),
        solved_char,
        steps,
        states_explored,
        elapsed_ms
    );

    match result {
        Ok(solution) if opts.print_solution => print_solution(puzzle.start(), &solution),
        Ok(_) => {}
        Err(e) => println!("{}: {}", opts.algorithm, e),
    }

    RunStats {
        solved,
        steps,
        states_explored,
    }
}

#[derive(Parser)]
#[command(name = "npuzzle")]
#[command(about = "An optimal (N^2-1)-puzzle solver", long_about = None)]
struct Args {
    /// Start board: N followed by N^2 tile numbers, 0 for the blank
    #[arg(value_name = "START", required_unless_present = "scramble")]
    start_file: Option<String>,

    /// Goal board: N^2 tile numbers, optionally preceded by N
    #[arg(value_name = "GOAL", required_unless_present = "scramble")]
    goal_file: Option<String>,

    /// Instead of reading files, scramble the solved board with this many random moves
    #[arg(short, long, value_name = "MOVES", conflicts_with_all = ["start_file", "goal_file"])]
    scramble: Option<usize>,

    /// Board size used with --scramble
    #[arg(short = 'N', long, default_value = "3")]
    size: usize,

    /// Random seed used with --scramble
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Search algorithm to run
    #[arg(short, long, value_enum, default_value = "both")]
    algorithm: AlgorithmType,

    /// Print the solution step-by-step
    #[arg(short, long)]
    print_solution: bool,

    /// Largest open set A* may hold before giving up
    #[arg(long)]
    max_open: Option<usize>,

    /// Maximum number of nodes A* may expand before giving up
    #[arg(short = 'n', long)]
    max_expansions: Option<usize>,

    /// Largest f bound to search before giving up
    #[arg(short, long)]
    ceiling: Option<u32>,

    /// Let A* skip boards already reached at equal or lower cost
    #[arg(long, default_value = "false")]
    transpositions: bool,

    /// Run A* without a heuristic (uniform-cost search)
    #[arg(long, default_value = "false")]
    blind: bool,

    /// Search even when the tile parity shows the goal is unreachable
    #[arg(long, default_value = "false")]
    no_parity_check: bool,

    /// Range of node counts to trace (start, end)
    #[arg(long, num_args = 2)]
    trace_range: Option<Vec<usize>>,
}

fn load_puzzle(args: &Args) -> Result<Puzzle, String> {
    if let Some(moves) = args.scramble {
        if !(MIN_SIZE..=MAX_SIZE).contains(&args.size) {
            return Err(format!(
                "size must be between {} and {}",
                MIN_SIZE, MAX_SIZE
            ));
        }
        let goal = Board::solved(args.size);
        let start = scramble::scramble_seeded(&goal, moves, args.seed);
        return Puzzle::new(start, goal).map_err(|e| e.to_string());
    }

    match (&args.start_file, &args.goal_file) {
        (Some(start), Some(goal)) => Puzzle::from_files(start, goal).map_err(|e| e.to_string()),
        _ => Err("both START and GOAL files are required".to_string()),
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let puzzle = match load_puzzle(&args) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("Error loading puzzle: {}", e);
            std::process::exit(1);
        }
    };

    // Validate trace_range
    if let Some(ref range) = args.trace_range {
        if range[0] > range[1] {
            eprintln!("Error: trace range start must be <= end");
            std::process::exit(1);
        }
    }

    if !args.no_parity_check && !is_solvable(puzzle.start(), puzzle.goal()) {
        eprintln!("Error: goal is unreachable from start (tile parity differs)");
        std::process::exit(1);
    }

    let size = puzzle.start().size();
    let mut limits = SearchLimits::for_size(size);
    if let Some(max_open) = args.max_open {
        limits.open_capacity = max_open;
    }
    if let Some(max_expansions) = args.max_expansions {
        limits.max_expansions = max_expansions;
    }
    if let Some(ceiling) = args.ceiling {
        limits.threshold_ceiling = ceiling;
    }
    limits.transpositions = args.transpositions;
    log::debug!("search limits: {:?}", limits);

    if args.print_solution {
        println!("Start:\n{}\nGoal:\n{}", puzzle.start(), puzzle.goal());
    }

    // Parse trace_range from Vec to tuple
    let trace_range = args.trace_range.as_ref().map(|v| (v[0], v[1]));

    let goal = GoalTable::new(puzzle.goal());
    let mut runs = Vec::new();
    for &algorithm in args.algorithm.algorithms() {
        let opts = SolveOpts {
            algorithm,
            limits,
            blind: args.blind,
            print_solution: args.print_solution,
            trace_range,
        };
        runs.push(solve_puzzle(&puzzle, &goal, opts));
    }

    // Both engines are exact, so their lengths must agree
    if runs.len() > 1 && runs.iter().all(|r| r.solved) {
        let steps: Vec<usize> = runs.iter().map(|r| r.steps).collect();
        if steps.windows(2).any(|w| w[0] != w[1]) {
            eprintln!("Error: solution lengths disagree: {:?}", steps);
            std::process::exit(2);
        }
    }

    if runs.len() > 1 {
        let total_states: usize = runs.iter().map(|r| r.states_explored).sum();
        println!("---");
        println!("total states: {}", total_states);
    }

    if !runs.iter().all(|r| r.solved) {
        std::process::exit(1);
    }
}
