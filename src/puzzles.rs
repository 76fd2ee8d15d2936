use crate::game::Board;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;

/// Error type for puzzle loading operations.
#[derive(Debug)]
pub enum InputError {
    /// IO error when reading from file
    Io(io::Error),
    /// Invalid puzzle content
    InvalidPuzzle(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Io(err) => write!(f, "IO error: {}", err),
            InputError::InvalidPuzzle(msg) => write!(f, "Invalid puzzle: {}", msg),
        }
    }
}

impl Error for InputError {}

impl From<io::Error> for InputError {
    fn from(err: io::Error) -> Self {
        InputError::Io(err)
    }
}

impl From<String> for InputError {
    fn from(err: String) -> Self {
        InputError::InvalidPuzzle(err)
    }
}

fn parse_numbers(contents: &str) -> Result<Vec<u32>, InputError> {
    contents
        .split_whitespace()
        .map(|token| {
            token
                .parse::<u32>()
                .map_err(|_| InputError::InvalidPuzzle(format!("'{}' is not a tile number", token)))
        })
        .collect()
}

/// A start board and the goal it must be brought to.
#[derive(Debug, Clone)]
pub struct Puzzle {
    start: Board,
    goal: Board,
}

impl Puzzle {
    pub fn new(start: Board, goal: Board) -> Result<Self, InputError> {
        if start.size() != goal.size() {
            return Err(InputError::InvalidPuzzle(format!(
                "Start is {0}x{0} but goal is {1}x{1}",
                start.size(),
                goal.size()
            )));
        }
        Ok(Puzzle { start, goal })
    }

    /// Parse a start board: the size N followed by N² tile numbers in reading
    /// order, 0 for the blank.
    pub fn parse_start(contents: &str) -> Result<Board, InputError> {
        let numbers = parse_numbers(contents)?;
        let (&size, tiles) = numbers
            .split_first()
            .ok_or_else(|| InputError::InvalidPuzzle("Empty start board".to_string()))?;
        Ok(Board::from_values(size as usize, tiles.iter().copied())?)
    }

    /// Parse a goal board of the given size: N² tile numbers, optionally
    /// preceded by N.
    pub fn parse_goal(contents: &str, size: usize) -> Result<Board, InputError> {
        let numbers = parse_numbers(contents)?;
        let tiles = if numbers.len() == size * size + 1 && numbers[0] as usize == size {
            &numbers[1..]
        } else {
            &numbers[..]
        };
        Ok(Board::from_values(size, tiles.iter().copied())?)
    }

    pub fn from_text(start: &str, goal: &str) -> Result<Self, InputError> {
        let start = Self::parse_start(start)?;
        let goal = Self::parse_goal(goal, start.size())?;
        Self::new(start, goal)
    }

    pub fn from_files(start_path: &str, goal_path: &str) -> Result<Self, InputError> {
        let start = fs::read_to_string(start_path)?;
        let goal = fs::read_to_string(goal_path)?;
        Self::from_text(&start, &goal)
    }

    pub fn start(&self) -> &Board {
        &self.start
    }

    pub fn goal(&self) -> &Board {
        &self.goal
    }
}
