use arrayvec::ArrayVec;
use std::fmt;

pub const MIN_SIZE: usize = 2;
pub const MAX_SIZE: usize = 16;

/// A tile label. Labels run from 0 to N²−1, with 0 denoting the blank.
pub type Tile = u8;

pub const BLANK: Tile = 0;

/// A cell on the board as (row, col).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(pub u8, pub u8);

impl Position {
    pub fn from_index(index: usize, size: usize) -> Self {
        Position((index / size) as u8, (index % size) as u8)
    }

    pub fn row(self) -> usize {
        self.0 as usize
    }

    pub fn col(self) -> usize {
        self.1 as usize
    }

    pub fn index(self, size: usize) -> usize {
        self.row() * size + self.col()
    }

    pub fn distance(self, other: Position) -> u32 {
        (self.0.abs_diff(other.0) + self.1.abs_diff(other.1)) as u32
    }

    /// The neighbouring cell in `direction`, if it lies on a `size`×`size` board.
    pub fn step(self, direction: Direction, size: usize) -> Option<Position> {
        let (dr, dc) = direction.delta();
        let row = self.0 as i16 + dr as i16;
        let col = self.1 as i16 + dc as i16;
        if row < 0 || col < 0 || row >= size as i16 || col >= size as i16 {
            return None;
        }
        Some(Position(row as u8, col as u8))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// The direction the blank moves in. The tile on that side slides the opposite way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    /// (row, col) offset of the blank.
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn label(&self) -> char {
        match self {
            Direction::Up => 'u',
            Direction::Down => 'd',
            Direction::Left => 'l',
            Direction::Right => 'r',
        }
    }

    pub fn from_label(label: char) -> Option<Direction> {
        match label {
            'u' => Some(Direction::Up),
            'd' => Some(Direction::Down),
            'l' => Some(Direction::Left),
            'r' => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
            Direction::Left => write!(f, "Left"),
            Direction::Right => write!(f, "Right"),
        }
    }
}

/// Successor moves of a single state. At most four.
pub type Moves = ArrayVec<Direction, 4>;

/// Valid moves of a blank at `blank`, excluding the one that would undo `last`.
pub fn valid_moves(blank: Position, size: usize, last: Option<Direction>) -> Moves {
    let mut moves = Moves::new();
    for direction in ALL_DIRECTIONS {
        if last.is_some_and(|last| last.opposite() == direction) {
            continue;
        }
        if blank.step(direction, size).is_some() {
            moves.push(direction);
        }
    }
    moves
}

/// Record of one in-place move: `tile` went from `from` (the blank's new cell)
/// to `to` (the blank's old cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub tile: Tile,
    pub from: Position,
    pub to: Position,
    pub direction: Direction,
}

/// Swap the blank at `blank` with its neighbour in `direction`.
/// Panics if the move leaves the board.
pub(crate) fn slide_blank(
    tiles: &mut [Tile],
    size: usize,
    blank: Position,
    direction: Direction,
) -> Slide {
    let target = blank
        .step(direction, size)
        .unwrap_or_else(|| panic!("Cannot move blank {} from {}", direction, blank));
    let (blank_idx, target_idx) = (blank.index(size), target.index(size));
    debug_assert_eq!(tiles[blank_idx], BLANK, "blank is not at {}", blank);
    let tile = tiles[target_idx];
    tiles.swap(blank_idx, target_idx);
    Slide {
        tile,
        from: target,
        to: blank,
        direction,
    }
}

/// Reverse a slide produced by [`slide_blank`].
pub(crate) fn unslide(tiles: &mut [Tile], size: usize, slide: Slide) {
    let (from_idx, to_idx) = (slide.from.index(size), slide.to.index(size));
    debug_assert_eq!(tiles[from_idx], BLANK);
    debug_assert_eq!(tiles[to_idx], slide.tile);
    tiles.swap(from_idx, to_idx);
}

/// Borrowed row-major view of a board's tiles.
#[derive(Debug, Clone, Copy)]
pub struct Grid<'a> {
    size: usize,
    tiles: &'a [Tile],
}

impl<'a> Grid<'a> {
    pub fn new(size: usize, tiles: &'a [Tile]) -> Self {
        debug_assert_eq!(tiles.len(), size * size);
        Grid { size, tiles }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tiles(&self) -> &'a [Tile] {
        self.tiles
    }
}

impl fmt::Display for Grid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles().chunks(self.size()) {
            let mut line = String::new();
            for &tile in row {
                if tile == BLANK {
                    line.push_str(&format!("{:>2} ", 'x'));
                } else {
                    line.push_str(&format!("{:>2} ", tile));
                }
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: u8,
    tiles: Vec<Tile>,
    blank: Position,
}

impl Board {
    /// Build a board from an N×N matrix of labels.
    ///
    /// The matrix must be square with 2 ≤ N ≤ 16 and contain every label in
    /// 0..N² exactly once.
    pub fn from_rows(rows: &[Vec<u32>]) -> Result<Self, String> {
        let size = rows.len();
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(format!(
                "Row {} has {} entries, expected {}",
                r,
                row.len(),
                size
            ));
        }
        Self::from_values(size, rows.iter().flatten().copied())
    }

    /// Build a board from N² labels in row-major order.
    pub fn from_values(size: usize, values: impl IntoIterator<Item = u32>) -> Result<Self, String> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(format!(
                "Board size {} outside supported range {}..={}",
                size, MIN_SIZE, MAX_SIZE
            ));
        }

        let cells = size * size;
        let mut seen = vec![false; cells];
        let mut tiles = Vec::with_capacity(cells);
        for value in values {
            let label = value as usize;
            if label >= cells {
                return Err(format!(
                    "Tile {} out of range for a {}x{} board",
                    value, size, size
                ));
            }
            if seen[label] {
                return Err(format!("Tile {} appears more than once", value));
            }
            seen[label] = true;
            tiles.push(label as Tile);
        }
        if tiles.len() != cells {
            return Err(format!(
                "Expected {} tiles for a {}x{} board, found {}",
                cells,
                size,
                size,
                tiles.len()
            ));
        }

        let blank = Self::find_blank(&tiles, size).ok_or("No blank tile on board")?;
        Ok(Board {
            size: size as u8,
            tiles,
            blank,
        })
    }

    /// The canonical goal: 1..N²−1 in reading order, blank in the last cell.
    pub fn solved(size: usize) -> Self {
        assert!(
            (MIN_SIZE..=MAX_SIZE).contains(&size),
            "unsupported board size {}",
            size
        );
        let cells = size * size;
        let mut tiles: Vec<Tile> = (1..cells).map(|t| t as Tile).collect();
        tiles.push(BLANK);
        Board {
            size: size as u8,
            tiles,
            blank: Position::from_index(cells - 1, size),
        }
    }

    /// Locate the blank with a full scan.
    pub fn find_blank(tiles: &[Tile], size: usize) -> Option<Position> {
        tiles
            .iter()
            .position(|&t| t == BLANK)
            .map(|idx| Position::from_index(idx, size))
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn blank(&self) -> Position {
        self.blank
    }

    pub fn get(&self, pos: Position) -> Tile {
        self.tiles[pos.index(self.size())]
    }

    pub fn grid(&self) -> Grid<'_> {
        Grid::new(self.size(), &self.tiles)
    }

    /// True iff the blank stays on the board after moving in `direction`.
    pub fn is_valid_move(&self, direction: Direction) -> bool {
        self.blank.step(direction, self.size()).is_some()
    }

    pub fn valid_moves(&self, last: Option<Direction>) -> Moves {
        valid_moves(self.blank, self.size(), last)
    }

    /// A new board with the move applied. Panics if the move is invalid.
    pub fn apply_move(&self, direction: Direction) -> Board {
        let mut board = self.clone();
        board.apply_move_in_place(direction);
        board
    }

    /// Apply the move in place, returning what is needed to undo it.
    /// Panics if the move is invalid.
    pub fn apply_move_in_place(&mut self, direction: Direction) -> Slide {
        let size = self.size();
        let slide = slide_blank(&mut self.tiles, size, self.blank, direction);
        self.blank = slide.from;
        slide
    }

    pub fn undo_move(&mut self, slide: Slide) {
        let size = self.size();
        unslide(&mut self.tiles, size, slide);
        self.blank = slide.to;
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.grid().fmt(f)
    }
}

/// Whether `goal` is reachable from `start`.
///
/// Every move is a transposition that also moves the blank one cell, so the
/// parity of the permutation taking start to goal (blank included) must equal
/// the parity of the blank's displacement.
pub fn is_solvable(start: &Board, goal: &Board) -> bool {
    if start.size() != goal.size() {
        return false;
    }
    let cells = start.tiles.len();
    let mut goal_index = vec![0usize; cells];
    for (idx, &tile) in goal.tiles.iter().enumerate() {
        goal_index[tile as usize] = idx;
    }

    let mut visited = vec![false; cells];
    let mut cycles = 0;
    for first in 0..cells {
        if visited[first] {
            continue;
        }
        cycles += 1;
        let mut idx = first;
        while !visited[idx] {
            visited[idx] = true;
            idx = goal_index[start.tiles[idx] as usize];
        }
    }

    let permutation_parity = (cells - cycles) % 2;
    let blank_parity = (start.blank.distance(goal.blank) % 2) as usize;
    permutation_parity == blank_parity
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&[u32]]) -> Board {
        let rows: Vec<Vec<u32>> = rows.iter().map(|r| r.to_vec()).collect();
        Board::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_from_rows_basic() {
        let b = board(&[&[1, 2, 3], &[4, 0, 5], &[7, 8, 6]]);
        assert_eq!(b.size(), 3);
        assert_eq!(b.blank(), Position(1, 1));
        assert_eq!(b.get(Position(2, 2)), 6);
    }

    #[test]
    fn test_from_rows_not_square() {
        let rows = vec![vec![1, 2, 3], vec![0, 4, 5]];
        assert!(Board::from_rows(&rows).is_err());
    }

    #[test]
    fn test_from_rows_duplicate_tile() {
        let rows = vec![vec![1, 1], vec![3, 0]];
        let err = Board::from_rows(&rows).unwrap_err();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn test_from_rows_out_of_range() {
        let rows = vec![vec![1, 2], vec![4, 0]];
        assert!(Board::from_rows(&rows).is_err());
    }

    #[test]
    fn test_from_rows_too_small() {
        let rows = vec![vec![0]];
        assert!(Board::from_rows(&rows).is_err());
    }

    #[test]
    fn test_solved() {
        let b = Board::solved(3);
        assert_eq!(b.tiles(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(b.blank(), Position(2, 2));
        assert_eq!(b, board(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 0]]));
    }

    #[test]
    fn test_valid_moves_corner() {
        let b = Board::solved(3);
        assert!(b.is_valid_move(Direction::Up));
        assert!(b.is_valid_move(Direction::Left));
        assert!(!b.is_valid_move(Direction::Down));
        assert!(!b.is_valid_move(Direction::Right));
        assert_eq!(b.valid_moves(None).as_slice(), &[Direction::Up, Direction::Left]);
    }

    #[test]
    fn test_valid_moves_skip_reversal() {
        let b = board(&[&[1, 2, 3], &[4, 0, 5], &[7, 8, 6]]);
        assert_eq!(b.valid_moves(None).len(), 4);
        let moves = b.valid_moves(Some(Direction::Down));
        assert_eq!(
            moves.as_slice(),
            &[Direction::Down, Direction::Left, Direction::Right]
        );
    }

    #[test]
    fn test_apply_move_copies() {
        let b = board(&[&[1, 0], &[3, 2]]);
        let moved = b.apply_move(Direction::Down);
        assert_eq!(b.tiles(), &[1, 0, 3, 2]);
        assert_eq!(moved.tiles(), &[1, 2, 3, 0]);
        assert_eq!(moved.blank(), Position(1, 1));
    }

    #[test]
    fn test_apply_move_in_place_and_undo() {
        let original = board(&[&[1, 2, 3], &[4, 0, 5], &[7, 8, 6]]);
        let mut b = original.clone();
        let slide = b.apply_move_in_place(Direction::Right);
        assert_eq!(slide.tile, 5);
        assert_eq!(slide.from, Position(1, 2));
        assert_eq!(slide.to, Position(1, 1));
        assert_eq!(b.blank(), Position(1, 2));
        assert_eq!(b.get(Position(1, 1)), 5);

        b.undo_move(slide);
        assert_eq!(b, original);
    }

    #[test]
    #[should_panic(expected = "Cannot move blank")]
    fn test_apply_invalid_move() {
        let mut b = Board::solved(2);
        b.apply_move_in_place(Direction::Down);
    }

    #[test]
    fn test_direction_labels() {
        for direction in ALL_DIRECTIONS {
            assert_eq!(Direction::from_label(direction.label()), Some(direction));
            assert_eq!(direction.opposite().opposite(), direction);
        }
        assert_eq!(Direction::from_label('B'), None);
    }

    #[test]
    fn test_display() {
        let b = board(&[&[1, 2, 3], &[4, 0, 5], &[7, 8, 6]]);
        assert_eq!(b.to_string(), " 1  2  3\n 4  x  5\n 7  8  6\n");
    }

    #[test]
    fn test_is_solvable() {
        let goal = Board::solved(3);
        let one_move = board(&[&[1, 2, 3], &[4, 5, 6], &[7, 0, 8]]);
        assert!(is_solvable(&one_move, &goal));
        assert!(is_solvable(&goal, &goal));

        // Swapping two tiles flips the permutation parity only.
        let swapped = board(&[&[2, 1, 3], &[4, 5, 6], &[7, 8, 0]]);
        assert!(!is_solvable(&swapped, &goal));
    }

    #[test]
    fn test_is_solvable_even_size() {
        let goal = board(&[&[1, 2], &[3, 0]]);
        assert!(is_solvable(&board(&[&[1, 0], &[3, 2]]), &goal));
        assert!(is_solvable(&board(&[&[0, 1], &[3, 2]]), &goal));
        assert!(!is_solvable(&board(&[&[2, 1], &[3, 0]]), &goal));
        assert!(!is_solvable(&board(&[&[1, 3], &[2, 0]]), &goal));
    }
}
