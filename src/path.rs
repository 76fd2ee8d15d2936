use crate::game::Direction;
use std::fmt;
use std::str::FromStr;

/// Marker that opens every rendered path label.
pub const START_MARKER: char = 'B';

/// Moves leading from the start board to some state.
///
/// Rendered as the start marker followed by one letter per move, e.g. `Brdrd`
/// for right, down, right, down. A move is never immediately followed by its
/// inverse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    moves: Vec<Direction>,
}

impl Path {
    pub fn new() -> Self {
        Path { moves: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Path {
            moves: Vec::with_capacity(capacity),
        }
    }

    /// Number of moves, not counting the start marker.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn last(&self) -> Option<Direction> {
        self.moves.last().copied()
    }

    pub fn moves(&self) -> &[Direction] {
        &self.moves
    }

    pub fn push(&mut self, direction: Direction) {
        debug_assert!(
            self.last() != Some(direction.opposite()),
            "{} immediately reverses {}",
            direction,
            direction.opposite()
        );
        self.moves.push(direction);
    }

    pub fn pop(&mut self) -> Option<Direction> {
        self.moves.pop()
    }

    /// A copy of this path extended by one move.
    pub fn extended(&self, direction: Direction) -> Path {
        let mut moves = Vec::with_capacity(self.moves.len() + 1);
        moves.extend_from_slice(&self.moves);
        let mut path = Path { moves };
        path.push(direction);
        path
    }

    /// True iff no move is immediately undone by the next one.
    pub fn is_reversal_free(&self) -> bool {
        self.moves.windows(2).all(|w| w[1] != w[0].opposite())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut label = String::with_capacity(self.moves.len() + 1);
        label.push(START_MARKER);
        label.extend(self.moves.iter().map(Direction::label));
        f.write_str(&label)
    }
}

impl FromStr for Path {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        if chars.next() != Some(START_MARKER) {
            return Err(format!("Path must start with '{}'", START_MARKER));
        }
        let moves = chars
            .map(|c| Direction::from_label(c).ok_or_else(|| format!("Invalid move '{}'", c)))
            .collect::<Result<Vec<_>, _>>()?;
        let path = Path { moves };
        if !path.is_reversal_free() {
            return Err(format!("Path {} undoes a move immediately", s.trim()));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_is_marker() {
        let path = Path::new();
        assert_eq!(path.to_string(), "B");
        assert_eq!(path.len(), 0);
        assert!(path.is_empty());
        assert_eq!(path.last(), None);
    }

    #[test]
    fn test_display() {
        let mut path = Path::new();
        for direction in [
            Direction::Right,
            Direction::Down,
            Direction::Right,
            Direction::Down,
        ] {
            path.push(direction);
        }
        assert_eq!(path.to_string(), "Brdrd");
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_extended_copies() {
        let path = Path::new().extended(Direction::Up);
        let longer = path.extended(Direction::Left);
        assert_eq!(path.to_string(), "Bu");
        assert_eq!(longer.to_string(), "Bul");
        assert_eq!(longer.last(), Some(Direction::Left));
    }

    #[test]
    fn test_push_pop() {
        let mut path = Path::with_capacity(4);
        path.push(Direction::Down);
        path.push(Direction::Down);
        assert_eq!(path.pop(), Some(Direction::Down));
        assert_eq!(path.moves(), &[Direction::Down]);
    }

    #[test]
    fn test_parse() {
        let path: Path = "Blurd".parse().unwrap();
        assert_eq!(
            path.moves(),
            &[
                Direction::Left,
                Direction::Up,
                Direction::Right,
                Direction::Down
            ]
        );
        assert_eq!(path.to_string(), "Blurd");
    }

    #[test]
    fn test_parse_errors() {
        assert!("rd".parse::<Path>().is_err());
        assert!("Brx".parse::<Path>().is_err());
        assert!("Brl".parse::<Path>().is_err());
        assert_eq!("B".parse::<Path>().unwrap(), Path::new());
    }

    #[test]
    fn test_reversal_free() {
        let path: Path = "Brdlu".parse().unwrap();
        assert!(path.is_reversal_free());
    }
}
