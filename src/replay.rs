use crate::game::Board;
use crate::path::Path;

/// Replay `path` on a copy of `start`.
///
/// Returns the start board followed by the board after each move.
pub fn replay(start: &Board, path: &Path) -> Result<Vec<Board>, String> {
    let mut boards = Vec::with_capacity(path.len() + 1);
    let mut board = start.clone();
    boards.push(board.clone());
    for (step, &direction) in path.moves().iter().enumerate() {
        if !board.is_valid_move(direction) {
            return Err(format!(
                "Move {} ({}) leaves the board from {}",
                step + 1,
                direction,
                board.blank()
            ));
        }
        board = board.apply_move(direction);
        boards.push(board.clone());
    }
    Ok(boards)
}
