use crate::game::Board;
use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

/// Random walk of `moves` blank moves from `goal`, never undoing the previous
/// move. The result is always solvable in at most `moves` moves.
pub fn scramble<R: Rng>(goal: &Board, moves: usize, rng: &mut R) -> Board {
    let mut board = goal.clone();
    let mut last = None;
    for _ in 0..moves {
        let choices = board.valid_moves(last);
        // Every cell has at least two neighbours, so one always survives the reversal filter.
        if let Some(&direction) = choices.choose(rng) {
            board.apply_move_in_place(direction);
            last = Some(direction);
        }
    }
    board
}

/// Reproducible scramble driven by a seeded ChaCha generator.
pub fn scramble_seeded(goal: &Board, moves: usize, seed: u64) -> Board {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    scramble(goal, moves, &mut rng)
}
