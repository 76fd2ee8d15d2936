use crate::game::{BLANK, Slide, Tile};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// Zobrist hash for board states
pub struct Zobrist {
    cells: usize,
    /// keys[cell * cells + tile]
    keys: Vec<u64>,
}

impl Zobrist {
    pub fn new(size: usize) -> Self {
        // Use a seeded PRNG for reproducible Zobrist hashes
        let mut rng = ChaCha8Rng::seed_from_u64(0x123456789abcdef0);

        let cells = size * size;
        let keys = (0..cells * cells).map(|_| rng.next_u64()).collect();
        Zobrist { cells, keys }
    }

    /// Hash value for `tile` sitting in cell `index`
    pub fn key(&self, index: usize, tile: Tile) -> u64 {
        self.keys[index * self.cells + tile as usize]
    }

    /// Compute the hash of a whole board
    pub fn hash(&self, tiles: &[Tile]) -> u64 {
        tiles
            .iter()
            .enumerate()
            .fold(0u64, |hash, (idx, &tile)| hash ^ self.key(idx, tile))
    }

    /// Hash of the board reached from a board hashing to `hash` by `slide`
    pub fn update(&self, hash: u64, slide: &Slide, size: usize) -> u64 {
        let from = slide.from.index(size);
        let to = slide.to.index(size);
        hash ^ self.key(from, slide.tile)
            ^ self.key(to, BLANK)
            ^ self.key(from, BLANK)
            ^ self.key(to, slide.tile)
    }
}

/// Best known depth of every board hash seen so far.
#[derive(Default)]
pub struct TranspositionTable {
    depths: HashMap<u64, u32>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the board was already reached in `depth` moves or fewer.
    pub fn should_skip(&self, hash: u64, depth: u32) -> bool {
        self.depths.get(&hash).is_some_and(|&best| best <= depth)
    }

    /// True if the board has since been reached in fewer than `depth` moves.
    pub fn is_stale(&self, hash: u64, depth: u32) -> bool {
        self.depths.get(&hash).is_some_and(|&best| best < depth)
    }

    pub fn insert(&mut self, hash: u64, depth: u32) {
        self.depths.insert(hash, depth);
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }
}
