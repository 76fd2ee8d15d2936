use crate::game::{BLANK, Direction, Position, Slide, Tile, slide_blank};

/// Index of a board stored in a [`BoardPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot(u32);

/// Arena of equally sized boards in one contiguous buffer.
///
/// Released slots are recycled before the buffer grows, so a search that
/// frees each node after expanding it keeps the buffer near its peak open-set
/// size instead of allocating per node.
pub struct BoardPool {
    size: usize,
    cells: usize,
    tiles: Vec<Tile>,
    free: Vec<Slot>,
    live: usize,
}

impl BoardPool {
    pub fn new(size: usize) -> Self {
        BoardPool {
            size,
            cells: size * size,
            tiles: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of slots currently holding a board.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Number of slots ever allocated, live or free.
    pub fn slots(&self) -> usize {
        self.tiles.len() / self.cells
    }

    fn allocate(&mut self) -> Slot {
        self.live += 1;
        if let Some(slot) = self.free.pop() {
            return slot;
        }
        let slot = Slot(self.slots() as u32);
        self.tiles.resize(self.tiles.len() + self.cells, BLANK);
        slot
    }

    fn range(&self, slot: Slot) -> std::ops::Range<usize> {
        let start = slot.0 as usize * self.cells;
        start..start + self.cells
    }

    pub fn insert(&mut self, tiles: &[Tile]) -> Slot {
        assert_eq!(tiles.len(), self.cells, "board does not fit pool");
        let slot = self.allocate();
        let range = self.range(slot);
        self.tiles[range].copy_from_slice(tiles);
        slot
    }

    /// Store a copy of the board in `parent` with the blank at `blank` moved
    /// in `direction`. The parent is left untouched.
    pub fn insert_child(
        &mut self,
        parent: Slot,
        blank: Position,
        direction: Direction,
    ) -> (Slot, Slide) {
        let slot = self.allocate();
        let src = self.range(parent);
        let dst = self.range(slot);
        self.tiles.copy_within(src, dst.start);
        let size = self.size;
        let slide = slide_blank(&mut self.tiles[dst], size, blank, direction);
        (slot, slide)
    }

    pub fn get(&self, slot: Slot) -> &[Tile] {
        &self.tiles[self.range(slot)]
    }

    pub fn release(&mut self, slot: Slot) {
        debug_assert!(self.live > 0, "release on empty pool");
        self.live -= 1;
        self.free.push(slot);
    }
}
