/// A binary min-heap keyed by priority, over a growable backing store.
/// Items with equal priority come out in no particular order.
pub struct PriorityQueue<P, T> {
    heap: Vec<(P, T)>,
}

impl<P: Ord, T> PriorityQueue<P, T> {
    pub fn new() -> Self {
        Self { heap: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn peek_priority(&self) -> Option<&P> {
        self.heap.first().map(|(priority, _)| priority)
    }

    pub fn push(&mut self, priority: P, item: T) {
        self.heap.push((priority, item));

        // Sift up while the parent ranks after the child
        let mut child = self.heap.len() - 1;
        while child > 0 {
            let parent = (child - 1) / 2;
            if self.heap[parent].0 <= self.heap[child].0 {
                break;
            }
            self.heap.swap(parent, child);
            child = parent;
        }
    }

    pub fn pop_min(&mut self) -> Option<(P, T)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let min = self.heap.pop();

        // Sift down towards the smaller child
        let len = self.heap.len();
        let mut parent = 0;
        loop {
            let left = 2 * parent + 1;
            let right = left + 1;
            if left >= len {
                break;
            }
            let smaller = if right < len && self.heap[right].0 < self.heap[left].0 {
                right
            } else {
                left
            };
            if self.heap[parent].0 <= self.heap[smaller].0 {
                break;
            }
            self.heap.swap(parent, smaller);
            parent = smaller;
        }

        min
    }

    /// Remove every item, yielding them in no particular order.
    pub fn drain(&mut self) -> impl Iterator<Item = (P, T)> + '_ {
        self.heap.drain(..)
    }
}

impl<P: Ord, T> Default for PriorityQueue<P, T> {
    fn default() -> Self {
        Self::new()
    }
}
