/// Highlighted position among the displayed suggestions.
///
/// `capacity` is the configured display size and does not follow the length
/// of the current candidate list, so moves take the live length `n` as an
/// argument. Moving forward wraps at whichever bound is hit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationCursor {
    cursor: usize,
    capacity: usize,
}

impl NavigationCursor {
    pub fn new(capacity: usize) -> Self {
        Self {
            cursor: 0,
            capacity,
        }
    }

    pub fn selected(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn move_previous(&mut self, n: usize) {
        if n == 0 || self.capacity == 0 {
            return;
        }

        if self.cursor == 0 {
            self.cursor = self.capacity.min(n) - 1;
        } else {
            self.cursor -= 1;
        }
    }

    pub fn move_next(&mut self, n: usize) {
        if n == 0 || self.capacity == 0 {
            return;
        }

        // Both checks stay: the list may shrink below capacity between keystrokes.
        if self.cursor == self.capacity - 1 || self.cursor == n - 1 {
            self.cursor = 0;
        } else {
            self.cursor += 1;
        }
    }
}
