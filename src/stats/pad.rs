/// Walks the slots (positions or bin indices) that `--pad` must fill, in
/// coordinate order, while real rows are interleaved by the caller.
pub struct Padder {
    ranges: Vec<(u32, i64, i64)>,
    idx: usize,
    next: i64,
}

impl Padder {
    /// `ranges` are `(tid, start, end)` half-open slot ranges in ascending order.
    pub fn new(ranges: Vec<(u32, i64, i64)>) -> Self {
        Self {
            ranges,
            idx: 0,
            next: i64::MIN,
        }
    }

    pub fn disabled() -> Self {
        Self::new(Vec::new())
    }

    fn current(&mut self) -> Option<(u32, i64)> {
        while let Some(&(tid, start, end)) = self.ranges.get(self.idx) {
            let slot = self.next.max(start);
            if slot < end {
                return Some((tid, slot));
            }
            self.idx += 1;
            self.next = i64::MIN;
        }
        None
    }

    /// Next slot strictly before `(tid, slot)`, if any remains.
    pub fn next_before(&mut self, tid: u32, slot: i64) -> Option<(u32, i64)> {
        let current = self.current()?;
        if current < (tid, slot) {
            self.next = current.1 + 1;
            Some(current)
        } else {
            None
        }
    }

    /// Marks `(tid, slot)` as covered by a real row.
    pub fn consume(&mut self, tid: u32, slot: i64) {
        if self.current() == Some((tid, slot)) {
            self.next = slot + 1;
        }
    }

    /// Slots left after the last real row.
    pub fn next_remaining(&mut self) -> Option<(u32, i64)> {
        let current = self.current()?;
        self.next = current.1 + 1;
        Some(current)
    }
}
