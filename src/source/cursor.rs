use std::sync::atomic::{AtomicUsize, Ordering};

use crate::scope::Vars;

/// Loaded records shared by every iteration; the cursor wraps at the end.
#[derive(Debug)]
pub(super) struct RecordCursor {
    records: Vec<Vars>,
    cursor: AtomicUsize,
}

impl RecordCursor {
    pub(super) const fn new(records: Vec<Vars>) -> Self {
        Self {
            records,
            cursor: AtomicUsize::new(0),
        }
    }

    pub(super) fn next(&self) -> Option<Vars> {
        if self.records.is_empty() {
            return None;
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        let len = self.records.len();
        let selected = idx.rem_euclid(len);
        self.records.get(selected).cloned()
    }

    pub(super) const fn len(&self) -> usize {
        self.records.len()
    }
}
