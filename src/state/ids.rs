/// Monotonic id allocation for gallery entries
///
/// Ids are opaque strings to the rest of the app, but the allocator
/// hands out decimal counters so they never repeat within a session.

#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Start counting after every numeric id in `existing`.
    /// Non-numeric ids cannot collide with allocated ones and are skipped.
    pub fn after<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let mut allocator = Self { next: 1 };
        for id in existing {
            allocator.reserve(id);
        }
        allocator
    }

    /// Hand out the next id
    pub fn allocate(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }

    /// Make sure a numeric id that entered the store from elsewhere
    /// is never handed out again.
    pub fn reserve(&mut self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            if n >= self.next {
                self.next = n + 1;
            }
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}
