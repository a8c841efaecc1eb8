/// Which slot a new reading overwrites once the buffer has wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Always overwrite the chronologically oldest slot.
    RoundRobin,
    /// Overwrite a uniformly random slot.
    PickRandom,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    seq: u64,
    value: T,
}

/// Fixed-capacity sensor log. Pre-allocated, never grows after init.
///
/// Writing is two-phase: [`DataBuffer::evict`] hands back the reading that
/// currently owns a slot so its mark can be erased, then
/// [`DataBuffer::write`] stores the replacement.
#[derive(Debug, Clone)]
pub struct DataBuffer<T> {
    slots: Vec<Option<Entry<T>>>,
    policy: RetentionPolicy,
    /// Next round-robin slot, always `< slots.len()`.
    index: usize,
    next_seq: u64,
}

impl<T> DataBuffer<T> {
    /// Returns `None` for a zero capacity.
    pub fn new(capacity: usize, policy: RetentionPolicy) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Some(Self {
            slots,
            policy,
            index: 0,
            next_seq: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Pick the slot the next reading goes into.
    pub fn next_slot(&mut self, rng: &mut fastrand::Rng) -> usize {
        match self.policy {
            RetentionPolicy::RoundRobin => {
                let slot = self.index;
                self.index = (self.index + 1) % self.slots.len();
                slot
            }
            RetentionPolicy::PickRandom => rng.usize(0..self.slots.len()),
        }
    }

    /// Empty `slot`, returning what was there.
    pub fn evict(&mut self, slot: usize) -> Option<T> {
        self.slots.get_mut(slot)?.take().map(|e| e.value)
    }

    /// Store `value` in `slot`. Out-of-range slots are ignored.
    pub fn write(&mut self, slot: usize, value: T) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = Some(Entry {
                seq: self.next_seq,
                value,
            });
            self.next_seq += 1;
        }
    }

    /// `next_slot` + `evict` + `write`. Returns the evicted reading.
    pub fn record(&mut self, value: T, rng: &mut fastrand::Rng) -> Option<T> {
        let slot = self.next_slot(rng);
        let old = self.evict(slot);
        self.write(slot, value);
        old
    }

    /// Contents in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten().map(|e| &e.value)
    }

    /// Contents from oldest to newest write.
    pub fn chronological(&self) -> Vec<&T> {
        let mut entries: Vec<&Entry<T>> = self.slots.iter().flatten().collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| &e.value).collect()
    }

    /// Drop every reading, handing them back for erasure.
    pub fn drain(&mut self) -> Vec<T> {
        self.index = 0;
        self.slots
            .iter_mut()
            .filter_map(|s| s.take().map(|e| e.value))
            .collect()
    }
}
