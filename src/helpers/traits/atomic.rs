use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub trait FlagAtomic {
    fn is_true(&self) -> bool;
    fn set_bool(&self, value: bool);
}

impl FlagAtomic for AtomicBool {
    fn is_true(&self) -> bool {
        self.load(Ordering::Acquire)
    }

    fn set_bool(&self, value: bool) {
        self.store(value, Ordering::Release);
    }
}

pub trait CounterAtomic {
    fn next_id(&self) -> u64;
}

impl CounterAtomic for AtomicU64 {
    fn next_id(&self) -> u64 {
        self.fetch_add(1, Ordering::Relaxed)
    }
}
