use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// Uniform index source, injected wherever a reply or meme is picked at random.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len.max(1))
    }
}

/// Always picks the same index (modulo `len`).
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub usize);

impl RandomSource for FixedRandom {
    fn pick(&self, len: usize) -> usize {
        self.0 % len.max(1)
    }
}

/// Walks 0, 1, 2, ... so repeated picks cover every index in turn.
#[derive(Debug, Default)]
pub struct CyclingRandom {
    next: AtomicUsize,
}

impl CyclingRandom {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RandomSource for CyclingRandom {
    fn pick(&self, len: usize) -> usize {
        self.next.fetch_add(1, Ordering::SeqCst) % len.max(1)
    }
}
