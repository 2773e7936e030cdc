//! Small xorshift generator for the randomized assist parameters.

use std::sync::atomic::{AtomicU32, Ordering};

static SEED_COUNTER: AtomicU32 = AtomicU32::new(0x9E37_79B9);

#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    /// Seed from the clock mixed with a process-wide counter.
    pub fn from_entropy() -> Self {
        let nanos = chrono::Utc::now().timestamp_subsec_nanos();
        let bump = SEED_COUNTER.fetch_add(0x6D2B_79F5, Ordering::Relaxed);
        Self::new(nanos ^ bump.rotate_left(7))
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Offset in `[-span / 2, span / 2)`.
    pub fn jitter(&mut self, span: f64) -> f64 {
        (self.next_f64() - 0.5) * span
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.next_f64() * items.len() as f64) as usize;
        items.get(index.min(items.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range() {
        let mut rng = SimpleRng::new(42);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
            let j = rng.jitter(20.0);
            assert!((-10.0..10.0).contains(&j));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SimpleRng::new(7);
        let mut b = SimpleRng::new(7);
        assert_eq!(a.next_u32(), b.next_u32());
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_choose() {
        let mut rng = SimpleRng::new(3);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        let items = [1, 2, 3];
        for _ in 0..100 {
            assert!(items.contains(rng.choose(&items).unwrap()));
        }
    }
}
