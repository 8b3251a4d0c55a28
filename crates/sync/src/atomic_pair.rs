use crate::sync::{AtomicU64, Ordering};

/// Two `f32` values which are always loaded and stored together.
///
/// Both values are stored bitwise in one `AtomicU64`: the first in the high 32 bits and the second in the low 32 bits.
/// Any load therefore returns a pair which was stored as a pair, even if other threads are storing concurrently.
///
/// Updating only one half of the pair must preserve the other half, which requires knowing the current value.  This is
/// done with a CAS loop in [AtomicF32Pair::update], which is lock-free but not wait-free: call it from control threads,
/// not from the audio thread.  The audio thread should only ever call [AtomicF32Pair::load].
pub struct AtomicF32Pair {
    storage: AtomicU64,
}

#[inline(always)]
fn pack(first: f32, second: f32) -> u64 {
    ((first.to_bits() as u64) << 32) | (second.to_bits() as u64)
}

#[inline(always)]
fn unpack(val: u64) -> (f32, f32) {
    let first = f32::from_bits((val >> 32) as u32);
    let second = f32::from_bits(val as u32);
    (first, second)
}

impl AtomicF32Pair {
    pub fn new(first: f32, second: f32) -> AtomicF32Pair {
        Self {
            storage: AtomicU64::new(pack(first, second)),
        }
    }

    /// Load both values.
    #[inline(always)]
    pub fn load(&self, ordering: Ordering) -> (f32, f32) {
        unpack(self.storage.load(ordering))
    }

    /// Store both values at once.
    #[inline(always)]
    pub fn store(&self, first: f32, second: f32, ordering: Ordering) {
        self.storage.store(pack(first, second), ordering);
    }

    /// Replace the pair with the result of a closure given the current pair, retrying if another thread got in first.
    ///
    /// The closure may run more than once.  Returns the pair which was replaced.
    pub fn update(
        &self,
        mut updater: impl FnMut(f32, f32) -> (f32, f32),
        success: Ordering,
    ) -> (f32, f32) {
        let mut current = self.storage.load(Ordering::Relaxed);

        loop {
            let (first, second) = unpack(current);
            let (new_first, new_second) = updater(first, second);

            match self.storage.compare_exchange(
                current,
                pack(new_first, new_second),
                success,
                Ordering::Relaxed,
            ) {
                Ok(_) => return (first, second),
                Err(actual) => current = actual,
            }
        }
    }
}

impl std::fmt::Debug for AtomicF32Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (first, second) = self.load(Ordering::Relaxed);
        f.debug_tuple("AtomicF32Pair")
            .field(&first)
            .field(&second)
            .finish()
    }
}
