//! Two-slot buffer arena that alternates read and write roles.

/// A pair of equal-length buffers selected by tick parity.
///
/// On even ticks slot 0 is "now" and slot 1 is "next"; on odd ticks the
/// roles flip. [`PingPong::split`] hands out both at once, and the borrow
/// checker guarantees the read slice and the write slice never alias.
///
/// ```ignore
/// let mut buffers = PingPong::new(boids);
/// let (now, next) = buffers.split();
/// dispatch(now, next, &params)?;
/// buffers.swap();
/// ```
#[derive(Debug, Clone)]
pub struct PingPong<T> {
    slots: [Vec<T>; 2],
    tick: u64,
}

impl<T: Clone> PingPong<T> {
    /// Both slots start as copies of `initial`.
    pub fn new(initial: Vec<T>) -> Self {
        Self {
            slots: [initial.clone(), initial],
            tick: 0,
        }
    }
}

impl<T> PingPong<T> {
    /// Number of completed swaps.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Index of the slot currently read from.
    #[inline]
    pub fn parity(&self) -> usize {
        (self.tick & 1) as usize
    }

    /// The buffer read this tick.
    #[inline]
    pub fn now(&self) -> &[T] {
        &self.slots[self.parity()]
    }

    /// `(now, next)` for this tick.
    pub fn split(&mut self) -> (&[T], &mut [T]) {
        let (first, second) = self.slots.split_at_mut(1);
        if self.tick & 1 == 0 {
            (first[0].as_slice(), second[0].as_mut_slice())
        } else {
            (second[0].as_slice(), first[0].as_mut_slice())
        }
    }

    /// Swap roles: the buffer just written becomes "now".
    #[inline]
    pub fn swap(&mut self) {
        self.tick += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots[0].len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots[0].is_empty()
    }

    /// Replace the contents of both slots and reset the tick counter.
    pub fn reset(&mut self, initial: Vec<T>)
    where
        T: Clone,
    {
        self.slots = [initial.clone(), initial];
        self.tick = 0;
    }
}
