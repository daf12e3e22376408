//! Ping-pong pair with an explicit active role
//!
//! Exactly one slot is `current` (read by this frame's integration) and the
//! other is `next` (its write target, then the render input). `swap` is the
//! only mutator and never moves the held values.

/// Physical slot of a [`StateBuffers`] pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

#[derive(Debug)]
pub struct StateBuffers<T> {
    slots: [T; 2],
    current: Slot,
}

impl<T> StateBuffers<T> {
    /// `a` starts as current, `b` as next
    pub fn new(a: T, b: T) -> Self {
        Self {
            slots: [a, b],
            current: Slot::A,
        }
    }

    pub fn current(&self) -> &T {
        &self.slots[self.current.index()]
    }

    pub fn next(&self) -> &T {
        &self.slots[self.current.other().index()]
    }

    pub fn current_slot(&self) -> Slot {
        self.current
    }

    /// Exchange roles. O(1), no data movement.
    pub fn swap(&mut self) {
        self.current = self.current.other();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl<T> StateBuffers<T> {
        fn get(&self, slot: Slot) -> &T {
            &self.slots[slot.index()]
        }
    }

    #[test]
    fn test_initial_roles() {
        let buffers = StateBuffers::new("a", "b");
        assert_eq!(*buffers.current(), "a");
        assert_eq!(*buffers.next(), "b");
        assert_eq!(buffers.current_slot(), Slot::A);
    }

    #[test]
    fn test_swap_exchanges_roles() {
        let mut buffers = StateBuffers::new(1, 2);
        buffers.swap();
        assert_eq!(*buffers.current(), 2);
        assert_eq!(*buffers.next(), 1);
        assert_eq!(buffers.current_slot(), Slot::B);
    }

    #[test]
    fn test_double_swap_is_identity() {
        let mut buffers = StateBuffers::new(1, 2);
        buffers.swap();
        buffers.swap();
        assert_eq!(*buffers.current(), 1);
        assert_eq!(*buffers.next(), 2);
    }

    #[test]
    fn test_roles_never_alias() {
        let mut buffers = StateBuffers::new(Slot::A, Slot::B);
        for _ in 0..5 {
            assert_ne!(*buffers.current(), *buffers.next());
            assert_eq!(*buffers.current(), buffers.current_slot());
            buffers.swap();
        }
    }

    #[test]
    fn test_swap_does_not_move_values() {
        let mut buffers = StateBuffers::new(vec![1.0f32; 3], vec![2.0f32; 3]);
        let a_ptr = buffers.get(Slot::A).as_ptr();
        buffers.swap();
        assert_eq!(buffers.next().as_ptr(), a_ptr);
    }
}
