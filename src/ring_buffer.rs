use crate::Price;

#[derive(Clone, Debug)]
pub(crate) struct RingBuffer<T = Price> {
    buffer: Vec<T>,
    head: usize,
    len: usize,
    capacity: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    #[must_use]
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![T::default(); capacity],
            head: 0,
            len: 0,
            capacity,
        }
    }

    #[inline]
    pub(crate) fn is_ready(&self) -> bool {
        self.len == self.capacity
    }

    /// Appends `value`, returning the evicted oldest value once full.
    #[inline]
    pub(crate) fn push(&mut self, value: T) -> Option<T> {
        if self.is_ready() {
            let old = self.buffer[self.head];

            self.buffer[self.head] = value;

            self.head += 1;
            if self.head == self.capacity {
                self.head = 0;
            }

            Some(old)
        } else {
            self.buffer[self.len] = value;
            self.len += 1;

            None
        }
    }

    /// Values from oldest to newest.
    pub(crate) fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (newer, older) = self.buffer[..self.len].split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::RingBuffer;

    #[test]
    fn filling_returns_none() {
        let mut rb = RingBuffer::new(3);
        assert_eq!(rb.push(1.0), None);
        assert_eq!(rb.push(2.0), None);
        assert!(!rb.is_ready());
        assert_eq!(rb.push(3.0), None);
        assert!(rb.is_ready());
    }

    #[test]
    fn full_evicts_oldest() {
        let mut rb = RingBuffer::new(3);
        rb.push(1.0);
        rb.push(2.0);
        rb.push(3.0);
        assert_eq!(rb.push(4.0), Some(1.0));
        assert_eq!(rb.push(5.0), Some(2.0));
        assert_eq!(rb.push(6.0), Some(3.0));
    }

    #[test]
    fn capacity_one() {
        let mut rb = RingBuffer::new(1);
        assert_eq!(rb.push(1.0), None);
        assert!(rb.is_ready());
        assert_eq!(rb.push(2.0), Some(1.0));
        assert_eq!(rb.push(3.0), Some(2.0));
    }

    #[test]
    fn wrap_around_correctness() {
        let mut rb = RingBuffer::new(2);
        rb.push(1.0);
        rb.push(2.0);
        rb.push(3.0); // evicts 1, head wraps
        rb.push(4.0); // evicts 2
        rb.push(5.0); // evicts 3, head wraps again
        assert_eq!(rb.push(6.0), Some(4.0));
    }

    mod iter {
        use super::*;

        #[test]
        fn partial_buffer_in_insertion_order() {
            let mut rb = RingBuffer::new(4);
            rb.push(1.0);
            rb.push(2.0);
            assert_eq!(rb.iter().collect::<Vec<_>>(), vec![1.0, 2.0]);
        }

        #[test]
        fn wrapped_buffer_oldest_first() {
            let mut rb = RingBuffer::new(3);
            for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
                rb.push(v);
            }
            assert_eq!(rb.iter().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
        }

        #[test]
        fn holds_optional_values() {
            let mut rb: RingBuffer<Option<f64>> = RingBuffer::new(2);
            rb.push(Some(1.0));
            rb.push(None);
            assert_eq!(rb.iter().collect::<Vec<_>>(), vec![Some(1.0), None]);
        }
    }
}
