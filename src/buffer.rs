//! Bounded frame retention
//!
//! Fixed-capacity FIFO ring of validated frames. Appending to a full buffer
//! evicts the oldest entry; overflow is never an error.

use crate::types::PoseFrame;
use std::collections::VecDeque;

/// Default capacity: ~30s at 30fps
pub const DEFAULT_BUFFER_CAPACITY: usize = 900;

#[derive(Debug, Clone)]
pub struct BoundedFrameBuffer<T = PoseFrame> {
    frames: VecDeque<T>,
    capacity: usize,
    /// Entries evicted since creation or the last clear
    evicted: u64,
}

impl<T> Default for BoundedFrameBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

impl<T> BoundedFrameBuffer<T> {
    /// Create a buffer; a zero capacity is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    /// Append a frame, returning the evicted oldest frame when full
    pub fn append(&mut self, frame: T) -> Option<T> {
        let evicted = if self.frames.len() >= self.capacity {
            self.evicted += 1;
            self.frames.pop_front()
        } else {
            None
        };
        self.frames.push_back(frame);
        evicted
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn evicted_count(&self) -> u64 {
        self.evicted
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.frames.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.frames.back()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.evicted = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::standing_frame;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keeps_last_capacity_frames_in_order() {
        let capacity = 5;
        let k = 7;
        let mut buffer = BoundedFrameBuffer::new(capacity);
        for i in 0..(capacity + k) as u64 {
            buffer.append(i);
        }

        assert_eq!(buffer.len(), capacity);
        assert_eq!(
            buffer.iter().copied().collect::<Vec<_>>(),
            vec![7, 8, 9, 10, 11]
        );
        assert_eq!(buffer.evicted_count(), k as u64);
    }

    #[test]
    fn test_append_returns_evicted_frame() {
        let mut buffer = BoundedFrameBuffer::new(2);
        assert_eq!(buffer.append(standing_frame(0, 0)), None);
        assert_eq!(buffer.append(standing_frame(1, 33_333)), None);

        let evicted = buffer.append(standing_frame(2, 66_666));
        assert_eq!(evicted.map(|f| f.frame_index()), Some(0));
        assert_eq!(buffer.latest().map(|f| f.frame_index()), Some(2));
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut buffer = BoundedFrameBuffer::new(0);
        buffer.append("a");
        buffer.append("b");
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_clear() {
        let mut buffer: BoundedFrameBuffer<u32> = BoundedFrameBuffer::default();
        buffer.append(1);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), DEFAULT_BUFFER_CAPACITY);
    }
}
