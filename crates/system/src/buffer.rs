use std::collections::VecDeque;
use std::sync::Arc;

/// Rolling history of samples for the scrolling chart.
///
/// `len() <= capacity()` holds after every mutation; the oldest samples are
/// evicted first.
#[derive(Debug, Clone)]
pub struct ScrollingSeriesBuffer {
    samples:  VecDeque<f64>,
    capacity: usize,
}

impl ScrollingSeriesBuffer {
    /// Empty buffer holding at most `capacity` samples (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting from the front while over capacity.
    pub fn push(&mut self, value: f64) {
        self.samples.push_back(value);
        self.evict();
    }

    /// Change the capacity to `max(n, 1)`. Shrinking below the current length
    /// drops the oldest samples immediately; growing keeps contents as-is.
    pub fn set_capacity(&mut self, n: usize) {
        self.capacity = n.max(1);
        self.evict();
    }

    /// Copy of the contents, oldest to newest.
    pub fn snapshot(&self) -> Arc<[f64]> {
        self.samples.iter().copied().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest sample in the window, `0.0` when empty.
    pub fn peak(&self) -> f64 {
        self.samples.iter().copied().fold(0.0, f64::max)
    }

    /// Average of all samples in the window.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    fn evict(&mut self) {
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }
}
