// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Rolling storage for per-tick plant metrics.

use std::collections::HashMap;
use std::fmt;

/// Identifies a metric as `namespace.name`, e.g. `gas_holder.soc_bfg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    /// Owning subsystem.
    pub namespace: &'static str,
    /// Metric name.
    pub name: String,
}

impl MetricId {
    /// Creates an id.
    pub fn new(namespace: &'static str, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// A fixed-capacity circular buffer of samples.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    data: Vec<f64>,
    capacity: usize,
    index: usize,
}

impl RingBuffer {
    /// Creates an empty buffer holding at most `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            index: 0,
        }
    }

    /// Pushes a sample, overwriting the oldest once full.
    pub fn push(&mut self, value: f64) {
        if self.data.len() < self.capacity {
            self.data.push(value);
        } else {
            self.data[self.index] = value;
        }
        self.index = (self.index + 1) % self.capacity;
    }

    /// Number of samples held.
    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        let split = if self.data.len() < self.capacity {
            0
        } else {
            self.index
        };
        let (older, newer) = self.data.split_at(split);
        newer.iter().chain(older.iter())
    }

    /// Arithmetic mean, or 0.0 when empty.
    pub fn average(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Mean of the newer half minus mean of the older half.
    /// Positive when the metric is rising.
    pub fn trend(&self) -> f64 {
        let count = self.count();
        if count < 2 {
            return 0.0;
        }
        let half = count / 2;
        let older: f64 = self.iter().take(half).sum::<f64>() / half as f64;
        let newer: f64 = self.iter().skip(count - half).sum::<f64>() / half as f64;
        newer - older
    }

    /// Population variance, or 0.0 with fewer than two samples.
    pub fn variance(&self) -> f64 {
        if self.count() < 2 {
            return 0.0;
        }
        let avg = self.average();
        let sum_sq: f64 = self.data.iter().map(|v| (v - avg) * (v - avg)).sum();
        sum_sq / self.count() as f64
    }

    /// Smallest sample, or `f64::MAX` when empty.
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::MAX, f64::min)
    }

    /// Largest sample, or `f64::MIN` when empty.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::MIN, f64::max)
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<f64> {
        self.iter().last().copied()
    }
}

/// Rolling buffers keyed by metric.
#[derive(Debug)]
pub struct MetricStore {
    window: usize,
    buffers: HashMap<MetricId, RingBuffer>,
}

impl MetricStore {
    /// Creates a store keeping the last `window` samples per metric.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            buffers: HashMap::new(),
        }
    }

    /// Pushes a sample for `id`.
    pub fn push(&mut self, id: MetricId, value: f64) {
        let window = self.window;
        self.buffers
            .entry(id)
            .or_insert_with(|| RingBuffer::new(window))
            .push(value);
    }

    /// The buffer behind `id`, if any sample was pushed.
    pub fn get(&self, id: &MetricId) -> Option<&RingBuffer> {
        self.buffers.get(id)
    }

    /// Average of `id`, or 0.0 if unknown.
    pub fn get_average(&self, id: &MetricId) -> f64 {
        self.buffers.get(id).map(|b| b.average()).unwrap_or(0.0)
    }

    /// Trend of `id`, or 0.0 if unknown.
    pub fn get_trend(&self, id: &MetricId) -> f64 {
        self.buffers.get(id).map(|b| b.trend()).unwrap_or(0.0)
    }

    /// Variance of `id`, or 0.0 if unknown.
    pub fn get_variance(&self, id: &MetricId) -> f64 {
        self.buffers.get(id).map(|b| b.variance()).unwrap_or(0.0)
    }

    /// Minimum of `id`, or `f64::MAX` if unknown.
    pub fn get_min(&self, id: &MetricId) -> f64 {
        self.buffers.get(id).map(|b| b.min()).unwrap_or(f64::MAX)
    }

    /// Maximum of `id`, or `f64::MIN` if unknown.
    pub fn get_max(&self, id: &MetricId) -> f64 {
        self.buffers.get(id).map(|b| b.max()).unwrap_or(f64::MIN)
    }

    /// Samples held for `id`.
    pub fn get_sample_count(&self, id: &MetricId) -> usize {
        self.buffers.get(id).map(|b| b.count()).unwrap_or(0)
    }

    /// Drops every sample.
    pub fn clear(&mut self) {
        self.buffers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_push_and_iter() {
        let mut rb = RingBuffer::new(3);
        rb.push(1.0);
        rb.push(2.0);
        rb.push(3.0);
        rb.push(4.0); // Overwrites 1.0

        let values: Vec<f64> = rb.iter().copied().collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
        assert_eq!(rb.count(), 3);
        assert_eq!(rb.latest(), Some(4.0));
    }

    #[test]
    fn test_ring_buffer_partial_order() {
        let mut rb = RingBuffer::new(4);
        rb.push(1.0);
        rb.push(2.0);
        let values: Vec<f64> = rb.iter().copied().collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_ring_buffer_trend() {
        let mut rb = RingBuffer::new(4);
        for v in [0.50, 0.51, 0.60, 0.61] {
            rb.push(v);
        }
        assert!((rb.trend() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_ring_buffer_variance() {
        let mut rb = RingBuffer::new(4);
        for v in [5.0, 15.0, 5.0, 15.0] {
            rb.push(v);
        }
        assert!((rb.variance() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_ring_buffer_empty() {
        let rb = RingBuffer::new(4);
        assert_eq!(rb.average(), 0.0);
        assert_eq!(rb.trend(), 0.0);
        assert_eq!(rb.min(), f64::MAX);
        assert_eq!(rb.latest(), None);
    }

    #[test]
    fn test_metric_store_window() {
        let mut store = MetricStore::new(2);
        let id = MetricId::new("gas_holder", "p_bfg");
        for v in [10.0, 12.0, 14.0] {
            store.push(id.clone(), v);
        }
        assert_eq!(store.get_sample_count(&id), 2);
        assert_eq!(store.get_average(&id), 13.0);
        assert_eq!(store.get_min(&id), 12.0);
        assert_eq!(store.get_max(&id), 14.0);
        assert_eq!(id.to_string(), "gas_holder.p_bfg");
    }
}
