// Copyright 2019-2022 Clemens Lutz
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

//! Per-worker radix histograms.

use std::ops::Range;

use crate::tuple::Tuple;

/// Number of partitions produced by `bits` radix bits: `1 << bits`.
pub fn fanout(bits: u32) -> usize {
    1usize << bits
}

/// The partition a key belongs to under bit window `[lo, lo+bits)`.
pub fn partition_of(value: u64, lo: u32, bits: u32) -> usize {
    let mask = (1u64 << bits) - 1;
    ((value >> lo) & mask) as usize
}

/// `H[t][p]`: per-worker, per-partition tuple counts for one pass, stored
/// row-major (`t * partitions + p`) since each row is written by exactly
/// one worker and never touched again after the histogram phase ends.
pub struct Histogram {
    worker_count: usize,
    partitions: usize,
    counts: Vec<u64>,
}

impl Histogram {
    /// Assembles a histogram from one already-computed row per worker.
    /// `rows[t]` must have length `partitions`.
    pub fn from_rows(partitions: usize, rows: Vec<Vec<u64>>) -> Self {
        let worker_count = rows.len();
        let mut counts = vec![0u64; worker_count * partitions];
        for (t, row) in rows.into_iter().enumerate() {
            debug_assert_eq!(row.len(), partitions);
            counts[t * partitions..(t + 1) * partitions].copy_from_slice(&row);
        }
        Histogram {
            worker_count,
            partitions,
            counts,
        }
    }

    pub fn get(&self, t: usize, p: usize) -> u64 {
        self.counts[t * self.partitions + p]
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// `sum_{t,p} H[t][p]`; must equal the input length.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// One worker's contribution to the histogram: scans `region[range]` and
/// counts tuples per partition under bit window `[lo, lo+bits)`. Touches no
/// state shared with any other worker.
pub fn compute_worker_histogram(region: &[Tuple], range: Range<usize>, lo: u32, bits: u32) -> Vec<u64> {
    let mut counts = vec![0u64; fanout(bits)];
    for t in &region[range] {
        counts[partition_of(t.value, lo, bits)] += 1;
    }
    counts
}
