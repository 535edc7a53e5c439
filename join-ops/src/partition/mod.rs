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

//! Histogram/prefix-sum/scatter coordination: one pass rearranges a
//! contiguous region of tuples into `fanout(bits)` contiguous sub-regions,
//! aligned by the selected radix bits. Multi-pass refinement is built by
//! calling [`partition_one_pass`] again on each resulting sub-region with
//! the next `bits_per_pass` bits.

pub mod histogram;
pub mod scatter;

use std::ops::Range;

pub use histogram::{fanout, partition_of, Histogram};
pub use scatter::ScatterSlice;

use crate::tuple::Tuple;

/// Splits `len` positions into `worker_count` contiguous, near-equal
/// ranges. The first `len % worker_count` workers get one extra element.
pub fn worker_ranges(len: usize, worker_count: usize) -> Vec<Range<usize>> {
    let worker_count = worker_count.max(1);
    let base = len / worker_count;
    let rem = len % worker_count;
    let mut ranges = Vec::with_capacity(worker_count);
    let mut start = 0usize;
    for t in 0..worker_count {
        let extra = if t < rem { 1 } else { 0 };
        let end = start + base + extra;
        ranges.push(start..end);
        start = end;
    }
    ranges
}

/// Exclusive prefix-sum write offsets `O[t][p]`, derived from a
/// [`Histogram`] in column-major order: all of partition 0's workers,
/// then all of partition 1's, and so on.
pub struct Offsets {
    worker_count: usize,
    partitions: usize,
    table: Vec<u64>,
    partition_start: Vec<u64>,
    partition_total: Vec<u64>,
}

impl Offsets {
    pub fn from_histogram(hist: &Histogram) -> Self {
        let worker_count = hist.worker_count();
        let partitions = hist.partitions();

        let mut partition_total = vec![0u64; partitions];
        for (p, total) in partition_total.iter_mut().enumerate() {
            *total = (0..worker_count).map(|t| hist.get(t, p)).sum();
        }

        let mut partition_start = vec![0u64; partitions];
        let mut acc = 0u64;
        for p in 0..partitions {
            partition_start[p] = acc;
            acc += partition_total[p];
        }

        let mut table = vec![0u64; worker_count * partitions];
        for p in 0..partitions {
            let mut acc = partition_start[p];
            for t in 0..worker_count {
                table[t * partitions + p] = acc;
                acc += hist.get(t, p);
            }
        }

        Offsets {
            worker_count,
            partitions,
            table,
            partition_start,
            partition_total,
        }
    }

    pub fn get(&self, t: usize, p: usize) -> u64 {
        self.table[t * self.partitions + p]
    }

    pub fn partition_total(&self, p: usize) -> u64 {
        self.partition_total[p]
    }

    /// Region-relative `[start, end)` for partition `p` within the output
    /// region this offset table was derived for.
    pub fn partition_range(&self, p: usize) -> Range<usize> {
        let start = self.partition_start[p] as usize;
        start..start + self.partition_total[p] as usize
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }
}

/// Runs one histogram + prefix-sum + scatter pass over `region`,
/// writing the rearranged tuples into `out_region` (same length as
/// `region`). Returns the region-relative boundaries of each of the
/// `fanout(bits)` resulting partitions.
///
/// Parallelism is realized by `pool`: each phase is one parallel-iterator
/// pass over the per-worker ranges, and the pass returning is the barrier —
/// no worker reads `Offsets` or writes `out_region` before the histogram
/// phase has fully finished, because `pool.install` only returns once every
/// item of the iteration has completed.
pub fn partition_one_pass(
    pool: &rayon::ThreadPool,
    region: &[Tuple],
    out_region: &mut [Tuple],
    lo: u32,
    bits: u32,
    worker_count: usize,
) -> Vec<Range<usize>> {
    let region_len = region.len();
    let partitions = fanout(bits);

    if region_len == 0 {
        return (0..partitions).map(|_| 0..0).collect();
    }

    let ranges = worker_ranges(region_len, worker_count.min(region_len));
    let t_count = ranges.len();

    // Phase: histogram. Each worker owns one row; no cross-thread writes.
    let mut rows: Vec<Vec<u64>> = vec![Vec::new(); t_count];
    pool.install(|| {
        use rayon::prelude::*;
        rows.par_iter_mut()
            .zip(ranges.par_iter())
            .for_each(|(row, r)| {
                *row = histogram::compute_worker_histogram(region, r.clone(), lo, bits);
            });
    });
    let hist = Histogram::from_rows(partitions, rows);
    debug_assert_eq!(hist.total(), region_len as u64);

    // Phase: prefix-sum. Computed on this thread; a parallel scan would
    // also be fine here, the rest of the pipeline doesn't care which.
    let offsets = Offsets::from_histogram(&hist);

    // Phase: scatter. Cursor tables seeded from each worker's column of
    // `O[t][*]` guarantee disjoint write ranges.
    let scatter_target = unsafe { ScatterSlice::new(out_region.as_mut_ptr(), region_len) };
    pool.install(|| {
        use rayon::prelude::*;
        ranges.par_iter().enumerate().for_each(|(t, r)| {
            let mut cursors: Vec<u64> = (0..partitions).map(|p| offsets.get(t, p)).collect();
            scatter::scatter_worker_range(region, r.clone(), lo, bits, &mut cursors, &scatter_target);
        });
    });

    (0..partitions).map(|p| offsets.partition_range(p)).collect()
}
