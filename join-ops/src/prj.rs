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

//! Parallel radix hash join, orchestrating the histogram/prefix-sum/scatter
//! pipeline in [`crate::partition`]: partitions both relations by the low
//! `bits_per_pass * passes` bits of their key over `passes` successive
//! passes, then runs an independent NPJ-style build/probe per matched
//! partition pair, distributed across a fixed worker pool.

use std::ops::Range;

use crate::error::{ErrorKind, Result};
use crate::hash_table::HashTable;
use crate::npj::bucket_count_for;
use crate::partition::{fanout, partition_one_pass};
use crate::tuple::{JoinTriple, Tuple};

enum State {
    Constructed,
    Executed(Vec<Vec<JoinTriple>>),
}

/// Cache-conscious parallel radix hash join.
///
/// Configuration (`worker_count`, `bits_per_pass`, `passes`) only changes
/// how the work is scheduled and how the keyspace is carved up; the result
/// multiset does not depend on it.
pub struct RadixHashJoin<'a> {
    left: &'a [Tuple],
    right: &'a [Tuple],
    load_factor: f64,
    worker_count: usize,
    bits_per_pass: u32,
    passes: u32,
    state: State,
}

impl<'a> RadixHashJoin<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        left: &'a [Tuple],
        right: &'a [Tuple],
        load_factor: f64,
        worker_count: usize,
        bits_per_pass: u32,
        passes: u32,
    ) -> Result<Self> {
        if worker_count == 0 {
            return Err(ErrorKind::Precondition("worker_count must be positive".into()).into());
        }
        if bits_per_pass == 0 {
            return Err(ErrorKind::Precondition("bits_per_pass must be positive".into()).into());
        }
        if passes == 0 {
            return Err(ErrorKind::Precondition("passes must be positive".into()).into());
        }
        match (bits_per_pass as u64).checked_mul(passes as u64) {
            Some(total) if total <= 63 => {}
            _ => {
                return Err(
                    ErrorKind::Precondition("bits_per_pass * passes must be <= 63".into()).into(),
                )
            }
        }
        if !(load_factor > 0.0) {
            return Err(ErrorKind::Precondition("load_factor must be > 0".into()).into());
        }

        Ok(RadixHashJoin {
            left,
            right,
            load_factor,
            worker_count,
            bits_per_pass,
            passes,
            state: State::Constructed,
        })
    }

    /// Runs the full partition + build/probe pipeline once.
    pub fn execute(&mut self) -> Result<()> {
        if !matches!(self.state, State::Constructed) {
            return Err(ErrorKind::Precondition("execute() called twice".into()).into());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_count)
            .build()
            .map_err(|e| ErrorKind::Resource(format!("failed to build worker pool: {}", e)))?;

        let (left_buf, left_ranges) =
            partition_relation(&pool, self.left, self.bits_per_pass, self.passes, self.worker_count);
        let (right_buf, right_ranges) = partition_relation(
            &pool,
            self.right,
            self.bits_per_pass,
            self.passes,
            self.worker_count,
        );

        let partitions = fanout(self.bits_per_pass * self.passes);
        debug_assert_eq!(left_ranges.len(), partitions);
        debug_assert_eq!(right_ranges.len(), partitions);

        let load_factor = self.load_factor;
        let per_partition: Result<Vec<Vec<JoinTriple>>> = pool.install(|| {
            use rayon::prelude::*;
            (0..partitions)
                .into_par_iter()
                .map(|p| {
                    let l = &left_buf[left_ranges[p].clone()];
                    let r = &right_buf[right_ranges[p].clone()];
                    join_one_partition(l, r, load_factor)
                })
                .collect()
        });
        let per_partition = per_partition?;

        // Phase 9 (gather): round-robin partitions onto worker result
        // lists. No merge is required by the contract — callers sum sizes.
        let mut per_worker: Vec<Vec<JoinTriple>> = vec![Vec::new(); self.worker_count];
        for (p, triples) in per_partition.into_iter().enumerate() {
            per_worker[p % self.worker_count].extend(triples);
        }

        self.state = State::Executed(per_worker);
        Ok(())
    }

    /// Returns one result sequence per worker. Fails if `execute()` has not
    /// yet completed.
    pub fn get(&self) -> Result<&[Vec<JoinTriple>]> {
        match &self.state {
            State::Constructed => {
                Err(ErrorKind::Precondition("get() called before execute()".into()).into())
            }
            State::Executed(per_worker) => Ok(per_worker),
        }
    }
}

/// Applies `passes` successive radix partitioning rounds to `input`,
/// `bits_per_pass` bits at a time, starting at bit 0 and advancing by
/// `bits_per_pass` each pass. Passes are a fixed configured count — no
/// partition is exempted or recursed on based on its size.
fn partition_relation(
    pool: &rayon::ThreadPool,
    input: &[Tuple],
    bits_per_pass: u32,
    passes: u32,
    worker_count: usize,
) -> (Vec<Tuple>, Vec<Range<usize>>) {
    let mut current = input.to_vec();
    let mut ranges: Vec<Range<usize>> = vec![0..current.len()];

    for pass in 0..passes {
        let lo = pass * bits_per_pass;
        let mut next = vec![Tuple::default(); current.len()];
        let mut next_ranges = Vec::with_capacity(ranges.len() * fanout(bits_per_pass));

        for region in &ranges {
            let sub = partition_one_pass(
                pool,
                &current[region.clone()],
                &mut next[region.clone()],
                lo,
                bits_per_pass,
                worker_count,
            );
            for s in sub {
                next_ranges.push((region.start + s.start)..(region.start + s.end));
            }
        }

        current = next;
        ranges = next_ranges;
    }

    (current, ranges)
}

/// Independent NPJ-style build/probe over one matched partition pair:
/// build side chosen by comparing partition sizes, table sized
/// `ceil(load_factor * |build|)`.
fn join_one_partition(left: &[Tuple], right: &[Tuple], load_factor: f64) -> Result<Vec<JoinTriple>> {
    if left.is_empty() || right.is_empty() {
        return Ok(Vec::new());
    }

    let build_is_left = left.len() <= right.len();
    let (build, probe) = if build_is_left { (left, right) } else { (right, left) };

    let bucket_count = bucket_count_for(build.len(), load_factor)?;
    let mut table = HashTable::new(bucket_count)?;
    for &t in build {
        table.insert(t);
    }

    let mut out = Vec::new();
    for &t in probe {
        table.probe_into(t, build_is_left, &mut out);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npj::NoPartitioningJoin;

    fn keyed(values: &[u64]) -> Vec<Tuple> {
        values
            .iter()
            .enumerate()
            .map(|(rid, &v)| Tuple::new(v, rid as u64))
            .collect()
    }

    fn flatten(per_worker: &[Vec<JoinTriple>]) -> Vec<JoinTriple> {
        per_worker.iter().flatten().copied().collect()
    }

    fn multiset_eq(a: &mut [JoinTriple], b: &mut [JoinTriple]) -> bool {
        let key = |t: &JoinTriple| (t.value, t.left_rid, t.right_rid);
        a.sort_by_key(key);
        b.sort_by_key(key);
        a == b
    }

    #[test]
    fn rejects_invalid_configuration() {
        let left = keyed(&[1]);
        let right = keyed(&[1]);
        assert!(RadixHashJoin::new(&left, &right, 1.5, 0, 4, 1).is_err());
        assert!(RadixHashJoin::new(&left, &right, 1.5, 2, 0, 1).is_err());
        assert!(RadixHashJoin::new(&left, &right, 1.5, 2, 4, 0).is_err());
        assert!(RadixHashJoin::new(&left, &right, 1.5, 2, 32, 2).is_err()); // 64 > 63
        assert!(RadixHashJoin::new(&left, &right, 0.0, 2, 4, 1).is_err());
    }

    #[test]
    fn get_before_execute_is_precondition_error() {
        let left = keyed(&[1]);
        let right = keyed(&[1]);
        let join = RadixHashJoin::new(&left, &right, 1.5, 2, 4, 1).unwrap();
        assert!(join.get().is_err());
    }

    #[test]
    fn double_execute_is_precondition_error() {
        let left = keyed(&[1]);
        let right = keyed(&[1]);
        let mut join = RadixHashJoin::new(&left, &right, 1.5, 2, 4, 1).unwrap();
        join.execute().unwrap();
        assert!(join.execute().is_err());
    }

    #[test]
    fn full_cross_single_pass() {
        let left: Vec<Tuple> = (0..200).map(|i| Tuple::new(1, i)).collect();
        let right: Vec<Tuple> = (0..200).map(|i| Tuple::new(1, i)).collect();
        let mut join = RadixHashJoin::new(&left, &right, 1.5, 4, 3, 1).unwrap();
        join.execute().unwrap();
        let total: usize = join.get().unwrap().iter().map(|v| v.len()).sum();
        assert_eq!(total, 40_000);
    }

    #[test]
    fn single_thread_equals_npj() {
        let left: Vec<Tuple> = (0..5000u64).map(|i| Tuple::new(i % 97, i)).collect();
        let right: Vec<Tuple> = (0..3000u64).map(|i| Tuple::new((i * 3) % 97, i)).collect();

        let mut npj = NoPartitioningJoin::new(&left, &right).unwrap();
        npj.execute().unwrap();
        let mut npj_result: Vec<JoinTriple> = npj.get().unwrap().to_vec();

        let mut prj = RadixHashJoin::new(&left, &right, 1.5, 1, 8, 1).unwrap();
        prj.execute().unwrap();
        let mut prj_result = flatten(prj.get().unwrap());

        assert!(multiset_eq(&mut npj_result, &mut prj_result));
    }

    #[test]
    fn configuration_invariance_across_worker_count_and_passes() {
        let left: Vec<Tuple> = (0..4000u64).map(|i| Tuple::new(i % 250, i)).collect();
        let right: Vec<Tuple> = (0..2500u64).map(|i| Tuple::new((i * 7) % 250, i)).collect();

        let configs: [(usize, u32, u32); 4] = [(1, 8, 1), (2, 4, 2), (3, 3, 2), (4, 2, 3)];
        let mut reference: Option<Vec<JoinTriple>> = None;

        for (workers, bits, passes) in configs {
            let mut join = RadixHashJoin::new(&left, &right, 1.5, workers, bits, passes).unwrap();
            join.execute().unwrap();
            let mut result = flatten(join.get().unwrap());
            result.sort_by_key(|t| (t.value, t.left_rid, t.right_rid));

            match &reference {
                None => reference = Some(result),
                Some(r) => assert_eq!(r, &result, "mismatch at workers={workers} bits={bits} passes={passes}"),
            }
        }
    }

    #[test]
    fn soundness_holds_after_partitioning() {
        let left = keyed(&[1, 2, 2, 5, 130, 130]);
        let right = keyed(&[2, 5, 5, 130, 999]);
        let mut join = RadixHashJoin::new(&left, &right, 1.5, 3, 4, 2).unwrap();
        join.execute().unwrap();
        for triple in flatten(join.get().unwrap()) {
            let l = left
                .iter()
                .any(|l| l.value == triple.value && l.rid == triple.left_rid);
            let r = right
                .iter()
                .any(|r| r.value == triple.value && r.rid == triple.right_rid);
            assert!(l && r, "unsound triple {:?}", triple);
        }
    }
}
