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

//! Bucket-chained hash table shared by the no-partitioning join engine and
//! by each per-partition build/probe pair of the radix join engine.
//!
//! Each bucket stores up to two tuples inline; a third and further tuples
//! are appended to an overflow chain. The source this design is grounded on
//! represents the chain as a `unique_ptr<overflow>` linked list, one heap
//! allocation per node. This implementation instead arena-indexes the
//! overflow nodes in a single `Vec`, so the whole table is two flat
//! allocations (buckets + overflow arena) and dropping it never recurses.

use crate::error::{ErrorKind, Result};
use crate::tuple::{JoinTriple, Tuple};

const NIL: u32 = u32::MAX;

#[derive(Clone, Copy, Default)]
struct Bucket {
    count: u32,
    t1: Tuple,
    t2: Tuple,
    /// Index into `overflow`, or `NIL` if the chain is empty.
    head: u32,
}

#[derive(Clone, Copy)]
struct OverflowNode {
    tuple: Tuple,
    /// Index of the next node in the chain, or `NIL`.
    next: u32,
}

/// A fixed-size bucket-chained hash table over `u64` keys, built once via
/// repeated [`HashTable::insert`] and then probed any number of times via
/// [`HashTable::probe_into`].
pub struct HashTable {
    buckets: Vec<Bucket>,
    overflow: Vec<OverflowNode>,
    modulus: u64,
}

impl HashTable {
    /// Allocates `bucket_count` zero-initialized buckets. `bucket_count`
    /// must be positive; it is the caller's responsibility to size it as
    /// `ceil(load_factor * build_side_len)`.
    pub fn new(bucket_count: u64) -> Result<Self> {
        if bucket_count == 0 {
            return Err(ErrorKind::Precondition("bucket_count must be positive".into()).into());
        }
        let n = usize::try_from(bucket_count)
            .map_err(|_| ErrorKind::Overflow("bucket_count exceeds addressable range".into()))?;
        Ok(HashTable {
            buckets: vec![Bucket::default(); n],
            overflow: Vec::new(),
            modulus: bucket_count,
        })
    }

    /// Inserts one build-side tuple, hashing by `value mod bucket_count`.
    pub fn insert(&mut self, t: Tuple) {
        let index = (t.value % self.modulus) as usize;
        let bucket = &mut self.buckets[index];
        match bucket.count {
            0 => bucket.t1 = t,
            1 => bucket.t2 = t,
            _ => {
                let node_index = self.overflow.len() as u32;
                self.overflow.push(OverflowNode {
                    tuple: t,
                    next: NIL,
                });
                if bucket.count == 2 {
                    bucket.head = node_index;
                } else {
                    // Walk to the current tail and link the new node on.
                    let mut cursor = bucket.head;
                    loop {
                        let next = self.overflow[cursor as usize].next;
                        if next == NIL {
                            break;
                        }
                        cursor = next;
                    }
                    self.overflow[cursor as usize].next = node_index;
                }
            }
        }
        bucket.count += 1;
    }

    /// Probes one probe-side tuple against its bucket, appending one
    /// [`JoinTriple`] to `out` for every stored tuple with a matching key.
    /// Emission order matches the chain walk order: overflow nodes first,
    /// then the second inline slot, then the first.
    ///
    /// The table does not know whether it was built from the caller's
    /// logical left or right relation, so `build_is_left` selects which
    /// side of the emitted triple the stored tuple's row-id fills.
    pub fn probe_into(&self, probe: Tuple, build_is_left: bool, out: &mut Vec<JoinTriple>) {
        let index = (probe.value % self.modulus) as usize;
        let bucket = &self.buckets[index];

        let mut emit = |stored: Tuple| {
            let triple = if build_is_left {
                JoinTriple::new(stored.value, stored.rid, probe.rid)
            } else {
                JoinTriple::new(stored.value, probe.rid, stored.rid)
            };
            out.push(triple);
        };

        if bucket.count > 2 {
            let mut cursor = bucket.head;
            while cursor != NIL {
                let node = &self.overflow[cursor as usize];
                if node.tuple.value == probe.value {
                    emit(node.tuple);
                }
                cursor = node.next;
            }
        }
        if bucket.count > 1 && bucket.t2.value == probe.value {
            emit(bucket.t2);
        }
        if bucket.count > 0 && bucket.t1.value == probe.value {
            emit(bucket.t1);
        }
    }

    pub fn bucket_count(&self) -> u64 {
        self.modulus
    }
}
