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

//! Contention-free parallel scatter writes.
//!
//! The only unsafe code in this crate lives here. Every worker holds a
//! [`ScatterSlice`] pointing at the same output buffer; correctness rests
//! entirely on the write-offset disjointness established by
//! [`super::Offsets`] — each worker's cursor table is seeded from its own
//! column of `O[t][p]` and only ever advances, so two workers never write
//! the same index.

use std::ops::Range;

use super::histogram::partition_of;
use crate::tuple::Tuple;

/// A raw pointer to a shared output buffer, handed to every scatter worker.
///
/// Safety is established by the caller: the set of indices any worker will
/// write to must be disjoint from every other worker's set for the
/// lifetime of the `ScatterSlice`. [`super::partition_one_pass`] is the only
/// caller and derives each worker's cursor table from [`super::Offsets`],
/// which guarantees exactly this.
pub struct ScatterSlice {
    ptr: *mut Tuple,
    len: usize,
}

// SAFETY: see module and struct docs — disjoint-write discipline is
// enforced by the sole caller, not by this type.
unsafe impl Send for ScatterSlice {}
unsafe impl Sync for ScatterSlice {}

impl ScatterSlice {
    /// `ptr` must be valid for `len` writes of `Tuple` for the lifetime of
    /// the returned value, and no two workers sharing this `ScatterSlice`
    /// may ever write the same index concurrently.
    pub unsafe fn new(ptr: *mut Tuple, len: usize) -> Self {
        ScatterSlice { ptr, len }
    }

    fn write(&self, index: usize, value: Tuple) {
        debug_assert!(index < self.len, "scatter index {} out of bounds {}", index, self.len);
        // SAFETY: disjointness is the caller's invariant (struct docs).
        unsafe {
            std::ptr::write(self.ptr.add(index), value);
        }
    }
}

/// One worker's scatter pass: for every tuple in `region[range]`, compute
/// its partition and write it to `target[cursors[partition]]`, advancing
/// that partition's cursor. `cursors` must be initialized from this
/// worker's column of `O[t][*]`.
pub fn scatter_worker_range(
    region: &[Tuple],
    range: Range<usize>,
    lo: u32,
    bits: u32,
    cursors: &mut [u64],
    target: &ScatterSlice,
) {
    for &t in &region[range] {
        let p = partition_of(t.value, lo, bits);
        let index = cursors[p] as usize;
        target.write(index, t);
        cursors[p] += 1;
    }
}
