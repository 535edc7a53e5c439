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

//! No-partitioning hash join: a single bucket-chained hash table built over
//! the smaller of the two input relations and probed with the other.

use crate::error::{ErrorKind, Result};
use crate::hash_table::HashTable;
use crate::tuple::{JoinTriple, Tuple};

const DEFAULT_LOAD_FACTOR: f64 = 1.5;

enum State {
    Constructed,
    Executed(Vec<JoinTriple>),
}

/// Single-threaded baseline join, used to validate [`crate::prj::RadixHashJoin`]
/// results against the same inputs.
///
/// The source this design is grounded on decides the build side at
/// construction time by swapping which `shared_ptr` is called "left" and
/// which is "right" — a self-assignment bug in that source leaves the swap
/// a no-op. This implementation sidesteps the bug class: `left` and `right`
/// never change identity. Instead, `execute()` compares lengths fresh each
/// time and builds on whichever side is smaller, tracking the choice only
/// as a local flag used to orient emitted triples.
pub struct NoPartitioningJoin<'a> {
    left: &'a [Tuple],
    right: &'a [Tuple],
    load_factor: f64,
    state: State,
}

impl<'a> NoPartitioningJoin<'a> {
    pub fn new(left: &'a [Tuple], right: &'a [Tuple]) -> Result<Self> {
        Self::with_load_factor(left, right, DEFAULT_LOAD_FACTOR)
    }

    pub fn with_load_factor(left: &'a [Tuple], right: &'a [Tuple], load_factor: f64) -> Result<Self> {
        if !(load_factor > 0.0) {
            return Err(ErrorKind::Precondition("load_factor must be > 0".into()).into());
        }
        Ok(NoPartitioningJoin {
            left,
            right,
            load_factor,
            state: State::Constructed,
        })
    }

    /// Runs build+probe once. Calling this a second time is a precondition
    /// violation.
    pub fn execute(&mut self) -> Result<()> {
        if !matches!(self.state, State::Constructed) {
            return Err(ErrorKind::Precondition("execute() called twice".into()).into());
        }

        let build_is_left = self.left.len() <= self.right.len();
        let (build, probe) = if build_is_left {
            (self.left, self.right)
        } else {
            (self.right, self.left)
        };

        let result = if build.is_empty() {
            Vec::new()
        } else {
            let bucket_count = bucket_count_for(build.len(), self.load_factor)?;
            let mut table = HashTable::new(bucket_count)?;
            for &t in build {
                table.insert(t);
            }

            let mut result = Vec::new();
            for &t in probe {
                table.probe_into(t, build_is_left, &mut result);
            }
            result
        };

        self.state = State::Executed(result);
        Ok(())
    }

    /// Returns the accumulated result triples. Fails if `execute()` has not
    /// yet completed.
    pub fn get(&self) -> Result<&[JoinTriple]> {
        match &self.state {
            State::Constructed => {
                Err(ErrorKind::Precondition("get() called before execute()".into()).into())
            }
            State::Executed(triples) => Ok(triples),
        }
    }
}

/// `ceil(load_factor * build_len)`, validated to fit a `u64` bucket count.
pub(crate) fn bucket_count_for(build_len: usize, load_factor: f64) -> Result<u64> {
    let raw = (build_len as f64) * load_factor;
    if !raw.is_finite() || raw > u64::MAX as f64 {
        return Err(ErrorKind::Overflow("bucket count exceeds addressable range".into()).into());
    }
    Ok(raw.ceil().max(1.0) as u64)
}
