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

//! The record types shared by both join engines.

/// A single (key, row-id) record. `value` is the join key, `rid` is an
/// opaque identifier carried through to the result untouched.
///
/// Packed as two contiguous 64-bit little-endian integers, 16 bytes per
/// tuple, matching the in-memory wire format this crate's callers assume.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tuple {
    pub value: u64,
    pub rid: u64,
}

impl Tuple {
    pub fn new(value: u64, rid: u64) -> Self {
        Tuple { value, rid }
    }
}

/// One matched pair: the shared key plus both sides' row-ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct JoinTriple {
    pub value: u64,
    pub left_rid: u64,
    pub right_rid: u64,
}

impl JoinTriple {
    pub fn new(value: u64, left_rid: u64, right_rid: u64) -> Self {
        JoinTriple {
            value,
            left_rid,
            right_rid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_is_16_bytes() {
        assert_eq!(std::mem::size_of::<Tuple>(), 16);
    }

    #[test]
    fn tuple_construction() {
        let t = Tuple::new(42, 7);
        assert_eq!(t.value, 42);
        assert_eq!(t.rid, 7);
    }
}
