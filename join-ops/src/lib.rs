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

//! In-memory equi-join kernels over (key, row-id) tuples.
//!
//! Two engines share the same bucket-chained [`hash_table::HashTable`]:
//!
//! - [`npj::NoPartitioningJoin`]: single-threaded build/probe over the
//!   smaller relation. Used standalone and as the per-partition worker of
//!   the radix join below.
//! - [`prj::RadixHashJoin`]: partitions both relations by the low bits of
//!   their key across a fixed worker pool (`partition` module), then runs
//!   an independent no-partitioning join per matched partition pair.
//!
//! This crate has no I/O, no CLI, and no input generators: those live in
//! the sibling `datagen` and `radix-join` crates.

pub mod error;
pub mod hash_table;
pub mod npj;
pub mod partition;
pub mod prj;
pub mod tuple;

pub use error::{Error, ErrorKind, Result};
pub use npj::NoPartitioningJoin;
pub use prj::RadixHashJoin;
pub use tuple::{JoinTriple, Tuple};
