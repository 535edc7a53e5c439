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

//! Synthetic relation generators consumed by `join-ops`'s integration
//! tests and the `radix-join` benchmarking harness. Not an input to the
//! join engines themselves — `join-ops` has no dependency on this crate.

pub mod error;
pub mod relation;

pub use error::{Error, ErrorKind, Result};
pub use relation::{gen_attr, UniformRelation, ZipfRelation};
