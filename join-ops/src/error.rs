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

//! Error taxonomy for the join engines.
//!
//! Three kinds of failure are distinguished: a caller misusing the API
//! (`Precondition`), running out of memory (`Resource`), and a configuration
//! that would overflow the addressable range of a partition or buffer
//! (`Overflow`). All three are deterministic functions of inputs and
//! configuration; there is no retry path.

error_chain::error_chain! {
    errors {
        /// `get()` called before `execute()`, `execute()` called more than
        /// once, or invalid engine configuration (non-positive worker
        /// count, `bits_per_pass * passes > 63`, `load_factor <= 0`).
        Precondition(msg: String) {
            description("precondition violation")
            display("precondition violation: {}", msg)
        }
        /// Allocation of a hash table or partition buffer failed.
        Resource(msg: String) {
            description("resource allocation failure")
            display("resource allocation failure: {}", msg)
        }
        /// A partition count or buffer size would exceed the addressable
        /// range of the target platform.
        Overflow(msg: String) {
            description("overflow")
            display("overflow: {}", msg)
        }
    }
}
