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

//! Error taxonomy for relation generators, mirroring `join_ops::error`'s
//! shape so callers chaining both crates' errors see one consistent style.

error_chain::error_chain! {
    errors {
        /// Invalid generator parameters: `min > max`, a zero-size domain,
        /// or a non-positive skew exponent.
        InvalidParameters(msg: String) {
            description("invalid generator parameters")
            display("invalid generator parameters: {}", msg)
        }
        /// `get()` / `get_vec_copy()` called before `build()`.
        NotBuilt(msg: String) {
            description("generator has not been built")
            display("generator has not been built: {}", msg)
        }
    }
}
