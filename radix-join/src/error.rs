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

//! Error type for the CLI harness: chains the two library crates' error
//! types plus the I/O-adjacent failures the harness itself can hit
//! (CSV writing, hostname lookup).

error_chain::error_chain! {
    links {
        JoinOps(join_ops::Error, join_ops::ErrorKind);
        Datagen(datagen::Error, datagen::ErrorKind);
    }

    foreign_links {
        Csv(csv::Error);
        Io(::std::io::Error);
    }
}
