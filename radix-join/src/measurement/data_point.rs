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

//! One CSV row of measurement output, modeled on the teacher harness's
//! `DataPoint` — a flat, `Serialize`-able struct with one field per
//! benchmark dimension plus the observed outcome.

use serde::Serialize;

#[derive(Clone, Debug, Default, Serialize)]
pub struct DataPoint {
    pub hostname: String,
    pub algorithm: String,
    pub worker_count: usize,
    pub bits_per_pass: u32,
    pub passes: u32,
    pub load_factor: f64,
    pub build_relation_len: usize,
    pub probe_relation_len: usize,
    pub run: u32,
    pub result_count: usize,
    pub ns: u128,
}

impl DataPoint {
    /// Copies the per-run outcome fields from `other` onto a clone of
    /// `self`, leaving the benchmark-configuration fields (hostname,
    /// algorithm, worker_count, ...) untouched. Used to merge a shared
    /// configuration template with each repetition's timing.
    pub fn merged_with(&self, other: &DataPoint) -> DataPoint {
        DataPoint {
            run: other.run,
            result_count: other.result_count,
            ns: other.ns,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    /// A fixed configuration template, built once and shared by every
    /// case below, the way a real harness run builds one template per
    /// `CmdOpt` and merges a fresh outcome into it every repetition.
    static TEMPLATE: Lazy<DataPoint> = Lazy::new(|| DataPoint {
        hostname: "bench-host".into(),
        algorithm: "Prj".into(),
        worker_count: 4,
        bits_per_pass: 8,
        passes: 1,
        load_factor: 1.5,
        build_relation_len: 1000,
        probe_relation_len: 1000,
        ..Default::default()
    });

    #[test]
    fn merge_keeps_configuration_and_overwrites_outcome() {
        let outcome = DataPoint {
            run: 3,
            result_count: 42,
            ns: 123_456,
            ..Default::default()
        };

        let merged = TEMPLATE.merged_with(&outcome);

        assert_eq!(merged.hostname, TEMPLATE.hostname);
        assert_eq!(merged.algorithm, TEMPLATE.algorithm);
        assert_eq!(merged.worker_count, TEMPLATE.worker_count);
        assert_eq!(merged.run, 3);
        assert_eq!(merged.result_count, 42);
        assert_eq!(merged.ns, 123_456);
    }
}
