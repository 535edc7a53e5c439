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

//! Repeats a benchmarked closure `repeat` times and reports each run as a
//! [`DataPoint`], either as a CSV row (`--csv <path>`) or as a plain
//! `eprintln!` line when no output path was given — matching the teacher
//! harness's own CSV-row-or-nothing reporting style rather than a tracing
//! framework (see `join-ops`'s design notes on logging).

use std::path::PathBuf;
use std::time::Instant;

use crate::error::Result;
use crate::measurement::data_point::DataPoint;

/// Runs `run_once` `repeat` times, merging each run's outcome into a copy
/// of `template` and either serializing it as a CSV row or printing it.
///
/// `run_once` returns the number of result triples produced; the harness
/// itself measures elapsed wall-clock time around the call, so kernels
/// under test never need to know they are being timed.
pub fn measure<F>(name: &str, repeat: u32, csv_path: Option<PathBuf>, mut template: DataPoint, mut run_once: F) -> Result<()>
where
    F: FnMut() -> Result<usize>,
{
    template.hostname = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());

    let mut writer = match csv_path {
        Some(path) => Some(csv::Writer::from_path(path)?),
        None => None,
    };

    for run in 0..repeat {
        let start = Instant::now();
        let result_count = run_once()?;
        let elapsed = start.elapsed();

        let point = template.merged_with(&DataPoint {
            run,
            result_count,
            ns: elapsed.as_nanos(),
            ..Default::default()
        });

        match &mut writer {
            Some(w) => w.serialize(&point)?,
            None => eprintln!(
                "{name}: run {run}/{repeat} -> {result_count} results in {elapsed:?}",
                name = name,
                run = run + 1,
                repeat = repeat,
                result_count = result_count,
                elapsed = elapsed
            ),
        }
    }

    if let Some(w) = &mut writer {
        w.flush()?;
    }

    Ok(())
}
