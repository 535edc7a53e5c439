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

mod error;
mod measurement;

use std::path::PathBuf;

use datagen::{UniformRelation, ZipfRelation};
use join_ops::tuple::Tuple;
use join_ops::{NoPartitioningJoin, RadixHashJoin};
use structopt::clap::arg_enum;
use structopt::StructOpt;

use error::Result;
use measurement::data_point::DataPoint;
use measurement::harness;

arg_enum! {
    #[derive(Copy, Clone, Debug, PartialEq)]
    enum ArgAlgorithm {
        Npj,
        Prj,
    }
}

arg_enum! {
    #[derive(Copy, Clone, Debug, PartialEq)]
    enum ArgDistribution {
        Uniform,
        Zipf,
    }
}

#[derive(StructOpt)]
#[structopt(
    name = "radix-join",
    about = "Generates synthetic relations and benchmarks the no-partitioning or radix hash join"
)]
struct CmdOpt {
    /// Join algorithm to benchmark.
    #[structopt(
        long = "algorithm",
        default_value = "Prj",
        possible_values = &ArgAlgorithm::variants(),
        case_insensitive = true
    )]
    algorithm: ArgAlgorithm,

    /// Key distribution used to generate both relations.
    #[structopt(
        long = "distribution",
        default_value = "Uniform",
        possible_values = &ArgDistribution::variants(),
        case_insensitive = true
    )]
    distribution: ArgDistribution,

    /// Number of tuples in the left (build-candidate) relation.
    #[structopt(long = "left-len", default_value = "16777216")]
    left_len: usize,

    /// Number of tuples in the right (probe-candidate) relation.
    #[structopt(long = "right-len", default_value = "16777216")]
    right_len: usize,

    /// Smallest key value. Only used with `--distribution uniform`.
    #[structopt(long = "key-min", default_value = "1")]
    key_min: u64,

    /// Largest key value. Only used with `--distribution uniform`.
    #[structopt(long = "key-max", default_value = "4096")]
    key_max: u64,

    /// Zipfian domain size. Only used with `--distribution zipf`.
    #[structopt(long = "zipf-domain", default_value = "4096")]
    zipf_domain: u64,

    /// Zipfian skew exponent. Only used with `--distribution zipf`.
    #[structopt(long = "zipf-skew", default_value = "1.0")]
    zipf_skew: f64,

    /// Hash table size as a multiple of the build relation's length.
    #[structopt(long = "load-factor", default_value = "1.5")]
    load_factor: f64,

    /// Worker thread count. Ignored by the `npj` algorithm.
    #[structopt(long = "worker-count", default_value = "4")]
    worker_count: usize,

    /// Radix bits consumed per partitioning pass. Ignored by `npj`.
    #[structopt(long = "bits-per-pass", default_value = "8")]
    bits_per_pass: u32,

    /// Number of partitioning passes. Ignored by `npj`.
    #[structopt(long = "passes", default_value = "1")]
    passes: u32,

    /// Number of times to repeat the timed join.
    #[structopt(short = "r", long = "repeat", default_value = "30")]
    repeat: u32,

    /// Output filename for the measurement CSV. Prints to stderr if omitted.
    #[structopt(long = "csv", parse(from_os_str))]
    csv: Option<PathBuf>,
}

fn generate(distribution: ArgDistribution, len: usize, cmd: &CmdOpt) -> Result<Vec<Tuple>> {
    match distribution {
        ArgDistribution::Uniform => {
            let mut rel = UniformRelation::new(cmd.key_min, cmd.key_max, len)?;
            rel.build()?;
            Ok(rel.get_vec_copy()?)
        }
        ArgDistribution::Zipf => {
            let mut rel = ZipfRelation::new(cmd.zipf_domain, cmd.zipf_skew, len)?;
            rel.build()?;
            Ok(rel.get_vec_copy()?)
        }
    }
}

fn main() -> Result<()> {
    let cmd = CmdOpt::from_args();

    eprintln!(
        "generating relations: left={} right={} distribution={}",
        cmd.left_len, cmd.right_len, cmd.distribution
    );
    let left = generate(cmd.distribution, cmd.left_len, &cmd)?;
    let right = generate(cmd.distribution, cmd.right_len, &cmd)?;

    let template = DataPoint {
        algorithm: cmd.algorithm.to_string(),
        worker_count: cmd.worker_count,
        bits_per_pass: cmd.bits_per_pass,
        passes: cmd.passes,
        load_factor: cmd.load_factor,
        build_relation_len: left.len(),
        probe_relation_len: right.len(),
        ..Default::default()
    };

    let algorithm = cmd.algorithm;
    let load_factor = cmd.load_factor;
    let worker_count = cmd.worker_count;
    let bits_per_pass = cmd.bits_per_pass;
    let passes = cmd.passes;

    harness::measure("radix-join", cmd.repeat, cmd.csv.clone(), template, || {
        let result_count = match algorithm {
            ArgAlgorithm::Npj => {
                let mut join = NoPartitioningJoin::with_load_factor(&left, &right, load_factor)?;
                join.execute()?;
                join.get()?.len()
            }
            ArgAlgorithm::Prj => {
                let mut join =
                    RadixHashJoin::new(&left, &right, load_factor, worker_count, bits_per_pass, passes)?;
                join.execute()?;
                join.get()?.iter().map(|v| v.len()).sum()
            }
        };
        Ok(result_count)
    })?;

    Ok(())
}
