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

//! Relation generators grounded in the `uniform_generator` and
//! `zipf_generator` fixtures of the source this crate's callers were
//! distilled from: construction only records parameters, `build()`
//! performs the sampling, and `get()` / `get_vec_copy()` read back the
//! materialized tuples. `rid` is always the dense `0..count` sequence,
//! matching the row-id convention those fixtures use.

use join_ops::tuple::Tuple;
use rand::distributions::Uniform;
use rand::prelude::*;
use rand_distr::Zipf;

use crate::error::{ErrorKind, Result};

/// Fills `out` with `out.len()` keys drawn uniformly from `[min, max]`
/// inclusive. The shared batch-generation entry point referenced by both
/// [`UniformRelation`] and ad-hoc callers (e.g. the `radix-join` harness)
/// that only need a raw key attribute, not a full tuple relation.
pub fn gen_attr(out: &mut [u64], min: u64, max: u64) -> Result<()> {
    if min > max {
        return Err(ErrorKind::InvalidParameters(format!("min ({}) > max ({})", min, max)).into());
    }
    let dist = Uniform::new_inclusive(min, max);
    let mut rng = thread_rng();
    for slot in out.iter_mut() {
        *slot = dist.sample(&mut rng);
    }
    Ok(())
}

/// A relation whose keys are drawn uniformly from `[min, max]` inclusive.
pub struct UniformRelation {
    min: u64,
    max: u64,
    count: usize,
    tuples: Option<Vec<Tuple>>,
}

impl UniformRelation {
    pub fn new(min: u64, max: u64, count: usize) -> Result<Self> {
        if min > max {
            return Err(ErrorKind::InvalidParameters(format!("min ({}) > max ({})", min, max)).into());
        }
        Ok(UniformRelation {
            min,
            max,
            count,
            tuples: None,
        })
    }

    /// Samples `count` tuples, overwriting any previously built result.
    /// Calling `build()` again re-samples: it is not idempotent, matching
    /// the source fixtures, which re-`build()` the same generator to
    /// obtain a second, independently-sampled relation.
    pub fn build(&mut self) -> Result<()> {
        let mut values = vec![0u64; self.count];
        gen_attr(&mut values, self.min, self.max)?;
        let tuples = values
            .into_iter()
            .enumerate()
            .map(|(rid, value)| Tuple::new(value, rid as u64))
            .collect();
        self.tuples = Some(tuples);
        Ok(())
    }

    pub fn get(&self) -> Result<&[Tuple]> {
        self.tuples
            .as_deref()
            .ok_or_else(|| ErrorKind::NotBuilt("call build() before get()".into()).into())
    }

    pub fn get_vec_copy(&self) -> Result<Vec<Tuple>> {
        self.get().map(|t| t.to_vec())
    }

    pub fn get_count(&self) -> usize {
        self.count
    }
}

/// A relation whose keys are drawn from a Zipfian distribution over the
/// domain `[1, domain]`, with skew exponent `skew`. Grounded in the
/// `zipf_generator(domain, skew, count)` contract.
pub struct ZipfRelation {
    domain: u64,
    skew: f64,
    count: usize,
    tuples: Option<Vec<Tuple>>,
}

impl ZipfRelation {
    pub fn new(domain: u64, skew: f64, count: usize) -> Result<Self> {
        if domain == 0 {
            return Err(ErrorKind::InvalidParameters("domain must be positive".into()).into());
        }
        if !(skew > 0.0) {
            return Err(ErrorKind::InvalidParameters("skew must be > 0".into()).into());
        }
        Ok(ZipfRelation {
            domain,
            skew,
            count,
            tuples: None,
        })
    }

    pub fn build(&mut self) -> Result<()> {
        let dist = Zipf::new(self.domain, self.skew)
            .map_err(|e| ErrorKind::InvalidParameters(format!("invalid zipf parameters: {}", e)))?;
        let mut rng = thread_rng();
        let tuples = (0..self.count)
            .map(|rid| {
                let rank: f64 = dist.sample(&mut rng);
                Tuple::new(rank as u64, rid as u64)
            })
            .collect();
        self.tuples = Some(tuples);
        Ok(())
    }

    pub fn get(&self) -> Result<&[Tuple]> {
        self.tuples
            .as_deref()
            .ok_or_else(|| ErrorKind::NotBuilt("call build() before get()".into()).into())
    }

    pub fn get_vec_copy(&self) -> Result<Vec<Tuple>> {
        self.get().map(|t| t.to_vec())
    }

    pub fn get_count(&self) -> usize {
        self.count
    }
}
