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

//! Scenario-level checks and the quantified invariants (completeness,
//! soundness, equivalence, configuration invariance) driven over generated
//! relations rather than hand-written fixtures.

use datagen::{UniformRelation, ZipfRelation};
use join_ops::tuple::JoinTriple;
use join_ops::{NoPartitioningJoin, RadixHashJoin};

fn multiset_eq(a: &mut [JoinTriple], b: &mut [JoinTriple]) -> bool {
    let key = |t: &JoinTriple| (t.value, t.left_rid, t.right_rid);
    a.sort_by_key(key);
    b.sort_by_key(key);
    a == b
}

fn flatten(per_worker: &[Vec<JoinTriple>]) -> Vec<JoinTriple> {
    per_worker.iter().flatten().copied().collect()
}

#[test]
fn disjoint_domains_yield_no_matches() {
    let mut left = UniformRelation::new(0, 10_000, 1000).unwrap();
    left.build().unwrap();
    let mut right = UniformRelation::new(20_000, 30_000, 1000).unwrap();
    right.build().unwrap();

    let mut npj = NoPartitioningJoin::new(left.get().unwrap(), right.get().unwrap()).unwrap();
    npj.execute().unwrap();
    assert_eq!(npj.get().unwrap().len(), 0);
}

#[test]
fn uniform_statistical_within_tolerance() {
    let count = 1usize << 17;
    let domain_max = 1u64 << 12;

    let mut left = UniformRelation::new(1, domain_max, count).unwrap();
    left.build().unwrap();
    let mut right = UniformRelation::new(1, domain_max, count).unwrap();
    right.build().unwrap();

    let mut npj = NoPartitioningJoin::new(left.get().unwrap(), right.get().unwrap()).unwrap();
    npj.execute().unwrap();
    let actual = npj.get().unwrap().len();

    let expected = (domain_max as f64) * ((count as f64) / (domain_max as f64)).powi(2);
    let tolerance = expected * 0.05;
    assert!(
        (actual as f64 - expected).abs() <= tolerance,
        "actual={actual} expected={expected} tolerance={tolerance}"
    );
}

#[test]
fn precondition_before_execute() {
    let mut left = UniformRelation::new(0, 10, 10).unwrap();
    left.build().unwrap();
    let join = NoPartitioningJoin::new(left.get().unwrap(), left.get().unwrap()).unwrap();
    assert!(join.get().is_err());
}

#[test]
fn prj_single_thread_equals_npj_on_generated_input() {
    let count = 1usize << 17;
    let domain_max = 1u64 << 12;

    let mut left = UniformRelation::new(1, domain_max, count).unwrap();
    left.build().unwrap();
    let mut right = UniformRelation::new(1, domain_max, count).unwrap();
    right.build().unwrap();

    let mut npj = NoPartitioningJoin::new(left.get().unwrap(), right.get().unwrap()).unwrap();
    npj.execute().unwrap();
    let mut npj_result = npj.get().unwrap().to_vec();

    let mut prj = RadixHashJoin::new(left.get().unwrap(), right.get().unwrap(), 1.5, 1, 8, 1).unwrap();
    prj.execute().unwrap();
    let mut prj_result = flatten(prj.get().unwrap());

    assert!(multiset_eq(&mut npj_result, &mut prj_result));
}

#[test]
fn completeness_over_zipfian_relations() {
    let count = 5000usize;
    let mut left = ZipfRelation::new(200, 1.0, count).unwrap();
    left.build().unwrap();
    let mut right = ZipfRelation::new(200, 1.0, count).unwrap();
    right.build().unwrap();

    let left_tuples = left.get().unwrap();
    let right_tuples = right.get().unwrap();

    let mut npj = NoPartitioningJoin::new(left_tuples, right_tuples).unwrap();
    npj.execute().unwrap();
    let result = npj.get().unwrap();

    let mut expected: u64 = 0;
    for k in 1..=200u64 {
        let l = left_tuples.iter().filter(|t| t.value == k).count() as u64;
        let r = right_tuples.iter().filter(|t| t.value == k).count() as u64;
        expected += l * r;
    }
    assert_eq!(result.len() as u64, expected);
}

#[test]
fn soundness_over_zipfian_relations() {
    let count = 2000usize;
    let mut left = ZipfRelation::new(100, 0.8, count).unwrap();
    left.build().unwrap();
    let mut right = ZipfRelation::new(100, 0.8, count).unwrap();
    right.build().unwrap();

    let left_tuples = left.get().unwrap();
    let right_tuples = right.get().unwrap();

    let mut join = RadixHashJoin::new(left_tuples, right_tuples, 1.5, 4, 4, 2).unwrap();
    join.execute().unwrap();

    for triple in flatten(join.get().unwrap()) {
        let l = left_tuples
            .iter()
            .any(|t| t.value == triple.value && t.rid == triple.left_rid);
        let r = right_tuples
            .iter()
            .any(|t| t.value == triple.value && t.rid == triple.right_rid);
        assert!(l && r, "unsound triple {:?}", triple);
    }
}

#[test]
fn equivalence_npj_and_prj_on_zipfian_relations() {
    let count = 4000usize;
    let mut left = ZipfRelation::new(500, 1.2, count).unwrap();
    left.build().unwrap();
    let mut right = ZipfRelation::new(500, 1.2, count).unwrap();
    right.build().unwrap();

    let left_tuples = left.get().unwrap();
    let right_tuples = right.get().unwrap();

    let mut npj = NoPartitioningJoin::new(left_tuples, right_tuples).unwrap();
    npj.execute().unwrap();
    let mut npj_result = npj.get().unwrap().to_vec();

    let mut prj = RadixHashJoin::new(left_tuples, right_tuples, 1.5, 3, 5, 2).unwrap();
    prj.execute().unwrap();
    let mut prj_result = flatten(prj.get().unwrap());

    assert!(multiset_eq(&mut npj_result, &mut prj_result));
}

#[test]
fn configuration_invariance_over_generated_relations() {
    let mut left = UniformRelation::new(1, 300, 6000).unwrap();
    left.build().unwrap();
    let mut right = UniformRelation::new(1, 300, 4500).unwrap();
    right.build().unwrap();

    let left_tuples = left.get().unwrap();
    let right_tuples = right.get().unwrap();

    let configs: [(usize, u32, u32); 4] = [(1, 8, 1), (2, 4, 2), (4, 3, 2), (5, 2, 3)];
    let mut reference: Option<Vec<JoinTriple>> = None;

    for (workers, bits, passes) in configs {
        let mut join = RadixHashJoin::new(left_tuples, right_tuples, 1.5, workers, bits, passes).unwrap();
        join.execute().unwrap();
        let mut result = flatten(join.get().unwrap());
        result.sort_by_key(|t| (t.value, t.left_rid, t.right_rid));

        match &reference {
            None => reference = Some(result),
            Some(r) => assert_eq!(r, &result, "mismatch at workers={workers} bits={bits} passes={passes}"),
        }
    }
}
