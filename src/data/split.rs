//! Stratified shuffle-split: one train/test partition that keeps every
//! stratum's share of the data in both halves.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A single train/test partition of row indices.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitIndices<K> {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    /// Per-stratum row counts, ordered by stratum key.
    pub strata: Vec<StratumAllocation<K>>,
}

/// How many rows of one stratum went to each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StratumAllocation<K> {
    pub key: K,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Stratified shuffle splitter with a fixed seed.
#[derive(Debug, Clone)]
pub struct StratifiedShuffleSplit {
    test_size: f64,
    random_state: u64,
}

impl StratifiedShuffleSplit {
    pub fn new(test_size: f64, random_state: u64) -> Self {
        Self {
            test_size,
            random_state,
        }
    }

    /// Number of test rows for `n_samples` rows: `ceil(test_size * n)`.
    pub fn n_test(&self, n_samples: usize) -> usize {
        (self.test_size * n_samples as f64).ceil() as usize
    }

    /// Partition `0..strata.len()` so each stratum contributes to the test
    /// set in proportion to its size (largest-remainder rounding, so every
    /// stratum is within one row of its exact share).
    ///
    /// The result depends only on `strata` and the seed.
    pub fn split<K: Ord + Copy>(&self, strata: &[K]) -> Result<SplitIndices<K>> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            bail!("test_size must be in (0, 1), got {}", self.test_size);
        }
        let n_samples = strata.len();
        if n_samples == 0 {
            bail!("Cannot split an empty dataset");
        }
        let n_test = self.n_test(n_samples);
        if n_test >= n_samples {
            bail!(
                "test_size={} leaves no training rows for {n_samples} samples",
                self.test_size
            );
        }

        // Group rows by stratum; BTreeMap keeps iteration order independent
        // of hashing so the shuffle below is reproducible.
        let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
        for (idx, &key) in strata.iter().enumerate() {
            groups.entry(key).or_default().push(idx);
        }
        if groups.values().any(|rows| rows.len() < 2) {
            log::warn!("At least one stratum has a single member; it cannot appear on both sides");
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);

        let sizes: Vec<usize> = groups.values().map(Vec::len).collect();
        let test_counts = allocate(&sizes, n_test, &mut rng);

        let mut train_indices = Vec::with_capacity(n_samples - n_test);
        let mut test_indices = Vec::with_capacity(n_test);
        let mut allocations = Vec::with_capacity(groups.len());

        for ((key, mut rows), n_stratum_test) in groups.into_iter().zip(test_counts) {
            rows.shuffle(&mut rng);
            let (test_part, train_part) = rows.split_at(n_stratum_test);
            test_indices.extend_from_slice(test_part);
            train_indices.extend_from_slice(train_part);
            allocations.push(StratumAllocation {
                key,
                train_rows: train_part.len(),
                test_rows: test_part.len(),
            });
        }

        // Interleave strata in the outputs.
        train_indices.shuffle(&mut rng);
        test_indices.shuffle(&mut rng);

        Ok(SplitIndices {
            train_indices,
            test_indices,
            strata: allocations,
        })
    }
}

/// Distribute `total` picks over groups of `sizes` proportionally.
///
/// Each group gets `floor(exact share)`; the rows left over go one each to
/// the groups with the largest fractional remainder. Ties are broken by a
/// seeded shuffle so no stratum is systematically favoured.
fn allocate(sizes: &[usize], total: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
    let n: usize = sizes.iter().sum();
    let exact: Vec<f64> = sizes
        .iter()
        .map(|&s| s as f64 * total as f64 / n as f64)
        .collect();
    let mut counts: Vec<usize> = exact
        .iter()
        .zip(sizes)
        .map(|(e, &s)| (e.floor() as usize).min(s))
        .collect();

    let assigned: usize = counts.iter().sum();
    let mut left = total.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.shuffle(rng);
    // Stable sort: equal remainders keep their shuffled order.
    order.sort_by(|&a, &b| {
        let ra = exact[a] - counts[a] as f64;
        let rb = exact[b] - counts[b] as f64;
        rb.total_cmp(&ra)
    });

    while left > 0 {
        let before = left;
        for &i in &order {
            if left == 0 {
                break;
            }
            if counts[i] < sizes[i] {
                counts[i] += 1;
                left -= 1;
            }
        }
        if left == before {
            break;
        }
    }
    counts
}
