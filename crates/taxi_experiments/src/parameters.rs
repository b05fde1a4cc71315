//! Seed sweeps: one base stand configuration expanded into many runs.
//!
//! Every combination of fleet size and acquisition policy is run under the
//! same list of seeds, so results for different fleets are paired by seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use taxi_core::config::{AcquisitionPolicy, StandConfig};

/// One simulation run of a sweep.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    /// Stand configuration, already carrying this run's seed.
    pub config: StandConfig,
    /// Identifies the fleet/policy combination; shared by all its seeds.
    pub experiment_id: String,
    /// Position of this run in the sweep.
    pub run_id: usize,
    pub seed: u64,
}

impl ParameterSet {
    pub fn new(config: StandConfig, experiment_id: String, run_id: usize, seed: u64) -> Self {
        Self {
            config: config.with_seed(seed),
            experiment_id,
            run_id,
            seed,
        }
    }
}

/// Builder for a sweep over seeds.
#[derive(Debug, Clone)]
pub struct SeedSweep {
    base: StandConfig,
    first_seed: u64,
    runs: usize,
    fleet_sizes: Vec<usize>,
    policies: Vec<AcquisitionPolicy>,
}

impl SeedSweep {
    /// Ten consecutive seeds starting at the base configuration's seed.
    pub fn new(base: StandConfig) -> Self {
        Self {
            first_seed: base.seed,
            base,
            runs: 10,
            fleet_sizes: Vec::new(),
            policies: Vec::new(),
        }
    }

    pub fn first_seed(mut self, seed: u64) -> Self {
        self.first_seed = seed;
        self
    }

    /// Number of seeds per fleet/policy combination.
    pub fn runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Fleet sizes to compare. Empty keeps the base fleet size.
    pub fn fleet_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.fleet_sizes = sizes;
        self
    }

    /// Policies to compare. Empty keeps the base policy.
    pub fn policies(mut self, policies: Vec<AcquisitionPolicy>) -> Self {
        self.policies = policies;
        self
    }

    /// Consecutive seeds `first_seed..first_seed + runs` for every combination.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let seeds: Vec<u64> = (0..self.runs as u64)
            .map(|i| self.first_seed.wrapping_add(i))
            .collect();
        self.expand(&seeds)
    }

    /// `runs` distinct seeds drawn from `master_seed` for every combination.
    pub fn sample_random(&self, master_seed: u64) -> Vec<ParameterSet> {
        let mut rng = StdRng::seed_from_u64(master_seed);
        let mut seen = HashSet::new();
        let mut seeds = Vec::with_capacity(self.runs);
        while seeds.len() < self.runs {
            let seed: u64 = rng.gen();
            if seen.insert(seed) {
                seeds.push(seed);
            }
        }
        self.expand(&seeds)
    }

    fn expand(&self, seeds: &[u64]) -> Vec<ParameterSet> {
        let fleet_sizes = if self.fleet_sizes.is_empty() {
            vec![self.base.fleet_size]
        } else {
            self.fleet_sizes.clone()
        };
        let policies = if self.policies.is_empty() {
            vec![self.base.policy]
        } else {
            self.policies.clone()
        };

        let mut sets = Vec::with_capacity(fleet_sizes.len() * policies.len() * seeds.len());
        for &fleet in &fleet_sizes {
            for &policy in &policies {
                let experiment_id = format!("fleet{fleet}-{}", policy_name(policy));
                let config = self
                    .base
                    .clone()
                    .with_fleet(fleet, self.base.seat_capacity)
                    .with_policy(policy);
                for &seed in seeds {
                    let run_id = sets.len();
                    sets.push(ParameterSet::new(
                        config.clone(),
                        experiment_id.clone(),
                        run_id,
                        seed,
                    ));
                }
            }
        }
        sets
    }
}

pub(crate) fn policy_name(policy: AcquisitionPolicy) -> &'static str {
    match policy {
        AcquisitionPolicy::Eager => "eager",
        AcquisitionPolicy::Gated => "gated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_seeds_from_base() {
        let sets = SeedSweep::new(StandConfig::default().with_seed(100))
            .runs(3)
            .generate();
        let seeds: Vec<_> = sets.iter().map(|s| s.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102]);
        assert!(sets.iter().all(|s| s.config.seed == s.seed));
        assert_eq!(
            sets.iter().map(|s| s.run_id).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn combinations_share_seeds() {
        let sets = SeedSweep::new(StandConfig::default())
            .first_seed(1)
            .runs(2)
            .fleet_sizes(vec![2, 4])
            .policies(vec![AcquisitionPolicy::Eager, AcquisitionPolicy::Gated])
            .generate();
        assert_eq!(sets.len(), 8);
        assert_eq!(sets[0].experiment_id, "fleet2-eager");
        assert_eq!(sets[7].experiment_id, "fleet4-gated");
        assert_eq!(sets[7].config.fleet_size, 4);
        assert_eq!(sets[7].config.policy, AcquisitionPolicy::Gated);
        assert_eq!(sets[2].seed, sets[6].seed);
    }

    #[test]
    fn sampled_seeds_are_distinct_and_reproducible() {
        let sweep = SeedSweep::new(StandConfig::default()).runs(20);
        let a = sweep.sample_random(9);
        let b = sweep.sample_random(9);
        let seeds: HashSet<_> = a.iter().map(|s| s.seed).collect();
        assert_eq!(seeds.len(), 20);
        assert_eq!(
            a.iter().map(|s| s.seed).collect::<Vec<_>>(),
            b.iter().map(|s| s.seed).collect::<Vec<_>>()
        );
    }
}
