use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::config::BatteryParameters;

/// Seedable source of initial state-of-charge values. Wraps a `StdRng` so
/// that `Scheduler::set_random_seed` gives deterministic solves (spec.md §8,
/// "Determinism given seed"): two solves with identical inputs and seed must
/// produce identical best labels, which requires the initial SOC draw itself
/// to be reproducible.
pub struct SocSampler {
    rng: StdRng,
}

impl SocSampler {
    pub fn from_seed(seed: u64) -> SocSampler {
        SocSampler { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> SocSampler {
        SocSampler { rng: StdRng::from_entropy() }
    }

    /// Draws one sample from `Normal(mean, std)`, clipped to `[min, max]` by
    /// rejection (spec.md §6: "samples initial SOC from a truncated normal
    /// (mean 0.7, sigma 0.15, clipped to [0.3, 1.0])"). The normal's tails
    /// fall inside the clip bounds for the default parameters quickly enough
    /// that rejection sampling never takes more than a handful of draws in
    /// practice; a hard cap keeps it from spinning on a pathological config.
    pub fn sample_initial_soc(&mut self, battery: &BatteryParameters) -> f64 {
        let normal = Normal::new(battery.initial_soc_mean, battery.initial_soc_std)
            .expect("initial_soc_std must be positive");

        for _ in 0..1000 {
            let x = normal.sample(&mut self.rng);
            if x >= battery.initial_soc_min && x <= battery.initial_soc_max {
                return x;
            }
        }

        x_clamped(normal.sample(&mut self.rng), battery.initial_soc_min, battery.initial_soc_max)
    }
}

fn x_clamped(x: f64, min: f64, max: f64) -> f64 {
    x.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battery() -> BatteryParameters {
        BatteryParameters {
            battery_capacity: 60.0,
            soc_threshold: 0.3,
            energy_consumption_rate: 0.2,
            initial_soc_mean: 0.7,
            initial_soc_std: 0.15,
            initial_soc_min: 0.3,
            initial_soc_max: 1.0,
        }
    }

    #[test]
    fn sample_is_always_within_clip_bounds() {
        let battery = battery();
        let mut sampler = SocSampler::from_seed(42);
        for _ in 0..200 {
            let soc = sampler.sample_initial_soc(&battery);
            assert!(soc >= battery.initial_soc_min && soc <= battery.initial_soc_max);
        }
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let battery = battery();
        let mut a = SocSampler::from_seed(7);
        let mut b = SocSampler::from_seed(7);
        for _ in 0..20 {
            assert_eq!(a.sample_initial_soc(&battery), b.sample_initial_soc(&battery));
        }
    }
}
