use super::config::{ConfigError, DurationDistribution};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal, Uniform};

/// Source of the random durations consumed by machine and repair processes
pub trait VariateSource {
    /// Time until the next machine failure
    fn sample_failure_interval(&mut self) -> f64;

    /// Time a technician needs to produce a replacement
    fn sample_repair_duration(&mut self) -> f64;
}

/// A configured distribution ready to be sampled
#[derive(Debug, Clone)]
enum Sampler {
    Fixed(f64),
    Uniform(Uniform<f64>),
    Normal(Normal<f64>),
    Exponential(Exp<f64>),
}

impl Sampler {
    fn from_config(
        field: &'static str,
        distribution: &DurationDistribution,
    ) -> Result<Self, ConfigError> {
        distribution.validate(field)?;
        let invalid = |e: String| ConfigError::Distribution { field, detail: e };

        let sampler = match *distribution {
            DurationDistribution::Fixed { value } => Sampler::Fixed(value),
            DurationDistribution::Uniform { low, high } => Sampler::Uniform(Uniform::new(low, high)),
            DurationDistribution::Normal { mean, std_dev } => Sampler::Normal(
                Normal::new(mean, std_dev).map_err(|e| invalid(e.to_string()))?,
            ),
            DurationDistribution::Exponential { mean } => Sampler::Exponential(
                Exp::new(1.0 / mean).map_err(|e| invalid(e.to_string()))?,
            ),
        };
        Ok(sampler)
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Fixed(value) => *value,
            Sampler::Uniform(uniform) => uniform.sample(rng),
            Sampler::Normal(normal) => loop {
                // Truncate to positive durations by resampling
                let value = normal.sample(rng);
                if value > 0.0 {
                    break value;
                }
            },
            Sampler::Exponential(exp) => exp.sample(rng),
        }
    }
}

/// Seeded variate source; the same seed always yields the same stream
pub struct SeededVariates {
    rng: StdRng,
    failure: Sampler,
    repair: Sampler,
}

impl SeededVariates {
    pub fn new(
        seed: u64,
        failure_interval: &DurationDistribution,
        repair_duration: &DurationDistribution,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            failure: Sampler::from_config("failure_interval", failure_interval)?,
            repair: Sampler::from_config("repair_duration", repair_duration)?,
        })
    }
}

impl VariateSource for SeededVariates {
    fn sample_failure_interval(&mut self) -> f64 {
        self.failure.sample(&mut self.rng)
    }

    fn sample_repair_duration(&mut self) -> f64 {
        self.repair.sample(&mut self.rng)
    }
}

/// Replays fixed sequences, cycling when exhausted. Useful for scripted runs.
#[derive(Debug, Clone)]
pub struct ScriptedVariates {
    failures: Vec<f64>,
    repairs: Vec<f64>,
    next_failure: usize,
    next_repair: usize,
}

impl ScriptedVariates {
    pub fn new(failures: Vec<f64>, repairs: Vec<f64>) -> Result<Self, ConfigError> {
        for (field, values) in [("failure_interval", &failures), ("repair_duration", &repairs)] {
            if values.is_empty() || values.iter().any(|v| !(v.is_finite() && *v > 0.0)) {
                return Err(ConfigError::Distribution {
                    field,
                    detail: "scripted values must be a non-empty list of positive numbers"
                        .to_string(),
                });
            }
        }

        Ok(Self {
            failures,
            repairs,
            next_failure: 0,
            next_repair: 0,
        })
    }
}

impl VariateSource for ScriptedVariates {
    fn sample_failure_interval(&mut self) -> f64 {
        let value = self.failures[self.next_failure % self.failures.len()];
        self.next_failure += 1;
        value
    }

    fn sample_repair_duration(&mut self) -> f64 {
        let value = self.repairs[self.next_repair % self.repairs.len()];
        self.next_repair += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(low: f64, high: f64) -> DurationDistribution {
        DurationDistribution::Uniform { low, high }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SeededVariates::new(42, &uniform(132.0, 182.0), &uniform(4.0, 10.0)).unwrap();
        let mut b = SeededVariates::new(42, &uniform(132.0, 182.0), &uniform(4.0, 10.0)).unwrap();

        for _ in 0..20 {
            assert_eq!(a.sample_failure_interval(), b.sample_failure_interval());
            assert_eq!(a.sample_repair_duration(), b.sample_repair_duration());
        }
    }

    #[test]
    fn test_uniform_samples_in_range() {
        let mut source = SeededVariates::new(0, &uniform(132.0, 182.0), &uniform(4.0, 10.0)).unwrap();
        for _ in 0..200 {
            let failure = source.sample_failure_interval();
            assert!((132.0..182.0).contains(&failure));
            let repair = source.sample_repair_duration();
            assert!((4.0..10.0).contains(&repair));
        }
    }

    #[test]
    fn test_normal_is_truncated_to_positive() {
        let wide = DurationDistribution::Normal { mean: 0.5, std_dev: 2.0 };
        let mut source = SeededVariates::new(3, &wide, &wide).unwrap();
        for _ in 0..500 {
            assert!(source.sample_failure_interval() > 0.0);
        }
    }

    #[test]
    fn test_invalid_distribution_rejected() {
        let result = SeededVariates::new(
            0,
            &DurationDistribution::Exponential { mean: -1.0 },
            &uniform(4.0, 10.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_scripted_values_cycle() {
        let mut source = ScriptedVariates::new(vec![1.0, 2.0], vec![5.0]).unwrap();
        let failures: Vec<f64> = (0..3).map(|_| source.sample_failure_interval()).collect();
        assert_eq!(failures, vec![1.0, 2.0, 1.0]);
        assert_eq!(source.sample_repair_duration(), 5.0);
        assert!(ScriptedVariates::new(vec![], vec![1.0]).is_err());
    }
}
