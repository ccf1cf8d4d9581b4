//! Default implementation of the [`Evaluator`] trait.
//!
//! This module provides a simple evaluator that runs a fixed number of episodes
//! and calculates the average return across all episodes.
use super::Evaluator;
use crate::{record::Record, Env, Policy};
use anyhow::Result;

/// A default implementation of the [`Evaluator`] trait.
///
/// This evaluator runs a specified number of episodes and calculates the average
/// return (cumulative reward) and the average episode length.
///
/// Episode `ix` is started with [`Env::reset_with_seed`] using `seed + ix` (wrapping),
/// so two evaluations of the same policy see the same sequence of episodes.
///
/// # Examples
///
/// ```ignore
/// let config = HazardEnvConfig::default();
/// let mut evaluator = DefaultEvaluator::<HazardEnv>::new(&config, 42, 10)?;
///
/// let record = evaluator.evaluate(&mut policy)?;
/// println!("Average return: {}", record.get_scalar("Episode return")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// Base seed; episode `ix` uses `seed + ix`.
    seed: u64,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    /// Runs the configured number of episodes until each one is done.
    ///
    /// The returned record holds `"Episode return"` and `"Episode length"`,
    /// both averaged over episodes.
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E>,
    {
        log::debug!("Evaluation");
        let mut r_total = 0f32;
        let mut n_steps_total = 0usize;

        for ix in 0..self.n_episodes {
            log::trace!("Episode: {:?}", ix);
            let mut prev_obs = self.env.reset_with_seed(self.seed.wrapping_add(ix as u64))?;

            loop {
                let act = policy.sample(&prev_obs);
                let (step, _) = self.env.step(&act);
                r_total += step.reward;
                n_steps_total += 1;
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }
        }

        let n = self.n_episodes.max(1) as f32;
        let mut record = Record::from_scalar("Episode return", r_total / n);
        record.merge_inplace(Record::from_scalar(
            "Episode length",
            n_steps_total as f32 / n,
        ));
        Ok(record)
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Base random seed of evaluation episodes
    /// * `n_episodes` - Number of episodes to run during evaluation
    pub fn new(config: &E::Config, seed: u64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            seed,
            env: E::build(config, seed)?,
        })
    }
}
