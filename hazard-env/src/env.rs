mod config;
use crate::{
    act::HazardAct,
    obs::{HazardObs, ObsLayout},
    world::{HazardInfo, World},
};
use anyhow::Result;
pub use config::{
    GoalPlacement, HazardEnvConfig, HazardMotion, MoveRule, PlacementConfig, WallLayout,
};
use hazard_core::{
    record::{Record, RecordValue},
    Env, Step,
};
use rand::{rngs::SmallRng, SeedableRng};

/// A 2D navigation task among moving hazards.
///
/// The agent starts at the center of the grid and must reach the goal while
/// avoiding hazards. Walls are placed at every reset according to
/// [`HazardEnvConfig::walls`].
///
/// All randomness of an environment comes from one generator seeded in
/// [`Env::build`] or [`Env::reset_with_seed`].
pub struct HazardEnv {
    config: HazardEnvConfig,
    layout: ObsLayout,
    world: World,
    rng: SmallRng,
}

impl HazardEnv {
    /// The current episode.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &HazardEnvConfig {
        &self.config
    }

    /// Shape of the observations.
    pub fn obs_layout(&self) -> &ObsLayout {
        &self.layout
    }

    /// Observation of the current state.
    pub fn observe(&self) -> HazardObs {
        self.layout.encode(&self.world.snapshot())
    }
}

impl Env for HazardEnv {
    type Config = HazardEnvConfig;
    type Obs = HazardObs;
    type Act = HazardAct;
    type Info = HazardInfo;

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let world = World::reset(config, &mut rng)?;
        log::info!("Built HazardEnv with seed {}", seed);

        Ok(Self {
            config: config.clone(),
            layout: config.obs_layout(),
            world,
            rng,
        })
    }

    fn reset(&mut self) -> Result<HazardObs> {
        self.world = World::reset(&self.config, &mut self.rng)?;
        Ok(self.observe())
    }

    fn reset_with_seed(&mut self, seed: u64) -> Result<HazardObs> {
        self.rng = SmallRng::seed_from_u64(seed);
        self.reset()
    }

    fn step(&mut self, act: &HazardAct) -> (Step<Self>, Record) {
        let step = self.world.step(act.id, &mut self.rng);
        let obs = self.observe();
        let agent = self.world.agent();
        let outcome = step.outcome;

        let record = Record::from_slice(&[
            ("reward", RecordValue::Scalar(outcome.reward)),
            ("goal_distance", RecordValue::Scalar(outcome.goal_distance)),
            (
                "min_hazard_distance",
                RecordValue::Scalar(outcome.min_hazard_distance),
            ),
            (
                "hazard_distances",
                RecordValue::Array1(step.info.hazard_distances.clone()),
            ),
            ("agent_x", RecordValue::Scalar(agent.x)),
            ("agent_y", RecordValue::Scalar(agent.y)),
            (
                "termination",
                RecordValue::String(outcome.termination.as_str().to_string()),
            ),
        ]);

        let step = Step::new(
            obs,
            act.clone(),
            outcome.reward,
            outcome.termination.is_terminated(),
            outcome.termination.is_truncated(),
            step.info,
        );

        (step, record)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::act::Direction;

    #[test]
    fn test_build_emits_layout_shaped_obs() -> Result<()> {
        let config = HazardEnvConfig::default().time_feature(true);
        let mut env = HazardEnv::build(&config, 0)?;
        let obs = env.reset()?;

        assert_eq!(obs.shape(), [1 + 10 + 5 + 1 + 1, 4]);
        assert_eq!(obs.shape(), env.obs_layout().shape());
        assert_eq!(obs.position(0), config.agent_start());
        Ok(())
    }

    #[test]
    fn test_step_record() -> Result<()> {
        let mut env = HazardEnv::build(&HazardEnvConfig::default(), 1)?;
        let (step, record) = env.step(&Direction::Stay.into());

        assert_eq!(record.get_scalar("reward")?, step.reward);
        assert_eq!(record.get_scalar("agent_x")?, 10.0);
        assert_eq!(step.info.step_index, 1);
        assert_eq!(
            record.get_array1("hazard_distances")?,
            step.info.hazard_distances
        );
        assert_eq!(step.info.hazard_distances.len(), 5);
        Ok(())
    }
}
