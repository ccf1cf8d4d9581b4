use anyhow::Result;
use hazard_core::{
    record::BufferedRecorder, util::eval_with_recorder, DefaultEvaluator, Env as _, Evaluator,
    Policy,
};
use hazard_env::{HazardAct, HazardEnv, HazardEnvConfig, HazardObs};

struct RandomPolicy {
    n_acts: i64,
}

impl Policy<HazardEnv> for RandomPolicy {
    fn sample(&mut self, _: &HazardObs) -> HazardAct {
        fastrand::i64(0..self.n_acts).into()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    fastrand::seed(42);

    let env_config = HazardEnvConfig::default().max_steps(500);
    let mut policy = RandomPolicy { n_acts: 9 };

    // Runs evaluation
    let record = DefaultEvaluator::<HazardEnv>::new(&env_config, 0, 5)?.evaluate(&mut policy)?;
    log::info!(
        "Average return = {}, average length = {}",
        record.get_scalar("Episode return")?,
        record.get_scalar("Episode length")?
    );

    // Records a single episode step by step
    let mut env = HazardEnv::build(&env_config, 7)?;
    let mut recorder = BufferedRecorder::new();
    let returns = eval_with_recorder(&mut env, &mut policy, 1, &mut recorder)?;
    for record in recorder.iter() {
        log::debug!(
            "step {}: termination = {}",
            record.get_scalar("step")?,
            record.get_string("termination")?
        );
    }
    log::info!("Return of the recorded episode = {}", returns[0]);

    Ok(())
}
