use anyhow::{bail, Result};
use clap::{Arg, Command};
use descent_candle_estimator::{Device, MlpConfig, MlpEstimator, MlpEstimatorConfig, OptimizerConfig};
use descent_core::{
    record::NullRecorder, replay_buffer::ReplayBufferConfig, Ddqn, DdqnConfig, Env, EpsilonGreedy,
    Step, Trainer, TrainerConfig,
};
use log::info;

const DIM_OBS: i64 = 2;
const DIM_ACT: i64 = 2;
const LR: f64 = 1e-3;
const DISCOUNT_FACTOR: f64 = 0.99;
const BATCH_SIZE: usize = 32;
const SYNC_INTERVAL: usize = 500;
const EPS_FINAL_STEP: usize = 20_000;
const REPLAY_BUFFER_CAPACITY: usize = 10_000;
const MAX_EPISODES: usize = 500;
const EVAL_EPISODES: usize = 10;
const SOLVED_THRESHOLD: f32 = 40.0;
const SOLVED_WINDOW: usize = 50;
const MODEL_DIR: &str = "./model/soft_landing";
const RESULTS_DIR: &str = "./results/soft_landing";

const GRAVITY: f32 = 0.3;
const THRUST: f32 = 0.7;
const FUEL_COST: f32 = 0.5;
const SAFE_SPEED: f32 = 1.0;
const STEP_LIMIT: usize = 200;

#[derive(Clone, Default)]
struct SoftLandingConfig {}

/// A craft falling toward the ground under gravity. Action 1 fires the
/// brake thruster at a small fuel cost; touching down slower than
/// `SAFE_SPEED` earns the landing bonus, anything faster is a crash.
struct SoftLandingEnv {
    altitude: f32,
    velocity: f32,
    t: usize,
    episode: usize,
}

impl Env for SoftLandingEnv {
    type Config = SoftLandingConfig;
    type Info = ();

    fn build(_config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            altitude: 0.0,
            velocity: 0.0,
            t: 0,
            episode: seed as usize,
        })
    }

    fn obs_dim(&self) -> usize {
        DIM_OBS as usize
    }

    fn n_actions(&self) -> usize {
        DIM_ACT as usize
    }

    fn reset(&mut self) -> Result<Vec<f32>> {
        // Cycle through a handful of drop heights so episodes differ.
        self.altitude = 8.0 + (self.episode % 5) as f32;
        self.velocity = 0.0;
        self.t = 0;
        self.episode += 1;
        Ok(vec![self.altitude, self.velocity])
    }

    fn step(&mut self, act: usize) -> Result<Step<Self>> {
        let mut reward = 0.0;
        match act {
            0 => {}
            1 => {
                self.velocity += THRUST;
                reward -= FUEL_COST;
            }
            _ => bail!("action {} is out of range", act),
        }
        self.velocity -= GRAVITY;
        self.altitude += self.velocity;
        self.t += 1;

        let landed = self.altitude <= 0.0;
        if landed {
            self.altitude = 0.0;
            reward += if -self.velocity < SAFE_SPEED {
                100.0
            } else {
                -100.0
            };
        }
        let is_done = landed || self.t >= STEP_LIMIT;

        Ok(Step::new(
            vec![self.altitude, self.velocity],
            reward,
            is_done,
            (),
        ))
    }
}

fn create_agent() -> Result<Ddqn<MlpEstimator>> {
    let estimator_config = MlpEstimatorConfig::default()
        .mlp_config(MlpConfig::new(DIM_OBS, vec![64, 64], DIM_ACT))
        .opt_config(OptimizerConfig::Adam { lr: LR });
    let qnet = MlpEstimator::build(estimator_config.clone(), Device::Cpu)?;
    let qnet_tgt = MlpEstimator::build(estimator_config, Device::Cpu)?;

    let config = DdqnConfig::default()
        .batch_size(BATCH_SIZE)
        .discount_factor(DISCOUNT_FACTOR)
        .sync_interval(SYNC_INTERVAL)
        .explorer(EpsilonGreedy::with_final_step(EPS_FINAL_STEP));
    Ddqn::build(config, qnet, qnet_tgt)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("soft_landing")
        .version("0.1.0")
        .arg(
            Arg::new("episodes")
                .long("episodes")
                .value_name("N")
                .help("Maximum number of training episodes"),
        )
        .get_matches();
    let max_episodes = matches
        .get_one::<String>("episodes")
        .map(|v| v.parse::<usize>())
        .transpose()?
        .unwrap_or(MAX_EPISODES);

    let trainer_config = TrainerConfig::default()
        .max_episodes(max_episodes)
        .eval_episodes(EVAL_EPISODES)
        .solved_threshold(SOLVED_THRESHOLD)
        .solved_window(SOLVED_WINDOW)
        .model_dir(MODEL_DIR)
        .results_dir(RESULTS_DIR);
    let mut trainer = Trainer::<SoftLandingEnv>::build(
        trainer_config,
        SoftLandingConfig::default(),
        ReplayBufferConfig::default().capacity(REPLAY_BUFFER_CAPACITY),
    )?;
    let mut agent = create_agent()?;
    let mut recorder = NullRecorder {};

    let report = trainer.train(&mut agent, &mut recorder)?;

    info!(
        "finished in phase {:?} after {} training episodes",
        report.phase,
        report.history.n_episodes()
    );
    if !report.eval_returns.is_empty() {
        let mean = report.eval_returns.iter().sum::<f32>() / report.eval_returns.len() as f32;
        info!("mean evaluation return: {:.1}", mean);
    }
    info!("episode results written to {}", RESULTS_DIR);

    Ok(())
}
