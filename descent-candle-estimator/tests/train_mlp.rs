use anyhow::Result;
use descent_candle_estimator::{Device, MlpConfig, MlpEstimator, MlpEstimatorConfig};
use descent_core::{
    dummy::{DummyEnv, DummyEnvConfig},
    record::BufferedRecorder,
    replay_buffer::ReplayBufferConfig,
    Ddqn, DdqnConfig, EpsilonGreedy, Trainer, TrainerConfig,
};
use tempdir::TempDir;

const DIM_OBS: i64 = 2;
const DIM_ACT: i64 = 2;
const BATCH_SIZE: usize = 4;
const MAX_EPISODES: usize = 4;

fn create_agent() -> Result<Ddqn<MlpEstimator>> {
    let estimator_config = MlpEstimatorConfig::default()
        .mlp_config(MlpConfig::new(DIM_OBS, vec![8], DIM_ACT))
        .learning_rate(1e-2);
    let qnet = MlpEstimator::build(estimator_config.clone(), Device::Cpu)?;
    let qnet_tgt = MlpEstimator::build(estimator_config, Device::Cpu)?;

    let config = DdqnConfig::default()
        .batch_size(BATCH_SIZE)
        .sync_interval(5)
        .explorer(EpsilonGreedy::with_final_step(20));
    Ddqn::build(config, qnet, qnet_tgt)
}

#[test]
fn a_short_run_drives_the_estimator_end_to_end() -> Result<()> {
    let env_config = DummyEnvConfig {
        obs_dim: DIM_OBS as usize,
        n_actions: DIM_ACT as usize,
        episode_len: 3,
        reward: 1.0,
    };
    let dir = TempDir::new("train_mlp")?;
    let results_dir = dir.path().join("results");

    let mut trainer = Trainer::<DummyEnv>::build(
        TrainerConfig::default()
            .max_episodes(MAX_EPISODES)
            .results_dir(results_dir.to_str().unwrap()),
        env_config,
        ReplayBufferConfig::default().capacity(64),
    )?;
    let mut agent = create_agent()?;
    let mut recorder = BufferedRecorder::new();

    let report = trainer.train(&mut agent, &mut recorder)?;

    assert_eq!(report.history.n_episodes(), MAX_EPISODES);
    // Twelve environment steps with a mini-batch of four: updates ran.
    assert!(agent.n_opts() > 0);
    assert_eq!(recorder.len(), MAX_EPISODES);

    let content = std::fs::read_to_string(results_dir.join("episodes.csv"))?;
    assert_eq!(content.lines().count(), MAX_EPISODES + 1);
    Ok(())
}

#[test]
fn saved_parameters_can_be_restored() -> Result<()> {
    let dir = TempDir::new("params")?;
    let path = dir.path().join("agent");

    let agent = create_agent()?;
    agent.save_params(&path)?;

    let mut restored = create_agent()?;
    restored.load_params(&path)?;
    Ok(())
}
