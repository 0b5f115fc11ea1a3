use anyhow::Result;
use descent_core::{
    dummy::{DummyEnv, DummyEnvConfig, DummyEstimator},
    record::BufferedRecorder,
    replay_buffer::ReplayBufferConfig,
    Ddqn, DdqnConfig, EpsilonGreedy, Phase, Trainer, TrainerConfig,
};
use tempdir::TempDir;

const BATCH_SIZE: usize = 4;
const REPLAY_BUFFER_CAPACITY: usize = 64;
const MAX_EPISODES: usize = 20;
const SOLVED_WINDOW: usize = 5;
const EVAL_EPISODES: usize = 2;

fn create_agent() -> Result<Ddqn<DummyEstimator>> {
    let config = DdqnConfig::default()
        .batch_size(BATCH_SIZE)
        .sync_interval(10)
        .explorer(EpsilonGreedy::with_final_step(50));
    Ddqn::build(
        config,
        DummyEstimator::new(vec![0.0, 0.0]),
        DummyEstimator::new(vec![0.0, 0.0]),
    )
}

#[test]
fn train_until_solved_on_the_dummy_env() -> Result<()> {
    let env_config = DummyEnvConfig {
        episode_len: 3,
        reward: 1.0,
        ..Default::default()
    };
    let dir = TempDir::new("train_dummy")?;
    let results_dir = dir.path().join("results");
    let trainer_config = TrainerConfig::default()
        .max_episodes(MAX_EPISODES)
        .eval_episodes(EVAL_EPISODES)
        .solved_threshold(2.5)
        .solved_window(SOLVED_WINDOW)
        .results_dir(results_dir.to_str().unwrap());

    let mut trainer = Trainer::<DummyEnv>::build(
        trainer_config,
        env_config,
        ReplayBufferConfig::default().capacity(REPLAY_BUFFER_CAPACITY),
    )?;
    let mut agent = create_agent()?;
    let mut recorder = BufferedRecorder::new();

    let report = trainer.train(&mut agent, &mut recorder)?;

    // Every episode returns 3.0, so the run solves as soon as the window is
    // full, then confirms with greedy episodes.
    assert_eq!(report.phase, Phase::Evaluating);
    assert_eq!(report.history.n_episodes(), SOLVED_WINDOW);
    assert_eq!(report.eval_returns, vec![3.0; EVAL_EPISODES]);

    // Learning updates ran once the first mini-batch fit.
    assert!(agent.n_opts() > 0);

    // One CSV row per training episode.
    let content = std::fs::read_to_string(results_dir.join("episodes.csv"))?;
    assert_eq!(content.lines().count(), SOLVED_WINDOW + 1);

    // The recorder saw every training episode and every evaluation episode.
    assert_eq!(recorder.len(), SOLVED_WINDOW + EVAL_EPISODES);
    Ok(())
}

#[test]
fn unsolved_run_stops_at_the_episode_cap() -> Result<()> {
    let env_config = DummyEnvConfig {
        episode_len: 2,
        reward: -1.0,
        ..Default::default()
    };
    let mut trainer = Trainer::<DummyEnv>::build(
        TrainerConfig::default()
            .max_episodes(6)
            .solved_threshold(100.0)
            .solved_window(3),
        env_config,
        ReplayBufferConfig::default().capacity(REPLAY_BUFFER_CAPACITY),
    )?;
    let mut agent = create_agent()?;
    let mut recorder = BufferedRecorder::new();

    let report = trainer.train(&mut agent, &mut recorder)?;
    assert_eq!(report.phase, Phase::Training);
    assert_eq!(report.history.n_episodes(), 6);
    assert!(report.eval_returns.is_empty());
    Ok(())
}
