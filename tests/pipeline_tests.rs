//! Comprehensive tests for the trial pipeline framework

use std::sync::{Arc, Mutex};

use smartcab::{
    pipeline::{JsonlObserver, MetricsObserver, RandomDriver, TrialConfig, TrialPipeline},
    q_learning::{AgentConfig, LearningAgent},
    world::{TrafficWorld, WorldConfig},
};

fn default_world() -> TrafficWorld {
    TrafficWorld::new(WorldConfig::default()).unwrap()
}

/// Test basic trial pipeline with the random baseline
#[test]
fn test_basic_trial_pipeline() {
    let config = TrialConfig {
        trials: 50,
        seed: Some(42),
    };

    let mut pipeline = TrialPipeline::new(config);
    let mut driver = RandomDriver::new("Random".to_string());
    let mut world = default_world();

    let result = pipeline.run(&mut driver, &mut world).unwrap();

    assert_eq!(result.total_trials, 50);
    assert_eq!(result.successes + result.failures, 50);
    assert!(result.success_rate >= 0.0 && result.success_rate <= 1.0);
    assert!(result.penalty_rate >= 0.0);
    assert_eq!(result.records.len(), 50);
}

/// Test trial pipeline with metrics observer
#[test]
fn test_metrics_observer() {
    let config = TrialConfig {
        trials: 20,
        seed: Some(123),
    };

    let mut pipeline = TrialPipeline::new(config).with_observer(Box::new(MetricsObserver::new()));

    let mut driver = RandomDriver::new("Random".to_string());
    let mut world = default_world();

    let result = pipeline.run(&mut driver, &mut world).unwrap();

    assert_eq!(result.total_trials, 20);
}

/// Test trial pipeline with JSONL observer
#[test]
fn test_jsonl_observer() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let path = temp_file.path().to_path_buf();

    let config = TrialConfig {
        trials: 10,
        seed: Some(456),
    };

    let mut pipeline =
        TrialPipeline::new(config).with_observer(Box::new(JsonlObserver::new(&path).unwrap()));

    let mut driver = RandomDriver::new("Random".to_string());
    let mut world = default_world();

    let result = pipeline.run(&mut driver, &mut world).unwrap();

    assert_eq!(result.total_trials, 10);

    // Verify JSONL file was created and has content
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents.lines().count(),
        10,
        "JSONL file should contain one observation per trial"
    );
}

/// Test observer event ordering
#[test]
fn test_observer_event_ordering() {
    // Custom observer to track event sequence
    struct TestObserver {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl smartcab::pipeline::Observer for TestObserver {
        fn on_run_start(&mut self, _total_trials: usize) -> smartcab::Result<()> {
            self.events.lock().unwrap().push("run_start".to_string());
            Ok(())
        }

        fn on_trial_start(&mut self, trial_num: usize, _deadline: i32) -> smartcab::Result<()> {
            self.events
                .lock()
                .unwrap()
                .push(format!("trial_start_{trial_num}"));
            Ok(())
        }

        fn on_trial_end(
            &mut self,
            trial_num: usize,
            _record: &smartcab::TrialRecord,
        ) -> smartcab::Result<()> {
            self.events
                .lock()
                .unwrap()
                .push(format!("trial_end_{trial_num}"));
            Ok(())
        }

        fn on_run_end(&mut self) -> smartcab::Result<()> {
            self.events.lock().unwrap().push("run_end".to_string());
            Ok(())
        }
    }

    let events = Arc::new(Mutex::new(Vec::new()));
    let observer = TestObserver {
        events: events.clone(),
    };

    let config = TrialConfig {
        trials: 3,
        seed: Some(333),
    };

    let mut pipeline = TrialPipeline::new(config).with_observer(Box::new(observer));
    let mut driver = RandomDriver::new("Random".to_string());
    let mut world = default_world();

    pipeline.run(&mut driver, &mut world).unwrap();

    let event_log = events.lock().unwrap();

    // Check expected event sequence
    assert_eq!(event_log[0], "run_start");
    assert!(event_log.contains(&"trial_start_0".to_string()));
    assert!(event_log.contains(&"trial_end_0".to_string()));
    assert!(event_log.contains(&"trial_start_1".to_string()));
    assert!(event_log.contains(&"trial_end_1".to_string()));
    assert!(event_log.contains(&"trial_start_2".to_string()));
    assert!(event_log.contains(&"trial_end_2".to_string()));
    assert_eq!(event_log.last().unwrap(), "run_end");
}

/// Test empty run (edge case)
#[test]
fn test_empty_run() {
    let config = TrialConfig {
        trials: 0,
        seed: Some(444),
    };

    let mut pipeline = TrialPipeline::new(config);
    let mut driver = RandomDriver::new("Random".to_string());
    let mut world = default_world();

    let result = pipeline.run(&mut driver, &mut world).unwrap();

    assert_eq!(result.total_trials, 0);
    assert_eq!(result.successes, 0);
    assert_eq!(result.failures, 0);
    assert_eq!(result.success_rate, 0.0);
}

/// Test run result serialization
#[test]
fn test_run_result_serialization() {
    let config = TrialConfig {
        trials: 5,
        seed: Some(555),
    };

    let mut pipeline = TrialPipeline::new(config);
    let mut driver = RandomDriver::new("Random".to_string());
    let mut world = default_world();

    let result = pipeline.run(&mut driver, &mut world).unwrap();

    let temp_file = tempfile::NamedTempFile::new().unwrap();
    result.save(temp_file.path()).unwrap();

    let loaded = smartcab::pipeline::RunResult::load(temp_file.path()).unwrap();
    assert_eq!(loaded, result);
}

/// Test the Q-learning agent learns to beat the random baseline
///
/// Note: the thresholds are deliberately loose. A waypoint-following policy
/// arrives well before the deadline in the default world, while a random
/// walk rarely does, so the gap between the two is wide.
#[test]
fn q_learning_agent_beats_random_baseline() {
    // Train
    let mut agent = LearningAgent::new(AgentConfig {
        seed: Some(9),
        ..AgentConfig::default()
    })
    .unwrap();
    let mut world = default_world();
    let mut pipeline = TrialPipeline::new(TrialConfig {
        trials: 150,
        seed: Some(9),
    });
    pipeline.run(&mut agent, &mut world).unwrap();

    assert!(agent.q_table_size() > 0, "training should populate the table");

    // Evaluate the frozen policy
    agent.set_learning(false);
    agent.set_epsilon(0.0);

    let mut eval_pipeline = TrialPipeline::new(TrialConfig {
        trials: 50,
        seed: Some(10),
    });
    let mut eval_world = default_world();
    let trained = eval_pipeline.run(&mut agent, &mut eval_world).unwrap();

    // Run the random baseline over the same seeded trial sequence
    let mut random_pipeline = TrialPipeline::new(TrialConfig {
        trials: 50,
        seed: Some(10),
    });
    let mut random_driver = RandomDriver::new("Random".to_string());
    let mut random_world = default_world();
    let baseline = random_pipeline
        .run(&mut random_driver, &mut random_world)
        .unwrap();

    assert!(
        trained.success_rate > 0.35,
        "trained agent should arrive at a reasonable rate, got {:.1}%",
        trained.success_rate * 100.0
    );
    assert!(
        trained.success_rate > baseline.success_rate,
        "trained agent ({:.1}%) should beat the random baseline ({:.1}%)",
        trained.success_rate * 100.0,
        baseline.success_rate * 100.0
    );
}
