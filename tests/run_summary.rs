use clap::Parser;
use rlharness::cli::commands::{
    run::{RunArgs, execute},
    summarize::{self, SummarizeArgs},
};
use tempfile::tempdir;

fn parse_args<I, T>(args: I) -> RunArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    RunArgs::parse_from(args)
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");
    let log_path = tmp.path().join("episodes.csv");

    let args = parse_args([
        "rlharness-run",
        "--agent",
        "random",
        "--episodes",
        "5",
        "--max-steps",
        "30",
        "--seed",
        "11",
        "--log-file",
        log_path.to_str().unwrap(),
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);

    execute(args).expect("run with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["summary"]["total_episodes"], 5);
    assert_eq!(parsed["agent"], "RandomAgent");
    assert_eq!(parsed["environment"], "CartPole");
    assert_eq!(parsed["seed"], 11);
    assert_eq!(parsed["stopped_early"], false);
    assert!(log_path.exists());
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());

    let args = parse_args([
        "rlharness-run",
        "--episodes",
        "2",
        "--max-steps",
        "10",
        "--no-log",
        "--summary",
        &summary_arg,
    ]);

    execute(args).expect("run with summary directory should succeed");

    let expected_path = summary_dir.join("experiment_summary.json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );
}

#[test]
fn config_files_feed_experiment_and_environment() {
    let tmp = tempdir().unwrap();
    let experiment_path = tmp.path().join("experiment.cfg");
    let env_path = tmp.path().join("cartpole.cfg");
    let log_path = tmp.path().join("episodes.csv");
    let observations = tmp.path().join("episodes.jsonl");
    std::fs::write(
        &experiment_path,
        format!(
            "{{\n  \"num_episodes\": 3,\n  \"max_steps_per_episode\": 40,\n  \"log_file\": \"{}\"\n}}\n",
            log_path.display()
        ),
    )
    .unwrap();
    std::fs::write(&env_path, "{\n  \"max_episode_steps\": 15\n}\n").unwrap();

    let args = parse_args([
        "rlharness-run",
        "--config",
        experiment_path.to_str().unwrap(),
        "--env-config",
        env_path.to_str().unwrap(),
        "--observations",
        observations.to_str().unwrap(),
        "--eval",
    ]);
    execute(args).expect("configured run should succeed");

    let episodes = rlharness::export::read_episode_log(&log_path).unwrap();
    assert_eq!(episodes.len(), 3);
    assert!(episodes.iter().all(|s| s.steps <= 15));
    let lines = std::fs::read_to_string(&observations).unwrap();
    assert_eq!(lines.lines().count(), 3);
}

#[test]
fn unknown_agent_fails() {
    let tmp = tempdir().unwrap();
    let args = parse_args([
        "rlharness-run",
        "--agent",
        "dqn",
        "--log-file",
        tmp.path().join("unused.csv").to_str().unwrap(),
    ]);
    let err = execute(args).unwrap_err();
    assert!(err.to_string().contains("dqn"));
}

#[test]
fn summarize_reads_written_log() {
    let tmp = tempdir().unwrap();
    let log_path = tmp.path().join("episodes.csv");

    execute(parse_args([
        "rlharness-run",
        "--episodes",
        "4",
        "--max-steps",
        "25",
        "--seed",
        "2",
        "--log-file",
        log_path.to_str().unwrap(),
    ]))
    .unwrap();

    summarize::execute(SummarizeArgs::parse_from([
        "rlharness-summarize",
        log_path.to_str().unwrap(),
        "--window",
        "2",
    ]))
    .expect("summarizing a fresh log should succeed");

    let missing = summarize::execute(SummarizeArgs::parse_from([
        "rlharness-summarize",
        tmp.path().join("absent.csv").to_str().unwrap(),
    ]));
    assert!(missing.is_err());
}
