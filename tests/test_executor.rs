use std::time::Duration;

use vmsetup::commands::executor::{quote_arg, Executor};
use vmsetup::commands::Outcome;

fn executor() -> Executor {
    Executor::new(false, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_quoted_argument_is_not_split() {
    let mut exec = executor();
    exec.run_one_command("echo 'two words'").await;
    assert_eq!(exec.last_stdout().as_deref(), Some("two words"));
}

#[tokio::test]
async fn test_no_shell_interpolation() {
    let mut exec = executor();
    exec.run_one_command("echo $HOME ; true").await;
    assert_eq!(exec.last_stdout().as_deref(), Some("$HOME ; true"));
}

#[tokio::test]
async fn test_batch_stops_at_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut exec = executor();
    let first = dir.path().join("first");
    let third = dir.path().join("third");
    let targets = [first.to_str().unwrap(), "/nonexistent/dir/second", third.to_str().unwrap()];

    let outcome = exec.run_many_arguments(&targets, |t| format!("touch {}", t)).await;

    assert_eq!(outcome, Outcome::Fail);
    assert!(first.exists());
    assert!(!third.exists());
}

#[tokio::test]
async fn test_empty_batch_passes() {
    let mut exec = executor();
    assert_eq!(exec.run_many_arguments(&[], |t| t.to_string()).await, Outcome::Pass);
}

#[tokio::test]
async fn test_dry_run_spawns_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("touched");
    let mut exec = Executor::new(true, Duration::from_secs(5)).unwrap();

    let outcome = exec
        .run_one_command(&format!("touch {}", marker.display()))
        .await;

    assert_eq!(outcome, Outcome::Pass);
    assert!(!marker.exists());
    assert!(exec.last_output().is_none());
}

#[tokio::test]
async fn test_quoted_argument_round_trips_through_a_child() {
    let mut exec = executor();
    let passwd = quote_arg("p@ss word's").unwrap();
    exec.run_one_command(&format!("echo {}", passwd)).await;
    assert_eq!(exec.last_stdout().as_deref(), Some("p@ss word's"));
}
