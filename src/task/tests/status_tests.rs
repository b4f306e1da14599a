//! Unit tests for the status toggle cycle.

use crate::account::domain::UserId;
use crate::task::domain::{Task, TaskStatus, TaskTitle};
use crate::workspace::domain::{Workspace, WorkspaceName};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[rstest]
#[case(TaskStatus::Todo, TaskStatus::InProgress)]
#[case(TaskStatus::InProgress, TaskStatus::Done)]
#[case(TaskStatus::Done, TaskStatus::Todo)]
fn toggled_advances_one_step(#[case] from: TaskStatus, #[case] expected: TaskStatus) {
    assert_eq!(from.toggled(), expected);
}

#[rstest]
#[case(TaskStatus::Todo)]
#[case(TaskStatus::InProgress)]
#[case(TaskStatus::Done)]
fn three_toggles_close_the_cycle(#[case] start: TaskStatus) {
    assert_eq!(start.toggled().toggled().toggled(), start);
}

#[rstest]
fn toggle_status_mutates_task_and_touches_timestamp(clock: DefaultClock) -> eyre::Result<()> {
    let owner = UserId::new();
    let name = WorkspaceName::new("Cycle")?;
    let workspace = Workspace::new(name, "", owner, &clock);
    let title = TaskTitle::new("Rotate credentials")?;
    let mut task = Task::new(workspace.id(), title, owner, &clock);
    let original_updated_at = task.updated_at();

    let first = task.toggle_status(&clock);
    ensure!(first == TaskStatus::InProgress);
    ensure!(task.status() == TaskStatus::InProgress);
    ensure!(task.updated_at() >= original_updated_at);

    let second = task.toggle_status(&clock);
    ensure!(second == TaskStatus::Done);
    let third = task.toggle_status(&clock);
    ensure!(third == TaskStatus::Todo);
    Ok(())
}
