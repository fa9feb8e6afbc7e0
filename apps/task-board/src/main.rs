use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use lazyview_core::{Clock, SystemClock};
use task_board::task::DAY_MS;
use task_board::{BoardSettings, SortKey, TaskBoard, TaskStatus, TaskStore};

const SETTINGS_FILE: &str = "board-settings.json";
const SEED_COUNT: u64 = 10_000;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Sleeps until each pending recompute is due and runs it.
fn settle(board: &mut TaskBoard) {
    while let Some(deadline) = board.list().next_deadline() {
        let now = SystemClock.now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        if let Err(err) = board.poll() {
            log::warn!("recompute failed: {err}");
        }
    }
}

fn print_rows(board: &TaskBoard, heading: &str) {
    println!("-- {heading} (offset {}) --", board.list().scroll_offset());
    for row in board.visible_rows() {
        let mark = row.class.unwrap_or("    ");
        println!("{:>6} {mark:<4} {}", row.index, row.text);
    }
}

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    let _ = env_logger::try_init();

    let mut args = std::env::args().skip(1);
    let tasks_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(task_board::store::DEFAULT_TASKS_FILE));
    let sort = args.next().and_then(|name| SortKey::parse(&name));

    let settings = BoardSettings::load(Path::new(SETTINGS_FILE))
        .with_context(|| format!("reading {SETTINGS_FILE}"))?;
    let store = TaskStore::new(&tasks_path);
    let mut tasks = store
        .load()
        .with_context(|| format!("loading tasks from {}", tasks_path.display()))?;

    let now = now_ms();
    if tasks.is_empty() {
        log::info!("seeding {SEED_COUNT} tasks");
        tasks = task_board::task::seed_tasks(SEED_COUNT, now);
    }

    let mut board = TaskBoard::new(tasks, &settings).context("building the task list")?;
    if let Some(key) = sort {
        board.sort_by(key);
    }
    settle(&mut board);
    print_rows(&board, "top");

    let middle = board.list().extent() / 2.0;
    board.scroll_to(middle);
    settle(&mut board);
    print_rows(&board, "middle");

    let first_visible = board.visible_rows().first().map(|row| row.index);
    if let Some(index) = first_visible {
        board.set_status(index, TaskStatus::Done)?;
    }
    board.add_task("Review board", "Added by the demo run", now + DAY_MS, now);
    board.scroll_to(0.0);
    settle(&mut board);
    print_rows(&board, "after edits");

    let stats = board.list().stats();
    println!(
        "{} tasks, {} rendered in total, {} cache hits, {} passes",
        board.tasks().len(),
        stats.total_rendered,
        stats.cache_hits,
        stats.recompute_count
    );

    let tasks = board.into_tasks();
    store
        .save(&tasks)
        .with_context(|| format!("saving tasks to {}", tasks_path.display()))?;
    Ok(())
}
