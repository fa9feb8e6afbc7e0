//! The task board: a [`VirtualList`] of tasks plus the edits the UI offers.

use std::rc::Rc;

use lazyview_core::{Clock, SystemClock};
use lazyview_foundation::{
    ItemRenderer, ListEvent, Placement, RenderError, RenderRequest, RetainedViewport,
    ScheduleOutcome, VirtualList, VirtualListError,
};

use crate::settings::BoardSettings;
use crate::task::{Task, TaskStatus};
use crate::template;

/// A rendered task row.
#[derive(Debug, PartialEq)]
pub struct TaskRow {
    pub index: usize,
    pub text: String,
    pub class: Option<&'static str>,
    pub slot: Placement,
}

/// Fills the row template from a task.
#[derive(Clone, Debug)]
pub struct TaskRenderer {
    template: String,
}

impl TaskRenderer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl ItemRenderer<Task> for TaskRenderer {
    type Node = Rc<TaskRow>;
    type Template = String;

    fn template(&self) -> &String {
        &self.template
    }

    fn render(&mut self, request: RenderRequest<'_, Task, String>) -> Result<Rc<TaskRow>, RenderError> {
        let task = request.item;
        Ok(Rc::new(TaskRow {
            index: request.index,
            text: template::render(&request.template, |name| task.field(name)),
            class: task.status.css_class(),
            slot: request.slot,
        }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first.
    Date,
    /// Earliest deadline first.
    Deadline,
    Status,
    Title,
}

impl SortKey {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "date" => Some(SortKey::Date),
            "deadline" => Some(SortKey::Deadline),
            "status" => Some(SortKey::Status),
            "title" => Some(SortKey::Title),
            _ => None,
        }
    }

    fn sort(self, tasks: &mut [Task]) {
        match self {
            SortKey::Date => tasks.sort_by(|a, b| b.date.cmp(&a.date)),
            SortKey::Deadline => tasks.sort_by_key(|task| task.deadline),
            SortKey::Status => tasks.sort_by_key(|task| task.status),
            SortKey::Title => tasks.sort_by(|a, b| a.title.cmp(&b.title)),
        }
    }
}

pub type TaskList<C> = VirtualList<Task, TaskRenderer, RetainedViewport<Rc<TaskRow>>, C>;

pub struct TaskBoard<C: Clock = SystemClock> {
    list: TaskList<C>,
}

impl TaskBoard<SystemClock> {
    pub fn new(tasks: Vec<Task>, settings: &BoardSettings) -> Result<Self, VirtualListError> {
        Self::with_clock(tasks, settings, SystemClock)
    }
}

impl<C: Clock> TaskBoard<C> {
    pub fn with_clock(
        tasks: Vec<Task>,
        settings: &BoardSettings,
        clock: C,
    ) -> Result<Self, VirtualListError> {
        let list = VirtualList::with_clock(
            tasks,
            TaskRenderer::new(settings.row_template.clone()),
            RetainedViewport::new(),
            settings.list_config(),
            clock,
        )?;
        Ok(Self { list })
    }

    pub fn tasks(&self) -> &[Task] {
        self.list.items()
    }

    pub fn list(&self) -> &TaskList<C> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut TaskList<C> {
        &mut self.list
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.list.into_items()
    }

    /// Adds a new task at the top of the board.
    pub fn add_task(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: u64,
        now_ms: u64,
    ) {
        let task = Task::new(title, description, deadline, now_ms);
        log::info!("new task {:?}", task.title);
        self.list.add_item(task, true);
    }

    /// Replaces the task at `index` with a fresh in-progress record.
    pub fn edit_task(
        &mut self,
        index: usize,
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: u64,
        now_ms: u64,
    ) -> Result<(), VirtualListError> {
        self.list
            .update_item(index, Task::new(title, description, deadline, now_ms))
    }

    pub fn set_status(&mut self, index: usize, status: TaskStatus) -> Result<(), VirtualListError> {
        let task = self
            .list
            .item(index)
            .cloned()
            .ok_or(VirtualListError::IndexOutOfRange {
                index,
                len: self.list.len(),
            })?;
        self.list.update_item(index, task.with_status(status))
    }

    pub fn remove_task(&mut self, index: usize) -> Result<Task, VirtualListError> {
        self.list.remove_item(index)
    }

    /// Reorders the tasks and hands the new order to the list.
    pub fn sort_by(&mut self, key: SortKey) {
        let mut tasks = self.list.items().to_vec();
        key.sort(&mut tasks);
        self.list.set_items(tasks);
    }

    pub fn scroll_to(&mut self, offset: f32) -> ScheduleOutcome {
        self.list.handle_event(ListEvent::Scrolled { offset })
    }

    pub fn resize(&mut self, display_height: f32) -> ScheduleOutcome {
        self.list.handle_event(ListEvent::Resized { display_height })
    }

    pub fn poll(&mut self) -> Result<bool, VirtualListError> {
        self.list.poll()
    }

    /// Rows currently attached, top to bottom.
    pub fn visible_rows(&self) -> Vec<Rc<TaskRow>> {
        self.list
            .port()
            .attached()
            .into_iter()
            .map(|(_, attached)| Rc::clone(&attached.node))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyview_core::ManualClock;

    fn settings() -> BoardSettings {
        BoardSettings {
            item_height: 50.0,
            gap: 5.0,
            offset_buffer: 1,
            display_height: 110.0,
            row_template: "{{title}}".into(),
            ..BoardSettings::default()
        }
    }

    fn board(titles: &[&str]) -> (TaskBoard<ManualClock>, ManualClock) {
        let tasks = titles
            .iter()
            .enumerate()
            .map(|(i, title)| Task::new(*title, "", 0, i as u64))
            .collect();
        let clock = ManualClock::new();
        let board = TaskBoard::with_clock(tasks, &settings(), clock.clone()).unwrap();
        (board, clock)
    }

    fn settle(board: &mut TaskBoard<ManualClock>, clock: &ManualClock) {
        while let Some(deadline) = board.list().next_deadline() {
            clock.advance_to(deadline);
            board.poll().unwrap();
        }
    }

    fn texts(board: &TaskBoard<ManualClock>) -> Vec<String> {
        board.visible_rows().iter().map(|row| row.text.clone()).collect()
    }

    #[test]
    fn add_task_goes_to_the_top() {
        let (mut board, clock) = board(&["a", "b"]);
        settle(&mut board, &clock);

        board.add_task("new", "", 0, 100);
        settle(&mut board, &clock);

        assert_eq!(texts(&board), vec!["new", "a", "b"]);
    }

    #[test]
    fn set_status_marks_row() {
        let (mut board, clock) = board(&["a", "b"]);
        settle(&mut board, &clock);

        board.set_status(1, TaskStatus::Failed).unwrap();
        settle(&mut board, &clock);

        assert_eq!(board.tasks()[1].status, TaskStatus::Failed);
        assert_eq!(board.visible_rows()[1].class, Some("fail"));
        assert_eq!(board.visible_rows()[0].class, None);
    }

    #[test]
    fn set_status_out_of_range() {
        let (mut board, _) = board(&["a"]);
        assert!(matches!(
            board.set_status(4, TaskStatus::Done),
            Err(VirtualListError::IndexOutOfRange { index: 4, len: 1 })
        ));
    }

    #[test]
    fn sort_by_title_and_date() {
        let (mut board, clock) = board(&["c", "a", "b"]);
        settle(&mut board, &clock);

        board.sort_by(SortKey::Title);
        settle(&mut board, &clock);
        assert_eq!(texts(&board), vec!["a", "b", "c"]);

        board.sort_by(SortKey::Date);
        settle(&mut board, &clock);
        assert_eq!(texts(&board), vec!["b", "a", "c"]);
    }

    #[test]
    fn edit_and_remove() {
        let (mut board, clock) = board(&["a", "b", "c"]);
        settle(&mut board, &clock);

        board.edit_task(0, "A", "", 0, 50).unwrap();
        let removed = board.remove_task(1).unwrap();
        settle(&mut board, &clock);

        assert_eq!(removed.title, "b");
        assert_eq!(texts(&board), vec!["A", "c"]);
    }

    #[test]
    fn sort_key_names() {
        assert_eq!(SortKey::parse("deadline"), Some(SortKey::Deadline));
        assert_eq!(SortKey::parse("colour"), None);
    }
}
