//! In-memory mirror of the server's task list plus the view selectors.
//!
//! Everything here is plain data; the sauron `Model` owns one `TodoState` and
//! feeds it server responses.

use todo_shared::{normalize_text, Task};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
}

impl Stats {
    pub fn total_label(&self) -> String {
        let noun = if self.total == 1 { "task" } else { "tasks" };
        format!("{} {}", self.total, noun)
    }

    pub fn completed_label(&self) -> String {
        format!("{} completed", self.completed)
    }

    pub fn can_clear_completed(&self) -> bool {
        self.completed > 0
    }
}

/// What committing an inline edit should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommit {
    /// Blank text: edit mode already left, nothing to send.
    Discarded,
    /// Send this trimmed text for the task.
    Save { id: i64, text: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoState {
    tasks: Vec<Task>,
    filter: Filter,
    editing: Option<i64>,
}

impl TodoState {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    pub fn is_editing(&self, id: i64) -> bool {
        self.editing == Some(id)
    }

    pub fn find(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Replaces the whole list with a fresh server listing.
    pub fn load(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        if let Some(id) = self.editing {
            if self.find(id).is_none() {
                self.editing = None;
            }
        }
    }

    /// A newly created task goes to the front, matching the server's newest-first order.
    pub fn insert_created(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    /// Swaps in the server's copy of a task, keeping its position.
    pub fn apply_update(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i64) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        if self.editing == Some(id) {
            self.editing = None;
        }
        Some(self.tasks.remove(index))
    }

    pub fn remove_all<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = i64>,
    {
        ids.into_iter()
            .filter(|&id| self.remove(id).is_some())
            .count()
    }

    /// The `completed` value a toggle of `id` should send.
    pub fn toggle_target(&self, id: i64) -> Option<bool> {
        self.find(id).map(|t| !t.completed)
    }

    pub fn completed_ids(&self) -> Vec<i64> {
        self.tasks
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.id)
            .collect()
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn visible(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.filter.matches(t))
            .collect()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total: self.tasks.len(),
            completed: self.tasks.iter().filter(|t| t.completed).count(),
        }
    }

    /// Enters edit mode for `id`, returning the text to seed the edit field with.
    pub fn start_edit(&mut self, id: i64) -> Option<String> {
        let text = self.find(id)?.text.clone();
        self.editing = Some(id);
        Some(text)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Blank text cancels the edit locally; anything else is handed back to be saved.
    pub fn commit_edit(&mut self, id: i64, text: &str) -> EditCommit {
        match normalize_text(text) {
            Some(text) => EditCommit::Save {
                id,
                text: text.to_string(),
            },
            None => {
                self.cancel_edit();
                EditCommit::Discarded
            }
        }
    }

    pub fn finish_edit(&mut self, task: Task) {
        if self.editing == Some(task.id) {
            self.editing = None;
        }
        self.apply_update(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: i64, text: &str, completed: bool) -> Task {
        Task {
            id,
            text: text.to_string(),
            completed,
            created_at: NaiveDate::from_ymd_opt(2024, 5, 1)
                .and_then(|d| d.and_hms_opt(10, 0, id as u32 % 60))
                .unwrap(),
        }
    }

    fn loaded() -> TodoState {
        let mut state = TodoState::default();
        state.load(vec![
            task(4, "d", true),
            task(3, "c", false),
            task(2, "b", true),
            task(1, "a", false),
        ]);
        state
    }

    fn ids(tasks: &[&Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn filters_preserve_order() {
        let mut state = loaded();

        assert_eq!(ids(&state.visible()), vec![4, 3, 2, 1]);

        state.set_filter(Filter::Active);
        assert_eq!(ids(&state.visible()), vec![3, 1]);

        state.set_filter(Filter::Completed);
        assert_eq!(ids(&state.visible()), vec![4, 2]);
    }

    #[test]
    fn stats_ignore_the_filter() {
        let mut state = loaded();
        state.set_filter(Filter::Active);

        let stats = state.stats();
        assert_eq!(stats, Stats { total: 4, completed: 2 });
        assert_eq!(stats.total_label(), "4 tasks");
        assert_eq!(stats.completed_label(), "2 completed");
        assert!(stats.can_clear_completed());
    }

    #[test]
    fn singular_label_and_disabled_clear() {
        let mut state = TodoState::default();
        state.insert_created(task(1, "only", false));

        let stats = state.stats();
        assert_eq!(stats.total_label(), "1 task");
        assert!(!stats.can_clear_completed());
    }

    #[test]
    fn created_task_goes_first() {
        let mut state = loaded();
        state.insert_created(task(5, "new", false));

        assert_eq!(state.tasks()[0].id, 5);
        assert_eq!(state.stats().total, 5);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut state = loaded();
        assert_eq!(state.toggle_target(3), Some(true));

        assert!(state.apply_update(task(3, "c", true)));

        let all: Vec<&Task> = state.tasks().iter().collect();
        assert_eq!(ids(&all), vec![4, 3, 2, 1]);
        assert!(state.find(3).unwrap().completed);
        assert!(!state.apply_update(task(99, "ghost", false)));
    }

    #[test]
    fn blank_commit_cancels_without_saving() {
        let mut state = loaded();
        assert_eq!(state.start_edit(3).as_deref(), Some("c"));
        assert!(state.is_editing(3));

        assert_eq!(state.commit_edit(3, "   "), EditCommit::Discarded);

        assert_eq!(state.editing(), None);
        assert_eq!(state.find(3).unwrap().text, "c");
    }

    #[test]
    fn commit_trims_and_stays_in_edit_mode_until_saved() {
        let mut state = loaded();
        state.start_edit(1);

        let commit = state.commit_edit(1, "  renamed ");
        assert_eq!(
            commit,
            EditCommit::Save {
                id: 1,
                text: "renamed".to_string()
            }
        );
        assert!(state.is_editing(1));

        state.finish_edit(task(1, "renamed", false));
        assert_eq!(state.editing(), None);
        assert_eq!(state.find(1).unwrap().text, "renamed");
    }

    #[test]
    fn start_edit_ignores_unknown_ids() {
        let mut state = loaded();
        assert_eq!(state.start_edit(42), None);
        assert_eq!(state.editing(), None);
    }

    #[test]
    fn batch_result_removes_only_reported_ids() {
        let mut state = loaded();
        assert_eq!(state.completed_ids(), vec![4, 2]);

        let removed = state.remove_all([4, 7]);

        assert_eq!(removed, 1);
        let all: Vec<&Task> = state.tasks().iter().collect();
        assert_eq!(ids(&all), vec![3, 2, 1]);
    }

    #[test]
    fn removing_the_edited_task_leaves_edit_mode() {
        let mut state = loaded();
        state.start_edit(2);

        assert!(state.remove(2).is_some());
        assert_eq!(state.editing(), None);
        assert!(state.remove(2).is_none());
    }

    #[test]
    fn reload_drops_stale_edit() {
        let mut state = loaded();
        state.start_edit(4);

        state.load(vec![task(1, "a", false)]);

        assert_eq!(state.editing(), None);
        assert_eq!(state.stats().total, 1);
    }
}
