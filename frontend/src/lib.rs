use sauron::prelude::*;
use todo_shared::{normalize_text, BatchDeleteResponse, Task, UpdateTaskRequest};
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, window};

pub mod api;
pub mod state;
mod view;

use api::ClientError;
use state::{EditCommit, Filter, TodoState};

const NOTICE_MILLIS: i32 = 3000;

#[derive(Debug, Clone)]
pub enum Msg {
    LoadTodos,
    TodosLoaded(Vec<Task>),
    SetNewText(String),
    AddTodo,
    TodoAdded(Task),
    ToggleTodo(i64),
    TodoUpdated(Task),
    StartEdit(i64),
    SetEditText(String),
    CommitEdit(i64),
    CancelEdit,
    EditSaved(Task),
    EditFailed(String),
    DeleteTodo(i64),
    TodoDeleted(i64),
    ClearCompleted,
    CompletedCleared(BatchDeleteResponse),
    SetFilter(Filter),
    Failed(String),
    DismissNotice(u32),
    Noop,
}

#[derive(Debug, Clone, PartialEq)]
struct Notice {
    id: u32,
    message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    state: TodoState,
    new_text: String,
    edit_text: String,
    notice: Option<Notice>,
    notice_seq: u32,
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::new(async { Msg::LoadTodos })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::LoadTodos => Cmd::new(async {
                match api::fetch_tasks().await {
                    Ok(tasks) => Msg::TodosLoaded(tasks),
                    Err(e) => failed("Failed to load todos", e),
                }
            }),
            Msg::TodosLoaded(tasks) => {
                console::log_1(&format!("loaded {} todos", tasks.len()).into());
                self.state.load(tasks);
                Cmd::none()
            }
            Msg::SetNewText(new_text) => {
                self.new_text = new_text;
                Cmd::none()
            }
            Msg::AddTodo => {
                let Some(todo_text) = normalize_text(&self.new_text).map(str::to_string) else {
                    return Cmd::none();
                };

                Cmd::new(async move {
                    match api::create_task(todo_text).await {
                        Ok(task) => Msg::TodoAdded(task),
                        Err(e) => failed("Failed to add todo", e),
                    }
                })
            }
            Msg::TodoAdded(task) => {
                self.state.insert_created(task);
                self.new_text.clear();
                Cmd::none()
            }
            Msg::ToggleTodo(id) => {
                let Some(completed) = self.state.toggle_target(id) else {
                    return Cmd::none();
                };

                Cmd::new(async move {
                    match api::update_task(id, UpdateTaskRequest::completed(completed)).await {
                        Ok(task) => Msg::TodoUpdated(task),
                        Err(e) => failed("Failed to update todo", e),
                    }
                })
            }
            Msg::TodoUpdated(task) => {
                self.state.apply_update(task);
                Cmd::none()
            }
            Msg::StartEdit(id) => {
                if let Some(current) = self.state.start_edit(id) {
                    self.edit_text = current;
                }
                Cmd::none()
            }
            Msg::SetEditText(edit_text) => {
                self.edit_text = edit_text;
                Cmd::none()
            }
            Msg::CommitEdit(id) => {
                if !self.state.is_editing(id) {
                    return Cmd::none();
                }

                match self.state.commit_edit(id, &self.edit_text) {
                    EditCommit::Discarded => {
                        self.edit_text.clear();
                        Cmd::none()
                    }
                    EditCommit::Save { id, text: new_text } => Cmd::new(async move {
                        match api::update_task(id, UpdateTaskRequest::text(new_text)).await {
                            Ok(task) => Msg::EditSaved(task),
                            Err(e) => {
                                log_error("Failed to update todo", &e);
                                Msg::EditFailed("Failed to update todo".to_string())
                            }
                        }
                    }),
                }
            }
            Msg::CancelEdit => {
                self.state.cancel_edit();
                self.edit_text.clear();
                Cmd::none()
            }
            Msg::EditSaved(task) => {
                self.state.finish_edit(task);
                self.edit_text.clear();
                Cmd::none()
            }
            Msg::EditFailed(message) => {
                self.state.cancel_edit();
                self.edit_text.clear();
                self.notify(message)
            }
            Msg::DeleteTodo(id) => {
                if !confirm("Are you sure you want to delete this todo?") {
                    return Cmd::none();
                }

                Cmd::new(async move {
                    match api::delete_task(id).await {
                        Ok(_) => Msg::TodoDeleted(id),
                        Err(e) => failed("Failed to delete todo", e),
                    }
                })
            }
            Msg::TodoDeleted(id) => {
                self.state.remove(id);
                Cmd::none()
            }
            Msg::ClearCompleted => {
                let ids = self.state.completed_ids();
                if ids.is_empty() {
                    return Cmd::none();
                }

                Cmd::new(async move {
                    match api::delete_tasks(ids).await {
                        Ok(outcome) => Msg::CompletedCleared(outcome),
                        Err(e) => failed("Failed to clear completed todos", e),
                    }
                })
            }
            Msg::CompletedCleared(outcome) => {
                let removed = self.state.remove_all(outcome.removed_ids());
                console::log_1(&format!("cleared {removed} completed todos").into());
                Cmd::none()
            }
            Msg::SetFilter(filter) => {
                self.state.set_filter(filter);
                Cmd::none()
            }
            Msg::Failed(message) => self.notify(message),
            Msg::DismissNotice(id) => {
                if self.notice.as_ref().is_some_and(|notice| notice.id == id) {
                    self.notice = None;
                }
                Cmd::none()
            }
            Msg::Noop => Cmd::none(),
        }
    }

    fn view(&self) -> Node<Msg> {
        self.view_app()
    }
}

impl Model {
    // A later notice replaces the current one; the older timer then finds a different id.
    fn notify(&mut self, message: String) -> Cmd<Msg> {
        self.notice_seq = self.notice_seq.wrapping_add(1);
        let id = self.notice_seq;
        self.notice = Some(Notice { id, message });

        Cmd::new(async move {
            sleep(NOTICE_MILLIS).await;
            Msg::DismissNotice(id)
        })
    }
}

fn failed(message: &str, error: ClientError) -> Msg {
    log_error(message, &error);
    Msg::Failed(message.to_string())
}

fn log_error(message: &str, error: &ClientError) {
    console::error_1(&format!("{message}: {error}").into());
}

fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

async fn sleep(millis: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
        }
    });
    let _ = JsFuture::from(promise).await;
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(Model::default());
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
                .and_then(|d| d.and_hms_opt(9, 0, 0))
                .unwrap(),
        }
    }

    fn model_with(tasks: Vec<Task>) -> Model {
        let mut model = Model::default();
        model.state.load(tasks);
        model
    }

    fn notice_id(model: &Model) -> Option<u32> {
        model.notice.as_ref().map(|notice| notice.id)
    }

    #[test]
    fn failed_load_keeps_previous_tasks() {
        let mut model = model_with(vec![task(2, "b", false), task(1, "a", true)]);
        let before = model.state.clone();

        let _ = model.update(Msg::Failed("Failed to load todos".to_string()));

        assert_eq!(model.state, before);
        assert_eq!(
            model.notice.as_ref().map(|n| n.message.as_str()),
            Some("Failed to load todos")
        );
    }

    #[test]
    fn input_clears_only_once_the_task_is_created() {
        let mut model = Model::default();
        let _ = model.update(Msg::SetNewText("  buy milk ".to_string()));

        let _ = model.update(Msg::AddTodo);
        assert_eq!(model.new_text, "  buy milk ");

        let _ = model.update(Msg::Failed("Failed to add todo".to_string()));
        assert_eq!(model.new_text, "  buy milk ");

        let _ = model.update(Msg::TodoAdded(task(7, "buy milk", false)));
        assert!(model.new_text.is_empty());
        assert_eq!(model.state.tasks()[0].id, 7);
    }

    #[test]
    fn failed_toggle_leaves_the_task_unchanged() {
        let mut model = model_with(vec![task(1, "a", false)]);

        let _ = model.update(Msg::ToggleTodo(1));
        let _ = model.update(Msg::Failed("Failed to update todo".to_string()));

        assert!(!model.state.find(1).unwrap().completed);
        assert_eq!(model.state.stats().completed, 0);
    }

    #[test]
    fn failed_edit_leaves_edit_mode_with_a_notice() {
        let mut model = model_with(vec![task(1, "draft", false)]);
        let _ = model.update(Msg::StartEdit(1));
        assert_eq!(model.edit_text, "draft");

        let _ = model.update(Msg::SetEditText("final".to_string()));
        let _ = model.update(Msg::CommitEdit(1));
        assert!(model.state.is_editing(1));

        let _ = model.update(Msg::EditFailed("Failed to update todo".to_string()));

        assert_eq!(model.state.editing(), None);
        assert!(model.edit_text.is_empty());
        assert_eq!(model.state.find(1).unwrap().text, "draft");
        assert!(model.notice.is_some());
    }

    #[test]
    fn stale_timer_does_not_dismiss_a_newer_notice() {
        let mut model = Model::default();

        let _ = model.notify("first".to_string());
        let first = notice_id(&model).unwrap();
        let _ = model.notify("second".to_string());
        let second = notice_id(&model).unwrap();

        let _ = model.update(Msg::DismissNotice(first));
        assert_eq!(notice_id(&model), Some(second));

        let _ = model.update(Msg::DismissNotice(second));
        assert!(model.notice.is_none());
    }
}
