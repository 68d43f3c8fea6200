use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use todo_shared::Task;

use crate::state::Filter;
use crate::{Model, Msg};

impl Model {
    pub(crate) fn view_app(&self) -> Node<Msg> {
        div(
            [class("min-h-screen bg-ctp-base text-ctp-text")],
            [
                div(
                    [class("max-w-2xl mx-auto px-6 py-10")],
                    [
                        self.view_header(),
                        div(
                            [class("bg-ctp-surface0 rounded-lg shadow-lg p-6 border border-ctp-surface1")],
                            [
                                self.view_input(),
                                self.view_filters(),
                                self.view_list(),
                                self.view_footer(),
                            ],
                        ),
                    ],
                ),
                self.view_notice(),
            ],
        )
    }

    fn view_header(&self) -> Node<Msg> {
        header([class("mb-8 text-center")], [
            h1([class("text-3xl font-bold text-ctp-text")], [text("Todo List")]),
            p([class("text-ctp-subtext0 mt-2")], [text("Stay organized, one task at a time")]),
        ])
    }

    fn view_input(&self) -> Node<Msg> {
        div([class("flex gap-2 mb-6")], [
            input([
                r#type("text"),
                placeholder("What needs to be done?"),
                value(&self.new_text),
                on_input(|event| Msg::SetNewText(event.value())),
                on_keydown(|event| {
                    if event.key() == "Enter" {
                        Msg::AddTodo
                    } else {
                        Msg::Noop
                    }
                }),
                class("flex-1 px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
            ], []),
            button([
                on_click(|_| Msg::AddTodo),
                class("bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-6 py-2 rounded-md transition-colors duration-200"),
            ], [text("Add")]),
        ])
    }

    fn view_filters(&self) -> Node<Msg> {
        let current = self.state.filter();
        div(
            [class("flex gap-2 mb-4")],
            Filter::ALL.into_iter().map(|filter| {
                button([
                    on_click(move |_| Msg::SetFilter(filter)),
                    class(&format!(
                        "filter-btn px-3 py-1 rounded-full text-sm font-medium transition-colors duration-200 {}",
                        if filter == current {
                            "active bg-ctp-blue text-ctp-base"
                        } else {
                            "bg-ctp-surface1 text-ctp-subtext0 hover:text-ctp-text"
                        }
                    )),
                ], [text(filter.label())])
            }).collect::<Vec<_>>(),
        )
    }

    fn view_list(&self) -> Node<Msg> {
        let visible = self.state.visible();

        if visible.is_empty() {
            return div([class("empty-state text-center py-12")], [
                div([class("text-ctp-overlay0 text-6xl mb-4")], [text("✨")]),
                p([class("text-ctp-subtext0")], [text(empty_message(self.state.filter()))]),
            ]);
        }

        ul(
            [class("space-y-3")],
            visible.into_iter().map(|task| self.view_task(task)).collect::<Vec<_>>(),
        )
    }

    fn view_task(&self, task: &Task) -> Node<Msg> {
        let task_id = task.id;

        li(
            [
                key(task_id.to_string()),
                class(&format!(
                    "todo-item group flex items-center gap-4 border rounded-xl p-4 bg-ctp-surface0 transition-all duration-300 {}",
                    if task.completed {
                        "completed border-ctp-green bg-ctp-green/10"
                    } else {
                        "border-ctp-surface1 hover:border-ctp-blue"
                    }
                )),
            ],
            if self.state.is_editing(task_id) {
                self.view_task_editing(task)
            } else {
                view_task_normal(task)
            },
        )
    }

    fn view_task_editing(&self, task: &Task) -> Vec<Node<Msg>> {
        let task_id = task.id;
        vec![
            input([
                r#type("checkbox"),
                checked(task.completed),
                disabled(true),
                class("w-5 h-5"),
            ], []),
            input([
                r#type("text"),
                value(&self.edit_text),
                on_input(|event| Msg::SetEditText(event.value())),
                on_keydown(move |event| match event.key().as_str() {
                    "Enter" => Msg::CommitEdit(task_id),
                    "Escape" => Msg::CancelEdit,
                    _ => Msg::Noop,
                }),
                class("edit-input flex-1 px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent"),
            ], []),
            div([class("flex gap-2")], [
                button([
                    on_click(move |_| Msg::CommitEdit(task_id)),
                    class("save-btn bg-ctp-green hover:bg-ctp-teal text-ctp-base font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                ], [text("Save")]),
                button([
                    on_click(|_| Msg::CancelEdit),
                    class("cancel-btn bg-ctp-overlay0 hover:bg-ctp-overlay1 text-ctp-text font-medium px-4 py-2 rounded-md transition-colors duration-200"),
                ], [text("Cancel")]),
            ]),
        ]
    }

    fn view_footer(&self) -> Node<Msg> {
        let stats = self.state.stats();
        div([class("flex items-center justify-between mt-6 pt-4 border-t border-ctp-surface1 text-sm")], [
            div([class("flex gap-4 text-ctp-subtext0")], [
                span([class("total-todos")], [text(stats.total_label())]),
                span([class("completed-todos")], [text(stats.completed_label())]),
            ]),
            button([
                on_click(|_| Msg::ClearCompleted),
                disabled(!stats.can_clear_completed()),
                class("clear-completed bg-ctp-red/20 text-ctp-red hover:bg-ctp-red/30 disabled:opacity-40 px-3 py-1 rounded-full font-medium transition-colors duration-200"),
            ], [text("Clear completed")]),
        ])
    }

    fn view_notice(&self) -> Node<Msg> {
        match &self.notice {
            Some(notice) => div(
                [
                    key(notice.id.to_string()),
                    class("fixed top-5 right-5 z-50 bg-ctp-red text-ctp-base px-5 py-3 rounded-lg shadow-lg"),
                ],
                [text(&notice.message)],
            ),
            None => span([], []),
        }
    }
}

fn view_task_normal(task: &Task) -> Vec<Node<Msg>> {
    let task_id = task.id;
    vec![
        // The native box is hidden; the visible tick only follows the server state.
        label([class("relative flex items-center cursor-pointer")], [
            input([
                r#type("checkbox"),
                checked(task.completed),
                id(&format!("checkbox-{task_id}")),
                on_click(move |event| {
                    event.prevent_default();
                    Msg::ToggleTodo(task_id)
                }),
                class("todo-checkbox sr-only"),
            ], []),
            div([class(&format!(
                "w-6 h-6 rounded-lg border-2 flex items-center justify-center transition-all duration-200 {}",
                if task.completed {
                    "bg-ctp-green border-ctp-green shadow-sm"
                } else {
                    "border-ctp-surface2 hover:border-ctp-blue hover:bg-ctp-blue/10"
                }
            ))], [
                span([class("text-ctp-base text-sm font-bold")], [text(tick_mark(task.completed))]),
            ]),
        ]),
        span([class(&format!(
            "todo-text flex-1 break-words {}",
            if task.completed { "line-through text-ctp-overlay1" } else { "text-ctp-text" }
        ))], [text(&task.text)]),
        div([class("todo-actions flex gap-2 opacity-60 group-hover:opacity-100")], [
            button([
                on_click(move |_| Msg::StartEdit(task_id)),
                r#type("button"),
                class("edit-btn px-3 py-1 rounded-md bg-ctp-blue/20 text-ctp-blue hover:bg-ctp-blue/30 text-sm"),
            ], [text("Edit")]),
            button([
                on_click(move |_| Msg::DeleteTodo(task_id)),
                r#type("button"),
                class("delete-btn px-3 py-1 rounded-md bg-ctp-red/20 text-ctp-red hover:bg-ctp-red/30 text-sm"),
            ], [text("Delete")]),
        ]),
    ]
}

fn tick_mark(completed: bool) -> &'static str {
    if completed {
        "✓"
    } else {
        ""
    }
}

fn empty_message(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "No tasks yet. Add one above to get started!",
        Filter::Active => "No active tasks. All caught up!",
        Filter::Completed => "No completed tasks yet.",
    }
}
