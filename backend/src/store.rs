//! SQLite persistence for tasks.
//!
//! One table, `todos`, created on connect when missing. Every method is an
//! independent statement except [`TaskStore::delete_many`], which runs in a
//! single transaction.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use thiserror::Error;
use todo_shared::{BatchDeleteResponse, Task};
use tracing::{debug, instrument};

const TASK_COLUMNS: &str = "id, text, completed, created_at";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("todo {0} not found")]
    NotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    text: String,
    completed: bool,
    created_at: NaiveDateTime,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            completed: row.completed,
            created_at: row.created_at,
        }
    }
}

/// Fields to change on an existing task. Text is expected to be normalized already.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub completed: Option<bool>,
    pub text: Option<String>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.completed.is_none() && self.text.is_none()
    }
}

#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    /// Opens (creating if needed) the database at `url` and ensures the schema exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        debug!("Opening SQLite database at {}", url);

        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    /// Private in-memory database. A single connection that never expires, since
    /// each SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT FALSE,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// All tasks, newest first. Ids break ties between rows created in the same second.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM todos ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "listed todos");
        Ok(rows.into_iter().map(Task::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Task, StoreError> {
        sqlx::query_as::<_, TaskRow>(&format!("SELECT {TASK_COLUMNS} FROM todos WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Task::from)
            .ok_or(StoreError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, text: &str) -> Result<Task, StoreError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "INSERT INTO todos (text) VALUES (?) RETURNING {TASK_COLUMNS}"
        ))
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = row.id, "created todo");
        Ok(row.into())
    }

    /// Applies only the supplied fields. An empty change set reads the row back untouched.
    #[instrument(skip(self))]
    pub async fn update(&self, id: i64, changes: TaskChanges) -> Result<Task, StoreError> {
        if changes.is_empty() {
            return self.get(id).await;
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE todos SET ");
        let mut fields = builder.separated(", ");
        if let Some(completed) = changes.completed {
            fields.push("completed = ").push_bind_unseparated(completed);
        }
        if let Some(text) = changes.text {
            fields.push("text = ").push_bind_unseparated(text);
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {TASK_COLUMNS}"));

        let row = builder
            .build_query_as::<TaskRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        debug!(id, "updated todo");
        Ok(row.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        debug!(id, "deleted todo");
        Ok(())
    }

    /// Deletes every listed id in one transaction. Unknown ids are reported, not fatal;
    /// repeated ids are handled once.
    #[instrument(skip(self))]
    pub async fn delete_many(&self, ids: &[i64]) -> Result<BatchDeleteResponse, StoreError> {
        let mut outcome = BatchDeleteResponse::default();
        let mut tx = self.pool.begin().await?;

        let mut seen = HashSet::new();
        for &id in ids {
            if !seen.insert(id) {
                continue;
            }

            let result = sqlx::query("DELETE FROM todos WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                outcome.missing.push(id);
            } else {
                outcome.deleted.push(id);
            }
        }

        tx.commit().await?;

        debug!(
            deleted = outcome.deleted.len(),
            missing = outcome.missing.len(),
            "batch delete finished"
        );
        Ok(outcome)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
