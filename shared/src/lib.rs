use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A single to-do entry as it travels between the server and the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub text: String,
    #[serde(deserialize_with = "flag")]
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl UpdateTaskRequest {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            completed: None,
            text: Some(text.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_none() && self.text.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<i64>,
}

/// Outcome of a batch delete. `missing` ids were not on the server, which the
/// client treats the same as deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchDeleteResponse {
    pub deleted: Vec<i64>,
    pub missing: Vec<i64>,
}

impl BatchDeleteResponse {
    pub fn removed_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.deleted.iter().chain(self.missing.iter()).copied()
    }
}

/// JSON body of every non-2xx API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Trims task text, returning `None` when nothing is left.
pub fn normalize_text(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// Accepts `true`/`false` as well as the integer flags SQLite-backed servers emit.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Int(value) => Ok(value != 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_uses_camel_case_on_the_wire() {
        let task: Task = serde_json::from_value(json!({
            "id": 7,
            "text": "buy milk",
            "completed": false,
            "createdAt": "2024-05-01T10:00:00"
        }))
        .unwrap();

        assert_eq!(task.id, 7);
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["createdAt"], "2024-05-01T10:00:00");
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn completed_accepts_integer_flags() {
        let task: Task = serde_json::from_value(json!({
            "id": 1,
            "text": "a",
            "completed": 1,
            "createdAt": "2024-05-01T10:00:00"
        }))
        .unwrap();
        assert!(task.completed);
    }

    #[test]
    fn update_request_omits_absent_fields() {
        let body = serde_json::to_value(UpdateTaskRequest::completed(true)).unwrap();
        assert_eq!(body, json!({ "completed": true }));

        let parsed: UpdateTaskRequest = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn normalize_text_trims_and_rejects_blank() {
        assert_eq!(normalize_text("  buy milk  "), Some("buy milk"));
        assert_eq!(normalize_text(" \t\n"), None);
        assert_eq!(normalize_text(""), None);
    }
}
