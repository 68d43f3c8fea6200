use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use todo_shared::{
    BatchDeleteRequest, BatchDeleteResponse, CreateTaskRequest, DeleteResponse, ErrorBody, Task,
    UpdateTaskRequest,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, window, Request, RequestInit, Response};

const TODOS_URL: &str = "/api/todos";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    fn network(context: &str, value: JsValue) -> Self {
        ClientError::Network(format!("{context}: {value:?}"))
    }
}

pub async fn fetch_tasks() -> Result<Vec<Task>, ClientError> {
    send("GET", TODOS_URL, None::<&()>).await
}

pub async fn create_task(text: String) -> Result<Task, ClientError> {
    let body = CreateTaskRequest { text: Some(text) };
    send("POST", TODOS_URL, Some(&body)).await
}

pub async fn update_task(id: i64, changes: UpdateTaskRequest) -> Result<Task, ClientError> {
    send("PUT", &format!("{TODOS_URL}/{id}"), Some(&changes)).await
}

pub async fn delete_task(id: i64) -> Result<DeleteResponse, ClientError> {
    send("DELETE", &format!("{TODOS_URL}/{id}"), None::<&()>).await
}

pub async fn delete_tasks(ids: Vec<i64>) -> Result<BatchDeleteResponse, ClientError> {
    let body = BatchDeleteRequest { ids };
    send("POST", &format!("{TODOS_URL}/batch-delete"), Some(&body)).await
}

async fn send<B, T>(method: &str, url: &str, body: Option<&B>) -> Result<T, ClientError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let window = window().ok_or_else(|| ClientError::Network("no window".to_string()))?;

    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = body {
        let json = serde_json::to_string(body)?;
        opts.set_body(&JsValue::from_str(&json));
    }

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| ClientError::network("Failed to create request", e))?;

    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| ClientError::network("Failed to set header", e))?;
    }

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| ClientError::network("Failed to send request", e))?
        .dyn_into::<Response>()
        .map_err(|e| ClientError::network("Unexpected fetch result", e))?;

    let text_promise = response
        .text()
        .map_err(|e| ClientError::network("Failed to read response", e))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|e| ClientError::network("Failed to get text", e))?
        .as_string()
        .unwrap_or_default();

    if !response.ok() {
        return Err(ClientError::Status {
            status: response.status(),
            message: error_message(&text),
        });
    }

    console::debug_1(&format!("{method} {url} -> {}", response.status()).into());
    Ok(serde_json::from_str(&text)?)
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|error| error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_message() {
        let body = r#"{"code":"NOT_FOUND","message":"Todo not found"}"#;
        assert_eq!(error_message(body), "Todo not found");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }
}
