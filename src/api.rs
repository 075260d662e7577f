use crate::config::ClientConfig;
use crate::errors::SyncError;
use crate::models::{
    ChatReply, ChatRequest, CreatedTodo, NewTodo, StepsTotal, TodoRef, TodoToggle,
    TrackerUpdate, TrackingSnapshot, WaterTotal,
};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Chatbot,
    Todos,
    UpdateWater,
    UpdateSteps,
    Tracking,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Chatbot => "/api/chatbot",
            Self::Todos => "/api/todos",
            Self::UpdateWater => "/api/update_water",
            Self::UpdateSteps => "/api/update_steps",
            Self::Tracking => "/api/get_tracking",
        }
    }
}

/// One outstanding call, built at submit time and dropped once it settles.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub endpoint: Endpoint,
    pub method: Method,
    pub payload: Option<Value>,
}

impl PendingRequest {
    pub fn new(endpoint: Endpoint, method: Method, payload: &impl Serialize) -> Result<Self, SyncError> {
        Ok(Self {
            endpoint,
            method,
            payload: Some(serde_json::to_value(payload)?),
        })
    }

    pub fn get(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            method: Method::Get,
            payload: None,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, SyncError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(SyncError::network)?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Issues the request exactly once. Non-2xx responses become
    /// [`SyncError::Server`] carrying whatever JSON body came back.
    pub async fn execute(&self, request: PendingRequest) -> Result<Value, SyncError> {
        let url = format!("{}{}", self.base_url, request.endpoint.path());
        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };
        if let Some(payload) = &request.payload {
            builder = builder.json(payload);
        }

        debug!(method = %request.method, %url, "issuing request");
        let response = builder.send().await.map_err(|err| {
            warn!(method = %request.method, %url, "request failed: {err}");
            SyncError::network(err)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(SyncError::network)?;
        let body = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str::<Value>(&text).ok()
        };

        if !status.is_success() {
            warn!(method = %request.method, %url, %status, "server rejected request");
            return Err(SyncError::server(status, body));
        }

        debug!(method = %request.method, %url, %status, "request settled");
        Ok(body.unwrap_or(Value::Null))
    }

    pub async fn send<T: DeserializeOwned>(&self, request: PendingRequest) -> Result<T, SyncError> {
        let value = self.execute(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn chat(&self, message: &str) -> Result<ChatReply, SyncError> {
        let body = ChatRequest {
            message: message.to_owned(),
        };
        self.send(PendingRequest::new(Endpoint::Chatbot, Method::Post, &body)?)
            .await
    }

    pub async fn create_todo(&self, task: &str) -> Result<CreatedTodo, SyncError> {
        let body = NewTodo {
            task: task.to_owned(),
        };
        self.send(PendingRequest::new(Endpoint::Todos, Method::Post, &body)?)
            .await
    }

    pub async fn update_todo(&self, id: i64, completed: bool) -> Result<(), SyncError> {
        let body = TodoToggle { id, completed };
        self.execute(PendingRequest::new(Endpoint::Todos, Method::Put, &body)?)
            .await?;
        Ok(())
    }

    pub async fn delete_todo(&self, id: i64) -> Result<(), SyncError> {
        let body = TodoRef { id };
        self.execute(PendingRequest::new(Endpoint::Todos, Method::Delete, &body)?)
            .await?;
        Ok(())
    }

    pub async fn update_water(&self, update: &TrackerUpdate<f64>) -> Result<WaterTotal, SyncError> {
        self.send(PendingRequest::new(Endpoint::UpdateWater, Method::Post, update)?)
            .await
    }

    pub async fn update_steps(&self, update: &TrackerUpdate<i64>) -> Result<StepsTotal, SyncError> {
        self.send(PendingRequest::new(Endpoint::UpdateSteps, Method::Post, update)?)
            .await
    }

    pub async fn tracking(&self) -> Result<TrackingSnapshot, SyncError> {
        self.send(PendingRequest::get(Endpoint::Tracking)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pending_request_serializes_payload() {
        let request =
            PendingRequest::new(Endpoint::Todos, Method::Delete, &TodoRef { id: 7 }).unwrap();
        assert_eq!(request.payload, Some(json!({ "id": 7 })));
        assert_eq!(request.endpoint.path(), "/api/todos");
        assert_eq!(request.method.to_string(), "DELETE");
    }

    #[test]
    fn get_requests_carry_no_body() {
        let request = PendingRequest::get(Endpoint::Tracking);
        assert_eq!(request.payload, None);
        assert_eq!(request.method, Method::Get);
    }
}
