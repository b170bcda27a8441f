// src/gateway/testing.rs
//! Scripted in-memory transport for unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::transport::{ApiTransport, Method};
use crate::error::{ClientError, ClientResult};

type Handler = Arc<dyn Fn(Option<&Value>) -> ClientResult<Value> + Send + Sync>;

#[derive(Clone)]
enum Reply {
    Fixed(ClientResult<Value>),
    Handler(Handler),
}

#[derive(Clone)]
struct Scripted {
    reply: Reply,
    delay: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Replies queue per route; the last queued reply keeps answering.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
    }

    pub fn on(&self, method: Method, path: &str, result: ClientResult<Value>) {
        self.push(method, path, Scripted { reply: Reply::Fixed(result), delay: None });
    }

    pub fn on_delayed(&self, method: Method, path: &str, delay: Duration, result: ClientResult<Value>) {
        self.push(method, path, Scripted { reply: Reply::Fixed(result), delay: Some(delay) });
    }

    pub fn on_fn<F>(&self, method: Method, path: &str, handler: F)
    where
        F: Fn(Option<&Value>) -> ClientResult<Value> + Send + Sync + 'static,
    {
        self.push(method, path, Scripted { reply: Reply::Handler(Arc::new(handler)), delay: None });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<Scripted> {
        let mut routes = self.routes.lock().unwrap();
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> ClientResult<Value> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let scripted = match self.next_reply(method, path) {
            Some(scripted) => scripted,
            None => {
                return Err(ClientError::Api {
                    status: 404,
                    message: format!("No scripted reply for {} {}", method.as_str(), path),
                })
            }
        };

        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }

        match scripted.reply {
            Reply::Fixed(result) => result,
            Reply::Handler(handler) => handler(body),
        }
    }
}
