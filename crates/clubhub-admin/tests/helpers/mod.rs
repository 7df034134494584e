//! In-memory collaborators for orchestrator tests.
//!
//! Every double appends to one shared `Journal`, so tests can assert on the
//! relative order of uploads, saves and deletes.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clubhub_admin::{
    AssetRemover, AssetUploader, EntityGateway, FormOrchestrator, GenerationSource, UploadError,
    UploadErrorKind, UploadTask,
};
use clubhub_api_client::ApiError;
use clubhub_core::models::EntityKind;
use clubhub_core::LocalFile;
use clubhub_storage::{ProgressFn, StorageError, StorageResult};
use serde_json::Value;
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    UploadStarted(String),
    UploadResolved(String),
    Created(EntityKind, Value),
    Updated(EntityKind, String, Value),
    Deleted(String),
}

#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Event>>>);

impl Journal {
    pub fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, event: &Event) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }

    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    pub fn uploads(&self) -> usize {
        self.count(|e| matches!(e, Event::UploadStarted(_)))
    }

    pub fn saves(&self) -> usize {
        self.count(|e| matches!(e, Event::Created(..) | Event::Updated(..)))
    }

    pub fn deletes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Deleted(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn saved_body(&self) -> Option<Value> {
        self.events().into_iter().find_map(|e| match e {
            Event::Created(_, body) | Event::Updated(_, _, body) => Some(body),
            _ => None,
        })
    }
}

/// Stores files at `https://cdn.test/{folder}/{file_name}` after reporting 0, 50 and 100.
pub struct FakeUploader {
    journal: Journal,
    failing: HashSet<String>,
    gate: Option<Arc<Notify>>,
}

impl FakeUploader {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            failing: HashSet::new(),
            gate: None,
        }
    }

    /// Fail uploads of this file name after they reached 50%.
    pub fn failing_on(mut self, file_name: &str) -> Self {
        self.failing.insert(file_name.to_string());
        self
    }

    /// Hold every upload until the gate is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl AssetUploader for FakeUploader {
    async fn upload(&self, task: UploadTask) -> Result<String, UploadError> {
        let name = task.file.file_name().to_string();
        self.journal.push(Event::UploadStarted(name.clone()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        (task.progress)(0.0);
        tokio::task::yield_now().await;
        (task.progress)(50.0);
        tokio::task::yield_now().await;

        if self.failing.contains(&name) {
            return Err(UploadError::new(
                UploadErrorKind::NetworkError,
                "connection reset",
            ));
        }

        (task.progress)(100.0);
        let url = format!("https://cdn.test/{}/{}", task.folder, name);
        self.journal.push(Event::UploadResolved(url.clone()));
        Ok(url)
    }
}

pub struct FakeRemover {
    journal: Journal,
    failing: HashSet<String>,
}

impl FakeRemover {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            failing: HashSet::new(),
        }
    }

    pub fn failing_on(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }
}

#[async_trait]
impl AssetRemover for FakeRemover {
    async fn delete_asset(&self, url: &str) -> StorageResult<()> {
        self.journal.push(Event::Deleted(url.to_string()));
        if self.failing.contains(url) {
            return Err(StorageError::DeleteFailed(format!("{} is locked", url)));
        }
        Ok(())
    }
}

/// Echoes the saved body back with an `id`, or rejects every save.
pub struct FakeGateway {
    journal: Journal,
    rejection: Option<(u16, String)>,
}

impl FakeGateway {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            rejection: None,
        }
    }

    pub fn rejecting(mut self, status: u16, message: &str) -> Self {
        self.rejection = Some((status, message.to_string()));
        self
    }

    fn respond(&self, id: &str, mut body: Value) -> Result<Value, ApiError> {
        if let Some((status, message)) = &self.rejection {
            return Err(ApiError::Status {
                status: *status,
                message: message.clone(),
            });
        }
        body["id"] = Value::String(id.to_string());
        Ok(body)
    }
}

#[async_trait]
impl EntityGateway for FakeGateway {
    async fn create(&self, kind: EntityKind, payload: Value) -> Result<Value, ApiError> {
        self.journal.push(Event::Created(kind, payload.clone()));
        self.respond("new-1", payload)
    }

    async fn update(&self, kind: EntityKind, id: &str, payload: Value) -> Result<Value, ApiError> {
        self.journal
            .push(Event::Updated(kind, id.to_string(), payload.clone()));
        self.respond(id, payload)
    }
}

/// Serves `lists` in order, repeating the last one.
pub struct FakeGenerations {
    lists: Mutex<Vec<Vec<String>>>,
}

impl FakeGenerations {
    pub fn new(lists: &[&[&str]]) -> Arc<Self> {
        Arc::new(Self {
            lists: Mutex::new(
                lists
                    .iter()
                    .map(|l| l.iter().map(|g| g.to_string()).collect())
                    .collect(),
            ),
        })
    }
}

#[async_trait]
impl GenerationSource for FakeGenerations {
    async fn generations(&self, _kind: EntityKind) -> Result<Vec<String>, ApiError> {
        let mut lists = self.lists.lock().unwrap();
        if lists.len() > 1 {
            Ok(lists.remove(0))
        } else {
            Ok(lists.first().cloned().unwrap_or_default())
        }
    }
}

pub fn orchestrator(
    uploader: FakeUploader,
    remover: FakeRemover,
    gateway: FakeGateway,
) -> FormOrchestrator {
    FormOrchestrator::new(Arc::new(uploader), Arc::new(remover), Arc::new(gateway))
}

pub fn recorder() -> (ProgressFn, Arc<Mutex<Vec<f64>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let progress: ProgressFn = Arc::new(move |p| sink.lock().unwrap().push(p));
    (progress, seen)
}

pub fn png(name: &str) -> LocalFile {
    LocalFile::from_bytes(name, Some("image/png"), name.as_bytes().to_vec()).unwrap()
}

pub fn pdf(name: &str) -> LocalFile {
    LocalFile::from_bytes(name, Some("application/pdf"), name.as_bytes().to_vec()).unwrap()
}
