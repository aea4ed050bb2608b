//! Scripted in-memory backends shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use hostrun_core::{CommandId, InstanceRecord, TargetId, TargetSelector, TaskBody};

use crate::backend::{BackendError, CommandBackend, StatusReply, TargetInventory};

/// Inventory that replays a fixed sequence of query responses.
pub struct ScriptedInventory {
    responses: Mutex<VecDeque<Result<Vec<InstanceRecord>, BackendError>>>,
    pub queries: AtomicUsize,
}

impl ScriptedInventory {
    pub fn new(
        responses: impl IntoIterator<Item = Result<Vec<InstanceRecord>, BackendError>>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TargetInventory for ScriptedInventory {
    async fn query(&self, _selector: &TargetSelector) -> Result<Vec<InstanceRecord>, BackendError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Execution backend that replays scripted submit and status responses.
pub struct ScriptedBackend {
    submit_responses: Mutex<VecDeque<Result<CommandId, BackendError>>>,
    status_responses: Mutex<VecDeque<Result<StatusReply, BackendError>>>,
    pub submits: AtomicUsize,
    pub status_queries: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(
        submits: impl IntoIterator<Item = Result<CommandId, BackendError>>,
        statuses: impl IntoIterator<Item = Result<StatusReply, BackendError>>,
    ) -> Self {
        Self {
            submit_responses: Mutex::new(submits.into_iter().collect()),
            status_responses: Mutex::new(statuses.into_iter().collect()),
            submits: AtomicUsize::new(0),
            status_queries: AtomicUsize::new(0),
        }
    }

    pub fn submit_count(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn status_query_count(&self) -> usize {
        self.status_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandBackend for ScriptedBackend {
    async fn submit(&self, _target: &TargetId, _body: &TaskBody) -> Result<CommandId, BackendError> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        self.submit_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CommandId::generate()))
    }

    async fn status(
        &self,
        _command: &CommandId,
        _target: &TargetId,
    ) -> Result<StatusReply, BackendError> {
        self.status_queries.fetch_add(1, Ordering::SeqCst);
        self.status_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(BackendError::Protocol(
                    "scripted backend exhausted".to_string(),
                ))
            })
    }
}

/// Convenience for a pending status snapshot.
pub fn pending() -> Result<StatusReply, BackendError> {
    Ok(StatusReply {
        status: hostrun_core::CommandStatus::Pending,
        stdout: String::new(),
        stderr: String::new(),
    })
}

/// Convenience for a terminal status snapshot with captured streams.
pub fn terminal(
    status: hostrun_core::CommandStatus,
    stdout: &str,
    stderr: &str,
) -> Result<StatusReply, BackendError> {
    Ok(StatusReply {
        status,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    })
}

/// A one-instance inventory response.
pub fn one_instance(id: &str, address: &str) -> Result<Vec<InstanceRecord>, BackendError> {
    Ok(vec![InstanceRecord {
        id: TargetId::new(id),
        private_address: address.to_string(),
        public_address: None,
    }])
}
