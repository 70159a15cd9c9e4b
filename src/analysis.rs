//! Analysis results and the service that produces them.
//!
//! The pipeline only reads the decision, amount, explanation and clause
//! references of a result to build narration text.

use crate::error::{Result, VoiceError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

static NEXT_RESULT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one received result.
///
/// Assigned when a payload is constructed or deserialized; clones keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResultId(u64);

impl ResultId {
    /// Allocate a fresh identity.
    pub fn next() -> Self {
        Self(NEXT_RESULT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "result-{}", self.0)
    }
}

/// A JSON scalar interpolated as written: strings without quotes,
/// numbers and booleans in their JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonScalar(pub serde_json::Value);

impl fmt::Display for JsonScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<serde_json::Value> for JsonScalar {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl From<&str> for JsonScalar {
    fn from(value: &str) -> Self {
        Self(serde_json::Value::String(value.to_string()))
    }
}

impl From<u32> for JsonScalar {
    fn from(value: u32) -> Self {
        Self(serde_json::Value::from(value))
    }
}

/// A policy clause cited in support of a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseRef {
    pub clause: String,
    pub document: String,
    pub page: JsonScalar,
}

impl ClauseRef {
    pub fn new(
        clause: impl Into<String>,
        document: impl Into<String>,
        page: impl Into<JsonScalar>,
    ) -> Self {
        Self {
            clause: clause.into(),
            document: document.into(),
            page: page.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Justification {
    pub explanation: String,
    #[serde(default)]
    pub clauses: Vec<ClauseRef>,
}

/// Structured answer returned by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    #[serde(skip, default = "ResultId::next")]
    id: ResultId,
    pub decision: String,
    pub amount: JsonScalar,
    pub justification: Justification,
}

impl ResultPayload {
    pub fn new(
        decision: impl Into<String>,
        amount: impl Into<JsonScalar>,
        justification: Justification,
    ) -> Self {
        Self {
            id: ResultId::next(),
            decision: decision.into(),
            amount: amount.into(),
            justification,
        }
    }

    /// Parse a service response. Each parse yields a new identity.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn id(&self) -> ResultId {
        self.id
    }

    /// Copy of this payload with a new identity (a new arrival of equal content).
    pub fn fresh(&self) -> Self {
        Self {
            id: ResultId::next(),
            ..self.clone()
        }
    }
}

/// Remote service that analyses a query against uploaded documents.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn submit(
        &self,
        query: &str,
        files: &[PathBuf],
        user_id: Option<&str>,
    ) -> Result<ResultPayload>;
}

/// A request received by [`MockAnalysisService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub query: String,
    pub files: Vec<PathBuf>,
    pub user_id: Option<String>,
}

/// Mock service answering every query with a copy of a fixed payload.
#[derive(Debug, Clone)]
pub struct MockAnalysisService {
    response: ResultPayload,
    should_fail: bool,
    requests: Arc<Mutex<Vec<AnalysisRequest>>>,
}

impl MockAnalysisService {
    pub fn new(response: ResultPayload) -> Self {
        Self {
            response,
            should_fail: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure the mock to fail every request
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisService {
    async fn submit(
        &self,
        query: &str,
        files: &[PathBuf],
        user_id: Option<&str>,
    ) -> Result<ResultPayload> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(AnalysisRequest {
                query: query.to_string(),
                files: files.to_vec(),
                user_id: user_id.map(str::to_string),
            });
        if self.should_fail {
            return Err(VoiceError::Analysis {
                message: "mock analysis failure".to_string(),
            });
        }
        Ok(self.response.fresh())
    }
}
