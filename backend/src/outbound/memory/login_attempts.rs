//! Process-local failed-login records.
//!
//! Stale records are swept on `save` once the table reaches a high-water
//! mark, so addresses that fail once and never return do not pile up.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{LoginAttemptStore, LoginAttemptStoreError};
use crate::domain::{EmailAddress, LoginAttempts, LoginThrottlePolicy};

/// Table size that triggers the first sweep.
const MIN_SWEEP_AT: usize = 1024;

#[derive(Debug)]
struct Table {
    records: HashMap<String, LoginAttempts>,
    sweep_at: usize,
}

impl Table {
    fn sweep(&mut self, policy: &LoginThrottlePolicy, now: DateTime<Utc>) {
        let before = self.records.len();
        self.records.retain(|_, attempts| !policy.is_stale(attempts, now));
        self.sweep_at = (self.records.len() * 2).max(MIN_SWEEP_AT);
        debug!(
            evicted = before - self.records.len(),
            kept = self.records.len(),
            "swept stale login failures"
        );
    }
}

/// [`LoginAttemptStore`] keyed by normalised email.
#[derive(Debug, Clone)]
pub struct InMemoryLoginAttemptStore {
    policy: LoginThrottlePolicy,
    table: Arc<RwLock<Table>>,
}

impl InMemoryLoginAttemptStore {
    /// Store whose records expire under `policy`.
    #[must_use]
    pub fn new(policy: LoginThrottlePolicy) -> Self {
        Self::with_sweep_threshold(policy, MIN_SWEEP_AT)
    }

    fn with_sweep_threshold(policy: LoginThrottlePolicy, sweep_at: usize) -> Self {
        Self {
            policy,
            table: Arc::new(RwLock::new(Table {
                records: HashMap::new(),
                sweep_at,
            })),
        }
    }
}

#[async_trait]
impl LoginAttemptStore for InMemoryLoginAttemptStore {
    async fn load(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<LoginAttempts>, LoginAttemptStoreError> {
        Ok(self.table.read().await.records.get(email.as_ref()).cloned())
    }

    async fn save(
        &self,
        email: &EmailAddress,
        attempts: &LoginAttempts,
    ) -> Result<(), LoginAttemptStoreError> {
        let mut table = self.table.write().await;
        table
            .records
            .insert(email.as_ref().to_owned(), attempts.clone());
        if table.records.len() >= table.sweep_at {
            // The record being saved is always fresh, so its timestamp is "now".
            table.sweep(&self.policy, attempts.last_failure_at);
        }
        Ok(())
    }

    async fn clear(&self, email: &EmailAddress) -> Result<(), LoginAttemptStoreError> {
        self.table.write().await.records.remove(email.as_ref());
        Ok(())
    }
}
