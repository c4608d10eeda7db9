// ABOUTME: Introspected GraphQL schema snapshot with a persisted 24h cache
// ABOUTME: Lookup helpers, injectable clock and the once-per-client load guard

use chrono::{DateTime, Utc};
use log::{debug, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::constants::schema::SCHEMA_TTL;
use crate::error::LinearError;
use crate::storage::write_atomic;

pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "ofType")]
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// First non-empty name along the `ofType` chain.
    pub fn base_name(&self) -> Option<&str> {
        let mut current = Some(self);
        while let Some(type_ref) = current {
            if let Some(name) = type_ref.name.as_deref().filter(|name| !name.is_empty()) {
                return Some(name);
            }
            current = type_ref.of_type.as_deref();
        }
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaArg {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub args: Vec<SchemaArg>,
    #[serde(rename = "type", default)]
    pub type_ref: TypeRef,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<SchemaArg>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<SchemaArg>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

impl TypeInfo {
    pub fn new(fields: Vec<SchemaField>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub fetched_at: DateTime<Utc>,
    #[serde(default)]
    pub query: TypeInfo,
    #[serde(default)]
    pub issue: TypeInfo,
    #[serde(default)]
    pub comment: TypeInfo,
    #[serde(default)]
    pub user: TypeInfo,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub types: BTreeMap<String, TypeInfo>,
}

impl SchemaSnapshot {
    pub fn new(fetched_at: DateTime<Utc>) -> Self {
        Self {
            fetched_at,
            query: TypeInfo::default(),
            issue: TypeInfo::default(),
            comment: TypeInfo::default(),
            user: TypeInfo::default(),
            types: BTreeMap::new(),
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match now.signed_duration_since(self.fetched_at).to_std() {
            Ok(age) => age < SCHEMA_TTL,
            // fetched_at in the future
            Err(_) => true,
        }
    }

    /// Base type name of `arg` on root query field `field`, both matched case-insensitively.
    pub fn arg_base_type(&self, field: &str, arg: &str) -> Option<String> {
        self.query
            .field(field)?
            .args
            .iter()
            .find(|candidate| candidate.name.eq_ignore_ascii_case(arg))?
            .type_ref
            .base_name()
            .map(str::to_string)
    }

    /// One of the four types introspected with the root query.
    pub fn bucket(&self, type_name: &str) -> Option<&TypeInfo> {
        match type_name.to_ascii_lowercase().as_str() {
            "query" => Some(&self.query),
            "issue" => Some(&self.issue),
            "comment" => Some(&self.comment),
            "user" => Some(&self.user),
            _ => None,
        }
    }

    /// Entry in the per-type map. An empty entry records a type the server does not have.
    pub fn extension(&self, type_name: &str) -> Option<&TypeInfo> {
        self.types
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(type_name))
            .map(|(_, info)| info)
    }

    /// Field list for `type_name`, when the snapshot knows the type.
    pub fn type_info(&self, type_name: &str) -> Option<&TypeInfo> {
        self.bucket(type_name)
            .or_else(|| self.extension(type_name).filter(|info| !info.fields.is_empty()))
    }

    /// Bucket first; a miss there falls through to the per-type map.
    pub fn field(&self, type_name: &str, field: &str) -> Option<&SchemaField> {
        self.bucket(type_name)
            .and_then(|info| info.field(field))
            .or_else(|| self.extension(type_name)?.field(field))
    }

    pub fn has_field(&self, type_name: &str, field: &str) -> bool {
        self.field(type_name, field).is_some()
    }

    pub fn insert_type(&mut self, type_name: impl Into<String>, info: TypeInfo) {
        self.types.insert(type_name.into(), info);
    }
}

/// Persisted snapshot location plus the clock used to judge staleness.
#[derive(Debug, Clone)]
pub struct SchemaCache {
    path: Option<PathBuf>,
    clock: Arc<dyn Clock>,
}

impl SchemaCache {
    pub fn new(path: Option<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self { path, clock }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Unreadable or corrupt files read as missing.
    pub fn read(&self) -> Option<SchemaSnapshot> {
        let path = self.path.as_deref()?;
        let contents = fs::read(path).ok()?;
        match serde_json::from_slice(&contents) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                debug!("ignoring unreadable schema cache {}: {err}", path.display());
                None
            }
        }
    }

    /// Persist failures are logged and otherwise ignored.
    pub fn persist(&self, snapshot: &SchemaSnapshot) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        let result = serde_json::to_vec_pretty(snapshot)
            .map_err(std::io::Error::other)
            .and_then(|contents| write_atomic(path, &contents));
        match result {
            Ok(()) => debug!("saved schema cache to {}", path.display()),
            Err(err) => warn!("failed to save schema cache {}: {err}", path.display()),
        }
    }

    pub async fn load<F, Fut>(&self, fetch: F) -> Result<SchemaSnapshot, LinearError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SchemaSnapshot, LinearError>>,
    {
        if self.path.is_none() {
            return fetch().await;
        }

        match self.read() {
            Some(cached) if cached.is_fresh(self.now()) => {
                debug!("schema cache hit (fetched {})", cached.fetched_at);
                Ok(cached)
            }
            Some(stale) => match fetch().await {
                Ok(fresh) => {
                    debug!("schema cache refreshed");
                    self.persist(&fresh);
                    Ok(fresh)
                }
                Err(err) => {
                    warn!("schema refresh failed, using copy from {}: {err}", stale.fetched_at);
                    Ok(stale)
                }
            },
            None => {
                debug!("schema cache miss");
                let fresh = fetch().await?;
                self.persist(&fresh);
                Ok(fresh)
            }
        }
    }
}

#[derive(Debug)]
enum SchemaState {
    Unloaded,
    Loading,
    Ready(Option<SchemaSnapshot>),
}

enum Claim {
    Ready(bool),
    Wait,
    Load,
}

/// Runs the schema load at most once; concurrent callers wait for the in-flight load.
#[derive(Debug)]
pub(crate) struct SchemaGuard {
    state: Mutex<SchemaState>,
    loaded: Notify,
}

impl Default for SchemaGuard {
    fn default() -> Self {
        Self {
            state: Mutex::new(SchemaState::Unloaded),
            loaded: Notify::new(),
        }
    }
}

/// Puts the state back to `Unloaded` if a load future is dropped before finishing.
struct LoadInProgress<'a> {
    guard: &'a SchemaGuard,
    finished: bool,
}

impl Drop for LoadInProgress<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        {
            let mut state = self.guard.state.lock();
            if matches!(*state, SchemaState::Loading) {
                *state = SchemaState::Unloaded;
            }
        }
        self.guard.loaded.notify_waiters();
    }
}

impl SchemaGuard {
    /// Returns whether a snapshot is available after the (single) load.
    pub(crate) async fn ensure<F, Fut>(&self, load: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<SchemaSnapshot>>,
    {
        let mut load = Some(load);
        loop {
            let notified = self.loaded.notified();
            let claim = {
                let mut state = self.state.lock();
                match &*state {
                    SchemaState::Ready(snapshot) => Claim::Ready(snapshot.is_some()),
                    SchemaState::Loading => Claim::Wait,
                    SchemaState::Unloaded => {
                        *state = SchemaState::Loading;
                        Claim::Load
                    }
                }
            };

            match claim {
                Claim::Ready(present) => return present,
                Claim::Wait => notified.await,
                Claim::Load => {
                    let Some(load) = load.take() else {
                        return false;
                    };
                    let mut in_progress = LoadInProgress {
                        guard: self,
                        finished: false,
                    };
                    let snapshot = load().await;
                    let present = snapshot.is_some();
                    *self.state.lock() = SchemaState::Ready(snapshot);
                    in_progress.finished = true;
                    self.loaded.notify_waiters();
                    return present;
                }
            }
        }
    }

    pub(crate) fn with_snapshot<R>(&self, read: impl FnOnce(&SchemaSnapshot) -> R) -> Option<R> {
        match &*self.state.lock() {
            SchemaState::Ready(Some(snapshot)) => Some(read(snapshot)),
            _ => None,
        }
    }

    /// Apply `change` to the loaded snapshot and return a copy for persisting.
    pub(crate) fn update(&self, change: impl FnOnce(&mut SchemaSnapshot)) -> Option<SchemaSnapshot> {
        match &mut *self.state.lock() {
            SchemaState::Ready(Some(snapshot)) => {
                change(snapshot);
                Some(snapshot.clone())
            }
            _ => None,
        }
    }

    /// Forget the loaded (or failed) schema so the next lookup loads again.
    pub(crate) fn invalidate(&self) {
        let mut state = self.state.lock();
        if matches!(*state, SchemaState::Ready(_)) {
            *state = SchemaState::Unloaded;
        }
    }
}
