//! Dispatch tables and the error-containment boundary around handlers.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, warn};

use crate::command::{Command, CommandContext};
use crate::reply::Reply;

/// Lookup key of a grouped command: `sub` or `subgroup/sub`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchKey(String);

impl DispatchKey {
    /// Build the key for a subcommand, optionally inside a subgroup.
    pub fn new(group: Option<&str>, subcommand: &str) -> Self {
        match group {
            Some(group) => Self(format!("{group}/{subcommand}")),
            None => Self(subcommand.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What happened to a dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran to completion.
    Handled,
    /// No handler matched; a "not found" reply was sent.
    NotFound,
    /// The handler failed; an "execution failed" reply was sent.
    Failed,
}

/// Handlers of one command group, keyed by [`DispatchKey`].
///
/// Written once by the loader, read-only afterwards.
#[derive(Clone, Default)]
pub struct DispatchTable {
    handlers: HashMap<DispatchKey, Arc<dyn Command>>,
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("keys", &self.keys())
            .finish()
    }
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a handler. Returns `false` and leaves the table unchanged if
    /// the key is already taken.
    pub(crate) fn insert(&mut self, key: DispatchKey, handler: Arc<dyn Command>) -> bool {
        if self.handlers.contains_key(&key) {
            return false;
        }
        self.handlers.insert(key, handler);
        true
    }

    pub fn get(&self, key: &DispatchKey) -> Option<&Arc<dyn Command>> {
        self.handlers.get(key)
    }

    pub fn contains(&self, key: &DispatchKey) -> bool {
        self.handlers.contains_key(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<&DispatchKey> {
        let mut keys: Vec<_> = self.handlers.keys().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Route a request to the handler registered under `group`/`subcommand`.
///
/// Never fails: unknown keys get a "not found" reply and handler failures
/// are contained by [`run_contained`].
pub async fn dispatch(
    table: &DispatchTable,
    group: Option<&str>,
    subcommand: &str,
    ctx: &CommandContext,
) -> DispatchOutcome {
    let key = DispatchKey::new(group, subcommand);

    let Some(handler) = table.get(&key) else {
        warn!("No handler for {} ({})", key, ctx.interaction().path());
        send_fallback(ctx, Reply::not_found()).await;
        return DispatchOutcome::NotFound;
    };

    run_contained(&key, handler.as_ref(), ctx).await
}

/// Run a handler, converting any error or panic into a logged failure and a
/// generic reply.
///
/// The whole handler future runs inside the guard, including every await
/// point.
pub async fn run_contained(
    key: &DispatchKey,
    handler: &dyn Command,
    ctx: &CommandContext,
) -> DispatchOutcome {
    debug!("Dispatching {}", key);

    let failure = match AssertUnwindSafe(handler.invoke(ctx)).catch_unwind().await {
        Ok(Ok(())) => return DispatchOutcome::Handled,
        Ok(Err(e)) => e.to_string(),
        Err(panic) => format!("handler panicked: {}", panic_message(panic.as_ref())),
    };

    error!(key = %key, "Execution error for {}: {}", key, failure);
    send_fallback(ctx, Reply::execution_failed()).await;
    DispatchOutcome::Failed
}

async fn send_fallback(ctx: &CommandContext, reply: Reply) {
    if let Err(e) = ctx.reply(reply).await {
        warn!("Failed to send fallback reply: {}", e);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
