//! Request-scoped, immutable value chain handed to providers and evaluators.
//!
//! A [`Context`] never changes once built. [`Context::with_value`] returns a
//! new context whose lookups see the new entry first and fall back to the
//! parent chain, so one compiled unit can serve many concurrent callers, each
//! carrying its own chain.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Entry>>,
    cancel: Option<CancellationToken>,
}

struct Entry {
    key: String,
    value: Value,
    parent: Option<Arc<Entry>>,
}

impl Context {
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_value(&self, key: impl Into<String>, value: Value) -> Self {
        Self {
            head: Some(Arc::new(Entry {
                key: key.into(),
                value,
                parent: self.head.clone(),
            })),
            cancel: self.cancel.clone(),
        }
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        let mut current = self.head.as_deref();
        while let Some(entry) = current {
            if entry.key == key {
                return Some(&entry.value);
            }
            current = entry.parent.as_deref();
        }
        None
    }

    /// Derives a cancellable context and the token that cancels it.
    ///
    /// The token is a child of any token already on `self`, so cancelling an
    /// ancestor still cancels the derived context.
    pub fn with_cancel(&self) -> (Self, CancellationToken) {
        let token = match &self.cancel {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        let context = Self {
            head: self.head.clone(),
            cancel: Some(token.clone()),
        };
        (context, token)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Token backends can await during long-running work.
    pub fn cancellation_token(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    /// Number of entries in the chain, shadowed ones included.
    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.head.as_deref();
        while let Some(entry) = current {
            depth += 1;
            current = entry.parent.as_deref();
        }
        depth
    }

    /// True when both contexts share the same chain head.
    #[cfg(test)]
    pub(crate) fn same_chain(&self, other: &Context) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = Vec::new();
        let mut current = self.head.as_deref();
        while let Some(entry) = current {
            keys.push(entry.key.as_str());
            current = entry.parent.as_deref();
        }
        f.debug_struct("Context")
            .field("keys", &keys)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
