//! Synchronous location API kept for call sites that predate the history-based
//! service.
//!
//! Only `path` works in both directions. `hash` is read-only, while `url` and
//! `search` fail on every call, reads included. The `url` read failing while
//! `path` reads succeed is inherited from the API this replaces and is kept on
//! purpose: unported callers must fail loudly at integration time. Every call is
//! traced before it succeeds or fails, through the configured logger or, when
//! none is set, as JSON lines on stderr.

use std::fmt;

use serde_json::{Value, json};

use crate::error::{NavError, Result};
use crate::history::HistoryAdapter;
use crate::query::{QueryPatch, QueryValue};

use super::LocationService;

/// Argument shapes the legacy `search` setter used to accept.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacySearch {
    Query(String),
    Params(QueryPatch),
    Param { key: String, value: QueryValue },
}

/// Successful legacy call: a plain value, or a handle for chaining after a set.
pub enum LegacyValue<'a, H: HistoryAdapter + 'static> {
    Value(String),
    Chain(LegacyLocation<'a, H>),
}

impl<'a, H: HistoryAdapter + 'static> LegacyValue<'a, H> {
    pub fn value(&self) -> Option<&str> {
        match self {
            LegacyValue::Value(value) => Some(value.as_str()),
            LegacyValue::Chain(_) => None,
        }
    }

    pub fn into_value(self) -> Option<String> {
        match self {
            LegacyValue::Value(value) => Some(value),
            LegacyValue::Chain(_) => None,
        }
    }

    pub fn chain(self) -> Option<LegacyLocation<'a, H>> {
        match self {
            LegacyValue::Chain(legacy) => Some(legacy),
            LegacyValue::Value(_) => None,
        }
    }

    pub fn is_chain(&self) -> bool {
        matches!(self, LegacyValue::Chain(_))
    }
}

impl<H: HistoryAdapter + 'static> fmt::Debug for LegacyValue<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegacyValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            LegacyValue::Chain(_) => f.write_str("Chain"),
        }
    }
}

pub struct LegacyLocation<'a, H: HistoryAdapter + 'static> {
    service: &'a LocationService<H>,
}

impl<H: HistoryAdapter + 'static> Clone for LegacyLocation<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: HistoryAdapter + 'static> Copy for LegacyLocation<'_, H> {}

impl<'a, H: HistoryAdapter + 'static> LegacyLocation<'a, H> {
    pub(super) fn new(service: &'a LocationService<H>) -> Self {
        Self { service }
    }

    /// Always fails, with or without an argument.
    pub fn url(&self, new_url: Option<&str>) -> Result<LegacyValue<'a, H>> {
        self.service.trace_legacy("url", args(new_url));
        Err(NavError::NotImplemented { method: "url" })
    }

    /// Reads the current hash; setting one fails.
    pub fn hash(&self, new_hash: Option<&str>) -> Result<LegacyValue<'a, H>> {
        self.service.trace_legacy("hash", args(new_hash));
        match non_empty(new_hash) {
            Some(_) => Err(NavError::NotImplemented { method: "hash" }),
            None => Ok(LegacyValue::Value(self.service.get_current_location().hash)),
        }
    }

    /// Reads the current pathname, or pushes `pathname` and returns a chain
    /// handle.
    pub fn path(&self, pathname: Option<&str>) -> Result<LegacyValue<'a, H>> {
        self.service.trace_legacy("path", args(pathname));
        match non_empty(pathname) {
            Some(pathname) => {
                self.service.push(pathname);
                Ok(LegacyValue::Chain(*self))
            }
            None => Ok(LegacyValue::Value(
                self.service.get_current_location().pathname,
            )),
        }
    }

    /// Always fails, with or without an argument.
    pub fn search(&self, search: Option<LegacySearch>) -> Result<LegacyValue<'a, H>> {
        let traced = search
            .as_ref()
            .map(|search| vec![json!(format!("{search:?}"))])
            .unwrap_or_default();
        self.service.trace_legacy("search", traced);
        Err(NavError::NotImplemented { method: "search" })
    }
}

// An empty string counts as "no argument", as it did for the old API.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn args(value: Option<&str>) -> Vec<Value> {
    value.map(|value| vec![json!(value)]).unwrap_or_default()
}
