//! Loop headers and top-level constants

use super::expr::Expr;
use crate::shared::models::Span;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Index of a loop inside its `AccessModel` (0 is the outer loop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoopId(pub usize);

impl LoopId {
    pub const OUTER: LoopId = LoopId(0);
}

/// One `for <variable> in range(<lower>, <upper>)` header
///
/// The iteration space is the half-open interval `[lower, upper)`. Bounds are
/// evaluated in the scope enclosing the header, so they never see the loop's
/// own variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopSpec {
    pub id: LoopId,
    pub variable: String,
    pub lower: Expr,
    pub upper: Expr,
    /// Enclosing loop, `None` for the outer loop
    pub parent: Option<LoopId>,
    pub span: Span,
}

impl LoopSpec {
    pub fn new(id: LoopId, variable: impl Into<String>, lower: Expr, upper: Expr) -> Self {
        Self {
            id,
            variable: variable.into(),
            lower,
            upper,
            parent: None,
            span: Span::zero(),
        }
    }

    pub fn with_parent(mut self, parent: LoopId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_outer(&self) -> bool {
        self.parent.is_none()
    }
}

/// Integer constants assigned at the top level of the module
///
/// Visible to every bound and index expression with the same value in both
/// simulated threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantEnv {
    values: FxHashMap<String, i64>,
}

impl ConstantEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: i64) {
        self.values.insert(name.into(), value);
    }

    /// Forget a name (reassigned to something that does not fold)
    pub fn remove(&mut self, name: &str) {
        self.values.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    pub fn as_map(&self) -> &FxHashMap<String, i64> {
        &self.values
    }
}
