//! Verdicts and witnesses

use crate::errors::{AnalysisError, Result};
use crate::features::access_model::{Access, AccessKind};
use crate::features::smt::Model;
use crate::shared::models::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two conflict questions asked of every loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryKind {
    WriteWrite,
    ReadWrite,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::WriteWrite => "write-write",
            QueryKind::ReadWrite => "read-write",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where one side of a conflicting pair happens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessSite {
    pub kind: AccessKind,
    pub array: String,
    /// Index expression as written (normalized spacing)
    pub index: String,
    pub span: Span,
}

impl From<&Access> for AccessSite {
    fn from(access: &Access) -> Self {
        Self {
            kind: access.kind,
            array: access.array.clone(),
            index: access.index.to_string(),
            span: access.span,
        }
    }
}

impl fmt::Display for AccessSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}[{}] at {}", self.kind, self.array, self.index, self.span)
    }
}

/// Two accesses from distinct iterations that hit the same element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictWitness {
    /// Access performed by thread 0
    pub first: AccessSite,
    /// Access performed by thread 1
    pub second: AccessSite,
    /// Iteration variables, suffixed `_0` / `_1` by thread
    pub assignment: Model,
}

impl fmt::Display for ConflictWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thread 0 {}; thread 1 {}", self.first, self.second)?;
        if !self.assignment.is_empty() {
            let values: Vec<String> = self
                .assignment
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            write!(f, " [{}]", values.join(", "))?;
        }
        Ok(())
    }
}

/// Outcome of one query kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "kebab-case")]
pub enum ConflictVerdict {
    NoConflict,
    Conflict(ConflictWitness),
    /// The solver could not decide at least one pair and none was satisfiable
    Indeterminate(String),
}

impl ConflictVerdict {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ConflictVerdict::Conflict(_))
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, ConflictVerdict::Indeterminate(_))
    }

    pub fn witness(&self) -> Option<&ConflictWitness> {
        match self {
            ConflictVerdict::Conflict(witness) => Some(witness),
            _ => None,
        }
    }

    /// Boolean view; an indeterminate verdict is an error, never `false`
    pub fn as_bool(&self, query: QueryKind) -> Result<bool> {
        match self {
            ConflictVerdict::NoConflict => Ok(false),
            ConflictVerdict::Conflict(_) => Ok(true),
            ConflictVerdict::Indeterminate(reason) => Err(AnalysisError::IndeterminateConflict {
                query: query.to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

impl fmt::Display for ConflictVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictVerdict::NoConflict => write!(f, "no conflict"),
            ConflictVerdict::Conflict(_) => write!(f, "conflict"),
            ConflictVerdict::Indeterminate(reason) => write!(f, "indeterminate ({})", reason),
        }
    }
}

/// Both verdicts for one loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResult {
    pub write_write: ConflictVerdict,
    pub read_write: ConflictVerdict,
}

impl ConflictResult {
    /// Result for a loop with fewer than two iterations
    pub fn none() -> Self {
        Self {
            write_write: ConflictVerdict::NoConflict,
            read_write: ConflictVerdict::NoConflict,
        }
    }

    pub fn verdict(&self, query: QueryKind) -> &ConflictVerdict {
        match query {
            QueryKind::WriteWrite => &self.write_write,
            QueryKind::ReadWrite => &self.read_write,
        }
    }

    /// `(write_write_conflict, read_write_conflict)`
    pub fn as_bools(&self) -> Result<(bool, bool)> {
        Ok((
            self.write_write.as_bool(QueryKind::WriteWrite)?,
            self.read_write.as_bool(QueryKind::ReadWrite)?,
        ))
    }

    /// Safe to run iterations concurrently under the analyzed accesses
    pub fn is_parallelizable(&self) -> Result<bool> {
        let (write_write, read_write) = self.as_bools()?;
        Ok(!write_write && !read_write)
    }

    pub fn is_indeterminate(&self) -> bool {
        self.write_write.is_indeterminate() || self.read_write.is_indeterminate()
    }
}
