//! Declared dependency structures

use super::{Constraint, Version};
use crate::error::ConstraintError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

// PEP 508 name, optional extras, then everything up to the marker
static REQUIREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[([^\]]*)\])?\s*(.*)$")
        .unwrap()
});

static NAME_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// Normalize a project name (PEP 503): lowercase, separator runs become `-`
pub fn normalize_name(name: &str) -> String {
    NAME_SEPARATOR_RE
        .replace_all(name, "-")
        .to_ascii_lowercase()
}

/// One declared dependency, e.g. `requests[socks]>=2.28.2,<3; python_version >= "3.8"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Project name as declared
    pub name: String,
    /// Requested extras
    pub extras: Vec<String>,
    /// Version constraint (may be unconstrained)
    pub constraint: Constraint,
    /// Environment marker after `;`, if any
    pub marker: Option<String>,
    /// The declaration as written
    pub raw: String,
}

impl DependencySpec {
    /// Parse a PEP 508 requirement string
    pub fn parse(requirement: &str) -> Result<Self, ConstraintError> {
        let raw = requirement.trim();

        let (body, marker) = match raw.split_once(';') {
            Some((body, marker)) => (body.trim(), Some(marker.trim().to_string())),
            None => (raw, None),
        };

        let caps = REQUIREMENT_RE.captures(body).ok_or_else(|| {
            ConstraintError::invalid_requirement(raw, "expected a project name")
        })?;

        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        if name.is_empty() {
            return Err(ConstraintError::invalid_requirement(
                raw,
                "expected a project name",
            ));
        }

        let extras = caps
            .get(2)
            .map(|m| {
                m.as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let rest = caps.get(3).map(|m| m.as_str()).unwrap_or_default().trim();
        if rest.starts_with('@') {
            return Err(ConstraintError::invalid_requirement(
                raw,
                "direct URL references have no version constraint",
            ));
        }

        // `name (>=1.0)` is an older but valid spelling
        let rest = rest
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .unwrap_or(rest);

        let constraint = Constraint::parse(rest)?;

        Ok(Self {
            name: name.to_string(),
            extras,
            constraint,
            marker,
            raw: raw.to_string(),
        })
    }

    /// PEP 503 normalized name; two declarations naming the same project
    /// compare equal here whatever their spelling
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Operand of the first `>=` clause
    pub fn lower_bound(&self) -> Option<&Version> {
        self.constraint.lower_bound()
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
