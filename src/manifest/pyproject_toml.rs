//! pyproject.toml reader
//!
//! Handles:
//! - project.dependencies (PEP 621), as the `core` group
//! - project.optional-dependencies (PEP 621), one group per extra
//! - tool.depscan (index URL, timeout, build files)

use super::declarations::{DeclarationStore, DependencyGroup, CORE_GROUP};
use crate::build::BuildFileManifest;
use crate::error::ManifestError;
use serde::Deserialize;
use std::path::Path;
use toml::{Table, Value};

/// `[tool.depscan]` settings; absent keys fall back to built-in defaults later
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolConfig {
    /// Package index base URL
    pub index_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout: Option<u64>,
    /// Target directory → files to copy during `build`
    pub build_files: BuildFileManifest,
}

/// The parts of pyproject.toml this tool reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PyprojectToml {
    pub declarations: DeclarationStore,
    pub tool: ToolConfig,
}

impl PyprojectToml {
    /// Parse manifest content; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let root: Table = toml::from_str(content)
            .map_err(|e| ManifestError::toml_parse_error(path, e.message()))?;

        let declarations = parse_declarations(&root, path)?;
        let tool = parse_tool_config(&root, path)?;

        Ok(Self { declarations, tool })
    }
}

fn parse_declarations(root: &Table, path: &Path) -> Result<DeclarationStore, ManifestError> {
    let project = match root.get("project") {
        Some(Value::Table(project)) => Some(project),
        Some(_) => {
            return Err(ManifestError::invalid_section(
                path,
                "project",
                "expected a table",
            ))
        }
        None => None,
    };

    let core = match project.and_then(|p| p.get("dependencies")) {
        Some(value) => string_array(value, path, "project.dependencies")?,
        None => Vec::new(),
    };
    let mut groups = vec![DependencyGroup::new(CORE_GROUP, core)];

    if let Some(optional) = project.and_then(|p| p.get("optional-dependencies")) {
        let Value::Table(extras) = optional else {
            return Err(ManifestError::invalid_section(
                path,
                "project.optional-dependencies",
                "expected a table of arrays",
            ));
        };

        for (extra, value) in extras {
            let key = format!("project.optional-dependencies.{}", extra);
            groups.push(DependencyGroup::new(
                extra.clone(),
                string_array(value, path, &key)?,
            ));
        }
    }

    Ok(DeclarationStore::new(groups))
}

fn parse_tool_config(root: &Table, path: &Path) -> Result<ToolConfig, ManifestError> {
    let Some(section) = root.get("tool").and_then(|t| t.get("depscan")) else {
        return Ok(ToolConfig::default());
    };

    section
        .clone()
        .try_into()
        .map_err(|e: toml::de::Error| {
            ManifestError::invalid_section(path, "tool.depscan", e.message())
        })
}

fn string_array(value: &Value, path: &Path, key: &str) -> Result<Vec<String>, ManifestError> {
    let Value::Array(items) = value else {
        return Err(ManifestError::invalid_section(
            path,
            key,
            "expected an array of strings",
        ));
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| {
                    ManifestError::invalid_section(path, key, "expected an array of strings")
                })
        })
        .collect()
}
