//! Project manifest loading
//!
//! This module provides functionality to:
//! - Locate and read pyproject.toml in a project directory
//! - Collect declared requirement strings into a `DeclarationStore`
//! - Read `[tool.depscan]` configuration

mod declarations;
mod pyproject_toml;

pub use declarations::{DeclarationStore, DependencyGroup, CORE_GROUP};
pub use pyproject_toml::{PyprojectToml, ToolConfig};

use crate::error::ManifestError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Manifest file name
pub const MANIFEST_FILENAME: &str = "pyproject.toml";

/// A loaded project manifest
#[derive(Debug, Clone)]
pub struct ProjectManifest {
    /// Path to pyproject.toml
    pub path: PathBuf,
    /// Declared dependency groups
    pub declarations: DeclarationStore,
    /// `[tool.depscan]` section
    pub tool: ToolConfig,
}

impl ProjectManifest {
    /// Directory containing the manifest
    pub fn project_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }
}

/// Load pyproject.toml from `dir`
pub fn load_project(dir: &Path) -> Result<ProjectManifest, ManifestError> {
    let path = dir.join(MANIFEST_FILENAME);
    if !path.is_file() {
        return Err(ManifestError::not_found(path));
    }

    let content =
        std::fs::read_to_string(&path).map_err(|e| ManifestError::read_error(&path, e))?;
    let PyprojectToml { declarations, tool } = PyprojectToml::parse(&content, &path)?;

    debug!(
        path = %path.display(),
        groups = declarations.groups().len(),
        requirements = declarations.len(),
        "loaded manifest"
    );

    Ok(ProjectManifest {
        path,
        declarations,
        tool,
    })
}
