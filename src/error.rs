//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues reading or parsing pyproject.toml
//! - ConstraintError: A declared requirement does not match the PEP 508 grammar
//! - VersionParseError: A version string is not a valid PEP 440 version
//! - RegistryError: Issues with package index communication
//! - BuildError: Failures in the build-file copy step or the wrapped build step
//! - ConfigError: Invalid CLI or `[tool.depscan]` configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package index related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Build step related errors
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to reading the project manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// A table or array has an unexpected shape
    #[error("invalid `{key}` in {path}: {message}")]
    InvalidSection {
        path: PathBuf,
        key: String,
        message: String,
    },
}

/// Errors raised while parsing a declared requirement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// The requirement string does not start with a valid project name
    #[error("invalid requirement '{requirement}': {message}")]
    InvalidRequirement { requirement: String, message: String },

    /// A clause has no recognizable comparison operator
    #[error("invalid version clause '{clause}'")]
    InvalidClause { clause: String },

    /// The version operand of a clause is not a valid version
    #[error("invalid version '{version}' in clause '{clause}'")]
    InvalidVersion { clause: String, version: String },

    /// `.*` suffix used with an operator other than `==` or `!=`
    #[error("wildcard only allowed with '==' or '!=' in clause '{clause}'")]
    InvalidWildcard { clause: String },

    /// `~=` with a single release segment
    #[error("compatible release clause '{clause}' needs at least two release segments")]
    InvalidCompatibleRelease { clause: String },
}

/// A version string that is not valid PEP 440
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid version: '{0}'")]
pub struct VersionParseError(pub String);

/// Errors related to package index communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in the index
    #[error("package '{package}' not found in {registry}")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed or returned a non-success status
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Invalid response body
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Request exceeded the configured timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to the build step
#[derive(Error, Debug)]
pub enum BuildError {
    /// A file listed in the build-file manifest does not exist
    #[error("source file not found: {path}")]
    MissingSource { path: PathBuf },

    /// Failed to create a directory in the build tree
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy a file into the build tree
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The wrapped build command could not be started
    #[error("failed to run build command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The wrapped build command exited unsuccessfully
    #[error("build command '{command}' failed with {status}")]
    CommandFailed { command: String, status: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Index URL is not an http(s) URL
    #[error("invalid index URL '{value}': expected an http:// or https:// URL")]
    InvalidIndexUrl { value: String },

    /// Zero timeout
    #[error("invalid timeout '{value}': must be at least one second")]
    InvalidTimeout { value: u64 },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidSection error
    pub fn invalid_section(
        path: impl Into<PathBuf>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ManifestError::InvalidSection {
            path: path.into(),
            key: key.into(),
            message: message.into(),
        }
    }
}

impl ConstraintError {
    /// Creates a new InvalidRequirement error
    pub fn invalid_requirement(requirement: impl Into<String>, message: impl Into<String>) -> Self {
        ConstraintError::InvalidRequirement {
            requirement: requirement.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl BuildError {
    /// Creates a new MissingSource error
    pub fn missing_source(path: impl Into<PathBuf>) -> Self {
        BuildError::MissingSource { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("/path/to/pyproject.toml");
        let msg = format!("{}", err);
        assert!(msg.contains("manifest file not found"));
        assert!(msg.contains("pyproject.toml"));
    }

    #[test]
    fn test_manifest_error_toml_parse() {
        let err = ManifestError::toml_parse_error("/path/to/pyproject.toml", "invalid key");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse TOML"));
        assert!(msg.contains("invalid key"));
    }

    #[test]
    fn test_manifest_error_invalid_section() {
        let err = ManifestError::invalid_section(
            "pyproject.toml",
            "project.dependencies",
            "expected an array of strings",
        );
        let msg = format!("{}", err);
        assert!(msg.contains("project.dependencies"));
        assert!(msg.contains("expected an array"));
    }

    #[test]
    fn test_constraint_error_invalid_requirement() {
        let err = ConstraintError::invalid_requirement(">=1.0", "missing project name");
        let msg = format!("{}", err);
        assert!(msg.contains("invalid requirement '>=1.0'"));
        assert!(msg.contains("missing project name"));
    }

    #[test]
    fn test_constraint_error_invalid_version() {
        let err = ConstraintError::InvalidVersion {
            clause: ">=abc".to_string(),
            version: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "invalid version 'abc' in clause '>=abc'");
    }

    #[test]
    fn test_version_parse_error() {
        let err = VersionParseError("1.0-foo-bar".to_string());
        assert_eq!(err.to_string(), "invalid version: '1.0-foo-bar'");
    }

    #[test]
    fn test_registry_error_package_not_found() {
        let err = RegistryError::package_not_found("nonexistent-package", "PyPI");
        let msg = format!("{}", err);
        assert!(msg.contains("package 'nonexistent-package' not found"));
        assert!(msg.contains("PyPI"));
    }

    #[test]
    fn test_registry_error_network() {
        let err = RegistryError::network_error("requests", "PyPI", "HTTP 503");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("HTTP 503"));
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("flask", "PyPI");
        let msg = format!("{}", err);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("flask"));
    }

    #[test]
    fn test_build_error_missing_source() {
        let err = BuildError::missing_source("AUTHORS.md");
        assert_eq!(err.to_string(), "source file not found: AUTHORS.md");
    }

    #[test]
    fn test_config_error_invalid_index_url() {
        let err = ConfigError::InvalidIndexUrl {
            value: "ftp://example".to_string(),
        };
        assert!(err.to_string().contains("ftp://example"));
    }

    #[test]
    fn test_app_error_from_build_error() {
        let app_err: AppError = BuildError::missing_source("LICENSE.txt").into();
        assert!(app_err.to_string().contains("LICENSE.txt"));
    }

    #[test]
    fn test_app_error_from_manifest_error() {
        let app_err: AppError = ManifestError::not_found("/path").into();
        assert!(app_err.to_string().contains("manifest file not found"));
    }
}
