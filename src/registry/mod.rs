//! Package index adapters for fetching published versions
//!
//! This module provides:
//! - HTTP client shared foundation
//! - PyPI simple API adapter

mod client;
mod pypi;

pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use pypi::{SimpleIndex, PYPI_URL};

use crate::error::RegistryError;
use async_trait::async_trait;

/// Trait for package index adapters
#[async_trait]
pub trait PackageIndex: Send + Sync {
    /// Get the index name used in messages
    fn registry_name(&self) -> &str;

    /// Human-facing page for a package
    fn project_url(&self, package: &str) -> String;

    /// Fetch every published version string for a package
    async fn fetch_versions(&self, package: &str) -> Result<Vec<String>, RegistryError>;
}
