//! depscan - Python dependency constraint auditor library
//!
//! This library provides:
//! - PEP 440 versions and specifiers, PEP 508 requirement parsing
//! - Classification of declared constraints against a package index
//! - A build step that copies auxiliary files into the build tree

pub mod audit;
pub mod build;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
