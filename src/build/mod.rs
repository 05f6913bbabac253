//! Build pipeline steps
//!
//! This module provides:
//! - The `BuildStep` trait every stage of the packaging pipeline implements
//! - `CopyFilesStep`, which copies auxiliary files into the build tree and
//!   then hands over to the step it wraps
//! - `CommandStep`, which runs the host packaging command
//! - `NoopStep`, for when there is nothing to delegate to

mod command;
mod copy_files;

pub use command::CommandStep;
pub use copy_files::{BuildFileManifest, CopyFilesStep, FileEntry, PlannedCopy};

use crate::error::BuildError;
use std::path::{Path, PathBuf};

/// Default build output directory, relative to the project
pub const DEFAULT_BUILD_LIB: &str = "build/lib";

/// Shared state for one build run
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Project root; relative source paths resolve against it
    pub project_dir: PathBuf,
    /// Build output root
    pub build_lib: PathBuf,
    /// Report planned work without touching the filesystem
    pub dry_run: bool,
}

impl BuildContext {
    /// Create a context; a relative `build_lib` is taken relative to `project_dir`
    pub fn new(
        project_dir: impl Into<PathBuf>,
        build_lib: impl AsRef<Path>,
        dry_run: bool,
    ) -> Self {
        let project_dir = project_dir.into();
        let build_lib = project_dir.join(build_lib);
        Self {
            project_dir,
            build_lib,
            dry_run,
        }
    }
}

/// One stage of the build pipeline
pub trait BuildStep {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Run this step
    fn run(&self, ctx: &BuildContext) -> Result<(), BuildError>;
}

impl<S: BuildStep + ?Sized> BuildStep for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(&self, ctx: &BuildContext) -> Result<(), BuildError> {
        (**self).run(ctx)
    }
}

/// A step that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStep;

impl BuildStep for NoopStep {
    fn name(&self) -> &str {
        "noop"
    }

    fn run(&self, _ctx: &BuildContext) -> Result<(), BuildError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_relative_build_lib() {
        let ctx = BuildContext::new("/project", "build/lib", false);
        assert_eq!(ctx.build_lib, PathBuf::from("/project/build/lib"));
    }

    #[test]
    fn test_context_absolute_build_lib() {
        let ctx = BuildContext::new("/project", "/tmp/out", true);
        assert_eq!(ctx.build_lib, PathBuf::from("/tmp/out"));
        assert!(ctx.dry_run);
    }

    #[test]
    fn test_noop_step() {
        let ctx = BuildContext::new("/project", DEFAULT_BUILD_LIB, false);
        assert!(NoopStep.run(&ctx).is_ok());
        assert_eq!(NoopStep.name(), "noop");
    }

    #[test]
    fn test_boxed_step() {
        let step: Box<dyn BuildStep> = Box::new(NoopStep);
        let ctx = BuildContext::new("/project", DEFAULT_BUILD_LIB, false);
        assert!(step.run(&ctx).is_ok());
        assert_eq!(step.name(), "noop");
    }
}
