//! Copy auxiliary files into the build tree before the wrapped build step
//!
//! The manifest maps a target directory (relative to the build output root)
//! to a list of entries. A bare path is copied to the same relative path
//! under the target directory; a `{ source, dest }` pair is copied under a
//! new name. Every source is checked before anything is written, so a
//! missing file leaves the build tree untouched.

use super::{BuildContext, BuildStep};
use crate::error::BuildError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One file to copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileEntry {
    /// Copied to the same relative path under the target directory
    Bare(PathBuf),
    /// Copied with renaming
    Renamed { source: PathBuf, dest: PathBuf },
}

impl FileEntry {
    /// Source path as declared
    pub fn source(&self) -> &Path {
        match self {
            FileEntry::Bare(path) => path,
            FileEntry::Renamed { source, .. } => source,
        }
    }

    /// Destination path relative to the target directory
    pub fn dest(&self) -> &Path {
        match self {
            FileEntry::Bare(path) => path,
            FileEntry::Renamed { dest, .. } => dest,
        }
    }
}

/// Target directory → files to place there
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildFileManifest(BTreeMap<String, Vec<FileEntry>>);

impl BuildFileManifest {
    /// Creates an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds entries for a target directory (builder pattern)
    pub fn with_target(mut self, target: impl Into<String>, entries: Vec<FileEntry>) -> Self {
        self.0.entry(target.into()).or_default().extend(entries);
        self
    }

    /// Returns true if no files are listed
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Number of listed files
    pub fn file_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Iterate targets in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<FileEntry>)> {
        self.0.iter()
    }
}

/// A resolved copy operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
    /// Absolute or project-relative source
    pub source: PathBuf,
    /// Destination inside the build tree
    pub destination: PathBuf,
}

/// Build step decorator: copy the manifest's files, then run `inner`
pub struct CopyFilesStep<S> {
    files: BuildFileManifest,
    inner: S,
}

impl<S: BuildStep> CopyFilesStep<S> {
    /// Wrap `inner` so the manifest's files are copied first
    pub fn new(files: BuildFileManifest, inner: S) -> Self {
        Self { files, inner }
    }

    /// The wrapped step
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Resolve every entry and check that all sources exist
    pub fn plan(&self, ctx: &BuildContext) -> Result<Vec<PlannedCopy>, BuildError> {
        let mut planned = Vec::with_capacity(self.files.file_count());

        for (target, entries) in self.files.iter() {
            let target_dir = ctx.build_lib.join(target);
            for entry in entries {
                let source = ctx.project_dir.join(entry.source());
                if !source.is_file() {
                    return Err(BuildError::missing_source(source));
                }
                planned.push(PlannedCopy {
                    source,
                    destination: target_dir.join(entry.dest()),
                });
            }
        }

        Ok(planned)
    }

    fn execute(&self, ctx: &BuildContext, planned: &[PlannedCopy]) -> Result<(), BuildError> {
        // Every listed target exists afterwards, even one without entries
        for (target, _) in self.files.iter() {
            create_dir(&ctx.build_lib.join(target))?;
        }

        for copy in planned {
            if let Some(parent) = copy.destination.parent() {
                create_dir(parent)?;
            }

            copy_preserving_times(&copy.source, &copy.destination).map_err(|source| {
                BuildError::Copy {
                    from: copy.source.clone(),
                    to: copy.destination.clone(),
                    source,
                }
            })?;
            info!(from = %copy.source.display(), to = %copy.destination.display(), "copied");
        }
        Ok(())
    }
}

impl<S: BuildStep> BuildStep for CopyFilesStep<S> {
    fn name(&self) -> &str {
        "copy-files"
    }

    fn run(&self, ctx: &BuildContext) -> Result<(), BuildError> {
        let planned = self.plan(ctx)?;

        for copy in &planned {
            let verb = if ctx.dry_run { "Would copy" } else { "Copying" };
            println!(
                "{} {} to {}",
                verb,
                copy.source.display(),
                copy.destination.display()
            );
        }

        if !ctx.dry_run {
            self.execute(ctx, &planned)?;
        }

        debug!(step = self.inner.name(), "delegating to wrapped build step");
        self.inner.run(ctx)
    }
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|source| BuildError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy contents, times and permissions.
///
/// Times are set through the handle that wrote the contents and permissions
/// go last, so a read-only source still copies. A destination left read-only
/// by an earlier run is replaced rather than opened for writing.
fn copy_preserving_times(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from)?;
    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    match fs::remove_file(to) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut reader = File::open(from)?;
    let mut writer = File::create(to)?;
    io::copy(&mut reader, &mut writer)?;
    writer.set_times(times)?;
    drop(writer);

    fs::set_permissions(to, metadata.permissions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::NoopStep;
    use std::cell::Cell;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    /// Records whether it was invoked
    #[derive(Default)]
    struct RecordingStep {
        calls: Cell<usize>,
    }

    impl BuildStep for RecordingStep {
        fn name(&self) -> &str {
            "recording"
        }

        fn run(&self, _ctx: &BuildContext) -> Result<(), BuildError> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    fn project() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LICENSE.txt"), "license text").unwrap();
        fs::write(dir.path().join("AUTHORS.md"), "# Authors").unwrap();
        dir
    }

    #[test]
    fn test_file_entry_paths() {
        let bare = FileEntry::Bare(PathBuf::from("AUTHORS.md"));
        assert_eq!(bare.source(), Path::new("AUTHORS.md"));
        assert_eq!(bare.dest(), Path::new("AUTHORS.md"));

        let renamed = FileEntry::Renamed {
            source: PathBuf::from("docs/LICENSE"),
            dest: PathBuf::from("LICENSE.txt"),
        };
        assert_eq!(renamed.source(), Path::new("docs/LICENSE"));
        assert_eq!(renamed.dest(), Path::new("LICENSE.txt"));
    }

    #[test]
    fn test_manifest_deserialize() {
        let manifest: BuildFileManifest = toml::from_str(
            r#"
"pkg/templates/_data" = ["AUTHORS.md", { source = "LICENSE", dest = "LICENSE.txt" }]
"#,
        )
        .unwrap();

        assert_eq!(manifest.file_count(), 2);
        let (target, entries) = manifest.iter().next().unwrap();
        assert_eq!(target, "pkg/templates/_data");
        assert_eq!(entries[0], FileEntry::Bare(PathBuf::from("AUTHORS.md")));
        assert!(matches!(entries[1], FileEntry::Renamed { .. }));
    }

    #[test]
    fn test_manifest_empty() {
        assert!(BuildFileManifest::new().is_empty());
        assert!(BuildFileManifest::new().with_target("out", vec![]).is_empty());
    }

    #[test]
    fn test_copy_then_delegate() {
        let dir = project();
        let manifest = BuildFileManifest::new().with_target(
            "out",
            vec![FileEntry::Renamed {
                source: PathBuf::from("LICENSE.txt"),
                dest: PathBuf::from("LICENSE.txt"),
            }],
        );
        let step = CopyFilesStep::new(manifest, RecordingStep::default());
        let ctx = BuildContext::new(dir.path(), "build/lib", false);

        step.run(&ctx).unwrap();

        let copied = dir.path().join("build/lib/out/LICENSE.txt");
        assert_eq!(fs::read_to_string(copied).unwrap(), "license text");
        assert_eq!(step.inner().calls.get(), 1);
    }

    #[test]
    fn test_bare_entry_keeps_relative_path() {
        let dir = project();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/SUPPORTERS.md"), "thanks").unwrap();

        let manifest = BuildFileManifest::new()
            .with_target("data", vec![FileEntry::Bare(PathBuf::from("docs/SUPPORTERS.md"))]);
        let step = CopyFilesStep::new(manifest, NoopStep);
        let ctx = BuildContext::new(dir.path(), "build/lib", false);

        step.run(&ctx).unwrap();

        let copied = dir.path().join("build/lib/data/docs/SUPPORTERS.md");
        assert_eq!(fs::read_to_string(copied).unwrap(), "thanks");
    }

    #[test]
    fn test_existing_target_directory_is_fine() {
        let dir = project();
        fs::create_dir_all(dir.path().join("build/lib/out")).unwrap();

        let manifest = BuildFileManifest::new()
            .with_target("out", vec![FileEntry::Bare(PathBuf::from("AUTHORS.md"))]);
        let step = CopyFilesStep::new(manifest, NoopStep);
        let ctx = BuildContext::new(dir.path(), "build/lib", false);

        step.run(&ctx).unwrap();
        step.run(&ctx).unwrap();

        assert!(dir.path().join("build/lib/out/AUTHORS.md").is_file());
    }

    #[test]
    fn test_copy_preserves_modification_time() {
        let dir = project();
        let source = dir.path().join("AUTHORS.md");
        let past = SystemTime::now() - Duration::from_secs(3600 * 24 * 30);
        fs::OpenOptions::new()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(past)
            .unwrap();

        let manifest = BuildFileManifest::new()
            .with_target("out", vec![FileEntry::Bare(PathBuf::from("AUTHORS.md"))]);
        let step = CopyFilesStep::new(manifest, NoopStep);
        let ctx = BuildContext::new(dir.path(), "build/lib", false);
        step.run(&ctx).unwrap();

        let copied = fs::metadata(dir.path().join("build/lib/out/AUTHORS.md")).unwrap();
        let original = fs::metadata(&source).unwrap();
        assert_eq!(copied.modified().unwrap(), original.modified().unwrap());
    }

    #[test]
    fn test_missing_source_copies_nothing_and_skips_inner() {
        let dir = project();
        let manifest = BuildFileManifest::new()
            .with_target("a", vec![FileEntry::Bare(PathBuf::from("AUTHORS.md"))])
            .with_target("b", vec![FileEntry::Bare(PathBuf::from("MISSING.md"))]);
        let step = CopyFilesStep::new(manifest, RecordingStep::default());
        let ctx = BuildContext::new(dir.path(), "build/lib", false);

        let err = step.run(&ctx).unwrap_err();

        assert!(matches!(err, BuildError::MissingSource { .. }));
        assert!(err.to_string().contains("MISSING.md"));
        assert!(!dir.path().join("build").exists());
        assert_eq!(step.inner().calls.get(), 0);
    }

    #[test]
    fn test_dry_run_writes_nothing_but_delegates() {
        let dir = project();
        let manifest = BuildFileManifest::new()
            .with_target("out", vec![FileEntry::Bare(PathBuf::from("LICENSE.txt"))]);
        let step = CopyFilesStep::new(manifest, RecordingStep::default());
        let ctx = BuildContext::new(dir.path(), "build/lib", true);

        step.run(&ctx).unwrap();

        assert!(!dir.path().join("build").exists());
        assert_eq!(step.inner().calls.get(), 1);
    }

    #[test]
    fn test_plan_resolves_paths() {
        let dir = project();
        let manifest = BuildFileManifest::new().with_target(
            "out",
            vec![FileEntry::Renamed {
                source: PathBuf::from("AUTHORS.md"),
                dest: PathBuf::from("CREDITS.md"),
            }],
        );
        let step = CopyFilesStep::new(manifest, NoopStep);
        let ctx = BuildContext::new(dir.path(), "dist", true);

        let planned = step.plan(&ctx).unwrap();
        assert_eq!(
            planned,
            vec![PlannedCopy {
                source: dir.path().join("AUTHORS.md"),
                destination: dir.path().join("dist/out/CREDITS.md"),
            }]
        );
    }

    #[test]
    fn test_target_without_entries_is_created() {
        let dir = project();
        let manifest = BuildFileManifest::new()
            .with_target("empty/_data", vec![])
            .with_target("out", vec![FileEntry::Bare(PathBuf::from("AUTHORS.md"))]);
        let step = CopyFilesStep::new(manifest, NoopStep);
        let ctx = BuildContext::new(dir.path(), "build/lib", false);

        step.run(&ctx).unwrap();

        assert!(dir.path().join("build/lib/empty/_data").is_dir());
        assert!(dir.path().join("build/lib/out/AUTHORS.md").is_file());
    }

    #[test]
    fn test_target_without_entries_dry_run() {
        let dir = project();
        let manifest = BuildFileManifest::new().with_target("empty", vec![]);
        let step = CopyFilesStep::new(manifest, NoopStep);
        let ctx = BuildContext::new(dir.path(), "build/lib", true);

        step.run(&ctx).unwrap();
        assert!(!dir.path().join("build").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_source_copies_with_times_and_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = project();
        let source = dir.path().join("LICENSE.txt");
        let past = SystemTime::now() - Duration::from_secs(3600 * 24 * 7);
        fs::OpenOptions::new()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(past)
            .unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o444)).unwrap();

        let manifest = BuildFileManifest::new()
            .with_target("out", vec![FileEntry::Bare(PathBuf::from("LICENSE.txt"))]);
        let step = CopyFilesStep::new(manifest, NoopStep);
        let ctx = BuildContext::new(dir.path(), "build/lib", false);

        step.run(&ctx).unwrap();

        let copied = dir.path().join("build/lib/out/LICENSE.txt");
        let meta = fs::metadata(&copied).unwrap();
        assert_eq!(fs::read_to_string(&copied).unwrap(), "license text");
        assert_eq!(meta.permissions().mode() & 0o777, 0o444);
        assert_eq!(
            meta.modified().unwrap(),
            fs::metadata(&source).unwrap().modified().unwrap()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_source_second_run_overwrites() {
        use std::os::unix::fs::PermissionsExt;

        let dir = project();
        let source = dir.path().join("LICENSE.txt");
        fs::set_permissions(&source, fs::Permissions::from_mode(0o444)).unwrap();

        let manifest = BuildFileManifest::new()
            .with_target("out", vec![FileEntry::Bare(PathBuf::from("LICENSE.txt"))]);
        let step = CopyFilesStep::new(manifest, NoopStep);
        let ctx = BuildContext::new(dir.path(), "build/lib", false);
        step.run(&ctx).unwrap();

        fs::set_permissions(&source, fs::Permissions::from_mode(0o644)).unwrap();
        fs::write(&source, "updated license").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o444)).unwrap();
        step.run(&ctx).unwrap();

        let copied = dir.path().join("build/lib/out/LICENSE.txt");
        assert_eq!(fs::read_to_string(copied).unwrap(), "updated license");
    }

    #[test]
    fn test_empty_manifest_still_delegates() {
        let dir = project();
        let step = CopyFilesStep::new(BuildFileManifest::new(), RecordingStep::default());
        let ctx = BuildContext::new(dir.path(), "build/lib", false);

        step.run(&ctx).unwrap();
        assert_eq!(step.inner().calls.get(), 1);
    }
}
