//! Artifact locator and publisher
//!
//! After a packaging task finishes, the produced APK may sit in one of
//! several output directories depending on how the build was invoked. The
//! first existing candidate is copied to the destination directory under its
//! canonical name.
//!
//! A missing artifact is an expected outcome ([`PublishResult::NotFound`]),
//! reported to the user by the caller; I/O failures while copying are
//! returned as errors.

use crate::layout::ArtifactRef;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use weightcalc_core::config::OverwritePolicy;
use weightcalc_core::error::{Result, ResultExt};

/// Outcome of a publish invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishResult {
    /// The source was copied to the destination
    Copied {
        /// Candidate that was selected
        source: PathBuf,
        /// Canonical destination path
        dest: PathBuf,
        /// Number of bytes written
        bytes: u64,
    },
    /// The destination already held identical contents
    Unchanged {
        /// Candidate that was selected
        source: PathBuf,
        /// Canonical destination path
        dest: PathBuf,
    },
    /// No candidate exists; nothing was written
    NotFound {
        /// Every candidate that was checked, in order
        checked: Vec<PathBuf>,
    },
}

impl PublishResult {
    /// Whether an artifact was found (copied or already up to date)
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }
}

/// Existence report for one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateStatus {
    /// Candidate path
    pub path: PathBuf,
    /// File size when the candidate exists
    pub size: Option<u64>,
    /// Whether this candidate would be the publish source
    pub selected: bool,
}

impl CandidateStatus {
    /// Whether the candidate exists
    pub fn exists(&self) -> bool {
        self.size.is_some()
    }
}

/// Report every candidate without writing anything
pub fn locate(artifact: &ArtifactRef) -> Vec<CandidateStatus> {
    let mut selected_seen = false;

    artifact
        .candidates
        .iter()
        .map(|path| {
            let size = fs::metadata(path).ok().filter(|m| m.is_file()).map(|m| m.len());
            let selected = size.is_some() && !selected_seen;
            selected_seen |= selected;
            CandidateStatus {
                path: path.clone(),
                size,
                selected,
            }
        })
        .collect()
}

/// First existing candidate, in priority order
fn find_source(artifact: &ArtifactRef) -> Option<&Path> {
    for candidate in &artifact.candidates {
        let exists = candidate.is_file();
        debug!(variant = %artifact.variant, path = %candidate.display(), exists, "Checked candidate");
        if exists {
            return Some(candidate);
        }
    }
    None
}

/// Locate the variant's artifact and copy it under its canonical name
///
/// The destination directory is created when missing, and an existing
/// destination is overwritten unless `policy` is
/// [`OverwritePolicy::IfChanged`] and the contents already match.
pub fn publish(artifact: &ArtifactRef, policy: OverwritePolicy) -> Result<PublishResult> {
    let Some(source) = find_source(artifact) else {
        let checked = artifact.candidates.clone();
        debug!(
            variant = %artifact.variant,
            checked = ?checked,
            "No {} APK found to copy",
            artifact.variant
        );
        return Ok(PublishResult::NotFound { checked });
    };

    let dest = artifact.dest_path();

    if is_same_file(source, &dest) {
        debug!(path = %dest.display(), "Source is already the canonical artifact");
        return Ok(PublishResult::Unchanged {
            source: source.to_path_buf(),
            dest,
        });
    }

    if policy == OverwritePolicy::IfChanged && dest.is_file() && same_contents(source, &dest)? {
        info!(
            variant = %artifact.variant,
            dest = %dest.display(),
            "Canonical APK already up to date"
        );
        return Ok(PublishResult::Unchanged {
            source: source.to_path_buf(),
            dest,
        });
    }

    fs::create_dir_all(&artifact.dest_dir)
        .context(format!("Failed to create {}", artifact.dest_dir.display()))?;

    let bytes = fs::copy(source, &dest).context(format!(
        "Failed to copy {} to {}",
        source.display(),
        dest.display()
    ))?;

    info!(
        variant = %artifact.variant,
        source = %source.display(),
        dest = %dest.display(),
        bytes,
        "Copied {} → {}",
        file_name(source),
        artifact.dest_name
    );

    Ok(PublishResult::Copied {
        source: source.to_path_buf(),
        dest,
        bytes,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn same_contents(a: &Path, b: &Path) -> Result<bool> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }
    Ok(sha256_file(a)? == sha256_file(b)?)
}

/// Hex-encoded SHA-256 of a file's contents
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).context(format!("Failed to open {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).context(format!("Failed to read {}", path.display()))?;
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ArtifactLayout;
    use crate::variant::Variant;
    use tempfile::TempDir;
    use weightcalc_core::config::ConfigSchema;

    const APK_BYTES: &[u8] = &[0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x08, 0x00];

    fn setup() -> (TempDir, ArtifactLayout) {
        let temp = TempDir::new().unwrap();
        let layout = ArtifactLayout::from_config(&ConfigSchema::default(), Some(temp.path()));
        (temp, layout)
    }

    fn write(path: &Path, bytes: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_release_scenario_copies_flutter_output() {
        let (temp, layout) = setup();
        let build = temp.path();
        write(&build.join("outputs/flutter-apk/app-release.apk"), APK_BYTES);

        let artifact = layout.artifact(Variant::Release).unwrap();
        let result = publish(&artifact, OverwritePolicy::Always).unwrap();

        let dest = build.join("outputs/flutter-apk/WeightCalculator-release.apk");
        assert_eq!(
            result,
            PublishResult::Copied {
                source: build.join("outputs/flutter-apk/app-release.apk"),
                dest: dest.clone(),
                bytes: APK_BYTES.len() as u64,
            }
        );
        assert_eq!(fs::read(&dest).unwrap(), APK_BYTES);
    }

    #[test]
    fn test_first_candidate_wins_when_both_exist() {
        let (temp, layout) = setup();
        let build = temp.path();
        write(&build.join("outputs/flutter-apk/app-debug.apk"), b"flutter");
        write(&build.join("outputs/apk/debug/app-debug.apk"), b"vanilla");

        let artifact = layout.artifact(Variant::Debug).unwrap();
        let result = publish(&artifact, OverwritePolicy::Always).unwrap();

        match result {
            PublishResult::Copied { source, .. } => {
                assert_eq!(source, build.join("outputs/flutter-apk/app-debug.apk"));
            }
            other => panic!("expected Copied, got {:?}", other),
        }
        assert_eq!(fs::read(artifact.dest_path()).unwrap(), b"flutter");
    }

    #[test]
    fn test_second_candidate_used_when_first_missing() {
        let (temp, layout) = setup();
        let build = temp.path();
        write(&build.join("outputs/apk/release/app-release.apk"), b"vanilla");

        let artifact = layout.artifact(Variant::Release).unwrap();
        let result = publish(&artifact, OverwritePolicy::Always).unwrap();

        assert!(result.is_found());
        let dest = build.join("outputs/flutter-apk/WeightCalculator-release.apk");
        assert_eq!(artifact.dest_path(), dest);
        assert_eq!(fs::read(&dest).unwrap(), b"vanilla");
    }

    #[test]
    fn test_debug_not_found_writes_nothing() {
        let (temp, layout) = setup();

        let artifact = layout.artifact(Variant::Debug).unwrap();
        let result = publish(&artifact, OverwritePolicy::Always).unwrap();

        assert_eq!(
            result,
            PublishResult::NotFound {
                checked: artifact.candidates.clone()
            }
        );
        assert!(!result.is_found());
        assert!(!temp.path().join("outputs").exists());
    }

    #[test]
    fn test_republish_overwrites_with_new_contents() {
        let (temp, layout) = setup();
        let src = temp.path().join("outputs/flutter-apk/app-release.apk");
        let artifact = layout.artifact(Variant::Release).unwrap();

        write(&src, b"first build");
        publish(&artifact, OverwritePolicy::Always).unwrap();
        write(&src, b"second build, larger");
        let result = publish(&artifact, OverwritePolicy::Always).unwrap();

        assert!(matches!(result, PublishResult::Copied { bytes: 20, .. }));
        assert_eq!(fs::read(artifact.dest_path()).unwrap(), b"second build, larger");
    }

    #[test]
    fn test_if_changed_skips_identical_destination() {
        let (temp, layout) = setup();
        write(&temp.path().join("outputs/flutter-apk/app-debug.apk"), APK_BYTES);
        let artifact = layout.artifact(Variant::Debug).unwrap();

        let first = publish(&artifact, OverwritePolicy::IfChanged).unwrap();
        assert!(matches!(first, PublishResult::Copied { .. }));

        let second = publish(&artifact, OverwritePolicy::IfChanged).unwrap();
        assert!(matches!(second, PublishResult::Unchanged { .. }));
    }

    #[test]
    fn test_if_changed_copies_when_contents_differ() {
        let (temp, layout) = setup();
        let src = temp.path().join("outputs/flutter-apk/app-debug.apk");
        let artifact = layout.artifact(Variant::Debug).unwrap();

        write(&src, b"aaaa");
        publish(&artifact, OverwritePolicy::IfChanged).unwrap();
        write(&src, b"bbbb");
        let result = publish(&artifact, OverwritePolicy::IfChanged).unwrap();

        assert!(matches!(result, PublishResult::Copied { .. }));
        assert_eq!(fs::read(artifact.dest_path()).unwrap(), b"bbbb");
    }

    #[test]
    fn test_candidate_equal_to_destination_is_left_alone() {
        let temp = TempDir::new().unwrap();
        let apk = temp.path().join("WeightCalculator-release.apk");
        write(&apk, APK_BYTES);

        let artifact = ArtifactRef::new(
            Variant::Release,
            vec![apk.clone()],
            temp.path(),
            "WeightCalculator-release.apk",
        )
        .unwrap();
        let result = publish(&artifact, OverwritePolicy::Always).unwrap();

        assert!(matches!(result, PublishResult::Unchanged { .. }));
        assert_eq!(fs::read(&apk).unwrap(), APK_BYTES);
    }

    #[test]
    fn test_directory_candidate_is_not_a_source() {
        let (temp, layout) = setup();
        fs::create_dir_all(temp.path().join("outputs/flutter-apk/app-release.apk")).unwrap();

        let artifact = layout.artifact(Variant::Release).unwrap();
        let result = publish(&artifact, OverwritePolicy::Always).unwrap();
        assert!(!result.is_found());
    }

    #[cfg(unix)]
    #[test]
    fn test_uncreatable_destination_is_an_error() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("app-release.apk");
        write(&src, APK_BYTES);
        // A regular file where the destination directory should be
        let blocker = temp.path().join("blocked");
        fs::write(&blocker, b"").unwrap();

        let artifact = ArtifactRef::new(
            Variant::Release,
            vec![src],
            blocker.join("out"),
            "WeightCalculator-release.apk",
        )
        .unwrap();

        let err = publish(&artifact, OverwritePolicy::Always).unwrap_err();
        assert!(err.context.unwrap().contains("Failed to create"));
    }

    #[test]
    fn test_locate_reports_selection() {
        let (temp, layout) = setup();
        write(&temp.path().join("outputs/apk/release/app-release.apk"), APK_BYTES);

        let artifact = layout.artifact(Variant::Release).unwrap();
        let statuses = locate(&artifact);

        assert_eq!(statuses.len(), 2);
        assert!(!statuses[0].exists());
        assert!(!statuses[0].selected);
        assert_eq!(statuses[1].size, Some(APK_BYTES.len() as u64));
        assert!(statuses[1].selected);
    }

    #[test]
    fn test_locate_selects_only_first_existing() {
        let (temp, layout) = setup();
        write(&temp.path().join("outputs/flutter-apk/app-release.apk"), APK_BYTES);
        write(&temp.path().join("outputs/apk/release/app-release.apk"), APK_BYTES);

        let artifact = layout.artifact(Variant::Release).unwrap();
        let selected: Vec<_> = locate(&artifact).into_iter().filter(|s| s.selected).collect();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].path, artifact.candidates[0]);
    }

    #[test]
    fn test_sha256_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty");
        fs::write(&path, b"").unwrap();

        assert_eq!(
            sha256_file(&path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
