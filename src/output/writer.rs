use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    analysis::AnalysisResult,
    config::OutputConfig,
    error::{OutputError, Result},
    output::paths::OutputPaths,
};

/// Render the plain-text form: a `# sample_rate N` header, then one offset per line
pub fn render_text(result: &AnalysisResult) -> String {
    let mut text = format!("# sample_rate {}\n", result.sample_rate);
    for onset in &result.onsets {
        text.push_str(&onset.to_string());
        text.push('\n');
    }
    text
}

/// Render the JSON form, pretty-printed with two-space indentation
pub fn render_json(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result)
        .map_err(|e| OutputError::SerializeFailed { reason: e.to_string() }.into())
}

/// Human-readable confirmation naming both written files
pub fn confirmation_message(paths: &OutputPaths) -> String {
    format!(
        "Analysis complete\n - {}\n - {}",
        paths.text.display(),
        paths.json.display()
    )
}

/// Writes an analysis to its `.ana` and `.json` destinations
///
/// In atomic mode both files are first written to hidden staging files in
/// the destination directories and only renamed into place once both
/// staged writes succeeded. Otherwise the two files are written directly,
/// one after the other.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    atomic: bool,
}

impl OutputWriter {
    pub fn new(atomic: bool) -> Self {
        Self { atomic }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.atomic)
    }

    /// Write both representations of `result`, overwriting existing files
    pub fn write(&self, result: &AnalysisResult, paths: &OutputPaths) -> Result<()> {
        let text = render_text(result);
        let json = render_json(result)?;

        if self.atomic {
            self.commit(&[(&paths.text, text.as_str()), (&paths.json, json.as_str())])
        } else {
            write_file(&paths.text, &text)?;
            write_file(&paths.json, &json)?;
            Ok(())
        }
    }

    /// Stage every file, then swap them all into place
    ///
    /// Existing destination files are moved aside to hidden backups before
    /// the staged files are renamed over them. If any rename fails, the
    /// files committed so far are removed and the backups restored, so the
    /// destinations end up either all new or all as they were.
    fn commit(&self, files: &[(&PathBuf, &str)]) -> Result<()> {
        let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());

        for &(destination, contents) in files {
            let staging = sibling_path(destination, "tmp");
            debug!("Staging {:?} as {:?}", destination, staging);

            if let Err(e) = fs::write(&staging, contents) {
                remove_files(staged.iter().map(|(s, _)| s.as_path()).chain(std::iter::once(staging.as_path())));
                return Err(OutputError::WriteFailed {
                    path: destination.display().to_string(),
                    source: e,
                }
                .into());
            }

            staged.push((staging, destination.as_path()));
        }

        let mut swap = Swap::default();

        for (index, (staging, destination)) in staged.iter().enumerate() {
            if let Err(e) = swap.replace(staging, *destination) {
                swap.roll_back();
                remove_files(staged[index..].iter().map(|(s, _)| s.as_path()));
                return Err(OutputError::CommitFailed {
                    path: destination.display().to_string(),
                    source: e,
                }
                .into());
            }
        }

        swap.finish();
        Ok(())
    }
}

/// Renames performed during a commit, kept so they can be undone
#[derive(Default)]
struct Swap<'a> {
    committed: Vec<&'a Path>,
    backups: Vec<(PathBuf, &'a Path)>,
}

impl<'a> Swap<'a> {
    /// Move `destination` aside if it is a file, then rename `staging` over it
    fn replace(&mut self, staging: &Path, destination: &'a Path) -> std::io::Result<()> {
        if destination.is_file() {
            let backup = sibling_path(destination, "bak");
            fs::rename(destination, &backup)?;
            self.backups.push((backup, destination));
        }

        fs::rename(staging, destination)?;
        self.committed.push(destination);
        Ok(())
    }

    fn roll_back(self) {
        remove_files(self.committed.iter().copied());

        for (backup, destination) in self.backups {
            if let Err(e) = fs::rename(&backup, destination) {
                warn!("Failed to restore {:?} from {:?}: {}", destination, backup, e);
            }
        }
    }

    fn finish(self) {
        remove_files(self.backups.iter().map(|(backup, _)| backup.as_path()));
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::from_config(&OutputConfig::default())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| {
        OutputError::WriteFailed {
            path: path.display().to_string(),
            source: e,
        }
        .into()
    })
}

/// Hidden sibling of `destination` used while committing
fn sibling_path(destination: &Path, suffix: &str) -> PathBuf {
    let name = destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{}.{}.{}", name, std::process::id(), suffix))
}

fn remove_files<'a>(paths: impl IntoIterator<Item = &'a Path>) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove {:?}: {}", path, e);
            }
        }
    }
}
