//! Persistence for the generated-step index.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEntry {
    /// Page file name within the output directory.
    pub file: String,
    /// Display name shown in navigation links.
    pub name: String,
    /// Commit the page was generated from.
    pub commit: String,
}

/// Persisted manifest schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestState {
    /// Schema version for migration.
    pub version: u32,
    /// All generated pages, in generation order.
    pub entries: Vec<StepEntry>,
}

impl Default for ManifestState {
    fn default() -> Self {
        Self {
            version: 1,
            entries: Vec::new(),
        }
    }
}

/// File-backed manifest under `.stepdocs/manifest.json` in the output
/// directory.
#[derive(Debug)]
pub struct Manifest {
    state_path: PathBuf,
    state: ManifestState,
}

impl Manifest {
    /// Open or create the manifest for an output directory.
    #[must_use = "this returns a Result that should be checked"]
    pub fn open(out_dir: &Path) -> io::Result<Self> {
        let state_path = out_dir.join(".stepdocs").join("manifest.json");

        let state = if state_path.exists() {
            let content = std::fs::read_to_string(&state_path)?;
            serde_json::from_str(&content).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid manifest.json: {}", e),
                )
            })?
        } else {
            ManifestState::default()
        };

        Ok(Self { state_path, state })
    }

    /// Record a generated page, replacing any previous entry for the
    /// same file.
    pub fn record(&mut self, entry: StepEntry) {
        self.state.entries.retain(|e| e.file != entry.file);
        self.state.entries.push(entry);
    }

    /// Display name for a page file, when known.
    pub fn name_for(&self, file: &str) -> Option<&str> {
        self.state
            .entries
            .iter()
            .find(|e| e.file == file)
            .map(|e| e.name.as_str())
    }

    /// Recorded entries, in generation order.
    pub fn entries(&self) -> &[StepEntry] {
        &self.state.entries
    }

    /// Save state to disk using atomic write.
    #[must_use = "this returns a Result that should be checked"]
    pub fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.state_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Atomic write: temp file + rename.
        let temp_path = self.state_path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&self.state)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.state_path)?;

        Ok(())
    }
}
