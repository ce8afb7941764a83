//! Output directory for generated decks.

use crate::error::{Error, Result};
use crate::model::RenderedDeck;
use crate::writer::PackageWriter;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Route prefix under which stored decks are served.
pub const PUBLIC_ROUTE: &str = "/public";

/// A deck written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name, `<32 hex digits>.pptx`
    pub file_name: String,
    /// Full path on disk
    pub path: PathBuf,
}

impl Artifact {
    /// Absolute URL of the artifact below `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}{}/{}",
            base_url.trim_end_matches('/'),
            PUBLIC_ROUTE,
            self.file_name
        )
    }
}

/// Append-only directory of generated decks.
///
/// Every deck gets a fresh uuid-v4 name and is written through a temporary
/// file in the same directory, so readers never see a partial file and an
/// existing file is never replaced.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Open the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::debug!("event=store_opened dir={}", dir.display());
        Ok(Self { dir })
    }

    /// Directory holding the decks.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// A new artifact file name.
    pub fn fresh_name() -> String {
        format!("{}.pptx", Uuid::new_v4().simple())
    }

    /// Serialize `deck` into a new artifact.
    pub fn save(&self, writer: &PackageWriter<'_>, deck: &RenderedDeck) -> Result<Artifact> {
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| Error::Serialization(format!("creating temp file in {}: {e}", self.dir.display())))?;
        writer.write(deck, tmp.as_file_mut())?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::Serialization(format!("flushing deck: {e}")))?;
        self.persist(tmp)
    }

    fn persist(&self, tmp: NamedTempFile) -> Result<Artifact> {
        let file_name = Self::fresh_name();
        let path = self.dir.join(&file_name);
        // On failure the temp file is dropped and removed with the error.
        tmp.persist_noclobber(&path)
            .map_err(|e| Error::Serialization(format!("persisting {}: {}", path.display(), e.error)))?;

        log::info!("event=artifact_saved file={}", file_name);
        Ok(Artifact { file_name, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;

    #[test]
    fn test_fresh_names_are_uuid_hex() {
        let name = ArtifactStore::fresh_name();
        let stem = name.strip_suffix(".pptx").unwrap();
        assert_eq!(stem.len(), 32);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(name, ArtifactStore::fresh_name());
    }

    #[test]
    fn test_open_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("public");
        let store = ArtifactStore::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
    }

    #[test]
    fn test_save_leaves_only_the_artifact() {
        let root = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(root.path()).unwrap();
        let template = Template::builtin().unwrap();
        let deck = RenderedDeck::new("Empty");

        let artifact = store.save(&PackageWriter::new(&template), &deck).unwrap();
        assert!(artifact.path.is_file());

        let entries: Vec<_> = fs::read_dir(root.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_nothing() {
        let root = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(root.path()).unwrap();
        // No package parts: serialization fails before persisting.
        let template = Template::from_layouts(Vec::new());
        let result = store.save(&PackageWriter::new(&template), &RenderedDeck::new("X"));
        assert!(result.is_err());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_url() {
        let artifact = Artifact {
            file_name: "abc.pptx".to_string(),
            path: PathBuf::from("/srv/public/abc.pptx"),
        };
        assert_eq!(artifact.url("http://localhost:8000/"), "http://localhost:8000/public/abc.pptx");
    }
}
