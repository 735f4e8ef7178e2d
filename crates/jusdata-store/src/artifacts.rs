//! JSON artifact files under a single models directory.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::StoreError;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const OUTCOME_MODEL_FILE: &str = "outcome_model.json";
pub const SIMILARITY_INDEX_FILE: &str = "similarity_index.json";
pub const CORPUS_FILE: &str = "corpus.json";

/// Every file a complete artifact set consists of.
pub const ARTIFACT_FILES: [&str; 4] = [
    MANIFEST_FILE,
    OUTCOME_MODEL_FILE,
    SIMILARITY_INDEX_FILE,
    CORPUS_FILE,
];

/// A directory holding trained artifacts as JSON files.
#[derive(Debug, Clone)]
pub struct ArtifactDir {
    root: PathBuf,
}

impl ArtifactDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Fail with the first missing artifact file, if any.
    pub fn ensure_complete(&self) -> Result<(), StoreError> {
        match ARTIFACT_FILES.iter().map(|n| self.path(n)).find(|p| !p.is_file()) {
            Some(missing) => Err(StoreError::ArtifactNotFound(missing)),
            None => Ok(()),
        }
    }

    /// Serialize `value` to `name`, replacing any previous file.
    ///
    /// Written to a temporary sibling first and renamed into place, so a
    /// crashed write never leaves a truncated artifact behind.
    pub fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.root)?;
        let path = self.path(name);
        let tmp = self.path(&format!(".{name}.tmp"));
        if let Err(err) = write_json(&tmp, &path, value) {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }
        fs::rename(&tmp, &path)?;
        info!(path = %path.display(), "wrote artifact");
        Ok(path)
    }

    pub fn read<T: DeserializeOwned>(&self, name: &str) -> Result<T, StoreError> {
        let path = self.path(name);
        if !path.is_file() {
            return Err(StoreError::ArtifactNotFound(path));
        }
        let reader = BufReader::new(File::open(&path)?);
        let value = serde_json::from_reader(reader)
            .map_err(|source| StoreError::Json { path: path.clone(), source })?;
        debug!(path = %path.display(), "read artifact");
        Ok(value)
    }
}

fn write_json<T: Serialize>(tmp: &Path, path: &Path, value: &T) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(File::create(tmp)?);
    serde_json::to_writer(&mut writer, value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jusdata_core::{CaseRecord, synthetic_corpus};
    use tempfile::TempDir;

    #[test]
    fn write_then_read() {
        let tmp = TempDir::new().unwrap();
        let dir = ArtifactDir::new(tmp.path().join("models"));
        let corpus = synthetic_corpus(1);
        let path = dir.write(CORPUS_FILE, &corpus).unwrap();
        assert!(path.ends_with(CORPUS_FILE));
        let back: Vec<CaseRecord> = dir.read(CORPUS_FILE).unwrap();
        assert_eq!(back, corpus);
        assert!(!dir.path(&format!(".{CORPUS_FILE}.tmp")).exists());
    }

    #[test]
    fn failed_serialization_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let dir = ArtifactDir::new(tmp.path());
        dir.write(MANIFEST_FILE, &1u32).unwrap();

        // JSON object keys must be strings.
        let unserializable: std::collections::BTreeMap<Vec<u8>, u8> = [(vec![1u8], 1u8)].into();
        match dir.write(MANIFEST_FILE, &unserializable) {
            Err(StoreError::Json { path, .. }) => assert!(path.ends_with(MANIFEST_FILE)),
            other => panic!("expected Json error, got {other:?}"),
        }
        assert!(!dir.path(&format!(".{MANIFEST_FILE}.tmp")).exists());
        let kept: u32 = dir.read(MANIFEST_FILE).unwrap();
        assert_eq!(kept, 1);
    }

    #[test]
    fn missing_artifact_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let dir = ArtifactDir::new(tmp.path());
        match dir.read::<Vec<CaseRecord>>(MANIFEST_FILE) {
            Err(StoreError::ArtifactNotFound(path)) => assert!(path.ends_with(MANIFEST_FILE)),
            other => panic!("expected ArtifactNotFound, got {other:?}"),
        }
    }

    #[test]
    fn ensure_complete_reports_first_gap() {
        let tmp = TempDir::new().unwrap();
        let dir = ArtifactDir::new(tmp.path());
        dir.write(MANIFEST_FILE, &1u32).unwrap();
        dir.write(OUTCOME_MODEL_FILE, &2u32).unwrap();
        match dir.ensure_complete() {
            Err(StoreError::ArtifactNotFound(path)) => {
                assert!(path.ends_with(SIMILARITY_INDEX_FILE))
            }
            other => panic!("expected ArtifactNotFound, got {other:?}"),
        }
        dir.write(SIMILARITY_INDEX_FILE, &3u32).unwrap();
        dir.write(CORPUS_FILE, &4u32).unwrap();
        assert!(dir.ensure_complete().is_ok());
    }

    #[test]
    fn malformed_json_is_reported_with_path() {
        let tmp = TempDir::new().unwrap();
        let dir = ArtifactDir::new(tmp.path());
        fs::write(dir.path(CORPUS_FILE), "{not json").unwrap();
        assert!(matches!(
            dir.read::<Vec<CaseRecord>>(CORPUS_FILE),
            Err(StoreError::Json { .. })
        ));
    }
}
