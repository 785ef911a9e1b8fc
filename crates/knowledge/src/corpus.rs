//! Corpus store: every named corpus loaded once at startup.

use crate::flat_index::FlatIndex;
use crate::records::load_records;
use crate::types::VerseRecord;
use crate::vector_index::VectorIndex;
use serde::Serialize;
use verse_core::config::CorpusConfig;
use verse_core::{AppConfig, AppError, AppResult};

/// A named vector index plus its parallel verse records.
pub struct Corpus {
    name: String,
    index: Box<dyn VectorIndex>,
    records: Vec<VerseRecord>,
}

impl std::fmt::Debug for Corpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Corpus")
            .field("name", &self.name)
            .field("rows", &self.index.len())
            .field("dimension", &self.index.dimension())
            .field("records", &self.records.len())
            .finish()
    }
}

impl Corpus {
    /// Create a corpus, warning when the index and records disagree in length.
    pub fn new(
        name: impl Into<String>,
        index: impl VectorIndex + 'static,
        records: Vec<VerseRecord>,
    ) -> Self {
        let name = name.into();

        if index.len() != records.len() {
            tracing::warn!(
                corpus = %name,
                rows = index.len(),
                records = records.len(),
                "Vector index and verse records differ in length; out-of-range hits will be dropped"
            );
        }

        Self {
            name,
            index: Box::new(index),
            records,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    pub fn records(&self) -> &[VerseRecord] {
        &self.records
    }

    /// Record for an index row, `None` when the row is out of range.
    pub fn record(&self, row: usize) -> Option<&VerseRecord> {
        self.records.get(row)
    }

    pub fn summary(&self) -> CorpusSummary {
        CorpusSummary {
            name: self.name.clone(),
            records: self.records.len(),
            rows: self.index.len(),
            dimension: self.index.dimension(),
        }
    }
}

/// Counts reported by readiness checks and `verse corpora`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusSummary {
    pub name: String,
    pub records: usize,
    pub rows: usize,
    pub dimension: usize,
}

/// All loaded corpora, in configuration order. Read-only after startup.
#[derive(Debug, Default)]
pub struct CorpusStore {
    corpora: Vec<Corpus>,
}

impl CorpusStore {
    /// Build a store from already-loaded corpora.
    pub fn from_corpora(corpora: Vec<Corpus>) -> AppResult<Self> {
        for (i, corpus) in corpora.iter().enumerate() {
            if corpora[..i].iter().any(|c| c.name == corpus.name) {
                return Err(AppError::Config(format!(
                    "Duplicate corpus name: {}",
                    corpus.name
                )));
            }
        }

        Ok(Self { corpora })
    }

    /// Load every configured corpus.
    ///
    /// A corpus whose index and records files are both absent is skipped with
    /// a warning. Exactly one missing file, or an unreadable artifact, is an
    /// error.
    pub fn load(config: &AppConfig) -> AppResult<Self> {
        let mut corpora = Vec::with_capacity(config.corpora.len());

        for corpus_config in &config.corpora {
            if let Some(corpus) = load_corpus(config, corpus_config)? {
                corpora.push(corpus);
            }
        }

        if corpora.is_empty() {
            tracing::warn!("No corpus loaded; every question will go unanswered");
        }

        Self::from_corpora(corpora)
    }

    pub fn corpora(&self) -> &[Corpus] {
        &self.corpora
    }

    pub fn get(&self, name: &str) -> Option<&Corpus> {
        self.corpora.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.corpora.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpora.is_empty()
    }

    pub fn summaries(&self) -> Vec<CorpusSummary> {
        self.corpora.iter().map(Corpus::summary).collect()
    }
}

fn load_corpus(config: &AppConfig, corpus: &CorpusConfig) -> AppResult<Option<Corpus>> {
    let index_path = config.resolve_path(&corpus.index);
    let records_path = config.resolve_path(&corpus.records);

    match (index_path.exists(), records_path.exists()) {
        (false, false) => {
            tracing::warn!(
                corpus = %corpus.name,
                "Skipping corpus: neither {:?} nor {:?} exists",
                index_path,
                records_path
            );
            Ok(None)
        }
        (true, false) => Err(AppError::Knowledge(format!(
            "Corpus '{}' has an index but no verse records at {:?}",
            corpus.name, records_path
        ))),
        (false, true) => Err(AppError::Knowledge(format!(
            "Corpus '{}' has verse records but no index at {:?}",
            corpus.name, index_path
        ))),
        (true, true) => {
            let index = FlatIndex::load(&index_path)?;
            let records = load_records(&records_path)?;

            tracing::info!(
                corpus = %corpus.name,
                rows = index.len(),
                records = records.len(),
                "Loaded corpus"
            );

            Ok(Some(Corpus::new(corpus.name.clone(), index, records)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_corpus(dir: &Path, name: &str, rows: usize) {
        let indexes = dir.join("indexes");
        fs::create_dir_all(&indexes).unwrap();

        // IndexFlatIP layout: fourcc, d, ntotal, two reserved, is_trained, metric, rows
        let mut index = Vec::new();
        index.extend_from_slice(b"IxFI");
        index.extend_from_slice(&2i32.to_le_bytes());
        index.extend_from_slice(&(rows as i64).to_le_bytes());
        index.extend_from_slice(&[0u8; 16]);
        index.push(1);
        index.extend_from_slice(&0i32.to_le_bytes());
        index.extend_from_slice(&((rows * 2) as u64).to_le_bytes());
        for i in 0..rows {
            index.extend_from_slice(&(i as f32).to_le_bytes());
            index.extend_from_slice(&1.0f32.to_le_bytes());
        }
        fs::write(indexes.join(format!("{}.index", name)), index).unwrap();

        let mut toml = String::new();
        for i in 0..rows {
            toml.push_str(&format!(
                "[[verses]]\nid = \"{}{}\"\ncontent = \"verse {}\"\n\n",
                name, i, i
            ));
        }
        fs::write(indexes.join(format!("{}_id_map.toml", name)), toml).unwrap();
    }

    fn config_for(dir: &Path) -> AppConfig {
        AppConfig {
            workspace: dir.to_path_buf(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_load_keeps_configuration_order() {
        let temp = TempDir::new().unwrap();
        write_corpus(temp.path(), "bible", 2);
        write_corpus(temp.path(), "quran", 3);
        write_corpus(temp.path(), "gita", 1);

        let store = CorpusStore::load(&config_for(temp.path())).unwrap();
        let names: Vec<&str> = store.corpora().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["quran", "gita", "bible"]);
        assert_eq!(store.get("quran").unwrap().records().len(), 3);
    }

    #[test]
    fn test_missing_corpus_is_skipped() {
        let temp = TempDir::new().unwrap();
        write_corpus(temp.path(), "gita", 2);

        let store = CorpusStore::load(&config_for(temp.path())).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get("quran").is_none());
    }

    #[test]
    fn test_half_present_corpus_is_error() {
        let temp = TempDir::new().unwrap();
        write_corpus(temp.path(), "gita", 2);
        fs::remove_file(temp.path().join("indexes/gita_id_map.toml")).unwrap();

        let err = CorpusStore::load(&config_for(temp.path())).unwrap_err();
        assert!(err.to_string().contains("gita"));
    }

    #[test]
    fn test_no_corpora_loads_empty_store() {
        let temp = TempDir::new().unwrap();
        let store = CorpusStore::load(&config_for(temp.path())).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_custom_corpus_paths() {
        let temp = TempDir::new().unwrap();
        write_corpus(temp.path(), "gita", 2);
        fs::write(
            temp.path().join("indexes/gita.index.json"),
            r#"{"dimension": 2, "vectors": [[0.0, 1.0], [1.0, 1.0]]}"#,
        )
        .unwrap();

        let mut config = config_for(temp.path());
        config.corpora = vec![CorpusConfig {
            name: "bhagavad-gita".to_string(),
            index: PathBuf::from("indexes/gita.index.json"),
            records: PathBuf::from("indexes/gita_id_map.toml"),
        }];

        let store = CorpusStore::load(&config).unwrap();
        assert_eq!(
            store.summaries(),
            vec![CorpusSummary {
                name: "bhagavad-gita".to_string(),
                records: 2,
                rows: 2,
                dimension: 2,
            }]
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let make = || {
            Corpus::new(
                "gita",
                FlatIndex::from_vectors(1, vec![vec![1.0]]).unwrap(),
                vec![VerseRecord::new("G1", "one")],
            )
        };

        assert!(CorpusStore::from_corpora(vec![make(), make()]).is_err());
    }

    #[test]
    fn test_record_out_of_range() {
        let corpus = Corpus::new(
            "gita",
            FlatIndex::from_vectors(1, vec![vec![1.0], vec![0.5]]).unwrap(),
            vec![VerseRecord::new("G1", "one")],
        );

        assert!(corpus.record(0).is_some());
        assert!(corpus.record(1).is_none());
    }
}
