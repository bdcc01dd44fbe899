use std::fs;
use std::path::Path;

use lexrag_core::config::CorpusSettings;
use lexrag_core::traits::VectorIndex;
use lexrag_core::types::{Fragment, Neighbors};
use lexrag_core::Error;
use lexrag_index::{normalize_l2, Corpus, FlatIndex, FragmentStore};
use tempfile::TempDir;

/// Index double that replays fixed rows regardless of the query.
struct ScriptedIndex {
    rows: Vec<i64>,
    dim: usize,
}

impl VectorIndex for ScriptedIndex {
    fn count(&self) -> usize {
        self.rows.len()
    }
    fn dim(&self) -> usize {
        self.dim
    }
    fn search(&self, _query: &[f32], k: usize) -> lexrag_core::Result<Neighbors> {
        let rows: Vec<i64> = self.rows.iter().copied().take(k).collect();
        Ok(Neighbors { scores: vec![0.5; rows.len()], rows })
    }
}

fn abc_store() -> FragmentStore {
    FragmentStore::new(vec![
        Fragment { id: "1".into(), content: "A".into() },
        Fragment { id: "2".into(), content: "B".into() },
        Fragment { id: "3".into(), content: "C".into() },
    ])
}

fn write_corpus(dir: &Path, fragments: &[Fragment], vectors: &[Vec<f32>], dim: usize) -> CorpusSettings {
    let fragments_path = dir.join("chunks.json");
    let index_path = dir.join("index.lxfi");
    fs::write(&fragments_path, serde_json::to_string(fragments).expect("json")).expect("write chunks");
    FlatIndex::from_vectors(dim, vectors).expect("index").save(&index_path).expect("save");
    CorpusSettings {
        fragments_path: fragments_path.to_string_lossy().to_string(),
        index_path: index_path.to_string_lossy().to_string(),
        reference_fragment_id: None,
    }
}

#[test]
fn out_of_range_rows_are_dropped_in_order() {
    let corpus = Corpus::new(abc_store(), Box::new(ScriptedIndex { rows: vec![0, 5, 1], dim: 2 }));
    let hits = corpus.search(&[1.0, 0.0], 50).expect("search");
    let pairs: Vec<(&str, &str)> = hits.iter().map(|h| (h.id.as_str(), h.content.as_str())).collect();
    assert_eq!(pairs, vec![("1", "A"), ("2", "B")]);
}

#[test]
fn negative_rows_are_dropped() {
    let corpus = Corpus::new(abc_store(), Box::new(ScriptedIndex { rows: vec![-1, 2, -1], dim: 2 }));
    let hits = corpus.search(&[0.0, 1.0], 3).expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "3");
}

#[test]
fn all_rows_invalid_yields_empty_not_error() {
    let corpus = Corpus::new(abc_store(), Box::new(ScriptedIndex { rows: vec![7, 8, 9], dim: 2 }));
    assert!(corpus.search(&[1.0, 1.0], 3).expect("search").is_empty());
}

#[test]
fn hits_always_resolve_to_stored_fragments() {
    let rows: Vec<i64> = (-3..40).collect();
    let store = abc_store();
    let ids: Vec<String> = (0..store.len()).filter_map(|i| store.get(i)).map(|f| f.id.clone()).collect();
    let corpus = Corpus::new(store, Box::new(ScriptedIndex { rows, dim: 1 }));
    let hits = corpus.search(&[1.0], 100).expect("search");
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|h| ids.contains(&h.id)));
}

#[test]
fn ranking_ignores_query_scale() {
    let tmp = TempDir::new().expect("tmp");
    let fragments: Vec<Fragment> = (0..4)
        .map(|i| Fragment { id: format!("{}", i + 1), content: format!("article {i}") })
        .collect();
    let vectors = vec![
        vec![0.9, 0.1, 0.0],
        vec![0.1, 0.9, 0.2],
        vec![0.4, 0.4, 0.4],
        vec![0.0, 0.2, 0.9],
    ];
    let settings = write_corpus(tmp.path(), &fragments, &vectors, 3);
    let corpus = Corpus::load(&settings).expect("load");

    let raw = vec![3.0, 7.5, 1.0];
    let mut unit = raw.clone();
    normalize_l2(&mut unit);
    let from_raw = corpus.search(&raw, 4).expect("raw");
    let from_unit = corpus.search(&unit, 4).expect("unit");
    assert_eq!(from_raw, from_unit);
    assert_eq!(from_raw[0].id, "2");
}

#[test]
fn load_reports_counts() {
    let tmp = TempDir::new().expect("tmp");
    let fragments = vec![
        Fragment { id: "1".into(), content: "definitions".into() },
        Fragment { id: "2".into(), content: "annual leave".into() },
    ];
    let settings = write_corpus(tmp.path(), &fragments, &[vec![1.0, 0.0], vec![0.0, 1.0]], 2);
    let corpus = Corpus::load(&settings).expect("load");
    assert_eq!(corpus.vector_count(), 2);
    assert_eq!(corpus.fragment_count(), 2);
    assert_eq!(corpus.dim(), 2);
    assert_eq!(corpus.store().first().map(|f| f.id.as_str()), Some("1"));
}

#[test]
fn missing_index_is_a_startup_failure() {
    let tmp = TempDir::new().expect("tmp");
    let settings = CorpusSettings {
        fragments_path: tmp.path().join("chunks.json").to_string_lossy().to_string(),
        index_path: tmp.path().join("absent.lxfi").to_string_lossy().to_string(),
        reference_fragment_id: None,
    };
    let err = Corpus::load(&settings).err().expect("missing index");
    assert!(matches!(err, Error::MissingArtifact { .. }));
    assert!(err.is_fatal_startup());
}

#[test]
fn missing_fragments_is_a_startup_failure() {
    let tmp = TempDir::new().expect("tmp");
    let mut settings = write_corpus(tmp.path(), &[], &[], 2);
    settings.fragments_path = tmp.path().join("absent.json").to_string_lossy().to_string();
    let err = Corpus::load(&settings).err().expect("missing fragments");
    assert!(matches!(err, Error::MissingArtifact { .. }));
}

#[test]
fn malformed_fragments_are_corrupt() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("chunks.json");
    fs::write(&path, "{\"id\": 1}").expect("write");
    let err = FragmentStore::load(&path).expect_err("not an array of fragments");
    assert!(matches!(err, Error::CorruptArtifact { .. }));
}
