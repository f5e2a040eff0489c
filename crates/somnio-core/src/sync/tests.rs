use std::sync::{Arc, Mutex};

use super::*;
use crate::dream::Emotion;
use crate::store::{NetworkConnection, NetworkLink, SimilarDream};

/// Calls observed by [`FakeStore`], in order
#[derive(Debug, Clone, PartialEq)]
enum Call {
    FetchPublic,
    FetchById(String),
    Upsert(usize),
    Delete(String),
    DeleteAll,
}

/// In-memory collaborator that records calls and can be told to fail
#[derive(Default)]
struct FakeStore {
    dreams: Mutex<Vec<Dream>>,
    edges: Mutex<Vec<SimilarityEdge>>,
    calls: Mutex<Vec<Call>>,
    fail_fetch: Mutex<bool>,
    fail_delete: Mutex<bool>,
    fail_upsert_after: Mutex<Option<usize>>,
}

impl FakeStore {
    fn with_dreams(dreams: Vec<Dream>) -> Arc<Self> {
        let store = FakeStore::default();
        *store.dreams.lock().unwrap() = dreams;
        Arc::new(store)
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn edges(&self) -> Vec<SimilarityEdge> {
        self.edges.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl SimilarityStore for FakeStore {
    fn fetch_public_dreams(&self) -> Result<Vec<Dream>> {
        self.record(Call::FetchPublic);
        if *self.fail_fetch.lock().unwrap() {
            return Err(SomnioError::collaborator("fetch public dreams", "offline"));
        }
        Ok(self
            .dreams
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.is_public)
            .cloned()
            .collect())
    }

    fn fetch_dream_by_id(&self, id: &str) -> Result<Option<Dream>> {
        self.record(Call::FetchById(id.to_string()));
        Ok(self
            .dreams
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    fn upsert_similarity_edges(&self, edges: &[SimilarityEdge]) -> Result<()> {
        let upserts = self
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Upsert(_)))
            .count();
        self.record(Call::Upsert(edges.len()));
        if let Some(limit) = *self.fail_upsert_after.lock().unwrap() {
            if upserts >= limit {
                return Err(SomnioError::collaborator("write edges", "disk full"));
            }
        }
        let mut stored = self.edges.lock().unwrap();
        for edge in edges {
            stored.retain(|e| e.pair_key() != edge.pair_key());
            stored.push(edge.clone());
        }
        Ok(())
    }

    fn delete_similarity_edges(&self, dream_id: &str) -> Result<()> {
        self.record(Call::Delete(dream_id.to_string()));
        if *self.fail_delete.lock().unwrap() {
            return Err(SomnioError::collaborator("delete edges", "locked"));
        }
        self.edges.lock().unwrap().retain(|e| !e.touches(dream_id));
        Ok(())
    }

    fn delete_all_similarity_edges(&self) -> Result<()> {
        self.record(Call::DeleteAll);
        self.edges.lock().unwrap().clear();
        Ok(())
    }

    fn fetch_similar_dreams(
        &self,
        dream_id: &str,
        min_similarity: f64,
    ) -> Result<Vec<SimilarDream>> {
        let dreams = self.dreams.lock().unwrap().clone();
        Ok(self
            .edges()
            .into_iter()
            .filter(|e| e.touches(dream_id) && e.similarity >= min_similarity)
            .filter_map(|e| {
                let other = if e.dream1_id == dream_id {
                    e.dream2_id
                } else {
                    e.dream1_id
                };
                dreams.iter().find(|d| d.id == other).map(|d| SimilarDream {
                    dream: d.clone(),
                    similarity: e.similarity,
                })
            })
            .collect())
    }

    fn fetch_network(&self, min_similarity: f64) -> Result<Vec<NetworkNode>> {
        let edges = self.edges();
        Ok(self
            .fetch_public_dreams()?
            .into_iter()
            .map(|dream| NetworkNode {
                connections: edges
                    .iter()
                    .filter(|e| e.touches(&dream.id) && e.similarity >= min_similarity)
                    .map(|e| NetworkConnection {
                        target_id: if e.dream1_id == dream.id {
                            e.dream2_id.clone()
                        } else {
                            e.dream1_id.clone()
                        },
                        similarity: e.similarity,
                    })
                    .collect(),
                dream,
            })
            .collect())
    }

    fn fetch_public_network(&self) -> Result<PublicNetwork> {
        let public = self.fetch_public_dreams()?;
        let is_public = |id: &str| public.iter().any(|d| d.id == id);
        let links: Vec<NetworkLink> = self
            .edges()
            .into_iter()
            .filter(|e| is_public(&e.dream1_id) && is_public(&e.dream2_id))
            .map(|e| NetworkLink {
                source: e.dream1_id,
                target: e.dream2_id,
                similarity: e.similarity,
                shared_themes: e.shared_themes,
            })
            .collect();
        let nodes = public
            .iter()
            .filter(|d| links.iter().any(|l| l.source == d.id || l.target == d.id))
            .cloned()
            .collect();
        Ok(PublicNetwork { nodes, links })
    }
}

#[derive(Default)]
struct RecordingSink {
    reports: Mutex<Vec<String>>,
}

impl ErrorSink for RecordingSink {
    fn report(&self, operation: &str, dream_id: &str, error: &SomnioError) {
        self.reports
            .lock()
            .unwrap()
            .push(format!("{} {} {}", operation, dream_id, error));
    }
}

// Titles stay empty so only tags and emotion drive the scores
fn dream(id: &str, tags: &[&str], emotion: &str) -> Dream {
    Dream::new(id, "")
        .with_tags(tags.iter().copied())
        .with_emotion(Some(Emotion::from(emotion)))
}

fn corpus() -> Vec<Dream> {
    vec![
        dream("dr-a", &["water", "flying"], "happy"),
        dream("dr-b", &["water", "flying"], "excited"),
        dream("dr-c", &["water"], "happy"),
        dream("dr-d", &["exam"], "sad"),
        dream("dr-p", &["water", "flying"], "happy").with_public(false),
    ]
}

fn synchronizer(store: &Arc<FakeStore>) -> (RelationshipSynchronizer, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let sync = RelationshipSynchronizer::new(store.clone()).with_error_sink(sink.clone());
    (sync, sink)
}

#[test]
fn test_create_writes_one_batch_for_public_dream() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, sink) = synchronizer(&store);
    let new_dream = dream("dr-a", &["water", "flying"], "happy");

    let written = sync.on_dream_created(&new_dream).unwrap().wait().unwrap();

    assert_eq!(written, 2);
    assert_eq!(store.calls(), vec![Call::FetchPublic, Call::Upsert(2)]);
    let edges = store.edges();
    assert!(edges.iter().all(|e| e.dream1_id == "dr-a"));
    assert!(edges.iter().all(|e| e.dream2_id != "dr-p"));
    assert!(sink.reports.lock().unwrap().is_empty());
}

#[test]
fn test_create_skips_private_dream() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, _) = synchronizer(&store);
    let private = dream("dr-x", &["water"], "happy").with_public(false);

    assert!(sync.on_dream_created(&private).is_none());
    assert!(store.calls().is_empty());
}

#[test]
fn test_create_without_matches_writes_nothing() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, _) = synchronizer(&store);
    let lonely = dream("dr-z", &["volcano"], "confused");

    assert_eq!(sync.on_dream_created(&lonely).unwrap().wait().unwrap(), 0);
    assert_eq!(store.calls(), vec![Call::FetchPublic]);
}

#[test]
fn test_create_failure_goes_to_sink() {
    let store = FakeStore::with_dreams(corpus());
    *store.fail_fetch.lock().unwrap() = true;
    let (sync, sink) = synchronizer(&store);

    let task = sync
        .on_dream_created(&dream("dr-a", &["water"], "happy"))
        .unwrap();
    assert!(task.wait().is_err());

    let reports = sink.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with("create dr-a"));
}

#[test]
fn test_update_clears_then_rewrites_edges() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, _) = synchronizer(&store);
    let update = DreamUpdate {
        tags: Some(vec!["water".to_string(), "flying".to_string()]),
        ..Default::default()
    };

    let updated = dream("dr-c", &["water", "flying"], "happy");
    sync.on_dream_updated("dr-c", &update, &updated)
        .unwrap()
        .wait()
        .unwrap();

    let calls = store.calls();
    assert_eq!(calls[0], Call::Delete("dr-c".to_string()));
    assert_eq!(calls[1], Call::FetchPublic);
    assert!(matches!(calls[2], Call::Upsert(n) if n > 0));
}

#[test]
fn test_update_failure_goes_to_sink_and_writes_nothing() {
    let store = FakeStore::with_dreams(corpus());
    *store.fail_delete.lock().unwrap() = true;
    let (sync, sink) = synchronizer(&store);
    let update = DreamUpdate {
        tags: Some(vec!["water".to_string()]),
        ..Default::default()
    };

    let task = sync
        .on_dream_updated("dr-c", &update, &dream("dr-c", &["water"], "happy"))
        .unwrap();
    assert!(task.wait().is_err());

    let reports = sink.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with("update dr-c"));
    assert_eq!(store.calls(), vec![Call::Delete("dr-c".to_string())]);
    assert!(store.edges().is_empty());
}

#[test]
fn test_update_of_non_significant_field_does_nothing() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, _) = synchronizer(&store);
    let update = DreamUpdate {
        is_public: Some(false),
        recurring: Some(true),
        ..Default::default()
    };
    let updated = dream("dr-a", &["water"], "happy").with_public(false);

    assert!(sync.on_dream_updated("dr-a", &update, &updated).is_none());

    // Public dream, but only a non-scoring field changed
    let update = DreamUpdate {
        lucid_dream: Some(true),
        ..Default::default()
    };
    let updated = dream("dr-a", &["water"], "happy");
    assert!(sync.on_dream_updated("dr-a", &update, &updated).is_none());
    assert!(store.calls().is_empty());
}

#[test]
fn test_update_of_private_dream_does_nothing() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, _) = synchronizer(&store);
    let update = DreamUpdate {
        title: Some("new".to_string()),
        ..Default::default()
    };
    let updated = dream("dr-p", &["water"], "happy").with_public(false);
    assert!(sync.on_dream_updated("dr-p", &update, &updated).is_none());
}

#[test]
fn test_recalculate_scores_each_pair_once() {
    let dreams: Vec<Dream> = (0..7)
        .map(|i| dream(&format!("dr-{}", i), &["shared"], "neutral"))
        .collect();
    let store = FakeStore::with_dreams(dreams);
    let (sync, _) = synchronizer(&store);

    let summary = sync.recalculate_all(Some(0.0)).unwrap();
    assert_eq!(summary.processed_count, 7);
    assert_eq!(summary.relationships_created, 7 * 6 / 2);

    let edges = store.edges();
    assert_eq!(edges.len(), 21);
    let mut keys: Vec<(&str, &str)> = edges.iter().map(|e| e.pair_key()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 21);
}

#[test]
fn test_recalculate_clears_then_writes_in_batches() {
    let dreams: Vec<Dream> = (0..16)
        .map(|i| dream(&format!("dr-{:02}", i), &["shared"], "neutral"))
        .collect();
    let store = FakeStore::with_dreams(dreams);
    let (sync, _) = synchronizer(&store);

    // 16 dreams give 120 pairs: one full batch of 100 and one of 20
    let summary = sync.recalculate_all(None).unwrap();
    assert_eq!(summary.relationships_created, 120);
    assert_eq!(
        store.calls(),
        vec![
            Call::FetchPublic,
            Call::DeleteAll,
            Call::Upsert(100),
            Call::Upsert(20)
        ]
    );
}

#[test]
fn test_recalculate_uses_configured_batch_size() {
    let dreams: Vec<Dream> = (0..4)
        .map(|i| dream(&format!("dr-{}", i), &["shared"], "neutral"))
        .collect();
    let store = FakeStore::with_dreams(dreams);
    let config = SimilarityConfig {
        batch_size: 4,
        ..Default::default()
    };
    let sync = RelationshipSynchronizer::new(store.clone()).with_config(config);

    sync.recalculate_all(None).unwrap();
    let upserts: Vec<Call> = store
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Upsert(_)))
        .collect();
    assert_eq!(upserts, vec![Call::Upsert(4), Call::Upsert(2)]);
}

#[test]
fn test_recalculate_rejects_bad_threshold() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, _) = synchronizer(&store);

    let err = sync.recalculate_all(Some(1.5)).unwrap_err();
    assert!(matches!(err, SomnioError::InvalidInput { .. }));
    assert!(store.calls().is_empty());
}

#[test]
fn test_recalculate_propagates_fetch_failure() {
    let store = FakeStore::with_dreams(corpus());
    *store.fail_fetch.lock().unwrap() = true;
    let (sync, sink) = synchronizer(&store);

    assert!(sync.recalculate_all(None).unwrap_err().is_collaborator_failure());
    assert!(!store.calls().contains(&Call::DeleteAll));
    assert!(sink.reports.lock().unwrap().is_empty());
}

#[test]
fn test_recalculate_partial_batch_failure_keeps_written_batches() {
    let dreams: Vec<Dream> = (0..16)
        .map(|i| dream(&format!("dr-{:02}", i), &["shared"], "neutral"))
        .collect();
    let store = FakeStore::with_dreams(dreams);
    *store.fail_upsert_after.lock().unwrap() = Some(1);
    let (sync, _) = synchronizer(&store);

    assert!(sync.recalculate_all(None).is_err());
    assert_eq!(store.edges().len(), 100);
}

#[test]
fn test_find_similar_requires_existing_dream() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, _) = synchronizer(&store);

    let err = sync.find_similar("dr-missing", None).unwrap_err();
    assert!(matches!(err, SomnioError::NotFound { .. }));
}

#[test]
fn test_find_similar_uses_read_threshold() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, _) = synchronizer(&store);
    sync.link_dreams("dr-a", "dr-b", 0.9, vec![]).unwrap();
    sync.link_dreams("dr-a", "dr-c", 0.5, vec![]).unwrap();

    let strong = sync.find_similar("dr-a", None).unwrap();
    assert_eq!(strong.len(), 1);
    assert_eq!(strong[0].dream.id, "dr-b");

    assert_eq!(sync.find_similar("dr-a", Some(0.0)).unwrap().len(), 2);
}

#[test]
fn test_link_validation() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, _) = synchronizer(&store);

    assert!(matches!(
        sync.link_dreams("dr-a", "dr-b", 1.2, vec![]),
        Err(SomnioError::InvalidInput { .. })
    ));
    assert!(matches!(
        sync.link_dreams("dr-a", "dr-a", 0.5, vec![]),
        Err(SomnioError::InvalidInput { .. })
    ));
    assert!(matches!(
        sync.link_dreams("dr-a", "dr-nope", 0.5, vec![]),
        Err(SomnioError::NotFound { .. })
    ));

    let edge = sync
        .link_dreams("dr-a", "dr-d", 0.5, vec!["custom".to_string()])
        .unwrap();
    assert_eq!(edge.shared_themes, vec!["custom"]);
    assert_eq!(store.edges().len(), 1);
}

#[test]
fn test_explain_requires_both_dreams() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, _) = synchronizer(&store);

    let explanation = sync.explain("dr-a", "dr-b").unwrap();
    assert_eq!(explanation.shared_tags, vec!["water", "flying"]);
    assert_eq!(explanation.emotion_match, 0.5);

    assert!(sync.explain("dr-a", "dr-missing").is_err());
}

#[test]
fn test_network_defaults_to_strong_connections() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, _) = synchronizer(&store);
    sync.link_dreams("dr-a", "dr-b", 0.8, vec![]).unwrap();
    sync.link_dreams("dr-a", "dr-c", 0.4, vec![]).unwrap();

    let network = sync.network(None).unwrap();
    assert_eq!(network.len(), 4);
    let a = network.iter().find(|n| n.dream.id == "dr-a").unwrap();
    assert_eq!(a.connections.len(), 1);
    assert_eq!(a.connections[0].target_id, "dr-b");
}

#[test]
fn test_public_network_carries_shared_themes() {
    let store = FakeStore::with_dreams(corpus());
    let (sync, _) = synchronizer(&store);
    sync.link_dreams("dr-a", "dr-b", 0.8, vec!["water".to_string()])
        .unwrap();
    sync.link_dreams("dr-a", "dr-p", 0.9, vec![]).unwrap();

    let network = sync.public_network().unwrap();
    assert_eq!(network.links.len(), 1);
    assert_eq!(network.links[0].source, "dr-a");
    assert_eq!(network.links[0].target, "dr-b");
    assert_eq!(network.links[0].shared_themes, vec!["water"]);

    let ids: Vec<&str> = network.nodes.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["dr-a", "dr-b"]);
}
