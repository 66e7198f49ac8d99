use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use classifier::Classifier;
use dense::DenseIndex;
use embeddings::EmbeddingsBackend;
use lexical::{Bm25Config, Bm25Index};
use normalizer::{normalize, NormalizeOptions};
use taxonomy::TaxonomyStore;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fusion::combine_triple;
use crate::reload::checksum_status;
use crate::types::{
    Alternative, ArtifactStatus, AutocompleteHit, ClassifyResponse, ConceptDetail, EngineStats,
    LabelKind, Prediction, Readiness, RelatedConcept, ReloadReport, TaxoSearchHit,
};

/// The aggregate owning every index and the lazy-load/reload machinery
/// spec.md §§4.8-4.10 describe.
///
/// Each read-mostly structure (taxonomy store, per-language BM25, and
/// per-language dense index) lives behind an `RwLock` holding either
/// `None` (not yet built) or an `Arc` to an immutable, already-built
/// value. Lazy construction uses the double-checked pattern spec.md §5
/// requires: a cheap read-lock check first, then a write lock that
/// re-checks before doing the actual build, so concurrent callers never
/// build the same index twice and in-flight readers never observe a
/// partially built one. `reload` takes the write lock and clears the
/// slot; the next reader rebuilds it, and any reader already holding a
/// clone of the old `Arc` keeps it until it drops — no in-flight request
/// ever sees a half-replaced index.
pub struct Engine {
    cfg: EngineConfig,
    embeddings: Arc<EmbeddingsBackend>,
    taxonomy: RwLock<Option<Arc<TaxonomyStore>>>,
    bm25: RwLock<HashMap<String, Arc<Bm25Index>>>,
    dense: RwLock<HashMap<String, Arc<DenseIndex>>>,
    classifier: RwLock<Option<Arc<Classifier>>>,
    taxonomy_loaded: AtomicBool,
    classifier_loaded: AtomicBool,
    bm25_loaded: AtomicBool,
    classify_calls: AtomicU64,
    abstentions: AtomicU64,
    reload_count: AtomicU64,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Self {
        let embeddings = Arc::new(EmbeddingsBackend::new(cfg.embeddings_config()));
        Self {
            cfg,
            embeddings,
            taxonomy: RwLock::new(None),
            bm25: RwLock::new(HashMap::new()),
            dense: RwLock::new(HashMap::new()),
            classifier: RwLock::new(None),
            taxonomy_loaded: AtomicBool::new(false),
            classifier_loaded: AtomicBool::new(false),
            bm25_loaded: AtomicBool::new(false),
            classify_calls: AtomicU64::new(0),
            abstentions: AtomicU64::new(0),
            reload_count: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    // ---- lazy loaders -------------------------------------------------

    fn ensure_taxonomy(&self) -> Result<Arc<TaxonomyStore>, EngineError> {
        if let Some(store) = self.taxonomy.read().expect("taxonomy lock poisoned").clone() {
            return Ok(store);
        }
        let mut guard = self.taxonomy.write().expect("taxonomy lock poisoned");
        if let Some(store) = guard.clone() {
            return Ok(store);
        }
        let path = &self.cfg.artifacts.taxonomy_json;
        if !path.exists() {
            return Err(EngineError::ArtifactMissing(path.display().to_string()));
        }
        tracing::info!(path = %path.display(), "loading taxonomy store");
        let store = Arc::new(TaxonomyStore::load(
            path,
            self.cfg.taxo_config(),
            self.embeddings.clone(),
        )?);
        *guard = Some(store.clone());
        self.taxonomy_loaded.store(true, Ordering::Release);
        Ok(store)
    }

    fn ensure_bm25(&self, lang: &str) -> Result<Arc<Bm25Index>, EngineError> {
        if let Some(idx) = self.bm25.read().expect("bm25 lock poisoned").get(lang).cloned() {
            return Ok(idx);
        }
        let store = self.ensure_taxonomy()?;
        let mut guard = self.bm25.write().expect("bm25 lock poisoned");
        if let Some(idx) = guard.get(lang).cloned() {
            return Ok(idx);
        }
        tracing::info!(lang, "building BM25 index");
        let idx = Arc::new(Bm25Index::build(
            lang,
            store.concepts_iter(),
            &Bm25Config::default(),
        ));
        guard.insert(lang.to_string(), idx.clone());
        self.bm25_loaded.store(true, Ordering::Release);
        Ok(idx)
    }

    fn ensure_dense(&self, lang: &str) -> Result<Arc<DenseIndex>, EngineError> {
        if let Some(idx) = self.dense.read().expect("dense lock poisoned").get(lang).cloned() {
            return Ok(idx);
        }
        let mut guard = self.dense.write().expect("dense lock poisoned");
        if let Some(idx) = guard.get(lang).cloned() {
            return Ok(idx);
        }
        let matrix_path = self.cfg.artifacts.dense_matrix_path(lang);
        let ids_path = self.cfg.artifacts.dense_ids_path();
        if !matrix_path.exists() {
            return Err(EngineError::ArtifactMissing(matrix_path.display().to_string()));
        }
        if !ids_path.exists() {
            return Err(EngineError::ArtifactMissing(ids_path.display().to_string()));
        }
        tracing::info!(lang, "loading dense index");
        let idx = Arc::new(DenseIndex::load(&matrix_path, &ids_path)?);
        guard.insert(lang.to_string(), idx.clone());
        Ok(idx)
    }

    fn ensure_classifier(&self) -> Result<Arc<Classifier>, EngineError> {
        if let Some(clf) = self.classifier.read().expect("classifier lock poisoned").clone() {
            return Ok(clf);
        }
        let mut guard = self.classifier.write().expect("classifier lock poisoned");
        if let Some(clf) = guard.clone() {
            return Ok(clf);
        }
        let path = &self.cfg.artifacts.classifier_path;
        if !path.exists() {
            return Err(EngineError::ArtifactMissing(path.display().to_string()));
        }
        tracing::info!(path = %path.display(), "loading classifier");
        let clf = Arc::new(Classifier::load(path)?);
        tracing::info!(calibrated = clf.is_calibrated(), "classifier loaded");
        *guard = Some(clf.clone());
        self.classifier_loaded.store(true, Ordering::Release);
        Ok(clf)
    }

    // ---- classify -------------------------------------------------

    /// Normalizes `query`, computes the dense/BM25/classifier signals for
    /// `lang` (substituting the default language when `lang` is
    /// unsupported), fuses them, and returns the top prediction (or
    /// abstention) plus alternatives.
    pub fn classify(
        &self,
        query: &str,
        lang: Option<&str>,
        top_k: Option<usize>,
    ) -> Result<ClassifyResponse, EngineError> {
        let start = Instant::now();
        if query.trim().is_empty() {
            return Err(EngineError::InvalidRequest("query must not be blank".to_string()));
        }
        let lang = self.cfg.resolve_lang(lang);
        self.classify_calls.fetch_add(1, Ordering::Relaxed);

        let store = self.ensure_taxonomy()?;
        let q = normalize(query, NormalizeOptions::default());

        let sem_pairs = match self.ensure_dense(&lang) {
            Ok(dense) => {
                let q_emb = DenseIndex::embed_query(&self.embeddings, &q);
                dense.topk(&q_emb, self.cfg.top_k)
            }
            Err(e) => {
                tracing::warn!(lang, error = %e, "dense signal unavailable for this request");
                Vec::new()
            }
        };

        let bm25_pairs = match self.ensure_bm25(&lang) {
            Ok(bm25) => {
                let tokens = lexical::tokenize_query(&q);
                bm25.topk(&tokens, self.cfg.top_k).unwrap_or_default()
            }
            Err(e) => {
                tracing::warn!(lang, error = %e, "BM25 signal unavailable for this request");
                Vec::new()
            }
        };

        let clf = self.ensure_classifier()?;
        let cls_vector = clf.scores(&q);
        let classes = clf.class_ids();

        let mut combined = combine_triple(
            &sem_pairs,
            &bm25_pairs,
            &cls_vector,
            classes,
            self.cfg.alpha_sem,
            self.cfg.beta_bm25,
            self.cfg.gamma_clf,
        );

        if combined.is_empty() {
            combined = sem_pairs
                .iter()
                .chain(bm25_pairs.iter())
                .cloned()
                .collect();
            combined.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        }
        if combined.is_empty() {
            return Err(EngineError::NoCandidates);
        }

        combined.retain(|(id, _)| store.contains(id));
        if combined.is_empty() {
            return Err(EngineError::NoCandidatesInTaxonomy);
        }

        let (best_id, best_score) = combined[0].clone();
        let abstained = best_score < self.cfg.tau_low;
        if abstained {
            self.abstentions.fetch_add(1, Ordering::Relaxed);
        }

        let prediction = if abstained {
            None
        } else {
            store
                .resolve_label_and_path(&best_id, &lang)
                .map(|(label, path)| Prediction {
                    id: best_id.clone(),
                    label,
                    path,
                    score: best_score,
                })
        };

        let requested_alts = top_k.unwrap_or(self.cfg.alternatives_top_k);
        let alternatives: Vec<Alternative> = combined
            .into_iter()
            .skip(1)
            .filter_map(|(id, score)| {
                store
                    .resolve_label_and_path(&id, &lang)
                    .map(|(label, _)| Alternative { id, label, score })
            })
            .take(requested_alts)
            .collect();

        Ok(ClassifyResponse {
            prediction,
            alternatives,
            abstained,
            latency_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }

    // ---- taxonomy search/autocomplete/detail -------------------------

    pub fn taxo_search(
        &self,
        query: &str,
        lang: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<TaxoSearchHit>, EngineError> {
        let lang = self.cfg.resolve_lang(lang);
        let store = self.ensure_taxonomy()?;
        Ok(store
            .search(query, &lang, limit)
            .into_iter()
            .map(|c| {
                let path = c.path.get(&lang).cloned().unwrap_or_default();
                let label = c.pref_label_or_any(&lang).unwrap_or_default().to_string();
                TaxoSearchHit {
                    id: c.id,
                    label,
                    path,
                }
            })
            .collect())
    }

    pub fn taxo_autocomplete(
        &self,
        query: &str,
        lang: Option<&str>,
        limit: usize,
    ) -> Result<Vec<AutocompleteHit>, EngineError> {
        let lang = self.cfg.resolve_lang(lang);
        let store = self.ensure_taxonomy()?;
        Ok(store
            .autocomplete(query, &lang, limit)
            .into_iter()
            .filter_map(|s| {
                let (kind, label) = s.tag.split_once('|')?;
                let kind = match kind {
                    "pref" => LabelKind::Pref,
                    _ => LabelKind::Alt,
                };
                Some(AutocompleteHit {
                    id: s.concept_id,
                    label: label.to_string(),
                    kind,
                })
            })
            .collect())
    }

    pub fn taxo_concept(&self, id: &str) -> Result<ConceptDetail, EngineError> {
        let store = self.ensure_taxonomy()?;
        let concept = store
            .concept(id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;

        let resolve = |ids: &[String]| -> Vec<RelatedConcept> {
            ids.iter()
                .filter_map(|rid| {
                    store.concept(rid).map(|c| RelatedConcept {
                        id: rid.clone(),
                        label: c.pref_label_or_any(&self.cfg.default_lang).unwrap_or_default().to_string(),
                    })
                })
                .collect()
        };

        Ok(ConceptDetail {
            broader_labels: resolve(&concept.broader),
            narrower_labels: resolve(&concept.narrower),
            concept,
        })
    }

    // ---- admin ----------------------------------------------------

    /// Resets the dense index unconditionally, resets BM25 for `lang` or
    /// every language if unspecified, and resets the taxonomy store so
    /// the next access reloads from disk. Returns checksums for every
    /// on-disk artifact plus the set of languages affected.
    ///
    /// Safe against concurrent readers: every reset takes the write lock
    /// on its own slot only for the instant it takes to clear it; readers
    /// already holding an `Arc` to the old value keep using it until they
    /// drop it, and the next reader rebuilds fresh.
    pub fn reload(&self, lang: Option<&str>) -> ReloadReport {
        self.reload_count.fetch_add(1, Ordering::Relaxed);

        self.dense.write().expect("dense lock poisoned").clear();

        let affected_langs: Vec<String> = match lang {
            Some(l) => vec![l.to_lowercase()],
            None => self.cfg.supported_langs.clone(),
        };
        {
            let mut guard = self.bm25.write().expect("bm25 lock poisoned");
            match lang {
                Some(l) => {
                    guard.remove(&l.to_lowercase());
                }
                None => guard.clear(),
            }
        }

        *self.taxonomy.write().expect("taxonomy lock poisoned") = None;
        self.taxonomy_loaded.store(false, Ordering::Release);
        self.bm25_loaded.store(false, Ordering::Release);

        tracing::info!(?affected_langs, "engine reloaded");

        let mut files: Vec<(String, ArtifactStatus)> = vec![(
            "taxonomy".to_string(),
            checksum_status(&self.cfg.artifacts.taxonomy_json),
        )];
        for l in &affected_langs {
            files.push((
                format!("emb_{l}"),
                checksum_status(&self.cfg.artifacts.dense_matrix_path(l)),
            ));
        }
        files.push((
            "class_ids".to_string(),
            checksum_status(&self.cfg.artifacts.dense_ids_path()),
        ));
        files.push((
            "classifier".to_string(),
            checksum_status(&self.cfg.artifacts.classifier_path),
        ));

        ReloadReport {
            files,
            langs: affected_langs,
        }
    }

    /// The three flags spec.md §4.10 tracks plus the derived verdict.
    /// Note that `classifier_loaded` is unaffected by `reload`, since
    /// spec.md §4.9 does not list the classifier among the indices reset
    /// on reload.
    pub fn readiness(&self) -> Readiness {
        Readiness {
            taxonomy_loaded: self.taxonomy_loaded.load(Ordering::Acquire),
            classifier_loaded: self.classifier_loaded.load(Ordering::Acquire),
            bm25_loaded: self.bm25_loaded.load(Ordering::Acquire),
        }
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            classify_calls: self.classify_calls.load(Ordering::Relaxed),
            abstentions: self.abstentions.load(Ordering::Relaxed),
            reload_count: self.reload_count.load(Ordering::Relaxed),
        }
    }
}
