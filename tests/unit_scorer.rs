// Unit tests for the Scorer's contract, driven by a deterministic stub
// provider so no model files are needed.
//
// Covers: prompt table coverage, score key-set exactness, determinism,
// self-similarity of verbatim prompts, empty input, and error propagation.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use magpie::embedding::traits::{EmbeddingProvider, ProviderError};
use magpie::scorer::Scorer;
use magpie::topics::Topic;

/// Deterministic stand-in for the embedding model: hashes the text into a
/// seed and expands it into a unit vector. The same text always produces
/// the same vector; different texts produce (effectively) different ones.
struct StubProvider {
    dim: usize,
    calls: Arc<AtomicUsize>,
}

impl StubProvider {
    fn new() -> Self {
        Self {
            dim: 16,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl EmbeddingProvider for StubProvider {
    fn embed(&self, text: &str) -> Result<Vec<f64>, ProviderError> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut v = Vec::with_capacity(self.dim);
        for _ in 0..self.dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            v.push(((state >> 32) as f64 / u32::MAX as f64) * 2.0 - 1.0);
        }

        let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

/// Provider that always fails — used to check that failures surface
/// unmasked from both construction and scoring.
struct FailingProvider;

impl EmbeddingProvider for FailingProvider {
    fn embed(&self, _text: &str) -> Result<Vec<f64>, ProviderError> {
        Err(ProviderError::InferenceFailed {
            reason: "stub failure".to_string(),
        })
    }

    fn dim(&self) -> usize {
        16
    }
}

// ============================================================
// Construction — prompt vector table
// ============================================================

#[test]
fn construction_makes_one_provider_call_per_topic() {
    let provider = StubProvider::new();
    let calls = Arc::clone(&provider.calls);

    Scorer::new(Box::new(provider)).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), Topic::ALL.len());
}

#[test]
fn construction_fails_when_provider_fails() {
    let result = Scorer::new(Box::new(FailingProvider));
    assert!(matches!(
        result,
        Err(ProviderError::InferenceFailed { .. })
    ));
}

// ============================================================
// score() — key set and values
// ============================================================

#[test]
fn score_returns_exactly_the_topic_set() {
    let scorer = Scorer::new(Box::new(StubProvider::new())).unwrap();
    let scores = scorer.score("a perfectly ordinary tweet").unwrap();

    assert_eq!(scores.len(), Topic::ALL.len());

    let keys: HashSet<Topic> = scores.keys().copied().collect();
    let expected: HashSet<Topic> = Topic::ALL.into_iter().collect();
    assert_eq!(keys, expected, "Score keys must equal the fixed topic set");
}

#[test]
fn score_returns_twelve_entries_for_the_recall_sentence() {
    let scorer = Scorer::new(Box::new(StubProvider::new())).unwrap();
    let scores = scorer
        .score("San Francisco voters oust three school board members in recall vote, CNN projects")
        .unwrap();

    assert_eq!(scores.len(), 12);
    assert!(scores.values().all(|v| v.is_finite()));
}

#[test]
fn score_is_deterministic() {
    let scorer = Scorer::new(Box::new(StubProvider::new())).unwrap();

    let first = scorer.score("the same sentence twice").unwrap();
    let second = scorer.score("the same sentence twice").unwrap();

    // Bit-identical, not merely approximately equal
    for topic in Topic::ALL {
        assert_eq!(first[&topic], second[&topic]);
    }
}

#[test]
fn verbatim_prompt_scores_highest_on_its_own_topic() {
    let scorer = Scorer::new(Box::new(StubProvider::new())).unwrap();

    for topic in Topic::ALL {
        let scores = scorer.score(&topic.prompt()).unwrap();

        let own = scores[&topic];
        let max = scores.values().copied().fold(f64::NEG_INFINITY, f64::max);

        assert_eq!(
            own, max,
            "Verbatim prompt for {topic} should score highest on {topic}"
        );
        // Unit vector dotted with itself
        assert!((own - 1.0).abs() < 1e-9);
    }
}

#[test]
fn empty_input_is_not_rejected_locally() {
    let scorer = Scorer::new(Box::new(StubProvider::new())).unwrap();

    // The scorer performs no validation of its own; the stub accepts
    // anything, so an empty sentence must score cleanly.
    let scores = scorer.score("").unwrap();
    assert_eq!(scores.len(), Topic::ALL.len());
}

#[test]
fn scoring_failure_propagates_without_partial_result() {
    // Build with a working provider, then fail on score via a provider
    // that succeeds for prompts and fails for everything else.
    struct PromptOnlyProvider;

    impl EmbeddingProvider for PromptOnlyProvider {
        fn embed(&self, text: &str) -> Result<Vec<f64>, ProviderError> {
            if text.starts_with("A tweet about") {
                Ok(vec![1.0; 16])
            } else {
                Err(ProviderError::InferenceFailed {
                    reason: "input rejected".to_string(),
                })
            }
        }

        fn dim(&self) -> usize {
            16
        }
    }

    let scorer = Scorer::new(Box::new(PromptOnlyProvider)).unwrap();
    let result = scorer.score("not a prompt");
    assert!(matches!(
        result,
        Err(ProviderError::InferenceFailed { .. })
    ));
}

// ============================================================
// embed_batch default implementation
// ============================================================

#[test]
fn embed_batch_default_preserves_order() {
    let provider = StubProvider::new();

    let texts = vec!["first".to_string(), "second".to_string()];
    let batch = provider.embed_batch(&texts).unwrap();

    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0], provider.embed("first").unwrap());
    assert_eq!(batch[1], provider.embed("second").unwrap());
}

#[test]
fn embed_batch_default_empty_input() {
    let provider = StubProvider::new();
    let batch = provider.embed_batch(&[]).unwrap();
    assert!(batch.is_empty());
}
