// Zero-shot topic scoring via prompt-anchor embeddings.
//
// Each topic gets a templated prompt ("A tweet about Sports"), embedded
// once at construction into a prompt vector table. Scoring a sentence
// embeds it and dot-products it against every anchor. With normalized
// embeddings the dot product is the cosine similarity, so a sentence
// lands highest on the topics whose prompts it sits closest to in
// embedding space.

use std::collections::HashMap;

use tracing::debug;

use crate::embedding::traits::{EmbeddingProvider, ProviderError};
use crate::topics::Topic;

/// Scores text against the fixed topic vocabulary.
///
/// The prompt vector table is written exactly once, during construction,
/// and only read afterward — `score` takes `&self` and mutates nothing,
/// so a constructed Scorer is safe to share across threads.
pub struct Scorer {
    provider: Box<dyn EmbeddingProvider>,
    prompt_vectors: HashMap<Topic, Vec<f64>>,
}

impl Scorer {
    /// Build a scorer by embedding every topic prompt through the provider.
    ///
    /// One embedding per topic, paid once for the scorer's lifetime. If the
    /// provider fails on any prompt the whole construction fails — there is
    /// no partially-filled table.
    pub fn new(provider: Box<dyn EmbeddingProvider>) -> Result<Self, ProviderError> {
        let prompts: Vec<String> = Topic::ALL.iter().map(|t| t.prompt()).collect();
        let vectors = provider.embed_batch(&prompts)?;

        let prompt_vectors: HashMap<Topic, Vec<f64>> =
            Topic::ALL.into_iter().zip(vectors).collect();

        debug!(
            topics = prompt_vectors.len(),
            dim = provider.dim(),
            "Prompt vector table built"
        );

        Ok(Self {
            provider,
            prompt_vectors,
        })
    }

    /// Score a sentence against every topic.
    ///
    /// Returns one dot-product score per topic — exactly the topics in
    /// [`Topic::ALL`], no omissions, no extras. The sentence may be empty
    /// or arbitrarily long; any limits are the provider's to enforce.
    pub fn score(&self, sentence: &str) -> Result<HashMap<Topic, f64>, ProviderError> {
        let embedding = self.provider.embed(sentence)?;

        let scores = self
            .prompt_vectors
            .iter()
            .map(|(topic, prompt_vector)| (*topic, dot_product(prompt_vector, &embedding)))
            .collect();

        Ok(scores)
    }
}

/// Dot product of two equal-length vectors.
///
/// Mismatched lengths contribute nothing beyond the shorter vector —
/// the provider contract keeps dimensions fixed, so in practice both
/// sides always have the same length.
pub fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
