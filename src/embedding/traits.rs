// Embedding provider trait — the swap-ready abstraction.
//
// This trait defines the interface for turning text into fixed-length
// vectors. The default implementation runs all-MiniLM-L6-v2 locally via
// ONNX; tests substitute a deterministic stub. Everything downstream of
// this seam (the prompt table, the dot products) is provider-agnostic.

use std::path::PathBuf;

use thiserror::Error;

/// Failure modes of an embedding provider. Never recovered locally —
/// construction and scoring surface these to the caller as-is.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("embedding model not found at {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load embedding model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },
}

/// Trait for embedding text into fixed-length vectors. Synchronous and
/// blocking: every call runs inference to completion before returning.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text into a vector of `dim()` floats.
    fn embed(&self, text: &str) -> Result<Vec<f64>, ProviderError>;

    /// Embed multiple texts, returning vectors in the same order.
    /// Default implementation calls embed sequentially — providers
    /// can override for true batched inference if they support it.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, ProviderError> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text)?);
        }
        Ok(results)
    }

    /// The fixed output dimension, stable for the provider's lifetime.
    fn dim(&self) -> usize;
}
