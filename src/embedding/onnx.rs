// Local sentence embedder using all-MiniLM-L6-v2 via ONNX.
//
// Embeds text into 384-dimensional vectors: tokenize, run the BERT
// encoder, mean-pool token states over the attention mask, L2-normalize.
// Normalized output means a plain dot product between two embeddings is
// their cosine similarity — which is what the topic scores are.
//
// The model runs locally — no API calls, no rate limits.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use super::traits::{EmbeddingProvider, ProviderError};

/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// The model's sequence window. Longer inputs are truncated here rather
/// than rejected — length limits belong to the provider, not its callers.
pub const MAX_SEQ_LEN: usize = 256;

/// Sentence embedder backed by a local ONNX session.
///
/// The session sits behind a Mutex because ort::Session::run takes
/// &mut self; embed calls serialize on it.
#[derive(Debug)]
pub struct OnnxEmbedder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
}

impl OnnxEmbedder {
    /// Load the embedding model and tokenizer from the given directory.
    ///
    /// Expects `model.onnx` and `tokenizer.json` in the directory.
    /// Run `magpie download-model` first if they don't exist.
    pub fn load(model_dir: &Path) -> Result<Self, ProviderError> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            return Err(ProviderError::ModelNotFound { path: model_path });
        }
        if !tokenizer_path.exists() {
            return Err(ProviderError::ModelNotFound {
                path: tokenizer_path,
            });
        }

        let session = Session::builder()
            .map_err(|e| ProviderError::ModelLoadFailed {
                reason: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(&model_path)
            .map_err(|e| ProviderError::ModelLoadFailed {
                reason: format!("Failed to load {}: {e}", model_path.display()),
            })?;

        let tokenizer =
            Tokenizer::from_file(&tokenizer_path).map_err(|e| ProviderError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {e}"),
            })?;

        debug!("Loaded sentence embedding model from {}", model_dir.display());

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }

    /// Tokenize, run one batched forward pass, and mean-pool each text.
    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, ProviderError> {
        // Tokenize all texts, truncating each to the model window
        let encodings: Vec<_> = texts
            .iter()
            .map(|t| {
                self.tokenizer
                    .encode(t.as_str(), true)
                    .map_err(|e| ProviderError::TokenizationFailed {
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let batch_size = encodings.len();
        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len().min(MAX_SEQ_LEN))
            .max()
            .unwrap_or(0);

        if max_len == 0 {
            return Ok(vec![vec![0.0; EMBEDDING_DIM]; batch_size]);
        }

        // Build padded input tensors. BERT uses:
        //   input_ids: token IDs (pad with 0)
        //   attention_mask: 1 for real tokens, 0 for padding
        //   token_type_ids: all zeros for single-sentence input
        let mut input_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
        let mut attention_mask_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
        let mut token_type_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);

        for enc in &encodings {
            let ids = &enc.get_ids()[..enc.get_ids().len().min(MAX_SEQ_LEN)];
            let mask = &enc.get_attention_mask()[..ids.len()];
            let seq_len = ids.len();

            input_ids_flat.extend(ids.iter().map(|&id| id as i64));
            attention_mask_flat.extend(mask.iter().map(|&m| m as i64));
            token_type_ids_flat.extend(std::iter::repeat_n(0i64, seq_len));

            // Pad to max_len (BERT pad token id = 0)
            let pad_len = max_len - seq_len;
            input_ids_flat.extend(std::iter::repeat_n(0i64, pad_len));
            attention_mask_flat.extend(std::iter::repeat_n(0i64, pad_len));
            token_type_ids_flat.extend(std::iter::repeat_n(0i64, pad_len));
        }

        let shape = [batch_size as i64, max_len as i64];

        let input_ids_tensor = Tensor::from_array((shape, input_ids_flat)).map_err(|e| {
            ProviderError::InferenceFailed {
                reason: format!("Failed to create input_ids tensor: {e}"),
            }
        })?;
        let attention_mask_tensor = Tensor::from_array((shape, attention_mask_flat.clone()))
            .map_err(|e| ProviderError::InferenceFailed {
                reason: format!("Failed to create attention_mask tensor: {e}"),
            })?;
        let token_type_ids_tensor =
            Tensor::from_array((shape, token_type_ids_flat)).map_err(|e| {
                ProviderError::InferenceFailed {
                    reason: format!("Failed to create token_type_ids tensor: {e}"),
                }
            })?;

        // Run inference — output is last_hidden_state: [batch, seq_len, 384]
        let hidden_states = {
            let mut session =
                self.session
                    .lock()
                    .map_err(|e| ProviderError::InferenceFailed {
                        reason: format!("Session lock poisoned: {e}"),
                    })?;

            let outputs = session
                .run(ort::inputs! {
                    "input_ids" => input_ids_tensor,
                    "attention_mask" => attention_mask_tensor,
                    "token_type_ids" => token_type_ids_tensor
                })
                .map_err(|e| ProviderError::InferenceFailed {
                    reason: format!("ONNX inference failed: {e}"),
                })?;

            let (_shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
                ProviderError::InferenceFailed {
                    reason: format!("Failed to extract output tensor: {e}"),
                }
            })?;

            data.to_vec()
        };

        // Mean pooling: average token embeddings weighted by attention mask,
        // then L2-normalize — matching the model's own pooling pipeline.
        let mut embeddings = Vec::with_capacity(batch_size);

        for i in 0..batch_size {
            let mut sum = vec![0.0_f64; EMBEDDING_DIM];
            let mut mask_sum = 0.0_f64;

            for j in 0..max_len {
                let mask_val = attention_mask_flat[i * max_len + j] as f64;
                if mask_val > 0.0 {
                    mask_sum += mask_val;
                    let offset = (i * max_len + j) * EMBEDDING_DIM;
                    for k in 0..EMBEDDING_DIM {
                        sum[k] += hidden_states[offset + k] as f64 * mask_val;
                    }
                }
            }

            if mask_sum > 0.0 {
                for val in &mut sum {
                    *val /= mask_sum;
                }
            }

            embeddings.push(normalize(sum));
        }

        debug!(
            batch_size = batch_size,
            dim = EMBEDDING_DIM,
            "Computed sentence embeddings"
        );

        Ok(embeddings)
    }
}

impl EmbeddingProvider for OnnxEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f64>, ProviderError> {
        let mut results = self.embed_texts(&[text.to_string()])?;
        Ok(results.remove(0))
    }

    /// True batch inference: one padded forward pass for all texts.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.embed_texts(texts)
    }

    fn dim(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Scale a vector to unit length. Zero vectors pass through unchanged.
fn normalize(mut v: Vec<f64>) -> Vec<f64> {
    let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_length() {
        let v = normalize(vec![3.0, 4.0]);
        let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!((v[0] - 0.6).abs() < 1e-12);
        assert!((v[1] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero_vector_unchanged() {
        let v = normalize(vec![0.0, 0.0, 0.0]);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_normalize_already_unit() {
        let v = normalize(vec![1.0, 0.0]);
        assert!((v[0] - 1.0).abs() < 1e-12);
        assert_eq!(v[1], 0.0);
    }

    #[test]
    fn test_load_missing_model_dir() {
        let dir = std::env::temp_dir().join("magpie-test-no-model");
        let err = OnnxEmbedder::load(&dir).unwrap_err();
        assert!(matches!(err, ProviderError::ModelNotFound { .. }));
    }
}
