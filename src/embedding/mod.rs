// Sentence embedding — provider trait, local ONNX backend, model download.

pub mod download;
pub mod onnx;
pub mod traits;
