//! Per-image pipeline stages ahead of the classifier.
//!
//! - **validate**: existence, size limit and magic-byte checks
//! - **decode**: format detection and decoding with a timeout
//! - **preprocess**: resize and normalize into the graph's input tensor

pub mod decode;
pub mod preprocess;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use preprocess::{preprocess, PreprocessParams};
pub use validate::Validator;
