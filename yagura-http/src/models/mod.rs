pub mod completions;
pub mod embeddings;
pub mod status;

// Re-export all models for easier imports
pub use completions::*;
pub use embeddings::*;
pub use status::*;
