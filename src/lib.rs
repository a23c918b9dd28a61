//! Curio — mood-based art recommendation from the command line.
//!
//! Describe how you feel; Curio answers with one artwork from a locally
//! indexed collection and a short caption explaining the choice. The
//! interesting work is delegated:
//!
//! - **Reasoning**: Google Gemini (`generateContent` REST) turns a mood into
//!   a visual search recipe, and later writes the explanation.
//! - **Embeddings**: all-MiniLM-L6-v2 via local ONNX Runtime (384 dimensions,
//!   L2-normalized) encodes recipes and artwork captions into one space.
//! - **Search**: SQLite with [sqlite-vec](https://github.com/asg017/sqlite-vec)
//!   holds one caption embedding per artwork and answers KNN queries.
//!
//! The pipeline itself is a thin, strictly ordered orchestration:
//! mood → recipe → query vector → nearest artwork → explanation.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization and schema
//! - [`embedding`] — Text-to-vector embedding via ONNX Runtime
//! - [`gallery`] — Artwork records and the vector store
//! - [`reasoning`] — The language-model provider (recipes and explanations)
//! - [`pipeline`] — The end-to-end recommend operation
//! - [`session`] — The interactive prompt loop
//! - [`error`] — The per-turn error taxonomy

pub mod config;
pub mod db;
pub mod embedding;
pub mod error;
pub mod gallery;
pub mod pipeline;
pub mod reasoning;
pub mod session;
