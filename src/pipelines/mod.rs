//! Render pipelines.
//!
//! The preview uses a single pipeline built from the user's shader pair.

pub mod preview;
