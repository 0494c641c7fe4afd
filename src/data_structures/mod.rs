//! Data types shared by the core and the GPU backend.
//!
//! - `model` holds the vertex format and CPU/GPU mesh containers
//! - `registry` is the named, insertion-ordered mesh registry
//! - `texture` wraps GPU textures and their creation from image data

pub mod model;
pub mod registry;
pub mod texture;
