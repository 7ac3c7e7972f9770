//! Lux Core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Mesh ingestion**: `MeshData` holds raw vertex/normal/texcoord arrays
//!   and polygon faces, and turns them into validated triangles
//! - **Textures**: `Texture` color maps sampled by UV
//! - **Transforms**: one-shot translate/rotate/scale applied before BVH build
//! - **Settings**: `RenderSettings` and `CameraSettings`, deserializable with serde
//!
//! # Example
//!
//! ```ignore
//! use lux_core::{FaceVertex, MeshData};
//!
//! let mut mesh = MeshData::new("quad", positions);
//! mesh.add_face(vec![FaceVertex::new(0), FaceVertex::new(1), FaceVertex::new(2)]);
//! let triangles = mesh.triangles()?;
//! ```

pub mod config;
pub mod mesh;
pub mod texture;
pub mod transform;

// Re-export commonly used types
pub use config::{CameraSettings, ConfigError, RenderSettings};
pub use mesh::{FaceVertex, MeshData, MeshError, TriangleData};
pub use texture::{FilterMode, Texture, TextureError, WrapMode};
pub use transform::{Transform, TransformError};

/// Linear RGB color (RGB values typically 0-1).
pub type Color = lux_math::Vec3;
