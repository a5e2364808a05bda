//! Texture analysis module
//!
//! Gray-level co-occurrence statistics and the rough/smooth qualifiers used
//! to route color evidence toward disease or deficiency findings.

pub mod glcm;
pub mod qualifier;

pub use glcm::{TextureAnalyzer, TextureDescriptor};
pub use qualifier::{Texture, TextureGate};
