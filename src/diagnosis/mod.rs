//! Rule-based diagnosis module
//!
//! Maps band percentages, and in refined mode texture statistics, through a
//! fixed rule table into categorized findings, and estimates soil pH.

pub mod engine;
pub mod findings;
pub mod ph;
pub mod rules;

pub use engine::{DiagnosisEngine, DiagnosisMode};
pub use findings::{Category, Condition, Diagnoses, Finding};
pub use ph::PhStatus;
pub use rules::{Routing, TextureGates};
