// Numerology Engine - Core Library
// Exposes the calculation engine for use in the CLI, the API server and tests

pub mod error;
pub mod reduction;      // Digital root with master-number exceptions
pub mod systems;        // Letter-value tables (Pythagorean, Chaldean, custom)
pub mod interpretation; // Canned text per (field, number)
pub mod profile;        // Name + birth date → numeric profile
pub mod compatibility;  // Two profiles → similarity score
pub mod cache;          // TTL memoization
pub mod config;
pub mod engine;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use error::{NumerologyError, Result};
pub use reduction::{is_master, reduce, reduce_to_digit, MASTER_NUMBERS};
pub use systems::{
    LetterClass, NumerologySystem, SystemRegistry, YClassification,
    CHALDEAN, PYTHAGOREAN,
};
pub use interpretation::{FieldKind, Interpretations, Interpreted};
pub use profile::{
    compute_profile, personal_cycles, universal_day, Identity, NumerologyProfile, PersonalCycles,
};
pub use compatibility::{CompatibilityBucket, CompatibilityResult, NumberAffinities};
pub use cache::{Clock, ManualClock, ResultCache, SystemClock};
pub use config::EngineConfig;
pub use engine::NumerologyEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
