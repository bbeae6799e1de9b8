//! SEO scoring engine: text metrics, six sub-scorers, weighted aggregate and
//! rule-based suggestions.

pub mod analyzer;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod scorers;

pub use analyzer::analyze;
pub use models::SeoAnalysis;
