//! Deploymap - Map deployment topology from repository manifests
//!
//! Scans compose files, Kubernetes manifests, package manifests, and env
//! files with line-level heuristics and renders the inferred topology as
//! a Mermaid diagram.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;

// Re-export main types
pub use analysis::{AnalysisResult, Analyzer, TopologyGraph};
pub use config::Config;
pub use error::{Error, Result};
