// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-gl: GL String parser and IMGT/HLA liftover
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! # Example
//!
//! ```
//! use ferro_gl::{history, liftover, parse_gl};
//!
//! // Parse a GL String
//! let node = parse_gl("HLA-A*01:01:01:01/HLA-A*01:02+HLA-A*24:03:01").unwrap();
//! assert_eq!(node.resource().as_str(), "genotype");
//!
//! // Load allele history and lift to a newer release
//! let data = "HLA_ID\t3250\t3200\n\
//!             HLA00001\tA*01:01:01:01\tA*01:01:01:01\n\
//!             HLA00002\tA*01:02\tA*01:02\n\
//!             HLA00053\tA*24:03:01:01\tA*24:03:01\n";
//! let index = history::parse(data.as_bytes()).unwrap();
//! let result = liftover(&node.to_string(), "3.20.0", "3.25.0", &index).unwrap();
//! assert_eq!(
//!     result.target_text().as_deref(),
//!     Some("HLA-A*01:01:01:01/HLA-A*01:02+HLA-A*24:03:01:01")
//! );
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod gl;
pub mod history;
pub mod liftover;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod service;

// Re-export commonly used types
pub use error::GlError;
pub use gl::{parse_gl, serialize, GlNode, GlOperator, GlResource, Locus};
pub use history::{AlleleHistoryIndex, AlleleId, DbVersion};
pub use liftover::{
    liftover, liftover_batch, liftover_with_config, LiftoverConfig, LiftoverResult,
    LiftoverStatus,
};

/// Result type alias for ferro-gl operations
pub type Result<T> = std::result::Result<T, GlError>;
