//! # tnt2fedex - TNT export to FedEx address-book conversion
//!
//! Converts semicolon-delimited TNT shipment export lines, each carrying an
//! embedded JSON payload, into a fixed-schema FedEx Ship Manager address-book
//! CSV.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  TNT export │────▶│   Parser    │────▶│  Transform  │────▶│  CSV rows   │
//! │ (txt/JSON)  │     │ (auto-enc)  │     │ (rules+ascii)│    │ (65 columns)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! Parsing runs in parallel over disjoint line ranges; mapping,
//! transliteration and encoding run sequentially so output order mirrors
//! input order. One corrupt line never aborts the batch.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tnt2fedex::{convert_file, ConvertOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), tnt2fedex::PipelineError> {
//!     let result = convert_file(Path::new("export.txt"), &ConvertOptions::default())?;
//!     print!("{}", result.csv);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`parser`] - Line parsing, payload flattening, input decoding
//! - [`schema`] - The fixed 65-column schema and its rule table
//! - [`transform`] - Column rules and the conversion pipeline
//! - [`translit`] - ASCII transliteration with Germanic digraph expansion
//! - [`encoder`] - RFC4180-style CSV field encoding

// Core modules
pub mod error;
pub mod schema;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Text downgrade
pub mod translit;

// Output encoding
pub mod encoder;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{InputError, InputResult, PipelineError, PipelineResult};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{decode_input, detect_encoding, parse_line, PayloadOutcome, Record};

// =============================================================================
// Re-exports - Schema
// =============================================================================

pub use schema::{
    address_book_rules, column_index, is_germanic, COUNTRY_ATTRIBUTE, GERMANIC_COUNTRIES,
    HEADER_COLUMNS,
};

// =============================================================================
// Re-exports - Rules
// =============================================================================

pub use transform::rules::{map_row, ColumnRule, Normalizer, Source};

// =============================================================================
// Re-exports - Transliteration
// =============================================================================

pub use translit::normalize;

// =============================================================================
// Re-exports - Encoding
// =============================================================================

pub use encoder::{encode_field, header_line};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    convert_bytes, convert_file, convert_file_to_file, convert_lines, ConvertOptions,
    ConvertResult,
};
