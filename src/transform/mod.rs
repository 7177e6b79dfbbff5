//! Record-to-row transformation: rule resolution and pipeline orchestration.

pub mod pipeline;
pub mod rules;

pub use pipeline::{
    convert_bytes, convert_file, convert_file_to_file, convert_lines, ConvertOptions,
    ConvertResult,
};
pub use rules::{map_row, ColumnRule, Normalizer, Source};
