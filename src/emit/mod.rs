//! Record emitters.
//!
//! - `gvcf`: one tab-separated line per non-reference record.
//! - `compact`: the whole record list on one comma-separated line.

mod compact;
mod gvcf;

pub use compact::{compact_tokens, render_compact, write_compact};
pub use gvcf::{gvcf_line, render_gvcf, write_gvcf, NON_REF};

use anyhow::Result;
use std::io::Write;

use crate::config::{ConversionConfig, OutputFormat};
use crate::record::VariantRecord;

/// Write `records` in the format selected by `config`.
pub fn write_records<W: Write>(
    writer: &mut W,
    records: &[VariantRecord],
    config: &ConversionConfig,
) -> Result<()> {
    match config.format {
        OutputFormat::Gvcf => write_gvcf(writer, records, &config.chrom),
        OutputFormat::Compact => write_compact(writer, records),
    }
}

/// Render `records` in the format selected by `config`.
pub fn render_records(records: &[VariantRecord], config: &ConversionConfig) -> Result<String> {
    match config.format {
        OutputFormat::Gvcf => render_gvcf(records, &config.chrom),
        OutputFormat::Compact => Ok(render_compact(records)),
    }
}
