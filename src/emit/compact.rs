use anyhow::Result;
use std::io::Write;

use crate::alphabet::is_ambiguous;
use crate::record::{VariantKind, VariantRecord};

/// Tokens of the compact rendering, in output order: every no-call span
/// (`n<alt_pos>:<len>`) first, then every variant (`i<ref_pos>:<len>:<alt>`).
///
/// Ambiguity runs inside an indel's alternate allele are reported as no-call
/// spans of their own, positioned in alternate coordinates.
pub fn compact_tokens(records: &[VariantRecord]) -> Vec<String> {
    let mut tokens = Vec::new();

    for record in records {
        match record.kind {
            VariantKind::NoCall => {
                tokens.push(format!("n{}:{}", record.alt_pos, record.aligned_len.0));
            }
            VariantKind::Indel => {
                for (start, len) in ambiguity_runs(&record.alt_allele) {
                    tokens.push(format!("n{}:{}", record.alt_pos + start, len));
                }
            }
            VariantKind::Ref | VariantKind::Substitution => {}
        }
    }

    for record in records.iter().filter(|r| r.is_variant()) {
        tokens.push(format!(
            "i{}:{}:{}",
            record.ref_pos,
            record.ref_allele.len(),
            String::from_utf8_lossy(&record.alt_allele)
        ));
    }

    tokens
}

/// Write the whole record list as one comma-separated line.
pub fn write_compact<W: Write>(writer: &mut W, records: &[VariantRecord]) -> Result<()> {
    let line = compact_tokens(records).join(",");
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Render the compact line, newline included.
pub fn render_compact(records: &[VariantRecord]) -> String {
    let mut line = compact_tokens(records).join(",");
    line.push('\n');
    line
}

/// `(offset, length)` of each maximal run of the ambiguity code.
fn ambiguity_runs(allele: &[u8]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut run_start = None;

    for (idx, &base) in allele.iter().enumerate() {
        match (is_ambiguous(base), run_start) {
            (true, None) => run_start = Some(idx),
            (false, Some(start)) => {
                runs.push((start, idx - start));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        runs.push((start, allele.len() - start));
    }

    runs
}
