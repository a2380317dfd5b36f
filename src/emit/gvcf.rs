use anyhow::{anyhow, Result};
use std::io::Write;

use crate::record::{VariantKind, VariantRecord};

/// Placeholder allele for "no confident call".
pub const NON_REF: &str = "<NON_REF>";

/// Render one record as a 10-column gVCF line (without newline).
///
/// Reference records produce no line. POS is the 1-based position of the
/// first base of the REF column, so it moves back by one whenever a prefix
/// anchor base is prepended.
pub fn gvcf_line(record: &VariantRecord, chrom: &str) -> Option<String> {
    let (pos, ref_text, alt_text, span) = match record.kind {
        VariantKind::Ref => return None,
        VariantKind::NoCall => {
            let ref_text = record
                .ref_allele
                .first()
                .map(|&b| char::from(b).to_string())
                .unwrap_or_else(|| ".".to_string());
            (
                record.ref_pos + 1,
                ref_text,
                NON_REF.to_string(),
                record.ref_allele.len(),
            )
        }
        VariantKind::Substitution => {
            let reference = text(&record.ref_allele);
            let alternate = text(&record.alt_allele);
            match record.ref_prefix {
                // POS names the anchor base, the first base of REF.
                Some(anchor) if record.ref_allele.len() > 1 => {
                    let anchor = char::from(anchor);
                    let ref_text = format!("{anchor}{reference}");
                    let span = ref_text.len();
                    (record.ref_pos, ref_text, format!("{anchor}{alternate}"), span)
                }
                _ => {
                    let span = reference.len();
                    (record.ref_pos + 1, reference, alternate, span)
                }
            }
        }
        VariantKind::Indel => {
            let reference = text(&record.ref_allele);
            let alternate = text(&record.alt_allele);
            let (pos, ref_text, alt_text) = match (record.ref_prefix, record.ref_suffix) {
                (Some(anchor), _) => {
                    let anchor = char::from(anchor);
                    (
                        record.ref_pos,
                        format!("{anchor}{reference}"),
                        format!("{anchor}{alternate}"),
                    )
                }
                (None, Some(anchor)) => {
                    let anchor = char::from(anchor);
                    (
                        record.ref_pos + 1,
                        format!("{reference}{anchor}"),
                        format!("{alternate}{anchor}"),
                    )
                }
                (None, None) => (record.ref_pos + 1, reference, alternate),
            };
            let span = ref_text.len();
            (pos, ref_text, format!("{alt_text},{NON_REF}"), span)
        }
    };

    let end = pos + span.saturating_sub(1);
    Some(format!(
        "{chrom}\t{pos}\t.\t{ref_text}\t{alt_text}\t.\t.\tEND={end}\t.\t."
    ))
}

/// Write one gVCF line per non-reference record.
pub fn write_gvcf<W: Write>(writer: &mut W, records: &[VariantRecord], chrom: &str) -> Result<()> {
    for line in records.iter().filter_map(|record| gvcf_line(record, chrom)) {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Render gVCF lines into a string (useful for tests and snapshots).
pub fn render_gvcf(records: &[VariantRecord], chrom: &str) -> Result<String> {
    let mut buffer = Vec::new();
    write_gvcf(&mut buffer, records, chrom)?;
    String::from_utf8(buffer).map_err(|_| anyhow!("rendered gVCF is not valid UTF-8"))
}

fn text(bases: &[u8]) -> String {
    String::from_utf8_lossy(bases).into_owned()
}
