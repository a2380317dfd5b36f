//! Diff extraction: turn a gapped alignment into typed variant records.
//!
//! A single left-to-right pass classifies every column (see
//! [`transition::classify`]) and grows the open record while the class stays
//! the same. A class change closes the open record, except that a
//! substitution running into an indel is retyped and kept open, so the pair
//! becomes one indel record.
//!
//! Positions are tracked with three cursors advancing in lockstep: the
//! alignment column, the raw reference offset and the raw alternate offset.

mod transition;

pub use transition::classify;

use tracing::trace;

use crate::alphabet::is_gap;
use crate::record::{VariantKind, VariantRecord};
use crate::ConversionError;

/// Position of the extractor in all three coordinate spaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    column: usize,
    ref_offset: usize,
    alt_offset: usize,
}

impl Cursor {
    fn advance(&mut self, reference: u8, alternate: u8) {
        self.column += 1;
        if !is_gap(reference) {
            self.ref_offset += 1;
        }
        if !is_gap(alternate) {
            self.alt_offset += 1;
        }
    }
}

/// Record still accumulating columns.
#[derive(Debug, Clone)]
struct OpenRecord {
    kind: VariantKind,
    start: Cursor,
    prefix: Option<u8>,
}

/// Single-pass state machine over an aligned pair.
#[derive(Debug)]
pub struct DiffExtractor<'a> {
    reference: &'a [u8],
    alternate: &'a [u8],
    cursor: Cursor,
    open: OpenRecord,
    last_ref_base: Option<u8>,
    records: Vec<VariantRecord>,
}

impl<'a> DiffExtractor<'a> {
    /// Prepare an extractor; both rows must have the same length.
    pub fn new(reference: &'a [u8], alternate: &'a [u8]) -> Result<Self, ConversionError> {
        if reference.len() != alternate.len() {
            return Err(ConversionError::LengthMismatch {
                reference: reference.len(),
                alternate: alternate.len(),
            });
        }

        Ok(Self {
            reference,
            alternate,
            cursor: Cursor::default(),
            open: OpenRecord {
                kind: VariantKind::NoCall,
                start: Cursor::default(),
                prefix: None,
            },
            last_ref_base: None,
            records: Vec::new(),
        })
    }

    /// Consume every column and return the ordered records.
    ///
    /// The final open record is always emitted, even when it spans zero
    /// columns (empty input).
    pub fn run(mut self) -> Result<Vec<VariantRecord>, ConversionError> {
        let reference = self.reference;
        let alternate = self.alternate;

        for (&r, &a) in reference.iter().zip(alternate) {
            let kind = classify(r, a).ok_or(ConversionError::InvalidClassification {
                column: self.cursor.column,
                reference: char::from(r),
                alternate: char::from(a),
            })?;
            self.step(kind);

            if !is_gap(r) {
                self.last_ref_base = Some(r);
            }
            self.cursor.advance(r, a);
        }

        let last = self.open.clone();
        self.close(last);
        Ok(self.records)
    }

    fn step(&mut self, kind: VariantKind) {
        if kind == self.open.kind {
            return;
        }

        // The first column types the initial record instead of closing it.
        if self.cursor.column == 0 {
            self.open.kind = kind;
            return;
        }

        if self.open.kind == VariantKind::Substitution && kind == VariantKind::Indel {
            self.open.kind = VariantKind::Indel;
            return;
        }

        let next = OpenRecord {
            kind,
            start: self.cursor,
            prefix: self.last_ref_base,
        };
        let finished = std::mem::replace(&mut self.open, next);
        self.close(finished);
    }

    fn close(&mut self, open: OpenRecord) {
        let start = open.start.column;
        let end = self.cursor.column;

        let ref_allele = strip_gaps(&self.reference[start..end]);
        let alt_allele = strip_gaps(&self.alternate[start..end]);
        debug_assert_eq!(open.start.ref_offset + ref_allele.len(), self.cursor.ref_offset);
        debug_assert_eq!(open.start.alt_offset + alt_allele.len(), self.cursor.alt_offset);

        // Nothing precedes a run at reference offset 0, so anchor it on the
        // next reference base instead.
        let ref_suffix = if open.start.ref_offset == 0 {
            self.reference[end..].iter().copied().find(|&b| !is_gap(b))
        } else {
            None
        };

        let record = VariantRecord {
            ref_pos: open.start.ref_offset,
            alt_pos: open.start.alt_offset,
            aligned_pos: (start, start),
            aligned_len: (end - start, end - start),
            ref_allele,
            alt_allele,
            kind: open.kind,
            ref_prefix: open.prefix,
            ref_suffix,
        };
        trace!(record = %record, "closed record");
        self.records.push(record);
    }
}

/// Extract records from an aligned pair (gaps allowed, no sentinels).
pub fn extract_variants(
    reference: &[u8],
    alternate: &[u8],
) -> Result<Vec<VariantRecord>, ConversionError> {
    DiffExtractor::new(reference, alternate)?.run()
}

/// Record for a pair where exactly one side is empty: one indel carrying the
/// whole other sequence, placed on the first column after the start sentinel.
///
/// Returns `None` unless exactly one of the sequences is empty.
pub fn empty_sequence_record(reference: &[u8], alternate: &[u8]) -> Option<VariantRecord> {
    if reference.is_empty() == alternate.is_empty() {
        return None;
    }

    let span = reference.len().max(alternate.len());
    Some(VariantRecord {
        ref_pos: 0,
        alt_pos: 0,
        aligned_pos: (1, 1),
        aligned_len: (span, span),
        ref_allele: reference.to_vec(),
        alt_allele: alternate.to_vec(),
        kind: VariantKind::Indel,
        ref_prefix: None,
        ref_suffix: None,
    })
}

fn strip_gaps(span: &[u8]) -> Vec<u8> {
    span.iter().copied().filter(|&b| !is_gap(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(reference: &str, alternate: &str) -> Vec<VariantRecord> {
        extract_variants(reference.as_bytes(), alternate.as_bytes()).expect("extraction succeeds")
    }

    fn kinds(records: &[VariantRecord]) -> Vec<VariantKind> {
        records.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn deletion_between_reference_runs() {
        let records = extract("gcatgcatg", "gcat----g");
        assert_eq!(
            kinds(&records),
            vec![VariantKind::Ref, VariantKind::Indel, VariantKind::Ref]
        );

        let indel = &records[1];
        assert_eq!(indel.ref_pos, 4);
        assert_eq!(indel.alt_pos, 4);
        assert_eq!(indel.aligned_pos, (4, 4));
        assert_eq!(indel.aligned_len, (4, 4));
        assert_eq!(indel.ref_allele, b"gcat");
        assert!(indel.alt_allele.is_empty());
        assert_eq!(indel.ref_prefix, Some(b't'));
        assert_eq!(indel.ref_suffix, None);

        let tail = &records[2];
        assert_eq!((tail.ref_pos, tail.alt_pos), (8, 4));
        assert_eq!(tail.ref_allele, b"g");
    }

    #[test]
    fn insertion_positions_track_alternate() {
        let records = extract("gcat----g", "gcatgcatg");
        let indel = &records[1];
        assert_eq!((indel.ref_pos, indel.alt_pos), (4, 4));
        assert!(indel.ref_allele.is_empty());
        assert_eq!(indel.alt_allele, b"gcat");
        assert_eq!((records[2].ref_pos, records[2].alt_pos), (4, 8));
    }

    #[test]
    fn adjacent_substitutions_form_one_record() {
        let records = extract("gccat", "gggat");
        assert_eq!(
            kinds(&records),
            vec![VariantKind::Ref, VariantKind::Substitution, VariantKind::Ref]
        );
        assert_eq!(records[1].ref_allele, b"cc");
        assert_eq!(records[1].alt_allele, b"gg");
        assert_eq!(records[1].ref_pos, 1);
        assert_eq!(records[2].ref_pos, 3);
        assert_eq!(records[2].ref_prefix, Some(b'c'));
    }

    #[test]
    fn substitution_folds_into_following_indel() {
        let records = extract("gcaat", "gg--t");
        assert_eq!(
            kinds(&records),
            vec![VariantKind::Ref, VariantKind::Indel, VariantKind::Ref]
        );
        let indel = &records[1];
        assert_eq!(indel.ref_allele, b"caa");
        assert_eq!(indel.alt_allele, b"g");
        assert_eq!(indel.aligned_len, (3, 3));
        assert_eq!(indel.ref_prefix, Some(b'g'));
        assert_eq!((records[2].ref_pos, records[2].alt_pos), (4, 2));
    }

    #[test]
    fn indel_followed_by_substitution_stays_split() {
        let records = extract("g-ct", "gagt");
        assert_eq!(
            kinds(&records),
            vec![
                VariantKind::Ref,
                VariantKind::Indel,
                VariantKind::Substitution,
                VariantKind::Ref
            ]
        );
        let sub = &records[2];
        assert_eq!((sub.ref_pos, sub.alt_pos), (1, 2));
        assert_eq!(sub.ref_prefix, Some(b'g'));
        assert_eq!(records[3].ref_prefix, Some(b'c'));
    }

    #[test]
    fn leading_variant_is_anchored_on_next_reference_base() {
        let records = extract("-gat", "cgat");
        assert_eq!(kinds(&records), vec![VariantKind::Indel, VariantKind::Ref]);
        let indel = &records[0];
        assert_eq!(indel.ref_prefix, None);
        assert_eq!(indel.ref_suffix, Some(b'g'));
        assert_eq!(indel.alt_allele, b"c");
        assert_eq!((records[1].ref_pos, records[1].alt_pos), (0, 1));
    }

    #[test]
    fn leading_substitution_starts_at_zero() {
        let records = extract("cat", "gat");
        assert_eq!(records[0].kind, VariantKind::Substitution);
        assert_eq!((records[0].ref_pos, records[0].alt_pos), (0, 0));
        assert_eq!(records[0].aligned_pos, (0, 0));
        assert_eq!(records[0].ref_suffix, Some(b'a'));
    }

    #[test]
    fn ambiguous_alternate_run_is_a_no_call() {
        let records = extract("gcat", "gnnt");
        assert_eq!(
            kinds(&records),
            vec![VariantKind::Ref, VariantKind::NoCall, VariantKind::Ref]
        );
        assert_eq!(records[1].ref_allele, b"ca");
        assert_eq!(records[1].alt_allele, b"nn");
        assert_eq!(records[1].alt_pos, 1);
    }

    #[test]
    fn no_call_prefix_is_the_adjacent_reference_base() {
        let records = extract("gcatgcat", "gnntgnat");
        assert_eq!(
            kinds(&records),
            vec![
                VariantKind::Ref,
                VariantKind::NoCall,
                VariantKind::Ref,
                VariantKind::NoCall,
                VariantKind::Ref
            ]
        );
        assert_eq!(records[3].ref_prefix, Some(b'g'));
        assert_eq!(records[3].ref_pos, 5);
    }

    #[test]
    fn trailing_variant_is_closed_at_end() {
        let records = extract("gcat", "gcag");
        let last = records.last().expect("records");
        assert_eq!(last.kind, VariantKind::Substitution);
        assert_eq!(last.ref_pos, 3);
        assert_eq!(last.aligned_len, (1, 1));
    }

    #[test]
    fn empty_alignment_yields_zero_length_record() {
        let records = extract("", "");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, VariantKind::NoCall);
        assert_eq!(records[0].aligned_len, (0, 0));
    }

    #[test]
    fn ambiguous_reference_base_is_rejected() {
        let err = extract_variants(b"gnat", b"gcat").unwrap_err();
        assert!(matches!(
            err,
            ConversionError::InvalidClassification {
                column: 1,
                reference: 'n',
                alternate: 'c'
            }
        ));
    }

    #[test]
    fn unequal_rows_are_rejected() {
        let err = extract_variants(b"gcat", b"gca").unwrap_err();
        assert!(matches!(err, ConversionError::LengthMismatch { .. }));
    }

    #[test]
    fn empty_sequence_record_covers_other_side() {
        let record = empty_sequence_record(b"", b"acgt").expect("one side empty");
        assert_eq!(record.kind, VariantKind::Indel);
        assert!(record.ref_allele.is_empty());
        assert_eq!(record.alt_allele, b"acgt");
        assert_eq!(record.aligned_pos, (1, 1));

        let deletion = empty_sequence_record(b"acgt", b"").expect("one side empty");
        assert_eq!(deletion.ref_allele, b"acgt");
        assert!(deletion.alt_allele.is_empty());

        assert!(empty_sequence_record(b"", b"").is_none());
        assert!(empty_sequence_record(b"a", b"c").is_none());
    }
}
