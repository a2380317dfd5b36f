//! Pairwise aligner seam.
//!
//! The conversion core never aligns sequences itself; it asks a
//! [`PairwiseAligner`] for two equal-length gapped rows. [`BioAligner`]
//! delegates to rust-bio's affine pairwise aligner.

use bio::alignment::pairwise::Aligner;
use bio::alignment::{Alignment, AlignmentOperation};
use thiserror::Error;

use crate::alphabet::{is_alignable, END_SENTINEL, GAP, START_SENTINEL};
use crate::config::{AlignMode, ScoringParams};

/// Errors surfaced by an aligner.
#[derive(Debug, Error)]
pub enum AlignerError {
    /// Input contains a byte outside `{-,a,c,g,t,n,x}`.
    #[error("invalid character '{base}' in {sequence} sequence (pos {position}); must be one of [-acgtnx]")]
    InvalidBase {
        /// Which input the byte came from.
        sequence: &'static str,
        /// 0-based offset of the byte.
        position: usize,
        /// Offending byte.
        base: char,
    },

    /// Aligner produced rows of different lengths.
    #[error("aligned rows differ in length: {reference} != {alternate}")]
    LengthMismatch {
        /// Reference row length.
        reference: usize,
        /// Alternate row length.
        alternate: usize,
    },
}

/// Two gapped rows of equal length.
///
/// The reference row may cover only a window of the raw reference (fitted
/// alignment). `reference_start` is the raw offset of the window's first base
/// and `reference_anchor` the raw base just before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPair {
    reference: Vec<u8>,
    alternate: Vec<u8>,
    reference_start: usize,
    reference_anchor: Option<u8>,
}

impl AlignedPair {
    /// Wrap two rows, checking they have the same length.
    pub fn new(reference: Vec<u8>, alternate: Vec<u8>) -> Result<Self, AlignerError> {
        if reference.len() != alternate.len() {
            return Err(AlignerError::LengthMismatch {
                reference: reference.len(),
                alternate: alternate.len(),
            });
        }
        Ok(Self {
            reference,
            alternate,
            reference_start: 0,
            reference_anchor: None,
        })
    }

    /// Mark the reference row as a window starting at `start` within the raw
    /// `reference`.
    pub fn with_reference_window(mut self, reference: &[u8], start: usize) -> Self {
        self.reference_start = start;
        self.reference_anchor = start
            .checked_sub(1)
            .and_then(|idx| reference.get(idx).copied());
        self
    }

    /// Raw reference offset of the first reference base in the rows.
    pub fn reference_start(&self) -> usize {
        self.reference_start
    }

    /// Raw reference base immediately before the window, if any.
    pub fn reference_anchor(&self) -> Option<u8> {
        self.reference_anchor
    }

    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    /// Returns `true` when there are no columns.
    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// Gapped reference row.
    pub fn reference(&self) -> &[u8] {
        &self.reference
    }

    /// Gapped alternate row.
    pub fn alternate(&self) -> &[u8] {
        &self.alternate
    }

    /// Rows with a start and end sentinel column added to each.
    pub fn into_anchored(self) -> (Vec<u8>, Vec<u8>) {
        (anchor(self.reference), anchor(self.alternate))
    }
}

fn anchor(row: Vec<u8>) -> Vec<u8> {
    let mut anchored = Vec::with_capacity(row.len() + 2);
    anchored.push(START_SENTINEL);
    anchored.extend(row);
    anchored.push(END_SENTINEL);
    anchored
}

/// Anything able to align a raw reference against a raw alternate.
pub trait PairwiseAligner {
    /// Produce equal-length gapped rows for the two inputs.
    fn align(&self, reference: &[u8], alternate: &[u8]) -> Result<AlignedPair, AlignerError>;
}

/// rust-bio backed aligner.
#[derive(Debug, Clone, Copy)]
pub struct BioAligner {
    mode: AlignMode,
    scoring: ScoringParams,
}

impl BioAligner {
    /// Create an aligner for the given mode and scores.
    ///
    /// Gap penalties must be non-positive; rust-bio panics otherwise, so
    /// callers validate them first (see [`crate::Converter::new`]).
    pub fn new(mode: AlignMode, scoring: ScoringParams) -> Self {
        Self { mode, scoring }
    }
}

impl PairwiseAligner for BioAligner {
    fn align(&self, reference: &[u8], alternate: &[u8]) -> Result<AlignedPair, AlignerError> {
        validate("reference", reference)?;
        validate("alternate", alternate)?;

        let scoring = self.scoring;
        let score = move |a: u8, b: u8| scoring.score(a, b);

        match self.mode {
            AlignMode::Global => {
                let mut aligner = Aligner::with_capacity(
                    reference.len(),
                    alternate.len(),
                    scoring.gap_open,
                    scoring.gap_extend,
                    score,
                );
                let alignment = aligner.global(reference, alternate);
                let (reference_row, alternate_row) = render_rows(&alignment, reference, alternate);
                AlignedPair::new(reference_row, alternate_row)
            }
            AlignMode::Fitted => {
                // Semi-global aligns x end to end inside a window of y.
                let mut aligner = Aligner::with_capacity(
                    alternate.len(),
                    reference.len(),
                    scoring.gap_open,
                    scoring.gap_extend,
                    score,
                );
                let alignment = aligner.semiglobal(alternate, reference);
                let (alternate_row, reference_row) = render_rows(&alignment, alternate, reference);
                Ok(AlignedPair::new(reference_row, alternate_row)?
                    .with_reference_window(reference, alignment.ystart))
            }
        }
    }
}

fn validate(sequence: &'static str, bases: &[u8]) -> Result<(), AlignerError> {
    match bases.iter().position(|&b| !is_alignable(b)) {
        Some(position) => Err(AlignerError::InvalidBase {
            sequence,
            position,
            base: char::from(bases[position]),
        }),
        None => Ok(()),
    }
}

/// Render the aligned window of `alignment` as two gapped rows (x, y).
///
/// Standard modes report clipping through `xstart`/`ystart` and filter clip
/// operations out, so clipped flanks are simply not rendered.
fn render_rows(alignment: &Alignment, x: &[u8], y: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut x_row = Vec::with_capacity(alignment.operations.len());
    let mut y_row = Vec::with_capacity(alignment.operations.len());
    let (mut xi, mut yi) = (alignment.xstart, alignment.ystart);

    for op in &alignment.operations {
        match *op {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                x_row.push(x[xi]);
                y_row.push(y[yi]);
                xi += 1;
                yi += 1;
            }
            AlignmentOperation::Del => {
                x_row.push(GAP);
                y_row.push(y[yi]);
                yi += 1;
            }
            AlignmentOperation::Ins => {
                x_row.push(x[xi]);
                y_row.push(GAP);
                xi += 1;
            }
            AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => {}
        }
    }

    (x_row, y_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(row: &[u8]) -> Vec<u8> {
        row.iter().copied().filter(|&b| b != GAP).collect()
    }

    #[test]
    fn global_rows_cover_both_inputs() {
        let aligner = BioAligner::new(AlignMode::Global, ScoringParams::default());
        let pair = aligner.align(b"gcatgcatg", b"gcatg").unwrap();
        assert_eq!(pair.reference().len(), pair.alternate().len());
        assert_eq!(strip(pair.reference()), b"gcatgcatg");
        assert_eq!(strip(pair.alternate()), b"gcatg");
        assert_eq!(pair.alternate().iter().filter(|&&b| b == GAP).count(), 4);
    }

    #[test]
    fn identical_inputs_align_without_gaps() {
        let aligner = BioAligner::new(AlignMode::Global, ScoringParams::default());
        let pair = aligner.align(b"acgtacgt", b"acgtacgt").unwrap();
        assert_eq!(pair.reference(), b"acgtacgt");
        assert_eq!(pair.alternate(), b"acgtacgt");
    }

    #[test]
    fn fitted_alignment_keeps_whole_alternate() {
        let aligner = BioAligner::new(AlignMode::Fitted, ScoringParams::default());
        let pair = aligner.align(b"ttttgcatgtttt", b"gcatg").unwrap();
        assert_eq!(strip(pair.alternate()), b"gcatg");
        assert_eq!(pair.reference(), b"gcatg");
        assert_eq!(pair.reference_start(), 4);
        assert_eq!(pair.reference_anchor(), Some(b't'));
    }

    #[test]
    fn global_rows_start_at_reference_origin() {
        let aligner = BioAligner::new(AlignMode::Global, ScoringParams::default());
        let pair = aligner.align(b"ttttgcatgtttt", b"gcatg").unwrap();
        assert_eq!(pair.reference_start(), 0);
        assert_eq!(pair.reference_anchor(), None);
    }

    #[test]
    fn window_anchor_is_base_before_start() {
        let pair = AlignedPair::new(b"gc".to_vec(), b"gc".to_vec())
            .unwrap()
            .with_reference_window(b"aagc", 2);
        assert_eq!(pair.reference_start(), 2);
        assert_eq!(pair.reference_anchor(), Some(b'a'));
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        let aligner = BioAligner::new(AlignMode::Global, ScoringParams::default());
        let err = aligner.align(b"acgu", b"acgt").unwrap_err();
        assert!(matches!(
            err,
            AlignerError::InvalidBase {
                sequence: "reference",
                position: 3,
                base: 'u'
            }
        ));
    }

    #[test]
    fn anchored_rows_gain_sentinels() {
        let pair = AlignedPair::new(b"ac-t".to_vec(), b"acgt".to_vec()).unwrap();
        let (r, a) = pair.into_anchored();
        assert_eq!(r, b"^ac-t$");
        assert_eq!(a, b"^acgt$");
    }

    #[test]
    fn unequal_rows_are_rejected() {
        assert!(matches!(
            AlignedPair::new(b"acgt".to_vec(), b"acg".to_vec()),
            Err(AlignerError::LengthMismatch { .. })
        ));
    }
}
