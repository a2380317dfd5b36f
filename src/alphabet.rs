//! Aligned-column alphabet and the base equality predicate.
//!
//! Both the normalizer and the diff extractor decide "same base" through
//! [`bases_equal`], so the two stages always agree on where an indel can slide.

/// Gap placeholder inserted by the aligner.
pub const GAP: u8 = b'-';

/// Ambiguity code ("base not confidently determined").
pub const AMBIGUITY: u8 = b'n';

/// Start-of-alignment sentinel column.
pub const START_SENTINEL: u8 = b'^';

/// End-of-alignment sentinel column.
pub const END_SENTINEL: u8 = b'$';

/// Characters accepted in raw sequences handed to the aligner.
pub const ALIGNABLE: &[u8] = b"-acgtnx";

/// Coarse class of a single aligned byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseClass {
    /// Gap character.
    Gap,
    /// Ambiguity code, either case.
    Ambiguous,
    /// Any other byte, carried verbatim.
    Base(u8),
}

impl BaseClass {
    /// Classify an aligned byte.
    pub fn of(byte: u8) -> Self {
        match byte {
            GAP => BaseClass::Gap,
            b if is_ambiguous(b) => BaseClass::Ambiguous,
            b => BaseClass::Base(b),
        }
    }
}

/// Returns `true` for the ambiguity code in either case.
#[inline]
pub fn is_ambiguous(byte: u8) -> bool {
    byte.eq_ignore_ascii_case(&AMBIGUITY)
}

/// Returns `true` for the gap character.
#[inline]
pub fn is_gap(byte: u8) -> bool {
    byte == GAP
}

/// Equality used for normalization and classification.
///
/// Identical bytes are equal, and the ambiguity code equals anything that is
/// not a gap. A gap never equals anything, itself included.
#[inline]
pub fn bases_equal(a: u8, b: u8) -> bool {
    if is_gap(a) || is_gap(b) {
        return false;
    }
    a == b || is_ambiguous(a) || is_ambiguous(b)
}

/// Returns `true` when `byte` may appear in a raw (pre-alignment) sequence.
pub fn is_alignable(byte: u8) -> bool {
    ALIGNABLE.contains(&byte.to_ascii_lowercase())
}
