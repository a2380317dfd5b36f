//! Shortcut for pairs that need no alignment.
//!
//! Two equal-length sequences whose columns all agree (identical bases, or
//! the ambiguity code on either side) line up column for column, so the raw
//! bytes can go straight to the diff extractor. No gap ever reaches it, the
//! indel state is never entered, and normalization has nothing to move. Any
//! mismatching column sends the pair through the aligner instead, since an
//! equal-length pair with differences may be better explained by indels.

use tracing::debug;

use crate::alphabet::bases_equal;
use crate::diff::extract_variants;
use crate::record::VariantRecord;
use crate::ConversionError;

/// Returns `true` when the raw pair can skip alignment: same non-zero
/// length, and every column is an exact match or involves the ambiguity
/// code. Gap characters never qualify.
pub fn is_fast_path(reference: &[u8], alternate: &[u8]) -> bool {
    !reference.is_empty()
        && reference.len() == alternate.len()
        && reference
            .iter()
            .zip(alternate)
            .all(|(&r, &a)| bases_equal(r, a))
}

/// Extract records directly from raw sequences, indexing both with the same
/// offset.
pub fn extract_direct(
    reference: &[u8],
    alternate: &[u8],
) -> Result<Vec<VariantRecord>, ConversionError> {
    debug!(len = reference.len(), "extracting without alignment");
    extract_variants(reference, alternate)
}
