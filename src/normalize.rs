//! Left-normalization of indels inside a gapped alignment.
//!
//! The usual description of variant normalization works on allele strings:
//! while the alleles end with the same base, truncate it; whenever an allele
//! becomes empty, extend both alleles one base to the left. An alignment row
//! cannot shrink or grow without breaking the equal-length invariant between
//! reference and alternate, so the same effect is produced here by walking
//! both rows right to left and swapping each gap with the nearest base to its
//! left whenever the bases on both sides of the column agree.
//!
//! ```text
//! gactactg    gactactg    gactactg    gactactg
//! gact---g -> gac---tg -> ga---ctg -> g---actg
//! ```

use crate::alphabet::{bases_equal, is_gap};
use crate::ConversionError;

/// Shift every indel gap run of an aligned pair to its leftmost equivalent
/// position, in place.
///
/// The reference and alternate windows start together at the last column and
/// always move together, so one cursor tracks both. Each time the window is
/// extended one column to the left, a gap under the cursor is exchanged with
/// the closest base to its left in the same row, provided the two exchanged
/// bases agree under [`bases_equal`]. Column 0 is never moved into unless the
/// base there matches.
///
/// Both rows keep their length and their multiset of non-gap bytes. Running
/// the function twice gives the same result as running it once.
pub fn normalize_pair(reference: &mut [u8], alternate: &mut [u8]) -> Result<(), ConversionError> {
    if reference.len() != alternate.len() {
        return Err(ConversionError::LengthMismatch {
            reference: reference.len(),
            alternate: alternate.len(),
        });
    }

    let Some(last) = reference.len().checked_sub(1) else {
        return Ok(());
    };

    for cursor in (0..last).rev() {
        let ref_source = swap_source(reference, cursor);
        let alt_source = swap_source(alternate, cursor);

        // Swapping a column with itself is a no-op, so only gap columns move.
        if bases_equal(reference[ref_source], alternate[alt_source]) {
            reference.swap(cursor, ref_source);
            alternate.swap(cursor, alt_source);
        }
    }

    Ok(())
}

/// Column whose base would fill `cursor`: the cursor itself for a base,
/// otherwise the nearest non-gap column to the left (column 0 as a last
/// resort).
fn swap_source(row: &[u8], cursor: usize) -> usize {
    if !is_gap(row[cursor]) {
        return cursor;
    }
    (1..cursor).rev().find(|&idx| !is_gap(row[idx])).unwrap_or(0)
}
