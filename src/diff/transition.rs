//! Column classification: (reference byte, alternate byte) → call type.
//!
//! Precedence is fixed: gap, then ambiguity on the alternate, then equality.

use crate::alphabet::BaseClass;
use crate::record::VariantKind;

/// Classify one aligned column, or `None` when no rule applies (an
/// ambiguous reference base facing a called alternate base).
pub fn classify(reference: u8, alternate: u8) -> Option<VariantKind> {
    match (BaseClass::of(reference), BaseClass::of(alternate)) {
        (BaseClass::Gap, _) | (_, BaseClass::Gap) => Some(VariantKind::Indel),
        (_, BaseClass::Ambiguous) => Some(VariantKind::NoCall),
        (BaseClass::Base(r), BaseClass::Base(a)) if r == a => Some(VariantKind::Ref),
        (BaseClass::Base(_), BaseClass::Base(_)) => Some(VariantKind::Substitution),
        (BaseClass::Ambiguous, BaseClass::Base(_)) => None,
    }
}
