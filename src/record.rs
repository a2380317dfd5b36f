//! Variant record model shared by the extractor and the emitters.

use std::fmt;

/// Number of alleles compared by every record (reference plus one alternate).
pub const ALLELE_COUNT: usize = 2;

/// Call type assigned to a run of aligned columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// Alternate base is the ambiguity code.
    NoCall,
    /// Reference and alternate agree.
    Ref,
    /// One or more mismatching bases, no gaps.
    Substitution,
    /// At least one gap on either side.
    Indel,
}

impl VariantKind {
    /// Lowercase label used in debug output.
    pub fn label(self) -> &'static str {
        match self {
            VariantKind::NoCall => "nocall",
            VariantKind::Ref => "ref",
            VariantKind::Substitution => "sub",
            VariantKind::Indel => "indel",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One run of identically classified columns, addressed in raw reference,
/// raw alternate and gapped alignment coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    /// 0-based offset of `ref_allele` in the gap-free reference.
    pub ref_pos: usize,
    /// 0-based offset of `alt_allele` in the gap-free alternate.
    pub alt_pos: usize,
    /// Starting alignment column on the (reference, alternate) rows.
    pub aligned_pos: (usize, usize),
    /// Run length in alignment columns on the (reference, alternate) rows.
    pub aligned_len: (usize, usize),
    /// Reference bases covered by the run, gaps removed.
    pub ref_allele: Vec<u8>,
    /// Alternate bases covered by the run, gaps removed.
    pub alt_allele: Vec<u8>,
    /// Call type of the run.
    pub kind: VariantKind,
    /// Reference base immediately before the run, if any.
    pub ref_prefix: Option<u8>,
    /// First reference base after the run; only set for runs starting at
    /// reference offset 0, where no prefix exists.
    pub ref_suffix: Option<u8>,
}

impl VariantRecord {
    /// Number of alleles compared (always [`ALLELE_COUNT`]).
    pub fn allele_count(&self) -> usize {
        ALLELE_COUNT
    }

    /// Display label; a one-base substitution reads as `snp`.
    pub fn label(&self) -> &'static str {
        match self.kind {
            VariantKind::Substitution if self.ref_allele.len() == 1 => "snp",
            kind => kind.label(),
        }
    }

    /// Returns `true` for records that are emitted as variants.
    pub fn is_variant(&self) -> bool {
        matches!(self.kind, VariantKind::Substitution | VariantKind::Indel)
    }
}

impl fmt::Display for VariantRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let anchor = |base: Option<u8>| base.map(char::from).unwrap_or('.');
        write!(
            f,
            "({}) [{}+{},{}+{}] refpos:{} ref({}!{}!{}) altpos:{} alt({}) {}",
            self.allele_count(),
            self.aligned_pos.0,
            self.aligned_len.0,
            self.aligned_pos.1,
            self.aligned_len.1,
            self.ref_pos,
            anchor(self.ref_prefix),
            String::from_utf8_lossy(&self.ref_allele),
            anchor(self.ref_suffix),
            self.alt_pos,
            String::from_utf8_lossy(&self.alt_allele),
            self.label(),
        )
    }
}
