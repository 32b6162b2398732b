//! Runtime-typed biological sequence.
//!
//! GenBank records declare their molecule in the LOCUS line, so the alphabet
//! of a parsed sequence is only known at run time. `Sequence` pairs the raw
//! residues with a [`SeqKind`] and validates every byte against that kind's
//! IUPAC alphabet on construction.

use std::fmt;

use crate::alphabets::{dna, protein, rna, Alphabet};
use crate::error::{GenBankError, GenBankResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeqKind {
    Dna,
    Rna,
    Protein,
}

/// Characters that appear in protein sequences but never in DNA/RNA IUPAC
/// alphabets.
const PROTEIN_ONLY: &[u8] = b"EFILPQefilpq";

impl SeqKind {
    /// Detect the sequence kind from raw bytes.
    ///
    /// Rules (deterministic, not probabilistic):
    /// - Contains any protein-only character → Protein
    /// - Contains U but not T → RNA
    /// - Otherwise → DNA (the safe default)
    pub fn detect(bytes: &[u8]) -> SeqKind {
        let mut has_t = false;
        let mut has_u = false;

        for &b in bytes {
            if PROTEIN_ONLY.contains(&b) {
                return SeqKind::Protein;
            }
            match b {
                b'T' | b't' => has_t = true,
                b'U' | b'u' => has_u = true,
                _ => {}
            }
        }

        if has_u && !has_t {
            SeqKind::Rna
        } else {
            SeqKind::Dna
        }
    }

    pub fn iupac_alphabet(self) -> Alphabet {
        match self {
            SeqKind::Dna => dna::iupac_alphabet(),
            SeqKind::Rna => rna::iupac_alphabet(),
            SeqKind::Protein => protein::iupac_alphabet(),
        }
    }
}

impl fmt::Display for SeqKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeqKind::Dna => "DNA",
            SeqKind::Rna => "RNA",
            SeqKind::Protein => "Protein",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    kind: SeqKind,
    bytes: Vec<u8>,
    id: Box<str>,
}

impl Sequence {
    /// Builds a sequence, validating every byte against `kind`'s IUPAC
    /// alphabet.
    pub fn new(kind: SeqKind, bytes: Vec<u8>, id: impl Into<Box<str>>) -> GenBankResult<Self> {
        if let Some((pos, b)) = kind.iupac_alphabet().find_invalid(&bytes) {
            return Err(GenBankError::AlphabetMismatch {
                ch: b as char,
                pos,
                kind,
            });
        }
        Ok(Self {
            kind,
            bytes,
            id: id.into(),
        })
    }

    /// Constructor for bytes already known to be valid for `kind`.
    pub(crate) fn from_validated(kind: SeqKind, bytes: Vec<u8>, id: impl Into<Box<str>>) -> Self {
        Self {
            kind,
            bytes,
            id: id.into(),
        }
    }

    pub fn kind(&self) -> SeqKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Zero-based slice of `len` residues starting at `start`.
    pub fn subsequence(&self, start: usize, len: usize) -> GenBankResult<Sequence> {
        let end = start.saturating_add(len);
        if end > self.bytes.len() {
            return Err(GenBankError::RangeOutOfBounds {
                start,
                end,
                len: self.bytes.len(),
            });
        }
        Ok(Sequence::from_validated(
            self.kind,
            self.bytes[start..end].to_vec(),
            "",
        ))
    }

    pub fn reverse_complement(&self) -> GenBankResult<Sequence> {
        let bytes = match self.kind {
            SeqKind::Dna => dna::reverse_complement(&self.bytes),
            SeqKind::Rna => rna::reverse_complement(&self.bytes),
            SeqKind::Protein => {
                return Err(GenBankError::UnsupportedComplement { kind: self.kind })
            }
        };
        Ok(Sequence::from_validated(self.kind, bytes, ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_protein() {
        assert_eq!(SeqKind::detect(b"MFVFLVLLPLVSS"), SeqKind::Protein);
    }

    #[test]
    fn detect_rna_via_u() {
        assert_eq!(SeqKind::detect(b"ACGU"), SeqKind::Rna);
        assert_eq!(SeqKind::detect(b"aaccgguu"), SeqKind::Rna);
    }

    #[test]
    fn detect_dna_default() {
        assert_eq!(SeqKind::detect(b"ACGT"), SeqKind::Dna);
        assert_eq!(SeqKind::detect(b"AACCGG"), SeqKind::Dna);
        assert_eq!(SeqKind::detect(b""), SeqKind::Dna);
        // both T and U present defaults to DNA
        assert_eq!(SeqKind::detect(b"ACGTU"), SeqKind::Dna);
    }

    #[test]
    fn new_validates_alphabet() {
        assert!(Sequence::new(SeqKind::Dna, b"acgtn".to_vec(), "s1").is_ok());
        let err = Sequence::new(SeqKind::Protein, b"acg#".to_vec(), "s1").unwrap_err();
        match err {
            GenBankError::AlphabetMismatch { ch: '#', pos: 3, .. } => {}
            other => panic!("expected alphabet mismatch, got {other:?}"),
        }
    }

    #[test]
    fn subsequence_bounds() {
        let s = Sequence::new(SeqKind::Dna, b"acgtacgt".to_vec(), "s").unwrap();
        assert_eq!(s.subsequence(2, 4).unwrap().as_bytes(), b"gtac");
        assert!(s.subsequence(6, 4).is_err());
    }

    #[test]
    fn reverse_complement_by_kind() {
        let s = Sequence::new(SeqKind::Dna, b"aacg".to_vec(), "s").unwrap();
        assert_eq!(s.reverse_complement().unwrap().as_bytes(), b"cgtt");

        let p = Sequence::new(SeqKind::Protein, b"MKV".to_vec(), "p").unwrap();
        assert!(p.reverse_complement().is_err());
    }
}
