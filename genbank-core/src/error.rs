use std::io;
use thiserror::Error;

use crate::seq::SeqKind;

#[derive(Debug, Error)]
pub enum GenBankError {
    #[error("genbank parse error at line {line}: {msg}")]
    Parse { msg: String, line: usize },

    #[error("genbank io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid location string '{text}'")]
    InvalidLocation { text: String },

    #[error("location position data '{data}' is not resolvable")]
    InvalidPosition { data: String },

    #[error("complement location cannot have more than one sub-location")]
    ComplementWithMultipleSubLocations,

    #[error("location with operator 'none' cannot have sub-locations")]
    SubLocationsWithoutOperator,

    #[error("invalid location separator '{separator}'")]
    InvalidSeparator { separator: String },

    #[error("invalid character '{ch}' at position {pos} for {kind} alphabet")]
    AlphabetMismatch { ch: char, pos: usize, kind: SeqKind },

    #[error("requested {requested} alphabet does not match the record's {declared} molecule type")]
    AlphabetDeclarationMismatch { requested: SeqKind, declared: SeqKind },

    #[error("{kind} alphabet does not support complementation")]
    UnsupportedComplement { kind: SeqKind },

    #[error("referred sequence '{accession}' not found")]
    UnresolvedReference { accession: String },

    #[error("alphabet of referred sequence '{accession}' does not match the source sequence")]
    ReferredAlphabetMismatch { accession: String },

    #[error("invalid position range ({start}, {end})")]
    InvalidRange { start: usize, end: usize },

    #[error("sequence range {start}..{end} is out of bounds (length {len})")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    #[error("genbank format error: {msg}")]
    Format { msg: &'static str },
}

pub type GenBankResult<T> = Result<T, GenBankError>;
