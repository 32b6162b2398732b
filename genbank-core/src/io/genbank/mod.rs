//! GenBank flat-file format.
//!
//! Bidirectional conversion between GenBank text and an in-memory annotated
//! sequence: [`parser`] turns `//`-terminated records into
//! [`GenBankRecord`]s, [`formatter`] renders them back. Formatting a parsed
//! record and re-parsing it reproduces the record exactly, and the rendered
//! text differs from well-formed input only in line endings.

pub mod feature;
pub mod features;
pub mod formatter;
pub mod keys;
pub mod location;
pub mod locus;
pub mod metadata;
pub mod parser;

pub use feature::{FeatureItem, QualifierBag};
pub use features::SequenceFeatures;
pub use formatter::{
    genbank_record_to_string, write_genbank_record, write_genbank_records,
    write_genbank_records_to_path,
};
pub use keys::{qualifier_names, FeatureKind, STANDARD_FEATURE_KEYS};
pub use location::{Location, LocationOperator};
pub use locus::{DivisionCode, Locus, MoleculeType, StrandTopology, StrandType};
pub use metadata::{
    CitationReference, CrossReferenceKind, CrossReferenceLink, GenBankAccession, GenBankMetadata,
    GenBankVersion, OrganismInfo, ProjectIdentifier, SequenceSegment, SequenceSource,
};
pub use parser::{
    genbank_records_from_reader, read_genbank_records_from_bytes, read_genbank_records_from_path,
    read_genbank_records_from_path_with_alphabet, read_genbank_records_from_reader,
    read_genbank_records_from_reader_with_alphabet, GenBankRecords,
};

use crate::seq::Sequence;

/// One parsed record: the sequence plus everything the flat file said about
/// it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenBankRecord {
    pub sequence: Sequence,
    pub metadata: GenBankMetadata,
}
