//! Header metadata of one GenBank record.

use crate::error::GenBankResult;
use crate::io::genbank::feature::FeatureItem;
use crate::io::genbank::features::SequenceFeatures;
use crate::io::genbank::keys::qualifier_names;
use crate::io::genbank::locus::Locus;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenBankAccession {
    pub primary: Box<str>,
    pub secondary: Vec<Box<str>>,
}

/// The VERSION line: primary accession, version number and GI number. All
/// parts may be empty; SnapGene-generated files carry a bare `.`
/// placeholder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenBankVersion {
    pub accession: Box<str>,
    pub version: Box<str>,
    pub gi_number: Box<str>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectIdentifier {
    pub name: Box<str>,
    pub numbers: Vec<Box<str>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CrossReferenceKind {
    #[default]
    Other,
    Project,
    BioProject,
    TraceAssemblyArchive,
}

/// One DBLINK line. The label is kept verbatim so unknown link types render
/// back unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CrossReferenceLink {
    pub kind: CrossReferenceKind,
    pub label: Box<str>,
    pub numbers: Vec<Box<str>>,
}

impl CrossReferenceLink {
    pub fn classify(label: &str) -> CrossReferenceKind {
        if label.eq_ignore_ascii_case("Project") {
            CrossReferenceKind::Project
        } else if label.eq_ignore_ascii_case("BioProject") {
            CrossReferenceKind::BioProject
        } else if label.eq_ignore_ascii_case("Trace Assembly Archive") {
            CrossReferenceKind::TraceAssemblyArchive
        } else {
            CrossReferenceKind::Other
        }
    }
}

/// SEGMENT header: position of this entry in a segmented set (`n of m`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceSegment {
    pub current: usize,
    pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrganismInfo {
    pub genus: Box<str>,
    pub species: Box<str>,
    pub class_levels: Box<str>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceSource {
    pub common_name: Box<str>,
    pub organism: OrganismInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CitationReference {
    pub number: usize,
    pub location: Option<Box<str>>,
    pub authors: Option<Box<str>>,
    pub consortiums: Option<Box<str>>,
    pub title: Option<Box<str>>,
    pub journal: Option<Box<str>>,
    pub medline: Option<Box<str>>,
    pub pubmed: Option<Box<str>>,
    pub remarks: Option<Box<str>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenBankMetadata {
    pub locus: Option<Locus>,
    pub definition: Option<Box<str>>,
    pub accession: Option<GenBankAccession>,
    pub version: Option<GenBankVersion>,
    pub project: Option<ProjectIdentifier>,
    pub db_links: Vec<CrossReferenceLink>,
    pub db_source: Option<Box<str>>,
    pub keywords: Option<Box<str>>,
    pub segment: Option<SequenceSegment>,
    pub source: Option<SequenceSource>,
    pub references: Vec<CitationReference>,
    pub comments: Vec<Box<str>>,
    pub primary: Option<Box<str>>,
    pub features: Option<SequenceFeatures>,
    pub base_count: Option<Box<str>>,
    pub origin: Option<Box<str>>,
    pub contig: Option<Box<str>>,
}

impl GenBankMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Features overlapping `start..=end` (1-based inclusive), excluding
    /// accession-qualified ones. Empty without a feature table.
    pub fn features_in_range(
        &self,
        start: usize,
        end: usize,
    ) -> GenBankResult<Vec<&FeatureItem>> {
        match &self.features {
            Some(features) => features.features_in_range(start, end),
            None => Ok(Vec::new()),
        }
    }

    /// Features located on the record `accession` overlapping the range.
    pub fn features_in_range_of(
        &self,
        accession: &str,
        start: usize,
        end: usize,
    ) -> GenBankResult<Vec<&FeatureItem>> {
        match &self.features {
            Some(features) => features.features_in_range_of(accession, start, end),
            None => Ok(Vec::new()),
        }
    }

    /// Citations referred to by the feature's `/citation` qualifiers,
    /// resolved against this entry's reference list.
    ///
    /// Values are reference numbers, usually bracketed (`[1]`). Results keep
    /// qualifier order without duplicates; numbers that match no reference
    /// and values that do not parse are skipped.
    pub fn citations_referred_in_feature(&self, feature: &FeatureItem) -> Vec<&CitationReference> {
        let mut found: Vec<&CitationReference> = Vec::new();
        for value in feature.qualifier(qualifier_names::CITATION) {
            let number: usize = match value.replace(['[', ']'], "").trim().parse() {
                Ok(number) => number,
                Err(_) => continue,
            };
            if let Some(reference) = self.references.iter().find(|r| r.number == number) {
                if !found.iter().any(|r| r.number == number) {
                    found.push(reference);
                }
            }
        }
        found
    }

    /// Deduplicated union of citation references over all features.
    pub fn citations_referred_in_features(&self) -> Vec<&CitationReference> {
        let mut found: Vec<&CitationReference> = Vec::new();
        if let Some(features) = &self.features {
            for feature in &features.all {
                for reference in self.citations_referred_in_feature(feature) {
                    if !found.iter().any(|r| r.number == reference.number) {
                        found.push(reference);
                    }
                }
            }
        }
        found
    }
}
