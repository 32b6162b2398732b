//! Features of an annotated sequence.
//!
//! Every feature is one [`FeatureItem`]: a key, a location and an ordered
//! qualifier bag. The typed accessors (gene symbol, citation list, and so
//! on) are views over the same bag: there is one representation, with a
//! [`FeatureKind`] tag instead of a type per feature key.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::GenBankResult;
use crate::io::genbank::features::SequenceFeatures;
use crate::io::genbank::keys::{qualifier_names, FeatureKind};
use crate::io::genbank::location::Location;
use crate::seq::Sequence;

/// Qualifier name → values, in document order. Names are case sensitive and
/// values are stored verbatim, including any surrounding quotes.
pub type QualifierBag = IndexMap<Box<str>, Vec<Box<str>>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureItem {
    key: Box<str>,
    location: Location,
    qualifiers: QualifierBag,
}

impl FeatureItem {
    pub fn new(key: impl Into<Box<str>>, location: Location) -> Self {
        Self {
            key: key.into(),
            location,
            qualifiers: QualifierBag::new(),
        }
    }

    /// Feature with one of the canonical keys.
    pub fn of_kind(kind: FeatureKind, location: Location) -> Self {
        Self::new(kind.key(), location)
    }

    pub fn with_qualifiers(mut self, qualifiers: QualifierBag) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Kind tag for canonical keys; `None` for custom keys.
    pub fn kind(&self) -> Option<FeatureKind> {
        FeatureKind::from_key(&self.key)
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    pub fn qualifiers(&self) -> &QualifierBag {
        &self.qualifiers
    }

    pub fn qualifiers_mut(&mut self) -> &mut QualifierBag {
        &mut self.qualifiers
    }

    /// Appends one value to the named qualifier (qualifiers repeat freely).
    pub fn add_qualifier(&mut self, name: impl Into<Box<str>>, value: impl Into<Box<str>>) {
        self.qualifiers
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// All values of the named qualifier, empty when absent.
    pub fn qualifier(&self, name: &str) -> &[Box<str>] {
        self.qualifiers.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of a qualifier expected to appear at most once.
    pub fn single_qualifier(&self, name: &str) -> Option<&str> {
        self.qualifier(name).first().map(|v| &**v)
    }

    /// Replaces every value of the named qualifier with `value`.
    pub fn set_single_qualifier(&mut self, name: &str, value: &str) {
        let values = self.qualifiers.entry(name.into()).or_default();
        values.clear();
        values.push(value.into());
    }

    pub fn remove_qualifier(&mut self, name: &str) {
        self.qualifiers.shift_remove(name);
    }

    /// True when the valueless qualifier is present (e.g. `/pseudo`).
    pub fn flag_qualifier(&self, name: &str) -> bool {
        !self.qualifier(name).is_empty()
    }

    pub fn set_flag_qualifier(&mut self, name: &str, value: bool) {
        if value {
            if !self.flag_qualifier(name) {
                self.add_qualifier(name, "");
            }
        } else {
            self.remove_qualifier(name);
        }
    }

    /// Features of `features` whose span nests inside this feature's span.
    ///
    /// Used for containment graphs like gene → mRNA → CDS; nesting is not
    /// stored as an explicit tree edge. Features located on another record
    /// (accession-qualified) are skipped, as is this feature itself.
    pub fn sub_features<'a>(
        &self,
        features: &'a SequenceFeatures,
    ) -> GenBankResult<Vec<&'a FeatureItem>> {
        let start = self.location.start()?;
        let end = self.location.end()?;
        let mut nested = Vec::new();
        for item in &features.all {
            if std::ptr::eq(item, self) || item.location.accession().is_some() {
                continue;
            }
            if item.location.start()? >= start && item.location.end()? <= end {
                nested.push(item);
            }
        }
        Ok(nested)
    }

    /// The bases selected by this feature's location.
    pub fn sub_sequence(&self, sequence: &Sequence) -> GenBankResult<Sequence> {
        self.location.sub_sequence(sequence)
    }

    /// As [`FeatureItem::sub_sequence`], resolving accession-qualified
    /// sub-locations against `referred`.
    pub fn sub_sequence_with_references(
        &self,
        sequence: &Sequence,
        referred: &HashMap<String, Sequence>,
    ) -> GenBankResult<Sequence> {
        self.location.sub_sequence_with_references(sequence, referred)
    }
}

// Typed views over the shared qualifier bag. Scalar accessors replace any
// existing values on set; list accessors expose the raw multi-value form.
impl FeatureItem {
    pub fn gene_symbol(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::GENE)
    }

    pub fn set_gene_symbol(&mut self, value: &str) {
        self.set_single_qualifier(qualifier_names::GENE, value);
    }

    pub fn allele(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::ALLELE)
    }

    pub fn set_allele(&mut self, value: &str) {
        self.set_single_qualifier(qualifier_names::ALLELE, value);
    }

    pub fn locus_tag(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::LOCUS_TAG)
    }

    pub fn set_locus_tag(&mut self, value: &str) {
        self.set_single_qualifier(qualifier_names::LOCUS_TAG, value);
    }

    pub fn product(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::PRODUCT)
    }

    pub fn set_product(&mut self, value: &str) {
        self.set_single_qualifier(qualifier_names::PRODUCT, value);
    }

    pub fn protein_id(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::PROTEIN_ID)
    }

    pub fn set_protein_id(&mut self, value: &str) {
        self.set_single_qualifier(qualifier_names::PROTEIN_ID, value);
    }

    pub fn note(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::NOTE)
    }

    pub fn set_note(&mut self, value: &str) {
        self.set_single_qualifier(qualifier_names::NOTE, value);
    }

    pub fn label(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::LABEL)
    }

    pub fn set_label(&mut self, value: &str) {
        self.set_single_qualifier(qualifier_names::LABEL, value);
    }

    pub fn standard_name(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::STANDARD_NAME)
    }

    pub fn genomic_map_position(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::MAP)
    }

    pub fn enzyme_commission_number(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::EC_NUMBER)
    }

    pub fn molecule_type(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::MOL_TYPE)
    }

    pub fn organism(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::ORGANISM)
    }

    pub fn translation(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::TRANSLATION)
    }

    pub fn anticodon(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::ANTICODON)
    }

    pub fn replace(&self) -> Option<&str> {
        self.single_qualifier(qualifier_names::REPLACE)
    }

    /// Reference numbers into the entry's citation list, raw (`"[1]"`).
    pub fn citation(&self) -> &[Box<str>] {
        self.qualifier(qualifier_names::CITATION)
    }

    pub fn database_cross_reference(&self) -> &[Box<str>] {
        self.qualifier(qualifier_names::DB_XREF)
    }

    pub fn codon_start(&self) -> &[Box<str>] {
        self.qualifier(qualifier_names::CODON_START)
    }

    pub fn gene_synonym(&self) -> &[Box<str>] {
        self.qualifier(qualifier_names::GENE_SYNONYM)
    }

    pub fn experiment(&self) -> &[Box<str>] {
        self.qualifier(qualifier_names::EXPERIMENT)
    }

    pub fn function(&self) -> &[Box<str>] {
        self.qualifier(qualifier_names::FUNCTION)
    }

    pub fn inference(&self) -> &[Box<str>] {
        self.qualifier(qualifier_names::INFERENCE)
    }

    pub fn old_locus_tag(&self) -> &[Box<str>] {
        self.qualifier(qualifier_names::OLD_LOCUS_TAG)
    }

    pub fn pseudo(&self) -> bool {
        self.flag_qualifier(qualifier_names::PSEUDO)
    }

    pub fn set_pseudo(&mut self, value: bool) {
        self.set_flag_qualifier(qualifier_names::PSEUDO, value);
    }

    pub fn ribosomal_slippage(&self) -> bool {
        self.flag_qualifier(qualifier_names::RIBOSOMAL_SLIPPAGE)
    }

    pub fn trans_splicing(&self) -> bool {
        self.flag_qualifier(qualifier_names::TRANS_SPLICING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cds(range: (usize, usize)) -> FeatureItem {
        FeatureItem::of_kind(FeatureKind::CodingSequence, Location::range(range.0, range.1))
    }

    #[test]
    fn of_kind_sets_canonical_key() {
        let feature = FeatureItem::of_kind(FeatureKind::Attenuator, Location::range(1, 10));
        assert_eq!(feature.key(), "attenuator");
        assert_eq!(feature.kind(), Some(FeatureKind::Attenuator));

        let custom = FeatureItem::new("my_key", Location::point(3));
        assert_eq!(custom.kind(), None);
    }

    #[test]
    fn typed_accessors_share_the_bag() {
        let mut feature = cds((1, 9));
        assert_eq!(feature.gene_symbol(), None);

        feature.set_gene_symbol("\"AXL2\"");
        assert_eq!(feature.gene_symbol(), Some("\"AXL2\""));
        assert_eq!(&*feature.qualifier("gene")[0], "\"AXL2\"");

        // scalar set replaces all previous values
        feature.add_qualifier("gene", "\"OLD\"");
        feature.set_gene_symbol("\"NEW\"");
        assert_eq!(feature.qualifier("gene").len(), 1);
        assert_eq!(feature.gene_symbol(), Some("\"NEW\""));
    }

    #[test]
    fn repeated_qualifiers_keep_order() {
        let mut feature = cds((1, 9));
        feature.add_qualifier("db_xref", "\"GI:1\"");
        feature.add_qualifier("db_xref", "\"taxon:4932\"");
        let xrefs = feature.database_cross_reference();
        assert_eq!(xrefs.len(), 2);
        assert_eq!(&*xrefs[0], "\"GI:1\"");
        assert_eq!(&*xrefs[1], "\"taxon:4932\"");
    }

    #[test]
    fn flag_qualifiers() {
        let mut feature = cds((1, 9));
        assert!(!feature.pseudo());
        feature.set_pseudo(true);
        assert!(feature.pseudo());
        assert_eq!(feature.qualifier("pseudo").len(), 1);
        feature.set_pseudo(false);
        assert!(!feature.pseudo());
    }

    #[test]
    fn clone_is_independent() {
        let mut original = cds((10, 90));
        original.add_qualifier("note", "\"original\"");

        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.set_note("\"changed\"");
        copy.location_mut().set_end_data("120").unwrap();

        assert_eq!(original.note(), Some("\"original\""));
        assert_eq!(original.location().end().unwrap(), 90);
        assert_eq!(copy.location().end().unwrap(), 120);
    }

    #[test]
    fn sub_features_by_containment() {
        let mut features = SequenceFeatures::new();
        features.all.push(FeatureItem::of_kind(
            FeatureKind::Gene,
            Location::range(100, 500),
        ));
        features.all.push(FeatureItem::of_kind(
            FeatureKind::MessengerRna,
            Location::range(120, 480),
        ));
        features.all.push(cds((150, 450)));
        features.all.push(FeatureItem::of_kind(
            FeatureKind::Gene,
            Location::range(600, 900),
        ));
        features.all.push(FeatureItem::new(
            "misc_feature",
            "AB000001.1:200..300".parse().unwrap(),
        ));

        let gene = &features.all[0];
        let nested = gene.sub_features(&features).unwrap();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].key(), "mRNA");
        assert_eq!(nested[1].key(), "CDS");
    }
}
