//! The feature table of one record.

use crate::error::{GenBankError, GenBankResult};
use crate::io::genbank::feature::FeatureItem;
use crate::io::genbank::keys::FeatureKind;

/// All features of a record, in file order.
///
/// `all` is the single source of truth; every typed view filters it at
/// access time, so mutations of `all` are immediately visible through every
/// view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceFeatures {
    pub all: Vec<FeatureItem>,
}

macro_rules! typed_views {
    ($($(#[$doc:meta])* $name:ident => $kind:ident),+ $(,)?) => {
        impl SequenceFeatures {
            $(
                $(#[$doc])*
                pub fn $name(&self) -> Vec<&FeatureItem> {
                    self.of_kind(FeatureKind::$kind)
                }
            )+
        }
    };
}

impl SequenceFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Features carrying one of the canonical kinds.
    pub fn of_kind(&self, kind: FeatureKind) -> Vec<&FeatureItem> {
        self.all
            .iter()
            .filter(|f| f.kind() == Some(kind))
            .collect()
    }

    /// Features with the given flat-file key (canonical or custom).
    pub fn features_with_key(&self, key: &str) -> Vec<&FeatureItem> {
        self.all.iter().filter(|f| f.key() == key).collect()
    }

    /// Features of this record overlapping the 1-based inclusive range
    /// `start..=end` (accession-qualified features are excluded).
    pub fn features_in_range(
        &self,
        start: usize,
        end: usize,
    ) -> GenBankResult<Vec<&FeatureItem>> {
        self.in_range(None, start, end)
    }

    /// Features located on the record `accession` overlapping the range.
    pub fn features_in_range_of(
        &self,
        accession: &str,
        start: usize,
        end: usize,
    ) -> GenBankResult<Vec<&FeatureItem>> {
        self.in_range(Some(accession), start, end)
    }

    fn in_range(
        &self,
        accession: Option<&str>,
        start: usize,
        end: usize,
    ) -> GenBankResult<Vec<&FeatureItem>> {
        if start > end {
            return Err(GenBankError::InvalidRange { start, end });
        }

        let mut found = Vec::new();
        for feature in &self.all {
            let location = feature.location();
            if start > location.end()? || location.start()? > end {
                continue;
            }
            let matches = match (accession, location.accession()) {
                (None, None) => true,
                (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
                _ => false,
            };
            if matches {
                found.push(feature);
            }
        }
        Ok(found)
    }
}

typed_views![
    sources => Source,
    minus10_signals => Minus10Signal,
    minus35_signals => Minus35Signal,
    three_prime_utrs => ThreePrimeUtr,
    five_prime_utrs => FivePrimeUtr,
    attenuators => Attenuator,
    caat_signals => CaatSignal,
    coding_sequences => CodingSequence,
    displacement_loops => DisplacementLoop,
    enhancers => Enhancer,
    exons => Exon,
    gc_signals => GcSignal,
    genes => Gene,
    intervening_dnas => InterveningDna,
    introns => Intron,
    long_terminal_repeats => LongTerminalRepeat,
    mature_peptides => MaturePeptide,
    misc_bindings => MiscBinding,
    misc_differences => MiscDifference,
    misc_features => MiscFeature,
    misc_recombinations => MiscRecombination,
    misc_rnas => MiscRna,
    misc_signals => MiscSignal,
    misc_structures => MiscStructure,
    modified_bases => ModifiedBase,
    messenger_rnas => MessengerRna,
    non_coding_rnas => NonCodingRna,
    operon_regions => OperonRegion,
    poly_a_signals => PolyASignal,
    poly_a_sites => PolyASite,
    precursor_rnas => PrecursorRna,
    promoters => Promoter,
    protein_binding_sites => ProteinBindingSite,
    ribosome_binding_sites => RibosomeBindingSite,
    replication_origins => ReplicationOrigin,
    repeat_regions => RepeatRegion,
    ribosomal_rnas => RibosomalRna,
    signal_peptides => SignalPeptide,
    stem_loops => StemLoop,
    tata_signals => TataSignal,
    terminators => Terminator,
    transfer_messenger_rnas => TransferMessengerRna,
    transit_peptides => TransitPeptide,
    transfer_rnas => TransferRna,
    unsure_sequence_regions => UnsureSequenceRegion,
    variations => Variation,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::genbank::location::Location;

    fn sample() -> SequenceFeatures {
        let mut features = SequenceFeatures::new();
        features
            .all
            .push(FeatureItem::of_kind(FeatureKind::Gene, Location::range(10, 400)));
        features.all.push(FeatureItem::of_kind(
            FeatureKind::CodingSequence,
            Location::range(50, 350),
        ));
        features
            .all
            .push(FeatureItem::of_kind(FeatureKind::Exon, Location::range(50, 120)));
        features
            .all
            .push(FeatureItem::of_kind(FeatureKind::Exon, Location::range(200, 350)));
        features
    }

    #[test]
    fn views_are_filters_over_all() {
        let features = sample();
        assert_eq!(features.all.len(), 4);
        assert_eq!(features.genes().len(), 1);
        assert_eq!(features.coding_sequences().len(), 1);
        assert_eq!(features.exons().len(), 2);
        assert_eq!(features.introns().len(), 0);
    }

    #[test]
    fn mutating_all_updates_views() {
        let mut features = sample();
        features
            .all
            .push(FeatureItem::of_kind(FeatureKind::Exon, Location::range(360, 380)));
        assert_eq!(features.exons().len(), 3);

        features.all.clear();
        assert!(features.all.is_empty());
        assert!(features.exons().is_empty());
        assert!(features.genes().is_empty());
    }

    #[test]
    fn custom_keys_preserved_in_insertion_order() {
        let mut features = SequenceFeatures::new();
        features
            .all
            .push(FeatureItem::new("my_first_key", Location::point(5)));
        features
            .all
            .push(FeatureItem::new("my_second_key", Location::point(9)));

        assert_eq!(features.all[0].key(), "my_first_key");
        assert_eq!(features.all[1].key(), "my_second_key");
        assert_eq!(features.features_with_key("my_second_key").len(), 1);
        assert!(features.coding_sequences().is_empty());
    }

    #[test]
    fn range_queries_use_overlap() {
        let features = sample();
        assert_eq!(features.features_in_range(1, 9).unwrap().len(), 0);
        assert_eq!(features.features_in_range(1, 10).unwrap().len(), 1);
        assert_eq!(features.features_in_range(60, 110).unwrap().len(), 3);
        assert_eq!(features.features_in_range(1, 500).unwrap().len(), 4);
        // widening the window never loses features
        assert!(features.features_in_range(60, 250).unwrap().len() >= 3);
        assert!(features.features_in_range(395, 480).unwrap().len() >= 1);
        assert!(features.features_in_range(9, 8).is_err());
    }

    #[test]
    fn range_query_with_accession() {
        let mut features = sample();
        features.all.push(FeatureItem::new(
            "misc_feature",
            "AF032048.1:100..200".parse().unwrap(),
        ));

        // plain queries skip accession-qualified features
        assert_eq!(features.features_in_range(100, 200).unwrap().len(), 4);
        let referred = features.features_in_range_of("AF032048.1", 100, 200).unwrap();
        assert_eq!(referred.len(), 1);
        assert_eq!(referred[0].key(), "misc_feature");
        assert_eq!(
            features
                .features_in_range_of("af032048.1", 150, 160)
                .unwrap()
                .len(),
            1
        );
    }
}
