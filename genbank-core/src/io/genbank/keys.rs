//! Closed registries of canonical GenBank feature keys and qualifier names.
//!
//! Both tables are `'static` and immutable after startup; custom keys that
//! appear in real files are preserved verbatim by the feature model and
//! simply fall outside these registries.

macro_rules! feature_kinds {
    ($(($variant:ident, $key:literal)),+ $(,)?) => {
        /// Kind tag for the canonical feature keys.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum FeatureKind {
            $($variant),+
        }

        impl FeatureKind {
            pub const ALL: &'static [FeatureKind] = &[$(FeatureKind::$variant),+];

            /// The flat-file key this kind renders as.
            pub fn key(self) -> &'static str {
                match self {
                    $(FeatureKind::$variant => $key),+
                }
            }

            /// Kind for a flat-file key; `None` for custom keys.
            pub fn from_key(key: &str) -> Option<FeatureKind> {
                match key {
                    $($key => Some(FeatureKind::$variant),)+
                    _ => None,
                }
            }
        }

        /// The canonical feature keys, in registry order.
        pub const STANDARD_FEATURE_KEYS: &[&str] = &[$($key),+];
    };
}

feature_kinds![
    (Source, "source"),
    (Minus10Signal, "-10_signal"),
    (Minus35Signal, "-35_signal"),
    (ThreePrimeUtr, "3'UTR"),
    (FivePrimeUtr, "5'UTR"),
    (Attenuator, "attenuator"),
    (CaatSignal, "CAAT_signal"),
    (CodingSequence, "CDS"),
    (DisplacementLoop, "D-loop"),
    (Enhancer, "enhancer"),
    (Exon, "exon"),
    (GcSignal, "GC_signal"),
    (Gene, "gene"),
    (InterveningDna, "iDNA"),
    (Intron, "intron"),
    (LongTerminalRepeat, "LTR"),
    (MaturePeptide, "mat_peptide"),
    (MiscBinding, "misc_binding"),
    (MiscDifference, "misc_difference"),
    (MiscFeature, "misc_feature"),
    (MiscRecombination, "misc_recomb"),
    (MiscRna, "misc_RNA"),
    (MiscSignal, "misc_signal"),
    (MiscStructure, "misc_structure"),
    (ModifiedBase, "modified_base"),
    (MessengerRna, "mRNA"),
    (NonCodingRna, "ncRNA"),
    (OperonRegion, "operon"),
    (PolyASignal, "polyA_signal"),
    (PolyASite, "polyA_site"),
    (PrecursorRna, "precursor_RNA"),
    (Promoter, "promoter"),
    (ProteinBindingSite, "protein_bind"),
    (RibosomeBindingSite, "RBS"),
    (ReplicationOrigin, "rep_origin"),
    (RepeatRegion, "repeat_region"),
    (RibosomalRna, "rRNA"),
    (SignalPeptide, "sig_peptide"),
    (StemLoop, "stem_loop"),
    (TataSignal, "TATA_signal"),
    (Terminator, "terminator"),
    (TransferMessengerRna, "tmRNA"),
    (TransitPeptide, "transit_peptide"),
    (TransferRna, "tRNA"),
    (UnsureSequenceRegion, "unsure"),
    (Variation, "variation"),
];

/// Canonical qualifier names from the feature-table specification.
pub mod qualifier_names {
    pub const ALLELE: &str = "allele";
    pub const ANTICODON: &str = "anticodon";
    pub const BIO_MATERIAL: &str = "bio_material";
    pub const BOUND_MOIETY: &str = "bound_moiety";
    pub const CELL_LINE: &str = "cell_line";
    pub const CELL_TYPE: &str = "cell_type";
    pub const CHROMOSOME: &str = "chromosome";
    pub const CITATION: &str = "citation";
    pub const CLONE: &str = "clone";
    pub const CLONE_LIB: &str = "clone_lib";
    pub const CODON: &str = "codon";
    pub const CODON_START: &str = "codon_start";
    pub const COLLECTED_BY: &str = "collected_by";
    pub const COLLECTION_DATE: &str = "collection_date";
    pub const COMPARE: &str = "compare";
    pub const COUNTRY: &str = "country";
    pub const CULTIVAR: &str = "cultivar";
    pub const CULTURE_COLLECTION: &str = "culture_collection";
    pub const DB_XREF: &str = "db_xref";
    pub const DEV_STAGE: &str = "dev_stage";
    pub const DIRECTION: &str = "direction";
    pub const EC_NUMBER: &str = "EC_number";
    pub const ECOTYPE: &str = "ecotype";
    pub const ENVIRONMENTAL_SAMPLE: &str = "environmental_sample";
    pub const ESTIMATED_LENGTH: &str = "estimated_length";
    pub const EXCEPTION: &str = "exception";
    pub const EXPERIMENT: &str = "experiment";
    pub const FOCUS: &str = "focus";
    pub const FREQUENCY: &str = "frequency";
    pub const FUNCTION: &str = "function";
    pub const GENE: &str = "gene";
    pub const GENE_SYNONYM: &str = "gene_synonym";
    pub const GERMLINE: &str = "germline";
    pub const HAPLOTYPE: &str = "haplotype";
    pub const HOST: &str = "host";
    pub const IDENTIFIED_BY: &str = "identified_by";
    pub const INFERENCE: &str = "inference";
    pub const ISOLATE: &str = "isolate";
    pub const ISOLATION_SOURCE: &str = "isolation_source";
    pub const LAB_HOST: &str = "lab_host";
    pub const LABEL: &str = "label";
    pub const LAT_LON: &str = "lat_lon";
    pub const LOCUS_TAG: &str = "locus_tag";
    pub const MACRONUCLEAR: &str = "macronuclear";
    pub const MAP: &str = "map";
    pub const MATING_TYPE: &str = "mating_type";
    pub const MOBILE_ELEMENT: &str = "mobile_element";
    pub const MOD_BASE: &str = "mod_base";
    pub const MOL_TYPE: &str = "mol_type";
    pub const NC_RNA_CLASS: &str = "ncRNA_class";
    pub const NOTE: &str = "note";
    pub const NUMBER: &str = "number";
    pub const OLD_LOCUS_TAG: &str = "old_locus_tag";
    pub const OPERON: &str = "operon";
    pub const ORGANELLE: &str = "organelle";
    pub const ORGANISM: &str = "organism";
    pub const PCR_CONDITIONS: &str = "PCR_conditions";
    pub const PCR_PRIMERS: &str = "PCR_primers";
    pub const PHENOTYPE: &str = "phenotype";
    pub const PLASMID: &str = "plasmid";
    pub const POP_VARIANT: &str = "pop_variant";
    pub const PRODUCT: &str = "product";
    pub const PROTEIN_ID: &str = "protein_id";
    pub const PROVIRAL: &str = "proviral";
    pub const PSEUDO: &str = "pseudo";
    pub const REARRANGED: &str = "rearranged";
    pub const REPLACE: &str = "replace";
    pub const RIBOSOMAL_SLIPPAGE: &str = "ribosomal_slippage";
    pub const RPT_FAMILY: &str = "rpt_family";
    pub const RPT_TYPE: &str = "rpt_type";
    pub const RPT_UNIT_RANGE: &str = "rpt_unit_range";
    pub const RPT_UNIT_SEQ: &str = "rpt_unit_seq";
    pub const SATELLITE: &str = "satellite";
    pub const SEGMENT: &str = "segment";
    pub const SEROTYPE: &str = "serotype";
    pub const SEROVAR: &str = "serovar";
    pub const SEX: &str = "sex";
    pub const SPECIMEN_VOUCHER: &str = "specimen_voucher";
    pub const STANDARD_NAME: &str = "standard_name";
    pub const STRAIN: &str = "strain";
    pub const SUB_CLONE: &str = "sub_clone";
    pub const SUB_SPECIES: &str = "sub_species";
    pub const SUB_STRAIN: &str = "sub_strain";
    pub const TAG_PEPTIDE: &str = "tag_peptide";
    pub const TISSUE_LIB: &str = "tissue_lib";
    pub const TISSUE_TYPE: &str = "tissue_type";
    pub const TRANS_SPLICING: &str = "trans_splicing";
    pub const TRANSGENIC: &str = "transgenic";
    pub const TRANSL_EXCEPT: &str = "transl_except";
    pub const TRANSL_TABLE: &str = "transl_table";
    pub const TRANSLATION: &str = "translation";
    pub const VARIETY: &str = "variety";

    /// The canonical qualifier names, in registry order.
    pub const ALL: &[&str] = &[
        ALLELE,
        ANTICODON,
        BIO_MATERIAL,
        BOUND_MOIETY,
        CELL_LINE,
        CELL_TYPE,
        CHROMOSOME,
        CITATION,
        CLONE,
        CLONE_LIB,
        CODON,
        CODON_START,
        COLLECTED_BY,
        COLLECTION_DATE,
        COMPARE,
        COUNTRY,
        CULTIVAR,
        CULTURE_COLLECTION,
        DB_XREF,
        DEV_STAGE,
        DIRECTION,
        EC_NUMBER,
        ECOTYPE,
        ENVIRONMENTAL_SAMPLE,
        ESTIMATED_LENGTH,
        EXCEPTION,
        EXPERIMENT,
        FOCUS,
        FREQUENCY,
        FUNCTION,
        GENE,
        GENE_SYNONYM,
        GERMLINE,
        HAPLOTYPE,
        HOST,
        IDENTIFIED_BY,
        INFERENCE,
        ISOLATE,
        ISOLATION_SOURCE,
        LAB_HOST,
        LABEL,
        LAT_LON,
        LOCUS_TAG,
        MACRONUCLEAR,
        MAP,
        MATING_TYPE,
        MOBILE_ELEMENT,
        MOD_BASE,
        MOL_TYPE,
        NC_RNA_CLASS,
        NOTE,
        NUMBER,
        OLD_LOCUS_TAG,
        OPERON,
        ORGANELLE,
        ORGANISM,
        PCR_CONDITIONS,
        PCR_PRIMERS,
        PHENOTYPE,
        PLASMID,
        POP_VARIANT,
        PRODUCT,
        PROTEIN_ID,
        PROVIRAL,
        PSEUDO,
        REARRANGED,
        REPLACE,
        RIBOSOMAL_SLIPPAGE,
        RPT_FAMILY,
        RPT_TYPE,
        RPT_UNIT_RANGE,
        RPT_UNIT_SEQ,
        SATELLITE,
        SEGMENT,
        SEROTYPE,
        SEROVAR,
        SEX,
        SPECIMEN_VOUCHER,
        STANDARD_NAME,
        STRAIN,
        SUB_CLONE,
        SUB_SPECIES,
        SUB_STRAIN,
        TAG_PEPTIDE,
        TISSUE_LIB,
        TISSUE_TYPE,
        TRANS_SPLICING,
        TRANSGENIC,
        TRANSL_EXCEPT,
        TRANSL_TABLE,
        TRANSLATION,
        VARIETY,
    ];
}
