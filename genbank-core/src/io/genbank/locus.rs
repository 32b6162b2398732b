//! The LOCUS line.
//!
//! Third-party tools do not reliably respect the fixed LOCUS columns, so the
//! line is parsed token-wise: every whitespace-separated token is classified
//! by shape (topology word, strand/molecule, division code, integer length,
//! `bp`/`aa` unit, date) and the name is whatever token classifies as
//! nothing else. Tokens with known value sets are tried before the inferred
//! ones, and each classifier fires at most once per line.

use chrono::{Datelike, NaiveDate};
use log::warn;

use crate::error::{GenBankError, GenBankResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrandType {
    #[default]
    None,
    Single,
    Double,
    Mixed,
}

impl StrandType {
    pub fn as_str(self) -> &'static str {
        match self {
            StrandType::None => "",
            StrandType::Single => "ss-",
            StrandType::Double => "ds-",
            StrandType::Mixed => "ms-",
        }
    }

    fn strip_prefix(token: &str) -> (StrandType, &str) {
        for strand in [StrandType::Single, StrandType::Double, StrandType::Mixed] {
            let prefix = strand.as_str();
            let matches = token
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
            if matches {
                return (strand, &token[prefix.len()..]);
            }
        }
        (StrandType::None, token)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrandTopology {
    #[default]
    None,
    Linear,
    Circular,
}

impl StrandTopology {
    pub fn as_str(self) -> &'static str {
        match self {
            StrandTopology::None => "",
            StrandTopology::Linear => "linear",
            StrandTopology::Circular => "circular",
        }
    }

    fn from_token(token: &str) -> Option<StrandTopology> {
        [StrandTopology::Linear, StrandTopology::Circular]
            .into_iter()
            .find(|t| token.eq_ignore_ascii_case(t.as_str()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum MoleculeType {
    #[default]
    Invalid,
    NA,
    DNA,
    RNA,
    TRna,
    RRna,
    MRna,
    URna,
    SnRna,
    SnoRna,
    Protein,
}

impl MoleculeType {
    /// Spelling used in the LOCUS line; protein records carry no molecule
    /// type there.
    pub fn as_str(self) -> &'static str {
        match self {
            MoleculeType::Invalid | MoleculeType::Protein => "",
            MoleculeType::NA => "NA",
            MoleculeType::DNA => "DNA",
            MoleculeType::RNA => "RNA",
            MoleculeType::TRna => "tRNA",
            MoleculeType::RRna => "rRNA",
            MoleculeType::MRna => "mRNA",
            MoleculeType::URna => "uRNA",
            MoleculeType::SnRna => "snRNA",
            MoleculeType::SnoRna => "snoRNA",
        }
    }

    fn from_token(token: &str) -> Option<MoleculeType> {
        [
            MoleculeType::NA,
            MoleculeType::DNA,
            MoleculeType::RNA,
            MoleculeType::TRna,
            MoleculeType::RRna,
            MoleculeType::MRna,
            MoleculeType::URna,
            MoleculeType::SnRna,
            MoleculeType::SnoRna,
        ]
        .into_iter()
        .find(|m| token.eq_ignore_ascii_case(m.as_str()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DivisionCode {
    #[default]
    None,
    PRI,
    ROD,
    MAM,
    VRT,
    INV,
    PLN,
    BCT,
    VRL,
    PHG,
    SYN,
    UNA,
    EST,
    PAT,
    STS,
    GSS,
    HTG,
    HTC,
    ENV,
    CON,
}

impl DivisionCode {
    const ALL: [DivisionCode; 19] = [
        DivisionCode::PRI,
        DivisionCode::ROD,
        DivisionCode::MAM,
        DivisionCode::VRT,
        DivisionCode::INV,
        DivisionCode::PLN,
        DivisionCode::BCT,
        DivisionCode::VRL,
        DivisionCode::PHG,
        DivisionCode::SYN,
        DivisionCode::UNA,
        DivisionCode::EST,
        DivisionCode::PAT,
        DivisionCode::STS,
        DivisionCode::GSS,
        DivisionCode::HTG,
        DivisionCode::HTC,
        DivisionCode::ENV,
        DivisionCode::CON,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DivisionCode::None => "",
            DivisionCode::PRI => "PRI",
            DivisionCode::ROD => "ROD",
            DivisionCode::MAM => "MAM",
            DivisionCode::VRT => "VRT",
            DivisionCode::INV => "INV",
            DivisionCode::PLN => "PLN",
            DivisionCode::BCT => "BCT",
            DivisionCode::VRL => "VRL",
            DivisionCode::PHG => "PHG",
            DivisionCode::SYN => "SYN",
            DivisionCode::UNA => "UNA",
            DivisionCode::EST => "EST",
            DivisionCode::PAT => "PAT",
            DivisionCode::STS => "STS",
            DivisionCode::GSS => "GSS",
            DivisionCode::HTG => "HTG",
            DivisionCode::HTC => "HTC",
            DivisionCode::ENV => "ENV",
            DivisionCode::CON => "CON",
        }
    }

    fn from_token(token: &str) -> Option<DivisionCode> {
        DivisionCode::ALL
            .into_iter()
            .find(|d| token.eq_ignore_ascii_case(d.as_str()))
    }
}

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Parses GenBank's `DD-MMM-YYYY` date, e.g. `21-JUN-1999`.
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    let mut parts = token.split('-');
    let day: u32 = parts.next()?.parse().ok()?;
    let month_name = parts.next()?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month_name))? as u32
        + 1;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{:02}-{}-{:04}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Locus {
    pub name: Box<str>,
    pub sequence_length: usize,
    /// `bp` for nucleotides, `aa` for proteins.
    pub sequence_unit: Box<str>,
    pub strand: StrandType,
    pub topology: StrandTopology,
    pub molecule_type: MoleculeType,
    pub division: DivisionCode,
    pub date: Option<NaiveDate>,
}

impl Locus {
    /// Parses the data portion of a LOCUS line.
    pub fn parse_line(data: &str, line: usize) -> GenBankResult<Locus> {
        let mut parser = LocusTokenParser::default();
        for token in data.split_whitespace() {
            parser.feed(token);
        }

        let mut locus = parser.locus;
        if locus.sequence_unit.is_empty() {
            return Err(GenBankError::Parse {
                msg: format!("unrecognized LOCUS line format: '{data}'"),
                line,
            });
        }
        if locus.sequence_unit.eq_ignore_ascii_case("aa") {
            locus.molecule_type = MoleculeType::Protein;
        }
        Ok(locus)
    }
}

/// One classifier slot per LOCUS field; each fires at most once, in order.
#[derive(Default)]
struct LocusTokenParser {
    locus: Locus,
    used: [bool; 8],
}

impl LocusTokenParser {
    fn feed(&mut self, token: &str) {
        for slot in 0..self.used.len() {
            if self.used[slot] {
                continue;
            }
            if self.classify(slot, token) {
                self.used[slot] = true;
                return;
            }
        }
        warn!("unclassifiable LOCUS token '{token}'");
    }

    fn classify(&mut self, slot: usize, token: &str) -> bool {
        match slot {
            0 => token == "LOCUS",
            1 => match StrandTopology::from_token(token) {
                Some(topology) => {
                    self.locus.topology = topology;
                    true
                }
                None => false,
            },
            // strand and molecule arrive as one token, e.g. `ds-DNA`
            2 => {
                let (strand, rest) = StrandType::strip_prefix(token);
                let molecule = MoleculeType::from_token(rest);
                if strand == StrandType::None && molecule.is_none() {
                    return false;
                }
                self.locus.strand = strand;
                self.locus.molecule_type = molecule.unwrap_or_default();
                true
            }
            3 => match DivisionCode::from_token(token) {
                Some(division) => {
                    self.locus.division = division;
                    true
                }
                None => false,
            },
            4 => match token.parse::<usize>() {
                Ok(length) => {
                    self.locus.sequence_length = length;
                    true
                }
                Err(_) => false,
            },
            5 => {
                if token.eq_ignore_ascii_case("bp") || token.eq_ignore_ascii_case("aa") {
                    self.locus.sequence_unit = token.to_ascii_lowercase().into();
                    true
                } else {
                    false
                }
            }
            6 => match parse_date(token) {
                Some(date) => {
                    self.locus.date = Some(date);
                    true
                }
                None => false,
            },
            _ => {
                self.locus.name = token.into();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_locus_line() {
        let locus =
            Locus::parse_line("SCU49845     5028 bp    DNA             PLN       21-JUN-1999", 1)
                .unwrap();
        assert_eq!(&*locus.name, "SCU49845");
        assert_eq!(locus.sequence_length, 5028);
        assert_eq!(&*locus.sequence_unit, "bp");
        assert_eq!(locus.molecule_type, MoleculeType::DNA);
        assert_eq!(locus.strand, StrandType::None);
        assert_eq!(locus.topology, StrandTopology::None);
        assert_eq!(locus.division, DivisionCode::PLN);
        assert_eq!(locus.date, NaiveDate::from_ymd_opt(1999, 6, 21));
    }

    #[test]
    fn modern_locus_line() {
        let locus =
            Locus::parse_line("MUSBC05                  105 bp    DNA     linear   ROD 18-DEC-2007", 12)
                .unwrap();
        assert_eq!(&*locus.name, "MUSBC05");
        assert_eq!(locus.sequence_length, 105);
        assert_eq!(locus.topology, StrandTopology::Linear);
        assert_eq!(locus.division, DivisionCode::ROD);
    }

    #[test]
    fn stranded_circular_line() {
        let locus =
            Locus::parse_line("pBR322                  4361 bp ds-DNA     circular SYN 30-SEP-2008", 1)
                .unwrap();
        assert_eq!(locus.strand, StrandType::Double);
        assert_eq!(locus.molecule_type, MoleculeType::DNA);
        assert_eq!(locus.topology, StrandTopology::Circular);
        assert_eq!(locus.division, DivisionCode::SYN);
    }

    #[test]
    fn protein_locus_line() {
        let locus =
            Locus::parse_line("AAB2MCG2                 537 aa            linear   PRI 15-APR-2009", 1)
                .unwrap();
        assert_eq!(&*locus.sequence_unit, "aa");
        assert_eq!(locus.molecule_type, MoleculeType::Protein);
    }

    #[test]
    fn nonstandard_spacing_is_tolerated() {
        let locus = Locus::parse_line("MYSEQ 42 bp DNA linear SYN 01-JAN-2020", 1).unwrap();
        assert_eq!(&*locus.name, "MYSEQ");
        assert_eq!(locus.sequence_length, 42);
        assert_eq!(locus.topology, StrandTopology::Linear);
    }

    #[test]
    fn missing_unit_is_an_error() {
        assert!(Locus::parse_line("MYSEQ 42 DNA linear SYN", 3).is_err());
    }

    #[test]
    fn date_round_trip() {
        let date = parse_date("21-JUN-1999").unwrap();
        assert_eq!(format_date(date), "21-JUN-1999");
        assert_eq!(format_date(parse_date("05-apr-2009").unwrap()), "05-APR-2009");
        assert!(parse_date("JUN-21-1999").is_none());
        assert!(parse_date("32-JAN-1999").is_none());
    }
}
