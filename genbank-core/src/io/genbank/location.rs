//! GenBank location expressions.
//!
//! A location is a recursive tree: leaves carry raw start/end data exactly as
//! written (`"<1"`, `"105"`), the separator between them (`".."`, `"."`,
//! `"^"` or nothing for a single point) and an optional accession for
//! positions in another record; operator nodes (`join`, `complement`,
//! `order`, `bond`, `one-of`) carry sub-locations in document order.
//!
//! Parsing goes through [`FromStr`], rendering through [`fmt::Display`], and
//! `render(parse(s)) == s` byte-for-byte for every accepted input.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{GenBankError, GenBankResult};
use crate::seq::Sequence;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LocationOperator {
    #[default]
    None,
    Join,
    Complement,
    Order,
    Bond,
    OneOf,
}

impl LocationOperator {
    fn keyword(self) -> Option<&'static str> {
        match self {
            LocationOperator::None => None,
            LocationOperator::Join => Some("join"),
            LocationOperator::Complement => Some("complement"),
            LocationOperator::Order => Some("order"),
            LocationOperator::Bond => Some("bond"),
            LocationOperator::OneOf => Some("one-of"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    operator: LocationOperator,
    accession: Option<Box<str>>,
    start_data: Box<str>,
    end_data: Box<str>,
    separator: Box<str>,
    sub_locations: Vec<Location>,
}

impl Location {
    /// Leaf covering the 1-based inclusive range `start..end`.
    pub fn range(start: usize, end: usize) -> Location {
        Location {
            start_data: start.to_string().into(),
            end_data: end.to_string().into(),
            separator: "..".into(),
            ..Location::default()
        }
    }

    /// Leaf for a single 1-based position.
    pub fn point(position: usize) -> Location {
        let data: Box<str> = position.to_string().into();
        Location {
            start_data: data.clone(),
            end_data: data,
            separator: "".into(),
            ..Location::default()
        }
    }

    /// Operator node over the given sub-locations.
    pub fn with_operator(operator: LocationOperator, sub_locations: Vec<Location>) -> Location {
        Location {
            operator,
            sub_locations,
            ..Location::default()
        }
    }

    pub fn operator(&self) -> LocationOperator {
        self.operator
    }

    pub fn set_operator(&mut self, operator: LocationOperator) {
        self.operator = operator;
    }

    pub fn accession(&self) -> Option<&str> {
        self.accession.as_deref()
    }

    pub fn set_accession(&mut self, accession: Option<&str>) {
        self.accession = accession.map(Into::into);
    }

    pub fn start_data(&self) -> &str {
        &self.start_data
    }

    pub fn set_start_data(&mut self, data: &str) -> GenBankResult<()> {
        resolve_min(data)?;
        self.start_data = data.into();
        Ok(())
    }

    pub fn end_data(&self) -> &str {
        &self.end_data
    }

    pub fn set_end_data(&mut self, data: &str) -> GenBankResult<()> {
        resolve_max(data)?;
        self.end_data = data.into();
        Ok(())
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn set_separator(&mut self, separator: &str) -> GenBankResult<()> {
        match separator {
            "" | ".." | "." | "^" => {
                self.separator = separator.into();
                Ok(())
            }
            other => Err(GenBankError::InvalidSeparator {
                separator: other.to_string(),
            }),
        }
    }

    pub fn sub_locations(&self) -> &[Location] {
        &self.sub_locations
    }

    pub fn sub_locations_mut(&mut self) -> &mut Vec<Location> {
        &mut self.sub_locations
    }

    /// Spanning start position: the minimum over sub-location starts, or the
    /// resolved start data of a leaf. One based.
    pub fn start(&self) -> GenBankResult<usize> {
        if !self.sub_locations.is_empty() {
            let mut min = usize::MAX;
            for sub in &self.sub_locations {
                min = min.min(sub.start()?);
            }
            return Ok(min);
        }
        resolve_min(&self.start_data)
    }

    /// Spanning end position: the maximum over sub-location ends, or the
    /// resolved end data of a leaf. One based.
    pub fn end(&self) -> GenBankResult<usize> {
        if !self.sub_locations.is_empty() {
            let mut max = 0usize;
            for sub in &self.sub_locations {
                max = max.max(sub.end()?);
            }
            return Ok(max);
        }
        resolve_max(&self.end_data)
    }

    /// All leaf locations of the tree, in document order.
    pub fn leaf_locations(&self) -> Vec<&Location> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Location>) {
        if self.sub_locations.is_empty() {
            leaves.push(self);
        } else {
            for sub in &self.sub_locations {
                sub.collect_leaves(leaves);
            }
        }
    }

    /// True if `position` falls within the start data of any leaf. Start
    /// data of the form `a.b` accepts every position from `a` to `b`.
    pub fn is_in_start(&self, position: usize) -> GenBankResult<bool> {
        for leaf in self.leaf_locations() {
            let min = resolve_min(&leaf.start_data)?;
            let max = resolve_max(&leaf.start_data)?;
            if position >= min && position <= max {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True if `position` falls within the end data of any leaf.
    pub fn is_in_end(&self, position: usize) -> GenBankResult<bool> {
        for leaf in self.leaf_locations() {
            let min = resolve_min(&leaf.end_data)?;
            let max = resolve_max(&leaf.end_data)?;
            if position >= min && position <= max {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True if `position` falls between the start and end of any leaf.
    pub fn is_in_range(&self, position: usize) -> GenBankResult<bool> {
        for leaf in self.leaf_locations() {
            if position >= leaf.start()? && position <= leaf.end()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Builds the sequence selected by this location from `sequence`.
    ///
    /// Accession-qualified leaves cannot be resolved without a reference
    /// map; use [`Location::sub_sequence_with_references`] for those.
    pub fn sub_sequence(&self, sequence: &Sequence) -> GenBankResult<Sequence> {
        self.extract(sequence, None)
    }

    /// As [`Location::sub_sequence`], but accession-qualified leaves are
    /// resolved against `referred` (accession → sequence). A missing entry
    /// fails with [`GenBankError::UnresolvedReference`].
    pub fn sub_sequence_with_references(
        &self,
        sequence: &Sequence,
        referred: &HashMap<String, Sequence>,
    ) -> GenBankResult<Sequence> {
        self.extract(sequence, Some(referred))
    }

    fn extract(
        &self,
        sequence: &Sequence,
        referred: Option<&HashMap<String, Sequence>>,
    ) -> GenBankResult<Sequence> {
        match self.operator {
            LocationOperator::Complement => {
                if self.sub_locations.len() > 1 {
                    return Err(GenBankError::ComplementWithMultipleSubLocations);
                }
                let inner = match self.sub_locations.first() {
                    Some(sub) => sub.extract(sequence, referred)?,
                    None => self.extract_leaf(sequence, referred)?,
                };
                inner.reverse_complement()
            }
            // `order` does not promise adjacency, but extraction treats it
            // as plain concatenation, same as `join`.
            LocationOperator::Join | LocationOperator::Bond | LocationOperator::Order => {
                if self.sub_locations.is_empty() {
                    return self.extract_leaf(sequence, referred);
                }
                let mut bytes = Vec::new();
                for sub in &self.sub_locations {
                    let part = sub.extract(sequence, referred)?;
                    bytes.extend_from_slice(part.as_bytes());
                }
                Ok(Sequence::from_validated(sequence.kind(), bytes, ""))
            }
            // `one-of` selects a single alternative; the first one is used.
            LocationOperator::OneOf => match self.sub_locations.first() {
                Some(sub) => sub.extract(sequence, referred),
                None => self.extract_leaf(sequence, referred),
            },
            LocationOperator::None => {
                if !self.sub_locations.is_empty() {
                    return Err(GenBankError::SubLocationsWithoutOperator);
                }
                self.extract_leaf(sequence, referred)
            }
        }
    }

    fn extract_leaf(
        &self,
        sequence: &Sequence,
        referred: Option<&HashMap<String, Sequence>>,
    ) -> GenBankResult<Sequence> {
        // A site between two bases selects nothing.
        if &*self.separator == "^" {
            return Ok(Sequence::from_validated(sequence.kind(), Vec::new(), ""));
        }
        if !matches!(&*self.separator, "" | ".." | ".") {
            return Err(GenBankError::InvalidSeparator {
                separator: self.separator.to_string(),
            });
        }

        let source = match &self.accession {
            Some(accession) => {
                let entry = referred.and_then(|map| map.get(&**accession)).ok_or_else(|| {
                    GenBankError::UnresolvedReference {
                        accession: accession.to_string(),
                    }
                })?;
                if entry.kind() != sequence.kind() {
                    return Err(GenBankError::ReferredAlphabetMismatch {
                        accession: accession.to_string(),
                    });
                }
                entry
            }
            None => sequence,
        };

        let start = self.start()?;
        if start == 0 {
            return Err(GenBankError::InvalidPosition {
                data: self.start_data.to_string(),
            });
        }
        // `a.b` selects one of the two bases; a single point selects one.
        let len = if &*self.separator == ".." {
            let end = self.end()?;
            if end < start {
                return Err(GenBankError::InvalidRange { start, end });
            }
            end - start + 1
        } else {
            1
        };

        source.subsequence(start - 1, len)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator.keyword() {
            Some(keyword) => {
                write!(f, "{keyword}(")?;
                if self.sub_locations.is_empty() {
                    self.fmt_leaf(f)?;
                } else {
                    for (i, sub) in self.sub_locations.iter().enumerate() {
                        if i > 0 {
                            f.write_str(",")?;
                        }
                        write!(f, "{sub}")?;
                    }
                }
                f.write_str(")")
            }
            None => self.fmt_leaf(f),
        }
    }
}

impl Location {
    fn fmt_leaf(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(accession) = &self.accession {
            write!(f, "{accession}:")?;
        }
        if self.separator.is_empty() {
            f.write_str(&self.start_data)
        } else {
            write!(f, "{}{}{}", self.start_data, self.separator, self.end_data)
        }
    }
}

impl FromStr for Location {
    type Err = GenBankError;

    fn from_str(s: &str) -> GenBankResult<Location> {
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if cleaned.is_empty() {
            return Err(GenBankError::InvalidLocation { text: s.to_string() });
        }
        let mut rest = cleaned.as_str();
        let location = build_location(&mut rest)
            .map_err(|_| GenBankError::InvalidLocation { text: s.to_string() })?;
        if !rest.is_empty() {
            return Err(GenBankError::InvalidLocation { text: s.to_string() });
        }
        Ok(location)
    }
}

const OPERATORS: &[(&str, LocationOperator)] = &[
    ("complement(", LocationOperator::Complement),
    ("join(", LocationOperator::Join),
    ("order(", LocationOperator::Order),
    ("bond(", LocationOperator::Bond),
    ("one-of(", LocationOperator::OneOf),
];

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn build_location(rest: &mut &str) -> GenBankResult<Location> {
    for (prefix, operator) in OPERATORS {
        if starts_with_ignore_case(rest, prefix) {
            *rest = &rest[prefix.len()..];
            let mut location = Location {
                operator: *operator,
                ..Location::default()
            };
            build_sub_locations(&mut location, rest)?;
            return Ok(location);
        }
    }
    build_leaf(rest)
}

fn build_sub_locations(location: &mut Location, rest: &mut &str) -> GenBankResult<()> {
    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix(',') {
            *rest = stripped;
            continue;
        }
        if let Some(stripped) = rest.strip_prefix(')') {
            *rest = stripped;
            return Ok(());
        }
        let sub = build_location(rest)?;
        location.sub_locations.push(sub);
    }
    Ok(())
}

fn build_leaf(rest: &mut &str) -> GenBankResult<Location> {
    let stop = rest.find([',', ')']);
    let single = match stop {
        Some(index) => {
            let (head, tail) = rest.split_at(index);
            *rest = tail;
            head
        }
        None => {
            let head = *rest;
            *rest = "";
            head
        }
    };

    let original = single.to_string();
    let invalid = move || GenBankError::InvalidLocation {
        text: original.clone(),
    };

    let mut location = Location::default();
    let mut single = single;
    if let Some(colon) = single.find(':') {
        if single[colon + 1..].contains(':') {
            return Err(invalid());
        }
        location.accession = Some(single[..colon].into());
        single = &single[colon + 1..];
    }

    if let Some(index) = single.find("..") {
        if index != single.rfind("..").unwrap_or(index) {
            return Err(invalid());
        }
        let (start, end) = (&single[..index], &single[index + 2..]);
        if start.is_empty() || end.is_empty() {
            return Err(invalid());
        }
        location.start_data = start.into();
        location.end_data = end.into();
        location.separator = "..".into();
    } else if let Some(index) = single.find('.') {
        if index != single.rfind('.').unwrap_or(index) {
            return Err(invalid());
        }
        let (start, end) = (&single[..index], &single[index + 1..]);
        if start.is_empty() || end.is_empty() {
            return Err(invalid());
        }
        location.start_data = start.into();
        location.end_data = end.into();
        location.separator = ".".into();
    } else if let Some(index) = single.find('^') {
        if index != single.rfind('^').unwrap_or(index) {
            return Err(invalid());
        }
        let (start, end) = (&single[..index], &single[index + 1..]);
        if start.is_empty() || end.is_empty() {
            return Err(invalid());
        }
        location.start_data = start.into();
        location.end_data = end.into();
        location.separator = "^".into();
    } else if single.starts_with('<') || single.starts_with('>') {
        if single[1..].parse::<usize>().is_err() {
            return Err(invalid());
        }
        location.start_data = single.into();
        location.end_data = single.into();
        location.separator = "".into();
    } else {
        if single.parse::<usize>().is_err() {
            return Err(invalid());
        }
        location.start_data = single.into();
        location.end_data = single.into();
        location.separator = "".into();
    }

    Ok(location)
}

/// Resolves position data to its smallest position: `"12"` → 12, `"<12"` /
/// `">12"` → 12, `"12.30"` → 12, `"23^24"` → 23.
fn resolve_min(data: &str) -> GenBankResult<usize> {
    resolve_bound(data, false)
}

/// Resolves position data to its largest position: `"12.30"` → 30,
/// `"23^24"` → 24.
fn resolve_max(data: &str) -> GenBankResult<usize> {
    resolve_bound(data, true)
}

fn resolve_bound(data: &str, take_last: bool) -> GenBankResult<usize> {
    if let Ok(value) = data.parse::<usize>() {
        return Ok(value);
    }

    let invalid = || GenBankError::InvalidPosition {
        data: data.to_string(),
    };

    if let Some(stripped) = data.strip_prefix(['>', '<']) {
        if stripped.contains(['>', '<']) {
            return Err(invalid());
        }
        return resolve_bound(stripped, take_last);
    }

    for sep in ['^', '.'] {
        if data.contains(sep) {
            let parts: Vec<&str> = data.split(sep).filter(|p| !p.is_empty()).collect();
            if parts.len() != 2 {
                return Err(invalid());
            }
            let part = if take_last { parts[1] } else { parts[0] };
            return resolve_bound(part, take_last);
        }
    }

    Err(invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::SeqKind;
    use proptest::prelude::*;

    fn parse(text: &str) -> Location {
        text.parse().unwrap()
    }

    #[test]
    fn single_point() {
        let loc = parse("345678910");
        assert_eq!(loc.operator(), LocationOperator::None);
        assert_eq!(loc.start().unwrap(), 345678910);
        assert_eq!(loc.end().unwrap(), 345678910);
        assert_eq!(loc.separator(), "");
        assert_eq!(loc.to_string(), "345678910");
    }

    #[test]
    fn dotted_range() {
        let loc = parse("1098945.2098765");
        assert_eq!(loc.operator(), LocationOperator::None);
        assert_eq!(loc.start().unwrap(), 1098945);
        assert_eq!(loc.end().unwrap(), 2098765);
        assert_eq!(loc.separator(), ".");
        assert_eq!(loc.to_string(), "1098945.2098765");
    }

    #[test]
    fn join_range() {
        let loc = parse("join(26300..26395)");
        assert_eq!(loc.operator(), LocationOperator::Join);
        assert_eq!(loc.start().unwrap(), 26300);
        assert_eq!(loc.end().unwrap(), 26395);
        assert_eq!(loc.leaf_locations().len(), 1);
        assert_eq!(loc.to_string(), "join(26300..26395)");
    }

    #[test]
    fn complement_range() {
        let loc = parse("complement(45745..50256)");
        assert_eq!(loc.operator(), LocationOperator::Complement);
        assert_eq!(loc.start().unwrap(), 45745);
        assert_eq!(loc.end().unwrap(), 50256);
        assert_eq!(loc.to_string(), "complement(45745..50256)");
    }

    #[test]
    fn order_dotted() {
        let loc = parse("order(9214567.50980256)");
        assert_eq!(loc.operator(), LocationOperator::Order);
        assert_eq!(loc.to_string(), "order(9214567.50980256)");
    }

    #[test]
    fn nested_operators() {
        let loc = parse("complement(join(2691..4571,4918..5163))");
        assert_eq!(loc.operator(), LocationOperator::Complement);
        assert_eq!(loc.sub_locations().len(), 1);
        assert_eq!(loc.sub_locations()[0].operator(), LocationOperator::Join);
        assert_eq!(loc.leaf_locations().len(), 2);
        assert_eq!(loc.start().unwrap(), 2691);
        assert_eq!(loc.end().unwrap(), 5163);
        assert_eq!(loc.to_string(), "complement(join(2691..4571,4918..5163))");
    }

    #[test]
    fn fuzzy_bounds() {
        let loc = parse("<1..206");
        assert_eq!(loc.start_data(), "<1");
        assert_eq!(loc.end_data(), "206");
        assert_eq!(loc.start().unwrap(), 1);
        assert_eq!(loc.end().unwrap(), 206);
        assert_eq!(loc.to_string(), "<1..206");

        let loc = parse("<1..>105");
        assert_eq!(loc.end_data(), ">105");
        assert_eq!(loc.end().unwrap(), 105);
        assert!(loc.is_in_end(105).unwrap());
        assert!(!loc.is_in_end(104).unwrap());
        assert_eq!(loc.to_string(), "<1..>105");
    }

    #[test]
    fn caret_site() {
        let loc = parse("69^70");
        assert_eq!(loc.separator(), "^");
        assert_eq!(loc.start().unwrap(), 69);
        assert_eq!(loc.end().unwrap(), 70);
        assert_eq!(loc.to_string(), "69^70");
    }

    #[test]
    fn accession_qualified() {
        let loc = parse("AF032048.1:67..345");
        assert_eq!(loc.accession(), Some("AF032048.1"));
        assert_eq!(loc.start().unwrap(), 67);
        assert_eq!(loc.end().unwrap(), 345);
        assert_eq!(loc.to_string(), "AF032048.1:67..345");
    }

    #[test]
    fn dotted_start_data_membership() {
        let mut loc = Location::range(23, 100);
        loc.set_start_data("23.40").unwrap();
        assert!(loc.is_in_start(23).unwrap());
        assert!(loc.is_in_start(40).unwrap());
        assert!(!loc.is_in_start(41).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<Location>().is_err());
        assert!("abc".parse::<Location>().is_err());
        assert!("1..2..3".parse::<Location>().is_err());
        assert!("AC:1:2".parse::<Location>().is_err());
        assert!("join(1..5))".parse::<Location>().is_err());
    }

    #[test]
    fn whitespace_is_stripped() {
        let loc = parse("join(1..5, 8..10)");
        assert_eq!(loc.to_string(), "join(1..5,8..10)");
    }

    #[test]
    fn incremental_construction() {
        let mut loc = Location::range(10, 20);
        loc.set_end_data(">25").unwrap();
        assert_eq!(loc.end().unwrap(), 25);
        assert!(loc.set_end_data("abc").is_err());
        assert!(loc.set_separator("--").is_err());

        let mut joined = Location::with_operator(LocationOperator::Join, vec![]);
        joined.sub_locations_mut().push(Location::range(1, 4));
        joined.sub_locations_mut().push(Location::range(9, 12));
        assert_eq!(joined.start().unwrap(), 1);
        assert_eq!(joined.end().unwrap(), 12);
        assert_eq!(joined.to_string(), "join(1..4,9..12)");
    }

    fn dna(bytes: &[u8]) -> Sequence {
        Sequence::new(SeqKind::Dna, bytes.to_vec(), "test").unwrap()
    }

    #[test]
    fn leaf_extraction() {
        //                  123456789012
        let seq = dna(b"atgcatgcatgc");
        assert_eq!(parse("3..6").sub_sequence(&seq).unwrap().as_bytes(), b"gcat");
        // single point and `a.b` both select one base
        assert_eq!(parse("5").sub_sequence(&seq).unwrap().as_bytes(), b"a");
        assert_eq!(parse("5.8").sub_sequence(&seq).unwrap().as_bytes(), b"a");
        // a site between two bases selects nothing
        assert!(parse("5^6").sub_sequence(&seq).unwrap().is_empty());
    }

    #[test]
    fn join_and_complement_extraction() {
        let seq = dna(b"atgcatgcatgc");
        assert_eq!(
            parse("join(1..4,9..12)").sub_sequence(&seq).unwrap().as_bytes(),
            b"atgcatgc"
        );
        // order behaves like join for extraction
        assert_eq!(
            parse("order(1..4,9..12)").sub_sequence(&seq).unwrap().as_bytes(),
            b"atgcatgc"
        );
        assert_eq!(
            parse("complement(1..4)").sub_sequence(&seq).unwrap().as_bytes(),
            b"gcat"
        );
        assert_eq!(
            parse("complement(join(1..2,5..6))")
                .sub_sequence(&seq)
                .unwrap()
                .as_bytes(),
            b"atat"
        );
    }

    #[test]
    fn cross_record_extraction() {
        let seq = dna(b"atgcatgcatgc");
        let mut referred = HashMap::new();
        referred.insert(
            "AF032048.1".to_string(),
            dna(b"ttttccccgggg"),
        );

        let loc = parse("join(1..4,AF032048.1:5..8,AF032048.1:9..10)");
        let sub = loc.sub_sequence_with_references(&seq, &referred).unwrap();
        assert_eq!(sub.as_bytes(), b"atgcccccgg");

        // without the map entry the accession is unresolvable
        let err = loc.sub_sequence(&seq).unwrap_err();
        match err {
            GenBankError::UnresolvedReference { accession } => {
                assert_eq!(accession, "AF032048.1")
            }
            other => panic!("expected unresolved reference, got {other:?}"),
        }
    }

    #[test]
    fn referred_alphabet_must_match() {
        let seq = dna(b"atgc");
        let mut referred = HashMap::new();
        referred.insert(
            "X1".to_string(),
            Sequence::new(SeqKind::Rna, b"acgu".to_vec(), "x").unwrap(),
        );
        let err = parse("X1:1..2")
            .sub_sequence_with_references(&seq, &referred)
            .unwrap_err();
        assert!(matches!(err, GenBankError::ReferredAlphabetMismatch { .. }));
    }

    #[test]
    fn protein_complement_fails() {
        let seq = Sequence::new(SeqKind::Protein, b"MKVL".to_vec(), "p").unwrap();
        assert!(parse("complement(1..2)").sub_sequence(&seq).is_err());
    }

    fn leaf_strategy() -> impl Strategy<Value = String> {
        let pos = 1usize..100_000;
        prop_oneof![
            pos.clone().prop_map(|p| p.to_string()),
            (pos.clone(), 1usize..100_000).prop_map(|(a, b)| format!("{a}..{b}")),
            (pos.clone(), 1usize..100_000).prop_map(|(a, b)| format!("<{a}..>{b}")),
            (pos.clone(), 1usize..100_000).prop_map(|(a, b)| format!("{a}.{b}")),
            (pos.clone(), 1usize..100_000).prop_map(|(a, b)| format!("{a}^{b}")),
            (pos, 1usize..100_000).prop_map(|(a, b)| format!("AB{a:05}.1:{a}..{b}")),
        ]
    }

    fn location_strategy() -> impl Strategy<Value = String> {
        leaf_strategy().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 1..4)
                    .prop_map(|subs| format!("join({})", subs.join(","))),
                prop::collection::vec(inner.clone(), 1..4)
                    .prop_map(|subs| format!("order({})", subs.join(","))),
                inner.prop_map(|sub| format!("complement({sub})")),
            ]
        })
    }

    proptest! {
        #[test]
        fn render_parse_round_trip(text in location_strategy()) {
            let location: Location = text.parse().unwrap();
            prop_assert_eq!(location.to_string(), text);
        }
    }
}
