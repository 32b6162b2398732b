//! GenBank record tokenizer.
//!
//! A state machine over input lines: a line whose left-hand keyword column
//! is non-blank starts a new section, deeper-indented lines continue the
//! current field. Header data starts at column 12, the feature table at
//! column 21. Records end at `//`; a stream may concatenate any number of
//! them.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use log::warn;

use crate::error::{GenBankError, GenBankResult};
use crate::io::genbank::feature::FeatureItem;
use crate::io::genbank::features::SequenceFeatures;
use crate::io::genbank::location::Location;
use crate::io::genbank::locus::{Locus, MoleculeType};
use crate::io::genbank::metadata::{
    CitationReference, CrossReferenceLink, GenBankAccession, GenBankMetadata, GenBankVersion,
    OrganismInfo, ProjectIdentifier, SequenceSegment, SequenceSource,
};
use crate::io::genbank::GenBankRecord;
use crate::seq::{SeqKind, Sequence};

const DATA_INDENT: usize = 12;
const FEATURE_INDENT: usize = 21;

/// Iterator over the records of a GenBank stream.
///
/// Yields one `GenBankResult<GenBankRecord>` per `//`-terminated record.
/// Iteration is fail-fast: the first error ends it, but records already
/// yielded stay valid. An input with no records at all yields a single
/// parse error rather than an empty success.
pub struct GenBankRecords<R> {
    lines: Lines<R>,
    alphabet: Option<SeqKind>,
    yielded_any: bool,
    done: bool,
}

impl<R: BufRead> GenBankRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Lines::new(reader),
            alphabet: None,
            yielded_any: false,
            done: false,
        }
    }

    /// Forces every record onto the given alphabet instead of detecting one;
    /// records the alphabet cannot represent fail with an alphabet error.
    pub fn with_alphabet(reader: R, alphabet: SeqKind) -> Self {
        Self {
            lines: Lines::new(reader),
            alphabet: Some(alphabet),
            yielded_any: false,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for GenBankRecords<R> {
    type Item = GenBankResult<GenBankRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let first_line = match self.lines.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                self.done = true;
                if self.yielded_any {
                    return None;
                }
                return Some(Err(GenBankError::Parse {
                    msg: "input contains no GenBank records".to_string(),
                    line: self.lines.line_no,
                }));
            }
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };

        match parse_record(&mut self.lines, first_line, self.alphabet) {
            Ok(record) => {
                self.yielded_any = true;
                Some(Ok(record))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

pub fn genbank_records_from_reader<R: BufRead>(reader: R) -> GenBankRecords<R> {
    GenBankRecords::new(reader)
}

pub fn read_genbank_records_from_reader<R: BufRead>(
    reader: R,
) -> GenBankResult<Vec<GenBankRecord>> {
    let mut out = Vec::new();
    for record in genbank_records_from_reader(reader) {
        out.push(record?);
    }
    Ok(out)
}

pub fn read_genbank_records_from_path(path: impl AsRef<Path>) -> GenBankResult<Vec<GenBankRecord>> {
    let file = File::open(path)?;
    read_genbank_records_from_reader(BufReader::new(file))
}

pub fn read_genbank_records_from_bytes(data: &[u8]) -> GenBankResult<Vec<GenBankRecord>> {
    read_genbank_records_from_reader(BufReader::new(Cursor::new(data)))
}

pub fn read_genbank_records_from_reader_with_alphabet<R: BufRead>(
    reader: R,
    alphabet: SeqKind,
) -> GenBankResult<Vec<GenBankRecord>> {
    let mut out = Vec::new();
    for record in GenBankRecords::with_alphabet(reader, alphabet) {
        out.push(record?);
    }
    Ok(out)
}

pub fn read_genbank_records_from_path_with_alphabet(
    path: impl AsRef<Path>,
    alphabet: SeqKind,
) -> GenBankResult<Vec<GenBankRecord>> {
    let file = File::open(path)?;
    read_genbank_records_from_reader_with_alphabet(BufReader::new(file), alphabet)
}

/// Line source tracking line numbers. Blank lines are skipped everywhere in
/// the format.
struct Lines<R> {
    reader: R,
    line_no: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }

    fn next_line(&mut self) -> GenBankResult<Option<String>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            while buf.ends_with('\n') || buf.ends_with('\r') {
                buf.pop();
            }
            if buf.trim().is_empty() {
                continue;
            }
            return Ok(Some(std::mem::take(&mut buf)));
        }
    }

    fn parse_error(&self, msg: impl Into<String>) -> GenBankError {
        GenBankError::Parse {
            msg: msg.into(),
            line: self.line_no,
        }
    }
}

/// Keyword column of a line: the first `indent` characters, trimmed.
fn line_header(line: &str, indent: usize) -> &str {
    match line.get(..indent) {
        Some(head) => head.trim(),
        None => line.trim(),
    }
}

/// Data column of a line: everything past `indent`, trimmed.
fn line_data(line: &str, indent: usize) -> &str {
    match line.get(indent..) {
        Some(data) => data.trim(),
        None => "",
    }
}

fn parse_record<R: BufRead>(
    lines: &mut Lines<R>,
    first_line: String,
    alphabet: Option<SeqKind>,
) -> GenBankResult<GenBankRecord> {
    let mut metadata = GenBankMetadata::new();

    let mut line = parse_headers(lines, first_line, &mut metadata, alphabet)?;
    line = parse_features(lines, line, &mut metadata)?;
    let bytes = parse_sequence_section(lines, line, &mut metadata)?;

    let kind = match alphabet {
        Some(kind) => kind,
        None => SeqKind::detect(&bytes),
    };
    let name = metadata
        .locus
        .as_ref()
        .map(|locus| locus.name.clone())
        .unwrap_or_default();
    let sequence = Sequence::new(kind, bytes, name)?;

    Ok(GenBankRecord { sequence, metadata })
}

fn parse_headers<R: BufRead>(
    lines: &mut Lines<R>,
    first_line: String,
    metadata: &mut GenBankMetadata,
    alphabet: Option<SeqKind>,
) -> GenBankResult<Option<String>> {
    let mut line = Some(first_line);

    while let Some(current) = line.take() {
        match line_header(&current, DATA_INDENT) {
            "LOCUS" => {
                if metadata.locus.is_some() {
                    return Err(lines.parse_error("second LOCUS line in one record"));
                }
                let locus = Locus::parse_line(line_data(&current, DATA_INDENT), lines.line_no)?;
                if let Some(requested) = alphabet {
                    check_declared_alphabet(requested, &locus)?;
                }
                metadata.locus = Some(locus);
                line = lines.next_line()?;
            }
            "DEFINITION" => {
                let (data, next) = parse_multiline(lines, current, " ")?;
                metadata.definition = Some(data.into());
                line = next;
            }
            "ACCESSION" => {
                let (data, next) = parse_multiline(lines, current, " ")?;
                let mut accessions = data.split_whitespace();
                metadata.accession = Some(GenBankAccession {
                    primary: accessions.next().unwrap_or_default().into(),
                    secondary: accessions.map(Into::into).collect(),
                });
                line = next;
            }
            "VERSION" => {
                metadata.version = Some(parse_version(
                    line_data(&current, DATA_INDENT),
                    metadata.accession.as_ref(),
                ));
                line = lines.next_line()?;
            }
            "PROJECT" => {
                let data = line_data(&current, DATA_INDENT);
                match data.split_once(':') {
                    Some((name, numbers)) => {
                        metadata.project = Some(ProjectIdentifier {
                            name: name.into(),
                            numbers: numbers.split(',').map(Into::into).collect(),
                        });
                    }
                    None => warn!("unexpected PROJECT header: {current}"),
                }
                line = lines.next_line()?;
            }
            "DBLINK" => {
                let (data, next) = parse_multiline(lines, current, "\n")?;
                for link in data.split('\n') {
                    match link.split_once(':') {
                        Some((label, numbers)) => metadata.db_links.push(CrossReferenceLink {
                            kind: CrossReferenceLink::classify(label),
                            label: label.into(),
                            numbers: numbers.split(',').map(Into::into).collect(),
                        }),
                        None => warn!("unexpected DBLINK line: {link}"),
                    }
                }
                line = next;
            }
            "DBSOURCE" => {
                let (data, next) = parse_multiline(lines, current, " ")?;
                metadata.db_source = Some(data.into());
                line = next;
            }
            "KEYWORDS" => {
                let (data, next) = parse_multiline(lines, current, " ")?;
                metadata.keywords = Some(data.into());
                line = next;
            }
            "SEGMENT" => {
                let (data, next) = parse_multiline(lines, current, " ")?;
                match parse_segment(&data) {
                    Some(segment) => metadata.segment = Some(segment),
                    None => warn!("unexpected SEGMENT header: {data}"),
                }
                line = next;
            }
            "SOURCE" => {
                line = parse_source(lines, current, metadata)?;
            }
            "REFERENCE" => {
                line = parse_references(lines, current, metadata)?;
            }
            "COMMENT" => {
                let mut current = current;
                loop {
                    let (data, next) = parse_multiline(lines, current, "\n")?;
                    metadata.comments.push(data.into());
                    match next {
                        Some(l) if line_header(&l, DATA_INDENT) == "COMMENT" => current = l,
                        other => {
                            line = other;
                            break;
                        }
                    }
                }
            }
            "PRIMARY" => {
                // first line is a table header; validate its four columns
                let columns = line_data(&current, DATA_INDENT).split_whitespace().count();
                if columns != 4 {
                    return Err(lines.parse_error(format!(
                        "unexpected PRIMARY table header: '{current}'"
                    )));
                }
                let (data, next) = parse_multiline(lines, current, "\n")?;
                metadata.primary = Some(data.into());
                line = next;
            }
            "FEATURES" | "BASE COUNT" | "ORIGIN" | "CONTIG" => {
                line = Some(current);
                break;
            }
            other => {
                return Err(lines.parse_error(format!("unknown header '{other}'")));
            }
        }
    }

    if metadata.locus.is_none() {
        return Err(lines.parse_error("record has no LOCUS line"));
    }
    Ok(line)
}

fn check_declared_alphabet(requested: SeqKind, locus: &Locus) -> GenBankResult<()> {
    let declared = match locus.molecule_type {
        MoleculeType::DNA | MoleculeType::NA => Some(SeqKind::Dna),
        MoleculeType::RNA => Some(SeqKind::Rna),
        MoleculeType::Protein => Some(SeqKind::Protein),
        _ => None,
    };
    match declared {
        Some(declared) if declared != requested => {
            Err(GenBankError::AlphabetDeclarationMismatch {
                requested,
                declared,
            })
        }
        _ => Ok(()),
    }
}

fn parse_version(data: &str, accession: Option<&GenBankAccession>) -> GenBankVersion {
    let mut version = GenBankVersion::default();
    let mut tokens = data.split_whitespace();

    // `ACCESSION.VERSION`; a bare `.` placeholder (SnapGene output) and
    // malformed tokens leave the fields empty rather than failing
    if let Some(token) = tokens.next() {
        if let Some((acc, ver)) = token.rsplit_once('.') {
            if !acc.is_empty()
                && !ver.is_empty()
                && ver.bytes().all(|b| b.is_ascii_digit())
                && acc.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
            {
                version.version = ver.into();
                match accession {
                    None => warn!("VERSION processed before ACCESSION"),
                    Some(accession) if &*accession.primary != acc => {
                        warn!("VERSION tag doesn't match ACCESSION")
                    }
                    Some(accession) => version.accession = accession.primary.clone(),
                }
            }
        }
    }

    if let Some(token) = tokens.next() {
        if let Some(gi) = token.strip_prefix("GI:") {
            version.gi_number = gi.into();
        }
    }
    version
}

fn parse_segment(data: &str) -> Option<SequenceSegment> {
    let (current, count) = data.split_once(" of ")?;
    Some(SequenceSegment {
        current: current.trim().parse().ok()?,
        count: count.trim().parse().ok()?,
    })
}

/// Joins a section's continuation lines with `joiner`; returns the joined
/// data and the first line of the next section.
fn parse_multiline<R: BufRead>(
    lines: &mut Lines<R>,
    current: String,
    joiner: &str,
) -> GenBankResult<(String, Option<String>)> {
    let mut data = line_data(&current, DATA_INDENT).to_string();
    loop {
        match lines.next_line()? {
            Some(next) if line_header(&next, DATA_INDENT).is_empty() => {
                data.push_str(joiner);
                data.push_str(line_data(&next, DATA_INDENT));
            }
            other => return Ok((data, other)),
        }
    }
}

fn parse_source<R: BufRead>(
    lines: &mut Lines<R>,
    first_line: String,
    metadata: &mut GenBankMetadata,
) -> GenBankResult<Option<String>> {
    let mut source = String::new();
    let mut organism = String::new();
    let mut class_levels = String::new();

    let mut line = Some(first_line);
    while let Some(current) = line.take() {
        let header = line_header(&current, DATA_INDENT);
        if header == "SOURCE" {
            source = line_data(&current, DATA_INDENT).to_string();
            loop {
                match lines.next_line()? {
                    Some(next) if line_header(&next, DATA_INDENT).is_empty() => {
                        source.push(' ');
                        source.push_str(line_data(&next, DATA_INDENT));
                    }
                    other => {
                        line = other;
                        break;
                    }
                }
            }
        } else if current.starts_with(' ') {
            if header != "ORGANISM" {
                return Err(lines.parse_error(format!("invalid SOURCE sub-field '{header}'")));
            }
            organism = line_data(&current, DATA_INDENT).to_string();
            loop {
                match lines.next_line()? {
                    Some(next) if line_header(&next, DATA_INDENT).is_empty() => {
                        let data = line_data(&next, DATA_INDENT);
                        // taxonomy lines end in `;` or `.`, organism
                        // wrap-around lines do not
                        if data.ends_with(';') || data.ends_with('.') {
                            if !class_levels.is_empty() {
                                class_levels.push(' ');
                            }
                            class_levels.push_str(data);
                        } else {
                            organism.push(' ');
                            organism.push_str(data);
                        }
                    }
                    other => {
                        line = other;
                        break;
                    }
                }
            }
        } else {
            line = Some(current);
            break;
        }
    }

    let mut genus = String::new();
    let mut species = String::new();
    if !organism.is_empty() {
        match organism.find(' ') {
            Some(index) if index > 0 => {
                genus = organism[..index].to_string();
                species = organism[index + 1..].to_string();
            }
            _ => genus = organism.clone(),
        }
    }

    // An empty classification is a bare `.`; it contributes nothing. When
    // the taxonomy's last level disagrees with the genus guess, the whole
    // organism string is the species and the taxonomy wins.
    if !class_levels.trim().is_empty() {
        let last_level = class_levels
            .trim_end()
            .trim_end_matches('.')
            .split(';')
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .last();
        if let Some(last_level) = last_level {
            if last_level != genus.trim() {
                species = organism.clone();
                genus = last_level.to_string();
            }
        }
    }

    metadata.source = Some(SequenceSource {
        common_name: source.into(),
        organism: OrganismInfo {
            genus: genus.into(),
            species: species.into(),
            class_levels: class_levels.into(),
        },
    });
    Ok(line)
}

fn parse_references<R: BufRead>(
    lines: &mut Lines<R>,
    first_line: String,
    metadata: &mut GenBankMetadata,
) -> GenBankResult<Option<String>> {
    let mut reference: Option<CitationReference> = None;
    let mut line = Some(first_line);

    while let Some(current) = line.take() {
        let header = line_header(&current, DATA_INDENT);
        if header == "REFERENCE" {
            if let Some(finished) = reference.take() {
                metadata.references.push(finished);
            }
            let data = line_data(&current, DATA_INDENT);
            let digits = data.bytes().take_while(|b| b.is_ascii_digit()).count();
            if digits == 0 {
                return Err(lines.parse_error(format!("invalid REFERENCE header: '{data}'")));
            }
            let number: usize = data[..digits].parse().map_err(|_| {
                lines.parse_error(format!("invalid reference number: '{data}'"))
            })?;
            let rest = data[digits..].trim();
            let location = rest
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .filter(|l| !l.is_empty())
                .map(Into::into);
            reference = Some(CitationReference {
                number,
                location,
                ..CitationReference::default()
            });
            line = lines.next_line()?;
        } else if current.starts_with(' ') {
            let Some(active) = reference.as_mut() else {
                return Err(lines.parse_error("reference sub-field before REFERENCE"));
            };
            let field = match header {
                "AUTHORS" => &mut active.authors,
                "CONSRTM" => &mut active.consortiums,
                "TITLE" => &mut active.title,
                "JOURNAL" => &mut active.journal,
                "REMARK" => &mut active.remarks,
                "MEDLINE" => &mut active.medline,
                "PUBMED" => &mut active.pubmed,
                other => {
                    return Err(
                        lines.parse_error(format!("invalid reference sub-field '{other}'"))
                    );
                }
            };
            let (data, next) = parse_multiline(lines, current, " ")?;
            *field = Some(data.into());
            line = next;
        } else {
            line = Some(current);
            break;
        }
    }

    if let Some(finished) = reference.take() {
        metadata.references.push(finished);
    }
    Ok(line)
}

fn parse_features<R: BufRead>(
    lines: &mut Lines<R>,
    mut line: Option<String>,
    metadata: &mut GenBankMetadata,
) -> GenBankResult<Option<String>> {
    let mut features = SequenceFeatures::new();

    while let Some(current) = line.take() {
        let header = line_header(&current, FEATURE_INDENT);
        if header == "FEATURES" {
            line = lines.next_line()?;
            continue;
        }
        if !current.starts_with(' ') {
            line = Some(current);
            break;
        }
        if header.is_empty() {
            return Err(lines.parse_error("feature table line without a feature key"));
        }

        let key = header.to_string();
        let mut location_text = line_data(&current, FEATURE_INDENT).to_string();
        line = lines.next_line()?;

        // the location may wrap onto continuation lines
        while let Some(next) = &line {
            let data = line_data(next, FEATURE_INDENT);
            if line_header(next, FEATURE_INDENT).is_empty()
                && !data.is_empty()
                && !data.starts_with('/')
            {
                location_text.push_str(data);
                line = lines.next_line()?;
            } else {
                break;
            }
        }

        let location: Location = location_text.parse()?;
        let mut feature = FeatureItem::new(key, location);

        // qualifiers are `/name=value` lines; a `/` on a continuation line
        // only starts a new qualifier outside an unterminated quote
        let mut qualifier_name = String::new();
        let mut qualifier_value = String::new();
        let mut in_quotes = false;

        while let Some(current) = line.take() {
            let header = line_header(&current, FEATURE_INDENT);
            let data = line_data(&current, FEATURE_INDENT);
            if header.is_empty() {
                if data.starts_with('/') && !in_quotes {
                    if !qualifier_name.is_empty() {
                        feature.add_qualifier(
                            std::mem::take(&mut qualifier_name),
                            std::mem::take(&mut qualifier_value),
                        );
                    }
                    match data.find('=') {
                        None => {
                            qualifier_name = data[1..].to_string();
                            qualifier_value = String::new();
                            in_quotes = false;
                        }
                        Some(0) | Some(1) => {
                            return Err(
                                lines.parse_error(format!("invalid feature qualifier: '{data}'"))
                            );
                        }
                        Some(index) => {
                            qualifier_name = data[1..index].to_string();
                            qualifier_value = data[index + 1..].to_string();
                            in_quotes = qualifier_value.starts_with('"')
                                && !(qualifier_value.len() > 1 && qualifier_value.ends_with('"'));
                        }
                    }
                } else {
                    // continuation: notes keep their line breaks, peptide
                    // translations rejoin without separator
                    match qualifier_name.as_str() {
                        "note" => qualifier_value.push('\n'),
                        "translation" | "transl_except" => {}
                        _ => qualifier_value.push(' '),
                    }
                    qualifier_value.push_str(data);
                    if qualifier_value.ends_with('"') {
                        in_quotes = false;
                    }
                }
                line = lines.next_line()?;
            } else if current.starts_with('\t') {
                // tab-mangled continuation lines exist in old records
                warn!("nonstandard line format at line {}: '{current}'", lines.line_no);
                qualifier_value.push(' ');
                qualifier_value.push_str(current.trim());
                if qualifier_value.ends_with('"') {
                    in_quotes = false;
                }
                line = lines.next_line()?;
            } else {
                line = Some(current);
                break;
            }
        }

        if !qualifier_name.is_empty() {
            feature.add_qualifier(qualifier_name, qualifier_value);
        }
        features.all.push(feature);
    }

    if !features.all.is_empty() {
        metadata.features = Some(features);
    }
    Ok(line)
}

fn parse_sequence_section<R: BufRead>(
    lines: &mut Lines<R>,
    mut line: Option<String>,
    metadata: &mut GenBankMetadata,
) -> GenBankResult<Vec<u8>> {
    let mut bytes = Vec::new();

    while let Some(current) = line.take() {
        if current.starts_with("//") {
            return Ok(bytes);
        }
        match line_header(&current, DATA_INDENT) {
            // obsolete since 2003, preserved verbatim when present
            "BASE COUNT" => {
                metadata.base_count = Some(current.get(DATA_INDENT..).unwrap_or("").into());
                line = lines.next_line()?;
            }
            "ORIGIN" => {
                let data = line_data(&current, DATA_INDENT);
                if !data.is_empty() {
                    metadata.origin = Some(data.into());
                }
                line = lines.next_line()?;
                while let Some(body) = &line {
                    if !body.starts_with(' ') {
                        break;
                    }
                    // first token is the base offset; data columns shift
                    // between generator tools, so take tokens, not columns
                    for group in body.split_whitespace().skip(1) {
                        bytes.extend_from_slice(group.as_bytes());
                    }
                    line = lines.next_line()?;
                }
            }
            "CONTIG" => {
                let (data, next) = parse_multiline(lines, current, "\n")?;
                metadata.contig = Some(data.into());
                line = next;
            }
            _ => {
                return Err(
                    lines.parse_error(format!("unexpected line in sequence section: '{current}'"))
                );
            }
        }
    }

    Ok(bytes)
}
