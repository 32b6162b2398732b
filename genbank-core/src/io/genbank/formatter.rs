//! GenBank record rendering.
//!
//! The inverse of the tokenizer: fixed-column LOCUS assembly, header
//! sections wrapped at the conventional 79-column width, the feature table
//! with locations rendered through the location grammar, and the sequence in
//! 60-base lines of six 10-base groups.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{GenBankError, GenBankResult};
use crate::io::genbank::locus::{format_date, Locus};
use crate::io::genbank::metadata::GenBankMetadata;
use crate::io::genbank::GenBankRecord;
use crate::seq::SeqKind;

// the format allows up to 80 columns per line, but everything in the wild
// wraps at 79
const MAX_LINE: usize = 79;
const HEADER_INDENT: usize = 12;
const FEATURE_INDENT: usize = 21;

const SEQ_GROUP: usize = 10;
const SEQ_GROUPS_PER_LINE: usize = 6;

/// Renders one record to GenBank text.
pub fn genbank_record_to_string(record: &GenBankRecord) -> GenBankResult<String> {
    let metadata = &record.metadata;
    let locus = metadata.locus.as_ref().ok_or(GenBankError::Format {
        msg: "record has no LOCUS metadata",
    })?;

    let mut out = String::new();
    write_locus_line(&mut out, locus, record);
    write_headers(&mut out, metadata);
    write_features(&mut out, metadata);
    write_sequence(&mut out, record);
    Ok(out)
}

pub fn write_genbank_record<W: Write>(writer: &mut W, record: &GenBankRecord) -> GenBankResult<()> {
    let text = genbank_record_to_string(record)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

pub fn write_genbank_records<W: Write>(
    writer: &mut W,
    records: &[GenBankRecord],
) -> GenBankResult<()> {
    for record in records {
        write_genbank_record(writer, record)?;
    }
    Ok(())
}

pub fn write_genbank_records_to_path(
    path: impl AsRef<Path>,
    records: &[GenBankRecord],
) -> GenBankResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_genbank_records(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

fn write_locus_line(out: &mut String, locus: &Locus, record: &GenBankRecord) {
    let unit = if locus.sequence_unit.is_empty() {
        if record.sequence.kind() == SeqKind::Protein {
            "aa"
        } else {
            "bp"
        }
    } else {
        &*locus.sequence_unit
    };
    let date = locus.date.map(format_date).unwrap_or_default();
    let line = format!(
        "{:<12}{:<16} {:>11} {} {:>3}{:<6}  {:<8} {:>3} {}",
        "LOCUS",
        locus.name,
        record.sequence.len(),
        unit,
        locus.strand.as_str(),
        locus.molecule_type.as_str(),
        locus.topology.as_str(),
        locus.division.as_str(),
        date,
    );
    out.push_str(line.trim_end());
    out.push('\n');
}

fn write_headers(out: &mut String, metadata: &GenBankMetadata) {
    if let Some(definition) = &metadata.definition {
        write_section(out, "DEFINITION", HEADER_INDENT, definition);
    }

    if let Some(accession) = &metadata.accession {
        let mut data = accession.primary.to_string();
        for secondary in &accession.secondary {
            data.push(' ');
            data.push_str(secondary);
        }
        write_section(out, "ACCESSION", HEADER_INDENT, &data);

        // VERSION restates the primary accession
        if let Some(version) = &metadata.version {
            let mut data = format!("{}.{}", accession.primary, version.version);
            if !version.gi_number.is_empty() {
                data.push_str("  GI:");
                data.push_str(&version.gi_number);
            }
            write_section(out, "VERSION", HEADER_INDENT, &data);
        }
    }

    if let Some(project) = &metadata.project {
        let data = format!("{}:{}", project.name, project.numbers.join(","));
        write_section(out, "PROJECT", HEADER_INDENT, &data);
    }

    if !metadata.db_links.is_empty() {
        let data = metadata
            .db_links
            .iter()
            .map(|link| format!("{}:{}", link.label, link.numbers.join(",")))
            .collect::<Vec<_>>()
            .join("\n");
        write_section(out, "DBLINK", HEADER_INDENT, &data);
    }

    if let Some(db_source) = &metadata.db_source {
        write_section(out, "DBSOURCE", HEADER_INDENT, db_source);
    }
    if let Some(keywords) = &metadata.keywords {
        write_section(out, "KEYWORDS", HEADER_INDENT, keywords);
    }
    if let Some(segment) = &metadata.segment {
        let data = format!("{} of {}", segment.current, segment.count);
        write_section(out, "SEGMENT", HEADER_INDENT, &data);
    }

    if let Some(source) = &metadata.source {
        write_section(out, "SOURCE", HEADER_INDENT, &source.common_name);
        let mut organism = String::new();
        if source.common_name != source.organism.species {
            organism.push_str(&source.organism.genus);
            organism.push(' ');
        }
        organism.push_str(&source.organism.species);
        write_section(out, "  ORGANISM", HEADER_INDENT, organism.trim());
        write_section(out, "", HEADER_INDENT, &source.organism.class_levels);
    }

    for reference in &metadata.references {
        let data = match &reference.location {
            Some(location) => format!("{:<3}({location})", reference.number),
            None => reference.number.to_string(),
        };
        write_section(out, "REFERENCE", HEADER_INDENT, &data);
        let sub_fields = [
            ("  AUTHORS", &reference.authors),
            ("  CONSRTM", &reference.consortiums),
            ("  TITLE", &reference.title),
            ("  JOURNAL", &reference.journal),
            ("  MEDLINE", &reference.medline),
            ("  PUBMED", &reference.pubmed),
            ("  REMARK", &reference.remarks),
        ];
        for (header, value) in sub_fields {
            if let Some(value) = value {
                write_section(out, header, HEADER_INDENT, value);
            }
        }
    }

    for comment in &metadata.comments {
        write_section(out, "COMMENT", HEADER_INDENT, comment);
    }

    if let Some(primary) = &metadata.primary {
        write_section(out, "PRIMARY", HEADER_INDENT, primary);
    }
}

fn write_features(out: &mut String, metadata: &GenBankMetadata) {
    let Some(features) = &metadata.features else {
        return;
    };
    write_section(out, "FEATURES", FEATURE_INDENT, "Location/Qualifiers");

    for feature in &features.all {
        let header = format!("     {}", feature.key());
        write_section(out, &header, FEATURE_INDENT, &feature.location().to_string());

        for (name, values) in feature.qualifiers() {
            for value in values {
                let mut data = format!("/{name}");
                if !value.is_empty() {
                    data.push('=');
                    data.push_str(value);
                }
                write_section(out, "", FEATURE_INDENT, &data);
            }
        }
    }
}

fn write_sequence(out: &mut String, record: &GenBankRecord) {
    let metadata = &record.metadata;
    if let Some(base_count) = &metadata.base_count {
        out.push_str("BASE COUNT  ");
        out.push_str(base_count);
        out.push('\n');
    }
    if let Some(contig) = &metadata.contig {
        write_section(out, "CONTIG", HEADER_INDENT, contig);
    }

    if !record.sequence.is_empty() {
        match &metadata.origin {
            Some(origin) if !origin.is_empty() => {
                write_section(out, "ORIGIN", HEADER_INDENT, origin)
            }
            _ => out.push_str("ORIGIN\n"),
        }
        write_sequence_lines(out, record.sequence.as_bytes());
    }

    out.push_str("//\n");
}

fn write_sequence_lines(out: &mut String, bytes: &[u8]) {
    let mut index = 0;
    while index < bytes.len() {
        out.push_str(&format!("{:>9}", index + 1));
        for _ in 0..SEQ_GROUPS_PER_LINE {
            if index >= bytes.len() {
                break;
            }
            let end = (index + SEQ_GROUP).min(bytes.len());
            out.push(' ');
            for &b in &bytes[index..end] {
                out.push(b.to_ascii_lowercase() as char);
            }
            index = end;
        }
        out.push('\n');
    }
}

/// Writes `data` under `header`, wrapping every line at [`MAX_LINE`] columns
/// with continuations indented to `indent`.
///
/// Line breaks already present in the data are honored. Overlong lines break
/// at the last space inside the limit; failing that, after a comma or
/// semicolon, then after a period or dash; failing everything, hard at the
/// limit. Nothing at all is written for empty data.
fn write_section(out: &mut String, header: &str, indent: usize, data: &str) {
    let max_data = MAX_LINE - indent;
    let mut first = true;

    for chunk in data.split(['\r', '\n']) {
        let bytes = chunk.as_bytes();
        let mut start = 0;
        while start < bytes.len() {
            while start < bytes.len() && bytes[start] == b' ' {
                start += 1;
            }
            if start >= bytes.len() {
                break;
            }

            let line_len = if start + max_data >= bytes.len() {
                bytes.len() - start
            } else {
                wrap_length(chunk, start, max_data)
            };

            if first {
                out.push_str(&format!("{:<indent$}", header));
                first = false;
            } else {
                for _ in 0..indent {
                    out.push(' ');
                }
            }
            out.push_str(&chunk[start..start + line_len]);
            out.push('\n');
            start += line_len;
        }
    }
}

/// Length of the line starting at `start` when the rest of the chunk does
/// not fit; the break character stays on the line for punctuation breaks.
fn wrap_length(chunk: &str, start: usize, max_data: usize) -> usize {
    let bytes = chunk.as_bytes();
    let window_end = start + max_data;

    let mut i = window_end;
    while i > start {
        if bytes[i] == b' ' {
            return i - start;
        }
        i -= 1;
    }

    for set in [&b",;"[..], &b".-"[..]] {
        let mut i = window_end - 1;
        loop {
            if set.contains(&bytes[i]) {
                return i + 1 - start;
            }
            if i == start {
                break;
            }
            i -= 1;
        }
    }

    let mut len = max_data;
    while !chunk.is_char_boundary(start + len) {
        len -= 1;
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::genbank::parser::read_genbank_records_from_bytes;
    use crate::seq::Sequence;

    const FIXTURE: &str = "\
LOCUS       TESTSEQ                   60 bp    DNA     linear   SYN 21-JUN-1999
DEFINITION  Synthetic test construct joining two coding segments for parser
            and formatter validation.
ACCESSION   AB123456
VERSION     AB123456.1  GI:123456
KEYWORDS    .
SOURCE      synthetic DNA construct
  ORGANISM  synthetic DNA construct
            other sequences; artificial sequences.
REFERENCE   1  (bases 1 to 60)
  AUTHORS   Doe,J.
  TITLE     Direct Submission
  JOURNAL   Submitted (01-JAN-1999) Test Lab, Test University
FEATURES             Location/Qualifiers
     source          1..60
                     /organism=\"synthetic DNA construct\"
                     /mol_type=\"genomic DNA\"
     gene            1..30
                     /gene=\"tst\"
     CDS             join(1..12,21..30)
                     /gene=\"tst\"
                     /citation=[1]
                     /product=\"test protein\"
                     /translation=\"MHACMHACMHACMHACMHACMHACMHACMHACMHACMHACMHACMHACMHACMHACMHACMHACMH\"
ORIGIN
        1 atgcatgcat gcatgcatgc atgcatgcat gcatgcatgc atgcatgcat gcatgcatgc
//
";

    #[test]
    fn format_then_reparse_is_identity() {
        let records = read_genbank_records_from_bytes(FIXTURE.as_bytes()).unwrap();
        let rendered = genbank_record_to_string(&records[0]).unwrap();

        let reparsed = read_genbank_records_from_bytes(rendered.as_bytes()).unwrap();
        assert_eq!(reparsed.len(), 1);
        assert_eq!(reparsed[0], records[0]);

        // rendering the reparsed record is byte-stable
        let rerendered = genbank_record_to_string(&reparsed[0]).unwrap();
        assert_eq!(rerendered, rendered);
    }

    #[test]
    fn rendered_layout() {
        let records = read_genbank_records_from_bytes(FIXTURE.as_bytes()).unwrap();
        let rendered = genbank_record_to_string(&records[0]).unwrap();

        assert!(rendered.starts_with("LOCUS       TESTSEQ"));
        assert!(rendered.contains("\nFEATURES             Location/Qualifiers\n"));
        assert!(rendered.contains("\n     CDS             join(1..12,21..30)\n"));
        assert!(rendered.contains("\n                     /citation=[1]\n"));
        assert!(rendered.contains("\nORIGIN\n"));
        assert!(rendered.contains(
            "\n        1 atgcatgcat gcatgcatgc atgcatgcat gcatgcatgc atgcatgcat gcatgcatgc\n"
        ));
        assert!(rendered.ends_with("//\n"));

        for line in rendered.lines() {
            assert!(line.len() <= MAX_LINE, "line too long: '{line}'");
        }
    }

    #[test]
    fn locus_line_columns() {
        let records = read_genbank_records_from_bytes(FIXTURE.as_bytes()).unwrap();
        let rendered = genbank_record_to_string(&records[0]).unwrap();
        let locus_line = rendered.lines().next().unwrap();
        assert_eq!(
            locus_line,
            "LOCUS       TESTSEQ                   60 bp    DNA     linear   SYN 21-JUN-1999"
        );
    }

    #[test]
    fn long_quoted_values_wrap_and_rejoin() {
        let records = read_genbank_records_from_bytes(FIXTURE.as_bytes()).unwrap();
        let rendered = genbank_record_to_string(&records[0]).unwrap();

        // the translation has no spaces, so it hard-wraps at the line limit
        let lines: Vec<&str> = rendered.lines().collect();
        let start = lines
            .iter()
            .position(|l| l.contains("/translation="))
            .unwrap();
        let mut translation_lines = vec![lines[start]];
        for line in &lines[start + 1..] {
            if line.starts_with("                     ") && !line.trim_start().starts_with('/') {
                translation_lines.push(line);
            } else {
                break;
            }
        }
        assert!(translation_lines.len() > 1);
        assert_eq!(translation_lines[0].len(), MAX_LINE);

        let reparsed = read_genbank_records_from_bytes(rendered.as_bytes()).unwrap();
        let features = reparsed[0].metadata.features.as_ref().unwrap();
        let cds = features.coding_sequences()[0];
        assert_eq!(
            cds.translation(),
            records[0].metadata.features.as_ref().unwrap().coding_sequences()[0].translation()
        );
    }

    #[test]
    fn multi_record_write_and_read_back() {
        let records = read_genbank_records_from_bytes(FIXTURE.as_bytes()).unwrap();
        let pair = vec![records[0].clone(), records[0].clone()];

        let mut buffer = Vec::new();
        write_genbank_records(&mut buffer, &pair).unwrap();
        let read_back = read_genbank_records_from_bytes(&buffer).unwrap();
        assert_eq!(read_back.len(), 2);
        assert_eq!(read_back[0], read_back[1]);
    }

    #[test]
    fn path_round_trip() {
        let records = read_genbank_records_from_bytes(FIXTURE.as_bytes()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gbk");

        write_genbank_records_to_path(&path, &records).unwrap();
        let read_back =
            crate::io::genbank::parser::read_genbank_records_from_path(&path).unwrap();
        assert_eq!(read_back, records);
    }

    #[test]
    fn formatting_without_locus_fails() {
        let record = GenBankRecord {
            sequence: Sequence::new(SeqKind::Dna, b"acgt".to_vec(), "x").unwrap(),
            metadata: GenBankMetadata::default(),
        };
        let err = genbank_record_to_string(&record).unwrap_err();
        assert!(matches!(err, GenBankError::Format { .. }));
    }

    #[test]
    fn dblink_lines_render_one_per_link() {
        let text = "\
LOCUS       LINKSEQ                   10 bp    DNA     linear  SYN 01-JAN-2020
DBLINK      BioProject: PRJNA257197
            BioSample: SAMN03081868
ORIGIN
        1 atgcatgcat
//
";
        let records = read_genbank_records_from_bytes(text.as_bytes()).unwrap();
        let rendered = genbank_record_to_string(&records[0]).unwrap();
        assert!(rendered.contains("\nDBLINK      BioProject: PRJNA257197\n"));
        assert!(rendered.contains("\n            BioSample: SAMN03081868\n"));

        let reparsed = read_genbank_records_from_bytes(rendered.as_bytes()).unwrap();
        assert_eq!(reparsed[0].metadata.db_links, records[0].metadata.db_links);
    }

    #[test]
    fn note_line_breaks_survive_round_trip() {
        let text = "\
LOCUS       NOTESEQ                   10 bp    DNA     linear  SYN 01-JAN-2020
FEATURES             Location/Qualifiers
     variation       5^6
                     /note=\"T in MMBCASE;
                     deleted in CAST/Ei\"
                     /replace=\"t\"
ORIGIN
        1 atgcatgcat
//
";
        let records = read_genbank_records_from_bytes(text.as_bytes()).unwrap();
        let rendered = genbank_record_to_string(&records[0]).unwrap();
        let reparsed = read_genbank_records_from_bytes(rendered.as_bytes()).unwrap();

        let variation = &reparsed[0].metadata.features.as_ref().unwrap().all[0];
        assert_eq!(variation.location().to_string(), "5^6");
        assert_eq!(variation.note(), Some("\"T in MMBCASE;\ndeleted in CAST/Ei\""));
        assert_eq!(reparsed[0], records[0]);
    }
}
