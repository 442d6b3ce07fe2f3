//! Record reading with explicit dialect configuration.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::Encoding;
use moji_core::lookup_encoding;
use moji_model::{FileConfig, LineBreak};

use crate::error::{IngestError, Result};

use super::{Record, terminator};

/// Resolve the encoding label configured for `path`.
pub fn resolve_encoding(path: &Path, label: &str) -> Result<&'static Encoding> {
    lookup_encoding(label).map_err(|_| IngestError::UnsupportedEncoding {
        path: path.to_path_buf(),
        encoding: label.to_string(),
    })
}

/// Decode file bytes, dropping a leading byte order mark.
///
/// Malformed sequences become U+FFFD and are logged.
pub fn decode_text<'a>(path: &Path, bytes: &'a [u8], encoding: &'static Encoding) -> Cow<'a, str> {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        tracing::warn!(
            path = %path.display(),
            encoding = encoding.name(),
            "input contains malformed byte sequences; replaced with U+FFFD"
        );
    }
    text
}

/// Read every record of the file described by `config`.
///
/// Fields are split on commas. The configured quote character encloses
/// fields and is escaped by doubling. Records may have different field
/// counts. A blank line is a record with one empty field.
///
/// # Errors
///
/// - [`IngestError::FileNotFound`] / [`IngestError::FileRead`] for I/O failures
/// - [`IngestError::UnsupportedEncoding`] for an unknown encoding label
/// - [`IngestError::Csv`] for malformed records
pub fn read_records(config: &FileConfig) -> Result<Vec<Record>> {
    let path = config.path.as_path();
    let encoding = resolve_encoding(path, &config.encoding)?;
    let quote = config.quote_byte()?;

    let bytes = std::fs::read(path).map_err(|e| IngestError::read(path, e))?;
    let text = decode_text(path, &bytes, encoding);

    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .quote(quote)
        .double_quote(true)
        .terminator(terminator(config.line_break));

    let mut records = Vec::new();
    for chunk in split_blank_lines(&text, quote, config.line_break) {
        let Chunk::Records(chunk) = chunk else {
            records.push(vec![String::new()]);
            continue;
        };
        for row in builder.from_reader(chunk.as_bytes()).records() {
            let row = row.map_err(|e| IngestError::csv(path, &e))?;
            records.push(row.iter().map(str::to_string).collect());
        }
    }

    tracing::debug!(
        path = %path.display(),
        encoding = encoding.name(),
        records = records.len(),
        "Read records"
    );
    Ok(records)
}

/// A stretch of input between blank lines.
#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Records(&'a str),
    Blank,
}

/// Length of the line break starting at `bytes[at]`, if any.
///
/// CRLF mode accepts `\r\n`, `\r` and `\n`, as the csv reader does.
fn line_break_len(bytes: &[u8], at: usize, line_break: LineBreak) -> Option<usize> {
    match (line_break, bytes[at]) {
        (LineBreak::Crlf, b'\r') if bytes.get(at + 1) == Some(&b'\n') => Some(2),
        (LineBreak::Crlf, b'\r' | b'\n') | (LineBreak::Lf, b'\n') | (LineBreak::Cr, b'\r') => {
            Some(1)
        }
        _ => None,
    }
}

/// Split `text` at blank lines outside quoted fields.
///
/// The csv reader skips blank lines, so they are cut out here and kept as
/// [`Chunk::Blank`]. Quote, comma and line break bytes are ASCII and never
/// occur inside a multi-byte UTF-8 sequence.
fn split_blank_lines(text: &str, quote: u8, line_break: LineBreak) -> Vec<Chunk<'_>> {
    let bytes = text.as_bytes();
    let mut chunks = Vec::new();
    let mut chunk_start = 0;
    let mut record_start = true;
    let mut field_start = true;
    let mut in_quotes = false;
    let mut at = 0;

    while at < bytes.len() {
        let byte = bytes[at];
        if in_quotes {
            if byte == quote {
                if bytes.get(at + 1) == Some(&quote) {
                    at += 2;
                    continue;
                }
                in_quotes = false;
            }
            at += 1;
            continue;
        }
        if let Some(len) = line_break_len(bytes, at, line_break) {
            if record_start {
                if chunk_start < at {
                    chunks.push(Chunk::Records(&text[chunk_start..at]));
                }
                chunks.push(Chunk::Blank);
                chunk_start = at + len;
            }
            record_start = true;
            field_start = true;
            at += len;
            continue;
        }
        in_quotes = byte == quote && field_start;
        field_start = byte == b',';
        record_start = false;
        at += 1;
    }
    if chunk_start < bytes.len() {
        chunks.push(Chunk::Records(&text[chunk_start..]));
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use moji_model::LineBreak;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> FileConfig {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        FileConfig::new(path)
    }

    #[test]
    fn test_reads_quoted_and_bare_fields() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "in.csv", "\"ID\",\"名前\"\n1,\"龍,王\"\n".as_bytes());
        let records = read_records(&config).unwrap();
        assert_eq!(records, vec![vec!["ID", "名前"], vec!["1", "龍,王"]]);
    }

    #[test]
    fn test_doubled_quote_escapes() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "in.csv", b"\"say \"\"hi\"\"\",x\n");
        let records = read_records(&config).unwrap();
        assert_eq!(records, vec![vec!["say \"hi\"", "x"]]);
    }

    #[test]
    fn test_flexible_field_counts() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "in.csv", b"a,b,c\nd\n");
        let records = read_records(&config).unwrap();
        assert_eq!(records[0].len(), 3);
        assert_eq!(records[1], vec!["d"]);
    }

    #[test]
    fn test_crlf_records() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "in.csv", b"a,b\r\nc,d\r\n").with_line_break(LineBreak::Crlf);
        let records = read_records(&config).unwrap();
        assert_eq!(records, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_cr_records() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "in.csv", b"a,b\rc,d\r").with_line_break(LineBreak::Cr);
        let records = read_records(&config).unwrap();
        assert_eq!(records, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_custom_quote() {
        let dir = TempDir::new().unwrap();
        let mut config = write_file(&dir, "in.csv", b"'a,b',c\n");
        config.quote = "'".to_string();
        let records = read_records(&config).unwrap();
        assert_eq!(records, vec![vec!["a,b", "c"]]);
    }

    #[test]
    fn test_decodes_shift_jis() {
        let dir = TempDir::new().unwrap();
        let (bytes, _, unmappable) = encoding_rs::SHIFT_JIS.encode("漢字,テスト\n");
        assert!(!unmappable);
        let config = write_file(&dir, "in.csv", &bytes).with_encoding("shift_jis");
        let records = read_records(&config).unwrap();
        assert_eq!(records, vec![vec!["漢字", "テスト"]]);
    }

    #[test]
    fn test_strips_utf8_bom() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "in.csv", b"\xEF\xBB\xBFID,NAME\n");
        let records = read_records(&config).unwrap();
        assert_eq!(records[0][0], "ID");
    }

    #[test]
    fn test_blank_lines_are_single_empty_field_records() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "in.csv", "1,龍\n\n2,鳳\n".as_bytes());
        let records = read_records(&config).unwrap();
        assert_eq!(records, vec![vec!["1", "龍"], vec![""], vec!["2", "鳳"]]);
    }

    #[test]
    fn test_leading_and_crlf_blank_lines() {
        let dir = TempDir::new().unwrap();
        let config =
            write_file(&dir, "in.csv", b"\r\na\r\n\r\nb\r\n").with_line_break(LineBreak::Crlf);
        let records = read_records(&config).unwrap();
        assert_eq!(records, vec![vec![""], vec!["a"], vec![""], vec!["b"]]);
    }

    #[test]
    fn test_line_breaks_inside_quotes_are_not_blank_lines() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "in.csv", b"\"a\n\nb\",c\n\"x\"\"\n\n\",y\n");
        let records = read_records(&config).unwrap();
        assert_eq!(records, vec![vec!["a\n\nb", "c"], vec!["x\"\n\n", "y"]]);
    }

    #[test]
    fn test_split_blank_lines() {
        assert_eq!(
            split_blank_lines("a\n\nb\n", b'"', LineBreak::Lf),
            vec![Chunk::Records("a\n"), Chunk::Blank, Chunk::Records("b\n")]
        );
        assert_eq!(
            split_blank_lines("a\rb\r", b'"', LineBreak::Cr),
            vec![Chunk::Records("a\rb\r")]
        );
        assert_eq!(
            split_blank_lines("a\n\n", b'"', LineBreak::Lf),
            vec![Chunk::Records("a\n"), Chunk::Blank]
        );
        assert!(split_blank_lines("", b'"', LineBreak::Lf).is_empty());
    }

    #[test]
    fn test_empty_file_has_no_records() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "in.csv", b"");
        assert!(read_records(&config).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = FileConfig::new(dir.path().join("missing.csv"));
        assert!(matches!(
            read_records(&config),
            Err(IngestError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_encoding() {
        let dir = TempDir::new().unwrap();
        let config = write_file(&dir, "in.csv", b"a\n").with_encoding("invalid-encoding");
        match read_records(&config) {
            Err(IngestError::UnsupportedEncoding { encoding, .. }) => {
                assert_eq!(encoding, "invalid-encoding");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
