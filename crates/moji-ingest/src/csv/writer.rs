//! Record writing and output encoding.

use std::path::Path;

use encoding_rs::{EncoderResult, Encoding};
use moji_model::FileConfig;

use crate::error::{IngestError, Result};

use super::reader::resolve_encoding;
use super::{Record, terminator};

/// Written in place of characters the output encoding cannot represent.
const SUBSTITUTE: &str = "?";

/// Scratch space for one encoder call.
const CHUNK_SIZE: usize = 4096;

/// Text encoded for output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedText {
    pub bytes: Vec<u8>,
    /// Characters written as `?`, in order of appearance.
    pub replaced: Vec<char>,
}

/// Encode `text` into `encoding`.
///
/// UTF-16 labels produce UTF-16 bytes without a byte order mark. Characters
/// the encoding cannot represent are written as `?` and listed in
/// [`EncodedText::replaced`].
pub fn encode_text(text: &str, encoding: &'static Encoding) -> EncodedText {
    if encoding == encoding_rs::UTF_16LE {
        return EncodedText {
            bytes: text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            replaced: Vec::new(),
        };
    }
    if encoding == encoding_rs::UTF_16BE {
        return EncodedText {
            bytes: text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            replaced: Vec::new(),
        };
    }

    let mut encoder = encoding.new_encoder();
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut encoded = EncodedText {
        bytes: Vec::with_capacity(text.len()),
        replaced: Vec::new(),
    };
    let mut rest = text;
    let mut last = false;
    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(rest, &mut chunk, last);
        encoded.bytes.extend_from_slice(&chunk[..written]);
        rest = &rest[read..];
        match result {
            EncoderResult::InputEmpty if last => break,
            EncoderResult::InputEmpty => last = true,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(character) => {
                encoded.replaced.push(character);
                // Stateful encoders need the substitute to go through them.
                let (_, _, written) =
                    encoder.encode_from_utf8_without_replacement(SUBSTITUTE, &mut chunk, false);
                encoded.bytes.extend_from_slice(&chunk[..written]);
            }
        }
    }
    encoded
}

/// Write `records` to the file described by `config`.
///
/// With `quoted` every field is enclosed in the quote character, otherwise
/// only fields that need it. Every record ends with the configured line
/// break, and a record with no content is written as an empty line.
///
/// Returns the characters that were written as `?` because the output
/// encoding cannot represent them. Each one is logged as a warning.
///
/// # Errors
///
/// - [`IngestError::UnsupportedEncoding`] for an unknown encoding label
/// - [`IngestError::FileWrite`] for I/O failures
pub fn write_records(records: &[Record], config: &FileConfig) -> Result<Vec<char>> {
    let path = config.path.as_path();
    let encoding = resolve_encoding(path, &config.encoding)?;
    let quote = config.quote_byte()?;

    let quote_style = if config.quoted {
        csv::QuoteStyle::Always
    } else {
        csv::QuoteStyle::Necessary
    };
    let mut builder = csv::WriterBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .quote(quote)
        .double_quote(true)
        .quote_style(quote_style)
        .terminator(terminator(config.line_break));

    // A lone empty field would come out as `""`.
    let mut buffer = Vec::new();
    for (index, run) in records.split(is_blank).enumerate() {
        if index > 0 {
            buffer.extend_from_slice(config.line_break.as_str().as_bytes());
        }
        write_run(&builder, run, &mut buffer, path)?;
    }
    let text = String::from_utf8(buffer).map_err(|e| IngestError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let encoded = encode_text(&text, encoding);
    std::fs::write(path, &encoded.bytes).map_err(|e| IngestError::write(path, e))?;

    for character in &encoded.replaced {
        let code_point = format!("U+{:04X}", u32::from(*character));
        tracing::warn!(
            path = %path.display(),
            encoding = encoding.name(),
            character = %character,
            code_point = %code_point,
            "Character not representable in the output encoding; wrote '?'"
        );
    }
    tracing::debug!(
        path = %path.display(),
        encoding = encoding.name(),
        records = records.len(),
        replaced = encoded.replaced.len(),
        "Wrote records"
    );
    Ok(encoded.replaced)
}

fn write_run(
    builder: &csv::WriterBuilder,
    run: &[Record],
    buffer: &mut Vec<u8>,
    path: &Path,
) -> Result<()> {
    if run.is_empty() {
        return Ok(());
    }
    let mut writer = builder.from_writer(buffer);
    for record in run {
        writer
            .write_record(record)
            .map_err(|e| IngestError::csv(path, &e))?;
    }
    writer.flush().map_err(|e| IngestError::write(path, e))
}

fn is_blank(record: &Record) -> bool {
    match record.as_slice() {
        [] => true,
        [field] => field.is_empty(),
        _ => false,
    }
}
