//! Text encoding inference and decoding.
//!
//! Detection is statistical and never fails: it always yields an
//! [`EncodingGuess`], possibly without an encoding. Decoding is strict:
//! bytes that are not valid in the requested encoding are an error, so the
//! reader can move on to its next candidate.

use crate::error::ReadError;
use crate::models::EncodingGuess;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, WINDOWS_1252};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Multi-byte sequences after which a UTF-8 guess stops gaining confidence
const UTF8_CONFIDENT_SEQUENCES: i32 = 6;

/// Single-byte guesses are damped below this many non-ASCII bytes
const SINGLE_BYTE_MIN_EVIDENCE: usize = 16;

/// Upper bound for single-byte guesses
const SINGLE_BYTE_DAMPING: f64 = 0.73;

/// Guess the encoding of `sample`
pub fn detect(sample: &[u8]) -> EncodingGuess {
    if sample.is_empty() {
        return EncodingGuess::none();
    }

    if sample.starts_with(UTF8_BOM) {
        return EncodingGuess::certain("utf-8-sig");
    }
    if sample.starts_with(UTF16LE_BOM) {
        return EncodingGuess::certain("utf-16le");
    }
    if sample.starts_with(UTF16BE_BOM) {
        return EncodingGuess::certain("utf-16be");
    }

    if sample.is_ascii() {
        return EncodingGuess::certain("ascii");
    }

    if let Some(sequences) = utf8_multibyte_sequences(sample) {
        let confidence = if sequences >= UTF8_CONFIDENT_SEQUENCES {
            0.99
        } else {
            1.0 - 0.99 * 0.5_f64.powi(sequences)
        };
        return EncodingGuess {
            encoding: Some("utf-8".to_string()),
            confidence,
        };
    }

    single_byte_guess(sample)
}

/// Read the first `sample_size` bytes of `path` and guess their encoding.
///
/// Returns the label to decode with: the guess when its confidence exceeds
/// `threshold`, otherwise `fallback`. The second value is the raw guess.
pub fn detect_file_encoding(
    path: &Path,
    sample_size: usize,
    threshold: f64,
    fallback: &str,
) -> io::Result<(String, EncodingGuess)> {
    let mut sample = Vec::with_capacity(sample_size.min(1 << 20));
    File::open(path)?
        .take(sample_size as u64)
        .read_to_end(&mut sample)?;

    let guess = detect(&sample);
    let chosen = match &guess.encoding {
        Some(encoding) if guess.confidence > threshold => encoding.clone(),
        _ => fallback.to_string(),
    };
    Ok((chosen, guess))
}

/// Count UTF-8 multi-byte sequences, or `None` when the sample is not UTF-8.
///
/// A sequence cut off by the end of the sample still counts as valid.
fn utf8_multibyte_sequences(sample: &[u8]) -> Option<i32> {
    let valid = match std::str::from_utf8(sample) {
        Ok(text) => text,
        Err(e) if e.error_len().is_none() => {
            // Truncated trailing sequence; judge the complete prefix
            std::str::from_utf8(&sample[..e.valid_up_to()]).ok()?
        }
        Err(_) => return None,
    };
    let count = valid.chars().filter(|c| c.len_utf8() > 1).count();
    Some(count.min(i32::MAX as usize) as i32)
}

/// Western single-byte guess scored on how letter-like the high bytes are
fn single_byte_guess(sample: &[u8]) -> EncodingGuess {
    let high: Vec<u8> = sample.iter().copied().filter(|b| *b >= 0x80).collect();
    if high.is_empty() {
        return EncodingGuess::none();
    }

    let plausible = high.iter().filter(|b| is_plausible_western(**b)).count();
    let share = plausible as f64 / high.len() as f64;
    let evidence = (high.len() as f64 / SINGLE_BYTE_MIN_EVIDENCE as f64).min(1.0);

    EncodingGuess {
        encoding: Some("windows-1252".to_string()),
        confidence: share * evidence * SINGLE_BYTE_DAMPING,
    }
}

/// Accented letters, typographic quotes, dashes and common symbols
fn is_plausible_western(byte: u8) -> bool {
    match byte {
        0xC0..=0xFF => byte != 0xD7 && byte != 0xF7,
        0x80 | 0x85 | 0x91..=0x97 | 0x8A | 0x8C | 0x8E | 0x9A | 0x9C | 0x9E | 0x9F => true,
        0xA0..=0xBF => true,
        _ => false,
    }
}

/// How a label's bytes are turned into text
enum Codec {
    Ascii,
    Utf8,
    /// Every byte maps to the code point of the same value
    Latin1,
    Whatwg(&'static Encoding),
}

fn codec_for_label(label: &str) -> Option<Codec> {
    let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
    match normalized.as_str() {
        "utf-8" | "utf8" | "utf-8-sig" => Some(Codec::Utf8),
        "ascii" | "us-ascii" => Some(Codec::Ascii),
        "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "l1" => Some(Codec::Latin1),
        "cp1252" | "windows-1252" => Some(Codec::Whatwg(WINDOWS_1252)),
        "utf-16le" => Some(Codec::Whatwg(UTF_16LE)),
        "utf-16be" => Some(Codec::Whatwg(UTF_16BE)),
        other => Encoding::for_label(other.as_bytes()).map(Codec::Whatwg),
    }
}

/// True if `label` names an encoding this module can decode
pub fn is_supported(label: &str) -> bool {
    codec_for_label(label).is_some()
}

/// Decode `bytes` under `label`, failing on any invalid sequence.
///
/// A byte-order mark matching the encoding is stripped.
pub fn decode(bytes: &[u8], label: &str) -> Result<String, ReadError> {
    let codec = codec_for_label(label).ok_or_else(|| ReadError::UnknownEncoding {
        label: label.to_string(),
    })?;

    let decode_error = || ReadError::Decode {
        encoding: label.to_string(),
    };

    match codec {
        Codec::Ascii if bytes.is_ascii() => Ok(bytes.iter().map(|b| *b as char).collect()),
        Codec::Ascii => Err(decode_error()),
        Codec::Utf8 => {
            let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            String::from_utf8(body.to_vec()).map_err(|_| decode_error())
        }
        Codec::Latin1 => Ok(bytes.iter().map(|b| *b as char).collect()),
        Codec::Whatwg(encoding) => {
            let body = match encoding.name() {
                "UTF-16LE" => bytes.strip_prefix(UTF16LE_BOM).unwrap_or(bytes),
                "UTF-16BE" => bytes.strip_prefix(UTF16BE_BOM).unwrap_or(bytes),
                _ => bytes,
            };
            encoding
                .decode_without_bom_handling_and_without_replacement(body)
                .map(|text| text.into_owned())
                .ok_or_else(decode_error)
        }
    }
}
