use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Strict UTF-8 decode for text formats. A UTF-8 BOM is dropped; any other
/// BOM or an invalid sequence is an error.
pub fn decode_utf8_text(bytes: &[u8]) -> Result<String, DecodeError> {
    let body = match Encoding::for_bom(bytes) {
        Some((enc, bom_len)) if enc == UTF_8 => &bytes[bom_len..],
        Some((enc, _)) => {
            return Err(DecodeError::DecodeFailure {
                encoding: enc.name().to_string(),
                message: "expected UTF-8 but found a different byte order mark".into(),
            })
        }
        None => bytes,
    };
    UTF_8
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| DecodeError::DecodeFailure {
            encoding: UTF_8.name().to_string(),
            message: "invalid byte sequence".into(),
        })
}

/// Decode an HTML file of unknown encoding: BOM first, then chardetng.
pub fn decode_html(bytes: &[u8]) -> Result<DecodedHtml, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<DecodedHtml, DecodeError> {
    let (text, actual, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: actual.name().to_string(),
            message: "decoding error".into(),
        });
    }
    Ok(DecodedHtml {
        html: text.into_owned(),
        encoding_label: actual.name().to_string(),
    })
}
