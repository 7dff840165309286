//! Data URI assembly and parsing.
//!
//! The host chat application renders exactly two shapes:
//! `data:image/png;base64,<payload>` and `data:image/jpeg;base64,<payload>`,
//! using the standard padded base64 alphabet.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::EncodeError;

const BASE64_MARKER: &str = ";base64,";

/// Output format of an encoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// Lossless, keeps alpha.
    Png,
    /// Lossy, opaque.
    Jpeg,
}

impl PayloadFormat {
    /// MIME type, as written into the data URI.
    pub fn mime_type(self) -> &'static str {
        match self {
            PayloadFormat::Png => "image/png",
            PayloadFormat::Jpeg => "image/jpeg",
        }
    }

    /// Short lowercase name ("png" or "jpeg").
    pub fn as_str(self) -> &'static str {
        match self {
            PayloadFormat::Png => "png",
            PayloadFormat::Jpeg => "jpeg",
        }
    }

    fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(PayloadFormat::Png),
            "image/jpeg" | "image/jpg" => Some(PayloadFormat::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length in characters of the padded base64 encoding of `byte_len` bytes.
pub fn base64_len(byte_len: usize) -> usize {
    byte_len.div_ceil(3) * 4
}

/// A `data:image/<format>;base64,<payload>` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    format: PayloadFormat,
    uri: String,
    payload_start: usize,
}

impl DataUri {
    /// Base64-encode `bytes` behind the MIME prefix for `format`.
    pub fn new(format: PayloadFormat, bytes: &[u8]) -> Self {
        let prefix = format!("data:{}{}", format.mime_type(), BASE64_MARKER);
        let payload_start = prefix.len();

        let mut uri = String::with_capacity(payload_start + base64_len(bytes.len()));
        uri.push_str(&prefix);
        STANDARD.encode_string(bytes, &mut uri);

        Self {
            format,
            uri,
            payload_start,
        }
    }

    /// Parse a PNG or JPEG data URI produced by this crate or by a host.
    ///
    /// The stored string always uses `image/png` or `image/jpeg`, even when
    /// the input declared `image/jpg`.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::MalformedDataUri` if the prefix, MIME type or
    /// base64 payload is invalid.
    pub fn parse(input: &str) -> Result<Self, EncodeError> {
        let rest = input
            .strip_prefix("data:")
            .ok_or_else(|| EncodeError::MalformedDataUri("missing 'data:' scheme".into()))?;

        let (mime, payload) = rest.split_once(BASE64_MARKER).ok_or_else(|| {
            EncodeError::MalformedDataUri("missing ';base64,' marker".into())
        })?;

        let format = PayloadFormat::from_mime_type(mime).ok_or_else(|| {
            EncodeError::MalformedDataUri(format!("unsupported MIME type '{}'", mime))
        })?;

        STANDARD
            .decode(payload)
            .map_err(|e| EncodeError::MalformedDataUri(e.to_string()))?;

        // Aliases such as image/jpg are normalized to the canonical prefix
        let prefix = format!("data:{}{}", format.mime_type(), BASE64_MARKER);
        let payload_start = prefix.len();

        Ok(Self {
            format,
            uri: prefix + payload,
            payload_start,
        })
    }

    /// Format declared in the MIME prefix.
    pub fn format(&self) -> PayloadFormat {
        self.format
    }

    /// The full data URI.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// The base64 portion after the comma.
    pub fn payload(&self) -> &str {
        &self.uri[self.payload_start..]
    }

    /// Length in characters of the base64 portion; this is what the budget limits.
    pub fn payload_len(&self) -> usize {
        self.uri.len() - self.payload_start
    }

    /// Decode the base64 portion back to image bytes.
    pub fn decode_payload(&self) -> Result<Vec<u8>, EncodeError> {
        STANDARD
            .decode(self.payload())
            .map_err(|e| EncodeError::MalformedDataUri(e.to_string()))
    }

    /// Markdown image reference, e.g. `![chart](data:image/png;base64,...)`.
    pub fn to_markdown(&self, alt: &str) -> String {
        format!("![{}]({})", escape_markdown_alt(alt), self.uri)
    }

    /// HTML `<img>` element with the data URI as `src`.
    pub fn to_img_tag(&self, alt: &str) -> String {
        format!(r#"<img src="{}" alt="{}">"#, self.uri, escape_html_attr(alt))
    }

    /// Consume and return the full data URI string.
    pub fn into_string(self) -> String {
        self.uri
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for DataUri {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

fn escape_markdown_alt(alt: &str) -> String {
    alt.replace('[', "\\[").replace(']', "\\]")
}

fn escape_html_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_png_prefix() {
        let uri = DataUri::new(PayloadFormat::Png, b"abc");
        assert_eq!(uri.as_str(), "data:image/png;base64,YWJj");
        assert_eq!(uri.payload(), "YWJj");
        assert_eq!(uri.payload_len(), 4);
        assert_eq!(uri.format(), PayloadFormat::Png);
    }

    #[test]
    fn test_new_jpeg_prefix_and_padding() {
        let uri = DataUri::new(PayloadFormat::Jpeg, b"ab");
        assert_eq!(uri.as_str(), "data:image/jpeg;base64,YWI=");
    }

    #[test]
    fn test_base64_len_matches_engine() {
        for n in 0..50 {
            let bytes = vec![0xAAu8; n];
            assert_eq!(base64_len(n), STANDARD.encode(&bytes).len());
        }
    }

    #[test]
    fn test_parse_round_trip() {
        let original = DataUri::new(PayloadFormat::Jpeg, &[0xFF, 0xD8, 0xFF, 0xD9]);
        let parsed = DataUri::parse(original.as_str()).unwrap();

        assert_eq!(parsed, original);
        assert_eq!(parsed.decode_payload().unwrap(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }

    #[test]
    fn test_parse_accepts_jpg_alias() {
        let parsed = DataUri::parse("data:image/jpg;base64,YWJj").unwrap();
        assert_eq!(parsed.format(), PayloadFormat::Jpeg);
        assert_eq!(parsed.payload(), "YWJj");
        assert_eq!(parsed.payload_len(), 4);
        assert_eq!(parsed.as_str(), "data:image/jpeg;base64,YWJj");
        assert_eq!(parsed, DataUri::new(PayloadFormat::Jpeg, b"abc"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "image/png;base64,YWJj",
            "data:image/png,YWJj",
            "data:image/gif;base64,YWJj",
            "data:image/png;base64,***",
        ] {
            assert!(
                matches!(DataUri::parse(input), Err(EncodeError::MalformedDataUri(_))),
                "{} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_markdown_and_img_tag() {
        let uri = DataUri::new(PayloadFormat::Png, b"abc");
        assert_eq!(
            uri.to_markdown("a [chart]"),
            "![a \\[chart\\]](data:image/png;base64,YWJj)"
        );
        assert_eq!(
            uri.to_img_tag("x\"y"),
            r#"<img src="data:image/png;base64,YWJj" alt="x&quot;y">"#
        );
    }

    #[test]
    fn test_format_display() {
        assert_eq!(PayloadFormat::Png.to_string(), "png");
        assert_eq!(PayloadFormat::Jpeg.mime_type(), "image/jpeg");
    }
}
