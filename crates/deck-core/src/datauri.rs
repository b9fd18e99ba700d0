//! `data:` URIs for images embedded directly in slides.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// A decoded `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Parse a base64 data URI. Non-base64 (percent-encoded) URIs are rejected.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidDataUri("missing `data:` scheme".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidDataUri("missing `,` separator".into()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::InvalidDataUri(format!("unsupported encoding in `{header}`")))?;
        let mime = if mime.is_empty() { "text/plain" } else { mime };
        let bytes = STANDARD.decode(payload.trim())?;
        Ok(Self::new(mime, bytes))
    }

    /// Encode back to a `data:` URI string.
    pub fn encode(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// Guess the MIME type of an embedded file from its extension.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    Some(match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "md" => "text/markdown",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_encode() {
        let uri = DataUri::new("image/png", vec![0x89, b'P', b'N', b'G']);
        let text = uri.encode();
        assert!(text.starts_with("data:image/png;base64,"));
        assert_eq!(DataUri::parse(&text).unwrap(), uri);
        assert!(uri.is_image());
    }

    #[test]
    fn rejects_non_data_uris() {
        assert!(matches!(
            DataUri::parse("https://example.com/a.png"),
            Err(Error::InvalidDataUri(_))
        ));
        assert!(matches!(
            DataUri::parse("data:image/png,%89PNG"),
            Err(Error::InvalidDataUri(_))
        ));
        assert!(matches!(
            DataUri::parse("data:image/png;base64,@@@"),
            Err(Error::Base64(_))
        ));
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(mime_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("pptx"), None);
    }
}
