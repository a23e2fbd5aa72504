//! Card format table and format selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One representation of the business card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardFormat {
    Json,
    Html,
    Vcard,
    Xml,
    Yaml,
    Qrcode,
    Jpeg,
    Wav,
    Help,
    Default,
}

/// How a representation's body is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Fetched and decoded as UTF-8.
    Text,
    /// Fetched and passed through byte for byte.
    Binary,
    /// Binary audio; served uncompressed and seekable.
    Audio,
    /// Built locally, no fetch.
    Synthesized,
}

/// Static descriptor for a [`CardFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Representation {
    pub format: CardFormat,
    /// Origin key, relative to the card origin base.
    pub key: Option<&'static str>,
    pub content_type: &'static str,
    pub kind: BodyKind,
}

const fn repr(
    format: CardFormat,
    key: Option<&'static str>,
    content_type: &'static str,
    kind: BodyKind,
) -> Representation {
    Representation {
        format,
        key,
        content_type,
        kind,
    }
}

pub const FORMAT_TABLE: [Representation; 10] = [
    repr(CardFormat::Json, Some("card.json"), "application/json", BodyKind::Text),
    repr(CardFormat::Html, Some("card.html"), "text/html", BodyKind::Text),
    repr(CardFormat::Vcard, Some("card.vcf"), "text/vcard", BodyKind::Text),
    repr(CardFormat::Xml, Some("card.xml"), "application/xml", BodyKind::Text),
    repr(CardFormat::Yaml, Some("card.yaml"), "application/x-yaml", BodyKind::Text),
    repr(CardFormat::Qrcode, Some("card.svg"), "image/svg+xml", BodyKind::Text),
    repr(CardFormat::Jpeg, Some("card.jpg"), "image/jpeg", BodyKind::Binary),
    repr(CardFormat::Wav, Some("card.wav"), "audio/wav", BodyKind::Audio),
    repr(CardFormat::Help, None, "text/plain", BodyKind::Synthesized),
    repr(CardFormat::Default, Some("card.txt"), "text/plain", BodyKind::Text),
];

/// `Accept` substrings in detection order. First match wins.
const ACCEPT_PRIORITY: [(&[&str], CardFormat); 8] = [
    (&["application/json"], CardFormat::Json),
    (&["text/html"], CardFormat::Html),
    (&["text/vcard", "text/x-vcard"], CardFormat::Vcard),
    (&["application/xml"], CardFormat::Xml),
    (&["application/x-yaml", "text/yaml"], CardFormat::Yaml),
    (&["image/svg+xml"], CardFormat::Qrcode),
    (&["image/jpeg"], CardFormat::Jpeg),
    (&["audio/wav"], CardFormat::Wav),
];

impl CardFormat {
    pub const ALL: [CardFormat; 10] = [
        CardFormat::Json,
        CardFormat::Html,
        CardFormat::Vcard,
        CardFormat::Xml,
        CardFormat::Yaml,
        CardFormat::Qrcode,
        CardFormat::Jpeg,
        CardFormat::Wav,
        CardFormat::Help,
        CardFormat::Default,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CardFormat::Json => "json",
            CardFormat::Html => "html",
            CardFormat::Vcard => "vcard",
            CardFormat::Xml => "xml",
            CardFormat::Yaml => "yaml",
            CardFormat::Qrcode => "qrcode",
            CardFormat::Jpeg => "jpeg",
            CardFormat::Wav => "wav",
            CardFormat::Help => "help",
            CardFormat::Default => "default",
        }
    }

    /// Exact, case-sensitive lookup by table key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn representation(self) -> &'static Representation {
        // FORMAT_TABLE is ordered like ALL.
        &FORMAT_TABLE[self as usize]
    }
}

impl fmt::Display for CardFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// First `format` value in a raw query string, if non-empty.
pub fn format_param(query: Option<&str>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "format")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Pick a format: known `format` parameter, then `Accept`, then default.
pub fn determine_format(format_param: Option<&str>, accept: &str) -> CardFormat {
    if let Some(format) = format_param.and_then(CardFormat::from_name) {
        return format;
    }

    ACCEPT_PRIORITY
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| accept.contains(needle)))
        .map(|(_, format)| *format)
        .unwrap_or(CardFormat::Default)
}
