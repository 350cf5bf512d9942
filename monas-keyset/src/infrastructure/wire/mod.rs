pub mod binary;
pub mod text;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::application_service::keyset_service::KeysetWireCodec;

pub use binary::BinaryWireCodec;
pub use text::TextWireCodec;

static BINARY: BinaryWireCodec = BinaryWireCodec;
static TEXT: TextWireCodec = TextWireCodec;

/// Persisted container format, chosen explicitly and never sniffed from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WireFormat {
    Binary,
    #[default]
    Text,
}

impl WireFormat {
    pub fn codec(self) -> &'static dyn KeysetWireCodec {
        match self {
            WireFormat::Binary => &BINARY,
            WireFormat::Text => &TEXT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown keyset format {0:?}, expected \"json\" or \"binary\"")]
pub struct UnknownFormat(pub String);

impl FromStr for WireFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" | "text" => Ok(WireFormat::Text),
            "binary" => Ok(WireFormat::Binary),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for WireFormat {
    type Error = UnknownFormat;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WireFormat> for String {
    fn from(format: WireFormat) -> Self {
        format.to_string()
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireFormat::Binary => f.write_str("binary"),
            WireFormat::Text => f.write_str("json"),
        }
    }
}
