use std::fmt;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Reference to the invoice logo.
///
/// `Session` is an opaque handle handed out by the environment (an object
/// URL, a temp path); it is stored verbatim and may dangle after a restart.
/// `Embedded` carries the image bytes and survives any reload.
///
/// On the wire a session handle is a bare JSON string (what the browser app
/// writes) and an embedded logo is an object `{"mediaType", "data"}` with
/// base64 data, so the two never collide whatever the handle text is.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LogoWire", into = "LogoWire")]
pub enum LogoRef {
    Session(String),
    Embedded { media_type: String, data: Vec<u8> },
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LogoWire {
    Session(String),
    #[serde(rename_all = "camelCase")]
    Embedded { media_type: String, data: String },
}

impl From<LogoRef> for LogoWire {
    fn from(logo: LogoRef) -> Self {
        match logo {
            LogoRef::Session(handle) => Self::Session(handle),
            LogoRef::Embedded { media_type, data } => Self::Embedded {
                media_type,
                data: general_purpose::STANDARD.encode(data),
            },
        }
    }
}

impl TryFrom<LogoWire> for LogoRef {
    type Error = String;

    fn try_from(wire: LogoWire) -> std::result::Result<Self, String> {
        match wire {
            LogoWire::Session(handle) => Ok(Self::Session(handle)),
            LogoWire::Embedded { media_type, data } => {
                let data = general_purpose::STANDARD
                    .decode(data)
                    .map_err(|e| format!("logo data: {e}"))?;
                Ok(Self::Embedded { media_type, data })
            }
        }
    }
}

impl LogoRef {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Self::Embedded {
            media_type: media_type_for(path).to_string(),
            data,
        })
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, Self::Embedded { .. })
    }
}

fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

impl fmt::Debug for LogoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(h) => f.debug_tuple("Session").field(h).finish(),
            Self::Embedded { media_type, data } => f
                .debug_struct("Embedded")
                .field("media_type", media_type)
                .field("len", &data.len())
                .finish(),
        }
    }
}
