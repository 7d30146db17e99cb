use crate::{Error, Operation};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

const DEFAULT_MIME: &str = "image/jpeg";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionLength {
    Short,
    #[default]
    Normal,
    Long,
}

impl CaptionLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionLength::Short => "short",
            CaptionLength::Normal => "normal",
            CaptionLength::Long => "long",
        }
    }
}

impl Display for CaptionLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CaptionLength {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(CaptionLength::Short),
            "normal" => Ok(CaptionLength::Normal),
            "long" => Ok(CaptionLength::Long),
            _ => Err(Error::InvalidCaptionLength(s.to_string())),
        }
    }
}

/// An image embedded as `data:<mime>;base64,<bytes>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime: String,
    data: String,
}

impl DataUrl {
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> DataUrl {
        DataUrl {
            mime: mime.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn from_path_bytes(path: &Path, bytes: &[u8]) -> DataUrl {
        DataUrl::from_bytes(mime_for_path(path), bytes)
    }

}

impl Display for DataUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, self.data)
    }
}

/// MIME type by file extension; unknown extensions are sent as JPEG.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => DEFAULT_MIME,
    }
}

/// A request for one operation, before it is flattened into the wire map.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Caption { image: DataUrl, length: CaptionLength },
    Query { image: DataUrl, question: String },
    Point { image: DataUrl, object: String },
    Detect { image: DataUrl, object: String },
}

impl Payload {
    pub fn caption(image: DataUrl, length: CaptionLength) -> Self {
        Payload::Caption { image, length }
    }

    pub fn query(image: DataUrl, question: &str) -> Self {
        Payload::Query {
            image,
            question: question.trim().to_string(),
        }
    }

    pub fn point(image: DataUrl, object: &str) -> Self {
        Payload::Point {
            image,
            object: object.trim().to_string(),
        }
    }

    pub fn detect(image: DataUrl, object: &str) -> Self {
        Payload::Detect {
            image,
            object: object.trim().to_string(),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Payload::Caption { .. } => Operation::Caption,
            Payload::Query { .. } => Operation::Query,
            Payload::Point { .. } => Operation::Point,
            Payload::Detect { .. } => Operation::Detect,
        }
    }

    pub fn image(&self) -> &DataUrl {
        match self {
            Payload::Caption { image, .. }
            | Payload::Query { image, .. }
            | Payload::Point { image, .. }
            | Payload::Detect { image, .. } => image,
        }
    }

    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("image_url".into(), Value::String(self.image().to_string()));
        match self {
            Payload::Caption { length, .. } => {
                map.insert("length".into(), Value::String(length.to_string()));
            }
            Payload::Query { question, .. } => {
                map.insert("question".into(), Value::String(question));
            }
            Payload::Point { object, .. } | Payload::Detect { object, .. } => {
                map.insert("object".into(), Value::String(object));
            }
        }
        map
    }
}
