use std::fmt;
use std::fmt::Formatter;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{BeboError, Result};

pub static METADATA_MARKER: &str = "DynamicValues ";

/// One entry of an album's `PhotoList`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhotoRecord {
    /// The large rendition; the full-size one 404s.
    #[serde(rename = "large_file_name")]
    pub locator: String,
    #[serde(rename = "create_dttm")]
    pub created: String,
    #[serde(rename = "caption_tx", default)]
    pub caption: Option<String>,
}

impl fmt::Display for PhotoRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(locator={}, created={})", self.locator, self.created)
    }
}

/// `DynamicValues = {...};` as embedded in an album page.
#[derive(Debug, Deserialize)]
pub struct AlbumMetadata {
    #[serde(rename = "DynamicValues")]
    dynamic_values: DynamicValues,
}

#[derive(Debug, Default, Deserialize)]
struct DynamicValues {
    #[serde(rename = "Photos", default)]
    photos: Option<Photos>,
}

#[derive(Debug, Default, Deserialize)]
struct Photos {
    #[serde(rename = "PhotoList", default)]
    photo_list: Option<Vec<PhotoRecord>>,
}

fn trailing_terminator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r";\s*$").unwrap())
}

impl AlbumMetadata {
    /// Turns the script statement into a JSON object and parses it.
    pub fn from_script(script: &str) -> Result<AlbumMetadata> {
        let wrapped = script.replace("DynamicValues = ", "{ \"DynamicValues\" : ");
        let wrapped = trailing_terminator().replace(&wrapped, "}");

        json::from_str(&wrapped)
            .map_err(|err| BeboError::Parse(format!("album metadata: {}", err)))
    }

    /// `None` when the album carries no photo list at all.
    pub fn photos(&self) -> Option<&[PhotoRecord]> {
        self.dynamic_values
            .photos
            .as_ref()
            .and_then(|p| p.photo_list.as_deref())
    }
}
