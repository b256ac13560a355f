use serde::{Deserialize, Serialize};

/// A comic as fetched from the external source, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceComic {
    pub id: u32,
    pub url: String,
    pub description: String,
}

/// Raw `info.0.json` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XkcdInfo {
    pub num: u32,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub safe_title: String,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub alt: String,
}

impl From<XkcdInfo> for SourceComic {
    fn from(info: XkcdInfo) -> Self {
        let description = [
            info.title.as_str(),
            info.safe_title.as_str(),
            info.transcript.as_str(),
            info.alt.as_str(),
        ]
        .join(" ");

        Self {
            id: info.num,
            url: info.img,
            description,
        }
    }
}
