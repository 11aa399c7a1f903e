/// Where a new entry's poster comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PosterSource {
    /// No poster; the presentation layer shows its placeholder.
    None,
    /// Caller-supplied image URL, stored as-is.
    Url(String),
    /// Raw image bytes to upload to object storage before the row insert.
    Upload {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl PosterSource {
    /// From a free-form URL field: blank input means no poster.
    pub fn from_url_field(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            PosterSource::None
        } else {
            PosterSource::Url(trimmed.to_string())
        }
    }
}
