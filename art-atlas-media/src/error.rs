/// Errors that can occur while transcoding or storing images.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Could not encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Image store error: {0}")]
    Store(String),
}

impl MediaError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// True when the input bytes were not a decodable raster.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
