pub mod error;
pub mod resize;
pub mod store;
pub mod transcode;

pub use error::MediaError;
pub use resize::{ResizeEvent, ResizeSummary, resize_directory, resize_file};
pub use store::{
    FsImageStore, ImageStore, MemoryImageStore, RECOGNIZED_EXTENSIONS, StoredImage, atomic_write,
};
pub use transcode::{CANONICAL_EXTENSION, TranscodeBudget, Transcoded, prescale_target, transcode};
