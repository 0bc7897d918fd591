//! Compression format detection and decoding.

pub mod compression;
pub mod decode;
pub mod detect;

pub use compression::CompressionFormat;
pub use decode::DecodeError;
pub use decode::DecodedContent;
pub use detect::DetectError;
