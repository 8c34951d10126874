use std::path::PathBuf;

use thiserror::Error;

use crate::{maze::Marker, palette::Rgba};

/// Everything that can go wrong between reading a maze and writing it back out.
#[derive(Error, Debug)]
pub enum MazeError {
    #[error("could not read {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("could not write {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The image has more distinct colors than an indexed palette can hold.
    #[error("image uses {count} colors, at most 256 can be indexed")]
    TooManyColors { count: usize },

    /// A semantic color had to be added to a palette that is already full.
    #[error("palette is full, cannot add color {color}")]
    PaletteFull { color: Rgba },

    #[error("pixel buffer of length {len} does not split into rows of {stride}")]
    InvalidDimensions { len: usize, stride: usize },

    #[error("pixel index {0} has no palette entry")]
    InvalidIndex(u8),

    #[error("maze is missing {0} pixel")]
    MissingMarker(Marker),

    #[error("could not read color scheme {}: {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid color scheme {}: {source}", .path.display())]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },
}
