//! Saving the finished mosaic.

use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur when writing the mosaic.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create output directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Destination for the assembled canvas.
pub trait MosaicWriter: Send + Sync {
    /// Persists the image at `path`.
    fn write(&self, image: &RgbaImage, path: &Path) -> Result<(), WriteError>;
}

/// Writes the canvas as an image file, picking the format from the extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileWriter;

impl MosaicWriter for ImageFileWriter {
    fn write(&self, image: &RgbaImage, path: &Path) -> Result<(), WriteError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| WriteError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        image.save(path).map_err(|source| WriteError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Mosaic written"
        );
        Ok(())
    }
}
