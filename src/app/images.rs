//! Decoded slide images, keyed by resolved path.
//!
//! Slides reference images relative to the first source file.  Files that are
//! missing, not images, or fail to decode are remembered as `None` so they
//! are only probed once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Longest edge kept after decoding; the terminal never needs more.
const MAX_EDGE: u32 = 512;

#[derive(Debug, Default)]
pub struct ImageCache {
    base_dir: PathBuf,
    entries: HashMap<PathBuf, Option<Arc<image::RgbaImage>>>,
}

impl ImageCache {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            entries: HashMap::new(),
        }
    }

    /// Resolve a slide's `src` against the base directory.
    pub fn resolve(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Decoded image for `src`, loading it on first use.
    pub fn get(&mut self, src: &str) -> Option<Arc<image::RgbaImage>> {
        let path = self.resolve(src);
        self.entries
            .entry(path)
            .or_insert_with_key(|path| load(path).map(Arc::new))
            .clone()
    }
}

fn load(path: &Path) -> Option<image::RgbaImage> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "slide image not found");
        return None;
    }

    // Content-based detection, so text mislabelled as `.png` never reaches the
    // decoder.  Without a mime database binaries report as octet-stream, which
    // is still worth a decode attempt.
    let mime = tree_magic_mini::from_filepath(path)?;
    if mime.starts_with("text/") || mime.starts_with("inode/") {
        tracing::warn!(path = %path.display(), mime, "slide is not an image");
        return None;
    }

    match image::open(path) {
        Ok(img) => {
            let img = if img.width() > MAX_EDGE || img.height() > MAX_EDGE {
                img.thumbnail(MAX_EDGE, MAX_EDGE)
            } else {
                img
            };
            Some(img.to_rgba8())
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "failed to decode slide: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_non_image_files_are_cached_as_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "plain text, not pixels\n").unwrap();

        let mut cache = ImageCache::new(dir.path().to_path_buf());
        assert!(cache.get("missing.png").is_none());
        assert!(cache.get("notes.txt").is_none());
        assert_eq!(cache.entries.len(), 2);
    }

    #[test]
    fn decodes_real_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let mut cache = ImageCache::new(dir.path().to_path_buf());
        let img = cache.get("dot.png").unwrap();
        assert_eq!((img.width(), img.height()), (4, 2));
    }
}
