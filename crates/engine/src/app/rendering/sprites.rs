use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteKeyError {
    #[error("sprite key must not be empty")]
    Empty,
    #[error("sprite key must not start with '/'")]
    LeadingSlash,
    #[error("sprite key must not contain '\\\\'")]
    Backslash,
    #[error("sprite key must not contain '..'")]
    ParentTraversal,
    #[error("sprite key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

pub(crate) fn validate_sprite_key(key: &str) -> Result<(), SpriteKeyError> {
    if key.is_empty() {
        return Err(SpriteKeyError::Empty);
    }
    if key.starts_with('/') {
        return Err(SpriteKeyError::LeadingSlash);
    }
    if key.contains('\\') {
        return Err(SpriteKeyError::Backslash);
    }
    if key.contains("..") {
        return Err(SpriteKeyError::ParentTraversal);
    }
    match key
        .chars()
        .find(|ch| !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '/' | '-')))
    {
        Some(character) => Err(SpriteKeyError::InvalidCharacter { character }),
        None => Ok(()),
    }
}

#[derive(Debug)]
pub(crate) struct LoadedSprite {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba: Vec<u8>,
}

/// Lazily decodes `<sprites_dir>/<key>.png`. Failures are cached as `None` so a missing file is
/// probed and reported once.
#[derive(Debug)]
pub struct SpriteCache {
    sprites_dir: PathBuf,
    loaded: HashMap<String, Option<LoadedSprite>>,
    warned_keys: HashSet<String>,
}

impl SpriteCache {
    pub fn new(sprites_dir: PathBuf) -> Self {
        Self {
            sprites_dir,
            loaded: HashMap::new(),
            warned_keys: HashSet::new(),
        }
    }

    pub fn sprites_dir(&self) -> &Path {
        &self.sprites_dir
    }

    pub fn is_loaded(&mut self, key: &str) -> bool {
        self.resolve(key).is_some()
    }

    pub(crate) fn resolve(&mut self, key: &str) -> Option<&LoadedSprite> {
        if !self.loaded.contains_key(key) {
            let sprite = self.load(key);
            self.loaded.insert(key.to_string(), sprite);
        }
        self.loaded.get(key).and_then(Option::as_ref)
    }

    fn load(&mut self, key: &str) -> Option<LoadedSprite> {
        if let Err(error) = validate_sprite_key(key) {
            self.warn_once(key, None, &format!("invalid_key:{error}"));
            return None;
        }
        let path = self.sprites_dir.join(format!("{key}.png"));
        match load_sprite_rgba(&path) {
            Ok(sprite) => Some(sprite),
            Err(reason) => {
                self.warn_once(key, Some(&path), &reason);
                None
            }
        }
    }

    fn warn_once(&mut self, key: &str, path: Option<&Path>, reason: &str) {
        if !self.warned_keys.insert(key.to_string()) {
            return;
        }
        let path_display = path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<unresolved>".to_string());
        warn!(
            sprite_key = key,
            path = %path_display,
            reason = reason,
            "renderer_sprite_load_failed_using_placeholder"
        );
    }
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let image = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?
        .to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn accepts_game_sprite_keys() {
        for key in ["player", "minion", "boss", "cannonball", "fx/explosion-1"] {
            assert!(validate_sprite_key(key).is_ok(), "key={key}");
        }
    }

    #[test]
    fn rejects_unsafe_keys() {
        assert_eq!(validate_sprite_key(""), Err(SpriteKeyError::Empty));
        assert_eq!(validate_sprite_key("/boss"), Err(SpriteKeyError::LeadingSlash));
        assert_eq!(validate_sprite_key(r"a\b"), Err(SpriteKeyError::Backslash));
        assert_eq!(validate_sprite_key("a/../b"), Err(SpriteKeyError::ParentTraversal));
        assert_eq!(
            validate_sprite_key("Boss"),
            Err(SpriteKeyError::InvalidCharacter { character: 'B' })
        );
    }

    #[test]
    fn loads_png_from_sprites_dir() {
        let temp = TempDir::new().expect("temp dir");
        let mut image = RgbaImage::new(2, 3);
        image.put_pixel(1, 2, Rgba([10, 20, 30, 255]));
        image
            .save(temp.path().join("player.png"))
            .expect("write png");

        let mut cache = SpriteCache::new(temp.path().to_path_buf());
        let sprite = cache.resolve("player").expect("sprite");
        assert_eq!((sprite.width, sprite.height), (2, 3));
        assert_eq!(sprite.rgba.len(), 2 * 3 * 4);
        assert_eq!(&sprite.rgba[(2 * 2 + 1) * 4..(2 * 2 + 1) * 4 + 4], &[10, 20, 30, 255]);
    }

    #[test]
    fn missing_sprite_is_cached_as_absent() {
        let temp = TempDir::new().expect("temp dir");
        let mut cache = SpriteCache::new(temp.path().to_path_buf());

        assert!(!cache.is_loaded("boss"));
        RgbaImage::new(1, 1)
            .save(temp.path().join("boss.png"))
            .expect("write png");
        assert!(!cache.is_loaded("boss"));
        assert_eq!(cache.warned_keys.len(), 1);
    }
}
