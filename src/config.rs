//! Application settings
//!
//! Everything here is compiled in. The only thing derived from the
//! environment is the location of the archive database.

use std::path::PathBuf;
use std::time::Duration;

use crate::media::ingest::ImageBounds;

/// Password of the admin gate. A toy check, not a security boundary.
pub const ADMIN_PASSWORD: &str = "1111";

/// Maximum number of photos attached to one portfolio item
pub const MAX_IMAGES_PER_ITEM: usize = 50;

/// JPEG quality used when re-encoding ingested images
pub const JPEG_QUALITY: f32 = 0.85;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite file holding the three records
    pub db_path: PathBuf,
    /// How long to wait on a locked database before giving up
    pub busy_timeout: Duration,
    pub portfolio_bounds: ImageBounds,
    pub profile_bounds: ImageBounds,
    pub hero_bounds: ImageBounds,
    pub jpeg_quality: f32,
    pub max_images_per_item: usize,
    pub admin_password: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: Self::default_db_path(),
            busy_timeout: Duration::from_millis(2_000),
            portfolio_bounds: ImageBounds::new(2000, 1200),
            profile_bounds: ImageBounds::new(1000, 1250),
            hero_bounds: ImageBounds::new(2400, 1600),
            jpeg_quality: JPEG_QUALITY,
            max_images_per_item: MAX_IMAGES_PER_ITEM,
            admin_password: ADMIN_PASSWORD.to_string(),
        }
    }
}

impl AppConfig {
    /// Get the path where the archive should be stored
    ///
    /// - Linux: ~/.local/share/photo-archive/photo_archive.db
    /// - macOS: ~/Library/Application Support/photo-archive/photo_archive.db
    /// - Windows: %APPDATA%\photo-archive\photo_archive.db
    fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("photo-archive");
        path.push("photo_archive.db");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_and_limits() {
        let config = AppConfig::default();
        assert!(config.db_path.ends_with("photo-archive/photo_archive.db"));
        assert_eq!(config.max_images_per_item, 50);
        assert_eq!(config.portfolio_bounds, ImageBounds::new(2000, 1200));
        assert!((config.jpeg_quality - 0.85).abs() < f32::EPSILON);
        assert_eq!(config.admin_password, "1111");
    }
}
