//! View layer
//!
//! Everything here only renders records and turns user input into calls on
//! the state controller. Nothing in this module touches the record store.

pub mod admin;
pub mod gallery;
pub mod pages;
pub mod section;

use iced::widget::{container, image, text};
use iced::{ContentFit, Element, Length};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use crate::media::ingest::decode_inline;
use crate::Message;

/// Bytes sampled from each end of a source when fingerprinting it
const FINGERPRINT_SAMPLE: usize = 1024;

/// Decoded handles for inline images, keyed by a fingerprint of the data URL
/// (its length and both ends). Remote references are never fetched and have
/// no handle.
#[derive(Debug, Default)]
pub struct ImageCache {
    handles: HashMap<u64, image::Handle>,
}

impl ImageCache {
    fn key(src: &str) -> u64 {
        let bytes = src.as_bytes();
        let head = &bytes[..bytes.len().min(FINGERPRINT_SAMPLE)];
        let tail = &bytes[bytes.len().saturating_sub(FINGERPRINT_SAMPLE)..];

        let mut hasher = DefaultHasher::new();
        bytes.len().hash(&mut hasher);
        head.hash(&mut hasher);
        tail.hash(&mut hasher);
        hasher.finish()
    }

    /// Decode `src` once if it is an inline image
    pub fn insert(&mut self, src: &str) {
        let key = Self::key(src);
        if self.handles.contains_key(&key) {
            return;
        }
        if let Some(bytes) = decode_inline(src) {
            self.handles.insert(key, image::Handle::from_bytes(bytes));
        }
    }

    pub fn extend<'a>(&mut self, sources: impl IntoIterator<Item = &'a str>) {
        for src in sources {
            self.insert(src);
        }
    }

    pub fn get(&self, src: &str) -> Option<&image::Handle> {
        self.handles.get(&Self::key(src))
    }

    /// Drop handles for images no longer referenced by `live`
    pub fn retain<'a>(&mut self, live: impl IntoIterator<Item = &'a str>) {
        let keep: HashSet<u64> = live.into_iter().map(Self::key).collect();
        self.handles.retain(|key, _| keep.contains(key));
    }
}

/// Show `src` scaled to fill the box, or a labelled placeholder
pub fn picture<'a>(cache: &ImageCache, src: Option<&str>, width: f32, height: f32, label: &'a str) -> Element<'a, Message> {
    match src.and_then(|src| cache.get(src)) {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text(label).size(14))
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .center_x(Length::Fixed(width))
            .center_y(Length::Fixed(height))
            .style(container::rounded_box)
            .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_only_holds_inline_images() {
        let mut cache = ImageCache::default();
        cache.extend(["data:image/png;base64,AAEC", "https://example.com/a.jpg", "data:image/png;base64,AAEC"]);
        assert_eq!(cache.handles.len(), 1);
        assert!(cache.get("data:image/png;base64,AAEC").is_some());
        assert!(cache.get("https://example.com/a.jpg").is_none());
    }

    #[test]
    fn test_retain_drops_unreferenced_images() {
        let mut cache = ImageCache::default();
        cache.extend(["data:image/png;base64,AAEC", "data:image/png;base64,AAED"]);
        cache.retain(["data:image/png;base64,AAED"]);
        assert_eq!(cache.handles.len(), 1);
        assert!(cache.get("data:image/png;base64,AAEC").is_none());
        assert!(cache.get("data:image/png;base64,AAED").is_some());
    }

    #[test]
    fn test_long_sources_with_different_endings_get_different_keys() {
        let body = "A".repeat(8000);
        let a = format!("data:image/jpeg;base64,{}AAAA", body);
        let b = format!("data:image/jpeg;base64,{}AAAB", body);
        assert_ne!(ImageCache::key(&a), ImageCache::key(&b));
        assert_eq!(ImageCache::key(&a), ImageCache::key(&a.clone()));
    }
}
