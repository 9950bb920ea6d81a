//! Domain records persisted by the application
//!
//! These structs represent the data model that flows between
//! the record store and the UI layer. Field names are stored in
//! camelCase so an archive keeps the same JSON layout across builds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display category of a portfolio item (closed set)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Landscape,
    Food,
    People,
    Performance,
    Film,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 5] = [
        Category::Landscape,
        Category::Food,
        Category::People,
        Category::Performance,
        Category::Film,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Landscape => "Landscape",
            Category::Food => "Food",
            Category::People => "People",
            Category::Performance => "Performance",
            Category::Film => "Film",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque portfolio item identifier
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single work in the portfolio
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: ItemId,
    /// Inline-encoded images in display order; the first one is the cover
    pub images: Vec<String>,
    pub category: Category,
    pub title: String,
    pub location: String,
    /// Free-form text, not validated
    pub year: String,
}

impl PortfolioItem {
    /// Cover image (first in display order)
    pub fn cover(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Profile shown in the About section
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    pub profile_image: String,
    pub name: String,
    pub philosophy_title: String,
    /// May contain line breaks
    pub philosophy_description: String,
    /// Kept as entered; duplicates and empty tags are not filtered
    pub keywords: Vec<String>,
}

/// Site-wide hero settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub hero_image: String,
    /// May contain line breaks
    pub hero_title: String,
    /// May contain line breaks
    pub hero_subtitle: String,
}

/// Keys of the three persisted records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Portfolio,
    About,
    Config,
}

impl RecordKey {
    pub const ALL: [RecordKey; 3] = [RecordKey::Portfolio, RecordKey::About, RecordKey::Config];

    /// Key under which the record is stored
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKey::Portfolio => "record_portfolio",
            RecordKey::About => "record_about",
            RecordKey::Config => "record_config",
        }
    }

    /// Human readable name for status messages
    pub fn label(&self) -> &'static str {
        match self {
            RecordKey::Portfolio => "portfolio",
            RecordKey::About => "about page",
            RecordKey::Config => "site settings",
        }
    }

    /// Dense index, used for per-key slots
    pub fn index(&self) -> usize {
        match self {
            RecordKey::Portfolio => 0,
            RecordKey::About => 1,
            RecordKey::Config => 2,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged union of everything the store holds
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Portfolio(Vec<PortfolioItem>),
    About(AboutContent),
    Config(SiteConfig),
}

impl Record {
    pub fn key(&self) -> RecordKey {
        match self {
            Record::Portfolio(_) => RecordKey::Portfolio,
            Record::About(_) => RecordKey::About,
            Record::Config(_) => RecordKey::Config,
        }
    }

    /// Compiled-in default for a key, used when nothing is stored yet
    pub fn default_for(key: RecordKey) -> Self {
        match key {
            RecordKey::Portfolio => Record::Portfolio(default_portfolio()),
            RecordKey::About => Record::About(AboutContent::default()),
            RecordKey::Config => Record::Config(SiteConfig::default()),
        }
    }
}

fn stock(photo: &str, width: u32) -> String {
    format!("https://images.unsplash.com/{photo}?q=80&w={width}&auto=format&fit=crop")
}

fn sample(id: &str, photo: &str, category: Category, title: &str, location: &str, year: &str) -> PortfolioItem {
    PortfolioItem {
        id: ItemId::from(id),
        images: vec![stock(photo, 1200)],
        category,
        title: title.to_string(),
        location: location.to_string(),
        year: year.to_string(),
    }
}

/// Sample works shown on a fresh archive
pub fn default_portfolio() -> Vec<PortfolioItem> {
    vec![
        sample("1", "photo-1590615370581-265ae19a053b", Category::Landscape, "은평의 오후", "은평 한옥마을", "2024"),
        sample("2", "photo-1490818387583-1baba5e638af", Category::Food, "정갈한 한 상", "전주", "2024"),
        sample("3", "photo-1534528741775-53994a69daeb", Category::People, "도시의 시선", "서울", "2024"),
        sample("4", "photo-1470229722913-7c0e2dbbafd3", Category::Performance, "조명 아래의 열기", "홍대 공연장", "2023"),
        sample("5", "photo-1554048612-b6a482bc67e5", Category::Film, "오래된 기억의 입자", "강릉 바다", "2022"),
    ]
}

impl Default for AboutContent {
    fn default() -> Self {
        Self {
            profile_image: stock("photo-1544005313-94ddf0286df2", 800),
            name: "mcthejo".to_string(),
            philosophy_title: "일상의 온도를\n기록합니다".to_string(),
            philosophy_description: "억지스러운 포즈보다는 자연스러운 움직임을 담습니다.\n편안한 산책을 하며 이야기를 나누듯 촬영합니다.".to_string(),
            keywords: vec![
                "자연스러움".to_string(),
                "필름감성".to_string(),
                "산책스냅".to_string(),
                "일상기록".to_string(),
            ],
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            hero_image: stock("photo-1542353436-312f0295493c", 2000),
            hero_title: "당신의 가장 자연스러운\n순간을 기록합니다".to_string(),
            hero_subtitle: "mcthejo 사진일기\n풍경, 음식, 인물, 공연 그리고 필름".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_category() {
        let items = default_portfolio();
        for category in Category::ALL {
            assert!(items.iter().any(|item| item.category == category));
        }
        assert!(items.iter().all(|item| !item.images.is_empty() && !item.title.is_empty()));
    }

    #[test]
    fn test_stored_layout_is_camel_case() {
        let json = serde_json::to_value(SiteConfig::default()).unwrap();
        assert!(json.get("heroImage").is_some());
        assert!(json.get("heroSubtitle").is_some());

        let json = serde_json::to_value(&default_portfolio()[0]).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["category"], "Landscape");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ItemId::generate(), ItemId::generate());
    }

    #[test]
    fn test_record_keys() {
        assert_eq!(Record::default_for(RecordKey::About).key(), RecordKey::About);
        assert_eq!(RecordKey::Config.as_str(), "record_config");
        let indices: Vec<usize> = RecordKey::ALL.iter().map(RecordKey::index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
