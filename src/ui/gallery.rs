//! Portfolio grid with category filter chips and a lightbox

use iced::widget::{button, column, container, row, text, Column, Row};
use iced::{Alignment, Element, Length, Theme};
use iced_aw::Wrap;

use super::{picture, ImageCache};
use crate::state::data::{Category, ItemId, PortfolioItem};
use crate::Message;

#[derive(Debug, Clone)]
pub enum GalleryMessage {
    /// `None` shows every category
    FilterChanged(Option<Category>),
    Open(ItemId),
    Next,
    Previous,
    Close,
}

/// Item and photo currently shown full-size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lightbox {
    pub item: ItemId,
    pub index: usize,
}

#[derive(Debug, Default)]
pub struct Gallery {
    filter: Option<Category>,
    lightbox: Option<Lightbox>,
}

impl Gallery {
    pub fn lightbox(&self) -> Option<&Lightbox> {
        self.lightbox.as_ref()
    }

    /// Items matching the active filter, in portfolio order
    pub fn visible<'a>(&self, items: &'a [PortfolioItem]) -> Vec<&'a PortfolioItem> {
        items
            .iter()
            .filter(|item| self.filter.map_or(true, |category| item.category == category))
            .collect()
    }

    pub fn update(&mut self, message: GalleryMessage, items: &[PortfolioItem]) {
        match message {
            GalleryMessage::FilterChanged(filter) => self.filter = filter,
            GalleryMessage::Open(item) => self.lightbox = Some(Lightbox { item, index: 0 }),
            GalleryMessage::Close => self.lightbox = None,
            GalleryMessage::Next => self.step(items, 1),
            GalleryMessage::Previous => self.step(items, -1),
        }
    }

    /// Move through the open item's photos, wrapping at both ends
    fn step(&mut self, items: &[PortfolioItem], delta: isize) {
        let Some(lightbox) = self.lightbox.as_mut() else {
            return;
        };
        let count = items
            .iter()
            .find(|item| item.id == lightbox.item)
            .map_or(0, |item| item.images.len());

        if count == 0 {
            // The item was deleted while open
            self.lightbox = None;
            return;
        }
        let count = count as isize;
        lightbox.index = ((lightbox.index as isize + delta).rem_euclid(count)) as usize;
    }

    pub fn view<'a>(&'a self, items: &'a [PortfolioItem], cache: &ImageCache) -> Element<'a, Message> {
        if let Some(lightbox) = self.lightbox() {
            if let Some(item) = items.iter().find(|item| item.id == lightbox.item) {
                return lightbox_view(item, lightbox.index, cache);
            }
        }

        let mut chips = Row::new().spacing(8);
        let choices = std::iter::once(None).chain(Category::ALL.into_iter().map(Some));
        for choice in choices {
            let label = choice.map_or("All", |category| category.label());
            let style: fn(&Theme, button::Status) -> button::Style =
                if choice == self.filter { button::primary } else { button::secondary };
            let chip = button(text(label).size(13))
                .padding([8, 20])
                .style(style)
                .on_press(Message::Gallery(GalleryMessage::FilterChanged(choice)));
            chips = chips.push(chip);
        }

        let cards: Vec<Element<'a, Message>> = self
            .visible(items)
            .into_iter()
            .map(|item| card(item, cache))
            .collect();

        let grid: Element<'a, Message> = if cards.is_empty() {
            text("No works in this category yet.").size(16).into()
        } else {
            Wrap::with_elements(cards).into()
        };

        column![chips, grid]
            .spacing(32)
            .padding(24)
            .align_x(Alignment::Center)
            .into()
    }
}

/// Badge text for works with more than one photo
fn photo_count_badge(item: &PortfolioItem) -> Option<String> {
    (item.images.len() > 1).then(|| format!("{} PHOTOS", item.images.len()))
}

fn card<'a>(item: &'a PortfolioItem, cache: &ImageCache) -> Element<'a, Message> {
    let mut caption = column![
        text(&item.title).size(16),
        text(format!("{} · {} · {}", item.category, item.location, item.year)).size(12),
    ]
    .spacing(4);
    if let Some(badge) = photo_count_badge(item) {
        caption = caption.push(container(text(badge).size(10)).padding([2, 8]).style(container::rounded_box));
    }

    let body = column![picture(cache, item.cover(), 240.0, 320.0, "No preview"), caption].spacing(10);

    container(
        button(body)
            .style(button::text)
            .on_press(Message::Gallery(GalleryMessage::Open(item.id.clone()))),
    )
    .padding(8)
    .into()
}

fn lightbox_view<'a>(item: &'a PortfolioItem, index: usize, cache: &ImageCache) -> Element<'a, Message> {
    let photo = picture(cache, item.images.get(index).map(String::as_str), 960.0, 640.0, "Remote photo");

    let controls = row![
        button("‹ Prev").on_press(Message::Gallery(GalleryMessage::Previous)),
        text(format!("{} / {}", index + 1, item.images.len())).size(14),
        button("Next ›").on_press(Message::Gallery(GalleryMessage::Next)),
        button("Close").style(button::danger).on_press(Message::Gallery(GalleryMessage::Close)),
    ]
    .spacing(16)
    .align_y(Alignment::Center);

    let details = Column::new()
        .spacing(6)
        .push(text(&item.title).size(28))
        .push(text(format!("Category  {}", item.category)).size(14))
        .push(text(format!("Location  {}", item.location)).size(14))
        .push(text(format!("Year  {}", item.year)).size(14));

    container(column![photo, controls, details].spacing(20).align_x(Alignment::Center))
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(24)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: Category, images: usize) -> PortfolioItem {
        PortfolioItem {
            id: ItemId::from(id),
            images: (0..images).map(|i| format!("img-{i}")).collect(),
            category,
            title: id.to_string(),
            location: String::new(),
            year: String::new(),
        }
    }

    #[test]
    fn test_filter_keeps_order() {
        let items = vec![
            item("a", Category::Food, 1),
            item("b", Category::Film, 1),
            item("c", Category::Food, 1),
        ];
        let mut gallery = Gallery::default();
        assert_eq!(gallery.visible(&items).len(), 3);

        gallery.update(GalleryMessage::FilterChanged(Some(Category::Food)), &items);
        let ids: Vec<&str> = gallery.visible(&items).iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);

        gallery.update(GalleryMessage::FilterChanged(None), &items);
        assert_eq!(gallery.visible(&items).len(), 3);
    }

    #[test]
    fn test_lightbox_wraps_both_ways() {
        let items = vec![item("a", Category::Food, 3)];
        let mut gallery = Gallery::default();
        gallery.update(GalleryMessage::Open(ItemId::from("a")), &items);
        assert_eq!(gallery.lightbox().unwrap().index, 0);

        gallery.update(GalleryMessage::Previous, &items);
        assert_eq!(gallery.lightbox().unwrap().index, 2);

        gallery.update(GalleryMessage::Next, &items);
        gallery.update(GalleryMessage::Next, &items);
        assert_eq!(gallery.lightbox().unwrap().index, 1);

        gallery.update(GalleryMessage::Close, &items);
        assert!(gallery.lightbox().is_none());
    }

    #[test]
    fn test_navigation_without_lightbox_is_ignored() {
        let items = vec![item("a", Category::Food, 3)];
        let mut gallery = Gallery::default();
        gallery.update(GalleryMessage::Next, &items);
        assert!(gallery.lightbox().is_none());
    }

    #[test]
    fn test_badge_only_for_multi_photo_works() {
        assert_eq!(photo_count_badge(&item("a", Category::Food, 1)), None);
        assert_eq!(photo_count_badge(&item("b", Category::Food, 3)), Some("3 PHOTOS".to_string()));
    }

    #[test]
    fn test_lightbox_closes_when_item_disappears() {
        let items = vec![item("a", Category::Food, 2)];
        let mut gallery = Gallery::default();
        gallery.update(GalleryMessage::Open(ItemId::from("a")), &items);
        gallery.update(GalleryMessage::Next, &[]);
        assert!(gallery.lightbox().is_none());
    }
}
