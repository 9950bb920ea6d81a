//! Admin panel: password gate, portfolio item editor, About and Config editors
//!
//! All edits go through the state controller. Each accepted edit yields a
//! persist job that the application runs in the background.

use chrono::Datelike;
use iced::widget::{button, column, container, pick_list, row, scrollable, text, text_editor, text_input, Column, Row};
use iced::{Alignment, Element, Length};
use tracing::{debug, info};

use super::{picture, ImageCache};
use crate::error::ValidationError;
use crate::media::ingest::check_batch_capacity;
use crate::state::auth::AdminGate;
use crate::state::controller::{AppState, Persist};
use crate::state::data::{AboutContent, Category, ItemId, PortfolioItem, RecordKey, SiteConfig};
use crate::Message;

/// Field an ingested image batch is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    /// Appended to the item being edited
    Portfolio,
    /// Replaces the About profile photo
    Profile,
    /// Replaces the home hero photo
    Hero,
}

#[derive(Debug, Clone)]
pub enum AdminMessage {
    PasswordChanged(String),
    Login,
    SignOut,
    PickImages(ImageTarget),
    RemoveImage(usize),
    CategorySelected(Category),
    TitleChanged(String),
    LocationChanged(String),
    YearChanged(String),
    SubmitItem,
    CancelEdit,
    EditItem(ItemId),
    RequestDelete(ItemId),
    ConfirmDelete,
    CancelDelete,
    NameChanged(String),
    PhilosophyTitleEdited(text_editor::Action),
    PhilosophyEdited(text_editor::Action),
    KeywordsChanged(String),
    SaveAbout,
    HeroTitleEdited(text_editor::Action),
    HeroSubtitleEdited(text_editor::Action),
    SaveConfig,
}

/// A picked batch on its way through ingestion.
///
/// Holds its share of the per-item photo cap until it comes back, and
/// remembers which editor it was picked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestTicket {
    target: ImageTarget,
    form: u64,
    count: usize,
}

/// What the application has to do after an admin update
#[derive(Debug)]
pub enum Effect {
    None,
    /// Show a message in the status line
    Notice(String),
    /// Run this write in the background
    Persist(Persist),
    /// Open the file dialog for this field
    PickImages(ImageTarget),
}

/// Form state of the portfolio item editor
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub images: Vec<String>,
    pub category: Category,
    pub title: String,
    pub location: String,
    pub year: String,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            category: Category::Landscape,
            title: String::new(),
            location: String::new(),
            year: chrono::Local::now().year().to_string(),
        }
    }
}

impl ItemDraft {
    fn from_item(item: &PortfolioItem) -> Self {
        Self {
            images: item.images.clone(),
            category: item.category,
            title: item.title.clone(),
            location: item.location.clone(),
            year: item.year.clone(),
        }
    }

    fn to_item(&self, id: ItemId) -> PortfolioItem {
        PortfolioItem {
            id,
            images: self.images.clone(),
            category: self.category,
            title: self.title.clone(),
            location: self.location.clone(),
            year: self.year.clone(),
        }
    }
}

/// Split a comma separated keyword list. Empty entries are kept.
pub fn parse_keywords(input: &str) -> Vec<String> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    input.split(',').map(|tag| tag.trim().to_string()).collect()
}

/// text_editor may report a trailing newline for the last line
fn editor_text(content: &text_editor::Content) -> String {
    content.text().trim_end_matches('\n').to_string()
}

pub struct AdminPanel {
    gate: AdminGate,
    password: String,
    draft: ItemDraft,
    editing: Option<ItemId>,
    pending_delete: Option<ItemId>,
    profile_image: String,
    name: String,
    philosophy_title: text_editor::Content,
    philosophy: text_editor::Content,
    keywords: String,
    hero_image: String,
    hero_title: text_editor::Content,
    hero_subtitle: text_editor::Content,
    /// Bumped whenever the item editor starts over
    draft_form: u64,
    /// Bumped whenever the About and Config editors are refilled
    site_form: u64,
    /// Portfolio photos picked for the current draft and still in ingestion
    pending_images: usize,
}

impl AdminPanel {
    pub fn new(gate: AdminGate) -> Self {
        Self {
            gate,
            password: String::new(),
            draft: ItemDraft::default(),
            editing: None,
            pending_delete: None,
            profile_image: String::new(),
            name: String::new(),
            philosophy_title: text_editor::Content::new(),
            philosophy: text_editor::Content::new(),
            keywords: String::new(),
            hero_image: String::new(),
            hero_title: text_editor::Content::new(),
            hero_subtitle: text_editor::Content::new(),
            draft_form: 0,
            site_form: 0,
            pending_images: 0,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.gate.is_authenticated()
    }

    /// Every image currently held by the editors
    pub fn editor_images(&self) -> impl Iterator<Item = &str> {
        self.draft
            .images
            .iter()
            .map(String::as_str)
            .chain([self.profile_image.as_str(), self.hero_image.as_str()])
    }

    /// Refill the About and Config editors from the live records
    fn load_site_copy(&mut self, about: &AboutContent, config: &SiteConfig) {
        self.profile_image = about.profile_image.clone();
        self.name = about.name.clone();
        self.philosophy_title = text_editor::Content::with_text(&about.philosophy_title);
        self.philosophy = text_editor::Content::with_text(&about.philosophy_description);
        self.keywords = about.keywords.join(", ");
        self.hero_image = config.hero_image.clone();
        self.hero_title = text_editor::Content::with_text(&config.hero_title);
        self.hero_subtitle = text_editor::Content::with_text(&config.hero_subtitle);
        self.site_form += 1;
    }

    /// Start the item editor over; batches still in flight no longer belong to it
    fn restart_draft(&mut self, draft: ItemDraft, editing: Option<ItemId>) {
        self.draft = draft;
        self.editing = editing;
        self.draft_form += 1;
        self.pending_images = 0;
    }

    fn reset_form(&mut self) {
        self.restart_draft(ItemDraft::default(), None);
    }

    fn form_of(&self, target: ImageTarget) -> u64 {
        match target {
            ImageTarget::Portfolio => self.draft_form,
            ImageTarget::Profile | ImageTarget::Hero => self.site_form,
        }
    }

    /// Check that a picked batch fits before any file is read, counting
    /// batches that are still being ingested, and hold its place.
    pub fn reserve_images(&mut self, target: ImageTarget, incoming: usize, cap: usize) -> Result<IngestTicket, ValidationError> {
        if target == ImageTarget::Portfolio {
            check_batch_capacity(self.draft.images.len() + self.pending_images, incoming, cap)?;
            self.pending_images += incoming;
        }
        Ok(IngestTicket {
            target,
            form: self.form_of(target),
            count: incoming,
        })
    }

    /// Whether the editor a batch was picked for is still open
    pub fn accepts(&self, ticket: &IngestTicket) -> bool {
        ticket.form == self.form_of(ticket.target)
    }

    /// Give back the place held by a batch that will not be attached
    pub fn release(&mut self, ticket: &IngestTicket) {
        if ticket.target == ImageTarget::Portfolio && self.accepts(ticket) {
            self.pending_images = self.pending_images.saturating_sub(ticket.count);
        }
    }

    /// Put freshly ingested images into the field they were picked for.
    /// Batches for an editor that has since been closed are dropped.
    pub fn attach_images(&mut self, ticket: &IngestTicket, images: Vec<String>) {
        if !self.accepts(ticket) {
            debug!("Dropping {} photos picked for a closed editor", images.len());
            return;
        }
        self.release(ticket);

        match ticket.target {
            ImageTarget::Portfolio => self.draft.images.extend(images),
            ImageTarget::Profile => {
                if let Some(image) = images.into_iter().next() {
                    self.profile_image = image;
                }
            }
            ImageTarget::Hero => {
                if let Some(image) = images.into_iter().next() {
                    self.hero_image = image;
                }
            }
        }
    }

    pub fn update(&mut self, message: AdminMessage, state: &mut AppState) -> Effect {
        if !self.gate.is_authenticated() && !matches!(message, AdminMessage::PasswordChanged(_) | AdminMessage::Login) {
            return Effect::None;
        }

        match message {
            AdminMessage::PasswordChanged(password) => {
                self.password = password;
                Effect::None
            }
            AdminMessage::Login => {
                let result = self.gate.authenticate(&self.password);
                self.password.clear();
                match result {
                    Ok(()) => {
                        self.load_site_copy(state.about(), state.config());
                        Effect::Notice("Admin mode unlocked".to_string())
                    }
                    Err(e) => Effect::Notice(e.to_string()),
                }
            }
            AdminMessage::SignOut => {
                self.gate.sign_out();
                self.reset_form();
                self.site_form += 1;
                self.pending_delete = None;
                Effect::Notice("Signed out".to_string())
            }
            AdminMessage::PickImages(target) => Effect::PickImages(target),
            AdminMessage::RemoveImage(index) => {
                if index < self.draft.images.len() {
                    self.draft.images.remove(index);
                }
                Effect::None
            }
            AdminMessage::CategorySelected(category) => {
                self.draft.category = category;
                Effect::None
            }
            AdminMessage::TitleChanged(title) => {
                self.draft.title = title;
                Effect::None
            }
            AdminMessage::LocationChanged(location) => {
                self.draft.location = location;
                Effect::None
            }
            AdminMessage::YearChanged(year) => {
                self.draft.year = year;
                Effect::None
            }
            AdminMessage::SubmitItem => {
                let result = match self.editing.clone() {
                    Some(id) => state.update_portfolio_item(self.draft.to_item(id)),
                    None => state.add_portfolio_item(self.draft.to_item(ItemId::generate())),
                };
                match result {
                    Ok(persist) => {
                        self.reset_form();
                        Effect::Persist(persist)
                    }
                    Err(e) => Effect::Notice(e.to_string()),
                }
            }
            AdminMessage::CancelEdit => {
                self.reset_form();
                Effect::None
            }
            AdminMessage::EditItem(id) => match state.find_item(&id) {
                Some(item) => {
                    self.restart_draft(ItemDraft::from_item(item), Some(id));
                    Effect::None
                }
                None => Effect::Notice(format!("No portfolio item with id '{}'", id)),
            },
            AdminMessage::RequestDelete(id) => {
                self.pending_delete = Some(id);
                Effect::None
            }
            AdminMessage::CancelDelete => {
                self.pending_delete = None;
                Effect::None
            }
            AdminMessage::ConfirmDelete => {
                let Some(id) = self.pending_delete.take() else {
                    return Effect::None;
                };
                if self.editing.as_ref() == Some(&id) {
                    self.reset_form();
                }
                match state.delete_portfolio_item(&id) {
                    Some(persist) => Effect::Persist(persist),
                    None => Effect::None,
                }
            }
            AdminMessage::NameChanged(name) => {
                self.name = name;
                Effect::None
            }
            AdminMessage::PhilosophyTitleEdited(action) => {
                self.philosophy_title.perform(action);
                Effect::None
            }
            AdminMessage::PhilosophyEdited(action) => {
                self.philosophy.perform(action);
                Effect::None
            }
            AdminMessage::KeywordsChanged(keywords) => {
                self.keywords = keywords;
                Effect::None
            }
            AdminMessage::SaveAbout => {
                let about = AboutContent {
                    profile_image: self.profile_image.clone(),
                    name: self.name.clone(),
                    philosophy_title: editor_text(&self.philosophy_title),
                    philosophy_description: editor_text(&self.philosophy),
                    keywords: parse_keywords(&self.keywords),
                };
                info!("Saving About for '{}'", about.name);
                Effect::Persist(state.replace_about(about))
            }
            AdminMessage::HeroTitleEdited(action) => {
                self.hero_title.perform(action);
                Effect::None
            }
            AdminMessage::HeroSubtitleEdited(action) => {
                self.hero_subtitle.perform(action);
                Effect::None
            }
            AdminMessage::SaveConfig => {
                let config = SiteConfig {
                    hero_image: self.hero_image.clone(),
                    hero_title: editor_text(&self.hero_title),
                    hero_subtitle: editor_text(&self.hero_subtitle),
                };
                Effect::Persist(state.replace_config(config))
            }
        }
    }

    pub fn view<'a>(&'a self, state: &'a AppState, cache: &ImageCache) -> Element<'a, Message> {
        if !self.gate.is_authenticated() {
            return self.login_view();
        }

        let header = row![
            text("Admin").size(32),
            iced::widget::horizontal_space(),
            button("Sign out").style(button::secondary).on_press(admin(AdminMessage::SignOut)),
        ]
        .align_y(Alignment::Center);

        let editors = row![
            self.item_editor(state, cache),
            self.item_table(state),
        ]
        .spacing(32);

        let copy = row![self.about_editor(cache), self.config_editor(cache)].spacing(32);

        let mut page = Column::new().spacing(40).padding(32).push(header);
        for key in RecordKey::ALL {
            if !state.is_loaded(key) {
                page = page.push(
                    text(format!(
                        "⚠️  The stored {} could not be read. Edits to it may not be saved.",
                        key.label()
                    ))
                    .size(13),
                );
            }
        }

        scrollable(page.push(editors).push(copy)).height(Length::Fill).into()
    }

    fn login_view(&self) -> Element<'_, Message> {
        let form = column![
            text("Admin access").size(24),
            text_input("Password", &self.password)
                .secure(true)
                .on_input(|value| admin(AdminMessage::PasswordChanged(value)))
                .on_submit(admin(AdminMessage::Login))
                .padding(12),
            button("Enter").padding(10).on_press(admin(AdminMessage::Login)),
        ]
        .spacing(16)
        .width(Length::Fixed(320.0))
        .align_x(Alignment::Center);

        container(form)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn item_editor<'a>(&'a self, state: &AppState, cache: &ImageCache) -> Element<'a, Message> {
        let heading = if self.editing.is_some() { "Edit work" } else { "New work" };

        let mut thumbs = Row::new().spacing(6);
        for (index, image) in self.draft.images.iter().enumerate() {
            thumbs = thumbs.push(column![
                picture(cache, Some(image.as_str()), 64.0, 64.0, "Photo"),
                button(text("Remove").size(10))
                    .style(button::text)
                    .on_press(admin(AdminMessage::RemoveImage(index))),
            ]);
        }

        let mut form = Column::new()
            .spacing(12)
            .width(Length::Fixed(360.0))
            .push(text(heading).size(20))
            .push(
                button(text(format!(
                    "Add photos ({}/{})",
                    self.draft.images.len(),
                    state.max_images_per_item()
                )))
                .on_press(admin(AdminMessage::PickImages(ImageTarget::Portfolio))),
            )
            .push(scrollable(thumbs).direction(scrollable::Direction::Horizontal(scrollable::Scrollbar::new())))
            .push(pick_list(Category::ALL, Some(self.draft.category), |category| {
                admin(AdminMessage::CategorySelected(category))
            }))
            .push(text_input("Year", &self.draft.year).on_input(|value| admin(AdminMessage::YearChanged(value))))
            .push(text_input("Title", &self.draft.title).on_input(|value| admin(AdminMessage::TitleChanged(value))))
            .push(text_input("Location", &self.draft.location).on_input(|value| admin(AdminMessage::LocationChanged(value))));

        let mut actions = row![button(if self.editing.is_some() { "Save changes" } else { "Publish" })
            .on_press(admin(AdminMessage::SubmitItem))]
        .spacing(8);
        if self.editing.is_some() {
            actions = actions.push(button("Cancel").style(button::secondary).on_press(admin(AdminMessage::CancelEdit)));
        }
        form = form.push(actions);

        container(form).padding(20).style(container::rounded_box).into()
    }

    fn item_table<'a>(&'a self, state: &'a AppState) -> Element<'a, Message> {
        let mut table = Column::new()
            .spacing(8)
            .width(Length::Fill)
            .push(text(format!("Works ({})", state.portfolio().len())).size(20));

        for item in state.portfolio() {
            let confirming = self.pending_delete.as_ref() == Some(&item.id);
            let mut line = row![
                text(item.category.label()).size(12).width(Length::Fixed(100.0)),
                text(&item.title).size(14).width(Length::Fill),
                text(&item.year).size(12),
                button(text("Edit").size(12))
                    .style(button::text)
                    .on_press(admin(AdminMessage::EditItem(item.id.clone()))),
            ]
            .spacing(12)
            .align_y(Alignment::Center);

            line = if confirming {
                line.push(text("Delete?").size(12))
                    .push(button(text("Yes").size(12)).style(button::danger).on_press(admin(AdminMessage::ConfirmDelete)))
                    .push(button(text("No").size(12)).style(button::secondary).on_press(admin(AdminMessage::CancelDelete)))
            } else {
                line.push(
                    button(text("Delete").size(12))
                        .style(button::text)
                        .on_press(admin(AdminMessage::RequestDelete(item.id.clone()))),
                )
            };
            table = table.push(line);
        }

        container(table).padding(20).style(container::rounded_box).into()
    }

    fn about_editor<'a>(&'a self, cache: &ImageCache) -> Element<'a, Message> {
        let form = column![
            text("About").size(20),
            picture(cache, Some(self.profile_image.as_str()), 120.0, 150.0, "Profile"),
            button("Change profile photo").on_press(admin(AdminMessage::PickImages(ImageTarget::Profile))),
            text_input("Name", &self.name).on_input(|value| admin(AdminMessage::NameChanged(value))),
            text("Philosophy title").size(12),
            text_editor(&self.philosophy_title)
                .on_action(|action| admin(AdminMessage::PhilosophyTitleEdited(action)))
                .height(Length::Fixed(70.0)),
            text("Philosophy").size(12),
            text_editor(&self.philosophy)
                .on_action(|action| admin(AdminMessage::PhilosophyEdited(action)))
                .height(Length::Fixed(140.0)),
            text_input("Keywords, comma separated", &self.keywords)
                .on_input(|value| admin(AdminMessage::KeywordsChanged(value))),
            button("Save About").on_press(admin(AdminMessage::SaveAbout)),
        ]
        .spacing(10)
        .width(Length::Fill);

        container(form).padding(20).style(container::rounded_box).into()
    }

    fn config_editor<'a>(&'a self, cache: &ImageCache) -> Element<'a, Message> {
        let form = column![
            text("Home hero").size(20),
            picture(cache, Some(self.hero_image.as_str()), 240.0, 135.0, "Hero"),
            button("Change hero photo").on_press(admin(AdminMessage::PickImages(ImageTarget::Hero))),
            text("Title").size(12),
            text_editor(&self.hero_title)
                .on_action(|action| admin(AdminMessage::HeroTitleEdited(action)))
                .height(Length::Fixed(70.0)),
            text("Subtitle").size(12),
            text_editor(&self.hero_subtitle)
                .on_action(|action| admin(AdminMessage::HeroSubtitleEdited(action)))
                .height(Length::Fixed(70.0)),
            button("Save hero").on_press(admin(AdminMessage::SaveConfig)),
        ]
        .spacing(10)
        .width(Length::Fill);

        container(form).padding(20).style(container::rounded_box).into()
    }
}

fn admin(message: AdminMessage) -> Message {
    Message::Admin(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ADMIN_PASSWORD;
    use crate::state::store::RecordStore;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, AppState, AdminPanel) {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("archive.db"), Duration::from_millis(200));
        let (state, _) = AppState::load(store, 50).await;
        (dir, state, AdminPanel::new(AdminGate::new(ADMIN_PASSWORD)))
    }

    fn portfolio_ticket(panel: &mut AdminPanel, count: usize) -> IngestTicket {
        panel.reserve_images(ImageTarget::Portfolio, count, 50).unwrap()
    }

    fn login(panel: &mut AdminPanel, state: &mut AppState) {
        panel.update(AdminMessage::PasswordChanged("1111".to_string()), state);
        panel.update(AdminMessage::Login, state);
        assert!(panel.is_authenticated());
    }

    #[tokio::test]
    async fn test_locked_panel_ignores_edits() {
        let (_dir, mut state, mut panel) = setup().await;
        panel.update(AdminMessage::TitleChanged("x".to_string()), &mut state);
        assert_eq!(panel.draft.title, "");
        assert!(matches!(
            panel.update(AdminMessage::RequestDelete(ItemId::from("1")), &mut state),
            Effect::None
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_shows_message() {
        let (_dir, mut state, mut panel) = setup().await;
        panel.update(AdminMessage::PasswordChanged("0000".to_string()), &mut state);
        match panel.update(AdminMessage::Login, &mut state) {
            Effect::Notice(message) => assert_eq!(message, "Wrong password"),
            other => panic!("unexpected effect {:?}", other),
        }
        assert!(!panel.is_authenticated());
    }

    #[tokio::test]
    async fn test_publish_new_item() {
        let (_dir, mut state, mut panel) = setup().await;
        login(&mut panel, &mut state);

        let ticket = portfolio_ticket(&mut panel, 1);
        panel.attach_images(&ticket, vec!["data:image/jpeg;base64,AA".to_string()]);
        panel.update(AdminMessage::TitleChanged("Harbour".to_string()), &mut state);
        panel.update(AdminMessage::CategorySelected(Category::Film), &mut state);

        let effect = panel.update(AdminMessage::SubmitItem, &mut state);
        let Effect::Persist(persist) = effect else {
            panic!("expected a persist job");
        };
        persist.run().await.unwrap();

        assert_eq!(state.portfolio()[0].title, "Harbour");
        assert_eq!(state.portfolio()[0].category, Category::Film);
        assert_eq!(panel.draft, ItemDraft::default());
    }

    #[tokio::test]
    async fn test_submit_without_photo_is_rejected() {
        let (_dir, mut state, mut panel) = setup().await;
        login(&mut panel, &mut state);
        panel.update(AdminMessage::TitleChanged("Harbour".to_string()), &mut state);

        match panel.update(AdminMessage::SubmitItem, &mut state) {
            Effect::Notice(message) => assert_eq!(message, "A photo and a title are required"),
            other => panic!("unexpected effect {:?}", other),
        }
        assert_eq!(state.portfolio().len(), 5);
        assert_eq!(panel.draft.title, "Harbour");
    }

    #[tokio::test]
    async fn test_edit_existing_item() {
        let (_dir, mut state, mut panel) = setup().await;
        login(&mut panel, &mut state);

        panel.update(AdminMessage::EditItem(ItemId::from("4")), &mut state);
        assert_eq!(panel.editing.as_ref(), Some(&ItemId::from("4")));
        panel.update(AdminMessage::LocationChanged("Busan".to_string()), &mut state);
        assert!(matches!(panel.update(AdminMessage::SubmitItem, &mut state), Effect::Persist(_)));

        assert_eq!(state.find_item(&ItemId::from("4")).unwrap().location, "Busan");
        assert_eq!(state.portfolio().len(), 5);
        assert!(panel.editing.as_ref().is_none());
    }

    #[tokio::test]
    async fn test_delete_needs_confirmation() {
        let (_dir, mut state, mut panel) = setup().await;
        login(&mut panel, &mut state);

        panel.update(AdminMessage::RequestDelete(ItemId::from("2")), &mut state);
        panel.update(AdminMessage::CancelDelete, &mut state);
        assert!(matches!(panel.update(AdminMessage::ConfirmDelete, &mut state), Effect::None));
        assert_eq!(state.portfolio().len(), 5);

        panel.update(AdminMessage::RequestDelete(ItemId::from("2")), &mut state);
        assert!(matches!(panel.update(AdminMessage::ConfirmDelete, &mut state), Effect::Persist(_)));
        assert!(state.find_item(&ItemId::from("2")).is_none());
    }

    #[tokio::test]
    async fn test_batch_over_cap_is_rejected_whole() {
        let (_dir, mut state, mut panel) = setup().await;
        login(&mut panel, &mut state);
        let ticket = portfolio_ticket(&mut panel, 45);
        panel.attach_images(&ticket, vec!["x".to_string(); 45]);

        let err = panel.reserve_images(ImageTarget::Portfolio, 10, 50).unwrap_err();
        assert_eq!(err, ValidationError::TooManyImages { existing: 45, incoming: 10, cap: 50 });
        assert_eq!(panel.draft.images.len(), 45);
        assert!(panel.reserve_images(ImageTarget::Hero, 10, 50).is_ok());
    }

    #[tokio::test]
    async fn test_batches_in_flight_count_towards_cap() {
        let (_dir, mut state, mut panel) = setup().await;
        login(&mut panel, &mut state);

        let first = portfolio_ticket(&mut panel, 30);
        let err = panel.reserve_images(ImageTarget::Portfolio, 30, 50).unwrap_err();
        assert_eq!(err, ValidationError::TooManyImages { existing: 30, incoming: 30, cap: 50 });

        // A failed batch gives its place back
        panel.release(&first);
        let second = portfolio_ticket(&mut panel, 30);
        panel.attach_images(&second, vec!["x".to_string(); 30]);
        assert_eq!(panel.draft.images.len(), 30);
        assert!(panel.reserve_images(ImageTarget::Portfolio, 21, 50).is_err());
        assert!(panel.reserve_images(ImageTarget::Portfolio, 20, 50).is_ok());
    }

    #[tokio::test]
    async fn test_photos_for_a_closed_editor_are_dropped() {
        let (_dir, mut state, mut panel) = setup().await;
        login(&mut panel, &mut state);

        panel.update(AdminMessage::EditItem(ItemId::from("1")), &mut state);
        let ticket = portfolio_ticket(&mut panel, 1);
        panel.update(AdminMessage::EditItem(ItemId::from("2")), &mut state);

        assert!(!panel.accepts(&ticket));
        panel.attach_images(&ticket, vec!["data:image/jpeg;base64,NEW".to_string()]);
        assert!(matches!(panel.update(AdminMessage::SubmitItem, &mut state), Effect::Persist(_)));

        let item = state.find_item(&ItemId::from("2")).unwrap();
        assert!(!item.images.iter().any(|image| image.ends_with("NEW")));

        // The new draft does not inherit the old reservation
        assert!(panel.reserve_images(ImageTarget::Portfolio, 50, 50).is_ok());
    }

    #[tokio::test]
    async fn test_site_photos_are_dropped_after_sign_out() {
        let (_dir, mut state, mut panel) = setup().await;
        login(&mut panel, &mut state);

        let ticket = panel.reserve_images(ImageTarget::Hero, 1, 50).unwrap();
        panel.update(AdminMessage::SignOut, &mut state);
        login(&mut panel, &mut state);

        panel.attach_images(&ticket, vec!["data:image/jpeg;base64,HERO".to_string()]);
        assert_eq!(panel.hero_image, state.config().hero_image);
    }

    #[tokio::test]
    async fn test_save_about_replaces_record() {
        let (_dir, mut state, mut panel) = setup().await;
        login(&mut panel, &mut state);

        panel.update(AdminMessage::NameChanged("New Name".to_string()), &mut state);
        panel.update(AdminMessage::KeywordsChanged("film, , film".to_string()), &mut state);
        let ticket = panel.reserve_images(ImageTarget::Profile, 1, 50).unwrap();
        panel.attach_images(&ticket, vec!["data:image/jpeg;base64,BB".to_string()]);

        let Effect::Persist(persist) = panel.update(AdminMessage::SaveAbout, &mut state) else {
            panic!("expected a persist job");
        };
        persist.run().await.unwrap();

        assert_eq!(state.about().name, "New Name");
        assert_eq!(state.about().keywords, ["film", "", "film"]);
        assert_eq!(state.about().profile_image, "data:image/jpeg;base64,BB");
        assert_eq!(state.about().philosophy_description, AboutContent::default().philosophy_description);
    }

    #[tokio::test]
    async fn test_save_config_keeps_line_breaks() {
        let (_dir, mut state, mut panel) = setup().await;
        login(&mut panel, &mut state);

        assert!(matches!(panel.update(AdminMessage::SaveConfig, &mut state), Effect::Persist(_)));
        assert_eq!(state.config(), &SiteConfig::default());
        assert!(state.config().hero_title.contains('\n'));
    }

    #[test]
    fn test_parse_keywords() {
        assert!(parse_keywords("  ").is_empty());
        assert_eq!(parse_keywords("a, b ,a"), ["a", "b", "a"]);
    }
}
