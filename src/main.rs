use iced::keyboard::{self, key::Named, Key};
use iced::widget::{button, column, container, horizontal_space, text, Row};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

mod config;
mod error;
mod media;
mod state;
mod ui;

use config::AppConfig;
use media::ingest::{ingest_batch, ImageBounds};
use state::auth::AdminGate;
use state::controller::{AppState, Persist, PersistOutcome};
use state::data::RecordKey;
use state::store::RecordStore;
use ui::admin::{AdminMessage, AdminPanel, Effect, ImageTarget, IngestTicket};
use ui::gallery::{Gallery, GalleryMessage};
use ui::pages::{self, InquiryForm, InquiryMessage};
use ui::section::Section;
use ui::ImageCache;

/// File types offered in the photo picker
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff"];

/// Main application state
struct PhotoArchive {
    config: AppConfig,
    /// `None` until the archive has been read
    state: Option<AppState>,
    section: Section,
    gallery: Gallery,
    admin: AdminPanel,
    inquiry: InquiryForm,
    /// Decoded inline photos for display
    images: ImageCache,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Startup read finished; carries any problems found on the way
    Loaded(AppState, Vec<String>),
    Navigate(Section),
    Gallery(GalleryMessage),
    Admin(AdminMessage),
    Inquiry(InquiryMessage),
    /// Background ingestion of picked photos completed
    ImagesIngested(IngestTicket, Result<Vec<String>, String>),
    /// Background write of a record completed
    Persisted(RecordKey, Result<PersistOutcome, String>),
}

impl PhotoArchive {
    /// Create a new instance of the application and start reading the archive
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::default();
        let store = RecordStore::new(config.db_path.clone(), config.busy_timeout);
        let cap = config.max_images_per_item;
        info!("📂 Archive database: {}", store.path().display());

        let app = PhotoArchive {
            admin: AdminPanel::new(AdminGate::new(config.admin_password.clone())),
            config,
            state: None,
            section: Section::default(),
            gallery: Gallery::default(),
            inquiry: InquiryForm::default(),
            images: ImageCache::default(),
            status: String::new(),
        };

        (
            app,
            Task::perform(load_archive(store, cap), |(state, issues)| Message::Loaded(state, issues)),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Loaded(state, issues) => {
                self.images.extend(state.portfolio().iter().flat_map(|item| item.images.iter().map(String::as_str)));
                self.images.insert(&state.about().profile_image);
                self.images.insert(&state.config().hero_image);

                self.status = if issues.is_empty() {
                    format!("Ready. {} works in the archive.", state.portfolio().len())
                } else {
                    issues.join(" · ")
                };
                self.state = Some(state);
                Task::none()
            }
            Message::Navigate(section) => {
                debug!("🧭 Showing {}", section);
                self.section = section;
                if let Some(state) = &self.state {
                    self.gallery.update(GalleryMessage::Close, state.portfolio());
                }
                Task::none()
            }
            Message::Gallery(message) => {
                if let Some(state) = &self.state {
                    if self.section == Section::Portfolio {
                        self.gallery.update(message, state.portfolio());
                    }
                }
                Task::none()
            }
            Message::Admin(message) => {
                let Some(state) = self.state.as_mut() else {
                    return Task::none();
                };
                let effect = self.admin.update(message, state);
                let task = self.apply(effect);
                self.drop_unused_images();
                task
            }
            Message::Inquiry(message) => {
                if let Some(notice) = self.inquiry.update(message) {
                    self.status = notice;
                }
                Task::none()
            }
            Message::ImagesIngested(ticket, Ok(images)) => {
                if self.admin.accepts(&ticket) {
                    self.images.extend(images.iter().map(String::as_str));
                    self.status = format!("✅ Added {} photos", images.len());
                    self.admin.attach_images(&ticket, images);
                } else {
                    self.status = "The editor was closed while photos were processing; they were not added".to_string();
                }
                Task::none()
            }
            Message::ImagesIngested(ticket, Err(message)) => {
                self.admin.release(&ticket);
                self.status = message;
                Task::none()
            }
            Message::Persisted(_, Err(message)) => {
                self.status = message;
                Task::none()
            }
            Message::Persisted(key, Ok(outcome)) => {
                if outcome == PersistOutcome::Written {
                    self.status = format!("✅ Saved {}", key.label());
                }
                Task::none()
            }
        }
    }

    fn apply(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::None => Task::none(),
            Effect::Notice(notice) => {
                self.status = notice;
                Task::none()
            }
            Effect::Persist(persist) => persist_task(persist),
            Effect::PickImages(target) => self.pick_images(target),
        }
    }

    /// Show the native file picker and ingest the chosen photos in the background
    fn pick_images(&mut self, target: ImageTarget) -> Task<Message> {
        let dialog = FileDialog::new()
            .set_title("Select photos")
            .add_filter("Images", &IMAGE_EXTENSIONS);

        let paths: Vec<PathBuf> = match target {
            ImageTarget::Portfolio => dialog.pick_files().unwrap_or_default(),
            ImageTarget::Profile | ImageTarget::Hero => dialog.pick_file().into_iter().collect(),
        };
        if paths.is_empty() {
            return Task::none();
        }

        let ticket = match self.admin.reserve_images(target, paths.len(), self.config.max_images_per_item) {
            Ok(ticket) => ticket,
            Err(e) => {
                warn!("⚠️  {}", e);
                self.status = e.to_string();
                return Task::none();
            }
        };

        let bounds = self.bounds_for(target);
        let quality = self.config.jpeg_quality;
        self.status = format!("Processing {} photos...", paths.len());

        Task::perform(ingest_photos(paths, bounds, quality), move |result| {
            Message::ImagesIngested(ticket.clone(), result)
        })
    }

    /// Evict decoded photos that no record or editor refers to any more
    fn drop_unused_images(&mut self) {
        let Some(state) = &self.state else {
            return;
        };
        let live = state
            .portfolio()
            .iter()
            .flat_map(|item| item.images.iter().map(String::as_str))
            .chain([state.about().profile_image.as_str(), state.config().hero_image.as_str()])
            .chain(self.admin.editor_images());
        self.images.retain(live);
    }

    fn bounds_for(&self, target: ImageTarget) -> ImageBounds {
        match target {
            ImageTarget::Portfolio => self.config.portfolio_bounds,
            ImageTarget::Profile => self.config.profile_bounds,
            ImageTarget::Hero => self.config.hero_bounds,
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let Some(state) = &self.state else {
            return container(text("ARCHIVE LOADING").size(14))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        };

        let mut nav = Row::new()
            .spacing(20)
            .align_y(Alignment::Center)
            .push(
                button(text(format!("{} 사진일기", state.about().name)).size(20))
                    .style(button::text)
                    .on_press(Message::Navigate(Section::Home)),
            )
            .push(horizontal_space());

        for section in Section::NAV {
            let style: fn(&Theme, button::Status) -> button::Style =
                if section == self.section { button::primary } else { button::text };
            nav = nav.push(
                button(text(section.label()).size(13))
                    .style(style)
                    .on_press(Message::Navigate(section)),
            );
        }
        let admin_style: fn(&Theme, button::Status) -> button::Style =
            if self.section == Section::Admin { button::success } else { button::secondary };
        nav = nav.push(
            button(text(Section::Admin.label()).size(13))
                .style(admin_style)
                .on_press(Message::Navigate(Section::Admin)),
        );

        let body: Element<Message> = match self.section {
            Section::Home => pages::home(state, &self.images),
            Section::Portfolio => self.gallery.view(state.portfolio(), &self.images),
            Section::About => pages::about(state, &self.images),
            Section::Snap => pages::snap(),
            Section::Contact => self.inquiry.view(state),
            Section::Admin => self.admin.view(state, &self.images),
        };

        column![
            container(nav).padding([16, 32]),
            container(body).width(Length::Fill).height(Length::Fill),
            container(text(&self.status).size(14)).padding([8, 32]),
        ]
        .into()
    }

    /// Arrow keys and Escape drive the lightbox
    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, _modifiers| match key {
            Key::Named(Named::ArrowRight) => Some(Message::Gallery(GalleryMessage::Next)),
            Key::Named(Named::ArrowLeft) => Some(Message::Gallery(GalleryMessage::Previous)),
            Key::Named(Named::Escape) => Some(Message::Gallery(GalleryMessage::Close)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    init_logging();

    iced::application("Photo Archive", PhotoArchive::update, PhotoArchive::view)
        .subscription(PhotoArchive::subscription)
        .theme(PhotoArchive::theme)
        .centered()
        .run_with(PhotoArchive::new)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("photo_archive=info,warn"));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
}

/// Read the archive; problems become status messages
async fn load_archive(store: RecordStore, cap: usize) -> (AppState, Vec<String>) {
    let (state, issues) = AppState::load(store, cap).await;
    info!("🎨 Photo Archive initialized with {} works", state.portfolio().len());
    (state, issues.iter().map(ToString::to_string).collect())
}

async fn ingest_photos(paths: Vec<PathBuf>, bounds: ImageBounds, quality: f32) -> Result<Vec<String>, String> {
    ingest_batch(paths, bounds, quality).await.map_err(|e| {
        warn!("⚠️  {}", e);
        e.to_string()
    })
}

/// Run a record write in the background and report how it went
fn persist_task(persist: Persist) -> Task<Message> {
    let key = persist.key();
    Task::perform(async move { persist.run().await.map_err(|e| e.to_string()) }, move |result| {
        Message::Persisted(key, result)
    })
}
