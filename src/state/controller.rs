use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::data::{AboutContent, Category, ItemId, PortfolioItem, Record, RecordKey, SiteConfig};
use super::store::RecordStore;
use crate::error::{StateError, StoreError, ValidationError};
use crate::media::ingest::check_batch_capacity;

/// Last generation durably written, one slot per record key.
/// Holding a slot's lock serializes writes to that key.
#[derive(Debug, Default)]
struct WriteLedger {
    slots: [Mutex<u64>; 3],
}

/// What happened when a persist job ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Written,
    /// A newer mutation of the same record was already written
    Superseded,
}

/// A pending write of one record, returned by every mutation.
///
/// Nothing is written until [`Persist::run`] is awaited.
#[derive(Debug)]
pub struct Persist {
    record: Record,
    generation: u64,
    loaded: bool,
    store: RecordStore,
    ledger: Arc<WriteLedger>,
}

impl Persist {
    pub fn key(&self) -> RecordKey {
        self.record.key()
    }

    /// Write the snapshot unless a newer one of the same record already landed
    pub async fn run(self) -> Result<PersistOutcome, StoreError> {
        let key = self.record.key();
        if !self.loaded {
            warn!("⏸️  Not saving '{}': it was never loaded", key);
            return Err(StoreError::NotLoaded { key });
        }

        let mut last_written = self.ledger.slots[key.index()].lock().await;
        if self.generation <= *last_written {
            debug!("Skipping '{}' generation {} (already at {})", key, self.generation, *last_written);
            return Ok(PersistOutcome::Superseded);
        }

        if let Err(e) = self.store.save(&self.record).await {
            error!("⚠️  {}", e);
            return Err(e);
        }
        *last_written = self.generation;
        Ok(PersistOutcome::Written)
    }
}

/// Owner of the live site records for one session.
///
/// Built by [`AppState::load`]; the view shows a loading screen until it has
/// one. Every mutation updates memory first and hands back a [`Persist`] job
/// for the changed record.
#[derive(Clone)]
pub struct AppState {
    store: RecordStore,
    ledger: Arc<WriteLedger>,
    portfolio: Vec<PortfolioItem>,
    about: AboutContent,
    config: SiteConfig,
    /// Whether each record's startup read completed
    loaded: [bool; 3],
    /// Records whose stored value could not be decoded at startup
    undecodable: [bool; 3],
    /// Mutation counter per record
    generations: [u64; 3],
    max_images_per_item: usize,
}

impl AppState {
    /// Initialize the store and read all three records concurrently.
    ///
    /// Never fails: anything that cannot be read falls back to its default
    /// and the error is returned alongside the ready state.
    pub async fn load(store: RecordStore, max_images_per_item: usize) -> (Self, Vec<StoreError>) {
        let mut state = Self {
            store,
            ledger: Arc::new(WriteLedger::default()),
            portfolio: super::data::default_portfolio(),
            about: AboutContent::default(),
            config: SiteConfig::default(),
            loaded: [false; 3],
            undecodable: [false; 3],
            generations: [0; 3],
            max_images_per_item,
        };
        let mut issues = Vec::new();

        if let Err(e) = state.store.init().await {
            error!("❌ {}", e);
            issues.push(e);
            return (state, issues);
        }

        let (portfolio, about, config) = futures::join!(
            state.store.load(RecordKey::Portfolio),
            state.store.load(RecordKey::About),
            state.store.load(RecordKey::Config),
        );

        for (key, result) in RecordKey::ALL.into_iter().zip([portfolio, about, config]) {
            match result {
                Ok(Some(record)) => {
                    state.apply(record);
                    state.loaded[key.index()] = true;
                }
                Ok(None) => {
                    info!("Using default '{}'", key);
                    state.apply(Record::default_for(key));
                    state.loaded[key.index()] = true;
                }
                Err(e) => {
                    warn!("⚠️  {}; using default", e);
                    state.apply(Record::default_for(key));
                    state.undecodable[key.index()] = matches!(e, StoreError::Decode { .. });
                    issues.push(e);
                }
            }
        }

        info!("🎨 Archive ready with {} portfolio items", state.portfolio.len());
        (state, issues)
    }

    fn apply(&mut self, record: Record) {
        match record {
            Record::Portfolio(items) => self.portfolio = items,
            Record::About(about) => self.about = about,
            Record::Config(config) => self.config = config,
        }
    }

    /// Stamp a new generation for the record and snapshot it
    fn persist(&mut self, key: RecordKey) -> Persist {
        let slot = key.index();
        self.generations[slot] += 1;

        let record = match key {
            RecordKey::Portfolio => Record::Portfolio(self.portfolio.clone()),
            RecordKey::About => Record::About(self.about.clone()),
            RecordKey::Config => Record::Config(self.config.clone()),
        };

        Persist {
            record,
            generation: self.generations[slot],
            loaded: self.loaded[slot],
            store: self.store.clone(),
            ledger: Arc::clone(&self.ledger),
        }
    }

    /// Check the portfolio item invariants
    pub fn validate_item(&self, item: &PortfolioItem) -> Result<(), ValidationError> {
        if item.images.is_empty() || item.title.trim().is_empty() {
            return Err(ValidationError::MissingImagesOrTitle);
        }
        check_batch_capacity(0, item.images.len(), self.max_images_per_item)
    }

    /// Add a new item at the front of the portfolio (newest first)
    pub fn add_portfolio_item(&mut self, item: PortfolioItem) -> Result<Persist, StateError> {
        self.validate_item(&item)?;
        info!("➕ Added '{}'", item.title);
        self.portfolio.insert(0, item);
        Ok(self.persist(RecordKey::Portfolio))
    }

    /// Replace the item with the same id
    pub fn update_portfolio_item(&mut self, item: PortfolioItem) -> Result<Persist, StateError> {
        self.validate_item(&item)?;
        let slot = self
            .portfolio
            .iter_mut()
            .find(|existing| existing.id == item.id)
            .ok_or_else(|| StateError::NotFound { id: item.id.to_string() })?;

        info!("✏️  Updated '{}'", item.title);
        *slot = item;
        Ok(self.persist(RecordKey::Portfolio))
    }

    /// Remove the item with `id`. Returns `None` when there was nothing to remove.
    pub fn delete_portfolio_item(&mut self, id: &ItemId) -> Option<Persist> {
        let before = self.portfolio.len();
        self.portfolio.retain(|item| &item.id != id);
        if self.portfolio.len() == before {
            return None;
        }
        info!("🗑️  Deleted item {}", id);
        Some(self.persist(RecordKey::Portfolio))
    }

    /// A wholesale replacement owes nothing to an undecodable stored value,
    /// so it may overwrite it. Engine failures keep the record unsaved.
    fn take_over_undecodable(&mut self, key: RecordKey) {
        let slot = key.index();
        if self.undecodable[slot] {
            info!("🩹 Overwriting undecodable '{}'", key);
            self.undecodable[slot] = false;
            self.loaded[slot] = true;
        }
    }

    pub fn replace_about(&mut self, about: AboutContent) -> Persist {
        self.about = about;
        self.take_over_undecodable(RecordKey::About);
        self.persist(RecordKey::About)
    }

    pub fn replace_config(&mut self, config: SiteConfig) -> Persist {
        self.config = config;
        self.take_over_undecodable(RecordKey::Config);
        self.persist(RecordKey::Config)
    }

    pub fn portfolio(&self) -> &[PortfolioItem] {
        &self.portfolio
    }

    pub fn about(&self) -> &AboutContent {
        &self.about
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn find_item(&self, id: &ItemId) -> Option<&PortfolioItem> {
        self.portfolio.iter().find(|item| &item.id == id)
    }

    /// Items of one category, newest first
    pub fn items_in(&self, category: Category) -> impl Iterator<Item = &PortfolioItem> + '_ {
        self.portfolio.iter().filter(move |item| item.category == category)
    }

    /// Cover of the newest item in `category`, if any
    pub fn cover_for(&self, category: Category) -> Option<&str> {
        self.items_in(category).next().and_then(PortfolioItem::cover)
    }

    pub fn is_loaded(&self, key: RecordKey) -> bool {
        self.loaded[key.index()]
    }

    pub fn max_images_per_item(&self) -> usize {
        self.max_images_per_item
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("portfolio_items", &self.portfolio.len())
            .field("loaded", &self.loaded)
            .field("generations", &self.generations)
            .finish()
    }
}
