//! Error types for the record store, image ingestion and admin actions
//!
//! Every error here is recovered at the boundary where it happens and shown
//! to the user through its `Display` text. Nothing is fatal to the session.

use thiserror::Error;

use crate::state::data::RecordKey;

/// Failures of the local record store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database could not be opened or its table could not be created
    #[error("Could not open the local archive at {path}: {message}")]
    Init { path: String, message: String },

    /// `get`/`set` called before a successful `init`
    #[error("The local archive is not initialized (reading '{key}')")]
    ReadNotInitialized { key: String },

    #[error("The local archive is not initialized (saving '{key}')")]
    WriteNotInitialized { key: String },

    #[error("Failed to read '{key}' from the local archive: {source}")]
    Read {
        key: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to save '{key}' to the local archive: {source}")]
    Write {
        key: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A stored value no longer matches the shape it is read as
    #[error("Stored value for '{key}' could not be decoded: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Value for '{key}' could not be encoded: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The record was never loaded at startup, so saving it could clobber stored data
    #[error("'{key}' could not be loaded at startup; changes are kept until the app closes but not saved")]
    NotLoaded { key: RecordKey },

    #[error("Storage worker failed: {message}")]
    Worker { message: String },
}

/// Failures while turning a picked file into an inline image
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Could not read {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{file} is not a supported image: {source}")]
    Decode {
        file: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Could not re-encode {file}: {source}")]
    Encode {
        file: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Image worker failed: {message}")]
    Worker { message: String },
}

/// Input rejected before any state change
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("A photo and a title are required")]
    MissingImagesOrTitle,

    #[error("Please leave your name and a way to reach you")]
    MissingContactDetails,

    #[error("Too many photos: {existing} already added, {incoming} more would exceed the limit of {cap}")]
    TooManyImages {
        existing: usize,
        incoming: usize,
        cap: usize,
    },
}

/// Failures of controller mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No portfolio item with id '{id}'")]
    NotFound { id: String },
}

/// Wrong shared secret at the admin gate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Wrong password")]
    WrongPassword,
}
