//! Image handling module
//!
//! This module handles:
//! - Downscaling picked photos to field-specific bounds
//! - Re-encoding them as JPEG inline data URLs
//! - Decoding inline data URLs back for display

pub mod ingest;
