//! # moodmix Core
//!
//! Core library for the moodmix playlist engine.
//!
//! This crate provides the data model shared by ranking and clustering:
//!
//! - [`Track`] - An opaque JSON track record with optional audio features
//! - [`FeatureExtractor`] - Track to fixed-order 7-dimensional [`FeatureVector`]
//! - [`StandardScaler`] - Per-batch z-score standardization
//! - [`vector`] - Cosine similarity and L2 distance over slices
//!
//! ## Example
//!
//! ```rust
//! use moodmix_core::{FeatureExtractor, StandardScaler, Track};
//! use serde_json::json;
//!
//! let tracks = vec![
//!     Track::from_value(json!({"id": "a", "energy": 0.9, "tempo": 150})).unwrap(),
//!     Track::from_value(json!({"id": "b", "energy": 0.2, "tempo": 80})).unwrap(),
//! ];
//!
//! let matrix = FeatureExtractor::new().extract_batch(&tracks);
//! let (scaler, standardized) = StandardScaler::fit_transform(&matrix).unwrap();
//! assert_eq!(standardized.len(), 2);
//! assert!(scaler.std_dev()[1] > 0.0);
//! ```

pub mod error;
pub mod features;
pub mod scaler;
pub mod track;
pub mod vector;

pub use error::{Error, Result};
pub use features::{
    normalize_loudness, normalize_tempo, FeatureExtractor, FeatureVector, FEATURE_DIM,
};
pub use scaler::StandardScaler;
pub use track::{AudioFeatures, Track, FEATURE_FIELDS};
pub use vector::{cosine_similarity, squared_l2_distance};
