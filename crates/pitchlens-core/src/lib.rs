//! # PitchLens Core
//!
//! Runtime-agnostic logic for PitchLens: pitch data models, the section
//! segmenter, the narrative analyzer, the mock data enricher, and the
//! storage abstraction.
//!
//! This crate contains no tokio, sqlx, HTTP, or PDF dependencies. Model
//! backends and persistence engines are plugged in through the
//! [`generation`] and [`store`] traits by the `pitchlens` application crate.

pub mod analysis;
pub mod enrich;
pub mod generation;
pub mod models;
pub mod segment;
pub mod store;
