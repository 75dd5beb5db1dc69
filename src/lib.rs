//! # PitchLens
//!
//! Accepts pitch-deck PDFs, splits their text into team / market /
//! product-traction sections, attaches company attributes and a model-backed
//! narrative analysis, and stores the result for later retrieval and
//! side-by-side comparison.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │ Extract  │──▶│  Segment  │──▶│  Enrich  │──▶│ Analyze  │──▶│  SQLite  │
//! │ (lopdf)  │   │           │   │          │   │ (models) │   │          │
//! └──────────┘   └───────────┘   └──────────┘   └──────────┘   └────┬─────┘
//!                                                                  │
//!                                        ┌─────────────────────────┤
//!                                        ▼                         ▼
//!                                   ┌──────────┐             ┌──────────┐
//!                                   │   CLI    │             │   HTTP   │
//!                                   └──────────┘             └──────────┘
//! ```
//!
//! Segmentation, enrichment, and analysis live in the `pitchlens-core`
//! crate; this crate supplies PDF extraction, model clients, persistence,
//! and the two front ends.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite record store |
//! | [`extract`] | PDF text extraction |
//! | [`inference`] | Hugging Face / Ollama model clients |
//! | [`pipeline`] | Upload processing and retrieval |
//! | [`server`] | HTTP API |
//! | [`cli`] | CLI command implementations |
//! | [`logging`] | `tracing` subscriber setup |

pub mod cli;
pub mod config;
pub mod db;
pub mod extract;
pub mod inference;
pub mod logging;
pub mod migrate;
pub mod pipeline;
pub mod server;
pub mod sqlite_store;
