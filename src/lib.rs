//! # Agri Q&A Engine
//!
//! Answers natural-language analytical questions about two fixed tabular
//! datasets (crop production and rainfall) by matching a small set of
//! question templates, building parameterized aggregate query plans, and
//! executing them against an in-memory columnar store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agri_qa_engine::ingestion::{load_crop_csv, load_rain_csv};
//! use agri_qa_engine::storage::TabularStore;
//! use agri_qa_engine::QaEngine;
//! use std::path::Path;
//!
//! let crop = load_crop_csv(Path::new("data/crop_production.csv")).unwrap();
//! let rain = load_rain_csv(Path::new("data/imd_rainfall.csv")).unwrap();
//! let store = TabularStore::new(crop, rain).unwrap();
//!
//! let engine = QaEngine::new(store);
//! let answer = engine.ask("top 5 crops in himachal pradesh").unwrap();
//! println!("{}", answer.narrative);
//! ```
//!
//! ## Supported questions
//!
//! - `top N crops in <state>`
//! - `trend of <crop> over last N years in <state>`
//! - `compare rainfall between <state_a> and <state_b>`
//! - `trend of rainfall in <state> for last N years`
//!
//! Anything else yields a fixed help answer.

// Internal modules
pub mod answer;
pub mod config;
pub mod engine;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod intent;
pub mod query;
pub mod storage;

// Public API - main types users need
pub use answer::Answer;
pub use engine::QaEngine;
pub use error::EngineError;
pub use execution::result::{ResultTable, Value};
pub use intent::Intent;
pub use storage::store::TabularStore;
