//! Core library for solarsite
//!
//! This crate implements the **Functional Core** of the solarsite client,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The project is split in two crates:
//!
//! - **`solarsite_core`** (this crate): Pure transformation functions with zero I/O
//! - **`solarsite`**: HTTP calls, session state and the command line (the Imperative Shell)
//!
//! Every function here is deterministic and side-effect free. State is passed
//! in by reference and a new value is returned, so the shell decides where the
//! current value lives and tests need nothing but fixture data.
//!
//! # Module Organization
//!
//! - [`filters`]: Filter state and the reducer that merges updates into it
//! - [`query`]: Canonical query-string serialization of filter state
//! - [`panels`]: Filter panels and the categories they clear when closed
//! - [`scoring`]: Suitability tiers and their colours
//! - [`sites`]: Site, statistics and weight models exchanged with the backend
//!
//! # Example Usage
//!
//! ```rust
//! use solarsite_core::filters::{
//!     apply_filter_update, FilterState, FilterUpdate, NumericColumn, RangeExactUpdate,
//!     SearchField,
//! };
//! use solarsite_core::query::serialize_filters;
//!
//! let state = FilterState::new();
//! let state = apply_filter_update(
//!     &state,
//!     FilterUpdate::Search(SearchField::Region, Some("North".to_string())),
//! );
//! let state = apply_filter_update(
//!     &state,
//!     FilterUpdate::RangeExact(RangeExactUpdate::range(
//!         NumericColumn::AreaScore,
//!         Some(100.0),
//!         None,
//!     )),
//! );
//!
//! assert_eq!(
//!     serialize_filters(&state),
//!     "region=North&q=col:area_score,min_score:100"
//! );
//! ```

pub mod filters;
pub mod panels;
pub mod query;
pub mod scoring;
pub mod sites;
