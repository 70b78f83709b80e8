//! Session state for the sites views
//!
//! The store owns the fetched sites, the progress flags and the current
//! [`ViewState`]. Filter changes go through the pure reducer in
//! `solarsite_core` and replace the held value; only the HTTP calls live here.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::ApiClient;
use crate::file::download_file;
use crate::prelude::*;
use solarsite_core::filters::{
    apply_filter_update, remove_range_filter, FilterState, FilterUpdate, NumericColumn,
};
use solarsite_core::panels::{activate_panel, toggle_panel, ActivePanel, ViewState};
use solarsite_core::query::serialize_filters;
use solarsite_core::sites::{
    export_filename, MessageResponse, SiteWithScores, WeightRequest, Weights,
};

/// Result of an export attempt. Export failures are reported, never returned as errors.
#[derive(Debug, PartialEq)]
pub enum ExportOutcome {
    Written(PathBuf),
    AlreadyRunning,
    Failed(String),
}

/// Clears the in-flight flag when the export finishes, however it finishes
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct SiteStore {
    api: ApiClient,
    pub sites: Vec<SiteWithScores>,
    /// Set while a site list fetch is running
    pub loading: bool,
    /// Set while an upload or recalculation is running
    pub is_processing: bool,
    is_exporting: AtomicBool,
    pub error: Option<String>,
    pub weights: Option<Weights>,
    view: ViewState,
}

impl SiteStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            sites: Vec::new(),
            loading: false,
            is_processing: false,
            is_exporting: AtomicBool::new(false),
            error: None,
            weights: None,
            view: ViewState::default(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn total_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn is_exporting(&self) -> bool {
        self.is_exporting.load(Ordering::SeqCst)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn filters(&self) -> &FilterState {
        &self.view.filters
    }

    /// Serialized form of the current filters
    pub fn query(&self) -> String {
        serialize_filters(&self.view.filters)
    }

    pub fn set_filter(&mut self, update: FilterUpdate) {
        self.view.filters = apply_filter_update(&self.view.filters, update);
    }

    pub fn remove_range_filter(&mut self, column: NumericColumn) {
        self.view.filters = remove_range_filter(&self.view.filters, column);
    }

    pub fn toggle_panel(&mut self, panel: ActivePanel) {
        self.view = toggle_panel(&self.view, panel);
    }

    pub fn activate_panel(&mut self, panel: ActivePanel) {
        self.view = activate_panel(&self.view, panel);
    }

    /// Fetch sites for the current filters
    ///
    /// Failures are recovered here: the list is left as it was and the
    /// message is kept in `error`.
    pub async fn fetch_sites(&mut self) {
        self.loading = true;
        self.error = None;

        let query = self.query();
        match self.api.get_sites(&query).await {
            Ok(sites) => {
                log::debug!("Fetched {} sites", sites.len());
                self.sites = sites;
            }
            Err(err) => {
                log::warn!("Fetching sites failed: {err}");
                self.error = Some(err.to_string());
            }
        }

        self.loading = false;
    }

    /// Upload a site CSV; failures are returned to the caller
    pub async fn upload_site_file(&mut self, path: &Path) -> Result<MessageResponse> {
        self.is_processing = true;
        let result = self.api.upload_site_file(path).await;
        self.is_processing = false;

        if let Err(err) = &result {
            log::error!("Upload failed: {err}");
        }
        result
    }

    /// Rescore every site with new weights; failures are returned to the caller
    pub async fn recalculate_weights(&mut self, weights: Weights) -> Result<MessageResponse> {
        self.is_processing = true;
        let result = self
            .api
            .recalculate_weights(&WeightRequest { weights })
            .await;
        self.is_processing = false;

        match &result {
            Ok(_) => self.weights = Some(weights),
            Err(err) => log::error!("Recalculation failed: {err}"),
        }
        result
    }

    /// Export the sites matching the current filters as CSV into `dir`
    ///
    /// Only one export runs at a time; a call made while another is in
    /// flight returns [`ExportOutcome::AlreadyRunning`] without a request.
    pub async fn export_sites(&self, dir: &Path) -> ExportOutcome {
        if self.is_exporting.swap(true, Ordering::SeqCst) {
            log::debug!("Export already in progress");
            return ExportOutcome::AlreadyRunning;
        }
        let _in_flight = InFlight(&self.is_exporting);

        let filename = export_filename(chrono::Utc::now().date_naive());
        let result = match self.api.export_sites_csv(&self.query()).await {
            Ok(bytes) => download_file(&bytes, dir, &filename),
            Err(err) => Err(err),
        };

        match result {
            Ok(path) => ExportOutcome::Written(path),
            Err(err) => {
                log::error!("Export failed: {err}");
                ExportOutcome::Failed(err.to_string())
            }
        }
    }
}
