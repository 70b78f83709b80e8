//! Filter panels and the state they own
//!
//! Each panel controls one category of the filter state. Closing a panel
//! clears that category so hidden criteria never leak into requests.

use serde::{Deserialize, Serialize};

use crate::filters::{clear_category, FilterCategory, FilterState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivePanel {
    /// Numeric range/exact filters
    Analytical,
    /// Text search fields
    Search,
    /// Limit and offset
    System,
}

impl ActivePanel {
    pub fn category(&self) -> FilterCategory {
        match self {
            ActivePanel::Analytical => FilterCategory::RangeExact,
            ActivePanel::Search => FilterCategory::Search,
            ActivePanel::System => FilterCategory::Pagination,
        }
    }
}

/// Open panels together with the filter state they edit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub panels: Vec<ActivePanel>,
    pub filters: FilterState,
}

impl ViewState {
    pub fn is_open(&self, panel: ActivePanel) -> bool {
        self.panels.contains(&panel)
    }
}

/// Open `panel` if closed, close it if open
///
/// Closing a panel clears the filter category it owns.
pub fn toggle_panel(view: &ViewState, panel: ActivePanel) -> ViewState {
    let mut next = view.clone();

    match next.panels.iter().position(|p| *p == panel) {
        Some(index) => {
            next.panels.remove(index);
            next.filters = clear_category(&next.filters, panel.category());
        }
        None => next.panels.push(panel),
    }

    next
}

/// Open `panel` without duplicating it; never clears anything
pub fn activate_panel(view: &ViewState, panel: ActivePanel) -> ViewState {
    let mut next = view.clone();
    if !next.panels.contains(&panel) {
        next.panels.push(panel);
    }
    next
}
