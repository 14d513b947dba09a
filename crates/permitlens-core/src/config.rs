//! Dashboard configuration.
//!
//! Every value has a default matching the stock permits dashboard, so an
//! empty (or absent) config file yields a working setup:
//!
//! ```toml
//! [data]
//! records_url = "embeddings_2d_pca_sample.csv"
//! boundaries_url = "ChicagoNeighborhoods.geojson"
//!
//! [layout]
//! scatter_width = 700
//!
//! [ui]
//! years = [2019, 2020, 2021]
//!
//! [selection]
//! policy = "retain"
//! ```

use crate::filter::ALL_YEARS;
use crate::traits::ConfigManager;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Vega-Lite v5 schema URL placed at the root of every spec.
pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

// ============================================================================
// Sections
// ============================================================================

/// Data file locations, relative to the page that embeds the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Permit records (CSV).
    pub records_url: String,
    /// Community-area boundaries (GeoJSON).
    pub boundaries_url: String,
    /// Property of the boundary document holding the feature array.
    pub boundaries_property: String,
    /// Schema URL written at the spec root.
    pub schema_url: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            records_url: "embeddings_2d_pca_sample.csv".to_string(),
            boundaries_url: "ChicagoNeighborhoods.geojson".to_string(),
            boundaries_property: "features".to_string(),
            schema_url: VEGA_LITE_SCHEMA.to_string(),
        }
    }
}

/// Panel sizes in pixels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Scatter plot and cost histogram width.
    pub scatter_width: u32,
    /// Height of the first row.
    pub scatter_height: u32,
    /// Bar chart and time series width.
    pub bar_width: u32,
    /// Height of the third row.
    pub bar_height: u32,
    /// Map height.
    pub map_height: u32,
    /// Horizontal gap added to the map width so it spans both columns.
    pub row_gap: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scatter_width: 700,
            scatter_height: 520,
            bar_width: 700,
            bar_height: 260,
            map_height: 400,
            row_gap: 20,
        }
    }
}

impl LayoutConfig {
    /// Map width: both columns plus the gap between them.
    ///
    /// Saturates at `u32::MAX`; [`DashboardConfig::validate`] rejects
    /// layouts where the sum overflows.
    pub fn map_width(&self) -> u32 {
        self.checked_map_width().unwrap_or(u32::MAX)
    }

    fn checked_map_width(&self) -> Option<u32> {
        self.scatter_width
            .checked_add(self.bar_width)
            .and_then(|width| width.checked_add(self.row_gap))
    }
}

/// Cost histogram bounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Costs above this are dropped as outliers.
    pub max_cost: u64,
    /// Upper bound on histogram bins.
    pub max_bins: u32,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            max_cost: 5_000_000,
            max_bins: 40,
        }
    }
}

/// Page elements and selector options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Element id of the year `<select>`.
    pub selector_id: String,
    /// Element id the visualization mounts into.
    pub mount_id: String,
    /// Years offered by the selector, after "all".
    pub years: Vec<i32>,
    /// Show the vega-embed action menu (export/edit).
    pub actions: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            selector_id: "yearSelector".to_string(),
            mount_id: "vis".to_string(),
            years: (2018..=2023).collect(),
            actions: false,
        }
    }
}

impl UiConfig {
    /// Selector option values in display order: `"all"` then each year.
    pub fn selector_options(&self) -> Vec<String> {
        std::iter::once(ALL_YEARS.to_string())
            .chain(self.years.iter().map(ToString::to_string))
            .collect()
    }
}

/// What happens to live selections when the spec is rebuilt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Every rebuild starts with empty brushes and clicks.
    #[default]
    Reset,
    /// Recorded selection values are re-applied as initial values.
    Retain,
}

/// Selection behaviour across rebuilds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Reset or retain selections on rebuild.
    pub policy: SelectionPolicy,
}

/// Settings for `permitlens serve`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Directory the data files are served from.
    pub data_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8070,
            data_dir: "data".to_string(),
        }
    }
}

// ============================================================================
// DashboardConfig
// ============================================================================

/// Complete permitlens configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Data sources.
    pub data: DataConfig,
    /// Panel sizes.
    pub layout: LayoutConfig,
    /// Cost histogram bounds.
    pub cost: CostConfig,
    /// Page elements.
    pub ui: UiConfig,
    /// Selection policy.
    pub selection: SelectionConfig,
    /// HTTP server.
    pub server: ServerConfig,
}

impl DashboardConfig {
    /// Check values that would produce a broken spec or page.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("layout.scatter_width", self.layout.scatter_width),
            ("layout.scatter_height", self.layout.scatter_height),
            ("layout.bar_width", self.layout.bar_width),
            ("layout.bar_height", self.layout.bar_height),
            ("layout.map_height", self.layout.map_height),
        ];
        for (field, size) in sizes {
            if size == 0 {
                return Err(Error::validation_field(field, "must be greater than zero"));
            }
        }
        if self.layout.checked_map_width().is_none() {
            return Err(Error::validation_field(
                "layout",
                "scatter_width + bar_width + row_gap overflows",
            ));
        }
        if self.cost.max_bins == 0 {
            return Err(Error::validation_field(
                "cost.max_bins",
                "must be greater than zero",
            ));
        }
        if self.data.records_url.is_empty() {
            return Err(Error::validation_field(
                "data.records_url",
                "must not be empty",
            ));
        }
        if self.data.boundaries_url.is_empty() {
            return Err(Error::validation_field(
                "data.boundaries_url",
                "must not be empty",
            ));
        }
        for (field, id) in [
            ("ui.selector_id", &self.ui.selector_id),
            ("ui.mount_id", &self.ui.mount_id),
        ] {
            if !is_element_id(id) {
                return Err(Error::validation_field(
                    field,
                    "must be a non-empty element id of letters, digits, '_' or '-'",
                ));
            }
        }
        if self.ui.selector_id == self.ui.mount_id {
            return Err(Error::validation_field(
                "ui.mount_id",
                "must differ from ui.selector_id",
            ));
        }
        let mut years = self.ui.years.clone();
        years.sort_unstable();
        if years.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(Error::validation_field("ui.years", "contains duplicates"));
        }
        Ok(())
    }
}

/// Ids end up in `#id` CSS selectors, so only selector-safe characters pass.
fn is_element_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl ConfigManager for DashboardConfig {
    fn project_name() -> &'static str {
        "permitlens"
    }
}

// ============================================================================
// Tests
// ============================================================================
