//! The dashboard's four named selections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A selection parameter of the permits dashboard.
///
/// Order follows the interaction chain: each selection only filters panels
/// that come after its declaring panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Selection {
    /// 2D brush on the embedding scatter plot.
    #[serde(rename = "brushSel")]
    Brush,
    /// Click on a permit-type bar.
    #[serde(rename = "typeSel")]
    Type,
    /// 1D brush on the cost histogram.
    #[serde(rename = "costSel")]
    Cost,
    /// 1D brush on the time series.
    #[serde(rename = "timeSel")]
    Time,
}

impl Selection {
    /// All selections in chain order.
    pub const ALL: [Selection; 4] = [Self::Brush, Self::Type, Self::Cost, Self::Time];

    /// Parameter name as it appears in the spec.
    pub fn name(self) -> &'static str {
        match self {
            Self::Brush => "brushSel",
            Self::Type => "typeSel",
            Self::Cost => "costSel",
            Self::Time => "timeSel",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Selection {
    type Err = permitlens_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|selection| selection.name() == s)
            .ok_or_else(|| permitlens_core::Error::not_found("selection", s))
    }
}
