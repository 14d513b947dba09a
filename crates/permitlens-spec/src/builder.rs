//! Spec Builder for the permits dashboard.
//!
//! Produces the full Vega-Lite specification from configuration and the
//! current year selection. Building is pure and infallible; call
//! [`SpecBuilder::build_validated`] to also check the selection graph.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────┬──────────────┐
//! │ scatter      │ permit types │   brushSel → typeSel
//! ├──────────────┴──────────────┤
//! │ community map               │   ← brush, type, cost, time
//! ├──────────────┬──────────────┤
//! │ cost hist.   │ time series  │   costSel → timeSel
//! └──────────────┴──────────────┘
//! ```

use crate::graph::SelectionGraph;
use crate::selection::Selection;
use crate::types::{
    AggregateOp, AggregatedField, Axis, Bin, Channel, ChannelDef, Data, Encoding, FieldType,
    LookupData, MarkDef, MarkType, Panel, Projection, Scale, SelectionParam, Transform, ViewNode,
    ViewSpec,
};
use permitlens_core::{DashboardConfig, Result, YearSelection};
use serde_json::Value;
use std::collections::BTreeMap;

/// Record columns the dashboard reads.
pub mod fields {
    /// Permit identifier.
    pub const RECORD_ID: &str = "RECORD_ID";
    /// Permit type (category).
    pub const PERMIT_TYPE: &str = "PERMIT_TYPE";
    /// Work type.
    pub const WORK_TYPE: &str = "WORK_TYPE";
    /// Community area display name.
    pub const COMMUNITY_AREA_NAME: &str = "COMMUNITY_AREA_NAME";
    /// Upper-cased community name, the join key into the boundaries.
    pub const COMMUNITY_UPPER: &str = "COMMUNITY_UPPER";
    /// Reported cost as a numeric string.
    pub const REPORTED_COST: &str = "REPORTED_COST";
    /// Issue timestamp.
    pub const ISSUE_DATE: &str = "ISSUE_DATE";
    /// Embedding x.
    pub const X: &str = "x";
    /// Embedding y.
    pub const Y: &str = "y";
    /// Boundary feature key.
    pub const COMMUNITY_KEY: &str = "properties.community";

    /// Every column the records file must provide.
    pub const REQUIRED: [&str; 9] = [
        RECORD_ID,
        PERMIT_TYPE,
        WORK_TYPE,
        COMMUNITY_AREA_NAME,
        COMMUNITY_UPPER,
        REPORTED_COST,
        ISSUE_DATE,
        X,
        Y,
    ];

    /// Required columns absent from a CSV header line, in [`REQUIRED`] order.
    pub fn missing_columns(header: &str) -> Vec<&'static str> {
        let present: Vec<&str> = header
            .trim_end_matches(['\r', '\n'])
            .split(',')
            .map(|column| column.trim().trim_matches('"'))
            .collect();
        REQUIRED
            .into_iter()
            .filter(|column| !present.contains(column))
            .collect()
    }
}

/// Panel names, in document order.
pub mod panels {
    /// Embedding scatter plot.
    pub const SCATTER: &str = "scatter";
    /// Permit type bar chart.
    pub const PERMIT_TYPES: &str = "permit_types";
    /// Community choropleth.
    pub const COMMUNITY_MAP: &str = "community_map";
    /// Reported cost histogram.
    pub const COST_HISTOGRAM: &str = "cost_histogram";
    /// Monthly permit counts.
    pub const TIME_SERIES: &str = "time_series";

    /// All five panels.
    pub const ALL: [&str; 5] = [SCATTER, PERMIT_TYPES, COMMUNITY_MAP, COST_HISTOGRAM, TIME_SERIES];
}

const HIGHLIGHT: &str = "#e67e22";
const HISTOGRAM_FILL: &str = "#16a085";
const LINE_COLOR: &str = "#2c7fb8";
const MONTH_FORMAT: &str = "%b %Y";
const MONEY_FORMAT: &str = ",.0f";
const COST: &str = "COST";
const PERMIT_COUNT: &str = "PermitCount";
const MONTH: &str = "YM";
const MONTHLY_PERMITS: &str = "Permits";

/// Builds dashboard specifications.
#[derive(Clone, Debug)]
pub struct SpecBuilder<'a> {
    config: &'a DashboardConfig,
    year: YearSelection,
    initial: BTreeMap<Selection, Value>,
}

impl<'a> SpecBuilder<'a> {
    /// Creates a builder showing all years with empty selections.
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self {
            config,
            year: YearSelection::All,
            initial: BTreeMap::new(),
        }
    }

    /// Sets the year selection.
    pub fn with_year(mut self, year: YearSelection) -> Self {
        self.year = year;
        self
    }

    /// Seeds one selection with an initial value.
    pub fn with_initial_selection(mut self, selection: Selection, value: Value) -> Self {
        self.initial.insert(selection, value);
        self
    }

    /// Seeds several selections with initial values.
    pub fn with_initial_selections(
        mut self,
        values: impl IntoIterator<Item = (Selection, Value)>,
    ) -> Self {
        self.initial.extend(values);
        self
    }

    /// The year this builder filters on.
    pub fn year(&self) -> &YearSelection {
        &self.year
    }

    /// Assemble the specification.
    pub fn build(&self) -> ViewSpec {
        let year_filter = self.year.predicate();
        tracing::debug!(year = %self.year, predicate = %year_filter, "building dashboard spec");

        ViewSpec {
            schema: self.config.data.schema_url.clone(),
            data: Some(self.records()),
            vconcat: vec![
                ViewNode::row([
                    self.scatter(&year_filter),
                    self.permit_types(&year_filter),
                ]),
                self.community_map(&year_filter).into(),
                ViewNode::row([
                    self.cost_histogram(&year_filter),
                    self.time_series(&year_filter),
                ]),
            ],
        }
    }

    /// Assemble the specification and validate its selection graph.
    pub fn build_validated(&self) -> Result<(ViewSpec, SelectionGraph)> {
        let spec = self.build();
        let graph = SelectionGraph::from_spec(&spec)?;
        Ok((spec, graph))
    }

    // ------------------------------------------------------------------------
    // Panels
    // ------------------------------------------------------------------------

    fn scatter(&self, year_filter: &str) -> Panel {
        let layout = &self.config.layout;
        Panel::new(
            panels::SCATTER,
            MarkDef {
                size: Some(40.0),
                filled: Some(true),
                ..MarkDef::new(MarkType::Point)
            },
        )
        .with_size(layout.scatter_width, layout.scatter_height)
        .with_transform(Transform::filter_expr(year_filter))
        .with_param(self.param(Selection::Brush))
        .with_encoding(Encoding {
            x: Some(
                ChannelDef::field(fields::X, FieldType::Quantitative)
                    .with_axis(Axis::titled("Embedding X (PCA)")),
            ),
            y: Some(
                ChannelDef::field(fields::Y, FieldType::Quantitative)
                    .with_axis(Axis::titled("Embedding Y (PCA)")),
            ),
            color: Some(ChannelDef::field(fields::PERMIT_TYPE, FieldType::Nominal)),
            opacity: Some(
                ChannelDef::default()
                    .when(Selection::Brush.name(), 1)
                    .otherwise(0.15),
            ),
            tooltip: vec![
                ChannelDef::untyped(fields::RECORD_ID).with_title("Permit ID"),
                ChannelDef::untyped(fields::PERMIT_TYPE).with_title("Permit Type"),
                ChannelDef::untyped(fields::WORK_TYPE).with_title("Work Type"),
                ChannelDef::untyped(fields::COMMUNITY_AREA_NAME).with_title("Community"),
                ChannelDef::field(fields::REPORTED_COST, FieldType::Quantitative)
                    .with_title("Cost")
                    .with_format(MONEY_FORMAT),
                ChannelDef::field(fields::ISSUE_DATE, FieldType::Temporal)
                    .with_title("Issue Date"),
            ],
            ..Default::default()
        })
        .with_title("Embedding Space — Brush to Filter")
    }

    fn permit_types(&self, year_filter: &str) -> Panel {
        let layout = &self.config.layout;
        Panel::new(panels::PERMIT_TYPES, MarkType::Bar)
            .with_size(layout.bar_width, layout.scatter_height)
            .with_transform(Transform::filter_expr(year_filter))
            .with_transform(Transform::filter_param(Selection::Brush.name()))
            .with_param(self.param(Selection::Type))
            .with_encoding(Encoding {
                x: Some(
                    ChannelDef::field(fields::PERMIT_TYPE, FieldType::Nominal)
                        .with_sort("-y")
                        .with_axis(Axis {
                            label_limit: Some(100),
                            ..Axis::titled("Permit Type")
                        }),
                ),
                y: Some(
                    ChannelDef::aggregate(AggregateOp::Count)
                        .with_type(FieldType::Quantitative)
                        .with_title("Count"),
                ),
                color: Some(
                    ChannelDef::field(fields::PERMIT_TYPE, FieldType::Nominal)
                        .without_legend()
                        .when(Selection::Type.name(), HIGHLIGHT),
                ),
                tooltip: vec![
                    ChannelDef::untyped(fields::PERMIT_TYPE).with_title("Permit Type"),
                    ChannelDef::aggregate(AggregateOp::Count).with_title("Permit Count"),
                ],
                ..Default::default()
            })
            .with_title("Permit Types (Click to Filter)")
    }

    fn community_map(&self, year_filter: &str) -> Panel {
        let layout = &self.config.layout;
        let data = &self.config.data;
        let mut panel = Panel::new(
            panels::COMMUNITY_MAP,
            MarkDef {
                stroke: Some("white".to_string()),
                stroke_width: Some(1.0),
                ..MarkDef::new(MarkType::Geoshape)
            },
        )
        .with_size(layout.map_width(), layout.map_height)
        .with_data(Data::json_property(
            &data.boundaries_url,
            &data.boundaries_property,
        ))
        .with_transform(Transform::Lookup {
            lookup: fields::COMMUNITY_KEY.to_string(),
            from: LookupData {
                data: self.records(),
                key: fields::COMMUNITY_UPPER.to_string(),
                fields: [
                    fields::ISSUE_DATE,
                    fields::PERMIT_TYPE,
                    fields::X,
                    fields::Y,
                    fields::REPORTED_COST,
                ]
                .map(String::from)
                .to_vec(),
            },
        })
        .with_transform(Transform::filter_expr(year_filter));

        for selection in Selection::ALL {
            panel = panel.with_transform(Transform::filter_param(selection.name()));
        }

        panel
            .with_transform(Transform::JoinAggregate {
                joinaggregate: vec![AggregatedField::count(PERMIT_COUNT)],
                groupby: vec![fields::COMMUNITY_KEY.to_string()],
            })
            .with_encoding(Encoding {
                color: Some(
                    ChannelDef::field(PERMIT_COUNT, FieldType::Quantitative)
                        .with_title("Permits")
                        .with_scale(Scale {
                            scheme: "blues".to_string(),
                        }),
                ),
                tooltip: vec![
                    ChannelDef::untyped(fields::COMMUNITY_KEY).with_title("Community"),
                    ChannelDef::untyped(PERMIT_COUNT)
                        .with_title("Permits")
                        .with_format(MONEY_FORMAT),
                ],
                ..Default::default()
            })
            .with_projection(Projection::mercator())
            .with_title("Permit Distribution by Community Area")
    }

    fn cost_histogram(&self, year_filter: &str) -> Panel {
        let layout = &self.config.layout;
        let cost = &self.config.cost;
        Panel::new(panels::COST_HISTOGRAM, MarkType::Bar)
            .with_size(layout.scatter_width, layout.bar_height)
            .with_transform(Transform::filter_expr(year_filter))
            .with_transform(Transform::filter_param(Selection::Brush.name()))
            .with_transform(Transform::filter_param(Selection::Type.name()))
            .with_transform(Transform::calculate(
                format!("toNumber(datum.{})", fields::REPORTED_COST),
                COST,
            ))
            .with_transform(Transform::filter_expr(format!(
                "isValid(datum.{COST}) && datum.{COST} > 0 && datum.{COST} <= {}",
                cost.max_cost
            )))
            .with_param(self.param(Selection::Cost))
            .with_encoding(Encoding {
                x: Some(
                    ChannelDef::field(COST, FieldType::Quantitative)
                        .with_bin(Bin {
                            maxbins: cost.max_bins,
                        })
                        .with_title("Reported Cost ($)"),
                ),
                y: Some(
                    ChannelDef::aggregate(AggregateOp::Count)
                        .with_type(FieldType::Quantitative)
                        .with_title("Permits"),
                ),
                color: Some(
                    ChannelDef::value(HISTOGRAM_FILL).when(Selection::Cost.name(), HIGHLIGHT),
                ),
                tooltip: vec![
                    ChannelDef::aggregate(AggregateOp::Count).with_title("Permits"),
                    ChannelDef::untyped(COST)
                        .with_aggregate(AggregateOp::Mean)
                        .with_title("Avg Cost")
                        .with_format(MONEY_FORMAT),
                ],
                ..Default::default()
            })
            .with_title("Cost Distribution (Brush to Filter)")
    }

    fn time_series(&self, year_filter: &str) -> Panel {
        let layout = &self.config.layout;
        Panel::new(
            panels::TIME_SERIES,
            MarkDef {
                point: Some(true),
                color: Some(LINE_COLOR.to_string()),
                ..MarkDef::new(MarkType::Line)
            },
        )
        .with_size(layout.bar_width, layout.bar_height)
        .with_transform(Transform::filter_expr(year_filter))
        .with_transform(Transform::filter_param(Selection::Brush.name()))
        .with_transform(Transform::filter_param(Selection::Type.name()))
        .with_transform(Transform::filter_param(Selection::Cost.name()))
        .with_transform(Transform::TimeUnit {
            time_unit: "yearmonth".to_string(),
            field: fields::ISSUE_DATE.to_string(),
            output: MONTH.to_string(),
        })
        .with_transform(Transform::Aggregate {
            aggregate: vec![AggregatedField::count(MONTHLY_PERMITS)],
            groupby: vec![MONTH.to_string()],
        })
        .with_param(self.param(Selection::Time))
        .with_encoding(Encoding {
            x: Some(ChannelDef::field(MONTH, FieldType::Temporal).with_axis(Axis {
                format: Some(MONTH_FORMAT.to_string()),
                ..Axis::titled("Month")
            })),
            y: Some(
                ChannelDef::field(MONTHLY_PERMITS, FieldType::Quantitative)
                    .with_title("Permit Count"),
            ),
            stroke_width: Some(
                ChannelDef::default()
                    .when(Selection::Time.name(), 4)
                    .otherwise(2),
            ),
            tooltip: vec![
                ChannelDef::field(MONTH, FieldType::Temporal)
                    .with_title("Month")
                    .with_format(MONTH_FORMAT),
                ChannelDef::field(MONTHLY_PERMITS, FieldType::Quantitative)
                    .with_title("Permits Issued"),
            ],
            ..Default::default()
        })
        .with_title("Permits Over Time (Brush to Filter)")
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn records(&self) -> Data {
        Data::url(&self.config.data.records_url)
    }

    fn param(&self, selection: Selection) -> SelectionParam {
        let param = match selection {
            Selection::Brush => SelectionParam::interval(selection.name(), &[Channel::X, Channel::Y]),
            Selection::Type => SelectionParam::point(selection.name(), &[fields::PERMIT_TYPE]),
            Selection::Cost | Selection::Time => {
                SelectionParam::interval(selection.name(), &[Channel::X])
            }
        };
        match self.initial.get(&selection) {
            Some(value) => param.with_value(value.clone()),
            None => param,
        }
    }
}

/// Build the dashboard spec for a year with default (empty) selections.
pub fn build_spec(config: &DashboardConfig, year: YearSelection) -> ViewSpec {
    SpecBuilder::new(config).with_year(year).build()
}

// ============================================================================
// Tests
// ============================================================================
