//! Typed Vega-Lite model.
//!
//! Only the subset of Vega-Lite v5 the dashboard uses is modelled. Field
//! names serialize to Vega-Lite's camelCase JSON; absent optionals are
//! skipped so the output reads like a hand-written spec.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Root and layout
// ============================================================================

/// Root of a dashboard specification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewSpec {
    /// Vega-Lite schema URL.
    #[serde(rename = "$schema")]
    pub schema: String,
    /// Data inherited by every panel that does not declare its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
    /// Rows, top to bottom.
    pub vconcat: Vec<ViewNode>,
}

impl ViewSpec {
    /// Every leaf panel in document order.
    pub fn panels(&self) -> Vec<&Panel> {
        let mut out = Vec::new();
        for node in &self.vconcat {
            node.collect_panels(&mut out);
        }
        out
    }

    /// Look up a leaf panel by name.
    pub fn panel(&self, name: &str) -> Option<&Panel> {
        self.panels()
            .into_iter()
            .find(|panel| panel.name.as_deref() == Some(name))
    }

    /// Serialize to a JSON value.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// A node in the layout tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ViewNode {
    /// Views stacked vertically.
    VConcat {
        /// Children, top to bottom.
        vconcat: Vec<ViewNode>,
    },
    /// Views placed side by side.
    HConcat {
        /// Children, left to right.
        hconcat: Vec<ViewNode>,
    },
    /// A single chart.
    Panel(Box<Panel>),
}

impl ViewNode {
    /// Horizontal concatenation of panels.
    pub fn row(panels: impl IntoIterator<Item = Panel>) -> Self {
        Self::HConcat {
            hconcat: panels.into_iter().map(Self::from).collect(),
        }
    }

    fn collect_panels<'a>(&'a self, out: &mut Vec<&'a Panel>) {
        match self {
            Self::VConcat { vconcat: children } | Self::HConcat { hconcat: children } => {
                for child in children {
                    child.collect_panels(out);
                }
            }
            Self::Panel(panel) => out.push(panel),
        }
    }
}

impl From<Panel> for ViewNode {
    fn from(panel: Panel) -> Self {
        Self::Panel(Box::new(panel))
    }
}

// ============================================================================
// Panel
// ============================================================================

/// One chart: data, transforms, selections, mark, and encoding.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Stable panel name, used by the selection graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Panel-local data source, overriding the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
    /// Transform pipeline, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transform: Vec<Transform>,
    /// Selection parameters declared by this panel.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<SelectionParam>,
    /// Mark.
    pub mark: Mark,
    /// Visual encoding.
    #[serde(default)]
    pub encoding: Encoding,
    /// Cartographic projection (geoshape panels).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    /// Panel title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Panel {
    /// Creates a panel with the given name and mark.
    pub fn new(name: impl Into<String>, mark: impl Into<Mark>) -> Self {
        Self {
            name: Some(name.into()),
            mark: mark.into(),
            ..Default::default()
        }
    }

    /// Sets width and height.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets a panel-local data source.
    pub fn with_data(mut self, data: Data) -> Self {
        self.data = Some(data);
        self
    }

    /// Appends a transform step.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform.push(transform);
        self
    }

    /// Declares a selection parameter.
    pub fn with_param(mut self, param: SelectionParam) -> Self {
        self.params.push(param);
        self
    }

    /// Sets the encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the projection.
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Name used in diagnostics; falls back to the title.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("<unnamed>")
    }

    /// Names of the selections this panel declares.
    pub fn declared_selections(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|param| param.name.as_str())
    }

    /// Names of the selections this panel filters on, in transform order.
    pub fn filter_selections(&self) -> impl Iterator<Item = &str> {
        self.transform.iter().filter_map(|step| match step {
            Transform::Filter {
                filter: Predicate::Param { param },
            } => Some(param.as_str()),
            _ => None,
        })
    }

    /// Names of the selections this panel's encoding conditions test.
    pub fn condition_selections(&self) -> Vec<&str> {
        self.encoding
            .channels()
            .filter_map(|channel| channel.condition.as_ref())
            .map(|condition| condition.param.as_str())
            .collect()
    }

    /// Expression filters (not selection filters), in transform order.
    pub fn expression_filters(&self) -> impl Iterator<Item = &str> {
        self.transform.iter().filter_map(|step| match step {
            Transform::Filter {
                filter: Predicate::Expr(expr),
            } => Some(expr.as_str()),
            _ => None,
        })
    }
}

// ============================================================================
// Data
// ============================================================================

/// A URL data source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data {
    /// Relative or absolute URL.
    pub url: String,
    /// Parsing hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DataFormat>,
}

impl Data {
    /// Data loaded from a URL with inferred format.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: None,
        }
    }

    /// JSON data whose records live under `property`.
    pub fn json_property(url: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: Some(DataFormat {
                format_type: "json".to_string(),
                property: Some(property.into()),
            }),
        }
    }
}

/// Data format hints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFormat {
    /// Format name (`json`, `csv`, ...).
    #[serde(rename = "type")]
    pub format_type: String,
    /// Property holding the record array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

// ============================================================================
// Transforms
// ============================================================================

/// A data transform step.
///
/// Variants are told apart by their required key, mirroring Vega-Lite's own
/// JSON shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Transform {
    /// Keep rows matching the predicate.
    Filter {
        /// Predicate.
        filter: Predicate,
    },
    /// Derive a field from an expression.
    Calculate {
        /// Vega expression.
        calculate: String,
        /// Output field.
        #[serde(rename = "as")]
        output: String,
    },
    /// Join fields from a secondary source.
    Lookup {
        /// Key field in the primary data.
        lookup: String,
        /// Secondary source.
        from: LookupData,
    },
    /// Bucket a temporal field.
    TimeUnit {
        /// Time unit (`yearmonth`, ...).
        #[serde(rename = "timeUnit")]
        time_unit: String,
        /// Input field.
        field: String,
        /// Output field.
        #[serde(rename = "as")]
        output: String,
    },
    /// Group and aggregate, replacing rows.
    Aggregate {
        /// Aggregations.
        aggregate: Vec<AggregatedField>,
        /// Grouping fields.
        groupby: Vec<String>,
    },
    /// Group and aggregate, keeping rows.
    JoinAggregate {
        /// Aggregations.
        joinaggregate: Vec<AggregatedField>,
        /// Grouping fields.
        groupby: Vec<String>,
    },
}

impl Transform {
    /// Filter on a Vega expression.
    pub fn filter_expr(expr: impl Into<String>) -> Self {
        Self::Filter {
            filter: Predicate::Expr(expr.into()),
        }
    }

    /// Filter on a selection parameter.
    pub fn filter_param(param: impl Into<String>) -> Self {
        Self::Filter {
            filter: Predicate::Param {
                param: param.into(),
            },
        }
    }

    /// Derive `output` from `expr`.
    pub fn calculate(expr: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Calculate {
            calculate: expr.into(),
            output: output.into(),
        }
    }
}

/// Filter predicate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Predicate {
    /// Vega expression string.
    Expr(String),
    /// Membership in a selection.
    Param {
        /// Selection name.
        param: String,
    },
}

/// Secondary data for a lookup transform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupData {
    /// Source.
    pub data: Data,
    /// Key in the secondary source.
    pub key: String,
    /// Fields to copy over.
    pub fields: Vec<String>,
}

/// One aggregation inside an aggregate or joinaggregate transform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedField {
    /// Operation.
    pub op: AggregateOp,
    /// Input field (absent for `count`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Output field.
    #[serde(rename = "as")]
    pub output: String,
}

impl AggregatedField {
    /// Row count into `output`.
    pub fn count(output: impl Into<String>) -> Self {
        Self {
            op: AggregateOp::Count,
            field: None,
            output: output.into(),
        }
    }
}

/// Aggregate operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    /// Number of rows.
    Count,
    /// Arithmetic mean.
    Mean,
    /// Sum.
    Sum,
    /// Median.
    Median,
    /// Minimum.
    Min,
    /// Maximum.
    Max,
}

// ============================================================================
// Selections
// ============================================================================

/// A named selection parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionParam {
    /// Parameter name.
    pub name: String,
    /// Selection definition.
    pub select: SelectionDef,
    /// Initial value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl SelectionParam {
    /// Interval selection over the given encoding channels.
    pub fn interval(name: impl Into<String>, encodings: &[Channel]) -> Self {
        Self {
            name: name.into(),
            select: SelectionDef {
                kind: SelectionKind::Interval,
                encodings: Some(encodings.to_vec()),
                fields: None,
            },
            value: None,
        }
    }

    /// Point selection projected over fields.
    pub fn point(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            select: SelectionDef {
                kind: SelectionKind::Point,
                encodings: None,
                fields: Some(fields.iter().map(ToString::to_string).collect()),
            },
            value: None,
        }
    }

    /// Sets the initial value.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

/// How a selection is made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionDef {
    /// Point or interval.
    #[serde(rename = "type")]
    pub kind: SelectionKind,
    /// Channels the selection projects over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encodings: Option<Vec<Channel>>,
    /// Fields the selection projects over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// Selection type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    /// Click selection of discrete values.
    Point,
    /// Brush over a continuous range.
    Interval,
}

/// Encoding channel name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Color.
    Color,
    /// Opacity.
    Opacity,
    /// Stroke width.
    StrokeWidth,
}

// ============================================================================
// Marks
// ============================================================================

/// Mark type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    /// Scatter points.
    #[default]
    Point,
    /// Bars.
    Bar,
    /// Lines.
    Line,
    /// Geographic shapes.
    Geoshape,
}

/// A mark: bare type name or full definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mark {
    /// `"bar"`
    Type(MarkType),
    /// `{"type": "bar", ...}`
    Def(MarkDef),
}

impl Default for Mark {
    fn default() -> Self {
        Self::Type(MarkType::default())
    }
}

impl Mark {
    /// The mark type regardless of form.
    pub fn mark_type(&self) -> MarkType {
        match self {
            Self::Type(kind) => *kind,
            Self::Def(def) => def.kind,
        }
    }
}

impl From<MarkType> for Mark {
    fn from(kind: MarkType) -> Self {
        Self::Type(kind)
    }
}

impl From<MarkDef> for Mark {
    fn from(def: MarkDef) -> Self {
        Self::Def(def)
    }
}

/// Mark definition with properties.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkDef {
    /// Mark type.
    #[serde(rename = "type")]
    pub kind: MarkType,
    /// Point area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Fill point symbols.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filled: Option<bool>,
    /// Stroke color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Stroke width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// Overlay points on a line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<bool>,
    /// Fixed color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl MarkDef {
    /// Definition with only the type set.
    pub fn new(kind: MarkType) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }
}

/// Map projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    /// Projection name (`mercator`, ...).
    #[serde(rename = "type")]
    pub kind: String,
}

impl Projection {
    /// Web Mercator.
    pub fn mercator() -> Self {
        Self {
            kind: "mercator".to_string(),
        }
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Channel → definition map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encoding {
    /// Horizontal position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<ChannelDef>,
    /// Vertical position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<ChannelDef>,
    /// Color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ChannelDef>,
    /// Opacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<ChannelDef>,
    /// Stroke width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<ChannelDef>,
    /// Tooltip fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tooltip: Vec<ChannelDef>,
}

impl Encoding {
    /// Every defined channel, tooltips last.
    pub fn channels(&self) -> impl Iterator<Item = &ChannelDef> {
        [
            &self.x,
            &self.y,
            &self.color,
            &self.opacity,
            &self.stroke_width,
        ]
        .into_iter()
        .flatten()
        .chain(self.tooltip.iter())
    }
}

/// Semantic type of an encoded field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Continuous numbers.
    Quantitative,
    /// Unordered categories.
    Nominal,
    /// Ordered categories.
    Ordinal,
    /// Dates and times.
    Temporal,
}

/// One channel definition.
///
/// A single struct covers field definitions, value definitions, and
/// conditional definitions; Vega-Lite distinguishes them by which keys are
/// present.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelDef {
    /// Data field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Semantic type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// Aggregate applied to the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateOp>,
    /// Binning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<Bin>,
    /// Sort order (`"-y"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Axis properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
    /// Scale properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    /// Legend: absent for default, `Some(None)` to hide it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub legend: Option<Option<Legend>>,
    /// Title (channel title or tooltip label).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// d3 format string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Value applied when the selection matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Constant value (or fallback when a condition is set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ChannelDef {
    /// A typed field definition.
    pub fn field(field: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: Some(field.into()),
            field_type: Some(field_type),
            ..Default::default()
        }
    }

    /// An untyped field, as used in tooltips.
    pub fn untyped(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Default::default()
        }
    }

    /// An aggregate-only definition (no field), e.g. `count`.
    pub fn aggregate(op: AggregateOp) -> Self {
        Self {
            aggregate: Some(op),
            ..Default::default()
        }
    }

    /// A constant value.
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Sets the semantic type.
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the format string.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the axis.
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Sets the sort order.
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Sets binning.
    pub fn with_bin(mut self, bin: Bin) -> Self {
        self.bin = Some(bin);
        self
    }

    /// Sets the scale.
    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Sets the aggregate.
    pub fn with_aggregate(mut self, op: AggregateOp) -> Self {
        self.aggregate = Some(op);
        self
    }

    /// Hides the legend.
    pub fn without_legend(mut self) -> Self {
        self.legend = Some(None);
        self
    }

    /// Adds a selection condition.
    pub fn when(mut self, param: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition = Some(Condition {
            param: param.into(),
            value: value.into(),
        });
        self
    }

    /// Sets the fallback value.
    pub fn otherwise(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Value applied while a selection matches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Selection name.
    pub param: String,
    /// Value when selected.
    pub value: Value,
}

/// Binning parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bin {
    /// Upper bound on the number of bins.
    pub maxbins: u32,
}

/// Axis properties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    /// Axis title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Label format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Maximum label width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_limit: Option<u32>,
}

impl Axis {
    /// Axis with a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

/// Scale properties.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    /// Named color scheme.
    pub scheme: String,
}

/// Legend properties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    /// Legend title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Keeps an explicit `null` distinct from an absent key.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Tests
// ============================================================================
