//! `spec`, `render`, `page` and `validate`.

use permitlens_core::{DashboardConfig, Error, Result, YearSelection};
use permitlens_render::{
    DashboardSession, FileMount, RenderReport, VegaEmbedRenderer, build_static_page,
};
use permitlens_spec::builder::fields;
use permitlens_spec::{SelectionEdge, SelectionGraph, SpecBuilder, ViewSpec};
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Parse a `--year` argument. Absent means all years.
pub fn parse_year(year: Option<&str>) -> Result<YearSelection> {
    year.map_or(Ok(YearSelection::All), YearSelection::parse_strict)
}

/// The validated spec as JSON.
pub fn spec_json(config: &DashboardConfig, year: Option<&str>, compact: bool) -> Result<String> {
    config.validate()?;
    let (spec, _) = SpecBuilder::new(config)
        .with_year(parse_year(year)?)
        .build_validated()?;
    let json = if compact {
        serde_json::to_string(&spec)?
    } else {
        serde_json::to_string_pretty(&spec)?
    };
    Ok(json)
}

/// Render through a session into `out`, replacing any previous render.
pub fn render_to_file(
    config: &DashboardConfig,
    year: Option<&str>,
    out: &Path,
) -> Result<RenderReport> {
    let year = parse_year(year)?;
    let mount = FileMount::new(&config.ui.mount_id, out);
    let mut session =
        DashboardSession::with_renderer(config.clone(), mount, VegaEmbedRenderer::pretty())?;
    session.on_year_change(year.selector_value())
}

/// Write the static HTML page to `out`.
pub fn write_page(config: &DashboardConfig, year: Option<&str>, out: &Path) -> Result<()> {
    let html = build_static_page(config, &parse_year(year)?)?;
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }
    std::fs::write(out, html).map_err(|e| Error::io_with_path(e, out))
}

/// Result of `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSummary {
    /// Panels in interaction order.
    pub order: Vec<String>,
    /// Selection edges, declaring panel first.
    pub edges: Vec<SelectionEdge>,
}

impl ValidationSummary {
    fn from_graph(graph: &SelectionGraph) -> Self {
        Self {
            order: graph.interaction_order().to_vec(),
            edges: graph.edges(),
        }
    }

    /// Human-readable report.
    pub fn render(&self) -> String {
        let mut out = format!("OK: {} panels, {} selection edges\n", self.order.len(), self.edges.len());
        out.push_str("Interaction order:\n");
        for (i, panel) in self.order.iter().enumerate() {
            out.push_str(&format!("  {}. {panel}\n", i + 1));
        }
        out.push_str("Edges:\n");
        for edge in &self.edges {
            out.push_str(&format!("  {} -[{}]-> {}\n", edge.from, edge.selection, edge.to));
        }
        out
    }
}

/// Validate the selection graph of `file`, or of the built spec.
pub fn validate(config: &DashboardConfig, file: Option<&Path>) -> Result<ValidationSummary> {
    let graph = match file {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
            let spec: ViewSpec = serde_json::from_str(&text)?;
            SelectionGraph::from_spec(&spec)?
        }
        None => {
            config.validate()?;
            SpecBuilder::new(config).build_validated()?.1
        }
    };
    Ok(ValidationSummary::from_graph(&graph))
}

/// Check that the records file under `data_dir` has every column the
/// dashboard reads. Returns the checked path.
pub fn check_records(config: &DashboardConfig, data_dir: &Path) -> Result<PathBuf> {
    let path = data_dir.join(&config.data.records_url);
    let file = std::fs::File::open(&path).map_err(|e| Error::io_with_path(e, &path))?;
    let mut header = String::new();
    std::io::BufReader::new(file)
        .read_line(&mut header)
        .map_err(|e| Error::io_with_path(e, &path))?;
    let missing = fields::missing_columns(&header);
    if !missing.is_empty() {
        return Err(Error::validation_field(
            "data.records_url",
            format!("{} lacks columns: {}", path.display(), missing.join(", ")),
        ));
    }
    Ok(path)
}
