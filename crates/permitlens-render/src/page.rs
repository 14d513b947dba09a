//! Standalone HTML page hosting the dashboard.
//!
//! The page carries the year selector, the mount element and a `change`
//! listener that empties the mount before embedding the spec for the newly
//! selected value. In [`PageMode::Static`] every option's spec is built ahead
//! of time and inlined; in [`PageMode::Live`] the listener fetches the spec
//! from an HTTP endpoint, which rebuilds it on each request.

use crate::embed::{EmbedOptions, script_json};
use permitlens_core::{DashboardConfig, Error, Result, YearSelection};
use permitlens_spec::{SpecBuilder, ViewSpec};
use std::collections::BTreeMap;

/// Script URLs for the rendering engine.
pub const VEGA_SCRIPTS: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/vega@5",
    "https://cdn.jsdelivr.net/npm/vega-lite@5",
    "https://cdn.jsdelivr.net/npm/vega-embed@6",
];

const PAGE_TITLE: &str = "Chicago Building Permits";

/// Where the page gets its specs from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageMode {
    /// Specs for every selector option are inlined.
    Static,
    /// Specs are fetched from `endpoint?year=...`.
    Live {
        /// Spec endpoint, e.g. `/api/spec`.
        endpoint: String,
    },
}

/// Page with all specs inlined, initially showing `year`.
pub fn build_static_page(config: &DashboardConfig, year: &YearSelection) -> Result<String> {
    build_page(config, year, &PageMode::Static)
}

/// Page that fetches specs from `endpoint`, initially showing `year`.
pub fn build_live_page(
    config: &DashboardConfig,
    year: &YearSelection,
    endpoint: &str,
) -> Result<String> {
    build_page(
        config,
        year,
        &PageMode::Live {
            endpoint: endpoint.to_string(),
        },
    )
}

/// Render the dashboard page.
pub fn build_page(config: &DashboardConfig, year: &YearSelection, mode: &PageMode) -> Result<String> {
    config.validate()?;
    let ui = &config.ui;
    let options = ui.selector_options();
    if !options.iter().any(|option| option == year.selector_value()) {
        return Err(Error::validation_field(
            "year",
            format!("'{year}' is not one of the selector options"),
        ));
    }

    let select: String = options
        .iter()
        .map(|option| {
            let selected = if option == year.selector_value() {
                " selected"
            } else {
                ""
            };
            let label = if option == permitlens_core::filter::ALL_YEARS {
                "All years"
            } else {
                option.as_str()
            };
            format!(
                "      <option value=\"{}\"{selected}>{}</option>\n",
                escape_html(option),
                escape_html(label),
            )
        })
        .collect();

    let script = match mode {
        PageMode::Static => static_script(config, &options)?,
        PageMode::Live { endpoint } => live_script(config, endpoint)?,
    };

    let scripts: String = VEGA_SCRIPTS
        .iter()
        .map(|src| format!("  <script src=\"{src}\"></script>\n"))
        .collect();

    tracing::debug!(year = %year, options = options.len(), "built dashboard page");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
{scripts}</head>
<body>
  <h1>{title}</h1>
  <label for="{selector}">Year:
    <select id="{selector}">
{select}    </select>
  </label>
  <div id="{mount}"></div>
  <script>
{script}  </script>
</body>
</html>
"#,
        title = PAGE_TITLE,
        selector = escape_html(&ui.selector_id),
        mount = escape_html(&ui.mount_id),
    ))
}

fn static_script(config: &DashboardConfig, options: &[String]) -> Result<String> {
    let mut specs: BTreeMap<&str, ViewSpec> = BTreeMap::new();
    for option in options {
        let (spec, _) = SpecBuilder::new(config)
            .with_year(YearSelection::from_input(Some(option)))
            .build_validated()?;
        specs.insert(option, spec);
    }
    Ok(format!(
        r#"    const SPECS = {specs};
    function renderAll() {{
      const year = document.getElementById({selector}).value;
      document.getElementById({mount}).innerHTML = "";
      vegaEmbed({target}, SPECS[year] || SPECS["all"], {options});
    }}
    renderAll();
    document.getElementById({selector}).addEventListener("change", renderAll);
"#,
        specs = script_json(&specs)?,
        selector = script_json(&config.ui.selector_id)?,
        mount = script_json(&config.ui.mount_id)?,
        target = script_json(&format!("#{}", config.ui.mount_id))?,
        options = script_json(&EmbedOptions::from_config(&config.ui))?,
    ))
}

fn live_script(config: &DashboardConfig, endpoint: &str) -> Result<String> {
    if endpoint.is_empty() {
        return Err(Error::validation_field("endpoint", "must not be empty"));
    }
    Ok(format!(
        r#"    async function renderAll() {{
      const year = document.getElementById({selector}).value;
      const response = await fetch({endpoint} + "?year=" + encodeURIComponent(year));
      const mount = document.getElementById({mount});
      if (!response.ok) {{
        mount.textContent = "Failed to load spec: " + response.status;
        return;
      }}
      const spec = await response.json();
      mount.innerHTML = "";
      await vegaEmbed({target}, spec, {options});
    }}
    renderAll();
    document.getElementById({selector}).addEventListener("change", renderAll);
"#,
        selector = script_json(&config.ui.selector_id)?,
        endpoint = script_json(endpoint)?,
        mount = script_json(&config.ui.mount_id)?,
        target = script_json(&format!("#{}", config.ui.mount_id))?,
        options = script_json(&EmbedOptions::from_config(&config.ui))?,
    ))
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
