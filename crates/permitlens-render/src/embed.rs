//! Handing a spec to the rendering engine.
//!
//! The engine itself (vega-embed in a browser) is external. A [`Renderer`]
//! turns a spec into a [`Visualization`]: the serialized spec plus the
//! embed call that mounts it.

use permitlens_core::config::UiConfig;
use permitlens_core::{Error, Result};
use permitlens_spec::ViewSpec;
use serde::{Deserialize, Serialize};

/// Options passed to `vegaEmbed`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedOptions {
    /// Show the export/edit action menu.
    pub actions: bool,
}

impl EmbedOptions {
    /// Options from the `[ui]` config section.
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            actions: ui.actions,
        }
    }
}

/// A rendered dashboard, ready to attach to a mount point.
#[derive(Clone, Debug, PartialEq)]
pub struct Visualization {
    /// Element id this visualization targets.
    pub mount_id: String,
    /// The spec it was rendered from.
    pub spec: ViewSpec,
    /// Serialized spec.
    pub spec_json: String,
    /// JavaScript statement that embeds the spec.
    pub script: String,
}

/// Turns specs into visualizations.
pub trait Renderer {
    /// Render `spec` for the element `mount_id`.
    fn render(
        &self,
        mount_id: &str,
        spec: &ViewSpec,
        options: &EmbedOptions,
    ) -> Result<Visualization>;
}

/// Renderer producing `vegaEmbed(...)` calls.
#[derive(Clone, Debug, Default)]
pub struct VegaEmbedRenderer {
    pretty: bool,
}

impl VegaEmbedRenderer {
    /// Compact JSON output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Renderer for VegaEmbedRenderer {
    fn render(
        &self,
        mount_id: &str,
        spec: &ViewSpec,
        options: &EmbedOptions,
    ) -> Result<Visualization> {
        if mount_id.is_empty() {
            return Err(Error::validation_field("mount_id", "must not be empty"));
        }
        let spec_json = if self.pretty {
            serde_json::to_string_pretty(spec)?
        } else {
            serde_json::to_string(spec)?
        };
        let script = format!(
            "vegaEmbed({}, {}, {});",
            script_json(&format!("#{mount_id}"))?,
            escape_script(&spec_json),
            script_json(options)?,
        );
        tracing::debug!(mount = mount_id, bytes = spec_json.len(), "rendered visualization");
        Ok(Visualization {
            mount_id: mount_id.to_string(),
            spec: spec.clone(),
            spec_json,
            script,
        })
    }
}

/// Serialize `value` as JSON that is safe inside an HTML `<script>` element.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(escape_script(&serde_json::to_string(value)?))
}

/// Escape JSON text for inclusion in a `<script>` element.
///
/// `<` only occurs inside JSON strings, where `<` is equivalent, so
/// `</script>` and `<!--` cannot terminate the element early.
pub fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}
