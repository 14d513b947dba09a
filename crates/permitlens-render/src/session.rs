//! Dashboard session: UI state, render orchestration, and the change listener.
//!
//! The session owns everything that would otherwise be global page state: the
//! year selector's value, the mount point, and whatever selection values the
//! host reports back. Every render rebuilds the spec from scratch; the
//! [`SelectionPolicy`] decides whether recorded selections survive that.
//!
//! ```
//! use permitlens_core::DashboardConfig;
//! use permitlens_render::{DashboardSession, MemoryMount, MountPoint};
//!
//! let config = DashboardConfig::default();
//! let mount = MemoryMount::new(&config.ui.mount_id);
//! let mut session = DashboardSession::new(config, mount).unwrap();
//!
//! session.render().unwrap();
//! session.on_year_change("2020").unwrap();
//! assert_eq!(session.mount().child_count(), 1);
//! assert_eq!(session.render_count(), 2);
//! ```

use crate::embed::{EmbedOptions, Renderer, VegaEmbedRenderer};
use crate::mount::{MountPoint, MountScope};
use permitlens_core::config::UiConfig;
use permitlens_core::{DashboardConfig, Result, SelectionPolicy, YearSelection};
use permitlens_spec::{Selection, SpecBuilder};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// YearSelector
// ============================================================================

/// State of the year `<select>` control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YearSelector {
    id: String,
    options: Vec<String>,
    value: YearSelection,
}

impl YearSelector {
    /// Selector from the `[ui]` section, initially showing all years.
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            id: ui.selector_id.clone(),
            options: ui.selector_options(),
            value: YearSelection::All,
        }
    }

    /// Element id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Option values, `"all"` first.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Current value.
    pub fn value(&self) -> &YearSelection {
        &self.value
    }

    /// Set the raw control value. Returns `true` if it changed.
    pub fn set_value(&mut self, raw: &str) -> bool {
        let next = YearSelection::from_input(Some(raw));
        let changed = next != self.value;
        self.value = next;
        changed
    }
}

// ============================================================================
// DashboardSession
// ============================================================================

/// Outcome of one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderReport {
    /// Year the spec was built for.
    pub year: YearSelection,
    /// Renders performed by the session so far, this one included.
    pub render_count: usize,
    /// Panels in interaction order.
    pub interaction_order: Vec<String>,
    /// Selections that were seeded with a recorded value.
    pub restored: Vec<Selection>,
}

/// A mounted, re-renderable dashboard.
#[derive(Debug)]
pub struct DashboardSession<M: MountPoint, R: Renderer = VegaEmbedRenderer> {
    config: DashboardConfig,
    selector: YearSelector,
    mount: M,
    renderer: R,
    policy: SelectionPolicy,
    recorded: BTreeMap<Selection, Value>,
    renders: usize,
}

impl<M: MountPoint> DashboardSession<M> {
    /// Session using the vega-embed renderer.
    pub fn new(config: DashboardConfig, mount: M) -> Result<Self> {
        Self::with_renderer(config, mount, VegaEmbedRenderer::new())
    }
}

impl<M: MountPoint, R: Renderer> DashboardSession<M, R> {
    /// Session with a custom renderer.
    pub fn with_renderer(config: DashboardConfig, mount: M, renderer: R) -> Result<Self> {
        config.validate()?;
        let selector = YearSelector::from_config(&config.ui);
        let policy = config.selection.policy;
        Ok(Self {
            config,
            selector,
            mount,
            renderer,
            policy,
            recorded: BTreeMap::new(),
            renders: 0,
        })
    }

    /// Build the spec for the current state and mount it, replacing whatever
    /// was mounted before.
    pub fn render(&mut self) -> Result<RenderReport> {
        let year = self.selector.value().clone();
        let scope = MountScope::acquire(&mut self.mount)?;

        let seeded: Vec<(Selection, Value)> = match self.policy {
            SelectionPolicy::Reset => Vec::new(),
            SelectionPolicy::Retain => self
                .recorded
                .iter()
                .map(|(selection, value)| (*selection, value.clone()))
                .collect(),
        };
        let restored = seeded.iter().map(|(selection, _)| *selection).collect();

        let (spec, graph) = SpecBuilder::new(&self.config)
            .with_year(year.clone())
            .with_initial_selections(seeded)
            .build_validated()?;

        let options = EmbedOptions::from_config(&self.config.ui);
        let visualization = self
            .renderer
            .render(&self.config.ui.mount_id, &spec, &options)?;
        scope.attach(visualization)?;

        self.renders += 1;
        tracing::info!(year = %year, render = self.renders, "dashboard rendered");

        Ok(RenderReport {
            year,
            render_count: self.renders,
            interaction_order: graph.interaction_order().to_vec(),
            restored,
        })
    }

    /// Change listener for the year selector: store the new value and
    /// re-render.
    pub fn on_year_change(&mut self, raw: &str) -> Result<RenderReport> {
        let changed = self.selector.set_value(raw);
        if changed && self.policy == SelectionPolicy::Reset && !self.recorded.is_empty() {
            tracing::debug!(dropped = self.recorded.len(), "year changed, resetting selections");
            self.recorded.clear();
        }
        self.render()
    }

    /// Record the live value of a selection as reported by the engine.
    pub fn record_selection(&mut self, selection: Selection, value: Value) {
        self.recorded.insert(selection, value);
    }

    /// Forget a recorded selection.
    pub fn clear_selection(&mut self, selection: Selection) -> Option<Value> {
        self.recorded.remove(&selection)
    }

    /// Recorded selection values.
    pub fn recorded_selections(&self) -> &BTreeMap<Selection, Value> {
        &self.recorded
    }

    /// Current selection policy.
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Switch the selection policy for subsequent renders.
    pub fn set_policy(&mut self, policy: SelectionPolicy) {
        self.policy = policy;
    }

    /// The year selector state.
    pub fn selector(&self) -> &YearSelector {
        &self.selector
    }

    /// The mount point.
    pub fn mount(&self) -> &M {
        &self.mount
    }

    /// Consume the session, returning the mount point.
    pub fn into_mount(self) -> M {
        self.mount
    }

    /// The configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Renders performed so far.
    pub fn render_count(&self) -> usize {
        self.renders
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::embed::Visualization;
    use crate::mount::MemoryMount;
    use permitlens_spec::ViewSpec;
    use permitlens_spec::builder::panels;
    use serde_json::json;

    fn session() -> DashboardSession<MemoryMount> {
        DashboardSession::new(DashboardConfig::default(), MemoryMount::new("vis")).unwrap()
    }

    fn current_spec(session: &DashboardSession<MemoryMount>) -> ViewSpec {
        session.mount().current().unwrap().spec.clone()
    }

    #[test]
    fn test_selector_defaults() {
        let selector = YearSelector::from_config(&UiConfig::default());
        assert_eq!(selector.id(), "yearSelector");
        assert_eq!(selector.options()[0], "all");
        assert!(selector.value().is_all());
    }

    #[test]
    fn test_selector_set_value_reports_change() {
        let mut selector = YearSelector::from_config(&UiConfig::default());
        assert!(selector.set_value("2020"));
        assert!(!selector.set_value("2020"));
        assert!(selector.set_value("all"));
        assert!(!selector.set_value(""));
    }

    #[test]
    fn test_render_mounts_one_visualization() {
        let mut session = session();
        let report = session.render().unwrap();
        assert_eq!(report.render_count, 1);
        assert_eq!(report.interaction_order.len(), 5);
        assert_eq!(session.mount().child_count(), 1);
        assert!(session.mount().current().unwrap().script.contains("\"actions\":false"));
    }

    #[test]
    fn test_repeated_renders_never_stack() {
        let mut session = session();
        session.render().unwrap();
        session.render().unwrap();
        assert_eq!(session.mount().child_count(), 1);
        assert_eq!(session.render_count(), 2);
    }

    #[test]
    fn test_year_change_rebuilds_spec() {
        let mut session = session();
        session.render().unwrap();
        let report = session.on_year_change("2019").unwrap();
        assert_eq!(report.year, YearSelection::from(2019));

        let spec = current_spec(&session);
        assert!(
            spec.panel(panels::SCATTER)
                .unwrap()
                .expression_filters()
                .any(|expr| expr == "year(datum.ISSUE_DATE) == 2019")
        );
    }

    #[test]
    fn test_reset_policy_drops_selections_on_year_change() {
        let mut session = session();
        session.record_selection(Selection::Cost, json!({"x": [100, 5000]}));
        session.on_year_change("2020").unwrap();
        assert!(session.recorded_selections().is_empty());

        let report = session.on_year_change("all").unwrap();
        assert!(report.restored.is_empty());
        assert_eq!(session.mount().child_count(), 1);
        let spec = current_spec(&session);
        assert_eq!(spec.panel(panels::COST_HISTOGRAM).unwrap().params[0].value, None);
    }

    #[test]
    fn test_reset_policy_ignores_recorded_values_on_plain_render() {
        let mut session = session();
        session.record_selection(Selection::Brush, json!({"x": [0, 1], "y": [0, 1]}));
        let report = session.render().unwrap();
        assert!(report.restored.is_empty());
        let spec = current_spec(&session);
        assert_eq!(spec.panel(panels::SCATTER).unwrap().params[0].value, None);
    }

    #[test]
    fn test_retain_policy_restores_selections() {
        let mut config = DashboardConfig::default();
        config.selection.policy = SelectionPolicy::Retain;
        let mut session = DashboardSession::new(config, MemoryMount::new("vis")).unwrap();
        session.record_selection(Selection::Cost, json!({"x": [100, 5000]}));

        let report = session.on_year_change("2020").unwrap();
        assert_eq!(report.restored, [Selection::Cost]);
        let spec = current_spec(&session);
        assert_eq!(
            spec.panel(panels::COST_HISTOGRAM).unwrap().params[0].value,
            Some(json!({"x": [100, 5000]}))
        );

        session.clear_selection(Selection::Cost);
        session.render().unwrap();
        let spec = current_spec(&session);
        assert_eq!(spec.panel(panels::COST_HISTOGRAM).unwrap().params[0].value, None);
    }

    #[test]
    fn test_policy_can_be_switched() {
        let mut session = session();
        assert_eq!(session.policy(), SelectionPolicy::Reset);
        session.set_policy(SelectionPolicy::Retain);
        session.record_selection(Selection::Type, json!([{"PERMIT_TYPE": "PERMIT - WRECKING/DEMOLITION"}]));
        let report = session.render().unwrap();
        assert_eq!(report.restored, [Selection::Type]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = DashboardConfig::default();
        config.layout.scatter_width = 0;
        assert!(DashboardSession::new(config, MemoryMount::new("vis")).is_err());
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render(&self, mount_id: &str, _: &ViewSpec, _: &EmbedOptions) -> Result<Visualization> {
            Err(permitlens_core::Error::mount(mount_id, "engine rejected spec"))
        }
    }

    #[test]
    fn test_renderer_failure_propagates_and_leaves_mount_empty() {
        let mut session = DashboardSession::with_renderer(
            DashboardConfig::default(),
            MemoryMount::new("vis"),
            FailingRenderer,
        )
        .unwrap();
        let err = session.render().unwrap_err();
        assert!(err.to_string().contains("engine rejected spec"));
        assert_eq!(session.mount().child_count(), 0);
        assert_eq!(session.render_count(), 0);
    }
}
