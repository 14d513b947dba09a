//! Selection dependency graph.
//!
//! Panels are nodes. An edge `A → B` labelled `sel` means panel `A` declares
//! selection `sel` and panel `B` filters on it. Building the graph checks the
//! wiring that the rendering engine would otherwise ignore silently:
//!
//! - every referenced selection (filter or encoding condition) is declared;
//! - no selection is declared twice;
//! - filter references are acyclic, including self-filtering.
//!
//! On success the graph yields the interaction order: the panels sorted so
//! that every panel comes after the panels whose selections filter it.

use crate::types::{Panel, ViewSpec};
use permitlens_core::{Error, Result};
use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// One declares → filters relation between two panels.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SelectionEdge {
    /// Declaring panel.
    pub from: String,
    /// Filtered panel.
    pub to: String,
    /// Selection name.
    pub selection: String,
}

/// Validated selection wiring of a dashboard spec.
#[derive(Clone, Debug)]
pub struct SelectionGraph {
    graph: DiGraph<String, String>,
    node_indices: HashMap<String, NodeIndex>,
    declared_by: BTreeMap<String, String>,
    order: Vec<String>,
}

impl SelectionGraph {
    /// Build and validate the graph for a whole spec.
    pub fn from_spec(spec: &ViewSpec) -> Result<Self> {
        Self::from_panels(spec.panels())
    }

    /// Build and validate the graph for a set of panels.
    pub fn from_panels<'a>(panels: impl IntoIterator<Item = &'a Panel>) -> Result<Self> {
        let panels: Vec<&Panel> = panels.into_iter().collect();
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        // Phase 1: nodes
        for panel in &panels {
            let label = panel.label().to_string();
            if node_indices.contains_key(&label) {
                return Err(Error::validation_field(
                    "name",
                    format!("panel name '{label}' is used more than once"),
                ));
            }
            let idx = graph.add_node(label.clone());
            node_indices.insert(label, idx);
        }

        // Phase 2: declarations
        let mut declarations: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for panel in &panels {
            for name in panel.declared_selections() {
                declarations
                    .entry(name.to_string())
                    .or_default()
                    .push(panel.label().to_string());
            }
        }
        let mut declared_by = BTreeMap::new();
        for (name, owners) in declarations {
            if owners.len() > 1 {
                return Err(Error::DuplicateSelection {
                    name,
                    panels: owners,
                });
            }
            if let Some(owner) = owners.into_iter().next() {
                declared_by.insert(name, owner);
            }
        }

        // Phase 3: references
        let mut seen: HashSet<(String, String, String)> = HashSet::new();
        for panel in &panels {
            let label = panel.label();
            for name in panel.filter_selections() {
                let owner = declared_by
                    .get(name)
                    .ok_or_else(|| Error::UndeclaredSelection {
                        name: name.to_string(),
                        panel: label.to_string(),
                    })?;
                if owner == label {
                    return Err(Error::SelectionCycle {
                        panels: vec![label.to_string(), label.to_string()],
                    });
                }
                let key = (owner.clone(), label.to_string(), name.to_string());
                if !seen.insert(key) {
                    continue;
                }
                graph.add_edge(node_indices[owner], node_indices[label], name.to_string());
            }
            for name in panel.condition_selections() {
                if !declared_by.contains_key(name) {
                    return Err(Error::UndeclaredSelection {
                        name: name.to_string(),
                        panel: label.to_string(),
                    });
                }
            }
        }

        // Phase 4: ordering
        let order = match toposort(&graph, None) {
            Ok(sorted) => sorted.into_iter().map(|idx| graph[idx].clone()).collect(),
            Err(cycle) => return Err(cycle_error(&graph, cycle.node_id())),
        };

        tracing::debug!(
            panels = graph.node_count(),
            edges = graph.edge_count(),
            "selection graph validated"
        );

        Ok(Self {
            graph,
            node_indices,
            declared_by,
            order,
        })
    }

    /// Number of panels.
    pub fn panel_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of declares → filters edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Declared selection names, sorted.
    pub fn selections(&self) -> impl Iterator<Item = &str> {
        self.declared_by.keys().map(String::as_str)
    }

    /// The panel declaring `selection`.
    pub fn declaring_panel(&self, selection: &str) -> Option<&str> {
        self.declared_by.get(selection).map(String::as_str)
    }

    /// Panels in interaction order.
    pub fn interaction_order(&self) -> &[String] {
        &self.order
    }

    /// Selections filtering `panel`, with their declaring panels.
    pub fn upstream(&self, panel: &str) -> Result<Vec<SelectionEdge>> {
        self.edges_of(panel, Direction::Incoming)
    }

    /// Panels filtered by the selections `panel` declares.
    pub fn downstream(&self, panel: &str) -> Result<Vec<SelectionEdge>> {
        self.edges_of(panel, Direction::Outgoing)
    }

    /// Every edge, ordered by interaction order of the filtered panel.
    pub fn edges(&self) -> Vec<SelectionEdge> {
        let mut edges: Vec<SelectionEdge> = self
            .graph
            .edge_references()
            .map(|edge| self.to_edge(edge.source(), edge.target(), edge.weight()))
            .collect();
        edges.sort_by_key(|edge| (self.position(&edge.to), self.position(&edge.from)));
        edges
    }

    fn edges_of(&self, panel: &str, direction: Direction) -> Result<Vec<SelectionEdge>> {
        let idx = self
            .node_indices
            .get(panel)
            .copied()
            .ok_or_else(|| Error::not_found("panel", panel))?;
        let mut edges: Vec<SelectionEdge> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| self.to_edge(edge.source(), edge.target(), edge.weight()))
            .collect();
        edges.sort_by_key(|edge| (self.position(&edge.from), self.position(&edge.to)));
        Ok(edges)
    }

    fn to_edge(&self, from: NodeIndex, to: NodeIndex, selection: &str) -> SelectionEdge {
        SelectionEdge {
            from: self.graph[from].clone(),
            to: self.graph[to].clone(),
            selection: selection.to_string(),
        }
    }

    fn position(&self, panel: &str) -> usize {
        self.order
            .iter()
            .position(|name| name == panel)
            .unwrap_or(usize::MAX)
    }
}

fn cycle_error(graph: &DiGraph<String, String>, start: NodeIndex) -> Error {
    let component = tarjan_scc(graph)
        .into_iter()
        .find(|scc| scc.contains(&start))
        .unwrap_or_else(|| vec![start]);
    let mut panels: Vec<String> = component.iter().map(|idx| graph[*idx].clone()).collect();
    panels.sort();
    if let Some(first) = panels.first().cloned() {
        panels.push(first);
    }
    Error::SelectionCycle { panels }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builder::{build_spec, panels};
    use crate::types::{ChannelDef, Encoding, MarkType, SelectionParam, Transform};
    use permitlens_core::{DashboardConfig, YearSelection};

    fn dashboard_graph() -> SelectionGraph {
        let spec = build_spec(&DashboardConfig::default(), YearSelection::All);
        SelectionGraph::from_spec(&spec).unwrap()
    }

    fn panel(name: &str) -> Panel {
        Panel::new(name, MarkType::Bar)
    }

    #[test]
    fn test_dashboard_wiring() {
        let graph = dashboard_graph();
        assert_eq!(graph.panel_count(), 5);
        assert_eq!(
            graph.selections().collect::<Vec<_>>(),
            ["brushSel", "costSel", "timeSel", "typeSel"]
        );
        assert_eq!(graph.declaring_panel("brushSel"), Some(panels::SCATTER));
        assert_eq!(graph.declaring_panel("typeSel"), Some(panels::PERMIT_TYPES));
        assert_eq!(graph.declaring_panel("costSel"), Some(panels::COST_HISTOGRAM));
        assert_eq!(graph.declaring_panel("timeSel"), Some(panels::TIME_SERIES));
        // 1 (types) + 4 (map) + 2 (hist) + 3 (series)
        assert_eq!(graph.edge_count(), 10);
    }

    #[test]
    fn test_interaction_order() {
        let graph = dashboard_graph();
        assert_eq!(
            graph.interaction_order(),
            [
                panels::SCATTER,
                panels::PERMIT_TYPES,
                panels::COST_HISTOGRAM,
                panels::TIME_SERIES,
                panels::COMMUNITY_MAP,
            ]
        );
    }

    #[test]
    fn test_upstream_and_downstream() {
        let graph = dashboard_graph();
        let upstream: Vec<_> = graph
            .upstream(panels::TIME_SERIES)
            .unwrap()
            .into_iter()
            .map(|edge| edge.selection)
            .collect();
        assert_eq!(upstream, ["brushSel", "typeSel", "costSel"]);

        let downstream: Vec<_> = graph
            .downstream(panels::SCATTER)
            .unwrap()
            .into_iter()
            .map(|edge| edge.to)
            .collect();
        assert_eq!(
            downstream,
            [
                panels::PERMIT_TYPES,
                panels::COST_HISTOGRAM,
                panels::TIME_SERIES,
                panels::COMMUNITY_MAP,
            ]
        );
        assert!(graph.downstream(panels::COMMUNITY_MAP).unwrap().is_empty());
        assert!(graph.upstream("radar").is_err());
    }

    #[test]
    fn test_edges_sorted() {
        let graph = dashboard_graph();
        let edges = graph.edges();
        assert_eq!(edges.len(), 10);
        assert_eq!(
            edges[0],
            SelectionEdge {
                from: panels::SCATTER.to_string(),
                to: panels::PERMIT_TYPES.to_string(),
                selection: "brushSel".to_string(),
            }
        );
        assert_eq!(edges.last().unwrap().to, panels::COMMUNITY_MAP);
    }

    #[test]
    fn test_undeclared_filter_reference() {
        let a = panel("a").with_transform(Transform::filter_param("ghostSel"));
        let err = SelectionGraph::from_panels([&a]).unwrap_err();
        assert!(matches!(
            err,
            Error::UndeclaredSelection { ref name, ref panel } if name == "ghostSel" && panel == "a"
        ));
    }

    #[test]
    fn test_undeclared_condition_reference() {
        let a = panel("a").with_encoding(Encoding {
            color: Some(ChannelDef::default().when("ghostSel", "red")),
            ..Default::default()
        });
        let err = SelectionGraph::from_panels([&a]).unwrap_err();
        assert!(matches!(err, Error::UndeclaredSelection { .. }));
    }

    #[test]
    fn test_condition_on_own_selection_is_fine() {
        let a = panel("a")
            .with_param(SelectionParam::point("pick", &["k"]))
            .with_encoding(Encoding {
                color: Some(ChannelDef::default().when("pick", "red")),
                ..Default::default()
            });
        assert!(SelectionGraph::from_panels([&a]).is_ok());
    }

    #[test]
    fn test_duplicate_declaration() {
        let a = panel("a").with_param(SelectionParam::point("pick", &["k"]));
        let b = panel("b").with_param(SelectionParam::point("pick", &["k"]));
        let err = SelectionGraph::from_panels([&a, &b]).unwrap_err();
        let Error::DuplicateSelection { name, panels } = err else {
            unreachable!("Expected DuplicateSelection");
        };
        assert_eq!(name, "pick");
        assert_eq!(panels, ["a", "b"]);
    }

    #[test]
    fn test_self_filter_is_a_cycle() {
        let a = panel("a")
            .with_param(SelectionParam::point("pick", &["k"]))
            .with_transform(Transform::filter_param("pick"));
        let err = SelectionGraph::from_panels([&a]).unwrap_err();
        let Error::SelectionCycle { panels } = err else {
            unreachable!("Expected SelectionCycle");
        };
        assert_eq!(panels, ["a", "a"]);
    }

    #[test]
    fn test_two_panel_cycle() {
        let a = panel("a")
            .with_param(SelectionParam::point("pa", &["k"]))
            .with_transform(Transform::filter_param("pb"));
        let b = panel("b")
            .with_param(SelectionParam::point("pb", &["k"]))
            .with_transform(Transform::filter_param("pa"));
        let err = SelectionGraph::from_panels([&a, &b]).unwrap_err();
        let Error::SelectionCycle { panels } = err else {
            unreachable!("Expected SelectionCycle");
        };
        assert_eq!(panels, ["a", "b", "a"]);
    }

    #[test]
    fn test_duplicate_panel_names() {
        let a = panel("a");
        let b = panel("a");
        let err = SelectionGraph::from_panels([&a, &b]).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_repeated_filter_adds_one_edge() {
        let a = panel("a").with_param(SelectionParam::point("pick", &["k"]));
        let b = panel("b")
            .with_transform(Transform::filter_param("pick"))
            .with_transform(Transform::filter_param("pick"));
        let graph = SelectionGraph::from_panels([&a, &b]).unwrap();
        assert_eq!(graph.edge_count(), 1);
    }
}
