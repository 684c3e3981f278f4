// Mermaid flowchart rendering of the topology graph

use crate::analysis::{NodeGroup, TopologyGraph};
use crate::config::{Style, Theme};

/// Renderer producing raw Mermaid flowchart text
///
/// Output order is fixed: theme directive, flowchart declaration, class
/// definitions (fancy only), one subgraph per group (compose, kubernetes,
/// external), edges in insertion order, optional legend. Rendering the same
/// graph twice yields byte-identical text.
pub struct MermaidRenderer {
    theme: Theme,
    style: Style,
    legend: bool,
}

impl MermaidRenderer {
    /// Create a renderer with default presentation options
    pub fn new() -> Self {
        Self {
            theme: Theme::Auto,
            style: Style::Fancy,
            legend: false,
        }
    }

    /// Set the color theme
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the styling level
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Request the legend sub-block (fancy style forces it on)
    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }

    /// Render the graph as Mermaid text
    pub fn render(&self, graph: &TopologyGraph) -> String {
        let mut lines = Vec::new();
        lines.push(theme_block(self.theme).to_string());
        lines.push("flowchart LR".to_string());

        let fancy = self.style != Style::Plain;
        if fancy {
            lines.push(
                "classDef compose fill:#0ea5e9,stroke:#0369a1,color:#ffffff,stroke-width:1px;"
                    .to_string(),
            );
            lines.push(
                "classDef k8s fill:#22c55e,stroke:#166534,color:#062616,stroke-width:1px;"
                    .to_string(),
            );
            lines.push(
                "classDef external fill:#e2e8f0,stroke:#64748b,color:#111827,stroke-width:1px;"
                    .to_string(),
            );
            lines.push("classDef public stroke-dasharray: 3 2,stroke-width:2px;".to_string());
            lines.push("classDef db fill:#fde68a,stroke:#b45309,color:#3b2f00;".to_string());
        }

        self.emit_group(&mut lines, graph, "Compose", NodeGroup::Compose, fancy);
        self.emit_group(&mut lines, graph, "Kubernetes", NodeGroup::K8s, fancy);
        self.emit_group(&mut lines, graph, "External", NodeGroup::External, fancy);

        for edge in &graph.edges {
            let label = edge.kind.label();
            let annot = if label.is_empty() {
                String::new()
            } else {
                format!("|{}|", esc(label))
            };
            lines.push(format!("  \"{}\" -->{} \"{}\"", edge.src, annot, edge.dst));
        }

        if self.legend || fancy {
            lines.push("  %% Legend".to_string());
            lines.push("  subgraph Legend".to_string());
            lines.push("    legend_compose[Compose]:::compose".to_string());
            lines.push("    legend_k8s[Kubernetes]:::k8s".to_string());
            lines.push("    legend_ext[External]:::external".to_string());
            lines.push("    legend_pub[Public Exposure]:::public".to_string());
            lines.push("    legend_db(DB Service):::db".to_string());
            lines.push("  end".to_string());
        }

        lines.join("\n")
    }

    fn emit_group(
        &self,
        lines: &mut Vec<String>,
        graph: &TopologyGraph,
        title: &str,
        group: NodeGroup,
        fancy: bool,
    ) {
        let nodes: Vec<_> = graph.group_nodes(group).collect();
        if nodes.is_empty() {
            return;
        }

        lines.push(format!("  subgraph {}", title));
        for node in nodes {
            // db nodes get the rounded shape
            let (open, close) = if node.has_tag("db") {
                ("(", ")")
            } else {
                ("[", "]")
            };
            lines.push(format!(
                "    \"{}\"{}{}{}",
                node.id,
                open,
                esc(&node.label),
                close
            ));
            if fancy {
                lines.push(format!("    class \"{}\" {};", node.id, node.group.as_str()));
                if node.has_tag("public") {
                    lines.push(format!("    class \"{}\" public;", node.id));
                }
                if node.has_tag("db") {
                    lines.push(format!("    class \"{}\" db;", node.id));
                }
            }
        }
        lines.push("  end".to_string());
    }
}

impl Default for MermaidRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the theme and produce its init directive line
///
/// `auto` picks dark when any of the environment signals is set to a
/// non-empty value, light otherwise.
fn theme_block(theme: Theme) -> &'static str {
    let resolved = match theme {
        Theme::Auto => {
            let dark = ["GITHUB_DARK_MODE", "DARK", "THEME_DARK"]
                .iter()
                .any(|key| std::env::var(key).map_or(false, |v| !v.is_empty()));
            if dark {
                Theme::Dark
            } else {
                Theme::Light
            }
        }
        other => other,
    };

    match resolved {
        Theme::Dark => {
            "%%{init: {'theme':'dark','flowchart':{'curve':'monotoneX'},'themeVariables':{'primaryColor':'#0ea5e9','primaryTextColor':'#ffffff','lineColor':'#38bdf8'}}}%%"
        }
        Theme::Light => {
            "%%{init: {'theme':'base','flowchart':{'curve':'monotoneX'},'themeVariables':{'primaryColor':'#0ea5e9','primaryTextColor':'#111827','lineColor':'#0ea5e9'}}}%%"
        }
        _ => "%%{init: {'flowchart': {'curve': 'monotoneX'}}}%%",
    }
}

/// Replace double quotes so labels cannot break the diagram string syntax
fn esc(text: &str) -> String {
    text.replace('"', "'")
}
