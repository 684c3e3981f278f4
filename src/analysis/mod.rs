// Analysis module: discovery, scanning, and topology graph assembly

pub mod graph;
pub mod linker;

pub use graph::*;
pub use linker::*;

use crate::config::Config;
use crate::error::Result;
use crate::scanner::{
    ComposeScanner, EnvSniffer, ManifestKind, ManifestScanner, PackageProfile, PackageSniffer,
};
use indexmap::IndexSet;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of scanning a repository
#[derive(Debug)]
pub struct AnalysisResult {
    /// The assembled topology graph
    pub graph: TopologyGraph,
    /// Counts of what the scan looked at
    pub sources: SourceStats,
}

/// Counts of discovered sources, for verbose reporting
#[derive(Debug, Clone, Default)]
pub struct SourceStats {
    /// Compose files found at the root
    pub compose_files: usize,
    /// Manifest files found under the conventional directories
    pub manifest_files: usize,
    /// Distinct database/broker labels hinted by env files
    pub env_hints: usize,
    /// Frameworks detected in the package manifest
    pub frameworks: usize,
}

/// Main analyzer that orchestrates the scan pipeline
pub struct Analyzer {
    config: Config,
    compose: ComposeScanner,
    manifests: ManifestScanner,
    packages: PackageSniffer,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            compose: ComposeScanner::new()?,
            manifests: ManifestScanner::new()?,
            packages: PackageSniffer::new()?,
            config,
        })
    }

    /// Scan the repository at `root` and assemble the topology graph
    ///
    /// Missing or unreadable sources degrade to "no data"; the result is a
    /// renderable graph even when empty.
    pub fn analyze(&self, root: &Path) -> Result<AnalysisResult> {
        let compose_files = self.discover_compose_files(root)?;
        let manifest_files = self.discover_manifest_files(root);
        let profile = self.packages.sniff(&root.join("package.json"));
        let env_hints = EnvSniffer::new()
            .with_cap(self.config.scan.env_file_cap)
            .sniff(root);

        let mut graph = TopologyGraph::new();
        let mut exposed = false;

        // Compose services: nodes, ports, startup dependencies.
        for path in &compose_files {
            let Ok(text) = std::fs::read_to_string(path) else {
                continue;
            };
            for (name, svc) in self.compose.scan(&text) {
                let id = node_id(NodeGroup::Compose, &name);
                let host_ports: BTreeSet<String> =
                    svc.ports.iter().map(|(host, _)| host.clone()).collect();
                let label = service_label(&name, &host_ports);

                let node = graph.upsert(&id, &label, NodeGroup::Compose);
                for port in &host_ports {
                    node.add_port(port.clone());
                }
                if !host_ports.is_empty() {
                    node.tag("public");
                    exposed = true;
                }

                for dep in &svc.depends {
                    let dep_id = node_id(NodeGroup::Compose, dep);
                    graph.upsert(&dep_id, dep, NodeGroup::Compose);
                    graph.link(id.as_str(), dep_id, EdgeKind::DependsOn);
                }
            }
        }

        // Manifest units: nodes plus name pools for convention linking.
        let mut svc_names: IndexSet<String> = IndexSet::new();
        let mut workload_names: IndexSet<String> = IndexSet::new();
        let mut ingress_names: IndexSet<String> = IndexSet::new();

        for path in &manifest_files {
            let Ok(text) = std::fs::read_to_string(path) else {
                continue;
            };
            for unit in self.manifests.scan(&text) {
                let id = node_id(NodeGroup::K8s, &unit.name);
                let label = service_label(&unit.name, &unit.ports);

                let node = graph.upsert(&id, &label, NodeGroup::K8s);
                node.set_meta("kind", unit.kind.as_str());
                for port in &unit.ports {
                    node.add_port(port.clone());
                }

                if unit.kind == ManifestKind::Service {
                    node.tag("svc");
                    if unit.svc_type.is_some() {
                        node.tag("public");
                        exposed = true;
                    }
                    svc_names.insert(unit.name.clone());
                } else if unit.kind.is_workload() {
                    node.tag("workload");
                    workload_names.insert(unit.name.clone());
                } else if unit.kind == ManifestKind::Ingress {
                    node.tag("ingress").tag("public");
                    exposed = true;
                    ingress_names.insert(unit.name.clone());
                }
            }
        }

        // Service -> workload and ingress -> service convention links.
        for name in &svc_names {
            if let Some(found) =
                first_variant_match(name, workload_names.iter().map(String::as_str))
            {
                graph.link(
                    node_id(NodeGroup::K8s, name),
                    node_id(NodeGroup::K8s, found),
                    EdgeKind::Selects,
                );
            }
        }
        for name in &ingress_names {
            if let Some(found) = first_variant_match(name, svc_names.iter().map(String::as_str)) {
                graph.link(
                    node_id(NodeGroup::K8s, name),
                    node_id(NodeGroup::K8s, found),
                    EdgeKind::Routes,
                );
            }
        }

        // External databases/brokers. Every label gets a node, but only the
        // alphabetically first one receives the uses edges.
        for label in &env_hints {
            let id = node_id(NodeGroup::External, &label.to_lowercase());
            graph.upsert(&id, label, NodeGroup::External).tag("db");
        }
        if let Some(first) = env_hints.iter().next() {
            let target = node_id(NodeGroup::External, &first.to_lowercase());
            let consumers: Vec<String> = graph
                .iter_nodes()
                .filter(|n| {
                    n.group == NodeGroup::Compose
                        || (n.group == NodeGroup::K8s
                            && (n.has_tag("svc") || n.has_tag("workload")))
                })
                .map(|n| n.id.clone())
                .collect();
            for id in consumers {
                graph.link(id, target.as_str(), EdgeKind::Uses);
            }
        }

        // Internet exposure.
        if exposed {
            let internet = node_id(NodeGroup::External, "internet");
            graph
                .upsert(&internet, "Internet", NodeGroup::External)
                .tag("public");
            let public: Vec<String> = graph
                .iter_nodes()
                .filter(|n| n.has_tag("public") && n.id != internet)
                .map(|n| n.id.clone())
                .collect();
            for id in public {
                graph.link(internet.as_str(), id, EdgeKind::Exposes);
            }
        }

        graph.summary = build_summary(&graph, &profile);

        let sources = SourceStats {
            compose_files: compose_files.len(),
            manifest_files: manifest_files.len(),
            env_hints: env_hints.len(),
            frameworks: profile.frameworks.len(),
        };

        Ok(AnalysisResult { graph, sources })
    }

    /// Find compose files directly under the root
    fn discover_compose_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let pattern = root.join("docker-compose*.y*ml").to_string_lossy().to_string();
        let mut files: Vec<PathBuf> = glob::glob(&pattern)?.filter_map(|p| p.ok()).collect();
        files.sort();
        Ok(files)
    }

    /// Find manifest files under the conventional directories, recursively
    fn discover_manifest_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for dir in &self.config.scan.manifest_dirs {
            let base = root.join(dir);
            if !base.is_dir() {
                continue;
            }
            let mut found: Vec<PathBuf> = WalkDir::new(&base)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| !e.path().is_dir())
                .filter(|e| {
                    matches!(
                        e.path().extension().and_then(|x| x.to_str()),
                        Some("yml") | Some("yaml")
                    )
                })
                .map(|e| e.path().to_path_buf())
                .collect();
            found.sort();
            files.extend(found);
        }
        files
    }
}

/// Label used for a service node: the bare name, or `name:p1,p2` with sorted
/// ports
fn service_label(name: &str, ports: &BTreeSet<String>) -> String {
    if ports.is_empty() {
        name.to_string()
    } else {
        let csv: Vec<&str> = ports.iter().map(String::as_str).collect();
        format!("{}:{}", name, csv.join(","))
    }
}

/// Derive the one-line summary shown under rendered diagrams
fn build_summary(graph: &TopologyGraph, profile: &PackageProfile) -> String {
    let stats = graph.stats();
    let frameworks = if profile.frameworks.is_empty() {
        "n/a".to_string()
    } else {
        profile.frameworks.join(", ")
    };

    let mut summary = format!(
        "Compose: {} · K8s: {} · External: {} · Frameworks: {}",
        stats.compose, stats.k8s, stats.external, frameworks
    );
    if let Some(port) = &profile.app_port {
        summary.push_str(&format!(" · App port: {}", port));
    }
    if stats.public > 0 {
        summary.push_str(&format!(" · Public endpoints: {}", stats.public));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_analyzer() -> Analyzer {
        Analyzer::new(Config::default()).unwrap()
    }

    fn create_test_repo() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::write(
            dir.path().join("docker-compose.yml"),
            r#"services:
  web:
    image: nginx
    ports:
      - "8080:80"
    depends_on:
      - db
  db:
    image: postgres:15
"#,
        )
        .unwrap();

        let k8s = dir.path().join("k8s");
        fs::create_dir_all(&k8s).unwrap();
        fs::write(
            k8s.join("orders.yaml"),
            r#"kind: Deployment
metadata:
  name: orders-api
spec:
  containers:
    - containerPort: 8080
---
kind: Service
metadata:
  name: orders-svc
spec:
  ports:
    - port: 80
  type: LoadBalancer
"#,
        )
        .unwrap();

        fs::write(dir.path().join(".env"), "REDIS_URL=redis://cache:6379\n").unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "dependencies": { "express": "^4.18.0" },
                "scripts": { "start": "PORT=3000 node server.js" } }"#,
        )
        .unwrap();

        dir
    }

    #[test]
    fn test_analyzer_new() {
        let analyzer = Analyzer::new(Config::default());
        assert!(analyzer.is_ok());
    }

    #[test]
    fn test_empty_directory_yields_empty_graph() {
        let dir = TempDir::new().unwrap();
        let result = create_analyzer().analyze(dir.path()).unwrap();

        assert!(result.graph.nodes.is_empty());
        assert!(result.graph.edges.is_empty());
        assert_eq!(
            result.graph.summary,
            "Compose: 0 · K8s: 0 · External: 0 · Frameworks: n/a"
        );
    }

    #[test]
    fn test_compose_port_marks_public_and_internet() {
        let dir = create_test_repo();
        let result = create_analyzer().analyze(dir.path()).unwrap();
        let graph = &result.graph;

        let web = graph.get("compose:web").unwrap();
        assert!(web.ports.contains("8080"));
        assert!(web.has_tag("public"));

        assert!(graph.get("ext:internet").is_some());
        assert!(graph.edges.iter().any(|e| {
            e.src == "ext:internet" && e.dst == "compose:web" && e.kind == EdgeKind::Exposes
        }));
    }

    #[test]
    fn test_compose_dependency_edge() {
        let dir = create_test_repo();
        let result = create_analyzer().analyze(dir.path()).unwrap();

        assert!(result.graph.get("compose:db").is_some());
        assert!(result.graph.edges.iter().any(|e| {
            e.src == "compose:web" && e.dst == "compose:db" && e.kind == EdgeKind::DependsOn
        }));
    }

    #[test]
    fn test_dependency_only_name_gets_placeholder_node() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("docker-compose.yml"),
            "services:\n  api:\n    depends_on:\n      - queue\n",
        )
        .unwrap();

        let result = create_analyzer().analyze(dir.path()).unwrap();
        let queue = result.graph.get("compose:queue").unwrap();
        assert_eq!(queue.label, "queue");
        assert_eq!(queue.group, NodeGroup::Compose);
    }

    #[test]
    fn test_service_selects_workload_by_convention() {
        let dir = create_test_repo();
        let result = create_analyzer().analyze(dir.path()).unwrap();

        let svc = result.graph.get("k8s:orders-svc").unwrap();
        assert!(svc.has_tag("svc"));
        assert!(svc.has_tag("public"));
        assert!(result.graph.edges.iter().any(|e| {
            e.src == "k8s:orders-svc" && e.dst == "k8s:orders-api" && e.kind == EdgeKind::Selects
        }));
    }

    #[test]
    fn test_ingress_routes_to_service() {
        let dir = TempDir::new().unwrap();
        let k8s = dir.path().join("k8s");
        fs::create_dir_all(&k8s).unwrap();
        fs::write(
            k8s.join("all.yaml"),
            "kind: Service\nmetadata:\n  name: shop-svc\n---\nkind: Ingress\nmetadata:\n  name: shop\n",
        )
        .unwrap();

        let result = create_analyzer().analyze(dir.path()).unwrap();
        let ingress = result.graph.get("k8s:shop").unwrap();
        assert!(ingress.has_tag("ingress"));
        assert!(ingress.has_tag("public"));
        assert!(result.graph.edges.iter().any(|e| {
            e.src == "k8s:shop" && e.dst == "k8s:shop-svc" && e.kind == EdgeKind::Routes
        }));
    }

    #[test]
    fn test_env_hints_attach_only_first_label() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("docker-compose.yml"),
            "services:\n  api:\n    image: app\n",
        )
        .unwrap();
        fs::write(dir.path().join(".env"), "REDIS_URL=x\n").unwrap();
        fs::write(dir.path().join(".env.prod"), "MONGO_URL=y\n").unwrap();

        let result = create_analyzer().analyze(dir.path()).unwrap();
        let graph = &result.graph;

        assert!(graph.get("ext:mongodb").unwrap().has_tag("db"));
        assert!(graph.get("ext:redis").unwrap().has_tag("db"));

        let uses: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Uses)
            .collect();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].src, "compose:api");
        assert_eq!(uses[0].dst, "ext:mongodb");
    }

    #[test]
    fn test_summary_lists_frameworks_and_port() {
        let dir = create_test_repo();
        let result = create_analyzer().analyze(dir.path()).unwrap();

        let summary = &result.graph.summary;
        assert!(summary.contains("Frameworks: express"));
        assert!(summary.contains("App port: 3000"));
        assert!(summary.contains("Public endpoints:"));
    }

    #[test]
    fn test_discover_compose_files_matches_variants() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("docker-compose.yml"), "services:\n").unwrap();
        fs::write(dir.path().join("docker-compose.override.yaml"), "services:\n").unwrap();
        fs::write(dir.path().join("compose.yml"), "services:\n").unwrap();

        let files = create_analyzer().discover_compose_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_discover_manifest_files_recursive() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deploy").join("base");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("app.yaml"), "kind: Deployment\n").unwrap();
        fs::write(nested.join("notes.txt"), "ignore me\n").unwrap();

        let files = create_analyzer().discover_manifest_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app.yaml"));
    }

    #[test]
    fn test_source_stats() {
        let dir = create_test_repo();
        let result = create_analyzer().analyze(dir.path()).unwrap();

        assert_eq!(result.sources.compose_files, 1);
        assert_eq!(result.sources.manifest_files, 1);
        assert_eq!(result.sources.env_hints, 1);
        assert_eq!(result.sources.frameworks, 1);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let dir = create_test_repo();
        let analyzer = create_analyzer();

        let a = analyzer.analyze(dir.path()).unwrap();
        let b = analyzer.analyze(dir.path()).unwrap();

        let ids_a: Vec<_> = a.graph.iter_nodes().map(|n| n.id.clone()).collect();
        let ids_b: Vec<_> = b.graph.iter_nodes().map(|n| n.id.clone()).collect();
        assert_eq!(ids_a, ids_b);
        assert_eq!(a.graph.edges.len(), b.graph.edges.len());
        assert_eq!(a.graph.summary, b.graph.summary);
    }
}
