// Kubernetes manifest scanner: per-line probes over ---separated documents

use crate::error::Result;
use regex::Regex;
use std::collections::BTreeSet;

/// Manifest kinds the scanner recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    Service,
    Ingress,
}

impl ManifestKind {
    /// Map a `kind:` value to a known kind
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Deployment" => Some(ManifestKind::Deployment),
            "StatefulSet" => Some(ManifestKind::StatefulSet),
            "DaemonSet" => Some(ManifestKind::DaemonSet),
            "Service" => Some(ManifestKind::Service),
            "Ingress" => Some(ManifestKind::Ingress),
            _ => None,
        }
    }

    /// Whether this kind runs replicas (Deployment/StatefulSet/DaemonSet)
    pub fn is_workload(&self) -> bool {
        matches!(
            self,
            ManifestKind::Deployment | ManifestKind::StatefulSet | ManifestKind::DaemonSet
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestKind::Deployment => "Deployment",
            ManifestKind::StatefulSet => "StatefulSet",
            ManifestKind::DaemonSet => "DaemonSet",
            ManifestKind::Service => "Service",
            ManifestKind::Ingress => "Ingress",
        }
    }
}

/// Facts extracted from one manifest document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestUnit {
    pub kind: ManifestKind,
    pub name: String,
    pub ports: BTreeSet<String>,
    /// Service type when it marks public exposure (LoadBalancer/NodePort)
    pub svc_type: Option<String>,
    pub ingress: bool,
}

/// Scanner for Kubernetes-style manifest files
///
/// Documents are scanned line by line with no indentation tracking; a
/// document yields a unit only when both a recognized `kind:` and a `name:`
/// were found.
pub struct ManifestScanner {
    doc_split: Regex,
    kind: Regex,
    name: Regex,
    container_port: Regex,
    port: Regex,
    svc_type: Regex,
}

impl ManifestScanner {
    /// Create a new manifest scanner
    pub fn new() -> Result<Self> {
        Ok(Self {
            doc_split: Regex::new(r"\n---\s*\n")?,
            kind: Regex::new(
                r"^\s*kind\s*:\s*(Deployment|StatefulSet|DaemonSet|Service|Ingress)\s*$",
            )?,
            name: Regex::new(r"^\s*name\s*:\s*([a-z0-9\-_.]+)\s*$")?,
            container_port: Regex::new(r"containerPort\s*:\s*(\d+)")?,
            port: Regex::new(r"\bport\s*:\s*(\d+)")?,
            svc_type: Regex::new(r"(?i)\btype\s*:\s*(LoadBalancer|NodePort)\b")?,
        })
    }

    /// Extract units from manifest text, in document order
    pub fn scan(&self, text: &str) -> Vec<ManifestUnit> {
        let docs: Vec<&str> = if text.contains("---") {
            self.doc_split.split(text).collect()
        } else {
            vec![text]
        };

        let mut units = Vec::new();
        for doc in docs {
            if let Some(unit) = self.scan_document(doc) {
                units.push(unit);
            }
        }
        units
    }

    fn scan_document(&self, doc: &str) -> Option<ManifestUnit> {
        let mut kind: Option<ManifestKind> = None;
        let mut name: Option<String> = None;
        let mut ports = BTreeSet::new();
        let mut svc_type: Option<String> = None;
        let mut ingress = false;

        for line in doc.lines() {
            if let Some(caps) = self.kind.captures(line) {
                if let Some(k) = ManifestKind::from_name(&caps[1]) {
                    kind = Some(k);
                    if k == ManifestKind::Ingress {
                        ingress = true;
                    }
                }
                continue;
            }

            // First name: wins; later occurrences (labels, port names) are
            // ignored.
            if name.is_none() {
                if let Some(caps) = self.name.captures(line) {
                    name = Some(caps[1].to_string());
                    continue;
                }
            }

            if let Some(caps) = self.container_port.captures(line) {
                ports.insert(caps[1].to_string());
                continue;
            }

            // Bare port: lines count only once the document is known to be a
            // Service.
            if kind == Some(ManifestKind::Service) {
                if let Some(caps) = self.port.captures(line) {
                    ports.insert(caps[1].to_string());
                    continue;
                }
                if let Some(caps) = self.svc_type.captures(line) {
                    svc_type = Some(caps[1].to_string());
                }
            }
        }

        match (kind, name) {
            (Some(kind), Some(name)) => Some(ManifestUnit {
                kind,
                name,
                ports,
                svc_type,
                ingress,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<ManifestUnit> {
        ManifestScanner::new().unwrap().scan(text)
    }

    #[test]
    fn test_deployment_with_container_port() {
        let text = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: orders-api
spec:
  template:
    spec:
      containers:
        - name: app
          ports:
            - containerPort: 8080
"#;
        let units = scan(text);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].kind, ManifestKind::Deployment);
        assert_eq!(units[0].name, "orders-api");
        assert!(units[0].ports.contains("8080"));
        assert!(!units[0].ingress);
    }

    #[test]
    fn test_document_requires_kind_and_name() {
        assert!(scan("kind: Deployment\nspec: {}\n").is_empty());
        assert!(scan("metadata:\n  name: lonely\n").is_empty());
    }

    #[test]
    fn test_unrecognized_kind_is_skipped() {
        let text = "kind: ConfigMap\nmetadata:\n  name: settings\n";
        assert!(scan(text).is_empty());
    }

    #[test]
    fn test_first_name_wins() {
        let text = r#"
kind: Deployment
metadata:
  name: billing
spec:
  containers:
    - name: sidecar
"#;
        let units = scan(text);
        assert_eq!(units[0].name, "billing");
    }

    #[test]
    fn test_multi_document_split() {
        let text = "kind: Deployment\nmetadata:\n  name: a\n---\nkind: Service\nmetadata:\n  name: b\n";
        let units = scan(text);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name, "a");
        assert_eq!(units[1].name, "b");
    }

    #[test]
    fn test_service_port_credited() {
        let text = "kind: Service\nmetadata:\n  name: web\nspec:\n  ports:\n    - port: 80\n";
        let units = scan(text);
        assert!(units[0].ports.contains("80"));
    }

    #[test]
    fn test_bare_port_ignored_for_workloads() {
        let text = "kind: Deployment\nmetadata:\n  name: web\nspec:\n  - port: 80\n";
        let units = scan(text);
        assert!(units[0].ports.is_empty());
    }

    #[test]
    fn test_service_type_marks_exposure() {
        let text = "kind: Service\nmetadata:\n  name: payments\nspec:\n  type: LoadBalancer\n";
        let units = scan(text);
        assert_eq!(units[0].svc_type.as_deref(), Some("LoadBalancer"));
    }

    #[test]
    fn test_service_type_is_case_insensitive() {
        let text = "kind: Service\nmetadata:\n  name: web\nspec:\n  type: nodeport\n";
        let units = scan(text);
        assert_eq!(units[0].svc_type.as_deref(), Some("nodeport"));
    }

    #[test]
    fn test_cluster_ip_is_not_exposure() {
        let text = "kind: Service\nmetadata:\n  name: web\nspec:\n  type: ClusterIP\n";
        let units = scan(text);
        assert!(units[0].svc_type.is_none());
    }

    #[test]
    fn test_ingress_flag() {
        let text = "kind: Ingress\nmetadata:\n  name: edge\n";
        let units = scan(text);
        assert!(units[0].ingress);
        assert_eq!(units[0].kind, ManifestKind::Ingress);
    }

    #[test]
    fn test_is_workload_predicate() {
        assert!(ManifestKind::Deployment.is_workload());
        assert!(ManifestKind::StatefulSet.is_workload());
        assert!(ManifestKind::DaemonSet.is_workload());
        assert!(!ManifestKind::Service.is_workload());
        assert!(!ManifestKind::Ingress.is_workload());
    }
}
