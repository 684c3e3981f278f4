// Compose file scanner: indentation-aware line patterns, no YAML parser

use crate::error::Result;
use indexmap::IndexMap;
use regex::Regex;

/// Facts extracted for a single compose service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeService {
    /// Published ports as (host, container) pairs
    pub ports: Vec<(String, String)>,
    /// Names this service declares under `depends_on`
    pub depends: Vec<String>,
    /// Network names the service joins
    pub nets: Vec<String>,
}

/// Scanner for docker-compose style files
///
/// A single forward pass classifies lines with fixed-indentation patterns.
/// Unrecognized lines are skipped; the scanner never fails on input, it only
/// under-extracts.
pub struct ComposeScanner {
    key: Regex,
    port_item: Regex,
    list_item: Regex,
    dep_entry: Regex,
}

impl ComposeScanner {
    /// Create a new compose scanner
    pub fn new() -> Result<Self> {
        Ok(Self {
            key: Regex::new(r"^(\s*)([A-Za-z0-9._-]+)\s*:\s*$")?,
            port_item: Regex::new(r#"^\s{6,}-\s*"?(\d+)\s*:\s*(\d+)(?:/(?:tcp|udp))?"?\s*$"#)?,
            list_item: Regex::new(r"^\s{6,}-\s*([A-Za-z0-9._-]+)\s*$")?,
            dep_entry: Regex::new(
                r"^\s{6,}([A-Za-z0-9._-]+)\s*:\s*\{\s*condition\s*:\s*[A-Za-z_]+\s*\}\s*$",
            )?,
        })
    }

    /// Extract services from compose file text
    ///
    /// Returns service names in declaration order. Service keys are the key
    /// lines directly under `services:`; the indentation depth of the first
    /// one is adopted for the whole block, so deeper keys (`ports:`,
    /// `environment:`) are never mistaken for services. Dependency and
    /// network list items are only accepted when the immediately preceding
    /// line carried the corresponding key, so only the first item of a
    /// multi-item list is captured.
    pub fn scan(&self, text: &str) -> IndexMap<String, ComposeService> {
        let mut services: IndexMap<String, ComposeService> = IndexMap::new();
        let mut in_services = false;
        let mut svc_indent: Option<usize> = None;
        let mut current: Option<String> = None;
        let lines: Vec<&str> = text.lines().collect();

        for (i, line) in lines.iter().enumerate() {
            if let Some(caps) = self.key.captures(line) {
                let indent = caps.get(1).map_or(0, |m| m.as_str().len());
                let name = &caps[2];

                if indent == 0 && name == "services" {
                    in_services = true;
                    svc_indent = None;
                    current = None;
                    continue;
                }
                if !in_services {
                    continue;
                }
                if indent == 0 {
                    // A top-level key ends the block only while no service
                    // is active.
                    if current.is_none() {
                        in_services = false;
                    }
                    continue;
                }
                match svc_indent {
                    None => {
                        svc_indent = Some(indent);
                        services.insert(name.to_string(), ComposeService::default());
                        current = Some(name.to_string());
                    }
                    Some(depth) if indent == depth => {
                        services.insert(name.to_string(), ComposeService::default());
                        current = Some(name.to_string());
                    }
                    Some(_) => {}
                }
                continue;
            }

            if !in_services {
                continue;
            }
            let Some(name) = current.clone() else {
                continue;
            };
            let prev = if i > 0 { lines[i - 1] } else { "" };

            if let Some(caps) = self.port_item.captures(line) {
                if let Some(svc) = services.get_mut(&name) {
                    svc.ports.push((caps[1].to_string(), caps[2].to_string()));
                }
                continue;
            }

            if let Some(caps) = self.list_item.captures(line) {
                if prev.contains("depends_on") {
                    if let Some(svc) = services.get_mut(&name) {
                        svc.depends.push(caps[1].to_string());
                    }
                } else if prev.contains("networks") {
                    if let Some(svc) = services.get_mut(&name) {
                        svc.nets.push(caps[1].to_string());
                    }
                }
                continue;
            }

            if let Some(caps) = self.dep_entry.captures(line) {
                if prev.contains("depends_on") {
                    if let Some(svc) = services.get_mut(&name) {
                        svc.depends.push(caps[1].to_string());
                    }
                }
            }
        }

        services
    }
}
