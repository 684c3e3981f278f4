// package.json sniffer: framework detection and app port extraction

use crate::error::Result;
use regex::Regex;
use serde_json::Value;
use std::path::Path;

/// Framework names recognized in dependency tables, in report order
const FRAMEWORK_HINTS: &[&str] = &[
    "express",
    "fastify",
    "nest",
    "koa",
    "next",
    "sveltekit",
    "django",
    "flask",
    "fastapi",
    "rails",
];

/// Facts sniffed from a package manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageProfile {
    /// Known frameworks found among dependencies, in hint-table order
    pub frameworks: Vec<String>,
    /// First port number found in a script string
    pub app_port: Option<String>,
}

/// Sniffer for `package.json` manifests
pub struct PackageSniffer {
    port_env: Regex,
    port_flag: Regex,
}

impl PackageSniffer {
    /// Create a new package sniffer
    pub fn new() -> Result<Self> {
        Ok(Self {
            port_env: Regex::new(r"PORT\s*=\s*(\d+)")?,
            port_flag: Regex::new(r"--port\s+(\d+)")?,
        })
    }

    /// Sniff a manifest file; any read or parse failure yields an empty
    /// profile.
    pub fn sniff(&self, path: &Path) -> PackageProfile {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return PackageProfile::default(),
        };
        let data: Value = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(_) => return PackageProfile::default(),
        };

        let mut deps: Vec<String> = Vec::new();
        for table in ["dependencies", "devDependencies"] {
            if let Some(map) = data.get(table).and_then(|v| v.as_object()) {
                deps.extend(map.keys().cloned());
            }
        }

        let frameworks = FRAMEWORK_HINTS
            .iter()
            .filter(|hint| deps.iter().any(|dep| dep.to_lowercase() == **hint))
            .map(|hint| hint.to_string())
            .collect();

        let mut app_port = None;
        if let Some(scripts) = data.get("scripts").and_then(|v| v.as_object()) {
            for script in scripts.values().filter_map(|v| v.as_str()) {
                let caps = self
                    .port_env
                    .captures(script)
                    .or_else(|| self.port_flag.captures(script));
                if let Some(caps) = caps {
                    app_port = Some(caps[1].to_string());
                    break;
                }
            }
        }

        PackageProfile {
            frameworks,
            app_port,
        }
    }
}
