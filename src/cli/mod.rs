//! CLI module for deploymap

mod args;

pub use args::{Args, Command};

use crate::analysis::Analyzer;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::{wrap_markdown, MermaidRenderer};
use std::process::ExitCode;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Map {
            path,
            out,
            format,
            theme,
            style,
            legend,
            config,
            verbose,
        } => {
            if !path.is_dir() {
                return Err(crate::error::Error::PathNotFound(path));
            }

            // Load config file if present (an explicit path must parse)
            let mut cfg = if let Some(config_path) = &config {
                Config::load(config_path)?
            } else {
                Config::load_or_default(&path.join("deploymap.toml"))
            };

            // Merge CLI arguments (CLI takes precedence)
            cfg.merge_cli(theme, style, legend, format, out);

            if verbose {
                println!("Scanning: {}", path.display());
                println!("Format: {:?}", cfg.output.format);
                println!("Theme: {:?}", cfg.diagram.theme);
                println!("Style: {:?}", cfg.diagram.style);
            }

            let analyzer = Analyzer::new(cfg.clone())?;
            let result = analyzer.analyze(&path)?;

            if verbose {
                let stats = result.graph.stats();
                println!(
                    "Scanned {} compose files, {} manifest files, {} env hints",
                    result.sources.compose_files,
                    result.sources.manifest_files,
                    result.sources.env_hints
                );
                println!("Graph: {} nodes, {} edges", stats.nodes, stats.edges);
            }

            let renderer = MermaidRenderer::new()
                .with_theme(cfg.diagram.theme)
                .with_style(cfg.diagram.style)
                .with_legend(cfg.diagram.legend);

            let document = match cfg.output.format {
                OutputFormat::Md => {
                    wrap_markdown(&renderer.render(&result.graph), &result.graph.summary)
                }
                OutputFormat::Mermaid => renderer.render(&result.graph),
                OutputFormat::Json => serde_json::to_string_pretty(&result.graph)?,
            };

            match &cfg.output.path {
                Some(out_path) => {
                    std::fs::write(out_path, format!("{}\n", document))?;
                    println!("Wrote {}", out_path.display());
                }
                None => println!("{}", document),
            }

            Ok(())
        }

        Command::Version => {
            println!("deploymap {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
