// Heuristic line-pattern scanners for deployment config sources

mod compose;
mod env;
mod kubernetes;
mod package;

pub use compose::{ComposeScanner, ComposeService};
pub use env::EnvSniffer;
pub use kubernetes::{ManifestKind, ManifestScanner, ManifestUnit};
pub use package::{PackageProfile, PackageSniffer};
