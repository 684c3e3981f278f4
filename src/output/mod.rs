// Output generation module

pub mod markdown;
pub mod mermaid;

pub use markdown::*;
pub use mermaid::*;
