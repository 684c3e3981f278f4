// Markdown document assembly around a rendered diagram

/// Wrap raw Mermaid text in the generated architecture document
///
/// The document is a fenced `mermaid` block followed by the one-line summary
/// and a regeneration note. Callers append the trailing newline when writing
/// to disk.
pub fn wrap_markdown(diagram: &str, summary: &str) -> String {
    let mut lines = Vec::new();
    lines.push("# System Architecture (auto-generated)".to_string());
    lines.push(String::new());
    lines.push("```mermaid".to_string());
    lines.push(diagram.to_string());
    lines.push("```".to_string());
    lines.push(String::new());
    lines.push(format!("<sub>{}</sub>", summary));
    lines.push(String::new());
    lines.push("> Generated by **deploymap**. Edit freely after generation.".to_string());
    lines.join("\n")
}
