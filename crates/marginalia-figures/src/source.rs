//! Standalone LaTeX document preparation for figure code.

/// Wrap figure code in a standalone LaTeX document.
///
/// `libraries` is passed to `\usetikzlibrary` verbatim and omitted when empty.
#[must_use]
pub fn standalone_document(code: &str, font: &str, libraries: &str) -> String {
    let mut source = format!("\\documentclass{{standalone}}\n\\usepackage{{{font}}}\n\\usepackage{{tikz}}\n");
    if !libraries.is_empty() {
        source.push_str(&format!("\\usetikzlibrary{{{libraries}}}\n"));
    }
    source.push_str("\\begin{document}\n");
    source.push_str(code);
    source.push_str("\n\\end{document}\n");
    source
}
