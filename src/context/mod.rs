//! Code context attached to chat requests
//!
//! A code context is an ordered set of source files the caller wants the
//! backend to see. [`format_code_context`] serializes it into a single
//! textual block that adapters either prepend as its own user turn or
//! concatenate into the user message, depending on the backend's shape.

use serde::{Deserialize, Serialize};

/// One source file supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFile {
    pub relative_path: String,
    pub content: String,
    pub language: String,
}

/// Ordered set of files attached to a request. Order is the caller's
/// insertion order and is preserved in the serialized block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeContext {
    pub files: Vec<CodeFile>,
}

/// Serialize a code context into a single text block.
///
/// An empty context yields an empty string; callers must skip prepending the
/// block entirely rather than sending a bare header. File contents pass
/// through verbatim: no escaping and no size limit.
pub fn format_code_context(context: &CodeContext) -> String {
    if context.files.is_empty() {
        return String::new();
    }

    let blocks: Vec<String> = context
        .files
        .iter()
        .map(|file| {
            format!(
                "----------\n{}\n{}\n\n{}\n-----------",
                file.relative_path, file.language, file.content
            )
        })
        .collect();

    format!("Code Context:\n{}", blocks.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, language: &str, content: &str) -> CodeFile {
        CodeFile {
            relative_path: path.to_string(),
            content: content.to_string(),
            language: language.to_string(),
        }
    }

    #[test]
    fn test_empty_context_is_empty_string() {
        let context = CodeContext { files: vec![] };
        assert_eq!(format_code_context(&context), "");
    }

    #[test]
    fn test_single_file_block_layout() {
        let context = CodeContext {
            files: vec![file("src/main.rs", "rust", "fn main() {}")],
        };

        let block = format_code_context(&context);
        assert_eq!(
            block,
            "Code Context:\n----------\nsrc/main.rs\nrust\n\nfn main() {}\n-----------"
        );
    }

    #[test]
    fn test_paths_and_languages_recoverable_in_order() {
        let context = CodeContext {
            files: vec![
                file("a/one.py", "python", "print(1)"),
                file("b/two.js", "javascript", "console.log(2)"),
            ],
        };

        let block = format_code_context(&context);

        // Each block: separator, path, language, blank line, content, separator.
        // Split on the full opening separator line; the closing separator is
        // one dash longer and never matches it.
        let recovered: Vec<(&str, &str)> = block
            .split("\n----------\n")
            .skip(1)
            .map(|chunk| {
                let mut lines = chunk.lines();
                (lines.next().unwrap(), lines.next().unwrap())
            })
            .collect();

        assert_eq!(
            recovered,
            vec![("a/one.py", "python"), ("b/two.js", "javascript")]
        );
    }

    #[test]
    fn test_content_passes_through_verbatim() {
        let content = "let s = \"----------\";\n\n\n// odd spacing preserved";
        let context = CodeContext {
            files: vec![file("weird.rs", "rust", content)],
        };

        assert!(format_code_context(&context).contains(content));
    }
}
