use crate::error::{IngestError, Result};
use codemap_model::Language;
use tree_sitter::{Node, Parser};

/// Structural fact about one function, produced by the parsing collaborator.
/// Line numbers are 1-indexed and inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionFact {
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
}

fn grammar_for(language: Language) -> Option<tree_sitter::Language> {
    match language {
        Language::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
        Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
        Language::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
        Language::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        _ => None,
    }
}

/// Extract function boundaries from source text.
///
/// Languages without a grammar in the set (java, go) yield an empty fact
/// list; their files still enter the store, just without function rows.
pub fn extract_functions(language: Language, content: &str) -> Result<Vec<FunctionFact>> {
    let Some(grammar) = grammar_for(language) else {
        return Ok(Vec::new());
    };

    let mut parser = Parser::new();
    parser
        .set_language(&grammar)
        .map_err(|e| IngestError::parse(format!("failed to set language: {e}")))?;
    let tree = parser
        .parse(content, None)
        .ok_or_else(|| IngestError::parse("failed to parse source"))?;

    let mut facts = Vec::new();
    collect(language, content, tree.root_node(), &mut facts);
    Ok(facts)
}

fn collect(language: Language, content: &str, node: Node, facts: &mut Vec<FunctionFact>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(fact) = function_fact(language, content, child) {
            facts.push(fact);
        }
        collect(language, content, child, facts);
    }
}

fn function_fact(language: Language, content: &str, node: Node) -> Option<FunctionFact> {
    let name_node = match (language, node.kind()) {
        (Language::Rust, "function_item") => node.child_by_field_name("name"),
        (Language::Python, "function_definition") => node.child_by_field_name("name"),
        (
            Language::JavaScript | Language::TypeScript,
            "function_declaration" | "generator_function_declaration" | "method_definition",
        ) => node.child_by_field_name("name"),
        (Language::JavaScript | Language::TypeScript, "variable_declarator") => {
            // const f = () => {} / const f = function () {}
            let value = node.child_by_field_name("value")?;
            if !matches!(value.kind(), "arrow_function" | "function_expression") {
                return None;
            }
            node.child_by_field_name("name")
        }
        _ => None,
    }?;

    let name = name_node.utf8_text(content.as_bytes()).ok()?.to_string();
    if name.is_empty() {
        return None;
    }
    Some(FunctionFact {
        name,
        start_line: node.start_position().row as u32 + 1,
        end_line: node.end_position().row as u32 + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_rust_functions_and_methods() {
        let src = r#"
fn free() {
    let _ = 1;
}

struct S;

impl S {
    fn method(&self) -> u8 {
        0
    }
}
"#;
        let facts = extract_functions(Language::Rust, src).unwrap();
        let names: Vec<&str> = facts.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["free", "method"]);

        let free = &facts[0];
        assert_eq!(free.start_line, 2);
        assert_eq!(free.end_line, 4);
    }

    #[test]
    fn extracts_python_functions() {
        let src = "def top():\n    pass\n\nclass C:\n    def method(self):\n        pass\n";
        let facts = extract_functions(Language::Python, src).unwrap();
        let names: Vec<&str> = facts.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["top", "method"]);
    }

    #[test]
    fn extracts_typescript_declarations_and_arrows() {
        let src = "export function named(a: number): number {\n  return a;\n}\nconst arrow = (x: number) => x * 2;\n";
        let facts = extract_functions(Language::TypeScript, src).unwrap();
        let names: Vec<&str> = facts.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["named", "arrow"]);
    }

    #[test]
    fn unsupported_language_yields_no_facts() {
        let facts = extract_functions(Language::Go, "func main() {}\n").unwrap();
        assert!(facts.is_empty());
    }
}
