use crate::extract::FunctionFact;
use codemap_model::Language;
use std::collections::HashSet;

/// Pull raw import specifiers out of source text using per-language
/// statement prefixes. Whatever cannot be resolved against the known file
/// set is dropped later; extraction itself stays permissive.
pub fn extract_import_specifiers(language: Language, content: &str) -> Vec<String> {
    let mut specs = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        match language {
            Language::JavaScript | Language::TypeScript => {
                if line.starts_with("import ") || line.starts_with("export ") {
                    if let Some(spec) = quoted_after(line, " from ").or_else(|| {
                        // side-effect import: import './setup'
                        line.starts_with("import ").then(|| first_quoted(line)).flatten()
                    }) {
                        specs.push(spec);
                    }
                } else if let Some(idx) = line.find("require(") {
                    if let Some(spec) = first_quoted(&line[idx..]) {
                        specs.push(spec);
                    }
                }
            }
            Language::Python => {
                if let Some(rest) = line.strip_prefix("from ") {
                    if let Some((module, _)) = rest.split_once(" import ") {
                        specs.push(module.trim().to_string());
                    }
                } else if let Some(rest) = line.strip_prefix("import ") {
                    let module = rest.split(" as ").next().unwrap_or(rest);
                    for part in module.split(',') {
                        specs.push(part.trim().to_string());
                    }
                }
            }
            Language::Rust => {
                if let Some(rest) = line.strip_prefix("mod ") {
                    if let Some(name) = rest.strip_suffix(';') {
                        specs.push(name.trim().to_string());
                    }
                } else if let Some(rest) = line.strip_prefix("use crate::") {
                    if let Some(head) = rest.split("::").next() {
                        let head = head.trim_end_matches(';');
                        specs.push(head.trim().to_string());
                    }
                }
            }
            Language::Java => {
                if let Some(rest) = line.strip_prefix("import ") {
                    let target = rest.trim_end_matches(';').trim();
                    if !target.ends_with('*') {
                        specs.push(target.to_string());
                    }
                }
            }
            Language::Go | Language::Unknown => {}
        }
    }

    specs.retain(|s| !s.is_empty());
    specs
}

/// Candidate extensions tried when a specifier omits one
const RELATIVE_CANDIDATES: &[&str] = &[
    "", ".ts", ".tsx", ".js", ".jsx", ".py", "/index.ts", "/index.tsx", "/index.js", "/index.jsx",
];

/// Resolve one import specifier to a known repository-relative file path.
///
/// Returns `None` for external packages and anything else that does not
/// land on a known file.
pub fn resolve_import(
    language: Language,
    from_path: &str,
    spec: &str,
    known: &HashSet<String>,
) -> Option<String> {
    let from_dir = parent_of(from_path);

    match language {
        Language::JavaScript | Language::TypeScript => {
            if !spec.starts_with('.') {
                return None; // bare specifier: external package
            }
            let base = normalize_join(from_dir, spec)?;
            for candidate in RELATIVE_CANDIDATES {
                let path = format!("{base}{candidate}");
                if known.contains(&path) {
                    return Some(path);
                }
            }
            None
        }
        Language::Python => {
            let module_path = spec.trim_start_matches('.').replace('.', "/");
            let relative = spec.starts_with('.');
            let bases = if relative {
                vec![from_dir.to_string()]
            } else {
                vec![String::new(), from_dir.to_string()]
            };
            for base in bases {
                let joined = if base.is_empty() {
                    module_path.clone()
                } else {
                    format!("{base}/{module_path}")
                };
                for candidate in [format!("{joined}.py"), format!("{joined}/__init__.py")] {
                    if known.contains(&candidate) {
                        return Some(candidate);
                    }
                }
            }
            None
        }
        Language::Rust => {
            // sibling module layout: x.rs or x/mod.rs next to the importer
            let base = if from_dir.is_empty() {
                spec.to_string()
            } else {
                format!("{from_dir}/{spec}")
            };
            for candidate in [format!("{base}.rs"), format!("{base}/mod.rs")] {
                if known.contains(&candidate) {
                    return Some(candidate);
                }
            }
            None
        }
        Language::Java => {
            let suffix = format!("{}.java", spec.replace('.', "/"));
            known
                .iter()
                .find(|path| path.ends_with(&suffix))
                .cloned()
        }
        Language::Go | Language::Unknown => None,
    }
}

/// Conservative same-file call edges: a caller's body mentioning another
/// known function name followed by `(` counts as a call.
pub fn same_file_calls(
    file_path: &str,
    content: &str,
    facts: &[FunctionFact],
) -> Vec<(String, String)> {
    let lines: Vec<&str> = content.lines().collect();
    let mut edges = Vec::new();

    for caller in facts {
        let start = caller.start_line.saturating_sub(1) as usize;
        let end = (caller.end_line as usize).min(lines.len());
        if start >= end {
            continue;
        }
        let body = lines[start..end].join("\n");

        for callee in facts {
            if callee.name == caller.name && callee.start_line == caller.start_line {
                continue;
            }
            let needle = format!("{}(", callee.name);
            // skip the callee's own definition line when it sits inside the range
            if body.contains(&needle) {
                edges.push((
                    format!("{file_path}#{}", caller.name),
                    format!("{file_path}#{}", callee.name),
                ));
            }
        }
    }

    edges
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Join a relative specifier onto a base directory, folding `.` and `..`
fn normalize_join(base: &str, spec: &str) -> Option<String> {
    let mut parts: Vec<&str> = if base.is_empty() {
        Vec::new()
    } else {
        base.split('/').collect()
    };
    for segment in spec.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

fn quoted_after(line: &str, marker: &str) -> Option<String> {
    let idx = line.find(marker)?;
    first_quoted(&line[idx + marker.len()..])
}

fn first_quoted(text: &str) -> Option<String> {
    let open = text.find(['\'', '"'])?;
    let quote = text.as_bytes()[open] as char;
    let rest = &text[open + 1..];
    let close = rest.find(quote)?;
    Some(rest[..close].to_string())
}
