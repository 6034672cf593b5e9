//! Lexical extraction of Eloquent-style models from PHP source.
//!
//! This is pattern matching, not parsing. Relationships built dynamically,
//! behind conditionals, through string class names or inside closures are
//! not found. Method bodies end at their matching brace (braces in strings
//! and comments are skipped) or at the next method header, whichever is first.

use crate::indexer::extract::{ClassIdentity, ExtractedModel, ImportTable, RawRelation};
use crate::model::RelationKind;
use anyhow::Result;
use regex::Regex;

const NAMESPACE_PATTERN: &str =
    r"(?m)(?:^|[\s;{}])namespace\s+\\?([A-Za-z_][A-Za-z0-9_]*(?:\\[A-Za-z_][A-Za-z0-9_]*)*)\s*[;{]";

// Both must also sit at a statement start, checked by `at_statement_start`.
const CLASS_PATTERN: &str =
    r"\b((?:(?:abstract|final|readonly)\s+)*class)\s+([A-Za-z_][A-Za-z0-9_]*)";

const USE_PATTERN: &str = r"\buse\s+(?:(function|const)\s+)?([\\A-Za-z_][\\A-Za-z0-9_]*)\s*;";

const METHOD_PATTERN: &str = r"public\s+function\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(\s*\)\s*(?::\s*\??\s*[\\A-Za-z_][\\A-Za-z0-9_]*(?:\s*\|\s*[\\A-Za-z_][\\A-Za-z0-9_]*)*\s*)?\{";

const CALL_PATTERN: &str = r"->\s*(hasOneThrough|hasManyThrough|hasOne|hasMany|belongsToMany|belongsTo|morphToMany|morphTo|morphOne|morphMany)\s*\(\s*(\\?[A-Za-z_][\\A-Za-z0-9_]*)\s*::\s*class\b";

pub struct PhpExtractor {
    namespace_re: Regex,
    class_re: Regex,
    use_re: Regex,
    method_re: Regex,
    call_re: Regex,
}

impl PhpExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            namespace_re: Regex::new(NAMESPACE_PATTERN)?,
            class_re: Regex::new(CLASS_PATTERN)?,
            use_re: Regex::new(USE_PATTERN)?,
            method_re: Regex::new(METHOD_PATTERN)?,
            call_re: Regex::new(CALL_PATTERN)?,
        })
    }

    /// Run all three extractors. `None` when the file declares no
    /// namespace followed by a class; such files are not models.
    pub fn extract(&self, source: &str) -> Option<ExtractedModel> {
        let class = self.class_identity(source)?;
        Some(ExtractedModel {
            class,
            imports: self.import_table(source),
            relations: self.relationships(source),
        })
    }

    /// First namespace declaration and the first class declared after it.
    pub fn class_identity(&self, source: &str) -> Option<ClassIdentity> {
        let ns = self.namespace_re.captures(source)?;
        let ns_end = ns.get(0)?.end();
        let namespace = ns.get(1)?.as_str().trim_end_matches('\\');
        let (_, name) = self.first_class(&source[ns_end..])?;
        Some(ClassIdentity::new(namespace, name))
    }

    /// Offset and name of the first class declaration opening a statement.
    fn first_class<'s>(&self, source: &'s str) -> Option<(usize, &'s str)> {
        self.class_re.captures_iter(source).find_map(|caps| {
            let decl = caps.get(1)?;
            let name = caps.get(2)?;
            at_statement_start(source, decl.start()).then(|| (decl.start(), name.as_str()))
        })
    }

    /// File-scope `use` declarations. A `use` inside the class body pulls in
    /// a trait, so scanning stops at the first class declaration.
    pub fn import_table(&self, source: &str) -> ImportTable {
        let header_end = self
            .first_class(source)
            .map(|(start, _)| start)
            .unwrap_or(source.len());
        let header = &source[..header_end];
        let mut table = ImportTable::new();
        for caps in self.use_re.captures_iter(header) {
            let starts_statement = caps
                .get(0)
                .is_some_and(|m| at_statement_start(header, m.start()));
            if !starts_statement || caps.get(1).is_some() {
                continue;
            }
            if let Some(path) = caps.get(2) {
                table.insert_path(path.as_str());
            }
        }
        table
    }

    /// Every relationship call inside a public, parameterless method, in
    /// document order.
    pub fn relationships(&self, source: &str) -> Vec<RawRelation> {
        let headers: Vec<_> = self.method_re.captures_iter(source).collect();
        let mut out = Vec::new();
        for (idx, caps) in headers.iter().enumerate() {
            let (Some(header), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let limit = headers
                .get(idx + 1)
                .and_then(|next| next.get(0))
                .map(|next| next.start())
                .unwrap_or(source.len());
            let body = method_body(&source[..limit], header.end());
            for call in self.call_re.captures_iter(body) {
                let kind = match call.get(1).map(|m| m.as_str().parse::<RelationKind>()) {
                    Some(Ok(kind)) => kind,
                    _ => continue,
                };
                let Some(target) = call.get(2) else {
                    continue;
                };
                out.push(RawRelation {
                    method: name.as_str().to_string(),
                    kind,
                    target: target.as_str().to_string(),
                });
            }
        }
        out
    }
}

/// True when `pos` begins a statement: start of input or of a line, right
/// after `;`, `{` or `}`, or right after the `<?php` open tag.
fn at_statement_start(source: &str, pos: usize) -> bool {
    let before = source[..pos].trim_end_matches([' ', '\t']);
    if before.is_empty() || before.ends_with(['\n', '\r']) {
        return true;
    }
    before.ends_with([';', '{', '}']) || before.ends_with("<?php")
}

/// Text from `start` (just past an opening brace) to its matching close
/// brace, or to end of input when unbalanced. Braces inside quoted strings
/// and comments do not count.
fn method_body(source: &str, start: usize) -> &str {
    let bytes = source.as_bytes();
    let mut depth = 1usize;
    let mut idx = start;
    while idx < bytes.len() {
        match bytes[idx] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return &source[start..idx];
                }
            }
            quote @ (b'\'' | b'"') => {
                idx += 1;
                while idx < bytes.len() && bytes[idx] != quote {
                    if bytes[idx] == b'\\' {
                        idx += 1;
                    }
                    idx += 1;
                }
            }
            b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                idx = find_from(bytes, idx + 2, b"*/").map_or(bytes.len(), |end| end + 1);
            }
            b'#' => {
                idx = find_from(bytes, idx, b"\n").unwrap_or(bytes.len());
            }
            b'/' if bytes.get(idx + 1) == Some(&b'/') => {
                idx = find_from(bytes, idx, b"\n").unwrap_or(bytes.len());
            }
            _ => {}
        }
        idx += 1;
    }
    &source[start..]
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}
