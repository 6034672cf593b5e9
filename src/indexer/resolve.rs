use crate::indexer::extract::{ClassIdentity, ImportTable, NS_SEP, last_segment};

/// Resolve a reference made from inside `class`. `self::class` and
/// `static::class` name the declaring class itself; anything else goes
/// through [`resolve_target`].
pub fn resolve_for_class(raw: &str, class: &ClassIdentity, imports: &ImportTable) -> String {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("self") || raw.eq_ignore_ascii_case("static") {
        return class.qualname();
    }
    resolve_target(raw, &class.namespace, imports)
}

/// Resolve a class reference as written in a relationship call to a
/// fully-qualified name.
///
/// Rooted references (`\Billing\Invoice`) are taken as-is. Otherwise the
/// last segment is looked up in the file's imports, falling back to the
/// file's own namespace. The result is a best guess and may name a class
/// that was never scanned.
pub fn resolve_target(raw: &str, namespace: &str, imports: &ImportTable) -> String {
    let raw = raw.trim();
    if let Some(rooted) = raw.strip_prefix(NS_SEP) {
        return rooted.to_string();
    }
    let bare = last_segment(raw);
    if let Some(qualified) = imports.get(bare) {
        return qualified.to_string();
    }
    if namespace.is_empty() {
        bare.to_string()
    } else {
        format!("{namespace}{NS_SEP}{bare}")
    }
}
