// Attribute flattening: (name, unit, value) triples into a FlatKey -> value map.

use crate::models::{FlatAttributes, RawAttribute};

/// `name (unit)` when the unit has non-whitespace content, otherwise `name`.
pub fn flat_key(name: &str, unit: Option<&str>) -> String {
    match unit.map(str::trim).filter(|u| !u.is_empty()) {
        Some(unit) => format!("{} ({})", name, unit),
        None => name.to_string(),
    }
}

/// Builds the map in document order; a later node with the same key replaces an earlier one.
pub fn flatten<'a, I>(nodes: I) -> FlatAttributes
where
    I: IntoIterator<Item = &'a RawAttribute>,
{
    let mut out = FlatAttributes::new();
    for node in nodes {
        out.insert(
            flat_key(&node.name, node.unit.as_deref()),
            node.value.clone(),
        );
    }
    out
}
