//! Symbol naming for generated C
//!
//! Every symbol is a pure function of a type's qualified name. Segments are
//! joined with `_`, and an underscore inside a segment is written `_0`. No
//! identifier segment starts with a digit, so `_0` can never be a separator
//! followed by a segment, which keeps the mapping injective. Names without
//! underscores come out as plain dot-to-underscore substitution.

use crate::parser::ast::QualifiedName;

/// `a.b_c.D` → `a_b_0c_D`
pub fn mangle(name: &QualifiedName) -> String {
    name.segments()
        .iter()
        .map(|segment| segment.replace('_', "_0"))
        .collect::<Vec<_>>()
        .join("_")
}

/// Typedef name of the per-type (class-level) record
pub fn static_record(name: &QualifiedName) -> String {
    format!("static_{}_", mangle(name))
}

/// Typedef name of the per-instance record
pub fn dynamic_record(name: &QualifiedName) -> String {
    format!("dynamic_{}_", mangle(name))
}

/// File-scope storage slot holding the static record
pub fn storage_slot(name: &QualifiedName) -> String {
    format!("type_{}_", mangle(name))
}

/// Static initializer procedure
pub fn initializer(name: &QualifiedName) -> String {
    format!("sinit_{}_", mangle(name))
}
