//! Layout pass
//!
//! Lowers every type declared in a unit to C: a static record (one per type),
//! a dynamic record (one per instance), a file-scope slot holding the static
//! record, and an initializer that fills in the slot's type metadata.
//!
//! ```text
//! typedef struct { static_P_ *base__; struct TypeInfo typeInfo__; } static_T_;
//! typedef struct { dynamic_P_ base__; static_T_ *type__; } dynamic_T_;
//! static static_T_ type_T_;
//! static void sinit_T_() { ... }
//! ```
//!
//! A derived record names its parent's records, so types are emitted
//! ancestors first regardless of declaration order. Only the first entry of
//! an extends list is a parent; the rest are noted in a comment.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::errors::CodegenError;
use super::naming;
use super::printer::CodePrinter;
use crate::parser::ast::{CompilationUnit, QualifiedName, TypeDeclaration};

pub const DEFAULT_RUNTIME_HEADER: &str = "beagle/base.h";

/// A declared type with its parent resolved
#[derive(Debug, Clone)]
pub struct LayoutEntry<'a> {
    pub decl: &'a TypeDeclaration,
    pub name: QualifiedName,
    /// Parent as it is emitted: a local type's qualified name, or the
    /// reference as written for types the runtime provides
    pub parent: Option<QualifiedName>,
    local_parent: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Resolve every type's parent and order the unit's types ancestors first.
///
/// A parent reference matches a declared type by full qualified name, or by
/// simple name when the reference is unqualified and exactly one declared
/// type has that simple name. Unrelated types keep declaration order.
pub fn emission_order(unit: &CompilationUnit) -> Result<Vec<LayoutEntry<'_>>, CodegenError> {
    let package = unit.package.as_ref();
    let names: Vec<QualifiedName> = unit
        .types
        .iter()
        .map(|decl| decl.qualified_name(package))
        .collect();

    let mut by_name: FxHashMap<String, usize> = FxHashMap::default();
    let mut by_simple: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
    for (index, name) in names.iter().enumerate() {
        if by_name.insert(name.to_string(), index).is_some() {
            return Err(CodegenError::DuplicateType {
                type_name: name.to_string(),
            });
        }
        by_simple.entry(name.simple_name()).or_default().push(index);
    }

    let entries: Vec<LayoutEntry> = unit
        .types
        .iter()
        .zip(&names)
        .map(|(decl, name)| {
            let local_parent = decl.base().and_then(|base| {
                by_name.get(&base.name.to_string()).copied().or_else(|| {
                    if base.name.is_qualified() {
                        return None;
                    }
                    match by_simple.get(base.name.simple_name()) {
                        Some(candidates) if candidates.len() == 1 => Some(candidates[0]),
                        _ => None,
                    }
                })
            });
            let parent = match local_parent {
                Some(index) => Some(names[index].clone()),
                None => decl.base().map(|base| base.name.clone()),
            };
            LayoutEntry {
                decl,
                name: name.clone(),
                parent,
                local_parent,
            }
        })
        .collect();

    let mut marks = vec![Mark::Unvisited; entries.len()];
    let mut order = Vec::with_capacity(entries.len());
    for index in 0..entries.len() {
        visit_ancestors(index, &entries, &mut marks, &mut order)?;
    }

    Ok(order.into_iter().map(|index| entries[index].clone()).collect())
}

fn visit_ancestors(
    index: usize,
    entries: &[LayoutEntry],
    marks: &mut [Mark],
    order: &mut Vec<usize>,
) -> Result<(), CodegenError> {
    match marks[index] {
        Mark::Done => return Ok(()),
        Mark::Visiting => {
            return Err(CodegenError::CyclicInheritance {
                type_name: entries[index].name.to_string(),
            })
        }
        Mark::Unvisited => {}
    }

    marks[index] = Mark::Visiting;
    if let Some(parent) = entries[index].local_parent {
        visit_ancestors(parent, entries, marks, order)?;
    }
    marks[index] = Mark::Done;
    order.push(index);
    Ok(())
}

/// Emits C records and static initializers for a compilation unit
#[derive(Debug, Clone)]
pub struct LayoutGenerator {
    runtime_header: String,
}

impl Default for LayoutGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutGenerator {
    pub fn new() -> Self {
        Self::with_header(DEFAULT_RUNTIME_HEADER)
    }

    /// Use a different runtime header in the `#include` line
    pub fn with_header(runtime_header: impl Into<String>) -> Self {
        Self {
            runtime_header: runtime_header.into(),
        }
    }

    pub fn generate(&self, unit: &CompilationUnit) -> Result<String, CodegenError> {
        let entries = emission_order(unit)?;
        debug!(file = %unit.file_name, types = entries.len(), "generating layout");

        let mut printer = CodePrinter::new();
        printer.comment(" Beagle Compiler");
        printer.comment(" AUTO-GENERATED CODE - Do not edit!");
        printer.println(&format!("\n#include <{}>", self.runtime_header));

        printer.newline();
        printer.comment("\nSTRUCTURES\n ");
        printer.newline();

        for entry in &entries {
            generate_structure(&mut printer, entry);
        }

        Ok(printer.into_string())
    }
}

fn generate_structure(printer: &mut CodePrinter, entry: &LayoutEntry) {
    let name = &entry.name;
    let static_record = naming::static_record(name);
    let dynamic_record = naming::dynamic_record(name);
    let slot = naming::storage_slot(name);
    trace!(%name, parent = ?entry.parent.as_ref().map(|p| p.to_string()), "emitting structure");

    // static data
    printer.comment(&name.to_string());
    let extra: Vec<String> = entry
        .decl
        .extends
        .iter()
        .skip(1)
        .map(|type_ref| type_ref.name.to_string())
        .collect();
    if !extra.is_empty() {
        printer.comment(&format!("also extends: {}", extra.join(", ")));
    }
    printer.print("typedef struct\n{\n   ");
    match &entry.parent {
        Some(parent) => printer.println(&format!("{} *base__;", naming::static_record(parent))),
        None => printer.println("void *base__; // no base type"),
    }
    printer.println("   struct TypeInfo typeInfo__;");
    printer.println("   // no static fields");
    printer.println(&format!("}} {static_record};"));
    printer.newline();

    // dynamic data
    printer.comment(&name.to_string());
    printer.print("typedef struct\n{\n   ");
    match &entry.parent {
        Some(parent) => printer.println(&format!("{} base__;", naming::dynamic_record(parent))),
        None => printer.comment("no base type"),
    }
    printer.println(&format!("   {static_record} *type__;"));
    printer.println("   // no dynamic fields");
    printer.println(&format!("}} {dynamic_record};"));
    printer.newline();

    printer.println(&format!("static {static_record} {slot};"));
    printer.newline();

    let parent_slot = entry.parent.as_ref().map(naming::storage_slot);
    printer.println(&format!("static void {}()\n{{", naming::initializer(name)));
    match &parent_slot {
        Some(parent) => {
            printer.println(&format!("   {slot}.typeInfo__.base = &({parent}.typeInfo__);"))
        }
        None => printer.println(&format!("   {slot}.typeInfo__.base = NULL;")),
    }
    printer.println(&format!("   {slot}.typeInfo__.staticSize = 0;"));
    printer.println(&format!("   {slot}.typeInfo__.dynamicSize = 0;"));
    printer.println(&format!("   {slot}.typeInfo__.name = \"{name}\";"));
    match &parent_slot {
        Some(parent) => printer.println(&format!("   {slot}.base__ = &{parent};")),
        None => printer.println(&format!("   {slot}.base__ = NULL;")),
    }
    printer.println("}");
    printer.newline();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::context::CompilationContext;
    use crate::parser::lexer::Scanner;
    use crate::parser::parse::Parser;

    fn parse(source: &str) -> CompilationUnit {
        let mut context = CompilationContext::new();
        let unit = Parser::new(&mut context, Scanner::new(source, "test.bgl")).parse();
        assert!(!context.has_errors(), "{:?}", context.diagnostics());
        unit.unwrap()
    }

    fn generate(source: &str) -> String {
        LayoutGenerator::new().generate(&parse(source)).unwrap()
    }

    fn position(output: &str, needle: &str) -> usize {
        output
            .find(needle)
            .unwrap_or_else(|| panic!("missing {needle:?} in:\n{output}"))
    }

    #[test]
    fn test_header() {
        let output = generate("class A {}");
        assert!(output.starts_with("//  Beagle Compiler\n//  AUTO-GENERATED CODE - Do not edit!\n"));
        assert!(output.contains("\n#include <beagle/base.h>\n"));
        assert!(output.contains("// STRUCTURES\n"));

        let custom = LayoutGenerator::with_header("rt/core.h")
            .generate(&parse("class A {}"))
            .unwrap();
        assert!(custom.contains("#include <rt/core.h>"));
    }

    #[test]
    fn test_root_type() {
        let output = generate("package p\nclass A {}");
        assert!(output.contains("// p.A\ntypedef struct\n{\n   void *base__; // no base type\n"));
        assert!(output.contains("} static_p_A_;"));
        assert!(output.contains("   // no base type\n   static_p_A_ *type__;"));
        assert!(output.contains("} dynamic_p_A_;"));
        assert!(output.contains("static static_p_A_ type_p_A_;"));
        assert!(output.contains("static void sinit_p_A_()\n{\n"));
        assert!(output.contains("   type_p_A_.typeInfo__.base = NULL;\n"));
        assert!(output.contains("   type_p_A_.typeInfo__.staticSize = 0;\n"));
        assert!(output.contains("   type_p_A_.typeInfo__.dynamicSize = 0;\n"));
        assert!(output.contains("   type_p_A_.typeInfo__.name = \"p.A\";\n"));
        assert!(output.contains("   type_p_A_.base__ = NULL;\n}\n"));
    }

    #[test]
    fn test_derived_type() {
        let output = generate("package p\nclass A {}\nclass B : A {}");
        assert!(output.contains("   static_p_A_ *base__;\n"));
        assert!(output.contains("   dynamic_p_A_ base__;\n   static_p_B_ *type__;"));
        assert!(output.contains("   type_p_B_.typeInfo__.base = &(type_p_A_.typeInfo__);\n"));
        assert!(output.contains("   type_p_B_.base__ = &type_p_A_;\n"));
    }

    #[test]
    fn test_ancestors_first() {
        let output = generate("class C : B {}\nclass B : A {}\nclass A {}\nclass D {}");
        let a = position(&output, "} static_A_;");
        let b = position(&output, "} static_B_;");
        let c = position(&output, "} static_C_;");
        let d = position(&output, "} static_D_;");
        assert!(a < b && b < c && c < d);
    }

    #[test]
    fn test_external_parent_used_as_written() {
        let output = generate("package p\nclass B : lang.Object {}");
        assert!(output.contains("   static_lang_Object_ *base__;"));
        assert!(output.contains("type_p_B_.typeInfo__.base = &(type_lang_Object_.typeInfo__);"));
    }

    #[test]
    fn test_parent_by_qualified_name() {
        let unit = parse("package p\nclass B : p.A {}\nclass A {}");
        let entries = emission_order(&unit).unwrap();
        let names: Vec<String> = entries.iter().map(|e| e.name.to_string()).collect();
        assert_eq!(names, vec!["p.A", "p.B"]);
        assert_eq!(entries[1].parent.as_ref().unwrap().to_string(), "p.A");
    }

    #[test]
    fn test_extra_extends_are_commented() {
        let output = generate("class A {}\nclass C : A, I, J {}");
        assert!(output.contains("// C\n// also extends: I, J\ntypedef struct"));
        assert!(output.contains("   static_A_ *base__;"));
        assert!(!output.contains("static_I_"));
    }

    #[test]
    fn test_cycle_is_an_error() {
        let unit = parse("class A : B {}\nclass B : A {}");
        let err = LayoutGenerator::new().generate(&unit).unwrap_err();
        assert!(matches!(err, CodegenError::CyclicInheritance { .. }));

        let unit = parse("class A : A {}");
        assert_eq!(
            emission_order(&unit).unwrap_err(),
            CodegenError::CyclicInheritance {
                type_name: "A".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_type() {
        let unit = parse("package p\nclass A {}\nclass p.A {}");
        assert_eq!(
            emission_order(&unit).unwrap_err(),
            CodegenError::DuplicateType {
                type_name: "p.A".to_string()
            }
        );
    }

    #[test]
    fn test_generation_is_repeatable() {
        let unit = parse("package p\nclass B : A { var x = 1 }\nclass A {}");
        let generator = LayoutGenerator::new();
        assert_eq!(generator.generate(&unit).unwrap(), generator.generate(&unit).unwrap());
    }
}
