//! Sketch pass
//!
//! A line-oriented IR outline driven by the [`Visitor`] protocol. It is
//! independent of the layout pass and lowers much less: one record per type
//! with a slot per instance variable, and an empty stub per method that
//! ignores parameters and return type.
//!
//! ```text
//! ; module 'app'
//! @.module.app = private constant [4 x i8] c"app\00"
//! ; Type 'app.Point'
//! %.dyn.app.Point = type { %.classref, %.dyn.int32, %.dyn.int32 }
//! ; method of 'app.Point'
//! define void @app.Point.norm() {}
//! ```

use tracing::debug;

use super::printer::CodePrinter;
use crate::parser::ast::{CompilationUnit, Declarator, FieldDeclaration, NodeId, TypeDeclaration};
use crate::parser::visit::{NodeRef, Visitor};

/// Slot type for a variable with neither a declared type nor an initializer
const UNTYPED_SLOT: &str = "object";

pub struct SketchGenerator<'a> {
    unit: &'a CompilationUnit,
    printer: CodePrinter,
}

impl<'a> SketchGenerator<'a> {
    pub fn new(unit: &'a CompilationUnit) -> Self {
        Self {
            unit,
            printer: CodePrinter::new(),
        }
    }

    /// Walk `unit` and return the sketch text
    pub fn generate(unit: &'a CompilationUnit) -> String {
        debug!(file = %unit.file_name, types = unit.types.len(), "generating sketch");
        let mut generator = Self::new(unit);
        unit.accept(&mut generator);
        generator.printer.into_string()
    }

    fn type_name(&self, decl: &TypeDeclaration) -> String {
        decl.qualified_name(self.unit.package.as_ref()).to_string()
    }

    fn slot_type(field: &FieldDeclaration, declarator: &Declarator) -> String {
        if let Some(declared) = &field.declared_type {
            return declared.name.to_string();
        }
        match &declarator.initializer {
            Some(literal) => literal.static_type().name().to_string(),
            None => UNTYPED_SLOT.to_string(),
        }
    }

    fn emit_module(&mut self, unit: &CompilationUnit) {
        let module = unit.module_name();
        self.printer.println(&format!("; module '{module}'"));
        self.printer.println(&format!(
            "{} = private constant [{} x i8] c\"{}\\00\"",
            global_name(&format!(".module.{module}")),
            module.len() + 1,
            escape_bytes(&module)
        ));
    }

    fn emit_type(&mut self, decl: &TypeDeclaration) {
        let name = self.type_name(decl);
        self.printer.println(&format!("; Type '{name}'"));
        self.printer.print(&format!("%.dyn.{name} = type {{ %.classref"));

        if let Some(body) = &decl.body {
            for field in &body.variables {
                for declarator in &field.declarators {
                    let slot = Self::slot_type(field, declarator);
                    self.printer.print(&format!(", %.dyn.{slot}"));
                }
            }
        }

        self.printer.println(" }");
    }

    fn emit_method(&mut self, id: NodeId, name: &str) {
        let owner = self
            .unit
            .enclosing_type(id)
            .map(|decl| self.type_name(decl))
            .unwrap_or_default();
        self.printer.println(&format!("; method of '{owner}'"));
        if owner.is_empty() {
            self.printer.println(&format!("define void @{name}() {{}}"));
        } else {
            self.printer.println(&format!("define void @{owner}.{name}() {{}}"));
        }
    }
}

/// `@name`, or `@"name"` when the name has characters a bare global can't
fn global_name(name: &str) -> String {
    let bare = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '$' | '-'));
    if bare {
        format!("@{name}")
    } else {
        format!("@\"{}\"", escape_bytes(name))
    }
}

/// Printable ASCII as is; quotes, backslashes and everything else as `\XX`
fn escape_bytes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        if (0x20..0x7f).contains(&byte) && byte != b'"' && byte != b'\\' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("\\{byte:02X}"));
        }
    }
    out
}

impl<'a> Visitor<'a> for SketchGenerator<'a> {
    fn visit(&mut self, node: NodeRef<'a>) -> bool {
        match node {
            NodeRef::Unit(unit) => {
                self.emit_module(unit);
                true
            }
            NodeRef::Type(decl) => {
                self.emit_type(decl);
                true
            }
            NodeRef::Body(_) => true,
            NodeRef::Method(method) => {
                self.emit_method(method.meta.id, &method.name);
                false
            }
            _ => false,
        }
    }

    fn finish(&mut self, node: NodeRef<'a>) {
        if let NodeRef::Type(_) = node {
            self.printer.newline();
        }
    }
}
