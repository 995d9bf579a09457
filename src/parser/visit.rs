//! Traversal protocol over the AST
//!
//! [`NodeRef`] is a borrowed view of any node kind. [`walk`] drives a
//! [`Visitor`]: `visit` is called on entry and its result decides whether the
//! node's children are walked (in declaration order); `finish` is called on
//! exit whether or not the children were walked.

use super::ast::*;

/// Borrowed reference to one node of a closed set of kinds
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Unit(&'a CompilationUnit),
    Package(&'a Package),
    Import(&'a TypeImport),
    Annotation(&'a Annotation),
    Type(&'a TypeDeclaration),
    Body(&'a TypeBody),
    Field(&'a FieldDeclaration),
    Method(&'a MethodDeclaration),
    Param(&'a FormalParameter),
    TypeRef(&'a TypeReference),
    Literal(&'a Literal),
    Block(&'a Block),
}

impl<'a> NodeRef<'a> {
    pub fn meta(&self) -> &'a NodeMeta {
        match *self {
            NodeRef::Unit(n) => &n.meta,
            NodeRef::Package(n) => &n.meta,
            NodeRef::Import(n) => &n.meta,
            NodeRef::Annotation(n) => &n.meta,
            NodeRef::Type(n) => &n.meta,
            NodeRef::Body(n) => &n.meta,
            NodeRef::Field(n) => &n.meta,
            NodeRef::Method(n) => &n.meta,
            NodeRef::Param(n) => &n.meta,
            NodeRef::TypeRef(n) => &n.meta,
            NodeRef::Literal(n) => &n.meta,
            NodeRef::Block(n) => &n.meta,
        }
    }

    pub fn id(&self) -> NodeId {
        self.meta().id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.meta().parent()
    }

    /// Owned children in declaration order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match *self {
            NodeRef::Unit(unit) => {
                out.extend(unit.package.iter().map(NodeRef::Package));
                out.extend(unit.imports.iter().map(NodeRef::Import));
                out.extend(unit.types.iter().map(NodeRef::Type));
            }
            NodeRef::Annotation(annotation) => out.push(NodeRef::TypeRef(&annotation.type_ref)),
            NodeRef::Type(decl) => {
                out.extend(decl.annotations.iter().map(NodeRef::Annotation));
                out.extend(decl.extends.iter().map(NodeRef::TypeRef));
                out.extend(decl.body.iter().map(NodeRef::Body));
            }
            NodeRef::Body(body) => {
                out.extend(body.variables.iter().map(NodeRef::Field));
                out.extend(body.constants.iter().map(NodeRef::Field));
                out.extend(body.methods.iter().map(NodeRef::Method));
            }
            NodeRef::Field(field) => {
                out.extend(field.annotations.iter().map(NodeRef::Annotation));
                out.extend(field.declared_type.iter().map(NodeRef::TypeRef));
                out.extend(
                    field
                        .declarators
                        .iter()
                        .filter_map(|d| d.initializer.as_ref())
                        .map(NodeRef::Literal),
                );
            }
            NodeRef::Method(method) => {
                out.extend(method.annotations.iter().map(NodeRef::Annotation));
                out.extend(method.params.iter().map(NodeRef::Param));
                out.extend(method.return_type.iter().map(NodeRef::TypeRef));
                out.extend(method.body.iter().map(NodeRef::Block));
            }
            NodeRef::Param(param) => out.push(NodeRef::TypeRef(&param.type_ref)),
            NodeRef::Package(_)
            | NodeRef::Import(_)
            | NodeRef::TypeRef(_)
            | NodeRef::Literal(_)
            | NodeRef::Block(_) => {}
        }
        out
    }
}

pub trait Visitor<'a> {
    /// Called on entry; return `true` to walk the node's children.
    fn visit(&mut self, node: NodeRef<'a>) -> bool;

    /// Called on exit, always.
    fn finish(&mut self, _node: NodeRef<'a>) {}
}

pub fn walk<'a, V: Visitor<'a> + ?Sized>(node: NodeRef<'a>, visitor: &mut V) {
    if visitor.visit(node) {
        for child in node.children() {
            walk(child, visitor);
        }
    }
    visitor.finish(node);
}

/// Stops descending once the target id has been seen.
struct Finder<'a> {
    target: NodeId,
    found: Option<NodeRef<'a>>,
}

impl<'a> Visitor<'a> for Finder<'a> {
    fn visit(&mut self, node: NodeRef<'a>) -> bool {
        if self.found.is_some() {
            return false;
        }
        if node.id() == self.target {
            self.found = Some(node);
            return false;
        }
        true
    }
}

impl CompilationUnit {
    pub fn as_node(&self) -> NodeRef<'_> {
        NodeRef::Unit(self)
    }

    pub fn accept<'a, V: Visitor<'a> + ?Sized>(&'a self, visitor: &mut V) {
        walk(NodeRef::Unit(self), visitor);
    }

    /// Node with the given id anywhere in this unit.
    pub fn find(&self, id: NodeId) -> Option<NodeRef<'_>> {
        let mut finder = Finder {
            target: id,
            found: None,
        };
        self.accept(&mut finder);
        finder.found
    }

    /// Owner of the node with the given id, following its parent link.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeRef<'_>> {
        let parent = self.find(id)?.parent()?;
        self.find(parent)
    }

    /// Closest type declaration above the node with the given id.
    pub fn enclosing_type(&self, id: NodeId) -> Option<&TypeDeclaration> {
        let mut current = self.parent_of(id)?;
        loop {
            if let NodeRef::Type(decl) = current {
                return Some(decl);
            }
            current = self.parent_of(current.id())?;
        }
    }
}
