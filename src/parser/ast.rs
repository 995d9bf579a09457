// AST (Abstract Syntax Tree) definitions for Beagle compilation units

use bitflags::bitflags;
use std::fmt;

/// Unique identifier for AST nodes, handed out by the compilation context
pub type NodeId = usize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Identity shared by every node: its id, where it starts, and a non-owning
/// link to the node that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMeta {
    pub id: NodeId,
    pub location: SourceLocation,
    parent: Option<NodeId>,
}

impl NodeMeta {
    pub fn new(id: NodeId, location: SourceLocation) -> Self {
        Self {
            id,
            location,
            parent: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Record the owning node. Set once, when the node is attached.
    pub fn attach(&mut self, parent: NodeId) {
        debug_assert!(
            self.parent.is_none(),
            "node {} is already attached to {:?}",
            self.id,
            self.parent
        );
        self.parent = Some(parent);
    }
}

/// Dot-separated identifier path, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    pub fn new(first: impl Into<String>) -> Self {
        Self {
            segments: vec![first.into()],
        }
    }

    pub fn from_segments(segments: Vec<String>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    /// Split `a.b.C` on dots. Returns `None` for an empty string or an empty segment.
    pub fn from_dotted(text: &str) -> Option<Self> {
        let segments: Vec<String> = text.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Self::from_segments(segments)
    }

    pub fn append(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// More than one segment.
    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }

    /// Sub-name over `start..end`; `None` when the range is empty or out of bounds.
    pub fn slice(&self, start: usize, end: usize) -> Option<QualifiedName> {
        if start >= end || end > self.segments.len() {
            return None;
        }
        Self::from_segments(self.segments[start..end].to_vec())
    }

    /// Last segment, i.e. the simple name.
    pub fn simple_name(&self) -> &str {
        // segments is never empty
        &self.segments[self.segments.len() - 1]
    }

    /// `prefix.self`
    pub fn prefixed(&self, prefix: &QualifiedName) -> QualifiedName {
        let mut segments = prefix.segments.clone();
        segments.extend(self.segments.iter().cloned());
        QualifiedName { segments }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

bitflags! {
    /// Access and storage modifiers on types and members
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const PUBLIC = 1;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
    }
}

/// Types every unit can name without declaring them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Int32,
    Bool,
    String,
}

impl BuiltinType {
    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Int32 => "int32",
            BuiltinType::Bool => "bool",
            BuiltinType::String => "string",
        }
    }

    pub fn qualified_name(self) -> QualifiedName {
        QualifiedName::new(self.name())
    }
}

/// A name standing for a type. Resolution happens in a later phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    pub meta: NodeMeta,
    pub name: QualifiedName,
}

impl TypeReference {
    pub fn new(meta: NodeMeta, name: QualifiedName) -> Self {
        Self { meta, name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub meta: NodeMeta,
    pub type_ref: TypeReference,
}

impl Annotation {
    pub fn new(meta: NodeMeta, mut type_ref: TypeReference) -> Self {
        type_ref.meta.attach(meta.id);
        Self { meta, type_ref }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    Boolean(bool),
    String(String),
    Integer(i32),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::String(s) => write!(f, "{:?}", s),
            LiteralValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// Leaf expression node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub meta: NodeMeta,
    pub value: LiteralValue,
}

impl Literal {
    pub fn new(meta: NodeMeta, value: LiteralValue) -> Self {
        Self { meta, value }
    }

    pub fn static_type(&self) -> BuiltinType {
        match self.value {
            LiteralValue::Boolean(_) => BuiltinType::Bool,
            LiteralValue::String(_) => BuiltinType::String,
            LiteralValue::Integer(_) => BuiltinType::Int32,
        }
    }
}

/// One name of a grouped declaration with its own optional initializer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarator {
    pub name: String,
    pub location: SourceLocation,
    pub initializer: Option<Literal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Variable,
    Constant,
}

/// `var`/`const` declaration; every declarator shares the modifiers and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub meta: NodeMeta,
    pub kind: FieldKind,
    pub annotations: Vec<Annotation>,
    pub modifiers: Option<Modifiers>,
    pub declared_type: Option<TypeReference>,
    pub declarators: Vec<Declarator>,
}

impl FieldDeclaration {
    pub fn new(
        meta: NodeMeta,
        kind: FieldKind,
        annotations: Vec<Annotation>,
        modifiers: Option<Modifiers>,
        declared_type: Option<TypeReference>,
    ) -> Self {
        let mut decl = Self {
            meta,
            kind,
            annotations: Vec::new(),
            modifiers,
            declared_type: None,
            declarators: Vec::new(),
        };
        for annotation in annotations {
            decl.push_annotation(annotation);
        }
        if let Some(mut type_ref) = declared_type {
            type_ref.meta.attach(decl.meta.id);
            decl.declared_type = Some(type_ref);
        }
        decl
    }

    pub fn push_annotation(&mut self, mut annotation: Annotation) {
        annotation.meta.attach(self.meta.id);
        self.annotations.push(annotation);
    }

    pub fn push_declarator(
        &mut self,
        name: impl Into<String>,
        location: SourceLocation,
        initializer: Option<Literal>,
    ) {
        let initializer = initializer.map(|mut literal| {
            literal.meta.attach(self.meta.id);
            literal
        });
        self.declarators.push(Declarator {
            name: name.into(),
            location,
            initializer,
        });
    }

    pub fn is_constant(&self) -> bool {
        self.kind == FieldKind::Constant
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarators.iter().map(|d| d.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalParameter {
    pub meta: NodeMeta,
    pub name: String,
    pub type_ref: TypeReference,
}

impl FormalParameter {
    pub fn new(meta: NodeMeta, name: impl Into<String>, mut type_ref: TypeReference) -> Self {
        type_ref.meta.attach(meta.id);
        Self {
            meta,
            name: name.into(),
            type_ref,
        }
    }
}

/// Method body. Its statements are not modelled yet, only skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub meta: NodeMeta,
    pub token_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub meta: NodeMeta,
    pub annotations: Vec<Annotation>,
    pub modifiers: Option<Modifiers>,
    pub name: String,
    pub params: Vec<FormalParameter>,
    pub return_type: Option<TypeReference>,
    pub body: Option<Block>,
}

impl MethodDeclaration {
    pub fn new(
        meta: NodeMeta,
        annotations: Vec<Annotation>,
        modifiers: Option<Modifiers>,
        name: impl Into<String>,
    ) -> Self {
        let mut method = Self {
            meta,
            annotations: Vec::new(),
            modifiers,
            name: name.into(),
            params: Vec::new(),
            return_type: None,
            body: None,
        };
        for mut annotation in annotations {
            annotation.meta.attach(method.meta.id);
            method.annotations.push(annotation);
        }
        method
    }

    pub fn push_param(&mut self, mut param: FormalParameter) {
        param.meta.attach(self.meta.id);
        self.params.push(param);
    }

    pub fn set_return_type(&mut self, mut type_ref: TypeReference) {
        type_ref.meta.attach(self.meta.id);
        self.return_type = Some(type_ref);
    }

    pub fn set_body(&mut self, mut block: Block) {
        block.meta.attach(self.meta.id);
        self.body = Some(block);
    }
}

/// Members of a class, each container in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBody {
    pub meta: NodeMeta,
    pub variables: Vec<FieldDeclaration>,
    pub constants: Vec<FieldDeclaration>,
    pub methods: Vec<MethodDeclaration>,
}

impl TypeBody {
    pub fn new(meta: NodeMeta) -> Self {
        Self {
            meta,
            variables: Vec::new(),
            constants: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Files the declaration under variables or constants by its kind.
    pub fn push_field(&mut self, mut field: FieldDeclaration) {
        field.meta.attach(self.meta.id);
        match field.kind {
            FieldKind::Variable => self.variables.push(field),
            FieldKind::Constant => self.constants.push(field),
        }
    }

    pub fn push_method(&mut self, mut method: MethodDeclaration) {
        method.meta.attach(self.meta.id);
        self.methods.push(method);
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.constants.is_empty() && self.methods.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub meta: NodeMeta,
    pub annotations: Vec<Annotation>,
    pub modifiers: Option<Modifiers>,
    pub name: QualifiedName,
    pub extends: Vec<TypeReference>,
    pub body: Option<TypeBody>,
}

impl TypeDeclaration {
    pub fn new(
        meta: NodeMeta,
        annotations: Vec<Annotation>,
        modifiers: Option<Modifiers>,
        name: QualifiedName,
    ) -> Self {
        let mut decl = Self {
            meta,
            annotations: Vec::new(),
            modifiers,
            name,
            extends: Vec::new(),
            body: None,
        };
        for mut annotation in annotations {
            annotation.meta.attach(decl.meta.id);
            decl.annotations.push(annotation);
        }
        decl
    }

    pub fn push_extends(&mut self, mut type_ref: TypeReference) {
        type_ref.meta.attach(self.meta.id);
        self.extends.push(type_ref);
    }

    pub fn set_body(&mut self, mut body: TypeBody) {
        body.meta.attach(self.meta.id);
        self.body = Some(body);
    }

    /// The structural parent: first entry of the extends list.
    pub fn base(&self) -> Option<&TypeReference> {
        self.extends.first()
    }

    /// Name the type compiles under: an unqualified class name is placed in
    /// the unit's package.
    pub fn qualified_name(&self, package: Option<&Package>) -> QualifiedName {
        match package {
            Some(package) if !self.name.is_qualified() => self.name.prefixed(&package.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub meta: NodeMeta,
    pub name: QualifiedName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportKind {
    /// `import a.b.*`
    Wildcard,
    /// `import a.b.C`, holding `C`
    Single(QualifiedName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeImport {
    pub meta: NodeMeta,
    pub package: QualifiedName,
    pub kind: ImportKind,
}

impl TypeImport {
    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, ImportKind::Wildcard)
    }

    pub fn type_name(&self) -> Option<&QualifiedName> {
        match &self.kind {
            ImportKind::Single(name) => Some(name),
            ImportKind::Wildcard => None,
        }
    }
}

/// Root node, one per source input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub meta: NodeMeta,
    pub file_name: String,
    pub package: Option<Package>,
    pub imports: Vec<TypeImport>,
    pub types: Vec<TypeDeclaration>,
}

impl CompilationUnit {
    pub fn new(meta: NodeMeta, file_name: impl Into<String>, package: Option<Package>) -> Self {
        let package = package.map(|mut package| {
            package.meta.attach(meta.id);
            package
        });
        Self {
            meta,
            file_name: file_name.into(),
            package,
            imports: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn push_import(&mut self, mut import: TypeImport) {
        import.meta.attach(self.meta.id);
        self.imports.push(import);
    }

    pub fn push_type(&mut self, mut decl: TypeDeclaration) {
        decl.meta.attach(self.meta.id);
        self.types.push(decl);
    }

    /// Module name: the package, or the file name without its extension.
    pub fn module_name(&self) -> String {
        match &self.package {
            Some(package) => package.name.to_string(),
            None => {
                let stem = std::path::Path::new(&self.file_name)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(&self.file_name);
                stem.to_string()
            }
        }
    }
}
