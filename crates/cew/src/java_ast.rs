//! Structural representation of a Java compilation unit
//!
//! The tree only models the parts of Java the wrapper generator needs to
//! inspect or rewrite: type declarations, method and constructor signatures,
//! Javadoc, and the top level of method bodies. Everything else is carried as
//! normalized source text so it can be re-emitted by the code generator.

/// Root of a parsed source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationUnit {
    /// Top-level items in source order
    pub items: Vec<UnitItem>,
}

impl CompilationUnit {
    /// Iterate over the top-level type declarations
    pub fn types(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.items.iter().filter_map(|item| match item {
            UnitItem::Type(decl) => Some(decl),
            _ => None,
        })
    }

    /// Iterate mutably over the top-level type declarations
    pub fn types_mut(&mut self) -> impl Iterator<Item = &mut TypeDeclaration> {
        self.items.iter_mut().filter_map(|item| match item {
            UnitItem::Type(decl) => Some(decl),
            _ => None,
        })
    }
}

/// A top-level item of a compilation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitItem {
    /// `package a.b;`
    Package(String),
    /// `import a.b.C;`
    Import(String),
    /// A comment not attached to any declaration
    Comment(String),
    /// A class, interface, enum, record or annotation type
    Type(TypeDeclaration),
    /// Anything else (module declarations, stray semicolons)
    Other(String),
}

/// A Javadoc comment, including its `/**` and `*/` delimiters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub content: String,
}

impl Comment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Declaration modifiers, split into annotations and keywords
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Annotations such as `@Override` or `@SuppressWarnings("x")`
    pub annotations: Vec<String>,
    /// Keywords such as `public`, `static`, `native`
    pub keywords: Vec<String>,
}

impl Modifiers {
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn is_native(&self) -> bool {
        self.has_keyword("native")
    }
}

/// A top-level type declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub doc: Option<Comment>,
    pub modifiers: Modifiers,
    /// `class`, `interface`, `enum`, `record` or `@interface`
    pub keyword: String,
    pub name: String,
    /// Everything between the name and the body: type parameters, record
    /// components, `extends` and `implements` clauses
    pub header: String,
    /// Enum constants, verbatim, for enum declarations
    pub enum_constants: Option<String>,
    /// Members in declaration order
    pub members: Vec<Member>,
}

impl TypeDeclaration {
    pub fn procedures(&self) -> impl Iterator<Item = &Procedure> {
        self.members.iter().filter_map(|member| match member {
            Member::Procedure(procedure) => Some(procedure),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &Constructor> {
        self.members.iter().filter_map(|member| match member {
            Member::Constructor(constructor) => Some(constructor),
            _ => None,
        })
    }

    /// Look up a method by name
    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures().find(|procedure| procedure.name == name)
    }
}

/// A member of a type body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Procedure(Procedure),
    Constructor(Constructor),
    /// Field or constant declaration, verbatim
    Field(String),
    /// Nested type declaration, verbatim
    NestedType { name: String, text: String },
    /// Comments, initializer blocks, annotation elements
    Other(String),
}

/// A method declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    pub doc: Option<Comment>,
    pub modifiers: Modifiers,
    /// Type parameters and return type, e.g. `<T> List<T>`
    pub return_type: String,
    pub name: String,
    /// Parameter list including parentheses
    pub parameters: String,
    /// Legacy array dimensions after the parameter list
    pub dimensions: String,
    /// The `throws` clause; empty when the method declares none
    pub throws: Vec<String>,
    /// `None` for abstract, interface and native methods
    pub body: Option<Vec<Statement>>,
}

impl Procedure {
    /// Native and bodiless methods are never rewritten
    pub fn is_bodiless(&self) -> bool {
        self.body.is_none() || self.modifiers.is_native()
    }
}

/// A constructor declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    pub doc: Option<Comment>,
    pub modifiers: Modifiers,
    pub type_parameters: String,
    pub name: String,
    /// Parameter list including parentheses; `None` for a record's compact constructor
    pub parameters: Option<String>,
    pub throws: Vec<String>,
    pub body: Vec<Statement>,
}

/// Common view over the two member kinds that can declare `throws`
pub trait Callable {
    fn name(&self) -> &str;
    fn throws(&self) -> &[String];
    fn throws_mut(&mut self) -> &mut Vec<String>;
    fn doc_mut(&mut self) -> Option<&mut Comment>;
}

impl Callable for Procedure {
    fn name(&self) -> &str {
        &self.name
    }

    fn throws(&self) -> &[String] {
        &self.throws
    }

    fn throws_mut(&mut self) -> &mut Vec<String> {
        &mut self.throws
    }

    fn doc_mut(&mut self) -> Option<&mut Comment> {
        self.doc.as_mut()
    }
}

impl Callable for Constructor {
    fn name(&self) -> &str {
        &self.name
    }

    fn throws(&self) -> &[String] {
        &self.throws
    }

    fn throws_mut(&mut self) -> &mut Vec<String> {
        &mut self.throws
    }

    fn doc_mut(&mut self) -> Option<&mut Comment> {
        self.doc.as_mut()
    }
}

/// A statement at the top level of a method or constructor body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Line or block comment
    Comment(String),
    /// `this(...)` or `super(...)` as the first statement of a constructor
    DelegatingCall(String),
    /// `try { ... } catch (...) { ... } finally { ... }`
    Try(FailureHandlingBlock),
    /// `throw <expr>;`
    Throw(Expression),
    /// Any other statement, verbatim
    Verbatim(String),
}

impl Statement {
    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }
}

/// A try statement without resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureHandlingBlock {
    /// The protected statement sequence
    pub body: Vec<Statement>,
    pub catches: Vec<CatchClause>,
    /// `None` when there is no `finally` block
    pub finally: Option<Vec<Statement>>,
}

/// `catch (A | B name) { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchClause {
    pub types: Vec<String>,
    pub variable: String,
    pub body: Vec<Statement>,
}

/// The expressions the generator builds and the parser recognizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// `new T(arg, ...)`
    New {
        type_name: String,
        arguments: Vec<Expression>,
    },
    /// String literal; holds the escaped text between the quotes
    StringLiteral(String),
    /// A simple name
    Name(String),
    /// Any other single-line expression, verbatim
    Verbatim(String),
}
