//! Declaration types read from type model files
//!
//! A declaration file describes one compilation batch:
//!
//! ```yaml
//! package: com.acme.impl
//! types:
//!   - name: FooPlugin
//!     kind: class
//!     modifiers: [public]
//!     interfaces: [com.acme.Plugin]
//!     members:
//!       - member: constructor
//!         modifiers: [public]
//! ```

use serde::{Deserialize, Serialize};

/// Kind of a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

impl TypeKind {
    pub fn is_class(&self) -> bool {
        matches!(self, TypeKind::Class)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "annotation",
            TypeKind::Record => "record",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
}

/// Where a type is declared relative to other types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestingKind {
    TopLevel,
    Member,
    Local,
    Anonymous,
}

impl NestingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NestingKind::TopLevel => "top-level",
            NestingKind::Member => "member",
            NestingKind::Local => "local",
            NestingKind::Anonymous => "anonymous",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    #[serde(default)]
    pub modifiers: Vec<Modifier>,

    /// Parameter types, as written. Only the count matters to the scanner.
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl ConstructorDecl {
    pub fn is_public_no_arg(&self) -> bool {
        self.modifiers.contains(&Modifier::Public) && self.parameters.is_empty()
    }
}

/// Anything enclosed by a type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum MemberDecl {
    Constructor(ConstructorDecl),
    Type(TypeDecl),
    Method { name: String },
    Field { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Simple name; local and anonymous types use their compiler-assigned segment.
    pub name: String,

    pub kind: TypeKind,

    #[serde(default)]
    pub modifiers: Vec<Modifier>,

    /// Defaults to top-level for roots and member for enclosed types. A root
    /// may only be top-level and an enclosed type never is.
    #[serde(default)]
    pub nesting: Option<NestingKind>,

    #[serde(default)]
    pub superclass: Option<String>,

    /// Implemented interfaces for classes, extended interfaces for interfaces.
    #[serde(default)]
    pub interfaces: Vec<String>,

    #[serde(default)]
    pub members: Vec<MemberDecl>,
}

impl TypeDecl {
    pub fn new(name: &str, kind: TypeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            modifiers: Vec::new(),
            nesting: None,
            superclass: None,
            interfaces: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers.extend_from_slice(modifiers);
        self
    }

    pub fn with_nesting(mut self, nesting: NestingKind) -> Self {
        self.nesting = Some(nesting);
        self
    }

    pub fn extending(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_string());
        self
    }

    pub fn implementing(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub fn with_constructor(mut self, modifiers: &[Modifier], parameters: &[&str]) -> Self {
        self.members.push(MemberDecl::Constructor(ConstructorDecl {
            modifiers: modifiers.to_vec(),
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
        }));
        self
    }

    pub fn with_member_type(mut self, member: TypeDecl) -> Self {
        self.members.push(MemberDecl::Type(member));
        self
    }
}

/// One batch of root declarations, usually one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationFile {
    /// Package of every root type in the file. Absent means the default package.
    #[serde(default)]
    pub package: Option<String>,

    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl DeclarationFile {
    pub fn new(package: &str, types: Vec<TypeDecl>) -> Self {
        Self {
            package: if package.is_empty() {
                None
            } else {
                Some(package.to_string())
            },
            types,
        }
    }
}
