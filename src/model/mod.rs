//! Host type model
//!
//! Declared types, their binary names, and the arena the scanner walks.

pub mod index;
pub mod loader;
pub mod name;
pub mod types;

pub use index::{Origin, TypeId, TypeModel, TypeNode};
pub use loader::{
    discover_declaration_files, load_batches, parse_declarations, read_declaration_file, Batch,
    DeclarationFormat, LoadError,
};
pub use name::{nested_binary_form, BinaryName, NameError};
pub use types::{ConstructorDecl, DeclarationFile, MemberDecl, Modifier, NestingKind, TypeDecl, TypeKind};
