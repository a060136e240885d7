//! Arena of declared types
//!
//! Declarations are flattened into [`TypeNode`]s addressed by [`TypeId`].
//! Supertype references stay as written and are resolved on lookup, so a
//! batch may refer to types that only appear in a later batch.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use super::name::{BinaryName, NameError};
use super::types::{ConstructorDecl, DeclarationFile, MemberDecl, Modifier, NestingKind, TypeDecl, TypeKind};
use crate::scan::SupertypeGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Where a declaration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Part of the compilation; scanned for providers.
    Source,
    /// Only used to resolve supertypes.
    Classpath,
}

#[derive(Debug, Clone)]
pub struct TypeNode {
    pub name: BinaryName,
    pub kind: TypeKind,
    pub modifiers: Vec<Modifier>,
    pub nesting: NestingKind,
    /// Superclass first, then interfaces, as written.
    pub supertypes: Vec<String>,
    pub constructors: Vec<ConstructorDecl>,
    pub member_types: Vec<TypeId>,
    pub enclosing: Option<TypeId>,
    pub origin: Origin,
}

impl TypeNode {
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn binary_name(&self) -> String {
        self.name.binary_name()
    }
}

#[derive(Debug, Default)]
pub struct TypeModel {
    nodes: Vec<TypeNode>,
    by_binary: HashMap<String, TypeId>,
    by_canonical: HashMap<String, TypeId>,
}

impl TypeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one batch and returns the ids of its root declarations in order.
    ///
    /// A batch is added whole or not at all: on error the model is left as it
    /// was before the call.
    pub fn add_batch(
        &mut self,
        file: &DeclarationFile,
        origin: Origin,
    ) -> Result<Vec<TypeId>, NameError> {
        let package = file.package.as_deref().unwrap_or_default();
        let start = self.nodes.len();

        let roots = match self.insert_roots(package, &file.types, origin) {
            Ok(roots) => roots,
            Err(e) => {
                self.rollback(start);
                return Err(e);
            }
        };

        debug!(
            package = %package,
            roots = roots.len(),
            total_types = self.nodes.len(),
            "Added declaration batch"
        );

        Ok(roots)
    }

    fn insert_roots(
        &mut self,
        package: &str,
        decls: &[TypeDecl],
        origin: Origin,
    ) -> Result<Vec<TypeId>, NameError> {
        let mut roots = Vec::with_capacity(decls.len());
        for decl in decls {
            let name = BinaryName::top_level(package, &decl.name)?;
            roots.push(self.insert(decl, name, None, origin)?);
        }
        Ok(roots)
    }

    /// Drops every node from `start` on, along with its lookup entries.
    fn rollback(&mut self, start: usize) {
        self.nodes.truncate(start);
        self.by_binary.retain(|_, id| id.0 < start);
        self.by_canonical.retain(|_, id| id.0 < start);
    }

    fn insert(
        &mut self,
        decl: &TypeDecl,
        name: BinaryName,
        enclosing: Option<TypeId>,
        origin: Origin,
    ) -> Result<TypeId, NameError> {
        let id = TypeId(self.nodes.len());
        let binary = name.binary_name();
        let nesting = nesting_for_position(decl, &binary, enclosing.is_some())?;

        let mut supertypes = Vec::with_capacity(decl.interfaces.len() + 1);
        if let Some(superclass) = &decl.superclass {
            supertypes.push(superclass.trim().to_string());
        }
        supertypes.extend(decl.interfaces.iter().map(|i| i.trim().to_string()));

        let constructors = decl
            .members
            .iter()
            .filter_map(|m| match m {
                MemberDecl::Constructor(c) => Some(c.clone()),
                _ => None,
            })
            .collect();

        self.nodes.push(TypeNode {
            name: name.clone(),
            kind: decl.kind,
            modifiers: decl.modifiers.clone(),
            nesting,
            supertypes,
            constructors,
            member_types: Vec::new(),
            enclosing,
            origin,
        });

        if self.by_binary.contains_key(&binary) {
            warn!(type_name = %binary, "Type declared more than once, keeping first declaration for lookups");
        } else {
            self.by_binary.insert(binary, id);
            self.by_canonical.entry(name.canonical_name()).or_insert(id);
        }

        for member in &decl.members {
            if let MemberDecl::Type(child) = member {
                let child_name = name.nested(&child.name)?;
                let child_id = self.insert(child, child_name, Some(id), origin)?;
                self.nodes[id.0].member_types.push(child_id);
            }
        }

        Ok(id)
    }

    pub fn node(&self, id: TypeId) -> &TypeNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, binary_name: &str) -> Option<TypeId> {
        self.by_binary.get(binary_name).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (TypeId(i), n))
    }

    /// Looks a supertype reference up by binary name, then by canonical name.
    pub fn lookup_reference(&self, reference: &str) -> Option<TypeId> {
        self.by_binary
            .get(reference)
            .or_else(|| self.by_canonical.get(reference))
            .copied()
    }

    /// Binary name for a supertype reference. Unknown types fall back to the
    /// reference as written.
    pub fn resolve_reference(&self, reference: &str) -> String {
        match self.lookup_reference(reference) {
            Some(id) => self.nodes[id.0].binary_name(),
            None => reference.to_string(),
        }
    }

    /// `(declaring type, reference)` pairs whose target is not in the model.
    pub fn unresolved_references(&self) -> BTreeSet<(String, String)> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.supertypes
                    .iter()
                    .filter(move |r| self.lookup_reference(r).is_none())
                    .map(move |r| (node.binary_name(), r.clone()))
            })
            .collect()
    }
}

/// Roots are always top-level; enclosed types default to member and may
/// narrow to local or anonymous.
fn nesting_for_position(
    decl: &TypeDecl,
    binary: &str,
    enclosed: bool,
) -> Result<NestingKind, NameError> {
    match (enclosed, decl.nesting) {
        (false, None | Some(NestingKind::TopLevel)) => Ok(NestingKind::TopLevel),
        (true, None) => Ok(NestingKind::Member),
        (true, Some(nesting)) if nesting != NestingKind::TopLevel => Ok(nesting),
        (enclosed, Some(declared)) => Err(NameError::NestingMismatch {
            name: binary.to_string(),
            declared: declared.as_str(),
            position: if enclosed {
                "is enclosed by another type"
            } else {
                "is not enclosed by any type"
            },
        }),
    }
}

impl SupertypeGraph for TypeModel {
    fn direct_supertypes(&self, binary_name: &str) -> Vec<String> {
        match self.get(binary_name) {
            Some(id) => self.nodes[id.0]
                .supertypes
                .iter()
                .map(|r| self.resolve_reference(r))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> DeclarationFile {
        DeclarationFile::new(
            "com.acme",
            vec![
                TypeDecl::new("Plugin", TypeKind::Interface).with_modifiers(&[Modifier::Public]),
                TypeDecl::new("Outer", TypeKind::Class)
                    .with_modifiers(&[Modifier::Public])
                    .with_member_type(
                        TypeDecl::new("Inner", TypeKind::Class)
                            .with_modifiers(&[Modifier::Public, Modifier::Static])
                            .implementing("com.acme.Plugin"),
                    ),
            ],
        )
    }

    #[test]
    fn test_add_batch_returns_roots_in_order() {
        let mut model = TypeModel::new();
        let roots = model.add_batch(&sample_file(), Origin::Source).unwrap();

        assert_eq!(roots.len(), 2);
        assert_eq!(model.len(), 3);
        assert_eq!(model.node(roots[0]).binary_name(), "com.acme.Plugin");
        assert_eq!(model.node(roots[1]).binary_name(), "com.acme.Outer");
    }

    #[test]
    fn test_member_types_get_nested_binary_names() {
        let mut model = TypeModel::new();
        let roots = model.add_batch(&sample_file(), Origin::Source).unwrap();

        let outer = model.node(roots[1]);
        assert_eq!(outer.member_types.len(), 1);

        let inner = model.node(outer.member_types[0]);
        assert_eq!(inner.binary_name(), "com.acme.Outer$Inner");
        assert_eq!(inner.nesting, NestingKind::Member);
        assert_eq!(inner.enclosing, Some(roots[1]));
        assert_eq!(outer.nesting, NestingKind::TopLevel);
    }

    #[test]
    fn test_reference_resolution_accepts_canonical_form() {
        let mut model = TypeModel::new();
        model.add_batch(&sample_file(), Origin::Source).unwrap();

        assert_eq!(model.resolve_reference("com.acme.Outer.Inner"), "com.acme.Outer$Inner");
        assert_eq!(model.resolve_reference("com.acme.Outer$Inner"), "com.acme.Outer$Inner");
        assert_eq!(model.resolve_reference("java.io.Closeable"), "java.io.Closeable");
    }

    #[test]
    fn test_direct_supertypes_keep_declaration_order() {
        let file = DeclarationFile::new(
            "p",
            vec![TypeDecl::new("C", TypeKind::Class)
                .extending("p.Base")
                .implementing("p.A")
                .implementing("p.B")],
        );
        let mut model = TypeModel::new();
        model.add_batch(&file, Origin::Source).unwrap();

        assert_eq!(model.direct_supertypes("p.C"), vec!["p.Base", "p.A", "p.B"]);
        assert!(model.direct_supertypes("p.Base").is_empty());
    }

    #[test]
    fn test_unresolved_references() {
        let mut model = TypeModel::new();
        model.add_batch(&sample_file(), Origin::Source).unwrap();
        assert!(model.unresolved_references().is_empty());

        let extra = DeclarationFile::new(
            "com.acme",
            vec![TypeDecl::new("Closer", TypeKind::Class).implementing("java.io.Closeable")],
        );
        model.add_batch(&extra, Origin::Source).unwrap();

        let unresolved = model.unresolved_references();
        assert_eq!(unresolved.len(), 1);
        assert!(unresolved.contains(&("com.acme.Closer".to_string(), "java.io.Closeable".to_string())));
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let file = DeclarationFile::new("com.acme", vec![TypeDecl::new("Bad Name", TypeKind::Class)]);
        let mut model = TypeModel::new();
        assert!(model.add_batch(&file, Origin::Source).is_err());
    }

    #[test]
    fn test_member_claiming_top_level_is_rejected() {
        let file = DeclarationFile::new(
            "com.acme",
            vec![TypeDecl::new("Outer", TypeKind::Class)
                .with_modifiers(&[Modifier::Public])
                .with_member_type(
                    TypeDecl::new("Inner", TypeKind::Class)
                        .with_modifiers(&[Modifier::Public])
                        .with_nesting(NestingKind::TopLevel)
                        .implementing("com.acme.Plugin"),
                )],
        );
        let mut model = TypeModel::new();
        let err = model.add_batch(&file, Origin::Source).unwrap_err();

        assert_eq!(
            err,
            NameError::NestingMismatch {
                name: "com.acme.Outer$Inner".to_string(),
                declared: "top-level",
                position: "is enclosed by another type",
            }
        );
        assert!(model.get("com.acme.Outer$Inner").is_none());
    }

    #[test]
    fn test_root_claiming_member_is_rejected() {
        let file = DeclarationFile::new(
            "com.acme",
            vec![TypeDecl::new("Loose", TypeKind::Class).with_nesting(NestingKind::Member)],
        );
        let mut model = TypeModel::new();
        let err = model.add_batch(&file, Origin::Source).unwrap_err();
        assert!(matches!(err, NameError::NestingMismatch { declared: "member", .. }));
    }

    #[test]
    fn test_declared_nesting_matching_position_is_kept() {
        let file = DeclarationFile::new(
            "com.acme",
            vec![TypeDecl::new("Host", TypeKind::Class)
                .with_nesting(NestingKind::TopLevel)
                .with_member_type(
                    TypeDecl::new("1", TypeKind::Class).with_nesting(NestingKind::Anonymous),
                )
                .with_member_type(
                    TypeDecl::new("Named", TypeKind::Class).with_nesting(NestingKind::Member),
                )],
        );
        let mut model = TypeModel::new();
        let roots = model.add_batch(&file, Origin::Source).unwrap();

        let host = model.node(roots[0]);
        assert_eq!(host.nesting, NestingKind::TopLevel);
        assert_eq!(model.node(host.member_types[0]).nesting, NestingKind::Anonymous);
        assert_eq!(model.node(host.member_types[1]).nesting, NestingKind::Member);
    }

    #[test]
    fn test_failed_batch_leaves_model_unchanged() {
        let mut model = TypeModel::new();
        model.add_batch(&sample_file(), Origin::Source).unwrap();

        let broken = DeclarationFile::new(
            "com.acme.more",
            vec![
                TypeDecl::new("Fine", TypeKind::Class),
                TypeDecl::new("Holder", TypeKind::Class)
                    .with_member_type(TypeDecl::new("Good", TypeKind::Class))
                    .with_member_type(TypeDecl::new("bad name", TypeKind::Class)),
            ],
        );
        assert!(model.add_batch(&broken, Origin::Source).is_err());

        assert_eq!(model.len(), 3);
        assert!(model.get("com.acme.more.Fine").is_none());
        assert!(model.get("com.acme.more.Holder$Good").is_none());
        assert!(model.lookup_reference("com.acme.more.Holder.Good").is_none());
        assert_eq!(model.get("com.acme.Outer$Inner").map(|id| id.index()), Some(2));

        let retry = DeclarationFile::new("com.acme.more", vec![TypeDecl::new("Fine", TypeKind::Class)]);
        let roots = model.add_batch(&retry, Origin::Source).unwrap();
        assert_eq!(roots[0].index(), 3);
        assert_eq!(model.get("com.acme.more.Fine"), Some(roots[0]));
    }

    #[test]
    fn test_duplicate_declaration_keeps_first_for_lookup() {
        let mut model = TypeModel::new();
        let first = model.add_batch(&sample_file(), Origin::Source).unwrap();
        let second = model.add_batch(&sample_file(), Origin::Source).unwrap();

        assert_eq!(model.len(), 6);
        assert_eq!(model.get("com.acme.Outer"), Some(first[1]));
        assert_ne!(first[1], second[1]);
    }
}
