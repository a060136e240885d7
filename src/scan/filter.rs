//! Service provider eligibility
//!
//! A provider must be instantiable reflectively through a public no-argument
//! constructor without an enclosing instance.

use std::fmt;

use serde::Serialize;

use crate::model::{Modifier, NestingKind, TypeKind, TypeNode};

/// First criterion a type fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    NotAClass { kind: TypeKind },
    NotPublic,
    Abstract,
    RequiresEnclosingInstance { nesting: NestingKind },
    NoPublicNoArgConstructor,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotAClass { kind } => write!(f, "{} is not a class", kind.as_str()),
            Rejection::NotPublic => write!(f, "not public"),
            Rejection::Abstract => write!(f, "abstract"),
            Rejection::RequiresEnclosingInstance { nesting } => {
                write!(f, "non-static {} type", nesting.as_str())
            }
            Rejection::NoPublicNoArgConstructor => write!(f, "no public no-arg constructor"),
        }
    }
}

pub fn rejection_reason(node: &TypeNode) -> Option<Rejection> {
    if !node.kind.is_class() {
        return Some(Rejection::NotAClass { kind: node.kind });
    }
    if !node.has_modifier(Modifier::Public) {
        return Some(Rejection::NotPublic);
    }
    if node.has_modifier(Modifier::Abstract) {
        return Some(Rejection::Abstract);
    }
    if node.nesting != NestingKind::TopLevel && !node.has_modifier(Modifier::Static) {
        return Some(Rejection::RequiresEnclosingInstance {
            nesting: node.nesting,
        });
    }
    if !node.constructors.iter().any(|c| c.is_public_no_arg()) {
        return Some(Rejection::NoPublicNoArgConstructor);
    }
    None
}

pub fn is_candidate(node: &TypeNode) -> bool {
    rejection_reason(node).is_none()
}
