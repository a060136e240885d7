//! Binary type names
//!
//! A binary name joins package segments with `.` and enclosing-type segments
//! with `$`, e.g. `com.acme.Outer$Inner`. This is the exact string used to
//! identify contracts and the exact string written into registry files.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const PACKAGE_SEPARATOR: char = '.';
pub const NESTED_SEPARATOR: char = '$';

/// Errors raised while reading a type name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Type name is empty")]
    Empty,

    #[error("Invalid segment '{segment}' in type name '{name}'")]
    InvalidSegment { name: String, segment: String },

    #[error("Type '{name}' is declared {declared} but {position}")]
    NestingMismatch {
        name: String,
        declared: &'static str,
        position: &'static str,
    },
}

fn identifier() -> &'static Regex {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT.get_or_init(|| Regex::new(r"^[\p{L}_][\p{L}\p{N}_]*$").expect("valid regex"))
}

// Local and anonymous classes get compiler-assigned segments like `1` or `1Local`.
fn nested_segment() -> &'static Regex {
    static NESTED: OnceLock<Regex> = OnceLock::new();
    NESTED.get_or_init(|| Regex::new(r"^[\p{L}\p{N}_]+$").expect("valid regex"))
}

/// Fully qualified, nesting-aware type name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinaryName {
    package: String,
    path: Vec<String>,
}

impl BinaryName {
    /// Builds the name of a top-level type. An empty package is the default package.
    pub fn top_level(package: &str, simple_name: &str) -> Result<Self, NameError> {
        let full = if package.is_empty() {
            simple_name.to_string()
        } else {
            format!("{}{}{}", package, PACKAGE_SEPARATOR, simple_name)
        };

        if simple_name.is_empty() {
            return Err(NameError::Empty);
        }
        if !package.is_empty() {
            for segment in package.split(PACKAGE_SEPARATOR) {
                check_segment(&full, segment, identifier())?;
            }
        }
        check_segment(&full, simple_name, identifier())?;

        Ok(Self {
            package: package.to_string(),
            path: vec![simple_name.to_string()],
        })
    }

    /// Parses a binary name such as `com.acme.Outer$Inner`.
    pub fn parse(name: &str) -> Result<Self, NameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NameError::Empty);
        }

        let (package, nested) = match name.rfind(PACKAGE_SEPARATOR) {
            Some(idx) => (&name[..idx], &name[idx + 1..]),
            None => ("", name),
        };

        let mut segments = nested.split(NESTED_SEPARATOR);
        let top = segments.next().unwrap_or_default();
        let mut parsed = Self::top_level(package, top).map_err(|e| match e {
            NameError::Empty => NameError::InvalidSegment {
                name: name.to_string(),
                segment: String::new(),
            },
            other => other,
        })?;

        for segment in segments {
            check_segment(name, segment, nested_segment())?;
            parsed.path.push(segment.to_string());
        }

        Ok(parsed)
    }

    /// Name of a type declared directly inside this one.
    pub fn nested(&self, simple_name: &str) -> Result<Self, NameError> {
        let mut path = self.path.clone();
        path.push(simple_name.to_string());
        let child = Self {
            package: self.package.clone(),
            path,
        };
        check_segment(&child.binary_name(), simple_name, nested_segment())?;
        Ok(child)
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn simple_name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    pub fn is_nested(&self) -> bool {
        self.path.len() > 1
    }

    /// The runtime lookup form: `com.acme.Outer$Inner`.
    pub fn binary_name(&self) -> String {
        self.join(NESTED_SEPARATOR)
    }

    /// The source form: `com.acme.Outer.Inner`.
    pub fn canonical_name(&self) -> String {
        self.join(PACKAGE_SEPARATOR)
    }

    fn join(&self, nested_separator: char) -> String {
        let nested = self.path.join(&nested_separator.to_string());
        if self.package.is_empty() {
            nested
        } else {
            format!("{}{}{}", self.package, PACKAGE_SEPARATOR, nested)
        }
    }
}

fn check_segment(name: &str, segment: &str, pattern: &Regex) -> Result<(), NameError> {
    if pattern.is_match(segment) {
        Ok(())
    } else {
        Err(NameError::InvalidSegment {
            name: name.to_string(),
            segment: segment.to_string(),
        })
    }
}

/// Binary form of a dotted reference that reads like a nested type written in
/// source form, e.g. `java.util.Map.Entry` gives `java.util.Map$Entry`.
///
/// Segments from the first capitalized one on are treated as type names.
/// Returns `None` when the reference already uses `$` or names no nesting.
pub fn nested_binary_form(reference: &str) -> Option<String> {
    if reference.contains(NESTED_SEPARATOR) {
        return None;
    }
    let segments: Vec<&str> = reference.split(PACKAGE_SEPARATOR).collect();
    let first_type = segments
        .iter()
        .position(|s| s.chars().next().is_some_and(char::is_uppercase))?;
    if first_type + 1 >= segments.len() {
        return None;
    }

    let nested = segments[first_type..].join(NESTED_SEPARATOR.to_string().as_str());
    if first_type == 0 {
        Some(nested)
    } else {
        Some(format!(
            "{}{}{}",
            segments[..first_type].join(PACKAGE_SEPARATOR.to_string().as_str()),
            PACKAGE_SEPARATOR,
            nested
        ))
    }
}

impl fmt::Display for BinaryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.binary_name())
    }
}

impl FromStr for BinaryName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for BinaryName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.binary_name())
    }
}

impl<'de> Deserialize<'de> for BinaryName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_name() {
        let name = BinaryName::top_level("com.acme.impl", "FooPlugin").unwrap();
        assert_eq!(name.binary_name(), "com.acme.impl.FooPlugin");
        assert_eq!(name.canonical_name(), "com.acme.impl.FooPlugin");
        assert_eq!(name.simple_name(), "FooPlugin");
        assert!(!name.is_nested());
    }

    #[test]
    fn test_nested_uses_dollar_separator() {
        let outer = BinaryName::top_level("com.acme", "Outer").unwrap();
        let inner = outer.nested("Inner").unwrap();
        assert_eq!(inner.binary_name(), "com.acme.Outer$Inner");
        assert_eq!(inner.canonical_name(), "com.acme.Outer.Inner");
        assert_eq!(inner.package(), "com.acme");
        assert!(inner.is_nested());
    }

    #[test]
    fn test_default_package_has_no_leading_separator() {
        let name = BinaryName::top_level("", "Standalone").unwrap();
        assert_eq!(name.binary_name(), "Standalone");
        assert_eq!(name.nested("Inner").unwrap().binary_name(), "Standalone$Inner");
    }

    #[test]
    fn test_parse_binary_name() {
        let name = BinaryName::parse("java.util.Map$Entry").unwrap();
        assert_eq!(name.package(), "java.util");
        assert_eq!(name.simple_name(), "Entry");
        assert_eq!(name.binary_name(), "java.util.Map$Entry");
        assert_eq!(name.canonical_name(), "java.util.Map.Entry");
    }

    #[test]
    fn test_parse_anonymous_segment() {
        let name = BinaryName::parse("com.acme.Outer$1").unwrap();
        assert_eq!(name.simple_name(), "1");
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        assert_eq!(BinaryName::parse(""), Err(NameError::Empty));
        assert_eq!(BinaryName::parse("   "), Err(NameError::Empty));
        assert!(BinaryName::parse("com..acme.Plugin").is_err());
        assert!(BinaryName::parse("com.acme.").is_err());
        assert!(BinaryName::parse("com.acme.Outer$").is_err());
        assert!(BinaryName::parse("com.acme.Has Space").is_err());
        assert!(BinaryName::parse("1com.acme.Plugin").is_err());
    }

    #[test]
    fn test_nested_binary_form() {
        assert_eq!(nested_binary_form("java.util.Map.Entry").as_deref(), Some("java.util.Map$Entry"));
        assert_eq!(nested_binary_form("Outer.Inner.Deep").as_deref(), Some("Outer$Inner$Deep"));
        assert_eq!(nested_binary_form("java.util.Map"), None);
        assert_eq!(nested_binary_form("java.util.Map$Entry"), None);
        assert_eq!(nested_binary_form("plain"), None);
    }

    #[test]
    fn test_from_str_and_display() {
        let name: BinaryName = "com.acme.Plugin".parse().unwrap();
        assert_eq!(name.to_string(), "com.acme.Plugin");
    }

    #[test]
    fn test_serde_uses_binary_form() {
        let name = BinaryName::parse("com.acme.Outer$Inner").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"com.acme.Outer$Inner\"");

        let back: BinaryName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
