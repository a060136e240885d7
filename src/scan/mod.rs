//! Provider discovery
//!
//! - [`matcher`]: transitive supertype search over a [`SupertypeGraph`]
//! - [`filter`]: which declarations may be registered as providers
//! - [`registry`]: accumulated contract to provider mapping
//! - [`driver`]: walks declaration trees and fills the registry

pub mod driver;
pub mod filter;
pub mod matcher;
pub mod registry;

pub use driver::{RejectedType, ScanDriver, ScanStats};
pub use filter::{is_candidate, rejection_reason, Rejection};
pub use matcher::{SubtypeMatcher, SupertypeGraph};
pub use registry::ProviderRegistry;
