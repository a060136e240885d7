use serde::Serialize;
use tracing::{debug, trace};

use super::filter::{rejection_reason, Rejection};
use super::matcher::SubtypeMatcher;
use super::registry::ProviderRegistry;
use crate::model::{TypeId, TypeModel};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedType {
    pub name: String,
    #[serde(flatten)]
    pub reason: Rejection,
}

/// Counters for one or more scans
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub types_visited: usize,
    pub candidates: usize,
    pub registrations: usize,
    pub rejected: Vec<RejectedType>,
}

impl ScanStats {
    pub fn merge(&mut self, other: ScanStats) {
        self.types_visited += other.types_visited;
        self.candidates += other.candidates;
        self.registrations += other.registrations;
        self.rejected.extend(other.rejected);
    }
}

/// Walks root declarations and their member types, recording every
/// candidate under each contract it implements.
pub struct ScanDriver<'m> {
    model: &'m TypeModel,
    matcher: SubtypeMatcher<'m, TypeModel>,
}

impl<'m> ScanDriver<'m> {
    pub fn new(model: &'m TypeModel) -> Self {
        Self {
            model,
            matcher: SubtypeMatcher::new(model),
        }
    }

    pub fn scan(&self, roots: &[TypeId], registry: &mut ProviderRegistry) -> ScanStats {
        let contracts: Vec<String> = registry.contracts().map(str::to_owned).collect();
        let mut stats = ScanStats::default();

        for &root in roots {
            self.visit(root, &contracts, registry, &mut stats);
        }

        debug!(
            roots = roots.len(),
            visited = stats.types_visited,
            candidates = stats.candidates,
            registrations = stats.registrations,
            "Scan complete"
        );
        stats
    }

    fn visit(
        &self,
        id: TypeId,
        contracts: &[String],
        registry: &mut ProviderRegistry,
        stats: &mut ScanStats,
    ) {
        let node = self.model.node(id);
        let name = node.binary_name();
        stats.types_visited += 1;

        match rejection_reason(node) {
            None => {
                stats.candidates += 1;
                for contract in contracts {
                    if self.matcher.is_subtype(&name, contract) {
                        trace!(provider = %name, contract = %contract, "Matched contract");
                        if registry.insert(contract, name.clone()) {
                            stats.registrations += 1;
                        }
                    }
                }
            }
            Some(reason) => {
                trace!(type_name = %name, %reason, "Not a provider candidate");
                stats.rejected.push(RejectedType { name, reason });
            }
        }

        for &member in &node.member_types {
            self.visit(member, contracts, registry, stats);
        }
    }
}
