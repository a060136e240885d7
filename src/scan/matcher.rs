//! Transitive supertype search

use std::collections::HashSet;

use tracing::trace;

/// Source of direct supertype edges, keyed by binary name.
pub trait SupertypeGraph {
    /// Superclass first, then interfaces, as binary names. Unknown types have none.
    fn direct_supertypes(&self, binary_name: &str) -> Vec<String>;
}

/// Answers "does this type extend or implement that contract?"
///
/// Each query keeps its own visited set, so cyclic supertype graphs terminate.
pub struct SubtypeMatcher<'g, G: SupertypeGraph + ?Sized> {
    graph: &'g G,
}

impl<'g, G: SupertypeGraph + ?Sized> SubtypeMatcher<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// True iff `target` is in the reflexive-transitive supertype closure of `binary_name`.
    pub fn is_subtype(&self, binary_name: &str, target: &str) -> bool {
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack = vec![binary_name.to_string()];

        while let Some(current) = stack.pop() {
            if current == target {
                trace!(type_name = binary_name, contract = target, via = %current, "Supertype match");
                return true;
            }
            if !visited.insert(current.clone()) {
                continue;
            }

            // Reversed so the superclass is popped before the interfaces.
            for supertype in self.graph.direct_supertypes(&current).into_iter().rev() {
                if !visited.contains(&supertype) {
                    stack.push(supertype);
                }
            }
        }

        false
    }

    /// The subset of `contracts` that `binary_name` matches, in the given order.
    pub fn matching_contracts<'c, I>(&self, binary_name: &str, contracts: I) -> Vec<&'c str>
    where
        I: IntoIterator<Item = &'c str>,
    {
        contracts
            .into_iter()
            .filter(|contract| self.is_subtype(binary_name, contract))
            .collect()
    }
}
