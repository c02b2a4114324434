//! Supertype closure over the store's node-type registry

use crate::error::Result;
use crate::session::Session;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Every type reachable from `declared` through supertype links, declared
/// types included.
///
/// Breadth-first, in first-seen order, each name once. Handles cycles by
/// tracking visited names. A name the registry does not know contributes
/// itself and nothing else.
pub fn type_closure(session: &dyn Session, declared: &[String]) -> Result<Vec<String>> {
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut queue: VecDeque<String> = VecDeque::new();
    let mut closure = Vec::new();

    for name in declared {
        if visited.insert(name.clone()) {
            queue.push_back(name.clone());
        }
    }

    while let Some(current) = queue.pop_front() {
        match session.node_type(&current)? {
            Some(node_type) => {
                for parent in node_type.supertypes {
                    if visited.insert(parent.clone()) {
                        queue.push_back(parent);
                    }
                }
            }
            None => tracing::trace!(node_type = %current, "type not registered; no supertypes"),
        }
        closure.push(current);
    }

    Ok(closure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRepository;
    use crate::node::NodeType;
    use crate::session::Repository;

    #[test]
    fn test_closure_dedupes_shared_supertypes() {
        let repo = MemoryRepository::new();
        repo.register_node_type(NodeType::mixin("ex:A", &[]));
        repo.register_node_type(NodeType::mixin("ex:B", &["ex:A"]));
        repo.register_node_type(NodeType::mixin("ex:C", &["ex:A"]));
        let session = repo.login("default").unwrap();

        let closure = type_closure(
            session.as_ref(),
            &["ex:B".to_string(), "ex:C".to_string(), "ex:A".to_string()],
        )
        .unwrap();
        assert_eq!(closure, vec!["ex:B", "ex:C", "ex:A"]);
    }

    #[test]
    fn test_closure_handles_cycles_and_unknown_types() {
        let repo = MemoryRepository::new();
        repo.register_node_type(NodeType::mixin("ex:X", &["ex:Y"]));
        repo.register_node_type(NodeType::mixin("ex:Y", &["ex:X", "ex:Unknown"]));
        let session = repo.login("default").unwrap();

        let closure = type_closure(session.as_ref(), &["ex:X".to_string()]).unwrap();
        assert_eq!(closure, vec!["ex:X", "ex:Y", "ex:Unknown"]);
    }
}
