//! Embedding of resources that have no description of their own: hash
//! fragments and blank nodes
//!
//! An embedded node contributes its types, its properties and, recursively,
//! the blank nodes it points at. One context shares a single set of visited
//! paths across all of its expansions, so each blank node is expanded at
//! most once and reference cycles terminate.

use crate::properties::properties_context;
use crate::types::type_context;
use crate::value_converter::resolve_node;
use ldp_kernel::{IdentifierConverter, RdfStream, Resource, Result};
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::Rc;

/// Paths already expanded (or being expanded) by one context
type Visited = Rc<RefCell<FxHashSet<String>>>;

fn visited_from(paths: impl IntoIterator<Item = String>) -> Visited {
    Rc::new(RefCell::new(paths.into_iter().collect()))
}

/// Every child of the resource's `#` holder, expanded.
pub fn hash_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    let owner = resource.description()?;
    let visited = visited_from([owner.path().to_string()]);
    Ok(RdfStream::flat_map(
        topic,
        owner.hash_children()?,
        move |child| {
            tracing::trace!(child = child.path(), "hash resource");
            visited.borrow_mut().insert(child.path().to_string());
            expand(&child, converter, visited.clone())
        },
    ))
}

/// Every blank node the resource's properties point at, expanded.
pub fn blank_node_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
) -> Result<RdfStream<'a>> {
    blank_nodes(resource, converter, visited_from([resource.path().to_string()]))
}

fn expand<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
    visited: Visited,
) -> Result<RdfStream<'a>> {
    Ok(type_context(resource, converter)?
        .concat(properties_context(resource, converter)?)
        .concat(blank_nodes(resource, converter, visited)?))
}

fn blank_nodes<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
    visited: Visited,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    let session = resource.session().clone();
    Ok(RdfStream::flat_map(
        topic,
        resource.properties()?,
        move |property| {
            let mut expanded = RdfStream::empty();
            for value in property.values.iter().filter(|v| v.is_node_pointer()) {
                let Some(target) = resolve_node(&session, value)? else {
                    continue;
                };
                if !target.is_blank_node()? {
                    continue;
                }
                if !visited.borrow_mut().insert(target.path().to_string()) {
                    tracing::trace!(path = target.path(), "blank node already expanded");
                    continue;
                }
                tracing::trace!(path = target.path(), "blank node");
                expanded = expanded.concat(expand(&target, converter, visited.clone())?);
            }
            Ok(expanded)
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldp_graph_ir::Term;
    use ldp_kernel::{HttpIdentifierConverter, MemoryRepository, MemorySession, RequestScope, Session, Value};
    use ldp_vocab::{internal, rdf};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const NEXT: &str = "http://example.org/ns#next";

    fn repo() -> Arc<MemorySession> {
        let repo = MemoryRepository::new();
        repo.register_namespace("ex", "http://example.org/ns#");
        repo.open("default").unwrap()
    }

    fn blank(s: &MemorySession, path: &str) {
        s.add_node(path, internal::NT_UNSTRUCTURED).unwrap();
        s.add_mixin(path, internal::FEDORA_BLANKNODE).unwrap();
    }

    fn converter(session: &Arc<dyn Session>) -> HttpIdentifierConverter {
        HttpIdentifierConverter::new("http://h/rest", &RequestScope::Default, session.clone())
    }

    #[test]
    fn test_blank_node_cycle_terminates() {
        let s = repo();
        s.create_container("/a").unwrap();
        for path in ["/a/b1", "/a/b2", "/a/b3"] {
            blank(&s, path);
        }
        s.set_property("/a", "ex:next", Value::Path("/a/b1".into())).unwrap();
        s.set_property("/a/b1", "ex:next", Value::Path("/a/b2".into())).unwrap();
        s.set_property("/a/b2", "ex:next", Value::Path("/a/b3".into())).unwrap();
        s.set_property("/a/b3", "ex:next", Value::Path("/a/b1".into())).unwrap();

        let session: Arc<dyn Session> = s;
        let converter = converter(&session);
        let a = Resource::require(&session, "/a").unwrap();
        let graph = blank_node_context(&a, &converter).unwrap().into_graph().unwrap();

        let b = |n: u8| Term::iri(format!("http://h/rest/a/b{n}"));
        assert_eq!(graph.subjects(), vec![&b(1), &b(2), &b(3)]);
        assert_eq!(graph.with_predicate(NEXT).count(), 3);
        assert!(graph.contains(&b(3), &Term::iri(NEXT), &b(1)));
        assert!(graph.contains(
            &b(2),
            &Term::iri(rdf::TYPE),
            &Term::iri(format!("{}Blanknode", ldp_vocab::fedora::NAMESPACE))
        ));
    }

    #[test]
    fn test_densely_linked_blank_nodes_expand_once_each() {
        let s = repo();
        s.create_container("/a").unwrap();
        let paths: Vec<String> = (1..=6).map(|n| format!("/a/b{n}")).collect();
        for path in &paths {
            blank(&s, path);
            s.set_property(path, "ex:label", Value::string(path.as_str())).unwrap();
        }
        for path in &paths {
            let others = paths
                .iter()
                .filter(|p| *p != path)
                .map(|p| Value::Path(p.clone()))
                .collect();
            s.set_values(path, "ex:next", others).unwrap();
        }
        s.set_property("/a", "ex:next", Value::Path("/a/b1".into())).unwrap();

        let session: Arc<dyn Session> = s;
        let converter = converter(&session);
        let a = Resource::require(&session, "/a").unwrap();

        // raw stream, before any graph-level dedup
        let triples = blank_node_context(&a, &converter)
            .unwrap()
            .collect_triples()
            .unwrap();
        let labels = triples
            .iter()
            .filter(|t| t.predicate_iri() == Some("http://example.org/ns#label"))
            .count();
        assert_eq!(labels, 6);
        assert_eq!(
            triples.iter().filter(|t| t.predicate_iri() == Some(NEXT)).count(),
            6 * 5
        );
        let graph = blank_node_context(&a, &converter).unwrap().into_graph().unwrap();
        assert_eq!(graph.len(), triples.len());
    }

    #[test]
    fn test_pointers_to_ordinary_resources_are_not_embedded() {
        let s = repo();
        s.create_container("/a").unwrap();
        let other = s.create_container("/other").unwrap();
        s.set_property("/a", "ex:next", Value::Reference(other.identifier)).unwrap();

        let session: Arc<dyn Session> = s;
        let converter = converter(&session);
        let a = Resource::require(&session, "/a").unwrap();
        assert_eq!(blank_node_context(&a, &converter).unwrap().count(), 0);
    }

    #[test]
    fn test_hash_children_with_their_blank_nodes() {
        let s = repo();
        s.create_container("/a").unwrap();
        s.add_node("/a/#", internal::NT_UNSTRUCTURED).unwrap();
        s.add_node("/a/#/frag", internal::NT_UNSTRUCTURED).unwrap();
        s.set_property("/a/#/frag", "ex:label", Value::string("fragment")).unwrap();
        blank(&s, "/a/bn");
        s.set_property("/a/bn", "ex:label", Value::string("blank")).unwrap();
        s.set_property("/a/#/frag", "ex:next", Value::Path("/a/bn".into())).unwrap();

        let session: Arc<dyn Session> = s;
        let converter = converter(&session);
        let a = Resource::require(&session, "/a").unwrap();
        let stream = hash_context(&a, &converter).unwrap();
        assert_eq!(stream.topic(), Some(&Term::iri("http://h/rest/a")));
        let graph = stream.into_graph().unwrap();

        let frag = Term::iri("http://h/rest/a#frag");
        let bn = Term::iri("http://h/rest/a/bn");
        let label = Term::iri("http://example.org/ns#label");
        assert!(graph.contains(&frag, &label, &Term::string("fragment")));
        assert!(graph.contains(&frag, &Term::iri(NEXT), &bn));
        assert!(graph.contains(&bn, &label, &Term::string("blank")));
        assert_eq!(graph.subjects(), vec![&frag, &bn]);
    }

    #[test]
    fn test_no_hash_holder() {
        let s = repo();
        s.create_container("/a").unwrap();
        let session: Arc<dyn Session> = s;
        let converter = converter(&session);
        let a = Resource::require(&session, "/a").unwrap();
        assert_eq!(hash_context(&a, &converter).unwrap().count(), 0);
    }
}
