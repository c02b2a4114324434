//! LDP membership triples
//!
//! Membership is asserted on a container's *membership resource*: the
//! container itself unless it names another one with
//! `ldp:membershipResource`. Which predicate is used, and what the object
//! of each membership triple is, depends on the container variant:
//!
//! | variant  | predicate                 | object                                   |
//! |----------|---------------------------|------------------------------------------|
//! | basic    | `ldp:member`              | the child                                |
//! | direct   | `ldp:hasMemberRelation`   | the child                                |
//! | indirect | `ldp:hasMemberRelation`   | values of the inserted-content property  |
//!
//! A direct or indirect container missing the properties it needs asserts
//! nothing.

use crate::value_converter::ValueConverter;
use ldp_graph_ir::{Term, Triple};
use ldp_kernel::names::name_for_rdf_iri;
use ldp_kernel::{
    ContainerVariant, IdentifierConverter, RdfStream, ReferenceKind, Resource, Result,
};
use ldp_vocab::{internal, ldp};
use rustc_hash::FxHashSet;

/// Membership triples whose membership resource is `resource`.
///
/// Containers considered: `resource` itself when it is a membership
/// container whose membership resource is itself, and every container whose
/// `ldp:membershipResource` references `resource`.
pub fn membership_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    let values = ValueConverter::new(resource.session().clone(), converter);
    let containers = membership_containers(resource, &topic, &values)?;

    let subject = topic.clone();
    Ok(RdfStream::flat_map(
        topic,
        containers.into_iter().map(Ok),
        move |(container, variant)| container_relations(&container, variant, &subject, &values),
    ))
}

/// Inverse membership: `(member, isMemberOfRelation, membership resource)`.
///
/// Only direct and indirect containers declare an inverse relation. For an
/// indirect container the members are the in-domain IRIs found in
/// `resource`'s inserted-content property.
pub fn is_member_of_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    let empty = || Ok(RdfStream::empty().with_topic(topic.clone()));

    let Some(container) = resource.container()? else {
        return empty();
    };
    let variant = match container.container_variant()? {
        Some(v @ (ContainerVariant::Direct | ContainerVariant::Indirect)) => v,
        _ => return empty(),
    };
    let Some(relation) = string_property(&container, internal::LDP_IS_MEMBER_OF_RELATION)? else {
        return empty();
    };

    let values = ValueConverter::new(resource.session().clone(), converter);
    let Some(membership) = membership_resource(&container, &values)? else {
        return empty();
    };
    let relation = Term::iri(relation);

    let inserted = match variant {
        ContainerVariant::Indirect => {
            match string_property(&container, internal::LDP_INSERTED_CONTENT_RELATION)? {
                Some(iri) => iri,
                None => {
                    tracing::debug!(container = container.path(), "indirect container without insertedContentRelation");
                    return empty();
                }
            }
        }
        _ => ldp::MEMBER_SUBJECT.to_string(),
    };

    if inserted == ldp::MEMBER_SUBJECT {
        let triple = Triple::new(topic.clone(), relation, membership);
        return Ok(RdfStream::from_triples(topic, vec![triple]));
    }

    let Some(name) = name_for_rdf_iri(resource.session().as_ref(), &inserted)? else {
        tracing::debug!(%inserted, "inserted content relation has no store name");
        return empty();
    };
    let Some(property) = resource.property(&name)? else {
        return empty();
    };

    let mut triples = Vec::new();
    for value in &property.values {
        let Some(member) = values.convert(value)? else {
            continue;
        };
        match member.as_iri() {
            Some(iri) if converter.in_domain(iri) => {
                triples.push(Triple::new(member.clone(), relation.clone(), membership.clone()));
            }
            _ => tracing::trace!(%member, "skipping out-of-domain member"),
        }
    }
    Ok(RdfStream::from_triples(topic, triples))
}

fn membership_containers(
    resource: &Resource,
    topic: &Term,
    values: &ValueConverter<'_>,
) -> Result<Vec<(Resource, ContainerVariant)>> {
    let mut seen = FxHashSet::default();
    let mut containers = Vec::new();

    if let Some(variant) = resource.container_variant()? {
        if membership_resource(resource, values)?.as_ref() == Some(topic) {
            seen.insert(resource.path().to_string());
            containers.push((resource.clone(), variant));
        }
    }

    for property in resource
        .session()
        .references(resource.path(), ReferenceKind::All)?
    {
        let property = property?;
        if property.name != internal::LDP_MEMBER_RESOURCE || !seen.insert(property.owner.clone()) {
            continue;
        }
        let Some(container) = Resource::at(resource.session(), &property.owner)? else {
            continue;
        };
        if let Some(variant) = container.container_variant()? {
            containers.push((container, variant));
        }
    }
    tracing::debug!(path = resource.path(), containers = containers.len(), "membership containers");
    Ok(containers)
}

/// The resource a container asserts membership on.
///
/// `ldp:membershipResource` may be a reference, weak reference or path
/// (resolved to the node's IRI) or a literal URI; without it the container
/// is its own membership resource.
fn membership_resource(container: &Resource, values: &ValueConverter<'_>) -> Result<Option<Term>> {
    let Some(property) = container.property(internal::LDP_MEMBER_RESOURCE)? else {
        return Ok(Some(values.converter().subject(container)?));
    };
    match property.value() {
        Some(value) if value.is_node_pointer() => values.convert(value),
        Some(value) => Ok(value.as_str().map(Term::iri)),
        None => Ok(None),
    }
}

fn container_relations<'a>(
    container: &Resource,
    variant: ContainerVariant,
    subject: &Term,
    values: &ValueConverter<'a>,
) -> Result<RdfStream<'a>> {
    let empty = || Ok(RdfStream::empty().with_topic(subject.clone()));

    let relation = match variant {
        ContainerVariant::Basic => ldp::MEMBER.to_string(),
        ContainerVariant::Direct | ContainerVariant::Indirect => {
            match string_property(container, internal::LDP_HAS_MEMBER_RELATION)? {
                Some(relation) => relation,
                None => {
                    tracing::debug!(container = container.path(), "container without hasMemberRelation");
                    return empty();
                }
            }
        }
    };

    let inserted = match variant {
        ContainerVariant::Indirect => {
            match string_property(container, internal::LDP_INSERTED_CONTENT_RELATION)? {
                Some(iri) if iri == ldp::MEMBER_SUBJECT => None,
                Some(iri) => match name_for_rdf_iri(container.session().as_ref(), &iri)? {
                    Some(name) => Some(name),
                    None => {
                        tracing::debug!(%iri, "inserted content relation has no store name");
                        return empty();
                    }
                },
                None => {
                    tracing::debug!(container = container.path(), "indirect container without insertedContentRelation");
                    return empty();
                }
            }
        }
        ContainerVariant::Basic | ContainerVariant::Direct => None,
    };

    let relation = Term::iri(relation);
    let subject = subject.clone();
    let values = values.clone();
    Ok(RdfStream::flat_map(
        subject.clone(),
        container.children()?,
        move |child| {
            let Some(name) = &inserted else {
                let member = values.converter().subject(&child)?;
                let triple = Triple::new(subject.clone(), relation.clone(), member);
                return Ok(RdfStream::from_triples(subject.clone(), vec![triple]));
            };
            let Some(property) = child.property(name)? else {
                tracing::trace!(child = child.path(), property = %name, "child lacks inserted content");
                return Ok(RdfStream::empty());
            };
            let mut triples = Vec::with_capacity(property.values.len());
            for value in &property.values {
                if let Some(object) = values.convert(value)? {
                    triples.push(Triple::new(subject.clone(), relation.clone(), object));
                }
            }
            Ok(RdfStream::from_triples(subject.clone(), triples))
        },
    ))
}

/// First value of a URI- or string-valued property
fn string_property(resource: &Resource, name: &str) -> Result<Option<String>> {
    Ok(resource
        .property(name)?
        .as_ref()
        .and_then(|p| p.value())
        .and_then(|v| v.as_str())
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldp_kernel::{
        HttpIdentifierConverter, MemoryRepository, MemorySession, NodeType, RequestScope, Session, Value,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const BASE: &str = "http://h/rest";
    const HAS_PART: &str = "http://purl.org/dc/terms/hasPart";
    const IS_PART_OF: &str = "http://purl.org/dc/terms/isPartOf";
    const PROXY_FOR: &str = "http://www.openarchives.org/ore/terms/proxyFor";

    fn iri(path: &str) -> Term {
        Term::iri(format!("{BASE}{path}"))
    }

    fn repo() -> (MemoryRepository, Arc<MemorySession>) {
        let repo = MemoryRepository::new();
        repo.register_namespace("dcterms", "http://purl.org/dc/terms/");
        repo.register_namespace("ore", "http://www.openarchives.org/ore/terms/");
        let s = repo.open("default").unwrap();
        (repo, s)
    }

    fn members(session: &Arc<MemorySession>, path: &str) -> Vec<Triple> {
        let session: Arc<dyn Session> = session.clone();
        let converter = HttpIdentifierConverter::new(BASE, &RequestScope::Default, session.clone());
        let resource = Resource::require(&session, path).unwrap();
        let mut triples = membership_context(&resource, &converter)
            .unwrap()
            .collect_triples()
            .unwrap();
        triples.sort();
        triples
    }

    fn member_of(session: &Arc<MemorySession>, path: &str) -> Vec<Triple> {
        let session: Arc<dyn Session> = session.clone();
        let converter = HttpIdentifierConverter::new(BASE, &RequestScope::Default, session.clone());
        let resource = Resource::require(&session, path).unwrap();
        let mut triples = is_member_of_context(&resource, &converter)
            .unwrap()
            .collect_triples()
            .unwrap();
        triples.sort();
        triples
    }

    fn container_with_children(s: &MemorySession, path: &str, variant: &str) {
        s.create_container(path).unwrap();
        s.add_mixin(path, variant).unwrap();
        s.create_container(&format!("{path}/a")).unwrap();
        s.create_container(&format!("{path}/b")).unwrap();
    }

    #[test]
    fn test_basic_container_members_are_children() {
        let (_repo, s) = repo();
        container_with_children(&s, "/c", internal::LDP_BASIC_CONTAINER);

        let expected = vec![
            Triple::new(iri("/c"), Term::iri(ldp::MEMBER), iri("/c/a")),
            Triple::new(iri("/c"), Term::iri(ldp::MEMBER), iri("/c/b")),
        ];
        assert_eq!(members(&s, "/c"), expected);

        // basic containers use a fixed predicate; a stray relation changes nothing
        s.set_property("/c", internal::LDP_HAS_MEMBER_RELATION, Value::uri(HAS_PART)).unwrap();
        s.remove_property("/c", internal::LDP_HAS_MEMBER_RELATION).unwrap();
        assert_eq!(members(&s, "/c"), expected);
    }

    #[test]
    fn test_variant_inherited_through_a_custom_mixin() {
        let (repo, s) = repo();
        repo.register_namespace("ex", "http://example.org/ns#");
        repo.register_node_type(NodeType::mixin("ex:Collection", &[internal::LDP_BASIC_CONTAINER]));
        container_with_children(&s, "/c", "ex:Collection");

        assert_eq!(
            members(&s, "/c"),
            vec![
                Triple::new(iri("/c"), Term::iri(ldp::MEMBER), iri("/c/a")),
                Triple::new(iri("/c"), Term::iri(ldp::MEMBER), iri("/c/b")),
            ]
        );
    }

    #[test]
    fn test_direct_container_on_other_resource() {
        let (_repo, s) = repo();
        s.create_container("/target").unwrap();
        container_with_children(&s, "/c", internal::LDP_DIRECT_CONTAINER);
        let target = s.node("/target").unwrap().unwrap();
        s.set_property("/c", internal::LDP_MEMBER_RESOURCE, Value::Reference(target.identifier))
            .unwrap();
        s.set_property("/c", internal::LDP_HAS_MEMBER_RELATION, Value::uri(HAS_PART)).unwrap();

        assert_eq!(
            members(&s, "/target"),
            vec![
                Triple::new(iri("/target"), Term::iri(HAS_PART), iri("/c/a")),
                Triple::new(iri("/target"), Term::iri(HAS_PART), iri("/c/b")),
            ]
        );
        assert!(members(&s, "/c").is_empty());

        s.remove_property("/c", internal::LDP_HAS_MEMBER_RELATION).unwrap();
        assert!(members(&s, "/target").is_empty());
    }

    #[test]
    fn test_direct_container_with_self_membership() {
        let (_repo, s) = repo();
        container_with_children(&s, "/c", internal::LDP_DIRECT_CONTAINER);
        s.set_property("/c", internal::LDP_HAS_MEMBER_RELATION, Value::uri(HAS_PART)).unwrap();
        s.set_property("/c", internal::LDP_MEMBER_RESOURCE, Value::uri(format!("{BASE}/c"))).unwrap();

        assert_eq!(members(&s, "/c").len(), 2);
    }

    #[test]
    fn test_indirect_container_uses_inserted_content() {
        let (_repo, s) = repo();
        container_with_children(&s, "/c", internal::LDP_INDIRECT_CONTAINER);
        s.set_property("/c", internal::LDP_HAS_MEMBER_RELATION, Value::uri(HAS_PART)).unwrap();
        s.set_property("/c", internal::LDP_INSERTED_CONTENT_RELATION, Value::uri(PROXY_FOR)).unwrap();
        s.set_property("/c/a", "ore:proxyFor", Value::uri("http://example.org/thing")).unwrap();

        assert_eq!(
            members(&s, "/c"),
            vec![Triple::new(
                iri("/c"),
                Term::iri(HAS_PART),
                Term::iri("http://example.org/thing")
            )]
        );

        s.remove_property("/c/a", "ore:proxyFor").unwrap();
        assert!(members(&s, "/c").is_empty());
    }

    #[test]
    fn test_indirect_container_needs_both_relations() {
        let (_repo, s) = repo();
        container_with_children(&s, "/c", internal::LDP_INDIRECT_CONTAINER);
        s.set_property("/c/a", "ore:proxyFor", Value::uri("http://example.org/thing")).unwrap();

        s.set_property("/c", internal::LDP_INSERTED_CONTENT_RELATION, Value::uri(PROXY_FOR)).unwrap();
        assert!(members(&s, "/c").is_empty());

        s.remove_property("/c", internal::LDP_INSERTED_CONTENT_RELATION).unwrap();
        s.set_property("/c", internal::LDP_HAS_MEMBER_RELATION, Value::uri(HAS_PART)).unwrap();
        assert!(members(&s, "/c").is_empty());
    }

    #[test]
    fn test_indirect_member_subject_behaves_as_direct() {
        let (_repo, s) = repo();
        container_with_children(&s, "/c", internal::LDP_INDIRECT_CONTAINER);
        s.set_property("/c", internal::LDP_HAS_MEMBER_RELATION, Value::uri(HAS_PART)).unwrap();
        s.set_property("/c", internal::LDP_INSERTED_CONTENT_RELATION, Value::uri(ldp::MEMBER_SUBJECT))
            .unwrap();

        assert_eq!(members(&s, "/c").len(), 2);
    }

    #[test]
    fn test_plain_container_has_no_members() {
        let (_repo, s) = repo();
        s.create_container("/c").unwrap();
        s.create_container("/c/a").unwrap();
        assert!(members(&s, "/c").is_empty());
    }

    #[test]
    fn test_is_member_of_direct() {
        let (_repo, s) = repo();
        s.create_container("/target").unwrap();
        container_with_children(&s, "/c", internal::LDP_DIRECT_CONTAINER);
        s.set_property("/c", internal::LDP_IS_MEMBER_OF_RELATION, Value::uri(IS_PART_OF)).unwrap();

        assert_eq!(
            member_of(&s, "/c/a"),
            vec![Triple::new(iri("/c/a"), Term::iri(IS_PART_OF), iri("/c"))]
        );

        s.set_property("/c", internal::LDP_MEMBER_RESOURCE, Value::Path("/target".into())).unwrap();
        assert_eq!(
            member_of(&s, "/c/a"),
            vec![Triple::new(iri("/c/a"), Term::iri(IS_PART_OF), iri("/target"))]
        );

        s.set_property("/c", internal::LDP_MEMBER_RESOURCE, Value::uri("http://example.org/elsewhere"))
            .unwrap();
        assert_eq!(
            member_of(&s, "/c/a"),
            vec![Triple::new(
                iri("/c/a"),
                Term::iri(IS_PART_OF),
                Term::iri("http://example.org/elsewhere")
            )]
        );
    }

    #[test]
    fn test_is_member_of_indirect_uses_in_domain_values() {
        let (_repo, s) = repo();
        s.create_container("/target").unwrap();
        s.create_container("/other").unwrap();
        container_with_children(&s, "/c", internal::LDP_INDIRECT_CONTAINER);
        s.set_property("/c", internal::LDP_IS_MEMBER_OF_RELATION, Value::uri(IS_PART_OF)).unwrap();
        s.set_property("/c", internal::LDP_INSERTED_CONTENT_RELATION, Value::uri(PROXY_FOR)).unwrap();
        s.set_values(
            "/c/a",
            "ore:proxyFor",
            vec![
                Value::uri(format!("{BASE}/other")),
                Value::uri("http://example.org/outside"),
            ],
        )
        .unwrap();

        assert_eq!(
            member_of(&s, "/c/a"),
            vec![Triple::new(iri("/other"), Term::iri(IS_PART_OF), iri("/c"))]
        );
        assert!(member_of(&s, "/c/b").is_empty());
    }

    #[test]
    fn test_is_member_of_needs_relation_and_variant() {
        let (_repo, s) = repo();
        container_with_children(&s, "/basic", internal::LDP_BASIC_CONTAINER);
        s.set_property("/basic", internal::LDP_IS_MEMBER_OF_RELATION, Value::uri(IS_PART_OF)).unwrap();
        assert!(member_of(&s, "/basic/a").is_empty());

        container_with_children(&s, "/direct", internal::LDP_DIRECT_CONTAINER);
        assert!(member_of(&s, "/direct/a").is_empty());
    }
}
