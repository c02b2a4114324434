//! `fedora:hasParent` linkage

use ldp_graph_ir::{Term, Triple};
use ldp_kernel::{IdentifierConverter, RdfStream, Resource, Result};
use ldp_vocab::{fedora, internal};

/// `(topic, fedora:hasParent, container)`, or nothing at the root.
///
/// A snapshot of a versionable resource does not restate its live
/// resource's place in the hierarchy.
pub fn parent_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    if resource.is_root() {
        return Ok(RdfStream::empty().with_topic(topic));
    }
    if resource.is_frozen() {
        if let Some(live) = resource.unfrozen_resource()? {
            if live.has_type(internal::MIX_VERSIONABLE)? {
                tracing::trace!(path = resource.path(), "snapshot of versionable resource; no parent");
                return Ok(RdfStream::empty().with_topic(topic));
            }
        }
    }

    let Some(container) = resource.container()? else {
        return Ok(RdfStream::empty().with_topic(topic));
    };
    let parent = converter.subject(&container)?;
    let triple = Triple::new(topic.clone(), Term::iri(fedora::HAS_PARENT), parent);
    Ok(RdfStream::from_triples(topic, vec![triple]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldp_kernel::{HttpIdentifierConverter, MemoryRepository, RequestScope, Session};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn parents(session: &Arc<dyn Session>, path: &str) -> Vec<Triple> {
        let converter = HttpIdentifierConverter::new("http://h/rest", &RequestScope::Default, session.clone());
        let resource = Resource::require(session, path).unwrap();
        parent_context(&resource, &converter).unwrap().collect_triples().unwrap()
    }

    #[test]
    fn test_root_has_no_parent() {
        let session: Arc<dyn Session> = MemoryRepository::new().open("default").unwrap();
        assert!(parents(&session, "/").is_empty());
    }

    #[test]
    fn test_parent_skips_pairtree_and_binary_description() {
        let s = MemoryRepository::new().open("default").unwrap();
        s.create_container("/a").unwrap();
        s.add_node("/a/ab", internal::NT_FOLDER).unwrap();
        s.add_mixin("/a/ab", internal::FEDORA_PAIRTREE).unwrap();
        s.create_binary("/a/ab/bin", b"x", "text/plain").unwrap();

        let session: Arc<dyn Session> = s;
        let expected = vec![Triple::iri(
            "http://h/rest/a/ab/bin",
            fedora::HAS_PARENT,
            Term::iri("http://h/rest/a"),
        )];
        assert_eq!(parents(&session, "/a/ab/bin/jcr:content"), expected);
        assert_eq!(parents(&session, "/a/ab/bin"), expected);
    }

    #[test]
    fn test_versionable_snapshot_has_no_parent() {
        let s = MemoryRepository::new().open("default").unwrap();
        s.create_container("/a").unwrap();
        s.create_container("/a/v").unwrap();
        s.add_mixin("/a/v", internal::MIX_VERSIONABLE).unwrap();
        s.create_container("/a/v/child").unwrap();
        let version = s.checkin("/a/v", &[]).unwrap();

        let session: Arc<dyn Session> = s;
        assert!(parents(&session, &version.frozen_path).is_empty());

        let frozen_child = format!("{}/child", version.frozen_path);
        assert_eq!(
            parents(&session, &frozen_child),
            vec![Triple::iri(
                format!("http://h/rest{frozen_child}"),
                fedora::HAS_PARENT,
                Term::iri(format!("http://h/rest{}", version.frozen_path)),
            )]
        );
    }
}
