//! Fixity check results as PREMIS triples

use chrono::Utc;
use ldp_graph_ir::{Datatype, Term, Triple};
use ldp_kernel::{FixityResult, IdentifierConverter, RdfStream, Resource, Result};
use ldp_vocab::{fedora, premis, rdf};

/// One `premis:Fixity` node per stored copy of a binary.
///
/// Each result is verified against `expected_digest` and `expected_size`
/// and carries one `fedora:status` per outcome. Result subjects are minted
/// under the topic as `#fixity/<millis>-<n>` and are not stable across
/// requests.
pub fn fixity_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
    results: Vec<FixityResult>,
    expected_digest: &str,
    expected_size: u64,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    let Some(topic_iri) = topic.as_iri().map(str::to_string) else {
        return Ok(RdfStream::empty().with_topic(topic));
    };
    let millis = Utc::now().timestamp_millis();
    let expected_digest = expected_digest.to_string();

    let subject = topic.clone();
    let triples = results.into_iter().enumerate().flat_map(move |(seq, result)| {
        let result = result.verify(&expected_digest, expected_size);
        let node = Term::iri(format!("{topic_iri}#fixity/{millis}-{seq}"));
        tracing::trace!(
            location = %result.content_location,
            matches = result.matches(),
            "fixity result"
        );
        result_triples(&subject, node, &result).into_iter().map(Ok)
    });
    Ok(RdfStream::new(topic, triples))
}

/// `xsd:long`, or `xsd:integer` for sizes past its range
fn size_literal(size: u64) -> Term {
    match i64::try_from(size) {
        Ok(size) => Term::long(size),
        Err(_) => Term::typed(size.to_string(), Datatype::xsd_integer()),
    }
}

fn result_triples(topic: &Term, node: Term, result: &FixityResult) -> Vec<Triple> {
    let location = Term::iri(&result.content_location);
    let mut triples = vec![
        Triple::new(topic.clone(), Term::iri(premis::HAS_FIXITY), node.clone()),
        Triple::new(node.clone(), Term::iri(rdf::TYPE), Term::iri(premis::FIXITY)),
    ];
    triples.extend(result.states.iter().map(|state| {
        Triple::new(node.clone(), Term::iri(fedora::STATUS), Term::string(state.as_str()))
    }));
    triples.extend([
        Triple::new(
            node.clone(),
            Term::iri(premis::HAS_MESSAGE_DIGEST),
            Term::iri(&result.computed_digest),
        ),
        Triple::new(
            node.clone(),
            Term::iri(premis::HAS_SIZE),
            size_literal(result.computed_size),
        ),
        Triple::new(node, Term::iri(premis::HAS_CONTENT_LOCATION), location.clone()),
        Triple::new(location.clone(), Term::iri(rdf::TYPE), Term::iri(premis::CONTENT_LOCATION)),
        Triple::new(
            location,
            Term::iri(premis::HAS_CONTENT_LOCATION_VALUE),
            Term::string(&result.content_location),
        ),
    ]);
    triples
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldp_kernel::{DigestAlgorithm, HttpIdentifierConverter, MemoryRepository, RequestScope, Session};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn binary() -> (Arc<dyn Session>, HttpIdentifierConverter, Resource) {
        let s = MemoryRepository::new().open("default").unwrap();
        s.create_binary("/bin", b"hello", "text/plain").unwrap();
        let session: Arc<dyn Session> = s;
        let converter = HttpIdentifierConverter::new("http://h/rest", &RequestScope::Default, session.clone());
        let resource = Resource::require(&session, "/bin/jcr:content").unwrap();
        (session, converter, resource)
    }

    #[test]
    fn test_size_past_long_range() {
        assert_eq!(size_literal(5), Term::long(5));
        assert_eq!(
            size_literal(u64::MAX),
            Term::typed("18446744073709551615", Datatype::xsd_integer())
        );
    }

    #[test]
    fn test_successful_check() {
        let (_session, converter, resource) = binary();
        let digest = DigestAlgorithm::Sha1.digest_uri(b"hello");
        let results = vec![FixityResult::new("memory://default/bin", &digest, 5)];

        let graph = fixity_context(&resource, &converter, results, &digest, 5)
            .unwrap()
            .into_graph()
            .unwrap();

        let topic = Term::iri("http://h/rest/bin");
        let nodes: Vec<&Term> = graph.objects(&topic, premis::HAS_FIXITY).collect();
        assert_eq!(nodes.len(), 1);
        let node = nodes[0].clone();
        assert!(node.as_iri().unwrap().starts_with("http://h/rest/bin#fixity/"));

        assert_eq!(
            graph.objects(&node, fedora::STATUS).collect::<Vec<_>>(),
            vec![&Term::string("SUCCESS")]
        );
        assert_eq!(
            graph.objects(&node, premis::HAS_MESSAGE_DIGEST).collect::<Vec<_>>(),
            vec![&Term::iri(&digest)]
        );
        assert_eq!(
            graph.objects(&node, premis::HAS_SIZE).collect::<Vec<_>>(),
            vec![&Term::long(5)]
        );
        let location = Term::iri("memory://default/bin");
        assert!(graph.contains(&location, &Term::iri(rdf::TYPE), &Term::iri(premis::CONTENT_LOCATION)));
        assert!(graph.contains(
            &location,
            &Term::iri(premis::HAS_CONTENT_LOCATION_VALUE),
            &Term::string("memory://default/bin")
        ));
    }

    #[test]
    fn test_each_copy_gets_its_own_node_and_states() {
        let (_session, converter, resource) = binary();
        let digest = DigestAlgorithm::Sha1.digest_uri(b"hello");
        let results = vec![
            FixityResult::new("store:a", &digest, 5),
            FixityResult::new("store:b", "urn:sha1:0000", 4),
        ];

        let graph = fixity_context(&resource, &converter, results, &digest, 5)
            .unwrap()
            .into_graph()
            .unwrap();
        let topic = Term::iri("http://h/rest/bin");
        let nodes: Vec<Term> = graph.objects(&topic, premis::HAS_FIXITY).cloned().collect();
        assert_eq!(nodes.len(), 2);
        assert_ne!(nodes[0], nodes[1]);

        let mut states: Vec<&Term> = graph.objects(&nodes[1], fedora::STATUS).collect();
        states.sort();
        assert_eq!(states, vec![&Term::string("BAD_CHECKSUM"), &Term::string("BAD_SIZE")]);
    }
}
