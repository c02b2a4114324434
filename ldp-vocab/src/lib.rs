//! RDF Vocabulary Constants for the LDP repository
//!
//! This crate provides a centralized location for RDF vocabulary IRIs and the
//! internal (prefixed) names the resource store uses for node types and
//! properties.
//!
//! # Organization
//!
//! Constants are organized by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `rdfs` - RDFS vocabulary (http://www.w3.org/2000/01/rdf-schema#)
//! - `xsd` - XSD vocabulary (http://www.w3.org/2001/XMLSchema#)
//! - `ldp` - Linked Data Platform vocabulary (http://www.w3.org/ns/ldp#)
//! - `fedora` - repository vocabulary (http://fedora.info/definitions/v4/repository#)
//! - `premis` - PREMIS preservation vocabulary, used for fixity reports
//! - `vann` / `voaf` - vocabulary-description terms for namespace triples
//! - `internal` - internal namespace URIs and prefixed type/property names
//! - `prefer` - LDP `Prefer` header IRIs
//! - `namespaces` - internal↔RDF namespace mapping and the default prefix table

/// RDF vocabulary constants
pub mod rdf {
    /// RDF namespace IRI
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// RDFS vocabulary constants
pub mod rdfs {
    /// RDFS namespace IRI
    pub const NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// rdfs:Class IRI
    pub const CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";

    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// rdfs:subClassOf IRI
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
}

/// XSD vocabulary constants
pub mod xsd {
    /// XSD namespace IRI
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:boolean IRI
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

    /// xsd:integer IRI
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:long IRI
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

    /// xsd:double IRI
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// xsd:decimal IRI
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

    /// xsd:dateTime IRI
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// xsd:anyURI IRI
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
}

/// Linked Data Platform vocabulary constants
pub mod ldp {
    /// LDP namespace IRI
    pub const NAMESPACE: &str = "http://www.w3.org/ns/ldp#";

    /// ldp:RDFSource
    pub const RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#RDFSource";

    /// ldp:NonRDFSource
    pub const NON_RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#NonRDFSource";

    /// ldp:Container
    pub const CONTAINER: &str = "http://www.w3.org/ns/ldp#Container";

    /// ldp:BasicContainer
    pub const BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";

    /// ldp:DirectContainer
    pub const DIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#DirectContainer";

    /// ldp:IndirectContainer
    pub const INDIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#IndirectContainer";

    /// ldp:contains
    pub const CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";

    /// ldp:member - the fixed membership predicate of basic containers
    pub const MEMBER: &str = "http://www.w3.org/ns/ldp#member";

    /// ldp:MemberSubject - inserted-content relation meaning "the member itself"
    pub const MEMBER_SUBJECT: &str = "http://www.w3.org/ns/ldp#MemberSubject";

    /// ldp:membershipResource
    pub const MEMBERSHIP_RESOURCE: &str = "http://www.w3.org/ns/ldp#membershipResource";

    /// ldp:hasMemberRelation
    pub const HAS_MEMBER_RELATION: &str = "http://www.w3.org/ns/ldp#hasMemberRelation";

    /// ldp:isMemberOfRelation
    pub const IS_MEMBER_OF_RELATION: &str = "http://www.w3.org/ns/ldp#isMemberOfRelation";

    /// ldp:insertedContentRelation
    pub const INSERTED_CONTENT_RELATION: &str =
        "http://www.w3.org/ns/ldp#insertedContentRelation";
}

/// Repository vocabulary constants
pub mod fedora {
    /// Repository namespace IRI
    pub const NAMESPACE: &str = "http://fedora.info/definitions/v4/repository#";

    /// fedora:hasParent
    pub const HAS_PARENT: &str = "http://fedora.info/definitions/v4/repository#hasParent";

    /// fedora:hasVersion
    pub const HAS_VERSION: &str = "http://fedora.info/definitions/v4/repository#hasVersion";

    /// fedora:hasVersionLabel
    pub const HAS_VERSION_LABEL: &str =
        "http://fedora.info/definitions/v4/repository#hasVersionLabel";

    /// fedora:created
    pub const CREATED: &str = "http://fedora.info/definitions/v4/repository#created";

    /// fedora:status - fixity state of a single check
    pub const STATUS: &str = "http://fedora.info/definitions/v4/repository#status";

    /// fedora:InboundReferences - Prefer IRI for the references context
    pub const INBOUND_REFERENCES: &str =
        "http://fedora.info/definitions/v4/repository#InboundReferences";

    /// fedora:ServerManaged - Prefer IRI for managed triples
    pub const SERVER_MANAGED: &str = "http://fedora.info/definitions/v4/repository#ServerManaged";

    /// fedora:EmbedResources - Prefer IRI for hash/blank-node embedding
    pub const EMBED_RESOURCES: &str =
        "http://fedora.info/definitions/v4/repository#EmbedResources";

    /// fedora:PreferVersions - Prefer IRI for the version listing
    pub const PREFER_VERSIONS: &str =
        "http://fedora.info/definitions/v4/repository#PreferVersions";
}

/// PREMIS vocabulary constants (fixity reporting)
pub mod premis {
    /// PREMIS namespace IRI
    pub const NAMESPACE: &str = "http://www.loc.gov/premis/rdf/v1#";

    /// premis:hasFixity
    pub const HAS_FIXITY: &str = "http://www.loc.gov/premis/rdf/v1#hasFixity";

    /// premis:Fixity
    pub const FIXITY: &str = "http://www.loc.gov/premis/rdf/v1#Fixity";

    /// premis:hasMessageDigest
    pub const HAS_MESSAGE_DIGEST: &str = "http://www.loc.gov/premis/rdf/v1#hasMessageDigest";

    /// premis:hasSize
    pub const HAS_SIZE: &str = "http://www.loc.gov/premis/rdf/v1#hasSize";

    /// premis:hasContentLocation
    pub const HAS_CONTENT_LOCATION: &str = "http://www.loc.gov/premis/rdf/v1#hasContentLocation";

    /// premis:ContentLocation
    pub const CONTENT_LOCATION: &str = "http://www.loc.gov/premis/rdf/v1#ContentLocation";

    /// premis:hasContentLocationValue
    pub const HAS_CONTENT_LOCATION_VALUE: &str =
        "http://www.loc.gov/premis/rdf/v1#hasContentLocationValue";
}

/// VANN vocabulary constants (namespace descriptions)
pub mod vann {
    /// vann:preferredNamespacePrefix
    pub const PREFERRED_NAMESPACE_PREFIX: &str =
        "http://purl.org/vocab/vann/preferredNamespacePrefix";

    /// vann:preferredNamespaceUri
    pub const PREFERRED_NAMESPACE_URI: &str = "http://purl.org/vocab/vann/preferredNamespaceUri";
}

/// VOAF vocabulary constants
pub mod voaf {
    /// voaf:Vocabulary
    pub const VOCABULARY: &str = "http://purl.org/vocommons/voaf#Vocabulary";
}

/// LDP `Prefer` header IRIs
pub mod prefer {
    /// ldp:PreferContainment
    pub const CONTAINMENT: &str = "http://www.w3.org/ns/ldp#PreferContainment";

    /// ldp:PreferMembership
    pub const MEMBERSHIP: &str = "http://www.w3.org/ns/ldp#PreferMembership";

    /// ldp:PreferMinimalContainer
    pub const MINIMAL_CONTAINER: &str = "http://www.w3.org/ns/ldp#PreferMinimalContainer";
}

/// Internal namespaces and prefixed names used by the resource store
///
/// The store names node types and properties as `prefix:localName`. These
/// are never exposed directly; the RDF layer resolves the prefix through the
/// session's namespace registry first.
pub mod internal {
    /// Namespace of `jcr:` names
    pub const JCR_NAMESPACE: &str = "http://www.jcp.org/jcr/1.0";

    /// Namespace of `nt:` names
    pub const NT_NAMESPACE: &str = "http://www.jcp.org/jcr/nt/1.0";

    /// Namespace of `mix:` names
    pub const MIX_NAMESPACE: &str = "http://www.jcp.org/jcr/mix/1.0";

    /// Namespace of `mode:` names (store-internal system types)
    pub const MODE_NAMESPACE: &str = "http://www.modeshape.org/1.0";

    /// Separator between prefix and local name
    pub const PREFIX_SEPARATOR: char = ':';

    /// Suffix on reference properties that shadow a URI-valued property
    pub const REFERENCE_PROPERTY_SUFFIX: &str = "_ref";

    /// Name of the child node that holds hash-fragment resources
    pub const HASH_HOLDER: &str = "#";

    /// Name of a binary's content node below its description
    pub const CONTENT: &str = "jcr:content";

    /// Binary payload property on the content node
    pub const DATA: &str = "jcr:data";

    /// Path segment that marks frozen (versioned) nodes
    pub const FROZEN_NODE: &str = "jcr:frozenNode";

    /// Identifier of the live node a frozen node was copied from
    pub const FROZEN_UUID: &str = "jcr:frozenUuid";

    /// Primary type of the live node, recorded on its frozen copy
    pub const FROZEN_PRIMARY_TYPE: &str = "jcr:frozenPrimaryType";

    /// Mixin types of the live node, recorded on its frozen copy
    pub const FROZEN_MIXIN_TYPES: &str = "jcr:frozenMixinTypes";

    /// Node-type property names
    pub const PRIMARY_TYPE: &str = "jcr:primaryType";
    pub const MIXIN_TYPES: &str = "jcr:mixinTypes";
    pub const UUID: &str = "jcr:uuid";

    /// Protected properties that are still exposed as RDF
    pub const CREATED: &str = "jcr:created";
    pub const CREATED_BY: &str = "jcr:createdBy";
    pub const LAST_MODIFIED: &str = "jcr:lastModified";
    pub const LAST_MODIFIED_BY: &str = "jcr:lastModifiedBy";
    pub const MIME_TYPE: &str = "jcr:mimeType";

    /// Protected properties exposed even though the store forbids edits
    pub const EXPOSED_PROTECTED: &[&str] =
        &[CREATED, CREATED_BY, LAST_MODIFIED, LAST_MODIFIED_BY, MIME_TYPE];

    /// Store node types
    pub const NT_BASE: &str = "nt:base";
    pub const NT_HIERARCHY_NODE: &str = "nt:hierarchyNode";
    pub const NT_FOLDER: &str = "nt:folder";
    pub const NT_FILE: &str = "nt:file";
    pub const NT_RESOURCE: &str = "nt:resource";
    pub const NT_FROZEN_NODE: &str = "nt:frozenNode";
    pub const NT_UNSTRUCTURED: &str = "nt:unstructured";
    pub const MIX_VERSIONABLE: &str = "mix:versionable";
    pub const MIX_REFERENCEABLE: &str = "mix:referenceable";
    pub const MIX_SIMPLE_VERSIONABLE: &str = "mix:simpleVersionable";
    pub const MIX_CREATED: &str = "mix:created";
    pub const MIX_LAST_MODIFIED: &str = "mix:lastModified";
    pub const MODE_ROOT: &str = "mode:root";
    pub const MODE_SYSTEM: &str = "mode:system";

    /// Repository node types
    pub const FEDORA_RESOURCE: &str = "fedora:Resource";
    pub const FEDORA_CONTAINER: &str = "fedora:Container";
    pub const FEDORA_BINARY: &str = "fedora:Binary";
    pub const FEDORA_NON_RDF_SOURCE_DESCRIPTION: &str = "fedora:NonRdfSourceDescription";
    pub const FEDORA_BLANKNODE: &str = "fedora:Blanknode";
    pub const FEDORA_PAIRTREE: &str = "fedora:Pairtree";
    pub const FEDORA_TOMBSTONE: &str = "fedora:Tombstone";

    /// LDP container mixins
    pub const LDP_BASIC_CONTAINER: &str = "ldp:BasicContainer";
    pub const LDP_DIRECT_CONTAINER: &str = "ldp:DirectContainer";
    pub const LDP_INDIRECT_CONTAINER: &str = "ldp:IndirectContainer";

    /// LDP configuration properties
    pub const LDP_MEMBER_RESOURCE: &str = "ldp:membershipResource";
    pub const LDP_HAS_MEMBER_RELATION: &str = "ldp:hasMemberRelation";
    pub const LDP_IS_MEMBER_OF_RELATION: &str = "ldp:isMemberOfRelation";
    pub const LDP_INSERTED_CONTENT_RELATION: &str = "ldp:insertedContentRelation";

    /// Binary content description properties
    pub const CONTENT_DIGEST: &str = "premis:hasMessageDigest";
    pub const CONTENT_SIZE: &str = "premis:hasSize";
}

/// Namespace mapping between the store and RDF
pub mod namespaces {
    use crate::{fedora, internal, ldp, premis, rdf, rdfs, xsd};

    /// Prefix → namespace table every repository starts with
    pub const DEFAULT_PREFIXES: &[(&str, &str)] = &[
        ("jcr", internal::JCR_NAMESPACE),
        ("nt", internal::NT_NAMESPACE),
        ("mix", internal::MIX_NAMESPACE),
        ("mode", internal::MODE_NAMESPACE),
        ("fedora", fedora::NAMESPACE),
        ("ldp", ldp::NAMESPACE),
        ("premis", premis::NAMESPACE),
        ("rdf", rdf::NAMESPACE),
        ("rdfs", rdfs::NAMESPACE),
        ("xsd", xsd::NAMESPACE),
    ];

    /// Prefixes never advertised in RDF output
    pub const HIDDEN_PREFIXES: &[&str] = &["", "jcr"];

    /// Map an internal namespace URI to the namespace used in RDF.
    ///
    /// The `jcr:` namespace is published under the repository namespace;
    /// every other namespace is used as-is.
    pub fn rdf_namespace_for(internal_namespace: &str) -> &str {
        if internal_namespace == internal::JCR_NAMESPACE {
            fedora::NAMESPACE
        } else {
            internal_namespace
        }
    }

    /// Inverse of [`rdf_namespace_for`].
    pub fn internal_namespace_for(rdf_namespace: &str) -> &str {
        if rdf_namespace == fedora::NAMESPACE {
            internal::JCR_NAMESPACE
        } else {
            rdf_namespace
        }
    }

    /// Split an IRI into (namespace, local name) at the last `#` or `/`.
    ///
    /// Returns `None` when the IRI has no such separator or the local name
    /// would be empty.
    pub fn split_iri(iri: &str) -> Option<(&str, &str)> {
        let idx = iri.rfind(['#', '/'])?;
        let (ns, local) = iri.split_at(idx + 1);
        if local.is_empty() {
            None
        } else {
            Some((ns, local))
        }
    }

    /// Is this IRI inside a namespace the repository manages?
    pub fn is_managed_namespace(iri: &str) -> bool {
        iri.starts_with(fedora::NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::namespaces::*;
    use super::*;

    #[test]
    fn test_jcr_namespace_is_published_as_repository_namespace() {
        assert_eq!(rdf_namespace_for(internal::JCR_NAMESPACE), fedora::NAMESPACE);
        assert_eq!(rdf_namespace_for(ldp::NAMESPACE), ldp::NAMESPACE);
        assert_eq!(internal_namespace_for(fedora::NAMESPACE), internal::JCR_NAMESPACE);
    }

    #[test]
    fn test_split_iri() {
        assert_eq!(
            split_iri("http://www.w3.org/ns/ldp#member"),
            Some(("http://www.w3.org/ns/ldp#", "member"))
        );
        assert_eq!(
            split_iri("http://purl.org/dc/elements/1.1/title"),
            Some(("http://purl.org/dc/elements/1.1/", "title"))
        );
        assert_eq!(split_iri("http://example.org/"), None);
        assert_eq!(split_iri("urn:nothing"), None);
    }

    #[test]
    fn test_vocab_iris_share_namespace() {
        assert!(ldp::CONTAINS.starts_with(ldp::NAMESPACE));
        assert!(fedora::HAS_PARENT.starts_with(fedora::NAMESPACE));
        assert!(premis::HAS_FIXITY.starts_with(premis::NAMESPACE));
        assert!(rdf::TYPE.starts_with(rdf::NAMESPACE));
        assert!(is_managed_namespace(fedora::HAS_VERSION));
        assert!(!is_managed_namespace("http://example.org/thing"));
    }
}
