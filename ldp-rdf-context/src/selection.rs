//! Which contexts a description is assembled from
//!
//! A [`ContextSelection`] is usually derived from the `include` and `omit`
//! IRIs of an LDP `Prefer` header, see [`ContextSelection::from_prefer`].

use ldp_graph_ir::Triple;
use ldp_vocab::namespaces::is_managed_namespace;
use ldp_vocab::{fedora, ldp, prefer, rdf};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One triple generator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    /// LDP interaction model (`ldp:RDFSource`, `ldp:Container`, ...)
    Ldp,
    /// `rdf:type` for the full type closure
    Type,
    Properties,
    Parent,
    /// `ldp:contains`
    Children,
    Membership,
    IsMemberOf,
    /// Inbound references from other resources
    References,
    Versions,
    /// Hash-fragment resources (`#frag`)
    Hash,
    BlankNodes,
    /// Prefixes and VANN descriptions of the registered namespaces
    Namespaces,
}

impl Context {
    /// Order in which selected contexts are concatenated
    pub const ORDER: [Context; 12] = [
        Context::Ldp,
        Context::Type,
        Context::Properties,
        Context::Parent,
        Context::Children,
        Context::Membership,
        Context::IsMemberOf,
        Context::References,
        Context::Versions,
        Context::Hash,
        Context::BlankNodes,
        Context::Namespaces,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Context::Ldp => "ldp",
            Context::Type => "type",
            Context::Properties => "properties",
            Context::Parent => "parent",
            Context::Children => "children",
            Context::Membership => "membership",
            Context::IsMemberOf => "is_member_of",
            Context::References => "references",
            Context::Versions => "versions",
            Context::Hash => "hash",
            Context::BlankNodes => "blank_nodes",
            Context::Namespaces => "namespaces",
        }
    }

    /// Contexts a `Prefer` IRI switches on or off. Empty for IRIs that
    /// select no context.
    fn for_preference(iri: &str) -> &'static [Context] {
        match iri {
            prefer::CONTAINMENT => &[Context::Children],
            prefer::MEMBERSHIP => &[Context::Membership, Context::IsMemberOf],
            fedora::INBOUND_REFERENCES => &[Context::References],
            fedora::EMBED_RESOURCES => &[Context::Hash, Context::BlankNodes],
            fedora::PREFER_VERSIONS => &[Context::Versions],
            _ => &[],
        }
    }
}

/// Selected contexts plus whether server-managed triples are kept
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSelection {
    pub contexts: BTreeSet<Context>,
    /// When false, triples recognised by [`is_managed_triple`] are dropped
    #[serde(default = "default_server_managed")]
    pub server_managed: bool,
}

fn default_server_managed() -> bool {
    true
}

impl Default for ContextSelection {
    /// Everything except inbound references and versions
    fn default() -> Self {
        Self::all()
            .without(Context::References)
            .without(Context::Versions)
    }
}

impl ContextSelection {
    /// Every context, server-managed triples included
    pub fn all() -> Self {
        Self {
            contexts: Context::ORDER.into_iter().collect(),
            server_managed: true,
        }
    }

    /// The resource itself: no containment, membership or embedded
    /// resources
    pub fn minimal() -> Self {
        Self::default()
            .without(Context::Children)
            .without(Context::Membership)
            .without(Context::IsMemberOf)
            .without(Context::Hash)
            .without(Context::BlankNodes)
    }

    /// Selection for the `include` and `omit` IRIs of a `Prefer:
    /// return=representation` header.
    ///
    /// Starts from [`ContextSelection::minimal`] when
    /// `ldp:PreferMinimalContainer` is included and from the default
    /// otherwise. Includes are applied before omits, so an IRI in both
    /// lists is omitted. Unknown IRIs are ignored.
    pub fn from_prefer<I, O>(include: I, omit: O) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        O: IntoIterator,
        O::Item: AsRef<str>,
    {
        let include: Vec<I::Item> = include.into_iter().collect();
        let minimal = include
            .iter()
            .any(|iri| iri.as_ref() == prefer::MINIMAL_CONTAINER);
        let mut selection = if minimal { Self::minimal() } else { Self::default() };

        for iri in &include {
            let iri = iri.as_ref();
            if iri == fedora::SERVER_MANAGED {
                selection.server_managed = true;
            }
            for context in Context::for_preference(iri) {
                selection.contexts.insert(*context);
            }
        }
        for iri in omit {
            let iri = iri.as_ref();
            if iri == fedora::SERVER_MANAGED {
                selection.server_managed = false;
            }
            for context in Context::for_preference(iri) {
                selection.contexts.remove(context);
            }
        }
        tracing::debug!(?selection, "selection from Prefer");
        selection
    }

    pub fn contains(&self, context: Context) -> bool {
        self.contexts.contains(&context)
    }

    pub fn with(mut self, context: Context) -> Self {
        self.contexts.insert(context);
        self
    }

    pub fn without(mut self, context: Context) -> Self {
        self.contexts.remove(&context);
        self
    }

    /// Selected contexts in concatenation order
    pub fn ordered(&self) -> impl Iterator<Item = Context> + '_ {
        Context::ORDER.into_iter().filter(|c| self.contains(*c))
    }
}

/// Is this a triple the server maintains rather than the client?
///
/// Managed: any predicate in the repository namespace, `ldp:contains`, and
/// `rdf:type` with a repository-namespace class.
pub fn is_managed_triple(triple: &Triple) -> bool {
    let Some(predicate) = triple.predicate_iri() else {
        return false;
    };
    if is_managed_namespace(predicate) || predicate == ldp::CONTAINS {
        return true;
    }
    predicate == rdf::TYPE && triple.o.as_iri().is_some_and(is_managed_namespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldp_graph_ir::Term;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_presets() {
        let default = ContextSelection::default();
        assert!(!default.contains(Context::References));
        assert!(!default.contains(Context::Versions));
        assert!(default.contains(Context::Children));
        assert!(default.server_managed);

        let minimal = ContextSelection::minimal();
        assert_eq!(
            minimal.ordered().collect::<Vec<_>>(),
            vec![
                Context::Ldp,
                Context::Type,
                Context::Properties,
                Context::Parent,
                Context::Namespaces
            ]
        );
        assert_eq!(ContextSelection::all().ordered().count(), Context::ORDER.len());
    }

    #[test]
    fn test_prefer_include_and_omit() {
        let selection = ContextSelection::from_prefer(
            [fedora::INBOUND_REFERENCES, fedora::PREFER_VERSIONS],
            [prefer::CONTAINMENT, fedora::EMBED_RESOURCES],
        );
        assert!(selection.contains(Context::References));
        assert!(selection.contains(Context::Versions));
        assert!(!selection.contains(Context::Children));
        assert!(!selection.contains(Context::Hash));
        assert!(!selection.contains(Context::BlankNodes));
        assert!(selection.contains(Context::Membership));
    }

    #[test]
    fn test_prefer_minimal_container() {
        let selection =
            ContextSelection::from_prefer([prefer::MINIMAL_CONTAINER, prefer::MEMBERSHIP], Vec::<String>::new());
        assert!(selection.contains(Context::Membership));
        assert!(selection.contains(Context::IsMemberOf));
        assert!(!selection.contains(Context::Children));
    }

    #[test]
    fn test_omit_wins_over_include() {
        let selection = ContextSelection::from_prefer([prefer::CONTAINMENT], [prefer::CONTAINMENT]);
        assert!(!selection.contains(Context::Children));

        let selection = ContextSelection::from_prefer([fedora::SERVER_MANAGED], [fedora::SERVER_MANAGED]);
        assert!(!selection.server_managed);
    }

    #[test]
    fn test_deserialize_with_default_flag() {
        let selection: ContextSelection =
            serde_json::from_str(r#"{"contexts": ["ldp", "is_member_of", "blank_nodes"]}"#).unwrap();
        assert!(selection.server_managed);
        assert_eq!(
            selection.ordered().collect::<Vec<_>>(),
            vec![Context::Ldp, Context::IsMemberOf, Context::BlankNodes]
        );
        assert_eq!(Context::IsMemberOf.name(), "is_member_of");
    }

    #[test]
    fn test_managed_triples() {
        let s = "http://h/rest/a";
        assert!(is_managed_triple(&Triple::iri(s, fedora::HAS_PARENT, Term::iri("http://h/rest"))));
        assert!(is_managed_triple(&Triple::iri(s, ldp::CONTAINS, Term::iri("http://h/rest/a/b"))));
        assert!(is_managed_triple(&Triple::iri(
            s,
            rdf::TYPE,
            Term::iri(format!("{}Container", fedora::NAMESPACE))
        )));
        assert!(!is_managed_triple(&Triple::iri(s, rdf::TYPE, Term::iri(ldp::CONTAINER))));
        assert!(!is_managed_triple(&Triple::iri(
            s,
            "http://purl.org/dc/terms/title",
            Term::string("title")
        )));
    }
}
