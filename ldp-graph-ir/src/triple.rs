//! RDF triple

use crate::Term;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single (subject, predicate, object) statement.
///
/// The subject is an IRI or blank node and the predicate is an IRI; the
/// constructors do not check this, generators are expected to uphold it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub s: Term,
    pub p: Term,
    pub o: Term,
}

impl Triple {
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self { s, p, o }
    }

    /// Triple whose subject and predicate are IRIs
    pub fn iri(s: impl AsRef<str>, p: impl AsRef<str>, o: Term) -> Self {
        Self::new(Term::iri(s), Term::iri(p), o)
    }

    /// Predicate IRI, if the predicate is an IRI
    pub fn predicate_iri(&self) -> Option<&str> {
        self.p.as_iri()
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ntriples_display() {
        let t = Triple::iri(
            "http://localhost/rest/a",
            "http://www.w3.org/ns/ldp#contains",
            Term::iri("http://localhost/rest/a/b"),
        );
        assert_eq!(
            t.to_string(),
            "<http://localhost/rest/a> <http://www.w3.org/ns/ldp#contains> <http://localhost/rest/a/b> ."
        );
        assert_eq!(t.predicate_iri(), Some("http://www.w3.org/ns/ldp#contains"));
    }
}
