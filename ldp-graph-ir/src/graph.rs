//! A materialized collection of triples
//!
//! `Graph` keeps insertion order and duplicates. Call [`Graph::canonicalize`]
//! for set semantics and deterministic ordering before comparing or
//! formatting.

use crate::{Term, Triple};
use std::collections::BTreeMap;

/// Triples plus the prefix table a serializer should use to compact them.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    /// The resource this graph describes, if any
    pub topic: Option<Term>,
    /// prefix → namespace IRI
    pub prefixes: BTreeMap<String, String>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    pub fn add(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    pub fn add_triple(&mut self, s: Term, p: Term, o: Term) {
        self.add(Triple::new(s, p, o));
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn into_triples(self) -> Vec<Triple> {
        self.triples
    }

    /// Sort (SPO) and drop duplicates.
    pub fn canonicalize(&mut self) {
        self.triples.sort();
        self.triples.dedup();
    }

    /// Does the graph hold this exact statement?
    pub fn contains(&self, s: &Term, p: &Term, o: &Term) -> bool {
        self.triples
            .iter()
            .any(|t| &t.s == s && &t.p == p && &t.o == o)
    }

    /// Triples with the given predicate IRI
    pub fn with_predicate<'a>(&'a self, predicate: &'a str) -> impl Iterator<Item = &'a Triple> {
        self.triples
            .iter()
            .filter(move |t| t.predicate_iri() == Some(predicate))
    }

    /// Objects of `(subject, predicate, ?)`
    pub fn objects<'a>(
        &'a self,
        subject: &'a Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> {
        self.with_predicate(predicate)
            .filter(move |t| &t.s == subject)
            .map(|t| &t.o)
    }

    /// Distinct subjects, sorted
    pub fn subjects(&self) -> Vec<&Term> {
        let mut subjects: Vec<&Term> = self.triples.iter().map(|t| &t.s).collect();
        subjects.sort();
        subjects.dedup();
        subjects
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = std::vec::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        Graph {
            triples: iter.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl Extend<Triple> for Graph {
    fn extend<T: IntoIterator<Item = Triple>>(&mut self, iter: T) {
        self.triples.extend(iter);
    }
}
