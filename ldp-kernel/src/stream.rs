//! Lazy, single-pass triple streams
//!
//! An [`RdfStream`] is a forward-only sequence of `Result<Triple>` plus the
//! resource it describes (its topic) and a prefix → namespace map for the
//! serializer. Nothing is evaluated until items are pulled; concatenated
//! streams are evaluated strictly left to right.
//!
//! The first `Err` ends the stream: a store failure is fatal to whatever
//! remained of the description.

use crate::error::Result;
use ldp_graph_ir::{Graph, Term, Triple};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::fmt;

type Triples<'a> = Box<dyn Iterator<Item = Result<Triple>> + 'a>;

/// A lazily evaluated stream of triples about one topic
pub struct RdfStream<'a> {
    topic: Option<Term>,
    namespaces: BTreeMap<String, String>,
    triples: Triples<'a>,
    finished: bool,
}

impl fmt::Debug for RdfStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RdfStream")
            .field("topic", &self.topic)
            .field("namespaces", &self.namespaces)
            .field("finished", &self.finished)
            .finish()
    }
}

impl<'a> RdfStream<'a> {
    /// Stream over fallible triples
    pub fn new(topic: Term, triples: impl Iterator<Item = Result<Triple>> + 'a) -> Self {
        Self {
            topic: Some(topic),
            namespaces: BTreeMap::new(),
            triples: Box::new(triples),
            finished: false,
        }
    }

    /// Stream over already-built triples
    pub fn from_triples(topic: Term, triples: Vec<Triple>) -> Self {
        Self::new(topic, triples.into_iter().map(Ok))
    }

    /// A stream with no triples and no topic
    pub fn empty() -> Self {
        Self {
            topic: None,
            namespaces: BTreeMap::new(),
            triples: Box::new(std::iter::empty()),
            finished: false,
        }
    }

    /// A stream whose construction is deferred until the first pull.
    ///
    /// `build` runs at most once. If it fails, the stream yields that error
    /// and ends. Namespaces declared by the deferred stream are not carried
    /// over; declare them on the outer stream instead.
    pub fn lazy(topic: Term, build: impl FnOnce() -> Result<RdfStream<'a>> + 'a) -> Self {
        Self::new(topic, Deferred::Pending(Box::new(build)))
    }

    /// One stream per item, concatenated lazily.
    ///
    /// An `Err` item, or an `Err` from `f`, is yielded in place.
    pub fn flat_map<T: 'a>(
        topic: Term,
        items: impl Iterator<Item = Result<T>> + 'a,
        mut f: impl FnMut(T) -> Result<RdfStream<'a>> + 'a,
    ) -> Self {
        let triples = items.flat_map(move |item| -> Triples<'a> {
            match item.and_then(&mut f) {
                Ok(stream) => Box::new(stream),
                Err(e) => Box::new(std::iter::once(Err(e))),
            }
        });
        Self::new(topic, triples)
    }

    pub fn topic(&self) -> Option<&Term> {
        self.topic.as_ref()
    }

    pub fn with_topic(mut self, topic: Term) -> Self {
        self.topic = Some(topic);
        self
    }

    /// Declare a prefix for the serializer
    pub fn namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.insert(prefix.into(), uri.into());
        self
    }

    pub fn namespaces(&self) -> &BTreeMap<String, String> {
        &self.namespaces
    }

    /// All of `self`, then all of `other`.
    ///
    /// Namespace maps are merged (entries already on `self` win) and the
    /// topic of `self` is kept.
    pub fn concat(mut self, other: RdfStream<'a>) -> Self {
        for (prefix, uri) in other.namespaces {
            self.namespaces.entry(prefix).or_insert(uri);
        }
        if self.topic.is_none() {
            self.topic = other.topic;
        }
        self.triples = Box::new(self.triples.chain(other.triples));
        self
    }

    /// Keep only triples matching `predicate`; errors pass through.
    pub fn filter(mut self, mut predicate: impl FnMut(&Triple) -> bool + 'a) -> Self {
        self.triples = Box::new(self.triples.filter(move |t| match t {
            Ok(triple) => predicate(triple),
            Err(_) => true,
        }));
        self
    }

    /// A stream with this stream's topic and namespaces over other triples
    pub fn with_this_context<'b>(
        &self,
        triples: impl Iterator<Item = Result<Triple>> + 'b,
    ) -> RdfStream<'b> {
        RdfStream {
            topic: self.topic.clone(),
            namespaces: self.namespaces.clone(),
            triples: Box::new(triples),
            finished: false,
        }
    }

    /// Drain into a [`Graph`] carrying the topic and prefixes
    pub fn into_graph(self) -> Result<Graph> {
        let mut graph = Graph::new();
        graph.topic = self.topic.clone();
        graph.prefixes = self.namespaces.clone();
        for triple in self {
            graph.add(triple?);
        }
        Ok(graph)
    }

    /// Drain into a vector of triples
    pub fn collect_triples(self) -> Result<Vec<Triple>> {
        self.collect()
    }

    /// Same topic, same namespaces and the same *set* of remaining triples.
    ///
    /// Consumes both streams; meant for tests.
    pub fn equivalent(self, other: RdfStream<'_>) -> Result<bool> {
        if self.topic != other.topic || self.namespaces != other.namespaces {
            return Ok(false);
        }
        let left: FxHashSet<Triple> = self.collect::<Result<_>>()?;
        let right: FxHashSet<Triple> = other.collect::<Result<_>>()?;
        Ok(left == right)
    }
}

impl Iterator for RdfStream<'_> {
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.triples.next();
        match &item {
            None | Some(Err(_)) => self.finished = true,
            Some(Ok(triple)) => tracing::trace!(%triple, "emit"),
        }
        item
    }
}

enum Deferred<'a> {
    Pending(Box<dyn FnOnce() -> Result<RdfStream<'a>> + 'a>),
    Running(RdfStream<'a>),
    Done,
}

impl Iterator for Deferred<'_> {
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(self, Deferred::Done) {
                Deferred::Pending(build) => match build() {
                    Ok(stream) => *self = Deferred::Running(stream),
                    Err(e) => return Some(Err(e)),
                },
                Deferred::Running(mut stream) => {
                    let item = stream.next();
                    if item.is_some() {
                        *self = Deferred::Running(stream);
                    }
                    return item;
                }
                Deferred::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    const P: &str = "http://example.org/p";

    fn topic() -> Term {
        Term::iri("http://example.org/s")
    }

    fn triple(o: &str) -> Triple {
        Triple::iri("http://example.org/s", P, Term::string(o))
    }

    #[test]
    fn test_concat_order_topic_and_namespaces() {
        let a = RdfStream::from_triples(topic(), vec![triple("1")]).namespace("ex", "http://example.org/");
        let b = RdfStream::from_triples(Term::iri("http://other"), vec![triple("2")])
            .namespace("ex", "http://shadowed/")
            .namespace("dc", "http://purl.org/dc/elements/1.1/");

        let joined = a.concat(b);
        assert_eq!(joined.topic(), Some(&topic()));
        assert_eq!(joined.namespaces().get("ex").unwrap(), "http://example.org/");
        assert_eq!(joined.namespaces().len(), 2);
        assert_eq!(joined.collect_triples().unwrap(), vec![triple("1"), triple("2")]);
    }

    #[test]
    fn test_lazy_runs_only_when_pulled() {
        let calls = Cell::new(0);
        let mut stream = RdfStream::from_triples(topic(), vec![triple("eager")]).concat(
            RdfStream::lazy(topic(), || {
                calls.set(calls.get() + 1);
                Ok(RdfStream::from_triples(topic(), vec![triple("late")]))
            }),
        );
        assert_eq!(calls.get(), 0);
        assert_eq!(stream.next().unwrap().unwrap(), triple("eager"));
        assert_eq!(calls.get(), 0);
        assert_eq!(stream.next().unwrap().unwrap(), triple("late"));
        assert_eq!(calls.get(), 1);
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_error_ends_stream() {
        let items = vec![Ok(triple("1")), Err(Error::repository("boom")), Ok(triple("2"))];
        let mut stream = RdfStream::new(topic(), items.into_iter());
        assert!(stream.next().unwrap().is_ok());
        assert!(matches!(stream.next(), Some(Err(Error::Repository(_)))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_lazy_build_failure() {
        let stream = RdfStream::lazy(topic(), || Err(Error::repository("unavailable")));
        assert!(stream.collect_triples().is_err());
    }

    #[test]
    fn test_flat_map_and_filter() {
        let items = vec![Ok("a"), Ok("b"), Ok("c")];
        let stream = RdfStream::flat_map(topic(), items.into_iter(), |o| {
            Ok(RdfStream::from_triples(topic(), vec![triple(o)]))
        })
        .filter(|t| t.o != Term::string("b"));
        assert_eq!(stream.collect_triples().unwrap(), vec![triple("a"), triple("c")]);
    }

    #[test]
    fn test_equivalent_is_set_based() {
        let a = RdfStream::from_triples(topic(), vec![triple("1"), triple("2"), triple("2")]);
        let b = RdfStream::from_triples(topic(), vec![triple("2"), triple("1")]);
        assert!(a.equivalent(b).unwrap());

        let c = RdfStream::from_triples(topic(), vec![triple("1")]);
        let d = RdfStream::from_triples(Term::iri("http://elsewhere"), vec![triple("1")]);
        assert!(!c.equivalent(d).unwrap());
    }

    #[test]
    fn test_into_graph_and_context() {
        let stream = RdfStream::from_triples(topic(), vec![triple("1")]).namespace("ex", "http://example.org/");
        let sibling = stream.with_this_context(vec![Ok(triple("x"))].into_iter());
        assert_eq!(sibling.topic(), Some(&topic()));
        assert_eq!(sibling.namespaces().len(), 1);

        let graph = stream.into_graph().unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.topic, Some(topic()));
        assert_eq!(graph.prefixes.get("ex").map(String::as_str), Some("http://example.org/"));
    }
}
