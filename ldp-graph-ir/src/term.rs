//! RDF terms: IRIs, blank nodes and literals

use crate::Datatype;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Blank node label, without the `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankId(Arc<str>);

impl BlankId {
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Native value of a literal.
///
/// Doubles compare and hash by bit pattern so that literals can live in
/// hash sets (stream equivalence relies on this).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LiteralValue {
    String(Arc<str>),
    Boolean(bool),
    Integer(i64),
    Double(f64),
}

impl LiteralValue {
    pub fn string(s: impl AsRef<str>) -> Self {
        LiteralValue::String(Arc::from(s.as_ref()))
    }

    /// Lexical form as it would appear in N-Triples
    pub fn lexical(&self) -> String {
        match self {
            LiteralValue::String(s) => s.to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Integer(i) => i.to_string(),
            LiteralValue::Double(d) if d.is_nan() => "NaN".to_string(),
            LiteralValue::Double(d) if d.is_infinite() => {
                let inf = if d.is_sign_positive() { "INF" } else { "-INF" };
                inf.to_string()
            }
            LiteralValue::Double(d) => d.to_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LiteralValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            LiteralValue::String(_) => 0,
            LiteralValue::Boolean(_) => 1,
            LiteralValue::Integer(_) => 2,
            LiteralValue::Double(_) => 3,
        }
    }
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            LiteralValue::String(s) => s.hash(state),
            LiteralValue::Boolean(b) => b.hash(state),
            LiteralValue::Integer(i) => i.hash(state),
            LiteralValue::Double(d) => d.to_bits().hash(state),
        }
    }
}

impl PartialOrd for LiteralValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LiteralValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LiteralValue::String(a), LiteralValue::String(b)) => a.cmp(b),
            (LiteralValue::Boolean(a), LiteralValue::Boolean(b)) => a.cmp(b),
            (LiteralValue::Integer(a), LiteralValue::Integer(b)) => a.cmp(b),
            (LiteralValue::Double(a), LiteralValue::Double(b)) => a.total_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// An RDF term.
///
/// IRIs are always expanded. A literal with a language tag always has the
/// `rdf:langString` datatype.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    BlankNode(BlankId),
    Iri(Arc<str>),
    Literal {
        datatype: Datatype,
        language: Option<Arc<str>>,
        value: LiteralValue,
    },
}

impl Term {
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::BlankNode(BlankId::new(label))
    }

    /// Plain `xsd:string` literal
    pub fn string(value: impl AsRef<str>) -> Self {
        Self::literal(LiteralValue::string(value), Datatype::xsd_string())
    }

    pub fn boolean(value: bool) -> Self {
        Self::literal(LiteralValue::Boolean(value), Datatype::xsd_boolean())
    }

    pub fn integer(value: i64) -> Self {
        Self::literal(LiteralValue::Integer(value), Datatype::xsd_integer())
    }

    pub fn long(value: i64) -> Self {
        Self::literal(LiteralValue::Integer(value), Datatype::xsd_long())
    }

    pub fn double(value: f64) -> Self {
        Self::literal(LiteralValue::Double(value), Datatype::xsd_double())
    }

    /// `rdf:langString` literal
    pub fn lang_string(value: impl AsRef<str>, lang: impl AsRef<str>) -> Self {
        Term::Literal {
            datatype: Datatype::rdf_lang_string(),
            language: Some(Arc::from(lang.as_ref())),
            value: LiteralValue::string(value),
        }
    }

    /// Literal with an arbitrary datatype, kept in lexical form
    pub fn typed(lexical: impl AsRef<str>, datatype: Datatype) -> Self {
        Self::literal(LiteralValue::string(lexical), datatype)
    }

    fn literal(value: LiteralValue, datatype: Datatype) -> Self {
        Term::Literal {
            datatype,
            language: None,
            value,
        }
    }

    /// Re-tag a plain string literal with a language.
    ///
    /// Anything other than a plain or language-tagged string is returned
    /// unchanged.
    pub fn with_language(self, lang: impl AsRef<str>) -> Self {
        match self {
            Term::Literal {
                datatype,
                value: LiteralValue::String(s),
                ..
            } if datatype.accepts_language() => Term::lang_string(s, lang),
            other => other,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// (value, datatype, language) of a literal
    pub fn as_literal(&self) -> Option<(&LiteralValue, &Datatype, Option<&str>)> {
        match self {
            Term::Literal {
                value,
                datatype,
                language,
            } => Some((value, datatype, language.as_deref())),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(id) => write!(f, "{id}"),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                write!(f, "{:?}", value.lexical())?;
                match language {
                    Some(lang) => write!(f, "@{lang}"),
                    None if datatype.is_xsd_string() => Ok(()),
                    None => write!(f, "^^<{datatype}>"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_with_language_only_retags_plain_strings() {
        let tagged = Term::string("chat").with_language("fr");
        assert_eq!(tagged, Term::lang_string("chat", "fr"));
        let (_, dt, lang) = tagged.as_literal().unwrap();
        assert!(dt.is_lang_string());
        assert_eq!(lang, Some("fr"));

        assert_eq!(Term::long(7).with_language("fr"), Term::long(7));
        assert_eq!(
            Term::iri("http://example.org/x").with_language("fr"),
            Term::iri("http://example.org/x")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Term::iri("http://example.org").to_string(), "<http://example.org>");
        assert_eq!(Term::blank("b0").to_string(), "_:b0");
        assert_eq!(Term::string("hi").to_string(), "\"hi\"");
        assert_eq!(Term::lang_string("hi", "en").to_string(), "\"hi\"@en");
        assert_eq!(
            Term::long(42).to_string(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#long>"
        );
    }

    #[test]
    fn test_double_literals_hash_by_bits() {
        let mut set = HashSet::new();
        set.insert(Term::double(f64::NAN));
        set.insert(Term::double(f64::NAN));
        set.insert(Term::double(1.5));
        assert_eq!(set.len(), 2);
        assert_eq!(LiteralValue::Double(f64::INFINITY).lexical(), "INF");
    }

    #[test]
    fn test_ordering_puts_blank_nodes_first() {
        assert!(Term::blank("z") < Term::iri("http://a"));
        assert!(Term::iri("http://z") < Term::string("a"));
        assert!(Term::iri("http://a") < Term::iri("http://b"));
    }
}
