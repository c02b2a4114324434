//! Literal datatypes
//!
//! Every literal carries an explicit datatype. A plain string is `xsd:string`;
//! a language-tagged string is `rdf:langString`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Datatype IRIs used by the constructors below
pub mod iri {
    pub use ldp_vocab::rdf::LANG_STRING as RDF_LANG_STRING;
    pub use ldp_vocab::xsd::{
        ANY_URI as XSD_ANY_URI, BOOLEAN as XSD_BOOLEAN, DATE_TIME as XSD_DATE_TIME,
        DECIMAL as XSD_DECIMAL, DOUBLE as XSD_DOUBLE, INTEGER as XSD_INTEGER, LONG as XSD_LONG,
        STRING as XSD_STRING,
    };
}

/// An expanded datatype IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Datatype(Arc<str>);

impl Datatype {
    /// Datatype from an expanded IRI
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    pub fn xsd_string() -> Self {
        Self::from_iri(iri::XSD_STRING)
    }

    pub fn xsd_boolean() -> Self {
        Self::from_iri(iri::XSD_BOOLEAN)
    }

    pub fn xsd_integer() -> Self {
        Self::from_iri(iri::XSD_INTEGER)
    }

    pub fn xsd_long() -> Self {
        Self::from_iri(iri::XSD_LONG)
    }

    pub fn xsd_double() -> Self {
        Self::from_iri(iri::XSD_DOUBLE)
    }

    pub fn xsd_decimal() -> Self {
        Self::from_iri(iri::XSD_DECIMAL)
    }

    pub fn xsd_date_time() -> Self {
        Self::from_iri(iri::XSD_DATE_TIME)
    }

    pub fn xsd_any_uri() -> Self {
        Self::from_iri(iri::XSD_ANY_URI)
    }

    pub fn rdf_lang_string() -> Self {
        Self::from_iri(iri::RDF_LANG_STRING)
    }

    /// The expanded IRI
    pub fn as_iri(&self) -> &str {
        &self.0
    }

    pub fn is_xsd_string(&self) -> bool {
        self.as_iri() == iri::XSD_STRING
    }

    pub fn is_lang_string(&self) -> bool {
        self.as_iri() == iri::RDF_LANG_STRING
    }

    /// Whether a literal of this datatype may be re-tagged with a language.
    ///
    /// Only plain strings qualify; anything else keeps its datatype.
    pub fn accepts_language(&self) -> bool {
        self.is_xsd_string() || self.is_lang_string()
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
