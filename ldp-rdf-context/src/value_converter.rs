//! Store values and properties as RDF terms and triples

use chrono::{DateTime, SecondsFormat, Utc};
use ldp_graph_ir::{Datatype, Term, Triple};
use ldp_kernel::names::rdf_iri_for_name;
use ldp_kernel::{Error, IdentifierConverter, Property, Resource, Result, Session, Value};
use ldp_vocab::internal;
use std::sync::Arc;

/// Separator between lexical form and datatype IRI in a string value that
/// carries a typed literal
pub const TYPED_LITERAL_SEPARATOR: &str = "\u{1e}^^\u{1e}";

/// Converts property values into RDF objects for one description.
///
/// Node pointers (paths, references, weak references) become the external
/// IRI of the node they point at.
#[derive(Clone)]
pub struct ValueConverter<'a> {
    session: Arc<dyn Session>,
    converter: &'a dyn IdentifierConverter,
}

impl std::fmt::Debug for ValueConverter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueConverter")
            .field("workspace", &self.session.workspace_name())
            .finish()
    }
}

impl<'a> ValueConverter<'a> {
    pub fn new(session: Arc<dyn Session>, converter: &'a dyn IdentifierConverter) -> Self {
        Self { session, converter }
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    pub fn converter(&self) -> &'a dyn IdentifierConverter {
        self.converter
    }

    /// RDF object for a value.
    ///
    /// `None` for a weak reference whose target no longer exists. A dangling
    /// strong reference is a store inconsistency and fails.
    pub fn convert(&self, value: &Value) -> Result<Option<Term>> {
        let term = match value {
            Value::String(s) => decode_string(s),
            Value::Boolean(b) => Term::boolean(*b),
            Value::Long(n) => Term::long(*n),
            Value::Double(d) => Term::double(*d),
            Value::Decimal(s) => Term::typed(s, Datatype::xsd_decimal()),
            Value::Date(d) => date_time_literal(d),
            Value::Uri(u) => Term::iri(u),
            Value::Name(n) => Term::string(n),
            Value::Binary(data) => Term::string(String::from_utf8_lossy(data)),
            Value::Path(path) => match Resource::at(&self.session, path)? {
                Some(target) => self.converter.subject(&target)?,
                None => self.converter.term_for_path(path)?,
            },
            Value::Reference(id) => match Resource::by_identifier(&self.session, id)? {
                Some(target) => self.converter.subject(&target)?,
                None => return Err(Error::not_found(format!("reference target {id}"))),
            },
            Value::WeakReference(id) => match Resource::by_identifier(&self.session, id)? {
                Some(target) => self.converter.subject(&target)?,
                None => {
                    tracing::debug!(identifier = %id, "skipping dangling weak reference");
                    return Ok(None);
                }
            },
        };
        Ok(Some(term))
    }

    /// One triple per value of `property`, all with `subject`.
    ///
    /// The predicate drops any `_ref` shadow suffix and `@lang` suffix; the
    /// language, if present, is applied to plain string objects.
    pub fn property_triples(&self, subject: &Term, property: &Property) -> Result<Vec<Triple>> {
        let predicate = Term::iri(rdf_iri_for_name(
            self.session.as_ref(),
            property.public_name(),
        )?);
        let language = property.language();

        let mut triples = Vec::with_capacity(property.values.len());
        for value in &property.values {
            let Some(mut object) = self.convert(value)? else {
                continue;
            };
            if let Some(lang) = language {
                object = object.with_language(lang);
            }
            tracing::trace!(property = %property.name, %object, "property value");
            triples.push(Triple::new(subject.clone(), predicate.clone(), object));
        }
        Ok(triples)
    }
}

/// Should this property stay out of the description?
///
/// Hidden: binary payloads, `_ref` reference shadows, and protected
/// properties outside the exposed set. Everything on a frozen node is
/// protected, so nothing there is hidden for being protected.
pub fn is_hidden(property: &Property, owner_frozen: bool) -> bool {
    if property.is_binary_content() || property.is_internal_reference() {
        return true;
    }
    property.protected
        && !owner_frozen
        && !internal::EXPOSED_PROTECTED.contains(&property.name.as_str())
}

/// `xsd:dateTime` literal in UTC with millisecond precision
pub fn date_time_literal(value: &DateTime<Utc>) -> Term {
    Term::typed(
        value.to_rfc3339_opts(SecondsFormat::Millis, true),
        Datatype::xsd_date_time(),
    )
}

/// Node a path or reference value points at
pub(crate) fn resolve_node(session: &Arc<dyn Session>, value: &Value) -> Result<Option<Resource>> {
    match value {
        Value::Path(path) => Resource::at(session, path),
        Value::Reference(id) | Value::WeakReference(id) => Resource::by_identifier(session, id),
        _ => Ok(None),
    }
}

fn decode_string(s: &str) -> Term {
    match s.split_once(TYPED_LITERAL_SEPARATOR) {
        Some((lexical, datatype)) if !datatype.is_empty() => {
            Term::typed(lexical, Datatype::from_iri(datatype))
        }
        _ => Term::string(s),
    }
}
