//! Typed property values as the store holds them

use chrono::{DateTime, Utc};
use ldp_vocab::internal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Declared type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    String,
    Boolean,
    Long,
    Double,
    Decimal,
    Date,
    Uri,
    Name,
    Path,
    Reference,
    WeakReference,
    Binary,
}

/// A single property value
///
/// `Reference` and `WeakReference` carry the stable identifier of the target
/// node; `Path` carries the target's internal path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Boolean(bool),
    Long(i64),
    Double(f64),
    /// Decimal kept in lexical form
    Decimal(String),
    Date(DateTime<Utc>),
    Uri(String),
    Name(String),
    Path(String),
    Reference(String),
    WeakReference(String),
    Binary(Arc<[u8]>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn uri(s: impl Into<String>) -> Self {
        Value::Uri(s.into())
    }

    pub fn binary(data: impl AsRef<[u8]>) -> Self {
        Value::Binary(Arc::from(data.as_ref()))
    }

    pub fn property_type(&self) -> PropertyType {
        match self {
            Value::String(_) => PropertyType::String,
            Value::Boolean(_) => PropertyType::Boolean,
            Value::Long(_) => PropertyType::Long,
            Value::Double(_) => PropertyType::Double,
            Value::Decimal(_) => PropertyType::Decimal,
            Value::Date(_) => PropertyType::Date,
            Value::Uri(_) => PropertyType::Uri,
            Value::Name(_) => PropertyType::Name,
            Value::Path(_) => PropertyType::Path,
            Value::Reference(_) => PropertyType::Reference,
            Value::WeakReference(_) => PropertyType::WeakReference,
            Value::Binary(_) => PropertyType::Binary,
        }
    }

    /// Does this value point at another node?
    pub fn is_node_pointer(&self) -> bool {
        matches!(
            self,
            Value::Path(_) | Value::Reference(_) | Value::WeakReference(_)
        )
    }

    /// String form, for the value types that have a natural one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s)
            | Value::Decimal(s)
            | Value::Uri(s)
            | Value::Name(s)
            | Value::Path(s)
            | Value::Reference(s)
            | Value::WeakReference(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }
}

/// A named property on a node: one value, or several for a multi-valued
/// property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Path of the owning node
    pub owner: String,
    /// `prefix:local`, optionally with an `@lang` suffix
    pub name: String,
    pub property_type: PropertyType,
    pub values: Vec<Value>,
    pub multiple: bool,
    /// Protected properties cannot be modified directly through the API
    pub protected: bool,
}

impl Property {
    pub fn single(owner: impl Into<String>, name: impl Into<String>, value: Value) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            property_type: value.property_type(),
            values: vec![value],
            multiple: false,
            protected: false,
        }
    }

    /// A multi-valued property. The declared type is taken from the first
    /// value, or `String` when there are none.
    pub fn multiple(owner: impl Into<String>, name: impl Into<String>, values: Vec<Value>) -> Self {
        let property_type = values
            .first()
            .map(Value::property_type)
            .unwrap_or(PropertyType::String);
        Self {
            owner: owner.into(),
            name: name.into(),
            property_type,
            values,
            multiple: true,
            protected: false,
        }
    }

    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }

    /// First value, if any
    pub fn value(&self) -> Option<&Value> {
        self.values.first()
    }

    /// Binary payload property of a content node
    pub fn is_binary_content(&self) -> bool {
        self.property_type == PropertyType::Binary && self.name == internal::DATA
    }

    /// Reference property that shadows a URI-valued property (`foo_ref`)
    pub fn is_internal_reference(&self) -> bool {
        matches!(
            self.property_type,
            PropertyType::Reference | PropertyType::WeakReference
        ) && self.name.ends_with(internal::REFERENCE_PROPERTY_SUFFIX)
    }

    /// Name with any `_ref` shadow suffix removed
    pub fn public_name(&self) -> &str {
        if self.is_internal_reference() {
            self.name
                .strip_suffix(internal::REFERENCE_PROPERTY_SUFFIX)
                .unwrap_or(&self.name)
        } else {
            &self.name
        }
    }

    /// Language code from an `@lang` name suffix
    pub fn language(&self) -> Option<&str> {
        match self.name.find('@') {
            Some(i) if i > 0 && i + 1 < self.name.len() => Some(&self.name[i + 1..]),
            _ => None,
        }
    }
}
