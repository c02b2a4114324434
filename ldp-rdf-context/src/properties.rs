//! Triples for a resource's own visible properties

use crate::value_converter::{is_hidden, ValueConverter};
use ldp_kernel::{IdentifierConverter, RdfStream, Resource, ResourceKind, Result};

/// One triple per value of every visible property.
///
/// A binary and its description are one logical resource: whichever half
/// is described, the properties of both are emitted under the binary's
/// IRI.
pub fn properties_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    let values = ValueConverter::new(resource.session().clone(), converter);
    let owners = property_owners(resource)?;

    let subject = topic.clone();
    Ok(RdfStream::flat_map(
        topic,
        owners.into_iter().map(Ok),
        move |owner| owner_properties(&owner, subject.clone(), values.clone()),
    ))
}

fn property_owners(resource: &Resource) -> Result<Vec<Resource>> {
    match resource.kind() {
        ResourceKind::Binary | ResourceKind::Description => {
            let binary = resource.described_resource()?;
            let description = binary.description()?;
            Ok(vec![binary, description])
        }
        ResourceKind::Container | ResourceKind::Placeholder => Ok(vec![resource.clone()]),
    }
}

fn owner_properties<'a>(
    owner: &Resource,
    subject: ldp_graph_ir::Term,
    values: ValueConverter<'a>,
) -> Result<RdfStream<'a>> {
    let frozen = owner.is_frozen();
    tracing::trace!(path = owner.path(), frozen, "properties");
    Ok(RdfStream::flat_map(
        subject.clone(),
        owner.properties()?,
        move |property| {
            if is_hidden(&property, frozen) {
                return Ok(RdfStream::empty());
            }
            let triples = values.property_triples(&subject, &property)?;
            Ok(RdfStream::from_triples(subject.clone(), triples))
        },
    ))
}
