//! Inbound references: triples other resources assert about this one

use crate::value_converter::ValueConverter;
use ldp_kernel::{
    IdentifierConverter, Property, RdfStream, ReferenceKind, Resource, ResourceKind, Result,
};

/// Every strong or weak reference pointing at `resource`, rendered as the
/// referencing resource would render it.
///
/// For a binary the references to its description count as well. Only the
/// values of a multi-valued property that point here are included.
pub fn references_context<'a>(
    resource: &Resource,
    converter: &'a dyn IdentifierConverter,
) -> Result<RdfStream<'a>> {
    let topic = converter.subject(resource)?;
    let values = ValueConverter::new(resource.session().clone(), converter);
    let targets = match resource.kind() {
        ResourceKind::Binary | ResourceKind::Description => {
            let binary = resource.described_resource()?;
            let description = binary.description()?;
            vec![binary, description]
        }
        ResourceKind::Container | ResourceKind::Placeholder => vec![resource.clone()],
    };

    Ok(RdfStream::flat_map(
        topic.clone(),
        targets.into_iter().map(Ok),
        move |target| inbound(&target, &topic, values.clone()),
    ))
}

fn inbound<'a>(
    target: &Resource,
    topic: &ldp_graph_ir::Term,
    values: ValueConverter<'a>,
) -> Result<RdfStream<'a>> {
    let identifier = target.identifier().to_string();
    let refs = target.session().references(target.path(), ReferenceKind::All)?;
    Ok(RdfStream::flat_map(topic.clone(), refs, move |property| {
        let Some(owner) = Resource::at(values.session(), &property.owner)? else {
            tracing::debug!(owner = %property.owner, "reference from vanished node");
            return Ok(RdfStream::empty());
        };
        let pointing = pointing_at(property, &identifier);
        let subject = values.converter().subject(&owner)?;
        tracing::trace!(owner = owner.path(), property = %pointing.name, "inbound reference");
        let triples = values.property_triples(&subject, &pointing)?;
        Ok(RdfStream::from_triples(subject, triples))
    }))
}

fn pointing_at(mut property: Property, identifier: &str) -> Property {
    property
        .values
        .retain(|v| ReferenceKind::All.includes(v) && v.as_str() == Some(identifier));
    property
}
