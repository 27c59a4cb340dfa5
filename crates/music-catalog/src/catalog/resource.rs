//! Typed decoding of envelope entries
//!
//! Attributes are decoded first; relationships are merged afterwards by
//! walking the resource type's [`Relationship`] table.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::envelope::{RelatedObject, RelationshipObject, ResourceObject};

/// Merges one relationship into an already decoded resource
pub type MergeFn<R> = fn(&mut R, &RelationshipObject) -> serde_json::Result<()>;

/// Entry of a resource type's relationship table
pub struct Relationship<R> {
    pub name: &'static str,
    pub merge: MergeFn<R>,
}

/// A catalog resource type
pub trait CatalogResource: Sized + 'static {
    /// Path segment and JSON `type`, e.g. `artists`
    const KIND: &'static str;

    /// False for resources addressed outside a storefront (`/v1/{kind}`)
    const STOREFRONT_SCOPED: bool = true;

    /// Relationships merged after the attributes pass
    const RELATIONSHIPS: &'static [Relationship<Self>] = &[];

    type Attributes: DeserializeOwned + Default;

    fn from_attributes(id: String, href: Option<String>, attributes: Self::Attributes) -> Self;
}

fn decode_attributes<T: DeserializeOwned>(
    attributes: &Map<String, Value>,
) -> serde_json::Result<T> {
    serde_json::from_value(Value::Object(attributes.clone()))
}

/// Decodes a top-level `data` entry, merging known relationships
///
/// Relationships with names missing from the table are ignored.
pub fn decode<R: CatalogResource>(object: &ResourceObject) -> serde_json::Result<R> {
    let attributes = decode_attributes(&object.attributes)?;
    let mut resource = R::from_attributes(object.id.clone(), object.href.clone(), attributes);

    if let Some(relationships) = &object.relationships {
        for relationship in R::RELATIONSHIPS {
            if let Some(related) = relationships.get(relationship.name) {
                (relationship.merge)(&mut resource, related)?;
            }
        }
    }

    Ok(resource)
}

/// Decodes a related entry; identifier-only entries get default attributes
pub fn decode_related_object<R: CatalogResource>(object: &RelatedObject) -> serde_json::Result<R> {
    let attributes = match &object.attributes {
        Some(attributes) => decode_attributes(attributes)?,
        None => R::Attributes::default(),
    };
    Ok(R::from_attributes(object.id.clone(), object.href.clone(), attributes))
}

/// Decodes every entry of a to-many relationship, in order
pub fn decode_related<R: CatalogResource>(
    relationship: &RelationshipObject,
) -> serde_json::Result<Vec<R>> {
    relationship.data.iter().map(decode_related_object::<R>).collect()
}

/// Decodes the first entry of a to-one relationship
pub fn decode_related_one<R: CatalogResource>(
    relationship: &RelationshipObject,
) -> serde_json::Result<Option<R>> {
    relationship
        .data
        .first()
        .map(decode_related_object::<R>)
        .transpose()
}
