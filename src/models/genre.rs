use crate::entity::{CatalogEntity, EntityDescriptor, EntityKind};
use crate::query::{SortOrder, WeightedField};
use serde::{Deserialize, Serialize};

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Genre,
    index: "genres",
    filter_field: None,
    default_sort: Some(("name.keyword", SortOrder::Asc)),
    search_fields: &[WeightedField::new("name")],
};

/// A genre. Already minimal, so lists and searches return it as is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(alias = "uuid")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CatalogEntity for Genre {
    type Summary = Genre;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(&self) -> &str {
        &self.id
    }
}
