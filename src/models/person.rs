use crate::entity::{CatalogEntity, EntityDescriptor, EntityKind};
use crate::query::{SortOrder, WeightedField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Person,
    index: "persons",
    filter_field: None,
    default_sort: Some(("full_name.keyword", SortOrder::Asc)),
    search_fields: &[WeightedField::new("full_name")],
};

/// A film a person took part in, with the roles they had.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonFilm {
    #[serde(alias = "uuid")]
    pub id: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

/// An actor, writer or director.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(alias = "uuid")]
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub films: Vec<PersonFilm>,
}

impl CatalogEntity for Person {
    type Summary = Person;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(&self) -> &str {
        &self.id
    }
}
