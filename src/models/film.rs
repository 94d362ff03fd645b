use crate::entity::{CatalogEntity, EntityDescriptor, EntityKind};
use crate::query::WeightedField;
use serde::{Deserialize, Serialize};

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Film,
    index: "movies",
    filter_field: Some("genres.name"),
    default_sort: None,
    search_fields: &[
        WeightedField::boosted("title", 3.0),
        WeightedField::new("description"),
        WeightedField::new("actors.full_name"),
        WeightedField::new("writers.full_name"),
        WeightedField::new("directors.full_name"),
    ],
};

/// Genre reference embedded in a film document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenreRef {
    #[serde(alias = "uuid")]
    pub id: String,
    pub name: String,
}

/// Person reference embedded in a film document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonRef {
    #[serde(alias = "uuid")]
    pub id: String,
    #[serde(alias = "name")]
    pub full_name: String,
}

/// Full film card, served by `get_by_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Film {
    #[serde(alias = "uuid")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "genre")]
    pub genres: Vec<GenreRef>,
    #[serde(default)]
    pub actors: Vec<PersonRef>,
    #[serde(default)]
    pub writers: Vec<PersonRef>,
    #[serde(default)]
    pub directors: Vec<PersonRef>,
}

/// Film tile returned by `list` and `search`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShortFilm {
    #[serde(alias = "uuid")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
}

impl CatalogEntity for Film {
    type Summary = ShortFilm;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(&self) -> &str {
        &self.id
    }
}
