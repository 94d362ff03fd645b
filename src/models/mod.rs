//! Catalog records as stored in the search index and served to callers.

mod film;
mod genre;
mod person;

pub use film::{Film, GenreRef, PersonRef, ShortFilm};
pub use genre::Genre;
pub use person::{Person, PersonFilm};
