//! Movie dataset store and filter engine.
//!
//! Loads the pre-built movie, people, genre and identifier tables from a
//! data directory and filters them by movie attributes or by people.

mod dataset;
mod encoder;
/// Movie attribute filters and canonical ordering.
pub mod filter;
/// Genre membership table.
pub mod genres;
/// Movie table rows.
pub mod movies;
/// People table rows and the people view.
pub mod people;

pub use dataset::{
    DATE_UPDATE_FILE, Dataset, ENCODER_FILE, GENRES_FILE, MOVIES_FILE, PEOPLE_FILE,
};
pub use encoder::TconstEncoder;
pub use filter::{Bounds, MovieCriteria, filter_movies, similar_movies};
pub use genres::{GenreRow, GenreTable};
pub use movies::Movie;
pub use people::{DefaultPeople, PeopleView, Person, PersonMovie, Profession, filter_by_people};
