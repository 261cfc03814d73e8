pub mod metadata;
pub mod posters;
pub mod recommender;
pub mod session;

pub use metadata::{MetadataProvider, TmdbProvider};
pub use posters::PosterResolver;
