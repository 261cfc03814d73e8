pub mod artifacts;
pub mod store;

pub use artifacts::{load_bundle, CatalogBundle};
pub use store::CatalogError;
pub use store::EmbeddingMatrix;
pub use store::MovieCatalog;
