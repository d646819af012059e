mod catalog_world;
mod steps;

pub use catalog_world::CatalogWorld;
