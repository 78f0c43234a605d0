// Store catalogs: the model, per-store index files, crawlers and the generated site.

pub mod crawler;
pub mod index_store;
pub mod model;
pub mod site;
