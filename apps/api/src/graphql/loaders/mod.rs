//! DataLoaders for batched fetching

mod author;

pub use author::AuthorLoader;
