pub mod documents;
pub mod memory;
pub mod postgres;

pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
