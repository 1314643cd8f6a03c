//! Root-field GraphQL endpoint.
//!
//! Only the operation type, an optional operation name and the single root
//! field with its arguments are read from a query document. Each root field is
//! served by one [`resolver::Resolver`] registered in the [`schema::Schema`].

pub mod context;
pub mod document;
pub mod gate;
pub mod resolver;
pub mod resolvers;
pub mod schema;

pub use context::RequestContext;
pub use gate::Capability;
pub use gate::ResolverGate;
pub use schema::GraphQLRequest;
pub use schema::GraphQLResponse;
pub use schema::Schema;
