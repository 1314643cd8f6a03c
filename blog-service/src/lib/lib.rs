pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::article;
pub use domain::author;
pub use outbound::repositories;
