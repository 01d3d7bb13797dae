//! GraphQL contract for the contact service.
//!
//! The schema exposes a single `Contact` entity:
//!
//! ```graphql
//! # Look up one contact (null when absent)
//! query {
//!   getContact(id: "65f2...") {
//!     name
//!     phone
//!     country
//!     time
//!     contacts { name }
//!   }
//! }
//!
//! # Create a contact; phone is validated upstream before the insert
//! mutation {
//!   addContacts(name: "Alice", phone: "+14158675309") {
//!     id
//!     country
//!   }
//! }
//! ```

pub mod mutation;
pub mod query;
pub mod types;

use async_graphql::{EmptySubscription, Schema};
use std::sync::Arc;

use crate::phone_api::PhoneApi;
use crate::store::ContactStore;

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use types::Contact;

/// The full GraphQL schema type for the contact service.
pub type ContactSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema with the shared state the resolvers need.
///
/// The schema is injected with:
/// - `Arc<dyn ContactStore>` for persistence
/// - `Arc<dyn PhoneApi>` for phone validation and time lookups
pub fn build_schema(store: Arc<dyn ContactStore>, phone_api: Arc<dyn PhoneApi>) -> ContactSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .data(phone_api)
        .finish()
}
