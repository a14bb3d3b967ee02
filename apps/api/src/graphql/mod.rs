//! GraphQL schema and resolvers for the catalog
//!
//! - Query resolvers: counts, book listing with filters, authors, `me`
//! - Mutation resolvers: `addBook`, `editAuthor`, `createUser`, `login`
//! - Object types for books, authors, users and tokens
//! - An author DataLoader so book listings resolve authors in one batch

pub mod loaders;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

use async_graphql::Context;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthContext;

pub use schema::{build_schema, CatalogSchema, SchemaBuilder};

static ANONYMOUS: AuthContext = AuthContext::anonymous();

/// Authentication context attached to the current request
///
/// Requests executed without one (e.g. directly against the schema) are
/// anonymous.
pub(crate) fn request_auth<'ctx>(ctx: &Context<'ctx>) -> &'ctx AuthContext {
    ctx.data_opt::<AuthContext>().unwrap_or(&ANONYMOUS)
}

/// Narrow a store count to GraphQL's 32-bit `Int`
pub(crate) fn count_to_int(count: i64) -> ApiResult<i32> {
    i32::try_from(count)
        .map_err(|_| ApiError::Internal(format!("count {} exceeds the Int range", count)))
}
