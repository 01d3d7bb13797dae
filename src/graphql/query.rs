use async_graphql::{Context, Object, Result, ID};
use std::sync::Arc;

use super::types::{parse_id, Contact};
use crate::store::ContactStore;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Look up a single contact by id. Absence is a null result, not an
    /// error; a malformed id is rejected.
    async fn get_contact(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Contact>> {
        let store = ctx.data::<Arc<dyn ContactStore>>()?;
        let oid = parse_id(&id)?;
        Ok(store.find_by_id(oid).await?.map(Contact::new))
    }

    /// All contacts, unfiltered and unpaginated.
    async fn get_contacts(&self, ctx: &Context<'_>) -> Result<Vec<Contact>> {
        let store = ctx.data::<Arc<dyn ContactStore>>()?;
        let records = store.find_all().await?;
        Ok(records.into_iter().map(Contact::new).collect())
    }
}
