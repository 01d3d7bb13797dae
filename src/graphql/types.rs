use async_graphql::{Context, Object, Result, ID};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::error::ContactError;
use crate::phone_api::PhoneApi;
use crate::store::{ContactRecord, ContactStore};

/// GraphQL view over a stored contact record.
///
/// `timezone` is stored but not exposed; clients see the derived `time`
/// field instead.
pub struct Contact {
    record: ContactRecord,
}

impl Contact {
    pub fn new(record: ContactRecord) -> Self {
        Self { record }
    }
}

#[Object]
impl Contact {
    async fn id(&self) -> ID {
        ID(self.record.id.to_hex())
    }

    async fn name(&self) -> &str {
        &self.record.name
    }

    async fn phone(&self) -> &str {
        &self.record.phone
    }

    async fn country(&self) -> &str {
        &self.record.country
    }

    /// Current date-time in the contact's timezone, fetched live from the
    /// phone service on every read. Never cached.
    async fn time(&self, ctx: &Context<'_>) -> Result<String> {
        let phone_api = ctx.data::<Arc<dyn PhoneApi>>()?;
        let time = phone_api.current_time(&self.record.timezone).await?;
        Ok(time.datetime)
    }

    /// The contacts this record references, resolved in one batched lookup.
    /// Result order is the store's, not the reference order.
    async fn contacts(&self, ctx: &Context<'_>) -> Result<Vec<Contact>> {
        let store = ctx.data::<Arc<dyn ContactStore>>()?;
        let records = store.find_by_ids(&self.record.contacts).await?;
        Ok(records.into_iter().map(Contact::new).collect())
    }
}

pub(crate) fn parse_id(id: &str) -> Result<ObjectId, ContactError> {
    ObjectId::parse_str(id).map_err(|_| ContactError::InvalidId(id.to_string()))
}

pub(crate) fn parse_ids(ids: &[ID]) -> Result<Vec<ObjectId>, ContactError> {
    ids.iter().map(|id| parse_id(id)).collect()
}
