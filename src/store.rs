use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{ContactError, ContactResult};

const COLLECTION: &str = "contacts";

/// A contact document as stored in the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub phone: String,
    pub country: String,
    pub timezone: String,
    pub contacts: Vec<ObjectId>,
}

/// Fields for a contact about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub country: String,
    pub timezone: String,
    pub contacts: Vec<ObjectId>,
}

/// A phone change that passed revalidation, applied as one update.
#[derive(Debug, Clone)]
pub struct ValidatedUpdate {
    pub name: Option<String>,
    pub phone: String,
    pub country: String,
    pub timezone: String,
}

/// Persistence operations the resolvers need.
///
/// Kept behind a trait so tests can run against an in-memory double instead
/// of a live MongoDB deployment.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> ContactResult<Option<ContactRecord>>;

    async fn find_by_phone(&self, phone: &str) -> ContactResult<Option<ContactRecord>>;

    /// Batched lookup; result order is whatever the store returns.
    async fn find_by_ids(&self, ids: &[ObjectId]) -> ContactResult<Vec<ContactRecord>>;

    async fn find_all(&self) -> ContactResult<Vec<ContactRecord>>;

    async fn phone_exists(&self, phone: &str) -> ContactResult<bool>;

    async fn insert(&self, contact: NewContact) -> ContactResult<ContactRecord>;

    /// Name-only update. Returns the updated record, or `None` if no record
    /// matches the id.
    async fn update_name(&self, id: ObjectId, name: &str) -> ContactResult<Option<ContactRecord>>;

    /// Full update after a successful phone revalidation.
    async fn update_validated(
        &self,
        id: ObjectId,
        update: ValidatedUpdate,
    ) -> ContactResult<Option<ContactRecord>>;

    /// Returns whether exactly one document was removed.
    async fn delete(&self, id: ObjectId) -> ContactResult<bool>;
}

/// MongoDB-backed store.
pub struct MongoContactStore {
    collection: Collection<ContactRecord>,
}

impl MongoContactStore {
    pub async fn connect(config: &Config) -> ContactResult<Self> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;
        let collection = client.database(&config.database).collection(COLLECTION);
        Ok(Self { collection })
    }

    /// Creates the unique index on `phone`. The resolvers also pre-check the
    /// phone for a friendlier message, but the index is what actually
    /// guarantees uniqueness under concurrent inserts.
    pub async fn ensure_indexes(&self) -> ContactResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "phone": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index, None).await?;
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

fn return_updated() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build()
}

#[async_trait]
impl ContactStore for MongoContactStore {
    async fn find_by_id(&self, id: ObjectId) -> ContactResult<Option<ContactRecord>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_by_phone(&self, phone: &str) -> ContactResult<Option<ContactRecord>> {
        Ok(self
            .collection
            .find_one(doc! { "phone": phone }, None)
            .await?)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> ContactResult<Vec<ContactRecord>> {
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_all(&self) -> ContactResult<Vec<ContactRecord>> {
        let cursor = self.collection.find(doc! {}, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn phone_exists(&self, phone: &str) -> ContactResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "phone": phone }, None)
            .await?;
        Ok(count > 0)
    }

    async fn insert(&self, contact: NewContact) -> ContactResult<ContactRecord> {
        let record = ContactRecord {
            id: ObjectId::new(),
            name: contact.name,
            phone: contact.phone,
            country: contact.country,
            timezone: contact.timezone,
            contacts: contact.contacts,
        };
        match self.collection.insert_one(&record, None).await {
            Ok(_) => Ok(record),
            Err(err) if is_duplicate_key(&err) => Err(ContactError::PhoneTaken(record.phone)),
            Err(err) => Err(err.into()),
        }
    }

    async fn update_name(&self, id: ObjectId, name: &str) -> ContactResult<Option<ContactRecord>> {
        Ok(self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "name": name } },
                return_updated(),
            )
            .await?)
    }

    async fn update_validated(
        &self,
        id: ObjectId,
        update: ValidatedUpdate,
    ) -> ContactResult<Option<ContactRecord>> {
        let mut fields = doc! {
            "phone": update.phone.as_str(),
            "country": update.country.as_str(),
            "timezone": update.timezone.as_str(),
        };
        if let Some(name) = &update.name {
            fields.insert("name", name.as_str());
        }
        let result = self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": fields },
                return_updated(),
            )
            .await;
        match result {
            Ok(record) => Ok(record),
            // The phone index can still reject a racing change to a number
            // that another contact claimed after our pre-check.
            Err(err) if is_duplicate_key(&err) => Err(ContactError::PhoneConflict(update.phone)),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, id: ObjectId) -> ContactResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count == 1)
    }
}
