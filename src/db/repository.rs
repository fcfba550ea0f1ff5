use futures::stream::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, from_document, to_document, Document};
use mongodb::options::FindOneOptions;
use mongodb::Collection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::StoreError;

/// Persisted-form counterpart of a public entity.
pub trait StoredEntity: Serialize + DeserializeOwned + Send + Sync + Unpin {
    /// Backing collection name.
    const COLLECTION: &'static str;
    /// Noun used in not-found messages.
    const LABEL: &'static str;
}

pub struct Repository<D> {
    collection: Collection<D>,
}

impl<D: StoredEntity> Repository<D> {
    pub fn new(collection: Collection<D>) -> Self {
        Self { collection }
    }

    pub async fn exists(&self, filter: Document) -> Result<bool, StoreError> {
        let options = FindOneOptions::builder()
            .projection(doc! { "_id": 1 })
            .build();
        let found = self
            .collection
            .clone_with_type::<Document>()
            .find_one(filter, options)
            .await?;
        Ok(found.is_some())
    }

    pub async fn insert(&self, entity: &D) -> Result<ObjectId, StoreError> {
        let result = self.collection.insert_one(entity, None).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::UnexpectedKey)
    }

    /// Insert after checking that nothing matches `unique`. Check-then-insert;
    /// uniqueness is advisory, there is no unique index behind it.
    pub async fn insert_unique(
        &self,
        entity: &D,
        unique: Document,
        conflict: &'static str,
    ) -> Result<ObjectId, StoreError> {
        if self.exists(unique).await? {
            return Err(StoreError::Duplicate(conflict));
        }
        self.insert(entity).await
    }

    pub async fn find_all(&self) -> Result<Vec<D>, StoreError> {
        let cursor = self.collection.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<D>, StoreError> {
        Ok(self.collection.find_one(filter, None).await?)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<D>, StoreError> {
        self.find_one(doc! { "_id": id }).await
    }

    /// Fetch by id or fail with the entity's not-found error.
    pub async fn fetch_404(&self, id: ObjectId) -> Result<D, StoreError> {
        self.find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound(D::LABEL))
    }

    /// Apply an update document to one entity. Not-found is decided by the
    /// match count; a no-op write to an existing document is a success.
    pub async fn update_by_id(&self, id: ObjectId, update: Document) -> Result<(), StoreError> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, update, None)
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound(D::LABEL));
        }
        Ok(())
    }

    /// Overwrite every public field with the entity's current values.
    pub async fn replace_fields(&self, id: ObjectId, entity: &D) -> Result<(), StoreError> {
        let mut fields = to_document(entity)?;
        fields.remove("_id");
        self.update_by_id(id, doc! { "$set": fields }).await
    }

    pub async fn replace_fields_unique(
        &self,
        id: ObjectId,
        entity: &D,
        unique: Document,
        conflict: &'static str,
    ) -> Result<(), StoreError> {
        if self.exists(unique).await? {
            return Err(StoreError::Duplicate(conflict));
        }
        self.replace_fields(id, entity).await
    }

    pub async fn delete_by_id(&self, id: ObjectId) -> Result<(), StoreError> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound(D::LABEL));
        }
        Ok(())
    }

    /// Run an aggregation pipeline on this collection, decoding each result
    /// document into `T`.
    pub async fn aggregate<T: DeserializeOwned>(
        &self,
        pipeline: Vec<Document>,
    ) -> Result<Vec<T>, StoreError> {
        let cursor = self.collection.aggregate(pipeline, None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        documents
            .into_iter()
            .map(|document| from_document(document).map_err(StoreError::from))
            .collect()
    }

    pub async fn aggregate_one<T: DeserializeOwned>(
        &self,
        pipeline: Vec<Document>,
    ) -> Result<Option<T>, StoreError> {
        Ok(self.aggregate(pipeline).await?.into_iter().next())
    }
}
