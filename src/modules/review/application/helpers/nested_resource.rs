//! Collections reached through a parent named in the URL.
//!
//! A [`NestedResource`] pairs a [`ParentLookup`] with a [`ChildCollection`].
//! Every operation resolves the parent first, so a missing parent and a child
//! filed under a different parent both surface as "not found". New children
//! are always attached to the resolved parent and the acting user.

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::application::domain::entities::{Actor, UserId};
use crate::review::application::ports::outgoing::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NestedError {
    #[error("Parent resource not found")]
    ParentNotFound,

    #[error("Resource not found")]
    NotFound,

    #[error("Resource already exists")]
    Duplicate,

    #[error("Store error: {0}")]
    Store(String),
}

impl From<StoreError> for NestedError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => NestedError::Duplicate,
            StoreError::NotFound => NestedError::NotFound,
            StoreError::DatabaseError(msg) => NestedError::Store(msg),
        }
    }
}

#[async_trait]
pub trait ParentLookup: Send + Sync {
    type Key: Copy + Send + Sync;
    type Parent: Send + Sync;

    async fn find_parent(&self, key: Self::Key) -> Result<Option<Self::Parent>, StoreError>;
}

#[async_trait]
pub trait ChildCollection<P: Send + Sync>: Send + Sync {
    type Child: Send;
    type Draft: Send;

    async fn list_for(&self, parent: &P) -> Result<Vec<Self::Child>, StoreError>;

    async fn find_in(&self, parent: &P, id: Uuid) -> Result<Option<Self::Child>, StoreError>;

    async fn insert_into(
        &self,
        parent: &P,
        author: UserId,
        draft: Self::Draft,
    ) -> Result<Self::Child, StoreError>;
}

pub struct NestedResource<L, C> {
    lookup: L,
    children: C,
}

impl<L, C> NestedResource<L, C>
where
    L: ParentLookup,
    C: ChildCollection<L::Parent>,
{
    pub fn new(lookup: L, children: C) -> Self {
        Self { lookup, children }
    }

    pub async fn parent(&self, key: L::Key) -> Result<L::Parent, NestedError> {
        self.lookup
            .find_parent(key)
            .await?
            .ok_or(NestedError::ParentNotFound)
    }

    pub async fn list(&self, key: L::Key) -> Result<Vec<C::Child>, NestedError> {
        let parent = self.parent(key).await?;
        Ok(self.children.list_for(&parent).await?)
    }

    pub async fn get(&self, key: L::Key, id: Uuid) -> Result<C::Child, NestedError> {
        let parent = self.parent(key).await?;
        self.children
            .find_in(&parent, id)
            .await?
            .ok_or(NestedError::NotFound)
    }

    pub async fn create(
        &self,
        key: L::Key,
        author: &Actor,
        draft: C::Draft,
    ) -> Result<C::Child, NestedError> {
        let parent = self.parent(key).await?;
        Ok(self
            .children
            .insert_into(&parent, author.user_id, draft)
            .await?)
    }
}
