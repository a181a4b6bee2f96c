//! Authorized CRUD over the backend collections.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::SessionGuard;
use crate::application::dto::{CreatedManager, NewManager, PasswordReset};
use crate::domain::entities::{EntityId, EntityKind, ListFilter, Page, PageBody, Record, User};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ApiRequest, ApiResponse, HttpMethod, PageSource};

#[derive(Deserialize)]
struct PasswordBody {
    password: String,
}

#[derive(Deserialize)]
struct CreatedManagerBody {
    user: User,
    password: String,
}

/// Typed access to every entity collection, through the session guard.
#[derive(Clone)]
pub struct EntityClient {
    guard: Arc<SessionGuard>,
}

impl EntityClient {
    #[must_use]
    pub const fn new(guard: Arc<SessionGuard>) -> Self {
        Self { guard }
    }

    #[must_use]
    pub fn guard(&self) -> &Arc<SessionGuard> {
        &self.guard
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.guard.authorized_request(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(response.into_error())
        }
    }

    /// Fetches rows `offset..offset + limit` of `kind` matching `filter`.
    ///
    /// # Errors
    /// Returns the mapped backend failure or [`ApiError::Decode`] when the
    /// body is neither a bare array nor a `{data, pagination}` envelope.
    pub async fn list<F: ListFilter>(
        &self,
        kind: EntityKind,
        filter: &F,
        offset: u64,
        limit: u64,
    ) -> Result<Page<Record>, ApiError> {
        let request = ApiRequest::get(kind.path())
            .with_query(filter.query_pairs())
            .with_query([("offset", offset.to_string()), ("limit", limit.to_string())]);

        let body: PageBody<Record> = self.send(request).await?.json()?;
        let page = body.into_page(offset, limit);
        debug!(
            kind = %kind,
            offset,
            received = page.len(),
            total = page.cursor.total,
            "Listed rows"
        );
        Ok(page)
    }

    /// # Errors
    /// Returns [`ApiError::NotFound`] for unknown ids.
    pub async fn get(&self, kind: EntityKind, id: &EntityId) -> Result<Record, ApiError> {
        self.send(ApiRequest::get(kind.item_path(id))).await?.json()
    }

    /// # Errors
    /// Returns [`ApiError::Validation`] when the backend rejects the body.
    pub async fn create(&self, kind: EntityKind, body: Value) -> Result<Record, ApiError> {
        let record: Record = self.send(ApiRequest::post(kind.path(), body)).await?.json()?;
        info!(kind = %kind, id = ?record.id(), "Created {}", kind.label());
        Ok(record)
    }

    /// # Errors
    /// Returns [`ApiError::NotFound`] or [`ApiError::Validation`] as reported.
    pub async fn update(
        &self,
        kind: EntityKind,
        id: &EntityId,
        body: Value,
    ) -> Result<Record, ApiError> {
        let record = self
            .send(ApiRequest::put(kind.item_path(id), body))
            .await?
            .json()?;
        info!(kind = %kind, %id, "Updated {}", kind.label());
        Ok(record)
    }

    /// Deletes a row and returns whatever acknowledgement the backend sends.
    ///
    /// # Errors
    /// Returns [`ApiError::NotFound`] for unknown ids.
    pub async fn delete(&self, kind: EntityKind, id: &EntityId) -> Result<Value, ApiError> {
        let ack = self
            .send(ApiRequest::delete(kind.item_path(id)))
            .await?
            .json()?;
        info!(kind = %kind, %id, "Deleted {}", kind.label());
        Ok(ack)
    }

    /// Has the backend generate a new password for a manager.
    ///
    /// # Errors
    /// Returns the mapped backend failure; non-super managers get a 403
    /// as [`ApiError::Server`].
    pub async fn reset_password(&self, id: &EntityId) -> Result<PasswordReset, ApiError> {
        let path = format!("{}/reset-password", EntityKind::Users.item_path(id));
        let body: PasswordBody = self
            .send(ApiRequest::new(HttpMethod::Post, path))
            .await?
            .json()?;
        info!(%id, "Manager password reset");
        Ok(PasswordReset::new(body.password))
    }

    /// Creates a manager account with a backend-generated password.
    ///
    /// # Errors
    /// Returns [`ApiError::Validation`] for taken or empty usernames.
    pub async fn create_manager(&self, manager: &NewManager) -> Result<CreatedManager, ApiError> {
        let request = ApiRequest::post(
            EntityKind::Users.path(),
            json!({ "username": manager.username, "role": manager.role }),
        );
        let body: CreatedManagerBody = self.send(request).await?.json()?;
        info!(username = %body.user.username(), role = %body.user.role(), "Manager created");
        Ok(CreatedManager {
            user: body.user,
            password: body.password.into(),
        })
    }
}

/// One entity collection as a page source for [`super::PaginatedList`].
pub struct EntitySource<F> {
    client: EntityClient,
    kind: EntityKind,
    _filter: PhantomData<fn(&F)>,
}

impl<F> EntitySource<F> {
    #[must_use]
    pub const fn new(client: EntityClient, kind: EntityKind) -> Self {
        Self {
            client,
            kind,
            _filter: PhantomData,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }
}

#[async_trait]
impl<F: ListFilter> PageSource<Record, F> for EntitySource<F> {
    async fn fetch_page(
        &self,
        filter: &F,
        offset: u64,
        limit: u64,
    ) -> Result<Page<Record>, ApiError> {
        self.client.list(self.kind, filter, offset, limit).await
    }
}
