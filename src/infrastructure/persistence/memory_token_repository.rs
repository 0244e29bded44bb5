//! In-process implementation of token repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;

/// DashMap-backed token store keyed by token hash.
pub struct MemoryTokenRepository {
    next_id: AtomicI64,
    tokens: DashMap<String, ApiToken>,
}

impl MemoryTokenRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            tokens: DashMap::new(),
        }
    }
}

impl Default for MemoryTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn find_active(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .get(token_hash)
            .filter(|token| !token.is_revoked())
            .map(|token| token.value().clone()))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        if let Some(mut token) = self.tokens.get_mut(token_hash) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(
        &self,
        owner_id: &str,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        match self.tokens.entry(token_hash.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(AppError::conflict(
                "Token already exists",
                json!({ "name": name }),
            )),
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                let token = ApiToken {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst),
                    owner_id: owner_id.to_string(),
                    name: name.to_string(),
                    token_hash: token_hash.to_string(),
                    created_at: Utc::now(),
                    last_used_at: None,
                    revoked_at: None,
                };
                vacant.insert(token.clone());
                Ok(token)
            }
        }
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let mut tokens: Vec<ApiToken> = self.tokens.iter().map(|t| t.value().clone()).collect();
        tokens.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(tokens)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .iter()
            .filter(|t| t.name == name)
            .max_by_key(|t| t.id)
            .map(|t| t.value().clone()))
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let hash = self
            .tokens
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.key().clone())
            .ok_or_else(|| AppError::not_found("Token not found", json!({ "id": id })))?;

        if let Some(mut token) = self.tokens.get_mut(&hash) {
            token.revoked_at.get_or_insert_with(Utc::now);
        }

        Ok(())
    }
}
