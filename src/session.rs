// src/session.rs
//! Persisted login state: `accessToken`, `refreshToken`, `userInfo`.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    exp: Option<i64>,
}

/// Reads `exp` from a JWT. The signature is not checked: the client never
/// holds the signing key, it only wants to know whether to bother sending it.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    data.claims.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
}

pub struct SessionStore {
    path: Option<PathBuf>,
    data: RwLock<SessionData>,
}

impl SessionStore {
    /// Loads the session file if it exists; a missing file is an empty session.
    pub fn open(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| {
                ClientError::Session(format!("Failed to read session file {}: {}", path.display(), e))
            })?;
            if raw.trim().is_empty() {
                SessionData::default()
            } else {
                serde_json::from_str(&raw).map_err(|e| {
                    ClientError::Session(format!("Corrupt session file {}: {}", path.display(), e))
                })?
            }
        } else {
            SessionData::default()
        };

        Ok(Self { path: Some(path), data: RwLock::new(data) })
    }

    pub fn in_memory() -> Self {
        Self { path: None, data: RwLock::new(SessionData::default()) }
    }

    pub fn snapshot(&self) -> SessionData {
        self.data.read().map(|d| d.clone()).unwrap_or_default()
    }

    /// The bearer token, unless it is missing or already expired.
    pub fn access_token(&self) -> Option<String> {
        let token = self.snapshot().access_token?;
        if let Some(expiry) = token_expiry(&token) {
            if expiry <= Utc::now() {
                tracing::warn!("Access token expired at {}, sending request without it", expiry);
                return None;
            }
        }
        Some(token)
    }

    pub fn user_info(&self) -> Option<Value> {
        self.snapshot().user_info
    }

    pub fn save(&self, data: SessionData) -> ClientResult<()> {
        {
            let mut guard = self
                .data
                .write()
                .map_err(|_| ClientError::Session("Session lock poisoned".to_string()))?;
            *guard = data;
        }
        self.persist()
    }

    pub fn clear(&self) -> ClientResult<()> {
        self.save(SessionData::default())
    }

    fn persist(&self) -> ClientResult<()> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(()),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ClientError::Session(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let raw = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path, raw).map_err(|e| {
            ClientError::Session(format!("Failed to write session file {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token_with_exp(exp: i64) -> String {
        encode(
            &Header::default(),
            &json!({ "sub": "42", "exp": exp }),
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_token_expiry() {
        let exp = Utc::now().timestamp() + 3600;
        assert_eq!(token_expiry(&token_with_exp(exp)).unwrap().timestamp(), exp);
        assert_eq!(token_expiry("not-a-jwt"), None);
    }

    #[test]
    fn test_expired_token_is_not_sent() {
        let store = SessionStore::in_memory();
        store
            .save(SessionData {
                access_token: Some(token_with_exp(Utc::now().timestamp() - 60)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(store.access_token(), None);

        let fresh = token_with_exp(Utc::now().timestamp() + 600);
        store
            .save(SessionData { access_token: Some(fresh.clone()), ..Default::default() })
            .unwrap();
        assert_eq!(store.access_token(), Some(fresh));
    }

    #[test]
    fn test_opaque_tokens_pass_through() {
        let store = SessionStore::in_memory();
        store
            .save(SessionData { access_token: Some("opaque".to_string()), ..Default::default() })
            .unwrap();
        assert_eq!(store.access_token().as_deref(), Some("opaque"));
    }

    #[test]
    fn test_persist_and_reload() -> ClientResult<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = SessionStore::open(&path)?;
        assert_eq!(store.snapshot(), SessionData::default());

        store.save(SessionData {
            access_token: Some("a".to_string()),
            refresh_token: Some("r".to_string()),
            user_info: Some(json!({ "username": "admin" })),
        })?;

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"accessToken\""));
        assert!(raw.contains("\"refreshToken\""));
        assert!(raw.contains("\"userInfo\""));

        let reloaded = SessionStore::open(&path)?;
        assert_eq!(reloaded.user_info(), Some(json!({ "username": "admin" })));

        reloaded.clear()?;
        assert_eq!(SessionStore::open(&path)?.snapshot(), SessionData::default());
        Ok(())
    }
}
