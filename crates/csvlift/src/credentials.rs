//! 🔒 Credentials — the keys to the bucket, handled with oven mitts.
//!
//! Read once at process start, never persisted, never mutated, never logged.
//! `Credentials` holds whatever the environment handed us (possibly nothing);
//! `ResolvedCredentials` is the proof that both required fields were present.
//! Only the resolved flavor can reach an object store connector.

use std::fmt;

/// 🔑 Raw credentials as supplied by configuration. Any field may be absent.
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    session_token: Option<String>,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: Some(access_key_id.into()),
            secret_access_key: Some(secret_access_key.into()),
            session_token: None,
        }
    }

    /// 🧩 Build from optional parts, exactly as the environment delivered them.
    ///
    /// An empty session token is treated as absent. Empty access or secret keys
    /// are kept so `resolve` can report them as missing.
    pub fn from_parts(
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id,
            secret_access_key,
            session_token: session_token.filter(|token| !token.is_empty()),
        }
    }

    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(session_token.into()).filter(|token| !token.is_empty());
        self
    }

    /// 📋 Names of the required fields that are absent or empty, in env-var spelling.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.access_key_id) {
            missing.push("AWS_ACCESS_KEY_ID");
        }
        if is_blank(&self.secret_access_key) {
            missing.push("AWS_SECRET_ACCESS_KEY");
        }
        missing
    }

    /// ✅ Borrow the credentials as a validated set, or hand back what is missing.
    pub fn resolve(&self) -> Result<ResolvedCredentials<'_>, Vec<&'static str>> {
        match (
            self.access_key_id.as_deref(),
            self.secret_access_key.as_deref(),
        ) {
            (Some(access_key_id), Some(secret_access_key))
                if !access_key_id.is_empty() && !secret_access_key.is_empty() =>
            {
                Ok(ResolvedCredentials {
                    access_key_id,
                    secret_access_key,
                    session_token: self.session_token.as_deref(),
                })
            }
            _ => Err(self.missing_fields()),
        }
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().is_none_or(str::is_empty)
}

// 🐛 Hand-rolled Debug: the secret and the token never leave the building.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &redacted(&self.secret_access_key))
            .field("session_token", &redacted(&self.session_token))
            .finish()
    }
}

fn redacted(field: &Option<String>) -> Option<&'static str> {
    field.as_ref().map(|_| "<redacted>")
}

/// 🔐 Credentials with both required fields present and non-empty.
#[derive(Clone, Copy)]
pub struct ResolvedCredentials<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub session_token: Option<&'a str>,
}

impl fmt::Debug for ResolvedCredentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.map(|_| "<redacted>"))
            .finish()
    }
}
