//! Credential verification and admin sessions.
//!
//! Verification sits behind a trait so a real token or session scheme can
//! replace the shared-passcode check without touching the pipeline. The
//! unlock state is an explicit [`Session`] value carried through request
//! context; expiry is a comparison against "now minus login time", not a
//! background timer.

use chrono::{DateTime, Duration, Utc};

/// Pluggable credential check for the admin gateway.
pub trait CredentialVerifier {
    fn verify(&self, presented: &str) -> bool;
}

/// The single shared-passcode scheme: exact string equality. An empty
/// configured passcode never verifies.
pub struct StaticPasscode {
    passcode: String,
}

impl StaticPasscode {
    pub fn new(passcode: impl Into<String>) -> Self {
        Self {
            passcode: passcode.into(),
        }
    }
}

impl CredentialVerifier for StaticPasscode {
    fn verify(&self, presented: &str) -> bool {
        !self.passcode.is_empty() && presented == self.passcode
    }
}

/// An unlocked admin session, minted when a credential verifies.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    issued_at: DateTime<Utc>,
    timeout_minutes: i64,
}

impl Session {
    pub fn begin(token: impl Into<String>, now: DateTime<Utc>, timeout_minutes: i64) -> Self {
        Self {
            token: token.into(),
            issued_at: now,
            timeout_minutes,
        }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at >= Duration::minutes(self.timeout_minutes)
    }

    /// Whether this session covers the presented credential at `now`.
    pub fn covers(&self, presented: &str, now: DateTime<Utc>) -> bool {
        self.token == presented && !self.is_expired(now)
    }
}

/// Everything a handler gets to know about the caller.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub session: Session,
}

/// Resolve the presented credential against the current session, minting
/// or refreshing one as needed. Returns None when the credential fails.
pub fn authorize(
    presented: &str,
    current: Option<Session>,
    verifier: &dyn CredentialVerifier,
    now: DateTime<Utc>,
    timeout_minutes: i64,
) -> Option<Session> {
    if let Some(session) = current {
        if session.covers(presented, now) {
            return Some(session);
        }
    }
    if verifier.verify(presented) {
        return Some(Session::begin(presented, now, timeout_minutes));
    }
    None
}

/// Extract the credential from an `Authorization: Bearer <token>` header.
pub fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}
