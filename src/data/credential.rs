//! API key validation and the per-session credential holder.
//!
//! EasyData keys are 40 characters long and start with an ASCII letter. A
//! [`Session`] owns at most one validated key; nothing here is process-global,
//! so two clients can hold two different keys side by side.

use std::fmt;

use tracing::info;

use crate::error::EasyDataError;

/// Environment variable the key is read from (after loading `.env`).
pub const API_KEY_ENV: &str = "EASYDATA_API_KEY";

const KEY_LEN: usize = 40;

/// A validated EasyData API key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn parse(key: &str) -> Result<Self, EasyDataError> {
        if key.chars().count() != KEY_LEN {
            return Err(EasyDataError::CredentialValidation(
                "The key should be exactly 40 characters long.".to_string(),
            ));
        }
        if !key.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(EasyDataError::CredentialValidation(
                "The key should start with an alphabet character.".to_string(),
            ));
        }
        Ok(Self(key.to_string()))
    }

    /// Read and validate `EASYDATA_API_KEY`, loading `.env` first if present.
    pub fn from_env() -> Result<Self, EasyDataError> {
        dotenvy::dotenv().ok();
        let key = std::env::var(API_KEY_ENV).map_err(|_| EasyDataError::MissingCredential)?;
        Self::parse(&key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keys end up in request URLs; keep them out of `{:?}` output and logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Holds the key for one session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    credential: Option<Credential>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Some(credential),
        }
    }

    /// Validate and store `key`. On error the previously stored key (if any) is kept.
    pub fn set_up(&mut self, key: &str) -> Result<(), EasyDataError> {
        let credential = Credential::parse(key)?;
        self.credential = Some(credential);
        info!("EasyData API key verified");
        Ok(())
    }

    pub fn has_key(&self) -> bool {
        self.credential.is_some()
    }

    /// The stored key, for display or request building.
    pub fn get_key(&self) -> Result<&str, EasyDataError> {
        self.credential
            .as_ref()
            .map(Credential::as_str)
            .ok_or(EasyDataError::MissingCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GOOD_KEY: &str = "C10D3D29160CE5693F56AA9846ABB2C438D8B230";

    #[test]
    fn accepts_well_formed_key() {
        let mut session = Session::new();
        assert!(!session.has_key());
        session.set_up(GOOD_KEY).unwrap();
        assert!(session.has_key());
        assert_eq!(session.get_key().unwrap(), GOOD_KEY);
        // Repeated reads are stable.
        assert_eq!(session.get_key().unwrap(), GOOD_KEY);
    }

    #[test]
    fn reports_length_before_prefix() {
        let err = Credential::parse("1short").unwrap_err();
        assert!(err.to_string().contains("exactly 40 characters"));

        let err = Credential::parse(&format!("1{}", &GOOD_KEY[1..])).unwrap_err();
        assert!(err.to_string().contains("alphabet character"));
    }

    #[test]
    fn failed_set_up_keeps_previous_key() {
        let mut session = Session::new();
        session.set_up(GOOD_KEY).unwrap();
        assert!(session.set_up("not-a-key").is_err());
        assert_eq!(session.get_key().unwrap(), GOOD_KEY);
    }

    #[test]
    fn get_key_without_set_up_is_missing_credential() {
        let session = Session::new();
        assert!(matches!(session.get_key(), Err(EasyDataError::MissingCredential)));
    }

    #[test]
    fn debug_output_is_redacted() {
        let cred = Credential::parse(GOOD_KEY).unwrap();
        let dbg = format!("{:?}", Session::with_credential(cred));
        assert!(!dbg.contains(GOOD_KEY));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let key = format!("é{}", &GOOD_KEY[1..]);
        assert_eq!(key.chars().count(), 40);
        // Right length, but 'é' is not an ASCII letter.
        let err = Credential::parse(&key).unwrap_err();
        assert!(err.to_string().contains("alphabet character"));
    }

    proptest! {
        #[test]
        fn rejects_any_other_length(key in "[A-Za-z0-9]{0,39}|[A-Za-z0-9]{41,60}") {
            let mut session = Session::new();
            prop_assert!(session.set_up(&key).is_err());
            prop_assert!(!session.has_key());
        }

        #[test]
        fn rejects_non_letter_prefix(first in "[0-9_\\-+ ]", rest in "[A-Za-z0-9]{39}") {
            let key = format!("{first}{rest}");
            prop_assert!(Credential::parse(&key).is_err());
        }

        #[test]
        fn accepts_letter_prefix(first in "[A-Za-z]", rest in "[A-Za-z0-9]{39}") {
            let key = format!("{first}{rest}");
            let mut session = Session::new();
            prop_assert!(session.set_up(&key).is_ok());
            prop_assert!(session.has_key());
            prop_assert_eq!(session.get_key().unwrap(), key.as_str());
        }
    }
}
