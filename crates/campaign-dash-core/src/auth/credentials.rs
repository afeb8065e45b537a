use std::fmt;

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "campaign-dash";

/// Frappe API key/secret pair.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub api_key: String,
    api_secret: String,
}

impl ApiCredentials {
    pub fn new(api_key: &str, api_secret: &str) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            api_secret: api_secret.trim().to_string(),
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("token {}:{}", self.api_key, self.api_secret)
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"********")
            .finish()
    }
}

/// API secrets in the OS keychain, keyed by API key.
pub struct CredentialStore;

impl CredentialStore {
    /// Store the secret for an API key in the OS keychain
    pub fn store(api_key: &str, api_secret: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, api_key)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(api_secret)
            .context("Failed to store API secret in keychain")?;
        Ok(())
    }

    /// Retrieve the secret for an API key from the OS keychain
    pub fn get_secret(api_key: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, api_key)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve API secret from keychain")
    }

    /// Delete the stored secret for an API key
    pub fn delete(api_key: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, api_key)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete credential from keychain")?;
        Ok(())
    }

    /// Check if a secret exists for an API key
    pub fn has_secret(api_key: &str) -> bool {
        if let Ok(entry) = Entry::new(SERVICE_NAME, api_key) {
            entry.get_password().is_ok()
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header_value() {
        let creds = ApiCredentials::new(" key ", "secret\n");
        assert_eq!(creds.authorization(), "token key:secret");
    }

    #[test]
    fn test_debug_masks_secret() {
        let creds = ApiCredentials::new("key", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("key"));
        assert!(!debug.contains("hunter2"));
    }
}
