use regex::Regex;

use crate::error::{Result, WagnerError};

/// Python virtualenv living in a service account's home directory.
///
/// Commands run within it start in `~user/` with `~user/bin/activate`
/// sourced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Virtualenv {
    user: String,
}

impl Virtualenv {
    /// Virtualenv of the given account.
    ///
    /// The name ends up unquoted in the script so the shell can expand
    /// `~user`; only plain account names are accepted.
    pub fn for_user(user: &str) -> Result<Self> {
        let valid = Regex::new(r"^[a-z_][a-z0-9_-]*$")
            .map_err(|e| WagnerError::config(format!("Invalid user pattern: {}", e)))?;

        if !valid.is_match(user) {
            return Err(WagnerError::config(format!(
                "'{}' is not a valid account name",
                user
            )));
        }

        Ok(Virtualenv {
            user: user.to_string(),
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn home(&self) -> String {
        format!("~{}/", self.user)
    }

    pub fn activate_script(&self) -> String {
        format!("~{}/bin/activate", self.user)
    }
}
