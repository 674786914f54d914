use std::env;

use crate::store::WriteMode;

/// Runtime configuration, read once when the function cold-starts.
#[derive(Debug, Clone)]
pub struct Config {
    pub users_table_name: Option<String>,
    pub admin_password: Option<String>,
    pub write_mode: WriteMode,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let users_table_name = non_blank("USERS_TABLE_NAME");
        let admin_password = non_blank("ADMIN_PASSWORD");

        let write_mode = match non_blank("USERS_WRITE_MODE") {
            Some(raw) => raw.parse::<WriteMode>()?,
            None => WriteMode::default(),
        };

        Ok(Self {
            users_table_name,
            admin_password,
            write_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.users_table_name, None);
        assert_eq!(config.admin_password, None);
        assert_eq!(config.write_mode, WriteMode::Unconditional);
    }

    #[test]
    fn test_reads_all_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("USERS_TABLE_NAME", "simple-auth-users"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("USERS_WRITE_MODE", "if-absent"),
        ]))
        .unwrap();
        assert_eq!(config.users_table_name.as_deref(), Some("simple-auth-users"));
        assert_eq!(config.admin_password.as_deref(), Some("s3cret"));
        assert_eq!(config.write_mode, WriteMode::IfAbsent);
    }

    #[test]
    fn test_blank_admin_password_is_unset() {
        let config = Config::from_lookup(lookup_from(&[("ADMIN_PASSWORD", "  ")])).unwrap();
        assert_eq!(config.admin_password, None);
    }

    #[test]
    fn test_rejects_unknown_write_mode() {
        let err = Config::from_lookup(lookup_from(&[("USERS_WRITE_MODE", "sometimes")]))
            .unwrap_err();
        assert!(err.contains("USERS_WRITE_MODE"));
    }
}
