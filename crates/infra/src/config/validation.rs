//! Semantic validation (serde handles syntax).
//!
//! Returns every problem found, not just the first.

use std::collections::HashSet;
use std::net::IpAddr;

use super::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let port = config.server.port.trim();
    if port.is_empty() {
        errors.push(ValidationError::new("server.port", "must not be empty"));
    } else if port.parse::<u16>().is_err() {
        errors.push(ValidationError::new(
            "server.port",
            "must be a number between 0 and 65535",
        ));
    }
    if config.server.listen.trim().parse::<IpAddr>().is_err() {
        errors.push(ValidationError::new("server.listen", "must be an IP address"));
    }

    let db = &config.database;
    if db.max_connections == 0 {
        errors.push(ValidationError::new(
            "database.max_connections",
            "must be greater than 0",
        ));
    }
    if db.url.is_none() {
        for (field, value) in [
            ("database.host", &db.host),
            ("database.user", &db.user),
            ("database.db_name", &db.db_name),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(field, "must not be empty"));
            }
        }
    }

    let mut seen = HashSet::new();
    for (i, user) in config.auth.users.iter().enumerate() {
        let field = format!("auth.users[{i}].username");
        if user.username.is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        } else if user.username.contains(':') {
            errors.push(ValidationError::new(field, "must not contain ':'"));
        } else if !seen.insert(user.username.as_str()) {
            errors.push(ValidationError::new(
                field,
                format!("duplicate username `{}`", user.username),
            ));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_problem_at_once() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            listen = "not-an-ip"
            port = "http"

            [database]
            host = ""
            max_connections = 0

            [[auth.users]]
            username = "admin"
            password = "a"

            [[auth.users]]
            username = "admin"
            password = "b"

            [[auth.users]]
            username = "a:b"
            password = "c"
            "#,
        )
        .unwrap();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "server.port",
                "server.listen",
                "database.max_connections",
                "database.host",
                "auth.users[1].username",
                "auth.users[2].username",
            ]
        );
    }

    #[test]
    fn connection_fields_are_optional_with_a_url() {
        let mut config = AppConfig::default();
        config.database.host.clear();
        config.database.url = Some("postgres://localhost/catalog".into());
        assert!(validate_config(&config).is_ok());
    }
}
