//! Configuration management.
//!
//! Configuration is loaded from environment variables (optionally via a
//! `.env` file) with defaults suited to a local Keycloak on port 8180.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Agent login route identifiers.
    pub routes: RouteConfig,
    /// Keycloak client settings.
    pub keycloak: KeycloakSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Public base URL of the agent application.
    pub base_url: String,
}

/// Path of the health endpoint, reserved next to the configured routes.
pub const HEALTH_PATH: &str = "/health";

/// Route identifiers for the agent login flow.
///
/// These replace the hard-coded route names of the hosting application and
/// are handed to the authenticator at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Path of the agent login page (target of `start`).
    pub login_path: String,
    /// Path the identity provider redirects back to.
    pub login_check_path: String,
    /// Segment a request path must contain to count as a login callback.
    pub login_check_segment: String,
    /// Landing path after a successful login.
    pub success_path: String,
}

/// Keycloak OAuth2 client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeycloakSettings {
    /// Keycloak server URL (e.g. `https://sso.example.com`).
    pub base_url: String,
    /// Realm name.
    pub realm: String,
    /// OAuth2 client ID.
    pub client_id: String,
    /// OAuth2 client secret.
    #[serde(skip_serializing, default)]
    pub client_secret: String,
    /// Redirect URI registered for the client.
    pub redirect_uri: String,
    /// Scopes requested at authorization time.
    pub scopes: Vec<String>,
    /// Timeout applied to every call to Keycloak, in seconds.
    pub http_timeout_secs: u64,
}

impl KeycloakSettings {
    /// Returns the outbound request timeout.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl RouteConfig {
    /// Checks that the routes can be mounted.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a path does not start with `/`, a mounted
    /// path contains route-pattern syntax (`:`, `{`, `}`, `*`) or equals
    /// [`HEALTH_PATH`], the login and login-check paths coincide, or the
    /// callback segment is empty.
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("SSO_LOGIN_PATH", &self.login_path),
            ("SSO_LOGIN_CHECK_PATH", &self.login_check_path),
            ("SSO_SUCCESS_PATH", &self.success_path),
        ] {
            if !path.starts_with('/') {
                return Err(Error::config(format!("{name} must start with '/': {path}")));
            }
        }
        for (name, path) in [
            ("SSO_LOGIN_PATH", &self.login_path),
            ("SSO_LOGIN_CHECK_PATH", &self.login_check_path),
        ] {
            if path.contains([':', '{', '}', '*']) {
                return Err(Error::config(format!(
                    "{name} must be a literal path without ':', '{{', '}}' or '*': {path}"
                )));
            }
            if path == HEALTH_PATH {
                return Err(Error::config(format!("{name} cannot be {HEALTH_PATH}")));
            }
        }
        if self.login_path == self.login_check_path {
            return Err(Error::config(
                "SSO_LOGIN_PATH and SSO_LOGIN_CHECK_PATH must differ",
            ));
        }
        if self.login_check_segment.trim().is_empty() {
            return Err(Error::config("SSO_LOGIN_CHECK_SEGMENT cannot be empty"));
        }
        Ok(())
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            login_path: "/agent/login".to_string(),
            login_check_path: "/agent/login_check".to_string(),
            login_check_segment: "agent/login_check".to_string(),
            success_path: "/agent/overview".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            routes: RouteConfig::default(),
            keycloak: KeycloakSettings {
                base_url: "http://localhost:8180".to_string(),
                realm: "agents".to_string(),
                client_id: "agent-backoffice".to_string(),
                client_secret: String::new(),
                redirect_uri: "http://localhost:8080/agent/login_check".to_string(),
                scopes: default_scopes(),
                http_timeout_secs: 10,
            },
        }
    }
}

fn default_scopes() -> Vec<String> {
    vec!["openid".to_string(), "email".to_string(), "profile".to_string()]
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `KEYCLOAK_CLIENT_SECRET` is missing, a
    /// numeric variable does not parse, or the routes are invalid.
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("SSO_HOST", &defaults.server.host);
        let port = parse_var(&lookup, "SSO_PORT", defaults.server.port)?;
        let base_url = lookup("SSO_BASE_URL").unwrap_or_else(|| format!("http://{host}:{port}"));

        let routes = RouteConfig {
            login_path: var("SSO_LOGIN_PATH", &defaults.routes.login_path),
            login_check_path: var("SSO_LOGIN_CHECK_PATH", &defaults.routes.login_check_path),
            login_check_segment: var(
                "SSO_LOGIN_CHECK_SEGMENT",
                &defaults.routes.login_check_segment,
            ),
            success_path: var("SSO_SUCCESS_PATH", &defaults.routes.success_path),
        };
        routes.validate()?;

        let client_secret = lookup("KEYCLOAK_CLIENT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::config("KEYCLOAK_CLIENT_SECRET environment variable is required")
            })?;

        let redirect_uri = lookup("KEYCLOAK_REDIRECT_URI").unwrap_or_else(|| {
            format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                routes.login_check_path
            )
        });

        let scopes = lookup("KEYCLOAK_SCOPES")
            .map(|s| {
                s.split([',', ' '])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_else(default_scopes);

        let keycloak = KeycloakSettings {
            base_url: var("KEYCLOAK_BASE_URL", &defaults.keycloak.base_url),
            realm: var("KEYCLOAK_REALM", &defaults.keycloak.realm),
            client_id: var("KEYCLOAK_CLIENT_ID", &defaults.keycloak.client_id),
            client_secret,
            redirect_uri,
            scopes,
            http_timeout_secs: parse_var(
                &lookup,
                "KEYCLOAK_HTTP_TIMEOUT_SECS",
                defaults.keycloak.http_timeout_secs,
            )?,
        };

        Ok(Self {
            server: ServerSettings {
                host,
                port,
                base_url,
            },
            routes,
            keycloak,
        })
    }

    /// Creates a configuration for testing against a mock Keycloak.
    #[must_use]
    pub fn for_testing(keycloak_url: &str) -> Self {
        let mut config = Self::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0; // Random port
        config.keycloak.base_url = keycloak_url.to_string();
        config.keycloak.client_secret = "test-secret".to_string();
        config.keycloak.http_timeout_secs = 5;
        config
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn client_secret_is_required() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("KEYCLOAK_CLIENT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.routes, RouteConfig::default());
        assert_eq!(config.keycloak.client_secret, "s3cret");
        assert_eq!(config.keycloak.http_timeout(), Duration::from_secs(10));
        assert_eq!(config.keycloak.scopes, vec!["openid", "email", "profile"]);
        assert_eq!(
            config.keycloak.redirect_uri,
            "http://0.0.0.0:8080/agent/login_check"
        );
    }

    #[test]
    fn overrides_are_read() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("KEYCLOAK_CLIENT_SECRET", "s3cret"),
            ("SSO_PORT", "9000"),
            ("SSO_BASE_URL", "https://shop.example.com/"),
            ("SSO_LOGIN_CHECK_PATH", "/backoffice/login_check"),
            ("KEYCLOAK_REALM", "staff"),
            ("KEYCLOAK_SCOPES", "openid, email"),
            ("KEYCLOAK_HTTP_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.keycloak.realm, "staff");
        assert_eq!(config.keycloak.scopes, vec!["openid", "email"]);
        assert_eq!(config.keycloak.http_timeout_secs, 3);
        assert_eq!(
            config.keycloak.redirect_uri,
            "https://shop.example.com/backoffice/login_check"
        );
    }

    #[test]
    fn invalid_number_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("KEYCLOAK_CLIENT_SECRET", "s3cret"),
            ("SSO_PORT", "eighty"),
        ]));
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("SSO_PORT")));
    }

    #[test]
    fn client_secret_is_not_serialized() {
        let config = AppConfig::for_testing("http://127.0.0.1:1");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("test-secret"));
    }

    #[test]
    fn relative_route_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("KEYCLOAK_CLIENT_SECRET", "s3cret"),
            ("SSO_LOGIN_PATH", "agent/login"),
        ]));
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("SSO_LOGIN_PATH")));
    }

    #[test]
    fn colliding_routes_are_rejected() {
        let routes = RouteConfig {
            login_check_path: "/agent/login".to_string(),
            ..RouteConfig::default()
        };
        assert!(routes.validate().is_err());
        assert!(RouteConfig::default().validate().is_ok());
    }

    #[test]
    fn pattern_syntax_in_mounted_route_is_rejected() {
        for path in ["/agent/:login", "/agent/{login}", "/agent/*rest"] {
            let routes = RouteConfig {
                login_path: path.to_string(),
                ..RouteConfig::default()
            };
            let result = routes.validate();
            assert!(
                matches!(result, Err(Error::Config(ref msg)) if msg.contains("SSO_LOGIN_PATH")),
                "{path}"
            );
        }
    }

    #[test]
    fn health_path_is_reserved() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("KEYCLOAK_CLIENT_SECRET", "s3cret"),
            ("SSO_LOGIN_CHECK_PATH", "/health"),
        ]));
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("SSO_LOGIN_CHECK_PATH")));
    }
}
