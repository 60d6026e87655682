use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub app: AppConfig,
    pub mail: MailConfig,
    pub user_jwt: JwtConfig,
    pub employee_jwt: JwtConfig,
    #[serde(default)]
    pub tokens: TokenConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Frontend origin the emailed verification links point at.
    pub base_url: String,
    /// `production` switches the refresh cookie to Secure.
    pub environment: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// Signing secrets for one actor kind.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    pub access_minutes: i64,
    pub refresh_days: i64,
    pub remember_days: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_minutes: 15,
            refresh_days: 7,
            remember_days: 30,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations that collapse the secret isolation between
    /// actor kinds or between token roles.
    fn validate(&self) -> Result<(), ConfigError> {
        let secrets = [
            &self.user_jwt.access_secret,
            &self.user_jwt.refresh_secret,
            &self.employee_jwt.access_secret,
            &self.employee_jwt.refresh_secret,
        ];

        for (i, a) in secrets.iter().enumerate() {
            for b in secrets.iter().skip(i + 1) {
                if a == b {
                    return Err(ConfigError::Message(
                        "jwt secrets must be pairwise distinct".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(access: &str, refresh: &str) -> JwtConfig {
        JwtConfig {
            access_secret: access.to_string(),
            refresh_secret: refresh.to_string(),
        }
    }

    fn config(user: JwtConfig, employee: JwtConfig) -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgres://localhost/identity".to_string(),
            },
            server: ServerConfig { http_port: 3000 },
            app: AppConfig {
                base_url: "http://localhost:5173".to_string(),
                environment: "development".to_string(),
            },
            mail: MailConfig {
                host: "localhost".to_string(),
                port: 587,
                username: "mailer".to_string(),
                password: "secret".to_string(),
                from: "noreply@example.com".to_string(),
            },
            user_jwt: user,
            employee_jwt: employee,
            tokens: TokenConfig::default(),
        }
    }

    #[test]
    fn test_distinct_secrets_pass_validation() {
        let config = config(jwt("ua", "ur"), jwt("ea", "er"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shared_secret_across_kinds_is_rejected() {
        let config = config(jwt("shared", "ur"), jwt("shared", "er"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shared_secret_across_roles_is_rejected() {
        let config = config(jwt("same", "same"), jwt("ea", "er"));
        assert!(config.validate().is_err());
    }
}
