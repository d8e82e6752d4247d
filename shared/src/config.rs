use anyhow::Result;

/// Process-wide configuration, read once at startup from environment
/// variables with development defaults.
#[derive(Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub email: EmailConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                port: env_or("PORT", 8080)?,
            },
            database: DatabaseConfig {
                host: env_or_str("DATABASE_HOST", "localhost"),
                port: env_or("DATABASE_PORT", 5432)?,
                username: env_or_str("DATABASE_USERNAME", "app"),
                password: env_or_str("DATABASE_PASSWORD", "passwd"),
                database: env_or_str("DATABASE_NAME", "app"),
            },
            redis: RedisConfig {
                host: env_or_str("REDIS_HOST", "localhost"),
                port: env_or("REDIS_PORT", 6379)?,
            },
            auth: AuthConfig {
                ttl: env_or("AUTH_TOKEN_TTL", 86400)?,
                registration: RegistrationPolicy {
                    allowed_email_domain: env_or_str(
                        "AUTH_ALLOWED_EMAIL_DOMAIN",
                        "tecmilenio.mx",
                    ),
                    admin_override_email: env_or_str("AUTH_ADMIN_EMAIL", "admin@tec.mx"),
                },
            },
            email: EmailConfig {
                endpoint: env_or_str("EMAIL_API_ENDPOINT", ""),
                api_key: env_or_str("EMAIL_API_KEY", ""),
                from_address: env_or_str("EMAIL_FROM", "noreply@example.com"),
                facilities_address: env_or_str("EMAIL_FACILITIES_TO", ""),
            },
        })
    }
}

#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct AuthConfig {
    /// Access token lifetime in seconds.
    pub ttl: u64,
    pub registration: RegistrationPolicy,
}

/// Only institutional addresses may register, with a single administrative
/// override address outside the domain.
#[derive(Clone)]
pub struct RegistrationPolicy {
    pub allowed_email_domain: String,
    pub admin_override_email: String,
}

impl RegistrationPolicy {
    pub fn permits(&self, email: &str) -> bool {
        email == self.admin_override_email
            || email
                .rsplit_once('@')
                .is_some_and(|(_, domain)| domain == self.allowed_email_domain)
    }
}

/// HTTP email provider used for requirement notices. Transport details stay
/// behind this configuration; the core never sees them.
#[derive(Clone)]
pub struct EmailConfig {
    pub endpoint: String,
    pub api_key: String,
    pub from_address: String,
    pub facilities_address: String,
}

fn env_or_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(v) => Ok(v.parse::<T>()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_policy_accepts_institutional_domain() {
        let policy = RegistrationPolicy {
            allowed_email_domain: "tecmilenio.mx".into(),
            admin_override_email: "admin@tec.mx".into(),
        };
        assert!(policy.permits("alice@tecmilenio.mx"));
        assert!(policy.permits("admin@tec.mx"));
        assert!(!policy.permits("mallory@gmail.com"));
        assert!(!policy.permits("bob@tec.mx"));
        assert!(!policy.permits("tecmilenio.mx"));
    }
}
