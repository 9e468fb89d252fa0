use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub enrich: EnrichConfig,
    pub openlibrary: OpenLibraryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub redis_url: String,
    pub lookup_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Base URL of the author web service, e.g. http://author:8080
    pub author_base_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenLibraryConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("BIND_ADDRESS") {
            self.server.bind = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs =
                v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Session store overrides
        if let Ok(v) = env::var("REDIS_URL") {
            self.session.redis_url = v;
        }
        if let Ok(v) = env::var("SESSION_LOOKUP_TIMEOUT_MS") {
            self.session.lookup_timeout_ms = v.parse().unwrap_or(self.session.lookup_timeout_ms);
        }

        // Enrichment overrides
        if let Ok(v) = env::var("AUTHOR_SERVICE_URL") {
            self.enrich.author_base_url = v;
        }
        if let Ok(v) = env::var("ENRICH_TIMEOUT_MS") {
            self.enrich.timeout_ms = v.parse().unwrap_or(self.enrich.timeout_ms);
        }

        // OpenLibrary overrides
        if let Ok(v) = env::var("OPENLIBRARY_URL") {
            self.openlibrary.base_url = v;
        }
        if let Ok(v) = env::var("OPENLIBRARY_TIMEOUT_MS") {
            self.openlibrary.timeout_ms = v.parse().unwrap_or(self.openlibrary.timeout_ms);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/mybooks".to_string(),
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            session: SessionConfig {
                redis_url: "redis://127.0.0.1:6379".to_string(),
                lookup_timeout_ms: 2000,
            },
            enrich: EnrichConfig {
                author_base_url: "http://localhost:8080".to_string(),
                timeout_ms: 3000,
            },
            openlibrary: OpenLibraryConfig {
                base_url: "https://openlibrary.org".to_string(),
                timeout_ms: 10_000,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/mybooks".to_string(),
                max_connections: 20,
                connect_timeout_secs: 10,
            },
            session: SessionConfig {
                redis_url: "redis://redis:6379".to_string(),
                lookup_timeout_ms: 1000,
            },
            enrich: EnrichConfig {
                author_base_url: "http://author:8080".to_string(),
                timeout_ms: 2000,
            },
            openlibrary: OpenLibraryConfig {
                base_url: "https://openlibrary.org".to_string(),
                timeout_ms: 10_000,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/mybooks".to_string(),
                max_connections: 50,
                connect_timeout_secs: 5,
            },
            session: SessionConfig {
                redis_url: "redis://redis:6379".to_string(),
                lookup_timeout_ms: 500,
            },
            enrich: EnrichConfig {
                author_base_url: "http://author:8080".to_string(),
                timeout_ms: 1500,
            },
            openlibrary: OpenLibraryConfig {
                base_url: "https://openlibrary.org".to_string(),
                timeout_ms: 5000,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
