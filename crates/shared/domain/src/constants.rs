//! Names shared between the HTTP layer, `OpenAPI` document and cache.

/// `OpenAPI` tag for the country endpoints.
pub const COUNTRIES_TAG: &str = "Countries";

/// `OpenAPI` tag for operational endpoints (`/health`).
pub const SYSTEM_TAG: &str = "System";

/// Cache key holding the serialized result of "list all countries".
pub const COUNTRIES_CACHE_KEY: &str = "countries:all";

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "ATLAS_CONFIG";

/// Prefix of configuration environment overrides (`ATLAS__SERVER__PORT`).
pub const CONFIG_ENV_PREFIX: &str = "ATLAS";

/// Conventional hosting variable that overrides `server.port`.
pub const PORT_ENV: &str = "PORT";
