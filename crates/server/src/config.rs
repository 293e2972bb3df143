// Copyright Alexandre D. Díaz
use std::time::Duration;

use config::{Config, ConfigError};
use recordstore::StoreConfig;
use sessiontoken::{TokenConfig, ValidityWindow};
use url::Url;

#[derive(Debug)]
pub struct ServerConfig {
    bind_address: String,
    port: u16,
    workers: usize,
    allowed_origins: Vec<Url>,
    db_path: String,
    db_pool_max_size: u32,
    db_pool_timeout: u64,
    schema_cache_ttl: u64,
    sniff_json_arrays: bool,
    jwt_secret: String,
    token_window: ValidityWindow,
}

impl ServerConfig {
    /// Reads `./server.{toml,yaml,json,...}` (optional) then `RECORDSTORE_*` variables.
    pub fn new() -> Result<ServerConfig, ConfigError> {
        let settings = Config::builder()
            .add_source(config::File::with_name("./server").required(false))
            .add_source(config::Environment::with_prefix("RECORDSTORE"))
            .build()?;
        ServerConfig::from_settings(&settings)
    }

    /// Fails when no `jwt_secret` is configured.
    pub fn from_settings(settings: &Config) -> Result<ServerConfig, ConfigError> {
        let bind_address = settings
            .get_string("bind_address")
            .unwrap_or("0.0.0.0".to_string());
        let port = settings.get_int("port").unwrap_or(8080) as u16;
        let workers = settings.get_int("workers").unwrap_or(2) as usize;
        let allowed_origins = settings
            .get_array("allowed_origins")
            .unwrap_or_else(|_| Vec::new())
            .iter()
            .filter_map(|x| match Url::parse(&x.to_string()) {
                Ok(url) => Some(url),
                Err(err) => {
                    log::warn!("ignoring allowed origin '{}': {}", x, err);
                    None
                }
            })
            .collect::<Vec<Url>>();
        let db_path = settings
            .get_string("db_path")
            .unwrap_or("data/data.db".to_string());
        let db_pool_max_size = settings.get_int("db_pool_max_size").unwrap_or(15) as u32;
        let db_pool_timeout = settings.get_int("db_pool_timeout").unwrap_or(30) as u64;
        let schema_cache_ttl = settings.get_int("schema_cache_ttl").unwrap_or(3600) as u64;
        let sniff_json_arrays = settings.get_bool("sniff_json_arrays").unwrap_or(true);
        let jwt_secret = settings.get_string("jwt_secret").unwrap_or_default();
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt_secret is empty, refusing to sign tokens".to_string(),
            ));
        }
        let token_window = settings
            .get_string("token_window")
            .ok()
            .and_then(|raw| ValidityWindow::parse(&raw))
            .unwrap_or(ValidityWindow::Short);
        Ok(ServerConfig {
            bind_address,
            port,
            workers,
            allowed_origins,
            db_path,
            db_pool_max_size,
            db_pool_timeout,
            schema_cache_ttl,
            sniff_json_arrays,
            jwt_secret,
            token_window,
        })
    }

    pub fn get_bind_address(&self) -> &String {
        &self.bind_address
    }

    pub fn get_port(&self) -> &u16 {
        &self.port
    }

    pub fn get_workers(&self) -> &usize {
        &self.workers
    }

    pub fn get_allowed_origins(&self) -> &Vec<Url> {
        &self.allowed_origins
    }

    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        if self.get_allowed_origins().is_empty() {
            return true;
        }
        let url = match Url::parse(origin) {
            Ok(url) => url,
            Err(_) => return false,
        };
        for origin_url in self.get_allowed_origins() {
            if origin_url.scheme() == url.scheme()
                && origin_url.domain() == url.domain()
                && origin_url.port() == url.port()
            {
                return true;
            }
        }
        false
    }

    pub fn get_token_window(&self) -> ValidityWindow {
        self.token_window
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.db_path)
            .with_pool_max_size(self.db_pool_max_size)
            .with_connection_timeout(Duration::from_secs(self.db_pool_timeout))
            .with_schema_cache_ttl(self.schema_cache_ttl)
            .with_sniff_json_arrays(self.sniff_json_arrays)
    }

    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            secret: self.jwt_secret.clone(),
            window: self.token_window,
        }
    }
}
