use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow::anyhow!("unknown post store: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub store: StoreBackend,
    pub touch_updated_at: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = var("PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let mongodb_uri =
            var("MONGODB_URI").unwrap_or_else(|| "mongodb://localhost:27017".into());
        let database_name = var("MONGODB_DATABASE").unwrap_or_else(|| "blog_app2".into());
        let store = var("POSTS_STORE")
            .map(|s| s.parse::<StoreBackend>())
            .transpose()?
            .unwrap_or(StoreBackend::Mongo);
        let touch_updated_at = match var("POSTS_TOUCH_UPDATED_AT") {
            Some(v) => parse_flag(&v)
                .ok_or_else(|| anyhow::anyhow!("invalid POSTS_TOUCH_UPDATED_AT: {}", v))?,
            None => false,
        };

        Ok(Self {
            host,
            port,
            mongodb_uri,
            database_name,
            store,
            touch_updated_at,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
