use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Loads a config struct from an optional settings file overlaid with
/// `APP_`-prefixed environment variables (`APP_DATABASE__URL`, ...).
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";
    const FILE_STEM: &'static str = "todo_api";

    fn load_dotenv() {
        // .env next to Cargo.toml wins over one in the working directory
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();

        let settings = config_rs::Config::builder()
            .add_source(config_rs::File::with_name(Self::FILE_STEM).required(false))
            .add_source(
                config_rs::Environment::with_prefix(Self::PREFIX)
                    .prefix_separator("_")
                    .separator(Self::SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .context("failed to read config sources")?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
