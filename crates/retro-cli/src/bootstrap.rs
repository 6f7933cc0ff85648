use retro_config::RetroConfig;

/// Load layered configuration, reading `.env` from the working directory first.
pub fn load_config() -> anyhow::Result<RetroConfig> {
    RetroConfig::load_with_dotenv().map_err(anyhow::Error::from)
}
