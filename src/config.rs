use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use powerscan_models::{Config, PowerScanError};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "POWERSCAN_";

#[derive(Debug, Clone, Parser)]
#[command(name = "powerscan-server")]
#[command(about = "FLIR thermal extraction and inspection report API")]
pub struct ServerArgs {
    /// TOML configuration file; missing files are ignored
    #[arg(long, default_value = "configs/default.toml")]
    pub config: PathBuf,

    /// Overrides server.bind
    #[arg(long)]
    pub bind: Option<String>,

    /// Overrides server.port
    #[arg(long)]
    pub port: Option<u16>,
}

/// Defaults, then the TOML file, then `POWERSCAN_*` variables
/// (`POWERSCAN_SERVER__PORT` sets `server.port`).
pub fn figment(path: &Path) -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

pub fn load_config(args: &ServerArgs) -> Result<Config, PowerScanError> {
    let mut config: Config = figment(&args.config)
        .extract()
        .map_err(|e| PowerScanError::ConfigError { reason: e.to_string() })?;

    if let Some(bind) = &args.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    Ok(config)
}
