//! Client config loader.
//!
//! The only external input is the target URL, read from one environment
//! variable per profile; everything else is fixed by the profile.

pub mod schema;

use latbench_core::error::{LatBenchError, Result};

pub use schema::{ClientConfig, ClientProfile};

pub fn load_from_env(profile: ClientProfile) -> Result<ClientConfig> {
    load_with(profile, |key| std::env::var(key).ok())
}

/// Same as [`load_from_env`] with an injectable lookup.
pub fn load_with<F>(profile: ClientProfile, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = profile.env_var();
    let url = lookup(var)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| LatBenchError::MissingEnv(var.to_string()))?;

    let cfg = ClientConfig::for_profile(profile, url);
    cfg.validate()?;
    Ok(cfg)
}
