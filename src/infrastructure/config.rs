use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub profile: String,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup (environment, `.env`, tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = lookup("PROFILE").unwrap_or_else(|| "default".to_string());

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            if profile == "default" {
                "sqlite://lending_catalog.db?mode=rwc".to_string()
            } else {
                format!("sqlite://lending_catalog_{}.db?mode=rwc", profile)
            }
        });

        Self {
            database_url,
            seed_demo: lookup("SEED_DEMO")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(false),
            profile,
        }
    }

    /// Override the profile chosen by the environment (e.g. `--profile` flag)
    pub fn with_profile(profile: &str) -> Self {
        Self::from_lookup(|key| {
            if key == "PROFILE" {
                Some(profile.to_string())
            } else {
                env::var(key).ok()
            }
        })
    }
}
