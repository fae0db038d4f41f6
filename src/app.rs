use crate::api::{ApiClient, SigningKeys};
use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::state::StateStore;

pub struct AppContext {
    pub config: Config,
    pub store: StateStore,
    pub robot: bool,
    pub dry_run: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Config::from_env()?;
        if let Some(dir) = &cli.state_dir {
            config.state_dir = dir.clone();
        }
        let store = StateStore::new(&config.state_dir);
        Ok(Self {
            config,
            store,
            robot: cli.robot,
            dry_run: cli.dry_run,
        })
    }

    /// Client signed with the full user context; requires all four keys.
    pub fn api_client(&self) -> Result<ApiClient> {
        let consumer = self.config.consumer()?;
        let access = self.config.access()?;
        let keys = SigningKeys {
            consumer_key: consumer.key.clone(),
            consumer_secret: consumer.secret.clone(),
            token: Some(access.key.clone()),
            token_secret: Some(access.secret.clone()),
        };
        ApiClient::new(&self.config.api_base_url, keys, self.config.timeout_secs)
    }

    /// Client signed with the consumer pair only, for the authorize dance.
    pub fn consumer_client(&self) -> Result<ApiClient> {
        let consumer = self.config.consumer()?;
        let keys = SigningKeys {
            consumer_key: consumer.key.clone(),
            consumer_secret: consumer.secret.clone(),
            token: None,
            token_secret: None,
        };
        ApiClient::new(&self.config.api_base_url, keys, self.config.timeout_secs)
    }
}
