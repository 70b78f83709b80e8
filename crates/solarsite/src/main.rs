use crate::prelude::*;
use clap::Parser;

mod analyze;
mod api;
mod error;
mod file;
mod prelude;
mod sites;
mod stats;
mod store;

#[cfg(test)]
mod test_support;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Browse, filter and rescore solar site suitability data"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Sites backend base URL
    #[clap(long, env = "SOLARSITE_API_URL", global = true)]
    api_url: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "SOLARSITE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    /// Build a session store against the configured backend
    pub fn store(&self) -> Result<store::SiteStore> {
        let config = api::ApiConfig::from_env().with_overrides(self.api_url.clone());
        let api = api::ApiClient::new(&config)?;
        Ok(store::SiteStore::new(api))
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Site list, detail, upload and export
    Sites(crate::sites::App),

    /// Dashboard statistics for the matching sites
    Stats(crate::stats::StatsOptions),

    /// Recalculate suitability scores with new factor weights
    Analyze(crate::analyze::AnalyzeOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Sites(sub_app) => crate::sites::run(sub_app, app.global).await,
        SubCommands::Stats(options) => crate::stats::run(options, app.global).await,
        SubCommands::Analyze(options) => crate::analyze::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
