use std::path::PathBuf;

use colored::Colorize;
use prettytable::row;

use crate::prelude::{println, *};
use crate::store::{ExportOutcome, SiteStore};
use solarsite_core::filters::{parse_filter_expr, FilterUpdate, SearchField};
use solarsite_core::panels::ActivePanel;
use solarsite_core::scoring::SuitabilityTier;
use solarsite_core::sites::{summarize_sites, Site, SiteWithScores};

#[derive(Debug, clap::Parser)]
#[command(name = "sites")]
#[command(about = "List, inspect, upload and export solar sites")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List sites with their suitability scores
    #[clap(name = "list")]
    List(ListOptions),

    /// Show a single site and its analysis history
    #[clap(name = "get")]
    Get {
        /// Site ID
        site_id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a CSV of site records
    #[clap(name = "upload")]
    Upload {
        /// CSV file to upload
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the matching sites as CSV
    #[clap(name = "export")]
    Export {
        #[clap(flatten)]
        filters: FilterArgs,

        /// Directory to write the CSV into
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,
    },
}

/// Filter, search and pagination flags shared by list, export and stats
#[derive(Debug, clap::Args, Clone, Default)]
pub struct FilterArgs {
    /// Site name prefix (case-insensitive)
    #[arg(long)]
    pub site_name: Option<String>,

    /// Region (case-insensitive exact match)
    #[arg(long)]
    pub region: Option<String>,

    /// Land type (exact match)
    #[arg(long)]
    pub land_type: Option<String>,

    /// Maximum number of sites to return
    #[arg(short, long, env = "SOLARSITE_LIMIT")]
    pub limit: Option<u64>,

    /// Number of sites to skip
    #[arg(short, long)]
    pub offset: Option<u64>,

    /// Numeric filter, repeatable: <column>=<value>, <column>=<min>..<max>, <column>=<min>.. or <column>=..<max>
    #[arg(short, long = "filter", value_name = "EXPR")]
    pub filters: Vec<String>,
}

impl FilterArgs {
    /// Translate the flags into filter updates, each tagged with the panel that owns it
    pub fn updates(&self) -> Result<Vec<(ActivePanel, FilterUpdate)>> {
        let mut updates = Vec::new();

        let search = [
            (SearchField::SiteName, &self.site_name),
            (SearchField::Region, &self.region),
            (SearchField::LandType, &self.land_type),
        ];
        for (field, value) in search {
            if let Some(value) = value {
                updates.push((
                    ActivePanel::Search,
                    FilterUpdate::Search(field, Some(value.clone())),
                ));
            }
        }

        if let Some(limit) = self.limit {
            updates.push((ActivePanel::System, FilterUpdate::Limit(Some(limit))));
        }
        if let Some(offset) = self.offset {
            updates.push((ActivePanel::System, FilterUpdate::Offset(Some(offset))));
        }

        for expr in &self.filters {
            let update = parse_filter_expr(expr).map_err(Error::from)?;
            updates.push((ActivePanel::Analytical, FilterUpdate::RangeExact(update)));
        }

        Ok(updates)
    }

    /// Open the owning panels and apply every update to the store
    pub fn apply(&self, store: &mut SiteStore) -> Result<()> {
        for (panel, update) in self.updates()? {
            store.activate_panel(panel);
            store.set_filter(update);
        }
        Ok(())
    }
}

#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    #[clap(flatten)]
    pub filters: FilterArgs,

    /// Print the serialized query instead of fetching
    #[arg(long)]
    pub query: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let mut store = global.store()?;

    if global.verbose {
        println!("Sites API Base: {}", store.api().base_url());
        println!();
    }

    match app.command {
        Commands::List(options) => list(&mut store, options).await,
        Commands::Get { site_id, json } => get(&store, site_id, json).await,
        Commands::Upload { file, json } => upload(&mut store, file, json).await,
        Commands::Export {
            filters,
            output_dir,
        } => export(&mut store, filters, output_dir, global.verbose).await,
    }
}

async fn list(store: &mut SiteStore, options: ListOptions) -> Result<()> {
    options.filters.apply(store)?;

    if options.query {
        println!("{}", store.query());
        return Ok(());
    }

    store.fetch_sites().await;
    if let Some(error) = &store.error {
        return Err(eyre!("{}", error));
    }

    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&store.sites)
                .map_err(|e| eyre!("JSON serialization failed: {}", e))?
        );
    } else {
        println!("{}", format_sites_text(&store.sites));
    }

    Ok(())
}

async fn get(store: &SiteStore, site_id: u64, json: bool) -> Result<()> {
    let site = store.api().get_site(site_id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&site)
                .map_err(|e| eyre!("JSON serialization failed: {}", e))?
        );
    } else {
        println!("{}", format_site_text(&site));
    }

    Ok(())
}

async fn upload(store: &mut SiteStore, file: PathBuf, json: bool) -> Result<()> {
    let ack = store.upload_site_file(&file).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&ack)
                .map_err(|e| eyre!("JSON serialization failed: {}", e))?
        );
    } else {
        println!("{}", ack.message.green());
    }

    Ok(())
}

async fn export(
    store: &mut SiteStore,
    filters: FilterArgs,
    output_dir: PathBuf,
    verbose: bool,
) -> Result<()> {
    filters.apply(store)?;

    if verbose {
        println!("Export query: {}", store.query());
    }

    match store.export_sites(&output_dir).await {
        ExportOutcome::Written(path) => {
            println!("{} {}", "Exported to".green(), path.display());
            Ok(())
        }
        ExportOutcome::AlreadyRunning => {
            println!("{}", "An export is already running".yellow());
            Ok(())
        }
        ExportOutcome::Failed(message) => Err(eyre!("Export failed: {}", message)),
    }
}

/// Render a tier label in its map colour
fn tier_cell(score: f64) -> String {
    let tier = SuitabilityTier::from_score(score);
    let (r, g, b) = tier.rgb();
    tier.label().truecolor(r, g, b).bold().to_string()
}

fn format_sites_text(sites: &[SiteWithScores]) -> String {
    if sites.is_empty() {
        return "No sites match the current filters.".yellow().to_string();
    }

    let mut table = new_table();
    table.add_row(row![
        "ID", "Name", "Region", "Land", "Lat", "Lon", "Score", "Tier"
    ]);

    for site in sites {
        table.add_row(row![
            site.site_id,
            site.site_name,
            site.region,
            site.land_type,
            format!("{:.4}", site.latitude),
            format!("{:.4}", site.longitude),
            format!("{:.2}", site.total_suitability_score),
            tier_cell(site.total_suitability_score)
        ]);
    }

    let summary = summarize_sites(sites);
    let average = summary
        .avg_suitability_score
        .map(|avg| format!("{avg:.2}"))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{}\n{} {} | {} {}",
        table,
        "Sites:".green(),
        summary.total_sites.to_string().bright_cyan().bold(),
        "Average score:".green(),
        average.bright_yellow()
    )
}

fn format_site_text(site: &Site) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!("SITE {} - {}", site.site_id, site.site_name)
            .bright_cyan()
            .bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    let mut table = new_table();
    table.add_row(row!["Region", site.region]);
    table.add_row(row!["Land type", site.land_type]);
    table.add_row(row!["Latitude", format!("{:.7}", site.latitude)]);
    table.add_row(row!["Longitude", format!("{:.7}", site.longitude)]);
    table.add_row(row!["Area (m²)", site.area_sqm]);
    table.add_row(row!["Irradiance (kWh/m²/day)", site.solar_irradiance_kwh]);
    table.add_row(row!["Grid distance (km)", site.grid_distance_km]);
    table.add_row(row!["Slope (°)", site.slope_degrees]);
    table.add_row(row!["Road distance (km)", site.road_distance_km]);
    table.add_row(row!["Elevation (m)", site.elevation_m]);
    result.push_str(&table.to_string());

    if site.analysis_history.is_empty() {
        result.push_str(&format!("\n{}\n", "No analysis results yet.".yellow()));
        return result;
    }

    result.push_str(&format!("\n{}\n", "ANALYSIS HISTORY".bright_yellow().bold()));
    let mut history = new_table();
    history.add_row(row![
        "Result", "Solar", "Area", "Grid", "Slope", "Infra", "Total", "Tier", "When"
    ]);
    for analysis in &site.analysis_history {
        history.add_row(row![
            analysis.result_id,
            format!("{:.2}", analysis.solar_irradiance_score),
            format!("{:.2}", analysis.area_score),
            format!("{:.2}", analysis.grid_distance_score),
            format!("{:.2}", analysis.slope_score),
            format!("{:.2}", analysis.infrastructure_score),
            format!("{:.2}", analysis.total_suitability_score),
            tier_cell(analysis.total_suitability_score),
            analysis.analysis_timestamp.as_deref().unwrap_or("unknown")
        ]);
    }
    result.push_str(&history.to_string());

    result
}
