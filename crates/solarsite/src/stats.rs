use colored::Colorize;
use prettytable::row;

use crate::prelude::{println, *};
use crate::sites::FilterArgs;
use solarsite_core::sites::Statistics;

#[derive(Debug, clap::Args, Clone)]
pub struct StatsOptions {
    #[clap(flatten)]
    pub filters: FilterArgs,

    /// Number of top sites to show from the scoring table
    #[arg(short, long, default_value = "10")]
    pub top: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Dashboard aggregates for the matching sites
pub async fn run(options: StatsOptions, global: crate::Global) -> Result<()> {
    let mut store = global.store()?;
    options.filters.apply(&mut store)?;

    let query = store.query();
    if global.verbose {
        println!("Fetching statistics for query: {:?}", query);
    }

    let statistics = store.api().fetch_statistics(&query).await?;

    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&statistics)
                .map_err(|e| eyre!("JSON serialization failed: {}", e))?
        );
    } else {
        println!("{}", format_statistics_text(&statistics, options.top));
    }

    Ok(())
}

fn format_statistics_text(statistics: &Statistics, top: usize) -> String {
    let mut result = String::new();
    let stats = &statistics.stats;
    let factors = &stats.factor_averages;

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!("{}\n", "SITE STATISTICS".bright_cyan().bold()));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    result.push_str(&format!(
        "\n{}: {} | {}: {} | {}: {}\n",
        "Total sites".green(),
        statistics.kpi.total_sites.to_string().bright_white(),
        "Average suitability".green(),
        format!("{:.2}", stats.avg_suitability_score).bright_yellow(),
        "Total land area (m²)".green(),
        format!("{:.2}", stats.total_land_area).bright_white()
    ));

    result.push_str(&format!("\n{}\n", "FACTOR AVERAGES".bright_yellow().bold()));
    let mut table = new_table();
    table.add_row(row!["Solar irradiance", format!("{:.2}", factors.solar_irradiance)]);
    table.add_row(row!["Land area", format!("{:.2}", factors.land_area)]);
    table.add_row(row!["Grid proximity", format!("{:.2}", factors.grid_proximity)]);
    table.add_row(row!["Terrain slope", format!("{:.2}", factors.terrain_slope)]);
    table.add_row(row!["Infrastructure", format!("{:.2}", factors.infrastructure)]);
    result.push_str(&table.to_string());

    let rows = &statistics.site_data.site_scoring_system;
    if rows.is_empty() || top == 0 {
        return result;
    }

    result.push_str(&format!(
        "\n{}\n",
        format!("TOP {} SITES", top.min(rows.len()))
            .bright_yellow()
            .bold()
    ));
    let mut sites = new_table();
    sites.add_row(row!["ID", "Name", "Region", "Irradiance", "Grid (km)", "Score"]);
    for site in rows.iter().take(top) {
        sites.add_row(row![
            site.site_id,
            site.site_name,
            site.region,
            format!("{:.2}", site.solar_irradiance),
            format!("{:.2}", site.distance_from_grid),
            format!("{:.2}", site.total_suitability_score)
        ]);
    }
    result.push_str(&sites.to_string());

    result
}
