use colored::Colorize;

use crate::prelude::{println, *};
use solarsite_core::sites::Weights;

#[derive(Debug, clap::Args, Clone)]
pub struct AnalyzeOptions {
    /// Solar irradiance weight
    #[arg(long, default_value = "0.35")]
    pub solar: f64,

    /// Available area weight
    #[arg(long, default_value = "0.25")]
    pub area: f64,

    /// Grid distance weight
    #[arg(long, default_value = "0.20")]
    pub grid: f64,

    /// Terrain slope weight
    #[arg(long, default_value = "0.15")]
    pub slope: f64,

    /// Infrastructure (road distance) weight
    #[arg(long, default_value = "0.05")]
    pub infra: f64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AnalyzeOptions {
    pub fn weights(&self) -> Weights {
        Weights {
            solar: self.solar,
            area: self.area,
            grid: self.grid,
            slope: self.slope,
            infra: self.infra,
        }
    }
}

/// Recalculate every site's suitability score with new weights
pub async fn run(options: AnalyzeOptions, global: crate::Global) -> Result<()> {
    let weights = options.weights();
    weights.validate().map_err(Error::from)?;

    if global.verbose {
        println!("Recalculating with weights: {:?}", weights);
    }

    let mut store = global.store()?;
    let ack = store.recalculate_weights(weights).await?;

    if options.json {
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, clap::Parser)]
    struct Harness {
        #[clap(flatten)]
        options: AnalyzeOptions,
    }

    #[test]
    fn test_default_flags_match_default_weights() {
        let harness = Harness::parse_from(["analyze"]);
        assert_eq!(harness.options.weights(), Weights::default());
    }

    #[test]
    fn test_custom_flags() {
        let harness = Harness::parse_from([
            "analyze", "--solar", "0.4", "--area", "0.2", "--grid", "0.2", "--slope", "0.1",
            "--infra", "0.1",
        ]);
        let weights = harness.options.weights();
        assert_eq!(weights.solar, 0.4);
        assert!(weights.validate().is_ok());
    }
}
