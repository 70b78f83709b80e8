//! Site, statistics and weight models exchanged with the sites backend
//!
//! The backend renders decimal columns as JSON strings (`"26.9124000"`) and
//! integer columns as numbers, so every numeric field goes through
//! [`decimal`] which accepts either form.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Site row joined with its latest analysis scores
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SiteWithScores {
    pub site_id: u64,
    pub site_name: String,
    #[serde(deserialize_with = "decimal")]
    pub latitude: f64,
    #[serde(deserialize_with = "decimal")]
    pub longitude: f64,
    #[serde(deserialize_with = "decimal")]
    pub area_sqm: f64,
    #[serde(deserialize_with = "decimal")]
    pub solar_irradiance_kwh: f64,
    #[serde(deserialize_with = "decimal")]
    pub grid_distance_km: f64,
    #[serde(deserialize_with = "decimal")]
    pub slope_degrees: f64,
    #[serde(deserialize_with = "decimal")]
    pub road_distance_km: f64,
    #[serde(deserialize_with = "decimal")]
    pub elevation_m: f64,
    pub land_type: String,
    pub region: String,
    #[serde(deserialize_with = "decimal")]
    pub solar_irradiance_score: f64,
    #[serde(deserialize_with = "decimal")]
    pub area_score: f64,
    #[serde(deserialize_with = "decimal")]
    pub grid_distance_score: f64,
    #[serde(deserialize_with = "decimal")]
    pub slope_score: f64,
    #[serde(deserialize_with = "decimal")]
    pub infrastructure_score: f64,
    #[serde(deserialize_with = "decimal")]
    pub total_suitability_score: f64,
    pub analysis_timestamp: Option<String>,
}

/// One stored analysis run for a site
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnalysisResult {
    pub result_id: u64,
    #[serde(deserialize_with = "decimal")]
    pub solar_irradiance_score: f64,
    #[serde(deserialize_with = "decimal")]
    pub area_score: f64,
    #[serde(deserialize_with = "decimal")]
    pub grid_distance_score: f64,
    #[serde(deserialize_with = "decimal")]
    pub slope_score: f64,
    #[serde(deserialize_with = "decimal")]
    pub infrastructure_score: f64,
    #[serde(deserialize_with = "decimal")]
    pub total_suitability_score: f64,
    pub analysis_timestamp: Option<String>,
    pub parameters_snapshot: Option<serde_json::Value>,
}

/// Raw site record with its analysis history
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Site {
    pub site_id: u64,
    pub site_name: String,
    #[serde(deserialize_with = "decimal")]
    pub latitude: f64,
    #[serde(deserialize_with = "decimal")]
    pub longitude: f64,
    #[serde(deserialize_with = "decimal")]
    pub area_sqm: f64,
    #[serde(deserialize_with = "decimal")]
    pub solar_irradiance_kwh: f64,
    #[serde(deserialize_with = "decimal")]
    pub grid_distance_km: f64,
    #[serde(deserialize_with = "decimal")]
    pub slope_degrees: f64,
    #[serde(deserialize_with = "decimal")]
    pub road_distance_km: f64,
    #[serde(deserialize_with = "decimal")]
    pub elevation_m: f64,
    pub land_type: String,
    pub region: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default)]
    pub analysis_history: Vec<AnalysisResult>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Kpi {
    pub total_sites: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FactorAverages {
    #[serde(deserialize_with = "decimal")]
    pub solar_irradiance: f64,
    #[serde(deserialize_with = "decimal")]
    pub land_area: f64,
    #[serde(deserialize_with = "decimal")]
    pub grid_proximity: f64,
    #[serde(deserialize_with = "decimal")]
    pub terrain_slope: f64,
    #[serde(deserialize_with = "decimal")]
    pub infrastructure: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Stats {
    #[serde(deserialize_with = "decimal")]
    pub avg_suitability_score: f64,
    #[serde(deserialize_with = "decimal")]
    pub total_land_area: f64,
    pub factor_averages: FactorAverages,
}

/// Per-site row of the dashboard scoring table
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SiteScoringSystem {
    pub site_id: u64,
    pub site_name: String,
    #[serde(deserialize_with = "decimal")]
    pub latitude: f64,
    #[serde(deserialize_with = "decimal")]
    pub longitude: f64,
    #[serde(deserialize_with = "decimal")]
    pub solar_irradiance: f64,
    #[serde(deserialize_with = "decimal")]
    pub available_land_area: f64,
    #[serde(deserialize_with = "decimal")]
    pub distance_from_grid: f64,
    #[serde(deserialize_with = "decimal")]
    pub slope_degrees: f64,
    #[serde(deserialize_with = "decimal")]
    pub terrain_elevation: f64,
    pub land_type: String,
    pub region: String,
    #[serde(deserialize_with = "decimal")]
    pub proximity_to_infra: f64,
    #[serde(deserialize_with = "decimal")]
    pub total_suitability_score: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct SiteData {
    #[serde(default)]
    pub site_scoring_system: Vec<SiteScoringSystem>,
}

/// Dashboard aggregates
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Statistics {
    pub kpi: Kpi,
    pub stats: Stats,
    #[serde(default)]
    pub site_data: SiteData,
}

/// Relative weight of each scoring factor; the five must sum to 1
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Weights {
    pub solar: f64,
    pub area: f64,
    pub grid: f64,
    pub slope: f64,
    pub infra: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            solar: 0.35,
            area: 0.25,
            grid: 0.20,
            slope: 0.15,
            infra: 0.05,
        }
    }
}

/// Tolerance used when checking that weights sum to 1
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Error type for weight validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightsError {
    #[error("Weight '{0}' must be between 0 and 1, got {1}")]
    OutOfRange(&'static str, f64),

    #[error("Weights must sum to 1.0, got {0}")]
    BadSum(f64),
}

impl Weights {
    pub fn total(&self) -> f64 {
        self.solar + self.area + self.grid + self.slope + self.infra
    }

    fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("solar", self.solar),
            ("area", self.area),
            ("grid", self.grid),
            ("slope", self.slope),
            ("infra", self.infra),
        ]
    }

    /// Check each weight is in [0, 1] and that they sum to 1
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, value) in self.entries() {
            if !(0.0..=1.0).contains(&value) {
                return Err(WeightsError::OutOfRange(name, value));
            }
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::BadSum(total));
        }

        Ok(())
    }
}

/// Body of the recalculation request
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct WeightRequest {
    pub weights: Weights,
}

/// Acknowledgement returned by upload and recalculation
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
    pub filename: Option<String>,
}

/// Count and mean suitability of a fetched page of sites
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct SiteSummary {
    pub total_sites: usize,
    pub avg_suitability_score: Option<f64>,
}

pub fn summarize_sites(sites: &[SiteWithScores]) -> SiteSummary {
    let total_sites = sites.len();
    let avg_suitability_score = if total_sites == 0 {
        None
    } else {
        let sum: f64 = sites.iter().map(|s| s.total_suitability_score).sum();
        Some(sum / total_sites as f64)
    };

    SiteSummary {
        total_sites,
        avg_suitability_score,
    }
}

/// Name of the CSV written by an export on `date`
pub fn export_filename(date: NaiveDate) -> String {
    format!("solar-sites-{}.csv", date.format("%Y-%m-%d"))
}

/// Deserialize a number sent either as a JSON number or a decimal string
pub fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid decimal: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn site_json(id: u64, total: &str) -> serde_json::Value {
        json!({
            "site_id": id,
            "site_name": format!("Site {id}"),
            "latitude": "26.9124000",
            "longitude": "75.7873000",
            "area_sqm": 120000,
            "solar_irradiance_kwh": "5.80",
            "grid_distance_km": "2.40",
            "slope_degrees": "3.10",
            "road_distance_km": "0.90",
            "elevation_m": 431,
            "land_type": "Barren",
            "region": "Rajasthan",
            "solar_irradiance_score": "92.00",
            "area_score": "80.00",
            "grid_distance_score": "76.00",
            "slope_score": "88.50",
            "infrastructure_score": "95.00",
            "total_suitability_score": total,
            "analysis_timestamp": "2025-01-15T10:30:00Z"
        })
    }

    #[test]
    fn test_site_with_scores_accepts_decimal_strings() {
        let site: SiteWithScores = serde_json::from_value(site_json(7, "86.40")).unwrap();
        assert_eq!(site.site_id, 7);
        assert_eq!(site.latitude, 26.9124);
        assert_eq!(site.area_sqm, 120000.0);
        assert_eq!(site.total_suitability_score, 86.4);
    }

    #[test]
    fn test_decimal_rejects_garbage() {
        let mut value = site_json(1, "86.40");
        value["latitude"] = json!("north");
        let result: Result<SiteWithScores, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_statistics_deserialize() {
        let value = json!({
            "kpi": { "total_sites": 2 },
            "stats": {
                "avg_suitability_score": 71.25,
                "total_land_area": 250000,
                "factor_averages": {
                    "solar_irradiance": 90.5,
                    "land_area": 60.0,
                    "grid_proximity": 70.0,
                    "terrain_slope": 80.0,
                    "infrastructure": 55.5
                }
            },
            "site_data": {
                "site_scoring_system": [{
                    "site_id": 1,
                    "site_name": "Bhadla",
                    "latitude": "27.5300000",
                    "longitude": "71.9100000",
                    "solar_irradiance": "6.10",
                    "available_land_area": 130000,
                    "distance_from_grid": "1.20",
                    "slope_degrees": "1.00",
                    "terrain_elevation": 220,
                    "land_type": "Desert",
                    "region": "Rajasthan",
                    "proximity_to_infra": "0.50",
                    "total_suitability_score": "91.00"
                }]
            }
        });

        let stats: Statistics = serde_json::from_value(value).unwrap();
        assert_eq!(stats.kpi.total_sites, 2);
        assert_eq!(stats.stats.factor_averages.infrastructure, 55.5);
        assert_eq!(stats.site_data.site_scoring_system.len(), 1);
        assert_eq!(stats.site_data.site_scoring_system[0].available_land_area, 130000.0);
    }

    #[test]
    fn test_site_detail_without_history() {
        let mut value = site_json(3, "50.00");
        let obj = value.as_object_mut().unwrap();
        for key in [
            "solar_irradiance_score",
            "area_score",
            "grid_distance_score",
            "slope_score",
            "infrastructure_score",
            "total_suitability_score",
            "analysis_timestamp",
        ] {
            obj.remove(key);
        }

        let site: Site = serde_json::from_value(value).unwrap();
        assert!(site.analysis_history.is_empty());
        assert_eq!(site.created_at, None);
    }

    #[test]
    fn test_default_weights_are_valid() {
        assert!(Weights::default().validate().is_ok());
    }

    #[test]
    fn test_weights_validation() {
        let weights = Weights {
            solar: 0.5,
            area: 0.5,
            grid: 0.5,
            slope: 0.0,
            infra: 0.0,
        };
        assert!(matches!(weights.validate(), Err(WeightsError::BadSum(_))));

        let weights = Weights {
            solar: 1.2,
            area: -0.2,
            grid: 0.0,
            slope: 0.0,
            infra: 0.0,
        };
        assert_eq!(
            weights.validate(),
            Err(WeightsError::OutOfRange("solar", 1.2))
        );
    }

    #[test]
    fn test_weight_request_shape() {
        let body = serde_json::to_value(WeightRequest {
            weights: Weights::default(),
        })
        .unwrap();
        assert_eq!(body["weights"]["solar"], json!(0.35));
        assert_eq!(body["weights"]["infra"], json!(0.05));
    }

    #[test]
    fn test_summarize_sites() {
        let sites: Vec<SiteWithScores> = vec![
            serde_json::from_value(site_json(1, "80.00")).unwrap(),
            serde_json::from_value(site_json(2, "60.00")).unwrap(),
        ];
        let summary = summarize_sites(&sites);
        assert_eq!(summary.total_sites, 2);
        assert_eq!(summary.avg_suitability_score, Some(70.0));

        let empty = summarize_sites(&[]);
        assert_eq!(empty.avg_suitability_score, None);
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_filename(date), "solar-sites-2025-03-07.csv");
    }

    #[test]
    fn test_message_response_without_filename() {
        let ack: MessageResponse =
            serde_json::from_value(json!({ "message": "Weights updated and scores recalculated" }))
                .unwrap();
        assert_eq!(ack.filename, None);
    }
}
