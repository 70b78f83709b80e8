//! In-process sites backend for exercising the HTTP layer in tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use solarsite_core::sites::{WeightRequest, Weights};

use crate::api::ApiConfig;

/// How long the export endpoint holds a request before answering
pub const EXPORT_DELAY: Duration = Duration::from_millis(150);

pub const EXPORT_CSV: &str = "site_id,site_name,total_suitability_score\n1,Bhadla,91.00\n";

#[derive(Default)]
pub struct MockState {
    last_query: Mutex<Option<String>>,
    last_upload: Mutex<Option<String>>,
    last_weights: Mutex<Option<Weights>>,
    export_requests: AtomicUsize,
}

pub struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    pub fn config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
        }
    }

    pub fn last_query(&self) -> Option<String> {
        self.state.last_query.lock().unwrap().clone()
    }

    pub fn last_upload(&self) -> Option<String> {
        self.state.last_upload.lock().unwrap().clone()
    }

    pub fn last_weights(&self) -> Option<Weights> {
        *self.state.last_weights.lock().unwrap()
    }

    pub fn export_requests(&self) -> usize {
        self.state.export_requests.load(Ordering::SeqCst)
    }
}

/// Start the mock backend on an ephemeral port
pub async fn mock_backend() -> MockBackend {
    let state = Arc::new(MockState::default());

    let router = Router::new()
        .route("/api/sites/", get(list_sites).post(upload_sites))
        .route("/api/sites/statistics/", get(statistics))
        .route("/api/sites/export/", get(export_sites))
        .route("/api/sites/analyze/", axum::routing::post(recalculate))
        .route("/api/sites/{id}/", get(site_detail))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://{addr}/api"),
        state,
    }
}

pub fn site_json(id: u64, total: &str) -> Value {
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
        "region": "North",
        "solar_irradiance_score": "92.00",
        "area_score": "80.00",
        "grid_distance_score": "76.00",
        "slope_score": "88.50",
        "infrastructure_score": "95.00",
        "total_suitability_score": total,
        "analysis_timestamp": "2025-01-15T10:30:00Z"
    })
}

async fn list_sites(State(state): State<Arc<MockState>>, RawQuery(query): RawQuery) -> Json<Value> {
    *state.last_query.lock().unwrap() = query;
    Json(json!([site_json(1, "91.00"), site_json(2, "64.50")]))
}

async fn upload_sites(State(state): State<Arc<MockState>>, body: Bytes) -> impl IntoResponse {
    let body = String::from_utf8_lossy(&body).to_string();
    let filename = body
        .split("filename=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap_or_default()
        .to_string();
    *state.last_upload.lock().unwrap() = Some(body);

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Successfully processed 1 sites.",
            "filename": filename,
        })),
    )
}

async fn site_detail(Path(id): Path<u64>) -> impl IntoResponse {
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." })));
    }

    let mut site = site_json(id, "70.00");
    if let Some(obj) = site.as_object_mut() {
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
        obj.insert("created_at".to_string(), json!("2025-01-01T00:00:00Z"));
        obj.insert("updated_at".to_string(), json!("2025-01-02T00:00:00Z"));
        obj.insert(
            "analysis_history".to_string(),
            json!([{
                "result_id": 11,
                "solar_irradiance_score": "92.00",
                "area_score": "80.00",
                "grid_distance_score": "76.00",
                "slope_score": "88.50",
                "infrastructure_score": "95.00",
                "total_suitability_score": "70.00",
                "analysis_timestamp": "2025-01-15T10:30:00Z",
                "parameters_snapshot": { "solar": 0.35 }
            }]),
        );
    }

    (StatusCode::OK, Json(site))
}

async fn recalculate(
    State(state): State<Arc<MockState>>,
    Json(payload): Json<WeightRequest>,
) -> Json<Value> {
    *state.last_weights.lock().unwrap() = Some(payload.weights);
    Json(json!({ "message": "Weights updated and scores recalculated" }))
}

async fn export_sites(State(state): State<Arc<MockState>>) -> &'static str {
    state.export_requests.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(EXPORT_DELAY).await;
    EXPORT_CSV
}

async fn statistics(State(state): State<Arc<MockState>>, RawQuery(query): RawQuery) -> Json<Value> {
    *state.last_query.lock().unwrap() = query;
    Json(json!({
        "kpi": { "total_sites": 2 },
        "stats": {
            "avg_suitability_score": 77.75,
            "total_land_area": 240000,
            "factor_averages": {
                "solar_irradiance": 92.0,
                "land_area": 80.0,
                "grid_proximity": 76.0,
                "terrain_slope": 88.5,
                "infrastructure": 95.0
            }
        },
        "site_data": { "site_scoring_system": [] }
    }))
}
