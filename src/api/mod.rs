// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vitalbarn-rs

//! HTTP API - translates requests into engine and store calls

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::config::Config;
use crate::db::ReadingStore;
use crate::model::ProximityEvent;
use crate::simulator::SimulatorEngine;

/// Default bound on history queries
const HISTORY_LIMIT: usize = 50;

/// Inbound proximity payload; the timestamp is assigned on receipt
#[derive(Debug, Deserialize)]
struct ProximityPayload {
    sensor_id: String,
    distancia_cm: f64,
}

/// Build the full route tree
pub fn routes(
    engine: Arc<SimulatorEngine>,
    store: Arc<dyn ReadingStore>,
    config: Arc<Config>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let latest = warp::path!("api" / "biometrics" / "latest")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(latest_handler);

    let history = warp::path!("api" / "biometrics" / "history")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(history_handler);

    let steps_total = warp::path!("api" / "steps" / "total")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(steps_total_handler);

    let heart_rate_zone = warp::path!("api" / "heart_rate" / "zone")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and(with_config(config))
        .and_then(heart_rate_zone_handler);

    let status = warp::path!("api" / "simulator" / "status")
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .map(|engine: Arc<SimulatorEngine>| warp::reply::json(&engine.status()));

    let reset_steps = warp::path!("api" / "simulator" / "reset-steps")
        .and(warp::post())
        .and(with_engine(engine))
        .map(|engine: Arc<SimulatorEngine>| {
            engine.reset_steps();
            warp::reply::json(&json!({
                "message": "Step counter reset",
                "total_steps": 0,
            }))
        });

    let proximity = warp::path!("api" / "sensor" / "proximidad")
        .and(warp::post())
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with_store(store))
        .and_then(proximity_handler);

    latest
        .or(history)
        .or(steps_total)
        .or(heart_rate_zone)
        .or(status)
        .or(reset_steps)
        .or(proximity)
        .recover(handle_rejection)
}

fn with_store(
    store: Arc<dyn ReadingStore>,
) -> impl Filter<Extract = (Arc<dyn ReadingStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn with_engine(
    engine: Arc<SimulatorEngine>,
) -> impl Filter<Extract = (Arc<SimulatorEngine>,), Error = Infallible> + Clone {
    warp::any().map(move || engine.clone())
}

fn with_config(
    config: Arc<Config>,
) -> impl Filter<Extract = (Arc<Config>,), Error = Infallible> + Clone {
    warp::any().map(move || config.clone())
}

fn json_reply<T: Serialize>(status: StatusCode, body: &T) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(body), status)
}

fn no_data() -> warp::reply::WithStatus<warp::reply::Json> {
    json_reply(StatusCode::NOT_FOUND, &json!({ "message": "No data available" }))
}

fn store_failure(err: impl std::fmt::Display) -> warp::reply::WithStatus<warp::reply::Json> {
    json_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        &json!({ "error": err.to_string() }),
    )
}

async fn latest_handler(store: Arc<dyn ReadingStore>) -> Result<impl Reply, Rejection> {
    Ok(match store.latest().await {
        Ok(Some(reading)) => json_reply(StatusCode::OK, &reading),
        Ok(None) => no_data(),
        Err(e) => store_failure(e),
    })
}

async fn history_handler(store: Arc<dyn ReadingStore>) -> Result<impl Reply, Rejection> {
    Ok(match store.history(HISTORY_LIMIT).await {
        Ok(readings) => json_reply(StatusCode::OK, &readings),
        Err(e) => store_failure(e),
    })
}

async fn steps_total_handler(store: Arc<dyn ReadingStore>) -> Result<impl Reply, Rejection> {
    Ok(match store.latest().await {
        Ok(Some(reading)) => json_reply(StatusCode::OK, &json!({ "total_steps": reading.steps })),
        Ok(None) => json_reply(StatusCode::OK, &json!({ "total_steps": 0 })),
        Err(e) => store_failure(e),
    })
}

async fn heart_rate_zone_handler(
    store: Arc<dyn ReadingStore>,
    config: Arc<Config>,
) -> Result<impl Reply, Rejection> {
    Ok(match store.latest().await {
        Ok(Some(reading)) => {
            let zone = config.zone_for(reading.heart_rate);
            json_reply(
                StatusCode::OK,
                &json!({
                    "heart_rate": reading.heart_rate,
                    "zone": zone.name,
                    "color": zone.color,
                }),
            )
        }
        Ok(None) => no_data(),
        Err(e) => store_failure(e),
    })
}

async fn proximity_handler(
    payload: ProximityPayload,
    store: Arc<dyn ReadingStore>,
) -> Result<impl Reply, Rejection> {
    let event = ProximityEvent {
        sensor_id: payload.sensor_id,
        distance_cm: payload.distancia_cm,
        timestamp: Utc::now(),
    };

    Ok(match store.save_sensor_event(&event).await {
        Ok(id) => json_reply(StatusCode::CREATED, &json!({ "id": id })),
        Err(e) => store_failure(e),
    })
}

/// Map rejections onto the JSON error shape of the rest of the API
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::BAD_REQUEST, "Expected a JSON body".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(json_reply(code, &json!({ "error": message })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use crate::model::BiometricReading;
    use chrono::Duration;

    fn test_store() -> Arc<dyn ReadingStore> {
        Arc::new(SqliteStore::open_in_memory().unwrap())
    }

    fn test_api(
        store: Arc<dyn ReadingStore>,
    ) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
        let config = Arc::new(Config::default());
        let engine = Arc::new(SimulatorEngine::new(&config, store.clone()));
        routes(engine, store, config)
    }

    fn reading_at(heart_rate: u16, steps: u64, offset_secs: i64) -> BiometricReading {
        BiometricReading {
            heart_rate,
            steps,
            oxygen_saturation: 98.0,
            body_temperature: 36.6,
            timestamp: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[tokio::test]
    async fn test_latest_returns_404_on_empty_store() {
        let api = test_api(test_store());

        let resp = warp::test::request()
            .method("GET")
            .path("/api/biometrics/latest")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["message"], "No data available");
    }

    #[tokio::test]
    async fn test_latest_returns_most_recent_reading() {
        let store = test_store();
        let api = test_api(store.clone());
        store.save(&reading_at(72, 100, 0)).await.unwrap();
        store.save(&reading_at(130, 250, 5)).await.unwrap();

        let resp = warp::test::request()
            .method("GET")
            .path("/api/biometrics/latest")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["heart_rate"], 130);
        assert_eq!(body["steps"], 250);
    }

    #[tokio::test]
    async fn test_history_newest_first() {
        let store = test_store();
        let api = test_api(store.clone());
        for i in 0..3 {
            store
                .save(&reading_at(70 + i as u16, i * 10, i as i64))
                .await
                .unwrap();
        }

        let resp = warp::test::request()
            .method("GET")
            .path("/api/biometrics/history")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        let readings = body.as_array().unwrap();
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0]["heart_rate"], 72);
        assert_eq!(readings[2]["heart_rate"], 70);
    }

    #[tokio::test]
    async fn test_steps_total_defaults_to_zero() {
        let api = test_api(test_store());

        let resp = warp::test::request()
            .method("GET")
            .path("/api/steps/total")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["total_steps"], 0);
    }

    #[tokio::test]
    async fn test_heart_rate_zone_uses_config_table() {
        let store = test_store();
        let api = test_api(store.clone());
        store.save(&reading_at(139, 500, 0)).await.unwrap();

        let resp = warp::test::request()
            .method("GET")
            .path("/api/heart_rate/zone")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["heart_rate"], 139);
        assert_eq!(body["zone"], "moderate");
        assert_eq!(body["color"], "#f59e0b");
    }

    #[tokio::test]
    async fn test_simulator_status_snapshot() {
        let api = test_api(test_store());

        let resp = warp::test::request()
            .method("GET")
            .path("/api/simulator/status")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["running"], false);
        assert_eq!(body["activity_state"], "resting");
        assert_eq!(body["total_steps"], 0);
        assert_eq!(body["baseline_heart_rate"], 75);
    }

    #[tokio::test]
    async fn test_reset_steps_confirms_zero() {
        let api = test_api(test_store());

        let resp = warp::test::request()
            .method("POST")
            .path("/api/simulator/reset-steps")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["total_steps"], 0);
    }

    #[tokio::test]
    async fn test_proximity_accepts_valid_payload() {
        let api = test_api(test_store());

        let resp = warp::test::request()
            .method("POST")
            .path("/api/sensor/proximidad")
            .json(&json!({ "sensor_id": "proximidad_01", "distancia_cm": 12.4 }))
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert!(body["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_proximity_rejects_malformed_payload() {
        let api = test_api(test_store());

        let resp = warp::test::request()
            .method("POST")
            .path("/api/sensor/proximidad")
            .json(&json!({ "sensor_id": "proximidad_01" }))
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_proximity_rejects_missing_body() {
        let api = test_api(test_store());

        let resp = warp::test::request()
            .method("POST")
            .path("/api/sensor/proximidad")
            .reply(&api)
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
