// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vitalbarn-rs

//! Data model - biometric readings and pushed sensor events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One biometric sample from the simulated wearable.
///
/// Immutable once constructed; every field is within its declared sensor
/// range by the time a reading exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiometricReading {
    /// Heart rate in bpm
    pub heart_rate: u16,

    /// Cumulative step count for the current run
    pub steps: u64,

    /// Oxygen saturation in percent SpO2, one decimal
    pub oxygen_saturation: f64,

    /// Body temperature in degrees Celsius, one decimal
    pub body_temperature: f64,

    /// Moment of generation
    pub timestamp: DateTime<Utc>,
}

impl BiometricReading {
    /// Create a reading stamped with the current time
    pub fn new(heart_rate: u16, steps: u64, oxygen_saturation: f64, body_temperature: f64) -> Self {
        Self {
            heart_rate,
            steps,
            oxygen_saturation,
            body_temperature,
            timestamp: Utc::now(),
        }
    }

    /// Classify the heart rate into its zone
    pub fn heart_rate_zone(&self) -> HeartRateZone {
        HeartRateZone::classify(self.heart_rate)
    }

    /// Whether the oxygen saturation is in the healthy range
    pub fn is_oxygen_normal(&self) -> bool {
        self.oxygen_saturation >= 95.0
    }

    /// Whether the body temperature is in the normal range
    pub fn is_temperature_normal(&self) -> bool {
        (36.1..=37.5).contains(&self.body_temperature)
    }

    /// Summarize the reading into per-metric and overall health labels
    pub fn health_status(&self) -> HealthStatus {
        let heart_rate = match self.heart_rate_zone() {
            HeartRateZone::Intense | HeartRateZone::Maximum => "elevated",
            _ => "normal",
        };

        let oxygen = if self.is_oxygen_normal() {
            "normal"
        } else if self.oxygen_saturation >= 90.0 {
            "low"
        } else {
            "critical"
        };

        let temperature = if self.is_temperature_normal() {
            "normal"
        } else {
            "abnormal"
        };

        let overall = if oxygen != "normal" || temperature != "normal" {
            "attention_needed"
        } else if heart_rate == "elevated" {
            "exercising"
        } else {
            "healthy"
        };

        HealthStatus {
            heart_rate,
            oxygen,
            temperature,
            overall,
        }
    }
}

impl fmt::Display for BiometricReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HR={}bpm Steps={} SpO2={}% Temp={}°C",
            self.heart_rate, self.steps, self.oxygen_saturation, self.body_temperature
        )
    }
}

/// Named heart-rate bucket derived from a bpm value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeartRateZone {
    /// Below 60 bpm
    Resting,
    /// 60-99 bpm
    Light,
    /// 100-139 bpm
    Moderate,
    /// 140-169 bpm
    Intense,
    /// 170 bpm and above
    Maximum,
}

impl HeartRateZone {
    /// Map a heart rate to its zone
    pub fn classify(heart_rate: u16) -> Self {
        match heart_rate {
            0..=59 => Self::Resting,
            60..=99 => Self::Light,
            100..=139 => Self::Moderate,
            140..=169 => Self::Intense,
            _ => Self::Maximum,
        }
    }

    /// Display color for the zone as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            Self::Resting => "#6b7280",
            Self::Light => "#10b981",
            Self::Moderate => "#f59e0b",
            Self::Intense => "#ef4444",
            Self::Maximum => "#dc2626",
        }
    }
}

impl fmt::Display for HeartRateZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resting => "resting",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Intense => "intense",
            Self::Maximum => "maximum",
        };
        write!(f, "{name}")
    }
}

/// Per-metric and overall health labels for one reading
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Heart-rate assessment
    pub heart_rate: &'static str,
    /// Oxygen assessment
    pub oxygen: &'static str,
    /// Temperature assessment
    pub temperature: &'static str,
    /// Overall assessment
    pub overall: &'static str,
}

/// A proximity reading pushed by an external sensor over HTTP.
///
/// The wire field `distancia_cm` matches the device firmware; the timestamp
/// is assigned server-side on receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityEvent {
    /// Identifier of the pushing sensor
    pub sensor_id: String,

    /// Measured distance in centimeters
    #[serde(rename = "distancia_cm")]
    pub distance_cm: f64,

    /// Receipt time
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_classification_boundaries() {
        assert_eq!(HeartRateZone::classify(59), HeartRateZone::Resting);
        assert_eq!(HeartRateZone::classify(59).color(), "#6b7280");
        assert_eq!(HeartRateZone::classify(60), HeartRateZone::Light);
        assert_eq!(HeartRateZone::classify(60).color(), "#10b981");
        assert_eq!(HeartRateZone::classify(139), HeartRateZone::Moderate);
        assert_eq!(HeartRateZone::classify(139).color(), "#f59e0b");
        assert_eq!(HeartRateZone::classify(169), HeartRateZone::Intense);
        assert_eq!(HeartRateZone::classify(170), HeartRateZone::Maximum);
        assert_eq!(HeartRateZone::classify(170).color(), "#dc2626");
    }

    #[test]
    fn test_health_status_healthy() {
        let reading = BiometricReading::new(72, 1200, 98.5, 36.6);
        let status = reading.health_status();

        assert_eq!(status.heart_rate, "normal");
        assert_eq!(status.oxygen, "normal");
        assert_eq!(status.temperature, "normal");
        assert_eq!(status.overall, "healthy");
    }

    #[test]
    fn test_health_status_exercising() {
        let reading = BiometricReading::new(155, 5000, 97.0, 37.2);
        let status = reading.health_status();

        assert_eq!(status.heart_rate, "elevated");
        assert_eq!(status.overall, "exercising");
    }

    #[test]
    fn test_health_status_low_oxygen_needs_attention() {
        let reading = BiometricReading::new(80, 100, 93.0, 36.6);
        let status = reading.health_status();

        assert_eq!(status.oxygen, "low");
        assert_eq!(status.overall, "attention_needed");
    }

    #[test]
    fn test_reading_serializes_snake_case() {
        let reading = BiometricReading::new(72, 42, 98.1, 36.7);
        let json = serde_json::to_value(&reading).unwrap();

        assert_eq!(json["heart_rate"], 72);
        assert_eq!(json["steps"], 42);
        assert_eq!(json["oxygen_saturation"], 98.1);
        assert_eq!(json["body_temperature"], 36.7);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_proximity_event_wire_field_name() {
        let event = ProximityEvent {
            sensor_id: "proximidad_01".to_string(),
            distance_cm: 12.5,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["sensor_id"], "proximidad_01");
        assert_eq!(json["distancia_cm"], 12.5);
    }
}
