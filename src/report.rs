//! Outbound report payload.
//!
//! One flat key per reading field, matching the ingestion endpoint's
//! column contract.  Serialised to JSON by the HTTP reporter adapter.

use serde::Serialize;

use crate::readings::Readings;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Report {
    pub temperature: f32,
    pub humidity: f32,
    pub wind_speed: f32,
    pub lpg_ppm: u32,
    pub h2_ppm: u32,
    pub smoke_ppm: u32,
    pub benzene_mgl: f32,
    pub alcohol_mgl: f32,
    pub co_ppm: u32,
    pub co2_ppm: u32,
    pub ammonia_ppm: u32,
    pub toluene_ppm: u32,
    pub aqi: u16,
}

impl Report {
    pub fn from_readings(r: &Readings) -> Self {
        Self {
            temperature: r.temperature_c,
            humidity: r.humidity_pct,
            wind_speed: r.wind_kmh,
            lpg_ppm: r.lpg_ppm,
            h2_ppm: r.h2_ppm,
            smoke_ppm: r.smoke_ppm,
            benzene_mgl: r.benzene_mgl,
            alcohol_mgl: r.alcohol_mgl,
            co_ppm: r.co_ppm,
            co2_ppm: r.co2_ppm,
            ammonia_ppm: r.ammonia_ppm,
            toluene_ppm: r.toluene_ppm,
            aqi: r.aqi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_to_the_documented_flat_keys() {
        let readings = Readings {
            smoke_ppm: 42,
            aqi: 42,
            ..Readings::default()
        };
        let json = serde_json::to_value(Report::from_readings(&readings)).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "temperature",
            "humidity",
            "wind_speed",
            "lpg_ppm",
            "h2_ppm",
            "smoke_ppm",
            "benzene_mgl",
            "alcohol_mgl",
            "co_ppm",
            "co2_ppm",
            "ammonia_ppm",
            "toluene_ppm",
            "aqi",
        ] {
            assert!(obj.contains_key(key), "missing report key {key}");
        }
        assert_eq!(obj.len(), 13, "report must stay a flat 13-field map");
        assert_eq!(obj["smoke_ppm"], 42);
    }
}
