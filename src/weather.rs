//! Forecast lookup for scheduling-conflict hints
//!
//! Thin client over an OpenWeatherMap-style forecast endpoint. Strictly
//! auxiliary: any failure here degrades to "no forecast available" and is
//! never surfaced as an error to the user.

use crate::core::error::{PilotError, Result};
use reqwest::Client;
use serde::Deserialize;

const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

pub struct ForecastClient {
    client: Client,
    api_key: String,
}

impl ForecastClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Forecast summary for a location closest to the given datetime
    ///
    /// `datetime` is the canonical `YYYY-MM-DD[ HH:MM:SS]` form produced
    /// by the normalizer. The endpoint serves 3-hour slots a few days
    /// ahead; a deadline outside that window is a `ForecastError`.
    pub async fn forecast(&self, location: &str, datetime: &str) -> Result<String> {
        let response = self
            .client
            .get(FORECAST_URL)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| PilotError::ForecastError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PilotError::ForecastError(format!(
                "forecast API returned {}",
                response.status()
            )));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| PilotError::ForecastError(e.to_string()))?;

        let slot = closest_slot(&body.list, datetime).ok_or_else(|| {
            PilotError::ForecastError(format!("no forecast slot near {}", datetime))
        })?;
        Ok(format_slot(location, datetime, slot))
    }
}

/// First slot at or after the target; `None` when the target is past the
/// served window
///
/// Both sides use `YYYY-MM-DD HH:MM:SS`, so string comparison orders
/// chronologically and a plain date sorts before every slot of that day.
fn closest_slot<'a>(slots: &'a [ForecastSlot], datetime: &str) -> Option<&'a ForecastSlot> {
    slots.iter().find(|s| s.dt_txt.as_str() >= datetime)
}

fn format_slot(location: &str, datetime: &str, slot: &ForecastSlot) -> String {
    let description = slot
        .weather
        .first()
        .map(|w| w.description.as_str())
        .unwrap_or("unknown conditions");
    format!(
        "Forecast for {} around {}: {}, {:.0}°C",
        location, datetime, description, slot.main.temp
    )
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastSlot>,
}

#[derive(Debug, Deserialize)]
struct ForecastSlot {
    #[serde(default)]
    dt_txt: String,
    main: SlotMain,
    #[serde(default)]
    weather: Vec<SlotWeather>,
}

#[derive(Debug, Deserialize)]
struct SlotMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct SlotWeather {
    description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(dt_txt: &str, temp: f64) -> ForecastSlot {
        ForecastSlot {
            dt_txt: dt_txt.into(),
            main: SlotMain { temp },
            weather: vec![SlotWeather {
                description: "light rain".into(),
            }],
        }
    }

    #[test]
    fn test_closest_slot_picks_first_at_or_after() {
        let slots = vec![
            slot("2025-03-14 21:00:00", 8.0),
            slot("2025-03-15 00:00:00", 7.0),
            slot("2025-03-15 03:00:00", 6.0),
        ];
        let chosen = closest_slot(&slots, "2025-03-15").unwrap();
        assert_eq!(chosen.dt_txt, "2025-03-15 00:00:00");
    }

    #[test]
    fn test_closest_slot_beyond_window_is_none() {
        let slots = vec![slot("2025-03-18 21:00:00", 8.0)];
        assert!(closest_slot(&slots, "2025-04-01").is_none());
    }

    #[test]
    fn test_closest_slot_empty() {
        assert!(closest_slot(&[], "2025-03-15").is_none());
    }

    #[test]
    fn test_format_slot() {
        let formatted = format_slot("Istanbul", "2025-03-15", &slot("2025-03-15 00:00:00", 7.4));
        assert_eq!(
            formatted,
            "Forecast for Istanbul around 2025-03-15: light rain, 7°C"
        );
    }
}
