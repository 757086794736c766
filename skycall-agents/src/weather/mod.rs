//! Current weather lookup for a free-text place name.
//!
//! A lookup is two sequential requests: the geocoding provider turns the place
//! name into coordinates, then the forecast provider reports the current
//! temperature (Fahrenheit) and WMO weather code for those coordinates.
//!
//! [`WeatherLookup::lookup`] never fails: any problem is rendered as a string
//! starting with `Error`, which is what gets handed back to the model.

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use std::fmt;

use crate::config::WeatherConfig;

pub mod codes;
pub mod types;

pub use codes::describe_weather_code;
use types::{Coordinates, CurrentConditions, ForecastResponse, GeocodingMatch};

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Error: Could not find location '{location}'")]
    LocationNotFound { location: String },

    #[error("Error fetching weather data: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Error fetching weather data: invalid coordinates ({lat}, {lon})")]
    InvalidCoordinates { lat: String, lon: String },

    #[error("Failed to build weather HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Successful lookup result
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: String,
    pub temperature_f: f64,
    pub weather_code: i64,
}

impl WeatherReport {
    pub fn description(&self) -> &'static str {
        describe_weather_code(self.weather_code)
    }
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // f64 Display prints whole numbers without a trailing ".0"
        write!(
            f,
            "The current temperature in {} is {}°F with {}",
            self.location,
            self.temperature_f,
            self.description()
        )
    }
}

/// Something that can answer "what's the weather in X" as a sentence
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    /// Returns a sentence on success or a string starting with `Error` otherwise
    async fn lookup(&self, location: &str) -> String;
}

pub struct WeatherService {
    http_client: reqwest::Client,
    geocoding_base_url: String,
    forecast_base_url: String,
    user_agent: String,
}

impl WeatherService {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(WeatherError::ClientBuild)?;

        Ok(Self {
            http_client,
            geocoding_base_url: config.geocoding_base_url.trim_end_matches('/').to_string(),
            forecast_base_url: config.forecast_base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Resolve the location and fetch its current conditions
    pub async fn current_weather(&self, location: &str) -> Result<WeatherReport, WeatherError> {
        let coordinates = self.geocode(location).await?;
        let current = self.forecast(coordinates).await?;

        Ok(WeatherReport {
            location: location.to_string(),
            temperature_f: current.temperature_2m,
            weather_code: current.weather_code,
        })
    }

    async fn geocode(&self, location: &str) -> Result<Coordinates, WeatherError> {
        let url = format!("{}/search", self.geocoding_base_url);

        let matches: Vec<GeocodingMatch> = self
            .http_client
            .get(&url)
            .query(&[("q", location), ("format", "json"), ("limit", "1")])
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(best) = matches.into_iter().next() else {
            return Err(WeatherError::LocationNotFound {
                location: location.to_string(),
            });
        };

        tracing::debug!(
            location,
            resolved = best.display_name.as_deref().unwrap_or(""),
            lat = %best.lat,
            lon = %best.lon,
            "Geocoded location"
        );

        match (best.lat.trim().parse::<f64>(), best.lon.trim().parse::<f64>()) {
            (Ok(latitude), Ok(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(WeatherError::InvalidCoordinates {
                lat: best.lat,
                lon: best.lon,
            }),
        }
    }

    async fn forecast(&self, coordinates: Coordinates) -> Result<CurrentConditions, WeatherError> {
        let url = format!("{}/v1/forecast", self.forecast_base_url);

        let forecast: ForecastResponse = self
            .http_client
            .get(&url)
            .query(&[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("current", "temperature_2m,weather_code".to_string()),
                ("temperature_unit", "fahrenheit".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(forecast.current)
    }
}

#[async_trait]
impl WeatherLookup for WeatherService {
    async fn lookup(&self, location: &str) -> String {
        match self.current_weather(location).await {
            Ok(report) => report.to_string(),
            Err(e) => {
                tracing::warn!(location, "Weather lookup failed: {}", e);
                e.to_string()
            }
        }
    }
}
