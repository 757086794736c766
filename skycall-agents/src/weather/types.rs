use serde::Deserialize;

/// One candidate from the geocoding search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingMatch {
    /// Latitude as a decimal string
    pub lat: String,
    /// Longitude as a decimal string
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in the unit requested (Fahrenheit here)
    pub temperature_2m: f64,
    pub weather_code: i64,
}
