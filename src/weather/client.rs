use super::advice::{farming_advice, map_condition};
use crate::config::WeatherConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Weather payload returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature: f64,
    pub condition: String,
    pub description: String,
    pub location: String,
    pub advice: String,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, lat: f64, lon: f64) -> Result<WeatherReport, ApiError>;
}

/// OpenWeather current-weather client.
pub struct OpenWeatherClient {
    base_url: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    weather: Vec<OwmWeather>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    main: String,
    description: String,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig, api_key: String) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, lat: f64, lon: f64) -> Result<WeatherReport, ApiError> {
        let response = self
            .client
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
                ("lang", "id".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("OpenWeather API error: {}", status);
            return Err(ApiError::upstream(format!(
                "weather API returned {}",
                status
            )));
        }

        let data: OwmResponse = response.json().await?;
        let weather = data
            .weather
            .first()
            .ok_or_else(|| ApiError::upstream("weather payload missing conditions"))?;

        Ok(WeatherReport {
            temperature: data.main.temp,
            condition: map_condition(&weather.main).to_string(),
            description: weather.description.clone(),
            location: data.name.unwrap_or_else(|| "Unknown Location".to_string()),
            advice: farming_advice(&weather.main).to_string(),
        })
    }
}
