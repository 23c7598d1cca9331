//! Weather lookup with farming advice
//!
//! Wraps the OpenWeather current-weather API, maps its condition taxonomy to
//! the three the client renders, and attaches advice for field work. The
//! endpoint degrades to a fixed mock payload when the upstream fails; weather
//! is a convenience feature, not worth a 500.

mod advice;
mod client;

pub use advice::{farming_advice, map_condition, mock_report};
pub use client::{OpenWeatherClient, WeatherProvider, WeatherReport};
