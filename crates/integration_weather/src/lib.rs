//! WeatherAPI.com forecast integration
//!
//! Client for the WeatherAPI.com forecast endpoint
//! (<https://www.weatherapi.com/docs/>). Only the daily summary of the first
//! forecast day is consumed.

pub mod client;
mod models;

pub use client::{WeatherApiClient, WeatherClient, WeatherConfig, WeatherError};
pub use models::{
    ApiErrorBody, ApiErrorDetail, DaySummary, ForecastBlock, ForecastDay, ForecastResponse,
};
