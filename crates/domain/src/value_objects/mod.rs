//! Value Objects - Immutable, identity-less domain primitives

mod daily_forecast;
mod fahrenheit;
mod inches;
mod streak_count;

pub use daily_forecast::DailyForecast;
pub use fahrenheit::Fahrenheit;
pub use inches::Inches;
pub use streak_count::StreakCount;
