//! Domain entities - Objects with identity and lifecycle

mod daily_weather_record;

pub use daily_weather_record::{DATE_KEY_FORMAT, DailyWeatherRecord};
