use tracing::{info, warn};

use crate::{
    model::{FetchFailure, FetchReport},
    provider::WeatherProvider,
};

/// Request every city in order, one at a time.
///
/// A failure for one city is recorded in the report and never stops the
/// remaining requests.
pub async fn fetch_all<S: AsRef<str>>(provider: &dyn WeatherProvider, cities: &[S]) -> FetchReport {
    let mut report = FetchReport::default();
    println!("Starting to get weather data...");

    for city in cities {
        let city = city.as_ref();
        println!("Getting weather for {city}");

        match provider.current(city).await {
            Ok(record) => {
                println!("{city} data fetched!");
                report.records.push(record);
            }
            Err(error) => {
                warn!(city, kind = error.kind(), error = %error, "skipping city");
                println!("Failed to get data for {city}: {error}");
                report.failures.push(FetchFailure { city: city.to_string(), error });
            }
        }
    }

    info!(
        fetched = report.records.len(),
        failed = report.failures.len(),
        "finished fetching weather data"
    );
    report
}
