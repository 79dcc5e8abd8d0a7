use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use skycast_core::{App, AppError};
use skycast_weather::{forecast_cards, CurrentView, WeatherReport};

/// Current conditions and a 16-day forecast
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// City to look up, e.g. "Paris" or "Portland, US"
    #[arg(short, long, conflicts_with_all = ["lat", "lon"])]
    city: Option<String>,

    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Config file to use instead of the one in the user config directory
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize core
    skycast_core::init()?;

    let app = match cli.config.as_deref() {
        Some(path) => App::from_config_file(path),
        None => App::new(),
    }
    .unwrap_or_else(|e| fail(e));
    tracing::debug!("Config directory: {}", app.config().config_dir.display());

    let result = match (cli.city, cli.lat, cli.lon) {
        (Some(city), _, _) => app.weather_for_city(&city).await,
        (None, Some(lat), Some(lon)) => app.weather_for_coords(lat, lon).await,
        _ => app.weather_for_default_city().await,
    };

    match result {
        Ok(report) => {
            render(&report);
            Ok(())
        }
        Err(e) => fail(e),
    }
}

fn fail(err: AppError) -> ! {
    tracing::error!("{}", err);
    eprintln!("{}", err.user_message());
    std::process::exit(1);
}

fn render(report: &WeatherReport) {
    let now = Local::now();
    let current = CurrentView::from_current(&report.current, now);

    println!("{}", current.location);
    println!("{}", current.date);
    println!();
    println!(
        "  {}°  {}  (H {}° / L {}°)",
        current.temperature, current.description, current.high, current.low
    );
    println!(
        "  Visibility {}  Humidity {}  Wind {}  Feels like {}",
        current.visibility, current.humidity, current.wind, current.feels_like
    );
    println!();

    for card in forecast_cards(&report.forecast, now.date_naive()) {
        println!(
            "  {:<12} {:>4}° {:>4}°  {:<24} rain {:>3}%  wind {:>3} km/h  humidity {:>3}%",
            card.label,
            card.high,
            card.low,
            card.description,
            card.precipitation_percent,
            card.wind_kmh,
            card.humidity_percent
        );
    }
}
