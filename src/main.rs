use env_logger::Env;
use log::{error, info, warn};

use pin_feed::config::AppConfig;
use pin_feed::services::location_notifier::{spawn_channel_feed, LatestLocation};
use pin_feed::{LocationReading, Pin};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();
    info!("Loading pins from {}", config.pins_file.display());

    let raw = config.read_pins_file().await.map_err(|e| {
        error!("Failed to read pins: {}", e);
        e
    })?;
    let pins = Pin::list_from_json(&raw).map_err(|e| {
        error!("Failed to decode pins: {}", e);
        e
    })?;
    info!("Decoded {} pins", pins.len());

    let (tx, handle) = spawn_channel_feed(LatestLocation::new(), config.channel_buffer);
    for pin in &pins {
        let Some(location) = pin.location() else {
            warn!("Pin {:?} has no location, skipping", pin.id().or(pin.pin_id()));
            continue;
        };
        let mut reading = LocationReading::new(*location);
        if let Some(created_at) = pin.created_at_utc() {
            reading = reading.at(created_at);
        }
        if tx.send(reading).await.is_err() {
            warn!("Location feed stopped early");
            break;
        }
    }
    drop(tx);

    let latest = handle.await?;
    info!(
        "Replayed {} locations ({} rejected)",
        latest.updates(),
        latest.rejected()
    );
    if let Some(reading) = latest.last() {
        info!(
            "Last location: ({}, {}) at {}",
            reading.location.lat, reading.location.lng, reading.timestamp
        );
    }

    Ok(())
}
