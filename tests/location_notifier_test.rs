use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use pin_feed::services::location_notifier::{forward_stream, spawn_channel_feed};
use pin_feed::{LatestLocation, Location, LocationFeed, LocationReading, LocationUpdateNotifier};

#[derive(Debug, Default)]
struct Recorder {
    seen: Vec<LocationReading>,
}

impl LocationUpdateNotifier for Recorder {
    fn update(&mut self, reading: LocationReading) {
        self.seen.push(reading);
    }
}

fn readings(count: usize) -> Vec<LocationReading> {
    let start = Utc.with_ymd_and_hms(2021, 4, 9, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let step = (i % 1000) as f64 / 100.0;
            LocationReading::new(Location::new(step, -step))
                .with_accuracy(i as f64)
                .at(start + chrono::Duration::seconds(i as i64))
        })
        .collect()
}

#[test]
fn test_feed_delivers_in_order() {
    for count in [0, 1, 10, 10_000] {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut feed = LocationFeed::with_observer(move |reading: LocationReading| {
            sink.lock().unwrap().push(reading);
        });

        let pushed = readings(count);
        for reading in pushed.iter().cloned() {
            assert!(feed.publish(reading));
        }

        assert_eq!(feed.delivered(), count as u64);
        assert_eq!(*seen.lock().unwrap(), pushed);
    }
}

#[test]
fn test_forward_stream_preserves_order() {
    let pushed = readings(10_000);
    let stream = futures::stream::iter(pushed.clone());

    let recorder = tokio_test::block_on(forward_stream(stream, Recorder::default()));
    assert_eq!(recorder.seen, pushed);
}

#[test]
fn test_forward_empty_stream() {
    let recorder = tokio_test::block_on(forward_stream(
        futures::stream::empty(),
        Recorder::default(),
    ));
    assert!(recorder.seen.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_channel_feed_from_background_thread() {
    let pushed = readings(10_000);
    let (tx, handle) = spawn_channel_feed(Recorder::default(), 16);

    let to_send = pushed.clone();
    let producer = std::thread::spawn(move || {
        for reading in to_send {
            tx.blocking_send(reading).unwrap();
        }
    });
    producer.join().unwrap();

    let recorder = handle.await.unwrap();
    assert_eq!(recorder.seen, pushed);
}

#[tokio::test]
async fn test_channel_feed_into_latest_location() {
    let latest = LatestLocation::new();
    let (tx, handle) = spawn_channel_feed(latest.clone(), 0);

    tx.send(LocationReading::new(Location::new(1.0, 2.0))).await.unwrap();
    tx.send(LocationReading::new(Location::new(200.0, 2.0))).await.unwrap();
    tx.send(LocationReading::new(Location::new(3.0, 4.0))).await.unwrap();
    drop(tx);
    handle.await.unwrap();

    assert_eq!(latest.updates(), 2);
    assert_eq!(latest.rejected(), 1);
    assert_eq!(
        latest.last().map(|reading| reading.location),
        Some(Location::new(3.0, 4.0))
    );
}
