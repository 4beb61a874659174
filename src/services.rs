pub mod location_notifier;
