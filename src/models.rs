pub mod location;
pub mod pin;
