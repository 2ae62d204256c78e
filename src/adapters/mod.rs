// Adapters layer: concrete implementations for external systems.

pub mod google_places;

pub use google_places::GooglePlacesClient;
