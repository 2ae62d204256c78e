pub mod collector;
pub mod engine;
pub mod merge;

pub use crate::domain::model::{
    BusinessRecord, NearbyPage, PlaceDetail, RawPlace, ResultSet, RunStats, SearchRegion,
};
pub use crate::domain::ports::{ConfigProvider, PlacesApi, Storage};
pub use crate::utils::error::Result;
