// Domain layer: records, region and the ports the collector talks through.

pub mod model;
pub mod ports;
