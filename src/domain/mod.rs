// Domain layer: records, entities and the contracts a port is built from.

pub mod model;
pub mod ports;
