// Domain layer: employee record, artifact schemas and ports (interfaces).

pub mod artifacts;
pub mod model;
pub mod ports;
