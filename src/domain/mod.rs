// Domain layer: yield table model and ports (interfaces). Only std/serde here.

pub mod model;
pub mod ports;
