// Domain layer: badge models, classification and ports. No HTTP or filesystem here.

pub mod classify;
pub mod model;
pub mod ports;
