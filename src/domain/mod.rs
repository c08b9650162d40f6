// Domain layer: applicant / prediction models and the ports the front ends depend on.

pub mod model;
pub mod ports;
