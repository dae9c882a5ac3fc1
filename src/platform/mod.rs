// Boundaries to the outside world: frame acquisition and landmark inference

pub mod capture;
pub mod pose;
