pub mod aggregate;
pub mod coerce;
pub mod finders;
pub mod highlights;
pub mod model;
pub mod normalize;
pub mod profile;
pub mod reasons;
pub mod temporal;
pub mod upload;
