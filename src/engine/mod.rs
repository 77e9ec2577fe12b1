pub mod ops;
pub mod params;
