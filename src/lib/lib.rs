pub mod estimate;
pub mod model;
pub mod params;
pub mod report;
pub mod sample;
