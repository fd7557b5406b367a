pub mod choropleth;
pub mod trend;
