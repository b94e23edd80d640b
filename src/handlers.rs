pub mod alerts;
pub mod dashboard;
pub mod documents;
pub mod vehicles;
