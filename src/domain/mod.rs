pub mod campaigns;
pub mod models;
pub mod summary;
pub mod survey;
