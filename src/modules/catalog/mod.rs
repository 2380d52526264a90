pub mod fixture;
pub mod model;
pub mod provider;
pub mod repository;
