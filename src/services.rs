pub mod auth;
pub mod catalog_service;
pub mod inventory_service;
pub mod report_service;
pub mod tenancy_service;
pub mod token;
