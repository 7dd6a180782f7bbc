pub mod auth;
pub mod catalog;
pub mod inventory;
pub mod reports;
pub mod tenancy;
pub mod users;
