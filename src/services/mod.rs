pub mod inventory;
pub mod inventory_service;
pub mod public_url;
pub mod s3_fetcher;
