pub mod api_client;
pub mod manager;
pub mod merge;
pub mod remote;
pub mod types;
