pub mod core_api;
pub mod element;
pub mod gender;
pub mod launcher;
pub mod locate;
pub mod model;
pub mod store;
pub mod transfer;
