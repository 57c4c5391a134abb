pub mod app_settings;
pub mod app_state;
pub mod forms;
pub mod messages;
pub mod network;
pub mod rows;
pub mod selection;
pub mod shared;
pub mod store;
