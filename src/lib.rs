pub mod command;
pub mod config;
pub mod engine;
pub mod limits;
pub mod model;
pub mod notify;
pub mod observability;
pub mod record;
pub mod registry;
pub mod session;
pub mod source;
pub mod view;
