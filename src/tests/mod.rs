mod common;

mod config_loading;
mod file_store;
