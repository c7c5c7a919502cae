pub mod action_executor;
pub mod candidate_store;
pub mod config;
pub mod contract;
pub mod discovery;
pub mod keys;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod prefix_index;
pub mod render;
pub mod runtime;
pub mod session;
