pub mod batch;
pub mod fragment;
pub mod helpers;
pub mod services;
pub mod types;
pub mod wire;
