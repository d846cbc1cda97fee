//! Fetching and filtering of the remote ReVanced patch manifest.

pub mod catalog;
pub mod default_agent;
pub mod models;
pub mod remote;
