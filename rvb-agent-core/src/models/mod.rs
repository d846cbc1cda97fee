//! Data models used to communicate between the serving layer and the agent.
//! [serde_json] is used for JSON serialization/deserialization of these models.

pub mod request;
pub mod response;
