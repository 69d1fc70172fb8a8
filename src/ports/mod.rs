//! Port traits at the boundary between the domain and its hosts.

pub mod config_port;
pub mod dataset_port;
pub mod id_port;
pub mod listener_port;
pub mod report_port;
