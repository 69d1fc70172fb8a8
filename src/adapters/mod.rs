//! Concrete adapter implementations for ports.

pub mod clock_id_adapter;
pub mod file_config_adapter;
pub mod json_file_adapter;
pub mod points_csv;
pub mod table_text;
