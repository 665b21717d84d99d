pub mod config;
pub mod voicing_data;

pub use config::{AppConfig, ConfigError, ConfigPlugin};
pub use voicing_data::{load_voicing_data, parse_voicing_data, DataError, IngestIssue, LoadedVoicingData};
