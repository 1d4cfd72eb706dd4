pub mod api_client;
pub mod download;
pub mod file_intake;

pub use api_client::AnalysisClient;
pub use file_intake::SelectedFile;
