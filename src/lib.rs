//! Client for the Statly spreadsheet-analysis service: validates and uploads
//! an Excel file, renders its preview and analysis, and downloads the PDF
//! report.

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod view;

pub use config::Config;
pub use controller::UiController;
pub use error::AppError;
