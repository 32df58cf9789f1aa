pub mod analyzer;
pub mod cli;
pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod image_source;
pub mod logging;
pub mod scanner;

pub use analyzer::{
    analyze_image, analyze_image_from_base64, analyze_image_from_decoded,
    analyze_image_from_file, batch_analyze_images, run_batch, BatchOptions, BatchReport,
    BatchResultMap,
};
pub use client::{AnalysisClient, GeminiClient};
pub use config::{Config, Credentials};
pub use error::{Result, VisionError};
pub use image_source::{AnalysisRequest, ImageSource};
