//! Gemini Vision Common Library
//!
//! CLIとテストで共有されるAPI型・パーサー・定数

pub mod error;
pub mod parser;
pub mod prompts;
pub mod types;

pub use error::{Error, Result};
pub use parser::{parse_api_error, parse_response, response_outcome, ResponseOutcome};
pub use prompts::{is_supported_extension, SUPPORTED_EXTENSIONS};
pub use types::{
    ApiErrorBody, ApiErrorDetail, Candidate, Content, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, InlineData, Part, PromptFeedback,
};
