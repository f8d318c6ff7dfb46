pub mod config;
pub mod credentials;
pub mod fetch;
pub mod openai;
pub mod output;
pub mod prompts;
pub mod response;
pub mod source;

pub use config::*;
pub use credentials::*;
pub use fetch::*;
pub use openai::*;
pub use output::*;
pub use prompts::*;
pub use response::*;
pub use source::*;
