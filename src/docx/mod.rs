//! DOCX template rendering
//!
//! A DOCX file is a zip package of XML parts. Rendering loads the package,
//! prepares the parts that may carry directives, renders them with Handlebars
//! in strict mode, removes paragraphs left empty, and re-zips the result.
//!
//! - **package**: zip package read/write
//! - **xml**: tag scanning and escaping helpers
//! - **preprocess**: directive repair before rendering
//! - **cleanup**: empty paragraph removal after rendering
//! - **template**: the rendering entry point

pub mod cleanup;
pub mod package;
pub mod preprocess;
pub mod template;
pub mod xml;

pub use package::*;
pub use template::*;
