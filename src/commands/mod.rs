pub mod render;
pub mod tailor;
pub mod update;

pub use render::*;
pub use tailor::*;
pub use update::*;
