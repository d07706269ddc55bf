//! Helper functions shared by the renderers and the GitHub clients

mod date;
mod url;

pub use date::*;
pub use url::*;
