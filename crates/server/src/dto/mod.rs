mod error;
mod route;

pub use error::*;
pub use route::*;
