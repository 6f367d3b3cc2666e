mod artifact;
mod browser;
mod draft;
mod selection;
mod service;
mod session;
mod token;
mod wizard;

pub use artifact::*;
pub use browser::*;
pub use draft::*;
pub use selection::*;
pub use service::*;
pub use session::*;
pub use token::*;
pub use wizard::*;
