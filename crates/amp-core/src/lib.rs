pub mod action;
pub mod area;
pub mod error;
pub mod inbox;
pub mod io;
pub mod markdown;
pub mod paths;
pub mod project;
pub mod review;
pub mod settings;
pub mod types;
pub mod user;

pub use error::{AmpError, Result};
