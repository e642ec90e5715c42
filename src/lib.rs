pub mod aspect;
pub mod config;
pub mod correction;
pub mod error;
pub mod geometry;
pub mod meta;
pub mod surface;
pub mod transition;
pub mod tasks {
    pub mod flip;
    pub mod loader;
}

pub use error::Error;
