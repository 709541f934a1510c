pub mod config;
pub mod creature;
pub mod debug;
pub mod demo;
pub mod driver;
pub mod ecs;
pub mod error;
pub mod pose;
pub mod render;
pub mod scheduler;
pub mod sensors;
pub mod session;
pub mod viewport;

pub use config::GameConfig;
pub use driver::{FrameDriver, FrameReport};
pub use error::GameError;
