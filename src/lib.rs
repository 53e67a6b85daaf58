pub mod app;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod gate;
pub mod repository;
pub mod status;
pub mod storage;
pub mod view;

pub use app::App;
pub use error::{CodeCartError, Result};
pub use repository::{DeleteToken, Inventory};
