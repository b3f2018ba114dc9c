pub mod app;
pub mod input;
pub mod panel;
pub mod render;
pub mod theme;

pub use app::run;
