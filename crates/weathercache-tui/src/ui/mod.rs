//! Terminal user interface.

pub mod input;
pub mod plain;
pub mod render;
pub mod styles;

pub use input::handle_input;
pub use plain::render_plain;
pub use render::render;
