//! User interface: crossterm key mapping and screen rendering.

mod keymapper;
mod renderer;

pub use keymapper::{KeyAction, KeyMapper};
pub use renderer::Renderer;
