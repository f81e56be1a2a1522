mod helpers;
mod renderer;
mod screen;
mod state;

pub use renderer::render;
pub use screen::Screen;
pub use state::SessionState;
