pub mod renderer;

pub use renderer::{Renderer, trail_color};
