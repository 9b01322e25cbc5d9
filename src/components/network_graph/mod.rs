mod component;
mod layout;
mod render;
mod state;

pub use component::NetworkCanvas;
pub use layout::{LAYOUT_NAMES, LayoutAlgorithm};
