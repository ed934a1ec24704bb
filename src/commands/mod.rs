/// Rendering a menu as a property list.
pub mod render;
