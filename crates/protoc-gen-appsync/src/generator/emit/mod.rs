//! Renders a processed file into its generated artifacts.

pub(crate) mod dispatch;
pub(crate) mod sdl;

pub(crate) use dispatch::DispatchGenerator;
pub(crate) use sdl::render_schema;
