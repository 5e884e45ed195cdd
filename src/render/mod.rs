//! CPU-Rendering auf RGBA-Bitmaps.
//!
//! Zwei Schichten: die persistente Basis (Malwerkzeuge schreiben direkt
//! hinein) und das flüchtige Overlay, das `compositor::render_overlay`
//! jedes Frame neu aufbaut. `compositor::present` legt beide zusammen.

mod compositor;
mod decoration_renderer;
mod entity_renderer;
mod nature_renderer;
pub mod raster;
mod text;
mod track_renderer;
mod train_renderer;

pub use compositor::{present, render_overlay};
pub(crate) use decoration_renderer::draw_decoration;
pub(crate) use track_renderer::draw_track_segment;
