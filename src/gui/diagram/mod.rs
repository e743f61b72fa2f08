use cairo::Context;
use palette::Srgba;

pub mod circle;
pub mod projection;
pub mod trajectory;

pub use projection::{Camera, Viewport};

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn paint_background(cr: &Context, color: Srgba<f64>) -> Result<(), cairo::Error> {
    set_source(cr, color);
    cr.paint()
}
