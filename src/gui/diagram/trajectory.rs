use super::{Camera, Viewport, paint_background, set_source};
use crate::gui::theme::{Style, ThemeColors};
use cairo::Context;
use kuratowski_core::{Marker, RenderPayload, TrajectoryPoint};
use std::f64::consts::PI;

const HISTORY_DOT: f64 = 1.5;
const CURRENT_DOT: f64 = 4.0;
const GUIDE_WIDTH: f64 = 2.0;

fn corner(bits: usize) -> [f64; 3] {
    [0usize, 1, 2].map(|axis| if (bits >> axis) & 1 == 1 { PI } else { 0.0 })
}

fn draw_cube(
    cr: &Context,
    camera: &Camera,
    viewport: &Viewport,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let mut faded = colors.outline;
    faded.alpha *= 0.3;
    set_source(cr, faded);
    cr.set_line_width(1.0);

    // edges join corners that differ in exactly one axis
    for a in 0..8usize {
        for axis in 0..3 {
            let b = a | (1 << axis);
            if b == a {
                continue;
            }
            let (p, q) = (
                viewport.project(camera, corner(a)),
                viewport.project(camera, corner(b)),
            );
            cr.move_to(p.x, p.y);
            cr.line_to(q.x, q.y);
        }
    }
    cr.stroke()
}

fn draw_axis_labels(
    cr: &Context,
    camera: &Camera,
    viewport: &Viewport,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    set_source(cr, colors.text);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
    cr.set_font_size(11.0);

    for (axis, marker) in Marker::COMPARISONS.iter().enumerate() {
        let mut tip = [0.0; 3];
        tip[axis] = PI * 1.08;
        let p = viewport.project(camera, tip);
        let text = format!("Delta {}", marker);
        if let Ok(ext) = cr.text_extents(&text) {
            cr.move_to(p.x - ext.width() / 2.0, p.y + ext.height() / 2.0);
            cr.show_text(&text)?;
        }
    }
    Ok(())
}

fn draw_history(
    cr: &Context,
    camera: &Camera,
    viewport: &Viewport,
    trajectory: &[TrajectoryPoint],
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    if trajectory.is_empty() {
        return Ok(());
    }
    set_source(cr, colors.trajectory);
    let half = HISTORY_DOT / 2.0;
    for point in trajectory {
        let p = viewport.project(camera, point.components());
        cr.rectangle(p.x - half, p.y - half, HISTORY_DOT, HISTORY_DOT);
    }
    cr.fill()
}

/// Walks from the origin to the current point one axis at a time, each leg in
/// the color of the marker that axis measures.
fn draw_current(
    cr: &Context,
    camera: &Camera,
    viewport: &Viewport,
    current: [f64; 3],
    style: &Style,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    cr.set_line_width(GUIDE_WIDTH);
    let mut from = [0.0; 3];
    for (axis, marker) in Marker::COMPARISONS.iter().enumerate() {
        let mut to = from;
        to[axis] = current[axis];
        let (p, q) = (
            viewport.project(camera, from),
            viewport.project(camera, to),
        );
        set_source(cr, style.marker(*marker));
        cr.move_to(p.x, p.y);
        cr.line_to(q.x, q.y);
        cr.stroke()?;
        from = to;
    }

    let p = viewport.project(camera, current);
    set_source(cr, colors.outline);
    cr.new_sub_path();
    cr.arc(p.x, p.y, CURRENT_DOT, 0.0, 2.0 * PI);
    cr.fill()
}

pub fn draw(
    cr: &Context,
    width: i32,
    height: i32,
    payload: &RenderPayload<'_>,
    camera: &Camera,
    style: &Style,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let viewport = Viewport::fit(width as f64, height as f64);

    paint_background(cr, colors.background)?;
    draw_cube(cr, camera, &viewport, colors)?;
    draw_axis_labels(cr, camera, &viewport, colors)?;
    draw_history(cr, camera, &viewport, payload.trajectory, colors)?;
    draw_current(cr, camera, &viewport, *payload.deltas, style, colors)
}
