use super::{paint_background, set_source};
use crate::gui::theme::{Style, ThemeColors};
use cairo::Context;
use kuratowski_core::{ArcDescriptor, CircleLayout, MarkerPoint, RenderPayload, YAxis};
use std::f64::consts::PI;

const OUTLINE_WIDTH: f64 = 2.0;

/// Cairo measures angles clockwise on a y-down surface.
fn surface_angle(layout: &CircleLayout, angle: f64) -> f64 {
    match layout.y_axis {
        YAxis::Down => -angle,
        YAxis::Up => angle,
    }
}

fn draw_outline(
    cr: &Context,
    layout: &CircleLayout,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    set_source(cr, colors.outline);
    cr.set_line_width(OUTLINE_WIDTH);
    cr.new_sub_path();
    cr.arc(layout.center.x, layout.center.y, layout.radius, 0.0, 2.0 * PI);
    cr.stroke()
}

fn draw_arc(
    cr: &Context,
    layout: &CircleLayout,
    arc: &ArcDescriptor,
    style: &Style,
) -> Result<(), cairo::Error> {
    let from = surface_angle(layout, arc.start);
    let to = surface_angle(layout, arc.end());

    set_source(cr, style.marker(arc.owner));
    cr.set_line_width(style.view.arc_width);
    cr.new_sub_path();
    if to >= from {
        cr.arc(layout.center.x, layout.center.y, layout.radius, from, to);
    } else {
        cr.arc_negative(layout.center.x, layout.center.y, layout.radius, from, to);
    }
    cr.stroke()
}

fn draw_marker(cr: &Context, point: &MarkerPoint, style: &Style) -> Result<(), cairo::Error> {
    let radius = style.view.point_radius;
    cr.new_sub_path();
    cr.arc(point.position.x, point.position.y, radius, 0.0, 2.0 * PI);
    set_source(cr, style.marker(point.marker));
    cr.fill_preserve()?;
    cr.set_source_rgb(0.0, 0.0, 0.0);
    cr.set_line_width(1.0);
    cr.stroke()
}

/// Arcs are drawn in payload order, then the markers on top.
pub fn draw(
    cr: &Context,
    layout: &CircleLayout,
    payload: &RenderPayload<'_>,
    style: &Style,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    paint_background(cr, colors.background)?;
    draw_outline(cr, layout, colors)?;

    for arc in &payload.arcs {
        draw_arc(cr, layout, arc, style)?;
    }
    for point in &payload.points {
        draw_marker(cr, point, style)?;
    }
    Ok(())
}
