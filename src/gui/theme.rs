use crate::config::{Config, ViewConfig};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use kuratowski_core::{MARKER_COUNT, Marker};
use palette::{Srgba, WithAlpha};

pub struct ThemeColors {
    pub background: Srgba<f64>,
    pub outline: Srgba<f64>,
    pub trajectory: Srgba<f64>,
    pub text: Srgba<f64>,
}

fn named_color(context: &gtk::StyleContext, name: &str) -> Option<Srgba<f64>> {
    let c = context.lookup_color(name)?;
    Some(Srgba::new(c.red(), c.green(), c.blue(), c.alpha()).into_format())
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let fg = named_color(context, "theme_fg_color").unwrap_or(Srgba::new(0.0, 0.0, 0.0, 1.0));
        Self {
            background: named_color(context, "theme_base_color")
                .unwrap_or(Srgba::new(1.0, 1.0, 1.0, 1.0))
                .with_alpha(1.0),
            outline: fg.with_alpha(1.0),
            trajectory: fg.with_alpha(0.5),
            text: named_color(context, "theme_text_color").unwrap_or(Srgba::new(0.1, 0.1, 0.1, 1.0)),
        }
    }
}

/// Marker colors and sizes taken from the config file.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    markers: [Srgba<f64>; MARKER_COUNT],
    pub view: ViewConfig,
}

impl Style {
    pub fn from_config(config: &Config) -> Self {
        Self {
            markers: Marker::ALL.map(|marker| config.marker_color(marker).to_rgba()),
            view: config.view,
        }
    }

    pub fn marker(&self, marker: Marker) -> Srgba<f64> {
        self.markers[marker.index()]
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.kuratowski-canvas {
    border: 1px solid alpha(currentColor, 0.2);
    border-radius: 4px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
