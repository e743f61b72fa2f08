use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::diagram::{self, Camera};
use crate::gui::theme::{self, Style, ThemeColors};
use gtk::prelude::*;
use gtk4 as gtk;
use kuratowski_core::angle::wrap;
use kuratowski_core::{CircleLayout, Deltas, Marker, Orchestrator, Point, RenderPayload};
use relm4::RelmWidgetExt;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::path::PathBuf;
use std::rc::Rc;

const SLIDER_WIDTH: i32 = 300;
const SLIDER_STEP: f64 = 0.01;
const DRAG_SENSITIVITY: f64 = 0.01;

pub struct AppInit {
    pub config: Config,
    pub config_path: PathBuf,
    pub orchestrator: Orchestrator,
    pub events: async_channel::Receiver<AppEvent>,
}

/// What the labels need from a frame, so the orchestrator borrow can end early.
#[derive(Debug, Clone, Copy)]
struct FrameSummary {
    deltas: Deltas,
    recorded: usize,
}

impl From<&RenderPayload<'_>> for FrameSummary {
    fn from(payload: &RenderPayload<'_>) -> Self {
        Self {
            deltas: payload.deltas,
            recorded: payload.trajectory.len(),
        }
    }
}

struct MarkerControl {
    scale: gtk::Scale,
    label: gtk::Label,
    changed: glib::SignalHandlerId,
}

pub struct AppModel {
    orchestrator: Rc<RefCell<Orchestrator>>,
    style: Rc<Cell<Style>>,
    camera: Rc<Cell<Camera>>,
    drag_origin: Camera,
    deltas: Deltas,
    recorded: usize,
    config_path: PathBuf,
    controls: Vec<MarkerControl>,
    circle_area: gtk::DrawingArea,
    trajectory_area: gtk::DrawingArea,
}

#[derive(Debug, Clone)]
pub enum AppMsg {
    AngleChanged(Marker, f64),
    Cycle,
    Reset,
    CircleResized(i32, i32),
    RotateBegin,
    Rotate(f64, f64),
    ConfigReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn angle_label(marker: Marker, angle: f64) -> String {
    format!("{}: {:.2}", marker, angle)
}

/// Sliders cover one turn; stored angles may lie outside it.
fn slider_position(angle: f64) -> f64 {
    wrap(angle)
}

fn delta_label(marker: Marker, deltas: &Deltas) -> String {
    format!("Delta {}: {:.2}", marker, deltas.get(marker).unwrap_or_default())
}

/// Keeps the whole circle and its markers inside the drawing area.
fn fit_layout(width: i32, height: i32, style: &Style) -> CircleLayout {
    let (w, h) = (width as f64, height as f64);
    let room = (w.min(h) / 2.0 - style.view.point_radius).max(1.0);
    CircleLayout::new(
        Point::new(w / 2.0, h / 2.0),
        style.view.circle_radius.min(room),
    )
    .with_y_axis(style.view.y_axis)
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Kuratowski Map"),
            set_default_size: (1000, 750),

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    let msg = if key == gtk::gdk::Key::Escape {
                        AppMsg::Quit
                    } else if key == gtk::gdk::Key::c {
                        AppMsg::Cycle
                    } else if key == gtk::gdk::Key::r {
                        AppMsg::Reset
                    } else {
                        return glib::Propagation::Proceed;
                    };
                    sender.input(msg);
                    glib::Propagation::Stop
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                set_spacing: 10,
                set_margin_all: 10,

                gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 5,

                    #[name = "slider_box"]
                    gtk::Box {
                        set_orientation: gtk::Orientation::Vertical,
                        set_spacing: 5,
                    },

                    gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,
                        set_spacing: 10,
                        set_margin_top: 10,
                        set_halign: gtk::Align::Center,

                        gtk::Button {
                            set_label: "Reset Path",
                            connect_clicked => AppMsg::Reset,
                        },

                        gtk::Button {
                            set_label: "Cycle Black",
                            connect_clicked => AppMsg::Cycle,
                        },
                    },

                    gtk::Label {
                        add_css_class: "dim-label",
                        #[watch]
                        set_label: &format!("{} points recorded", model.recorded),
                    },
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 5,
                    set_hexpand: true,

                    #[name = "circle_area"]
                    gtk::DrawingArea {
                        set_content_width: 300,
                        set_content_height: 300,
                        add_css_class: "kuratowski-canvas",

                        connect_resize[sender] => move |_, width, height| {
                            sender.input(AppMsg::CircleResized(width, height));
                        },
                    },

                    gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,
                        set_homogeneous: true,

                        gtk::Label {
                            #[watch]
                            set_label: &delta_label(Marker::Green, &model.deltas),
                        },
                        gtk::Label {
                            #[watch]
                            set_label: &delta_label(Marker::Blue, &model.deltas),
                        },
                        gtk::Label {
                            #[watch]
                            set_label: &delta_label(Marker::Purple, &model.deltas),
                        },
                    },

                    #[name = "trajectory_area"]
                    gtk::DrawingArea {
                        set_content_width: 500,
                        set_content_height: 500,
                        set_hexpand: true,
                        set_vexpand: true,
                        add_css_class: "kuratowski-canvas",

                        add_controller = gtk::GestureDrag {
                            connect_drag_begin[sender] => move |_, _, _| {
                                sender.input(AppMsg::RotateBegin);
                            },
                            connect_drag_update[sender] => move |_, dx, dy| {
                                sender.input(AppMsg::Rotate(dx, dy));
                            },
                        },
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            config,
            config_path,
            mut orchestrator,
            events,
        } = init;

        theme::load_css();

        let style = Style::from_config(&config);
        let camera = Camera::new(config.view.yaw, config.view.pitch);
        let summary = FrameSummary::from(&orchestrator.render());
        let state = *orchestrator.state();

        let mut model = AppModel {
            orchestrator: Rc::new(RefCell::new(orchestrator)),
            style: Rc::new(Cell::new(style)),
            camera: Rc::new(Cell::new(camera)),
            drag_origin: camera,
            deltas: summary.deltas,
            recorded: summary.recorded,
            config_path,
            controls: Vec::new(),
            circle_area: gtk::DrawingArea::default(),
            trajectory_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        for marker in Marker::ALL {
            let angle = state.angle(marker);
            let row = gtk::Box::new(gtk::Orientation::Horizontal, 5);
            let scale = gtk::Scale::with_range(gtk::Orientation::Horizontal, 0.0, TAU, SLIDER_STEP);
            scale.set_width_request(SLIDER_WIDTH);
            scale.set_value(slider_position(angle));
            let label = gtk::Label::new(Some(&angle_label(marker, angle)));

            let sender = sender.clone();
            let changed = scale.connect_value_changed(move |s| {
                sender.input(AppMsg::AngleChanged(marker, s.value()));
            });

            row.append(&scale);
            row.append(&label);
            widgets.slider_box.append(&row);
            model.controls.push(MarkerControl {
                scale,
                label,
                changed,
            });
        }

        model.circle_area = widgets.circle_area.clone();
        model.trajectory_area = widgets.trajectory_area.clone();

        let (orchestrator, style) = (model.orchestrator.clone(), model.style.clone());
        widgets
            .circle_area
            .set_draw_func(move |area, cr, _, _| {
                let colors = ThemeColors::from_context(&area.style_context());
                let orchestrator = orchestrator.borrow();
                let layout = orchestrator.settings().layout;
                if let Err(e) =
                    diagram::circle::draw(cr, &layout, &orchestrator.payload(), &style.get(), &colors)
                {
                    log::error!("Drawing error: {}", e);
                }
            });

        let (orchestrator, style, camera) = (
            model.orchestrator.clone(),
            model.style.clone(),
            model.camera.clone(),
        );
        widgets
            .trajectory_area
            .set_draw_func(move |area, cr, width, height| {
                let colors = ThemeColors::from_context(&area.style_context());
                if let Err(e) = diagram::trajectory::draw(
                    cr,
                    width,
                    height,
                    &orchestrator.borrow().payload(),
                    &camera.get(),
                    &style.get(),
                    &colors,
                ) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::AngleChanged(marker, angle) => {
                let result = self
                    .orchestrator
                    .borrow_mut()
                    .on_marker_moved(marker, angle)
                    .map(|payload| FrameSummary::from(&payload));
                match result {
                    Ok(summary) => {
                        self.controls[marker.index()]
                            .label
                            .set_label(&angle_label(marker, angle));
                        self.show(summary);
                    }
                    Err(e) => log::error!("Rejected angle for {}: {}", marker, e),
                }
            }
            AppMsg::Cycle => {
                let summary = FrameSummary::from(&self.orchestrator.borrow_mut().on_cycle_triggered());
                self.show(summary);
            }
            AppMsg::Reset => {
                let summary = FrameSummary::from(&self.orchestrator.borrow_mut().on_reset_triggered());
                self.show(summary);
            }
            AppMsg::CircleResized(width, height) => {
                let layout = fit_layout(width, height, &self.style.get());
                self.orchestrator.borrow_mut().set_layout(layout);
                self.circle_area.queue_draw();
            }
            AppMsg::RotateBegin => {
                self.drag_origin = self.camera.get();
            }
            AppMsg::Rotate(dx, dy) => {
                self.camera
                    .set(self.drag_origin.dragged(dx, dy, DRAG_SENSITIVITY));
                self.trajectory_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_config(&self.config_path) {
                Ok(new_config) => {
                    self.apply_config(&new_config);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Quit => relm4::main_application().quit(),
        }
    }
}

impl AppModel {
    fn show(&mut self, summary: FrameSummary) {
        self.deltas = summary.deltas;
        self.recorded = summary.recorded;
        self.circle_area.queue_draw();
        self.trajectory_area.queue_draw();
    }

    /// Moves a slider without sending its change back as a new angle.
    fn sync_control(&self, marker: Marker, angle: f64) {
        let control = &self.controls[marker.index()];
        control.scale.block_signal(&control.changed);
        control.scale.set_value(slider_position(angle));
        control.scale.unblock_signal(&control.changed);
        control.label.set_label(&angle_label(marker, angle));
    }

    /// Changed angles are recorded like any other move, without reduction.
    fn apply_config(&mut self, config: &Config) {
        let style = Style::from_config(config);
        self.style.set(style);

        let layout = fit_layout(
            self.circle_area.width(),
            self.circle_area.height(),
            &style,
        );
        self.orchestrator
            .borrow_mut()
            .set_settings(config.settings(layout));

        let updates = config.angle_updates(self.orchestrator.borrow().state());
        for (marker, angle) in updates {
            let result = self
                .orchestrator
                .borrow_mut()
                .on_marker_moved(marker, angle)
                .map(|payload| FrameSummary::from(&payload));
            match result {
                Ok(summary) => {
                    self.sync_control(marker, angle);
                    self.show(summary);
                }
                Err(e) => log::error!("Rejected configured angle for {}: {}", marker, e),
            }
        }

        self.circle_area.queue_draw();
        self.trajectory_area.queue_draw();
    }
}
