//! Always-on-top overlay window for `graphmon`.
//!
//! Owns the Iced application loop. The loop is the only place the sampler
//! is touched: ticks come from an Iced timer subscription, reads run as
//! [`Task`]s and their outcomes come back as messages.

use graphmon_config::{load as load_config, save as save_config, MonitorConfig, WindowConfig};
use graphmon_core::{format::title_for, SamplerContext, SeriesUpdate};
use graphmon_system::{LabelMode, MetricSampler, MetricSource, ReadOutcome, SamplerState};
use graphmon_theme::Theme;
use graphmon_widgets::{ChartWidget, ReadoutWidget};
use iced::{
    event, keyboard,
    widget::{column, container, mouse_area},
    window, Element, Length, Point, Size, Subscription, Task,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Smallest window the chart still makes sense in.
const MIN_SIZE: Size = Size::new(120.0, 80.0);

// ── Entry point ───────────────────────────────────────────────────────────────

/// Everything the overlay needs to start.
#[derive(Clone)]
pub struct LaunchOptions {
    /// Effective configuration (file merged with command-line overrides).
    pub config: MonitorConfig,
    /// Where window geometry is written back on close.
    pub config_path: PathBuf,
    pub source: Arc<dyn MetricSource>,
}

/// Open the overlay and run until the window is closed.
pub fn run(options: LaunchOptions) -> iced::Result {
    let settings = window_settings(&options.config.window);

    iced::application(move || Overlay::new(options.clone()), Overlay::update, Overlay::view)
        .title(Overlay::title)
        .subscription(Overlay::subscription)
        .style(Overlay::style)
        .window(settings)
        .run()
}

fn window_settings(cfg: &WindowConfig) -> window::Settings {
    let position = if cfg.center_screen {
        window::Position::Centered
    } else {
        window::Position::Specific(Point::new(cfg.x as f32, cfg.y as f32))
    };
    let level = if cfg.always_on_top {
        window::Level::AlwaysOnTop
    } else {
        window::Level::Normal
    };

    window::Settings {
        size: Size::new(
            (cfg.width as f32).max(MIN_SIZE.width),
            (cfg.height as f32).max(MIN_SIZE.height),
        ),
        position,
        min_size: Some(MIN_SIZE),
        level,
        transparent: cfg.opacity < 1.0,
        // Geometry is saved before we exit.
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

// ── Message ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Message {
    /// Sampling timer fired.
    Tick,
    /// A read started on a previous tick has finished.
    ReadFinished(ReadOutcome),
    Resized(Size),
    Moved(Point),
    /// Click on the chart or the space bar.
    TogglePause,
    CloseRequested,
}

// ── State ─────────────────────────────────────────────────────────────────────

struct Overlay {
    sampler:     MetricSampler,
    /// Last update produced by the sampler, if any.
    latest:      Option<SeriesUpdate>,
    /// History as of the last push or resize.
    snapshot:    Arc<[f64]>,
    config:      MonitorConfig,
    config_path: PathBuf,
    theme:       Theme,
    chart:       ChartWidget,
    readout:     ReadoutWidget,
}

impl Overlay {
    fn new(options: LaunchOptions) -> (Self, Task<Message>) {
        let LaunchOptions { config, config_path, source } = options;
        let ctx = SamplerContext {
            kind:           config.sampling.kind,
            schedule:       config.sampling.schedule(),
            display_width:  config.window.width as f32,
            display_height: config.window.height as f32,
        };

        let mut sampler = MetricSampler::new(&ctx, source);
        sampler.start();

        let overlay = Self {
            snapshot: sampler.snapshot(),
            sampler,
            latest: None,
            theme: Theme::from_config(&config.theme),
            config,
            config_path,
            chart: ChartWidget::new(),
            readout: ReadoutWidget::new(),
        };
        (overlay, Task::none())
    }

    fn paused(&self) -> bool {
        self.sampler.state() == SamplerState::Stopped
    }

    fn title(&self) -> String {
        title_for(self.sampler.kind(), self.latest.as_ref().and_then(|u| u.reading))
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                if let Some(read) = self.sampler.tick() {
                    return Task::perform(read.resolve(), Message::ReadFinished);
                }
            }
            Message::ReadFinished(outcome) => {
                if let Some(update) = self.sampler.complete(outcome) {
                    self.snapshot = Arc::clone(&update.snapshot);
                    self.latest = Some(update);
                }
            }
            Message::Resized(size) => {
                self.config.window.width = size.width.round() as u32;
                self.config.window.height = size.height.round() as u32;
                self.sampler.set_display(size.width, LabelMode::for_height(size.height));
                self.snapshot = self.sampler.snapshot();
            }
            Message::Moved(point) => {
                self.config.window.x = point.x.round() as i32;
                self.config.window.y = point.y.round() as i32;
            }
            Message::TogglePause => {
                if self.paused() {
                    self.sampler.start();
                } else {
                    self.sampler.stop();
                }
            }
            Message::CloseRequested => {
                self.sampler.stop();
                self.persist_geometry();
                return iced::exit();
            }
        }
        Task::none()
    }

    /// Write the current window geometry back to the config file, leaving
    /// every other section as it is on disk so command-line overrides are
    /// not persisted.
    fn persist_geometry(&self) {
        let mut on_disk = match load_config(&self.config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Not saving window geometry: {e}");
                return;
            }
        };
        let window = &self.config.window;
        on_disk.window.x = window.x;
        on_disk.window.y = window.y;
        on_disk.window.width = window.width;
        on_disk.window.height = window.height;

        match save_config(&on_disk, &self.config_path) {
            Ok(()) => info!("Window geometry saved to {}", self.config_path.display()),
            Err(e) => warn!("Could not save window geometry: {e}"),
        }
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        let kind = self.sampler.kind();
        let readout = self.readout.view(kind, self.latest.as_ref(), self.paused(), &self.theme);
        let chart = self.chart.view(
            &self.snapshot,
            self.sampler.buffer().capacity(),
            kind,
            self.sampler.label_mode(),
            &self.theme,
        );

        let body = column![readout, mouse_area(chart).on_press(Message::TogglePause)]
            .spacing(4)
            .width(Length::Fill)
            .height(Length::Fill);

        container(body)
            .padding(self.theme.padding)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        let events = event::listen_with(window_event);
        if self.paused() {
            return events;
        }

        let tick = iced::time::every(self.sampler.interval()).map(|_| Message::Tick);
        Subscription::batch([tick, events])
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        let bg = self.theme.background.with_alpha(self.config.window.opacity);
        iced::theme::Style {
            background_color: bg.to_iced(),
            text_color:       self.theme.foreground.to_iced(),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Map the runtime events the overlay cares about; everything else is ignored.
fn window_event(event: iced::Event, _status: event::Status, _id: window::Id) -> Option<Message> {
    match event {
        iced::Event::Window(window::Event::Resized(size)) => Some(Message::Resized(size)),
        iced::Event::Window(window::Event::Moved(point)) => Some(Message::Moved(point)),
        iced::Event::Window(window::Event::CloseRequested) => {
            debug!("Close requested");
            Some(Message::CloseRequested)
        }
        iced::Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(keyboard::key::Named::Space),
            ..
        }) => Some(Message::TogglePause),
        _ => None,
    }
}
