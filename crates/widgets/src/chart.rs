use graphmon_core::{format::format_value, MetricKind};
use graphmon_system::LabelMode;
use graphmon_theme::{pressure_color, ChartStyle, Theme};
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke, Text},
    Element, Length, Pixels, Point, Rectangle, Renderer,
};

/// Horizontal guide lines drawn across the chart.
const GRID_LINES: usize = 4;
/// Headroom above the peak for kinds without a fixed ceiling.
const HEADROOM: f64 = 1.15;

/// Scrolling line chart of the sampler's history, newest sample at the
/// right edge.
///
/// Redrawn from scratch on every frame; nothing is cached between ticks.
#[derive(Debug, Default)]
pub struct ChartWidget;

impl ChartWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view<'a, Message: 'a>(
        &'a self,
        samples: &'a [f64],
        capacity: usize,
        kind: MetricKind,
        mode: LabelMode,
        theme: &'a Theme,
    ) -> Element<'a, Message> {
        let program = ChartProgram {
            samples,
            capacity,
            kind,
            mode,
            style: theme.chart_style(),
        };
        canvas::Canvas::new(program)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Vertical scale for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub max: f64,
}

impl Scale {
    /// CPU is pinned to 0–100 %; everything else follows the window's peak.
    pub fn for_samples(kind: MetricKind, samples: &[f64]) -> Self {
        if kind == MetricKind::Cpu {
            return Self { max: 100.0 };
        }
        let peak = samples.iter().copied().fold(0.0, f64::max);
        Self { max: if peak > 0.0 { peak * HEADROOM } else { 1.0 } }
    }

    /// Fraction of the chart height for `value`, clamped to `[0, 1]`.
    pub fn fraction(&self, value: f64) -> f32 {
        (value / self.max).clamp(0.0, 1.0) as f32
    }
}

/// Horizontal position of sample `index` out of `len`, right-aligned so the
/// newest sample always sits on the right edge.
fn x_for(index: usize, len: usize, capacity: usize, width: f32) -> f32 {
    let step = width / capacity.saturating_sub(1).max(1) as f32;
    width - (len - 1 - index) as f32 * step
}

struct ChartProgram<'a> {
    samples:  &'a [f64],
    capacity: usize,
    kind:     MetricKind,
    mode:     LabelMode,
    style:    ChartStyle,
}

impl ChartProgram<'_> {
    fn line_color(&self, value: f64) -> iced::Color {
        match self.kind {
            MetricKind::Cpu => pressure_color(value).to_iced(),
            _ => self.style.line.to_iced(),
        }
    }

    fn draw_grid(&self, frame: &mut Frame, top: f32, height: f32) {
        let width = frame.width();
        for i in 0..=GRID_LINES {
            let y = top + height * i as f32 / GRID_LINES as f32;
            frame.stroke(
                &Path::line(Point::new(0.0, y), Point::new(width, y)),
                Stroke::default().with_color(self.style.grid.to_iced()).with_width(1.0),
            );
        }
    }

    fn draw_placeholder(&self, frame: &mut Frame) {
        let center = frame.center();
        frame.fill_text(Text {
            content:  "waiting for data…".to_string(),
            position: Point::new(center.x - 50.0, center.y - self.style.label_size / 2.0),
            color:    self.style.label.to_iced(),
            size:     Pixels(self.style.label_size),
            ..Text::default()
        });
    }
}

impl<Message> canvas::Program<Message> for ChartProgram<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        let label_room = if self.mode.shows_labels() { self.style.label_size + 4.0 } else { 2.0 };
        let top = label_room;
        let height = (frame.height() - top - 2.0).max(1.0);
        self.draw_grid(&mut frame, top, height);

        if self.samples.is_empty() {
            self.draw_placeholder(&mut frame);
            return vec![frame.into_geometry()];
        }

        let scale = Scale::for_samples(self.kind, self.samples);
        let len = self.samples.len();
        let width = frame.width();
        let points: Vec<Point> = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let x = x_for(i, len, self.capacity, width);
                Point::new(x, top + height * (1.0 - scale.fraction(v)))
            })
            .collect();

        // Each segment takes the colour of the sample it ends on.
        for (pair, &value) in points.windows(2).zip(&self.samples[1..]) {
            frame.stroke(
                &Path::line(pair[0], pair[1]),
                Stroke::default()
                    .with_color(self.line_color(value))
                    .with_width(self.style.line_width),
            );
        }

        for (point, &value) in points.iter().zip(self.samples) {
            frame.fill(&Path::circle(*point, self.style.line_width + 0.5), self.line_color(value));

            if self.mode.shows_labels() {
                frame.fill_text(Text {
                    content:  format_value(self.kind, value),
                    position: Point::new(point.x - self.style.label_size, point.y - label_room),
                    color:    self.style.label.to_iced(),
                    size:     Pixels(self.style.label_size),
                    ..Text::default()
                });
            }
        }

        vec![frame.into_geometry()]
    }
}
