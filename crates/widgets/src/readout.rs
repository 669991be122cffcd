use graphmon_core::{format::{summary_for, title_for}, MetricKind, SeriesUpdate};
use graphmon_theme::Theme;
use iced::{
    widget::{container, row, text},
    Alignment, Element, Length,
};

/// Latest value in large type, with window average and peak alongside.
///
/// Shows a dimmed `n/a` until the first sample, or when the source had
/// nothing to report.
#[derive(Debug, Default)]
pub struct ReadoutWidget;

impl ReadoutWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view<'a, Message: 'a>(
        &'a self,
        kind: MetricKind,
        latest: Option<&'a SeriesUpdate>,
        paused: bool,
        theme: &'a Theme,
    ) -> Element<'a, Message> {
        let reading = latest.and_then(|u| u.reading);
        let headline = if paused {
            format!("{} (paused)", title_for(kind, reading))
        } else {
            title_for(kind, reading)
        };
        let alpha = if reading.is_some() && !paused { 1.0 } else { 0.5 };

        let detail = latest
            .filter(|u| !u.snapshot.is_empty())
            .map(|u| summary_for(kind, u.average, u.peak))
            .unwrap_or_default();

        row![
            text(headline)
                .size(theme.font_size + 2.0)
                .color(theme.foreground.with_alpha(alpha).to_iced()),
            container(
                text(detail)
                    .size(theme.font_size - 2.0)
                    .color(theme.foreground.with_alpha(0.6).to_iced()),
            )
            .align_right(Length::Fill),
        ]
        .align_y(Alignment::Center)
        .into()
    }
}
