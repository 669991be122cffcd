//! graphmon: a small always-on-top window charting one system metric.
//!
//! Run with:  `RUST_LOG=info graphmon cpu --interval 1`

use anyhow::{Context, Result};
use clap::Parser;
use graphmon_config::{default_path, load as load_config, MonitorConfig};
use graphmon_core::{
    format::{summary_for, title_for},
    MetricKind, MonError, SamplerContext, SeriesUpdate,
};
use graphmon_system::{spawn_sampler, LabelMode, MetricSampler, SysinfoSource};
use graphmon_window::LaunchOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "graphmon", version, about = "Chart one system metric in a small overlay window")]
struct Cli {
    /// Metric to chart: cpu, memory, network, disk, filesystem or systemcalls
    /// (matched loosely, e.g. `ram`, `lan`, `ssd`)
    kind: Option<MetricKind>,
    /// Seconds between samples (0.5 – 60)
    #[arg(long)]
    interval: Option<f64>,
    /// Window position, left edge
    #[arg(long)]
    x: Option<i32>,
    /// Window position, top edge
    #[arg(long)]
    y: Option<i32>,
    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,
    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,
    /// Print one line per sample instead of opening a window
    #[arg(long)]
    console: bool,
    /// Config file (default: $XDG_CONFIG_HOME/graphmon/graphmon.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Command-line values win over the config file.
    fn apply(&self, config: &mut MonitorConfig) {
        if let Some(kind) = self.kind {
            config.sampling.kind = kind;
        }
        if let Some(secs) = self.interval {
            config.sampling.interval_secs = secs;
        }
        if self.x.is_some() || self.y.is_some() {
            config.window.center_screen = false;
        }
        if let Some(x) = self.x {
            config.window.x = x;
        }
        if let Some(y) = self.y {
            config.window.y = y;
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
    }
}

fn main() -> Result<()> {
    // Structured logging. RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_path);
    let mut config = load_config(&config_path).unwrap_or_else(|e| {
        warn!("{e}; using defaults");
        MonitorConfig::default()
    });
    cli.apply(&mut config);

    info!(
        "graphmon v{} starting: {} every {:.1}s",
        env!("CARGO_PKG_VERSION"),
        config.sampling.kind,
        config.sampling.schedule().secs(),
    );

    if cli.console {
        let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
        let result = runtime.block_on(console(config));
        // A stdin read still parked on the blocking pool must not hold up exit.
        runtime.shutdown_background();
        return result;
    }

    graphmon_window::run(LaunchOptions {
        config,
        config_path,
        source: Arc::new(SysinfoSource::new()),
    })
    .map_err(|e| MonError::Window(e.to_string()).into())
}

/// Line commands read from stdin in console mode.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ConsoleCommand {
    /// `p`
    TogglePause,
    /// `i SECS`
    Interval(f64),
    /// `w PX`: size the history as for a chart this wide.
    Width(f32),
    /// `q`
    Quit,
}

impl ConsoleCommand {
    fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match (words.next()?, words.next()) {
            ("p", None) => Self::TogglePause,
            ("q", None) => Self::Quit,
            ("i", Some(secs)) => Self::Interval(secs.parse().ok()?),
            ("w", Some(px)) => Self::Width(px.parse().ok()?),
            _ => return None,
        };
        words.next().is_none().then_some(command)
    }
}

/// `"CPU 42%  avg 30% · peak 55%"`
fn console_line(update: &SeriesUpdate) -> String {
    format!(
        "{}  {}",
        title_for(update.kind, update.reading),
        summary_for(update.kind, update.average, update.peak)
    )
}

/// Headless mode: drive the sampler on a background task and print each
/// update until `q` or Ctrl-C.
async fn console(config: MonitorConfig) -> Result<()> {
    let ctx = SamplerContext {
        kind:           config.sampling.kind,
        schedule:       config.sampling.schedule(),
        display_width:  config.window.width as f32,
        display_height: config.window.height as f32,
    };
    let mode = LabelMode::for_height(ctx.display_height);
    let sampler = MetricSampler::new(&ctx, Arc::new(SysinfoSource::new()));
    let (handle, mut updates) = spawn_sampler(sampler);

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut paused = false;

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(update) => println!("{}", console_line(&update)),
                None => break,
            },
            line = stdin.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match ConsoleCommand::parse(&line) {
                    Some(ConsoleCommand::TogglePause) => {
                        if paused {
                            handle.start().await;
                        } else {
                            handle.stop().await;
                        }
                        paused = !paused;
                        info!("{}", if paused { "Paused" } else { "Resumed" });
                    }
                    Some(ConsoleCommand::Interval(secs)) => {
                        handle.set_interval(secs).await;
                    }
                    Some(ConsoleCommand::Width(px)) => {
                        handle.set_display(px, mode).await;
                    }
                    Some(ConsoleCommand::Quit) => break,
                    None => warn!("Unknown command {line:?}; expected p, i SECS, w PX or q"),
                },
                // EOF or unreadable stdin: keep printing, stop listening.
                Ok(None) | Err(_) => stdin_open = false,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted; stopping");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_parsed_loosely() {
        let cli = Cli::try_parse_from(["graphmon", "RAM", "--interval", "1.5"]).unwrap();
        assert_eq!(cli.kind, Some(MetricKind::Memory));
        assert_eq!(cli.interval, Some(1.5));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["graphmon", "gpu"]).is_err());
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::try_parse_from(["graphmon", "net", "--x", "5", "--width", "640"]).unwrap();
        let mut config = MonitorConfig::default();
        config.window.center_screen = true;
        cli.apply(&mut config);

        assert_eq!(config.sampling.kind, MetricKind::Network);
        assert_eq!(config.window.x, 5);
        assert_eq!(config.window.y, MonitorConfig::default().window.y);
        assert_eq!(config.window.width, 640);
        assert!(!config.window.center_screen);
    }

    #[test]
    fn no_arguments_keep_config() {
        let cli = Cli::try_parse_from(["graphmon"]).unwrap();
        let mut config = MonitorConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn console_commands_parse() {
        assert_eq!(ConsoleCommand::parse("p"), Some(ConsoleCommand::TogglePause));
        assert_eq!(ConsoleCommand::parse("  q "), Some(ConsoleCommand::Quit));
        assert_eq!(ConsoleCommand::parse("i 1.5"), Some(ConsoleCommand::Interval(1.5)));
        assert_eq!(ConsoleCommand::parse("w 800"), Some(ConsoleCommand::Width(800.0)));
    }

    #[test]
    fn malformed_console_commands_are_ignored() {
        for line in ["", "x", "i", "i soon", "w 10 20", "p now"] {
            assert_eq!(ConsoleCommand::parse(line), None, "{line:?}");
        }
    }

    #[test]
    fn console_line_shows_reading_and_window_stats() {
        let update = SeriesUpdate {
            kind:     MetricKind::Cpu,
            reading:  Some(42.0),
            snapshot: Arc::from(vec![18.0, 42.0]),
            capacity: 8,
            average:  30.0,
            peak:     42.0,
        };
        assert_eq!(console_line(&update), "CPU 42%  avg 30% · peak 42%");

        let missing = SeriesUpdate { reading: None, ..update };
        assert_eq!(console_line(&missing), "CPU n/a  avg 30% · peak 42%");
    }
}
