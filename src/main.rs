use speedview::config::{
    DEFAULT_ANIMATION_DELAY_MS, DEFAULT_ANIMATION_DURATION_MS, DEFAULT_MAJOR_STEP,
    DEFAULT_MAX_VALUE, DEFAULT_MINOR_TICKS,
};
use speedview::{GaugeConfig, LabelFormatter, SpeedView, SpeedViewCommand};
use std::env;
use std::io::{self, BufRead};
use std::process;
use std::sync::mpsc;
use std::thread;
use tracing::{error, info, warn};

struct Args {
    max_value: Option<f64>,
    major_step: Option<f64>,
    minor_ticks: Option<u32>,
    title: Option<String>,
    font_path: Option<String>,
    duration_ms: u64,
}

fn parse_args() -> Args {
    let mut parsed = Args {
        max_value: None,
        major_step: None,
        minor_ticks: None,
        title: None,
        font_path: None,
        duration_ms: DEFAULT_ANIMATION_DURATION_MS,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let value = args.next();
        match (arg.as_str(), value) {
            ("--max", Some(v)) => parsed.max_value = v.parse().ok(),
            ("--step", Some(v)) => parsed.major_step = v.parse().ok(),
            ("--minor", Some(v)) => parsed.minor_ticks = v.parse().ok(),
            ("--title", Some(v)) => parsed.title = Some(v),
            ("--font", Some(v)) => parsed.font_path = Some(v),
            ("--duration", Some(v)) => {
                parsed.duration_ms = v.parse().unwrap_or(DEFAULT_ANIMATION_DURATION_MS)
            }
            (other, _) => warn!(argument = other, "ignoring unknown or incomplete argument"),
        }
    }
    parsed
}

fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stdout).with_target(true))
        .init();
}

fn main() {
    init_logging();
    let args = parse_args();

    let font_data = match args.font_path.as_deref().map(std::fs::read) {
        Some(Ok(bytes)) => Some(bytes),
        Some(Err(err)) => {
            error!(%err, "could not read font file");
            process::exit(1);
        }
        None => None,
    };

    let config = GaugeConfig::builder()
        .max_value(args.max_value.unwrap_or(DEFAULT_MAX_VALUE))
        .major_step(args.major_step.unwrap_or(DEFAULT_MAJOR_STEP))
        .minor_ticks_per_major(args.minor_ticks.unwrap_or(DEFAULT_MINOR_TICKS))
        .title(args.title.unwrap_or_else(|| "SpeedView".to_string()))
        .label_formatter(LabelFormatter::integer())
        .maybe_font_data(font_data)
        .build();

    let mut gauge = match SpeedView::new(config) {
        Ok(gauge) => gauge,
        Err(err) => {
            error!(%err, "invalid gauge configuration");
            process::exit(1);
        }
    };

    // One value per stdin line; each line animates the needle to it
    let (sender, receiver) = mpsc::channel();
    let duration_ms = args.duration_ms;
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines().map_while(|line| line.ok()) {
            let Ok(value) = line.trim().parse::<f64>() else {
                warn!(input = line.trim(), "not a number");
                continue;
            };
            let command = if value > 0.0 {
                SpeedViewCommand::AnimateTo {
                    target: value,
                    duration_ms,
                    delay_ms: DEFAULT_ANIMATION_DELAY_MS,
                }
            } else {
                SpeedViewCommand::SetValue(0.0)
            };
            if sender.send(command).is_err() {
                break;
            }
        }
        info!("stdin closed");
    });

    if let Err(err) = gauge.show_with_commands(receiver) {
        error!(%err, "gauge window failed");
        process::exit(1);
    }
}
