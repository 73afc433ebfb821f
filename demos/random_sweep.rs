use rand::Rng;
use speedview::{Color, GaugeConfig, LabelFormatter, SpeedView, SpeedViewCommand};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Font path is optional; without one the dial is drawn unlabeled
    let font_data = std::env::var("SPEEDVIEW_FONT")
        .ok()
        .and_then(|path| std::fs::read(path).ok());

    let config = GaugeConfig::builder()
        .max_value(240.0)
        .major_step(40.0)
        .minor_ticks_per_major(3)
        .label_formatter(LabelFormatter::integer())
        .maybe_font_data(font_data)
        .build();

    let mut gauge = SpeedView::new(config)?;
    gauge.add_colored_range(0.0, 160.0, Color::new(0x2e, 0xcc, 0x71))?;
    gauge.add_colored_range(160.0, 200.0, Color::new(0xf1, 0xc4, 0x0f))?;
    gauge.add_colored_range(200.0, 250.0, Color::new(0xe7, 0x4c, 0x3c))?;

    // Create a channel for sending random commands
    let (sender, receiver) = mpsc::channel();

    // Spawn a thread to generate random targets continuously
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let command = SpeedViewCommand::AnimateTo {
                target: rng.random_range(1.0..240.0),
                duration_ms: rng.random_range(300..1500),
                delay_ms: 0,
            };
            if sender.send(command).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(rng.random_range(800..2000)));
        }
    });

    println!("Displaying a gauge sweeping to random targets");
    println!("Set SPEEDVIEW_FONT to a .ttf file to draw tick labels");
    println!("Press Ctrl+C to exit");

    gauge.show_with_commands(receiver)
}
