use std::io::IsTerminal;
use std::time::Duration;

use crossterm::style::{Color, Stylize};

const BANNER_LINES: [&str; 6] = [
    r" _              __  __ _                        ",
    r"| |_ _ __ __ _ / _|/ _(_) ___ __ _  ___ _ __    ",
    r"| __| '__/ _` | |_| |_| |/ __/ _` |/ _ \ '_ \   ",
    r"| |_| | | (_| |  _|  _| | (_| (_| |  __/ | | |  ",
    r" \__|_|  \__,_|_| |_| |_|\___\__, |\___|_| |_|  ",
    r"                             |___/              ",
];

const COLOR_START: (u8, u8, u8) = (0x2e, 0xc4, 0xb6);
const COLOR_MID: (u8, u8, u8) = (0x3a, 0xa9, 0xff);
const COLOR_END: (u8, u8, u8) = (0x80, 0x4c, 0xff);
const SUBTITLE_RGB: (u8, u8, u8) = (0x3a, 0xa9, 0xff);

const RULE: &str = "----------------------------------------";

pub fn print_cli_banner(no_color: bool) {
    let use_color = !no_color && std::io::stdout().is_terminal();
    let denom = BANNER_LINES.len().saturating_sub(1);
    for (idx, line) in BANNER_LINES.iter().enumerate() {
        if use_color {
            let (r, g, b) = tri_gradient_rgb(COLOR_START, COLOR_MID, COLOR_END, idx, denom);
            println!("{}", line.with(Color::Rgb { r, g, b }));
        } else {
            println!("{line}");
        }
    }

    let description = format!(
        "trafficgen v{} | {} | synthetic traffic",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_LICENSE")
    );
    if use_color {
        println!(
            "{}",
            description.with(Color::Rgb {
                r: SUBTITLE_RGB.0,
                g: SUBTITLE_RGB.1,
                b: SUBTITLE_RGB.2
            })
        );
    } else {
        println!("{description}");
    }
}

#[must_use]
pub fn startup_lines(
    base_url: &str,
    concurrency: usize,
    report_interval: Duration,
    batch_delay: Duration,
) -> Vec<String> {
    vec![
        format!("Starting continuous traffic generator targeting: {}", base_url),
        format!("Using concurrency level of {}", concurrency),
        format!(
            "Will report statistics every {} seconds",
            report_interval.as_secs()
        ),
        format!("Pausing {}ms between batches", batch_delay.as_millis()),
        "Press Ctrl+C to stop the traffic generator".to_owned(),
        RULE.to_owned(),
    ]
}

fn gradient_rgb(start: (u8, u8, u8), end: (u8, u8, u8), idx: usize, denom: usize) -> (u8, u8, u8) {
    let denom = denom.max(1) as i32;
    let idx = idx.min(usize::try_from(denom).unwrap_or(0)) as i32;
    let lerp = |a: u8, b: u8| -> u8 {
        let a = i32::from(a);
        let b = i32::from(b);
        let value = b
            .checked_sub(a)
            .and_then(|delta| delta.checked_mul(idx))
            .and_then(|scaled| scaled.checked_div(denom))
            .and_then(|step| a.checked_add(step))
            .unwrap_or(a);
        u8::try_from(value.clamp(0, 255)).unwrap_or(0)
    };
    (
        lerp(start.0, end.0),
        lerp(start.1, end.1),
        lerp(start.2, end.2),
    )
}

fn tri_gradient_rgb(
    start: (u8, u8, u8),
    mid: (u8, u8, u8),
    end: (u8, u8, u8),
    idx: usize,
    denom: usize,
) -> (u8, u8, u8) {
    let denom = denom.max(1);
    let half = denom / 2;
    if idx <= half {
        gradient_rgb(start, mid, idx, half)
    } else {
        gradient_rgb(
            mid,
            end,
            idx.saturating_sub(half),
            denom.saturating_sub(half),
        )
    }
}
