//! SVG line chart of rating histories
//!
//! One line per player, x axis is the round index (0 = starting rating).

use std::fmt::Write;

use crate::rating::RatingRun;
use crate::utils::escape_html;

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 140.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const Y_TICKS: usize = 5;
const MAX_X_LABELS: usize = 12;

// matplotlib's default colour cycle
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

struct Scale {
    rounds: usize,
    min: f64,
    max: f64,
}

impl Scale {
    fn new(run: &RatingRun) -> Self {
        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        for (_, history) in run.histories() {
            for rating in history {
                min = min.min(*rating);
                max = max.max(*rating);
            }
        }
        if !min.is_finite() || !max.is_finite() {
            (min, max) = (0.0, 1.0);
        }
        if max - min < 1.0 {
            min -= 1.0;
            max += 1.0;
        }
        let pad = (max - min) * 0.05;

        Self {
            rounds: run.rounds_processed().max(1),
            min: min - pad,
            max: max + pad,
        }
    }

    fn x(&self, round: usize) -> f64 {
        MARGIN_LEFT + (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) * round as f64 / self.rounds as f64
    }

    fn y(&self, rating: f64) -> f64 {
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        MARGIN_TOP + plot_height * (self.max - rating) / (self.max - self.min)
    }
}

/// Render the rating history of every player as a standalone SVG document
pub fn render_chart_svg(run: &RatingRun, title: &str) -> String {
    let scale = Scale::new(run);
    let mut svg = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
        (MARGIN_LEFT + WIDTH - MARGIN_RIGHT) / 2.0,
        escape_html(title)
    );

    write_axes(&mut svg, &scale);

    for (index, (player, history)) in run.histories().enumerate() {
        let colour = PALETTE[index % PALETTE.len()];
        let points: Vec<String> = history
            .iter()
            .enumerate()
            .map(|(round, rating)| format!("{:.1},{:.1}", scale.x(round), scale.y(*rating)))
            .collect();

        let _ = writeln!(
            svg,
            r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
            colour,
            points.join(" ")
        );
        for (round, rating) in history.iter().enumerate() {
            let _ = writeln!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="{}"><title>{}: {:.1}</title></circle>"#,
                scale.x(round),
                scale.y(*rating),
                colour,
                escape_html(player),
                rating
            );
        }

        let legend_y = MARGIN_TOP + 10.0 + 20.0 * index as f64;
        let legend_x = WIDTH - MARGIN_RIGHT + 20.0;
        let _ = writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="2"/>"#,
            legend_x,
            legend_y,
            legend_x + 20.0,
            legend_y,
            colour
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" dominant-baseline="middle">{}</text>"#,
            legend_x + 26.0,
            legend_y,
            escape_html(player)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn write_axes(svg: &mut String, scale: &Scale) {
    let bottom = HEIGHT - MARGIN_BOTTOM;
    let right = WIDTH - MARGIN_RIGHT;

    let _ = writeln!(
        svg,
        r##"<path d="M{MARGIN_LEFT:.1},{MARGIN_TOP:.1} V{bottom:.1} H{right:.1}" fill="none" stroke="#333"/>"##
    );

    for tick in 0..=Y_TICKS {
        let rating = scale.min + (scale.max - scale.min) * tick as f64 / Y_TICKS as f64;
        let y = scale.y(rating);
        let _ = writeln!(
            svg,
            r##"<line x1="{MARGIN_LEFT:.1}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#ddd"/>"##
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{y:.1}" text-anchor="end" dominant-baseline="middle">{rating:.1}</text>"#,
            MARGIN_LEFT - 6.0
        );
    }

    let step = scale.rounds.div_ceil(MAX_X_LABELS).max(1);
    for round in (0..=scale.rounds).step_by(step) {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{round}</text>"#,
            scale.x(round),
            bottom + 18.0
        );
    }
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">Round</text>"#,
        (MARGIN_LEFT + right) / 2.0,
        HEIGHT - 10.0
    );
}
