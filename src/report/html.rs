//! HTML page rendering

use std::fmt::Write;

use crate::config::ReportSettings;
use crate::rating::Standing;
use crate::report::summary::RoundSummary;
use crate::utils::{escape_html, format_delta, format_score, round_to};

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; width: 100%; margin-bottom: 1.5em; }
th, td { border: 1px solid #999; padding: 4px 8px; text-align: left; }
th { background: #eee; }
.up { color: #2ca02c; }
.down { color: #d62728; }
";

/// Render the full report page
pub fn render_html(
    settings: &ReportSettings,
    standings: &[Standing],
    summaries: &[RoundSummary],
) -> String {
    let title = escape_html(&settings.title);
    let mut html = String::new();

    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html lang=\"en\">");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>{}</title>", title);
    let _ = writeln!(html, "<style>\n{}</style>", STYLE);
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    let _ = writeln!(html, "<h1>{}</h1>", title);

    html.push_str(&render_standings(standings));

    if !summaries.is_empty() {
        let _ = writeln!(html, "<h2>Recent Rounds</h2>");
        for summary in summaries {
            html.push_str(&render_round(summary));
        }
    }

    let _ = writeln!(html, "<h2>Ratings Change Over Time</h2>");
    let _ = writeln!(
        html,
        "<img src=\"{}\" alt=\"Rating history chart\">",
        escape_html(&settings.chart_file)
    );
    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");
    html
}

/// Standings table: rank, player, rating, record, win percentage
pub fn render_standings(standings: &[Standing]) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<table>");
    let _ = writeln!(
        html,
        "<tr><th>Rank</th><th>Player</th><th>Rating</th><th>Record</th><th>Win %</th></tr>"
    );
    for standing in standings {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{:.1}</td><td>{}</td><td>{:.3}</td></tr>",
            standing.rank,
            escape_html(&standing.player),
            round_to(standing.rating, 1),
            standing.record,
            round_to(standing.win_percentage, 3)
        );
    }
    let _ = writeln!(html, "</table>");
    html
}

fn render_round(summary: &RoundSummary) -> String {
    let metadata = &summary.metadata;
    let mut html = String::new();

    let mut heading = format!("Round {}", summary.number);
    if let Some(date) = metadata.date {
        let _ = write!(heading, ": {}", date.format("%B %-d, %Y"));
    }
    if let Some(course) = &metadata.course {
        let _ = write!(heading, " at {}", course);
    }
    let _ = writeln!(html, "<h3>{}</h3>", escape_html(&heading));

    let conditions: Vec<String> = [
        ("Temperature", &metadata.temperature),
        ("Wind", &metadata.wind),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
    .collect();
    if !conditions.is_empty() {
        let _ = writeln!(html, "<p>{}</p>", escape_html(&conditions.join(", ")));
    }

    let _ = writeln!(html, "<table>");
    let _ = writeln!(
        html,
        "<tr><th>Player</th><th>Score</th><th>Rating</th><th>Change</th></tr>"
    );
    for entry in &summary.entries {
        let class = if round_to(entry.delta, 1) > 0.0 {
            " class=\"up\""
        } else if round_to(entry.delta, 1) < 0.0 {
            " class=\"down\""
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{:.1}</td><td{}>{}</td></tr>",
            escape_html(&entry.player),
            format_score(entry.score),
            round_to(entry.rating, 1),
            class,
            format_delta(entry.delta)
        );
    }
    let _ = writeln!(html, "</table>");
    html
}
