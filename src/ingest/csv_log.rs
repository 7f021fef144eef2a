//! CSV round log reader
//!
//! Expected layout (one row per round, oldest first):
//! - Optional metadata columns: `Date`, `Course`, `Temp`/`Temperature`, `Wind`
//! - One column per player holding that player's score
//!
//! A blank cell or `-` means the player sat the round out. With a fixed
//! roster, columns that are neither metadata nor a rostered player are
//! ignored.

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{RatingError, Result};
use crate::types::{PlayerId, Round, RoundMetadata};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M"];

/// Rounds read from a log together with the roster they are rated against
#[derive(Debug, Clone, PartialEq)]
pub struct RoundLog {
    pub players: Vec<PlayerId>,
    pub rounds: Vec<Round>,
}

#[derive(Debug, Clone, PartialEq)]
enum Column {
    Date,
    Course,
    Temperature,
    Wind,
    Player(PlayerId),
    Ignored,
}

impl Column {
    fn from_header(header: &str, roster: &[PlayerId]) -> Self {
        let name = header.trim();
        match name.to_lowercase().as_str() {
            "date" => Column::Date,
            "course" => Column::Course,
            "temp" | "temperature" => Column::Temperature,
            "wind" => Column::Wind,
            "" => Column::Ignored,
            _ if !roster.is_empty() && !roster.iter().any(|player| player == name) => {
                debug!("Ignoring round log column {} (not on the roster)", name);
                Column::Ignored
            }
            _ => Column::Player(name.to_string()),
        }
    }
}

/// Read a round log from a CSV file
///
/// # Arguments
/// * `path` - CSV export of the round log
/// * `roster` - Fixed roster; when empty the player columns become the roster
pub fn read_round_log(path: &Path, roster: &[PlayerId]) -> Result<RoundLog> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open round log: {}", path.display()))?;
    let log = parse_round_log(file, roster)
        .with_context(|| format!("Failed to read round log: {}", path.display()))?;

    info!(
        "Loaded {} rounds for {} players from {}",
        log.rounds.len(),
        log.players.len(),
        path.display()
    );
    Ok(log)
}

/// Parse a round log from any CSV source
pub fn parse_round_log<R: Read>(source: R, roster: &[PlayerId]) -> Result<RoundLog> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let columns: Vec<Column> = reader
        .headers()
        .context("Failed to read round log header")?
        .iter()
        .map(|header| Column::from_header(header, roster))
        .collect();

    let mut header_players: Vec<PlayerId> = Vec::new();
    for column in &columns {
        if let Column::Player(player) = column {
            if header_players.contains(player) {
                return Err(RatingError::DuplicateColumn {
                    column: player.clone(),
                }
                .into());
            }
            header_players.push(player.clone());
        }
    }

    let players = if roster.is_empty() {
        header_players
    } else {
        roster.to_vec()
    };
    if players.is_empty() {
        return Err(RatingError::EmptyRoster.into());
    }

    let mut rounds = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV row {}", line + 2))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            debug!("Skipping blank row {}", line + 2);
            continue;
        }

        let number = rounds.len() + 1;
        if record.iter().skip(columns.len()).any(|cell| !cell.is_empty()) {
            return Err(RatingError::InvalidMetadata {
                round: number,
                reason: format!(
                    "row {} has {} cells but the header has {}",
                    line + 2,
                    record.len(),
                    columns.len()
                ),
            }
            .into());
        }
        rounds.push(parse_round(number, &columns, &record)?);
    }

    Ok(RoundLog { players, rounds })
}

fn parse_round(number: usize, columns: &[Column], record: &csv::StringRecord) -> Result<Round> {
    let mut metadata = RoundMetadata::default();
    let mut scores = Vec::new();

    for (index, column) in columns.iter().enumerate() {
        let cell = record.get(index).unwrap_or("").trim();

        match column {
            Column::Date => metadata.date = parse_date(number, cell)?,
            Column::Course => metadata.course = non_empty(cell),
            Column::Temperature => metadata.temperature = non_empty(cell),
            Column::Wind => metadata.wind = non_empty(cell),
            Column::Player(player) => {
                if let Some(score) = parse_score(number, player, cell)? {
                    scores.push((player.clone(), score));
                }
            }
            Column::Ignored => {}
        }
    }

    Ok(Round {
        number,
        metadata,
        scores,
    })
}

fn non_empty(cell: &str) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Parse a score cell; `None` when the player did not play
pub fn parse_score(round: usize, player: &str, cell: &str) -> Result<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() || cell == "-" {
        return Ok(None);
    }

    match cell.parse::<f64>() {
        Ok(score) if score.is_finite() => Ok(Some(score)),
        _ => Err(RatingError::InvalidScore {
            round,
            player: player.to_string(),
            value: cell.to_string(),
        }
        .into()),
    }
}

/// Parse a date cell in one of the formats spreadsheets commonly export
pub fn parse_date(round: usize, cell: &str) -> Result<Option<NaiveDate>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return Ok(Some(date));
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(cell, format) {
            return Ok(Some(datetime.date()));
        }
    }

    Err(RatingError::InvalidMetadata {
        round,
        reason: format!("unrecognised date {:?}", cell),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
Date,Course,Temp,Wind,Jack,Tanner,Rohan
2023-09-02,Northwestern Park,78,5 mph,54,57,
9/9/2023,Cumberland Park,71,,60,60,58
";

    #[test]
    fn test_parse_round_log() {
        let log = parse_round_log(LOG.as_bytes(), &[]).unwrap();

        assert_eq!(log.players, vec!["Jack", "Tanner", "Rohan"]);
        assert_eq!(log.rounds.len(), 2);

        let first = &log.rounds[0];
        assert_eq!(first.number, 1);
        assert_eq!(first.metadata.date, NaiveDate::from_ymd_opt(2023, 9, 2));
        assert_eq!(first.metadata.course.as_deref(), Some("Northwestern Park"));
        assert_eq!(first.metadata.temperature.as_deref(), Some("78"));
        assert_eq!(first.metadata.wind.as_deref(), Some("5 mph"));
        assert_eq!(first.participant_count(), 2);
        assert_eq!(first.score_of("Rohan"), None);

        let second = &log.rounds[1];
        assert_eq!(second.metadata.date, NaiveDate::from_ymd_opt(2023, 9, 9));
        assert_eq!(second.metadata.wind, None);
        assert_eq!(second.score_of("Rohan"), Some(58.0));
    }

    #[test]
    fn test_roster_from_config() {
        let roster: Vec<PlayerId> = ["Jack", "Tanner", "Rohan", "Nick"]
            .iter()
            .map(|name| name.to_string())
            .collect();
        let log = parse_round_log(LOG.as_bytes(), &roster).unwrap();
        assert_eq!(log.players, roster);
    }

    #[test]
    fn test_column_not_on_roster_ignored() {
        let roster = vec!["Jack".to_string(), "Tanner".to_string()];
        let log = parse_round_log(LOG.as_bytes(), &roster).unwrap();
        assert_eq!(log.players, roster);
        assert_eq!(log.rounds[1].score_of("Rohan"), None);
        assert_eq!(log.rounds[1].participant_count(), 2);
    }

    #[test]
    fn test_notes_column_with_roster() {
        let csv = "Date,Course,Notes,Jack,Tanner\n2023-09-02,Happy Hollow,windy,54,57\n";
        let roster = vec!["Jack".to_string(), "Tanner".to_string()];
        let log = parse_round_log(csv.as_bytes(), &roster).unwrap();

        assert_eq!(log.rounds.len(), 1);
        assert_eq!(log.rounds[0].score_of("Jack"), Some(54.0));
        assert_eq!(log.rounds[0].score_of("Tanner"), Some(57.0));
        assert_eq!(log.rounds[0].participant_count(), 2);
    }

    #[test]
    fn test_row_wider_than_header() {
        let csv = "Jack,Tanner\n54,55\n56,52,58\n";
        let err = parse_round_log(csv.as_bytes(), &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::InvalidMetadata { round: 2, .. })
        ));
    }

    #[test]
    fn test_trailing_empty_cells_allowed() {
        let csv = "Jack,Tanner\n54,55,,\n";
        let log = parse_round_log(csv.as_bytes(), &[]).unwrap();
        assert_eq!(log.rounds[0].participant_count(), 2);
    }

    #[test]
    fn test_duplicate_player_column() {
        let csv = "Date,Jack,Jack\n2023-09-02,54,55\n";
        let err = parse_round_log(csv.as_bytes(), &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_non_numeric_score() {
        let csv = "Jack,Tanner\n54,DNF\n";
        let err = parse_round_log(csv.as_bytes(), &[]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RatingError>(),
            Some(&RatingError::InvalidScore {
                round: 1,
                player: "Tanner".to_string(),
                value: "DNF".to_string()
            })
        );
    }

    #[test]
    fn test_blank_rows_skipped() {
        let csv = "Jack,Tanner\n54,55\n,\n56,52\n";
        let log = parse_round_log(csv.as_bytes(), &[]).unwrap();
        assert_eq!(log.rounds.len(), 2);
        assert_eq!(log.rounds[1].number, 2);
    }

    #[test]
    fn test_parse_score_cells() {
        assert_eq!(parse_score(1, "Jack", "").unwrap(), None);
        assert_eq!(parse_score(1, "Jack", " - ").unwrap(), None);
        assert_eq!(parse_score(1, "Jack", "-3").unwrap(), Some(-3.0));
        assert_eq!(parse_score(1, "Jack", "54.0").unwrap(), Some(54.0));
        assert!(parse_score(1, "Jack", "NaN").is_err());
        assert!(parse_score(1, "Jack", "inf").is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 4, 13);
        assert_eq!(parse_date(1, "2024-04-13").unwrap(), expected);
        assert_eq!(parse_date(1, "4/13/2024").unwrap(), expected);
        assert_eq!(parse_date(1, "2024-04-13 00:00:00").unwrap(), expected);
        assert_eq!(parse_date(1, "").unwrap(), None);
        assert!(parse_date(1, "last tuesday").is_err());
    }

    #[test]
    fn test_read_missing_file() {
        assert!(read_round_log(Path::new("/nonexistent/log.csv"), &[]).is_err());
    }
}
