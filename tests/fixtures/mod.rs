//! Test fixtures for integration testing

use chrono::NaiveDate;
use disc_golf_ratings::types::{PlayerId, Round, RoundMetadata};

pub const PLAYERS: [&str; 6] = ["Jack", "Tanner", "Rohan", "Nick", "Josh", "Luke"];

/// A season excerpt in the spreadsheet export layout
pub const SEASON_LOG: &str = "\
Date,Course,Temp,Wind,Jack,Tanner,Rohan,Nick,Josh,Luke
2023-09-02,Northwestern Park,78,5,54,57,61,,59,
2023-09-09,Cumberland Park,71,10,60,58,58,63,,
2023-09-16,Northwestern Park,65,12,55,56,,60,57,62
2023-09-23,Happy Hollow,59,3,52,,57,55,55,60
2023-09-30,Cumberland Park,62,8,57,54,59,,61,58
";

pub fn roster() -> Vec<PlayerId> {
    PLAYERS.iter().map(|name| name.to_string()).collect()
}

/// Build a round from `(player, score)` pairs, dated so it can be summarised
pub fn round(number: usize, scores: &[(&str, f64)]) -> Round {
    Round::new(
        number,
        scores
            .iter()
            .map(|(name, score)| (name.to_string(), *score))
            .collect(),
    )
    .with_metadata(RoundMetadata {
        date: NaiveDate::from_ymd_opt(2024, 5, number as u32),
        course: Some("Happy Hollow".to_string()),
        temperature: None,
        wind: None,
    })
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
