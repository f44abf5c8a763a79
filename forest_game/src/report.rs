//! Round-history report export.
//!
//! Renders the participants, the closing comment, and one row per completed
//! round as CSV.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::{game::RoundSnapshot, room::ParticipantInfo};

/// Column headers of the round table.
pub const ROUND_HEADERS: [&str; 10] = [
    "Round",
    "Trees Remaining",
    "P1 Replanted",
    "P2 Replanted",
    "P1 Harvested",
    "P1 Woodcutters",
    "P1 Victory Points",
    "P2 Harvested",
    "P2 Woodcutters",
    "P2 Victory Points",
];

/// Everything needed to export one finished game.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameReport {
    pub participants: [ParticipantInfo; 2],
    pub comment: String,
    pub rounds: Vec<RoundSnapshot>,
}

impl GameReport {
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for (seat, info) in self.participants.iter().enumerate() {
            let title = format!("Player {} Information", seat + 1);
            write_row(&mut out, &[title.as_str()]);
            for (label, value) in info.fields() {
                write_row(&mut out, &[label, value]);
            }
            out.push_str("\r\n");
        }

        write_row(&mut out, &["Comment", self.comment.trim()]);
        out.push_str("\r\n");

        write_row(&mut out, &ROUND_HEADERS);
        for snapshot in &self.rounds {
            let [p1, p2] = &snapshot.players;
            let cells = [
                snapshot.round.to_string(),
                snapshot.trees.to_string(),
                p1.replanted.to_string(),
                p2.replanted.to_string(),
                p1.harvested.to_string(),
                p1.woodcutters.to_string(),
                p1.victory_points.to_string(),
                p2.harvested.to_string(),
                p2.woodcutters.to_string(),
                p2.victory_points.to_string(),
            ];
            let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
            write_row(&mut out, &cells);
        }
        out
    }

    /// Download filename stamped with `now`.
    #[must_use]
    pub fn filename<Tz: TimeZone>(now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("game_log_{}.csv", now.format("%Y%m%d_%H%M%S"))
    }
}

fn write_row(out: &mut String, cells: &[&str]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if cell.contains([',', '"', '\r', '\n']) {
            let _ = write!(out, "\"{}\"", cell.replace('"', "\"\""));
        } else {
            out.push_str(cell);
        }
    }
    out.push_str("\r\n");
}
