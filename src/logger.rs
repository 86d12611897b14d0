//! Per-game event log: one JSONL line per game event, written to a file
//! when the engine was started with a log directory, discarded otherwise.
//!
//! Full clones copy the source game's log history into their own file so
//! a clone's log replays from the very first turn.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::game::score::ScoreReport;
use crate::game::types::{PlacedTile, PlayerId};
use crate::tile::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Start,
    PlaceTile,
    Score,
    FinalScore,
}

#[derive(Serialize)]
struct Record<'a, T: Serialize> {
    event: EventKind,
    content: &'a T,
}

#[derive(Serialize)]
pub struct StartContent<'a> {
    pub starting_tile: &'a Tile,
    pub deck: &'a [Tile],
    pub player_count: usize,
}

#[derive(Serialize)]
pub struct PlaceTileContent<'a> {
    pub player: PlayerId,
    pub tile: &'a PlacedTile,
}

#[derive(Serialize)]
pub struct ScoreContent<'a> {
    pub report: &'a ScoreReport,
}

#[derive(Debug)]
enum Sink {
    Discard,
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
}

#[derive(Debug)]
pub struct GameLog {
    sink: Sink,
}

impl GameLog {
    /// A log that drops everything. Used for plain clones and simulations.
    pub fn discard() -> GameLog {
        GameLog {
            sink: Sink::Discard,
        }
    }

    /// A log appending JSONL records to `path`, creating the file.
    pub fn to_file(path: impl Into<PathBuf>) -> io::Result<GameLog> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(GameLog {
            sink: Sink::File {
                path,
                writer: BufWriter::new(file),
            },
        })
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.sink {
            Sink::Discard => None,
            Sink::File { path, .. } => Some(path),
        }
    }

    /// Appends one event line. Each line is flushed so that clones can
    /// copy the history at any time.
    pub fn log_event<T: Serialize>(&mut self, event: EventKind, content: &T) -> io::Result<()> {
        let Sink::File { writer, .. } = &mut self.sink else {
            return Ok(());
        };
        serde_json::to_writer(&mut *writer, &Record { event, content })?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    /// Copies this log's full history into `other`. A discarding source or
    /// destination makes this a no-op.
    pub fn copy_to(&self, other: &mut GameLog) -> io::Result<()> {
        let Sink::File { path, .. } = &self.sink else {
            return Ok(());
        };
        let Sink::File { writer, .. } = &mut other.sink else {
            return Ok(());
        };
        let history = std::fs::read(path)?;
        writer.write_all(&history)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::templates;

    #[test]
    fn discard_log_accepts_events() {
        let mut log = GameLog::discard();
        let tile = templates::straight_roads();
        log.log_event(
            EventKind::Start,
            &StartContent {
                starting_tile: &tile,
                deck: &[],
                player_count: 2,
            },
        )
        .unwrap();
        assert!(log.path().is_none());
    }

    #[test]
    fn file_log_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.jsonl");
        let mut log = GameLog::to_file(&path).unwrap();

        let tile = templates::straight_roads();
        log.log_event(
            EventKind::Start,
            &StartContent {
                starting_tile: &tile,
                deck: std::slice::from_ref(&tile),
                player_count: 2,
            },
        )
        .unwrap();
        log.log_event(EventKind::Score, &ScoreContent {
            report: &ScoreReport::new(),
        })
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "start");
        assert_eq!(first["content"]["player_count"], 2);
    }

    #[test]
    fn copy_to_replays_history_into_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = GameLog::to_file(dir.path().join("src.jsonl")).unwrap();
        source
            .log_event(EventKind::Score, &ScoreContent {
                report: &ScoreReport::new(),
            })
            .unwrap();

        let target_path = dir.path().join("dst.jsonl");
        let mut target = GameLog::to_file(&target_path).unwrap();
        source.copy_to(&mut target).unwrap();

        let contents = std::fs::read_to_string(&target_path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
