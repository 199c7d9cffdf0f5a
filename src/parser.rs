use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

static RE_FRAME: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^Frame:\s*(\d+)").unwrap()
});

// "- AI3NRU\t confidence: 82.6628"
static RE_PLATE: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^\s*-\s*([A-Z0-9]+)\s+confidence:\s*(\d+(?:\.\d+)?)").unwrap()
});

#[derive(Debug, Error)]
pub enum LogError {
    #[error("log file '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("error reading log file '{}': {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LogError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            LogError::NotFound(path.to_path_buf())
        } else {
            LogError::Read { path: path.to_path_buf(), source }
        }
    }
}

/// One OCR reading of a plate at a specific frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateEvent {
    pub frame_number: u64,
    pub plate_text: String,
    pub confidence: f64,
}

/// Fold state threaded through the parse: the most recent frame marker seen.
///
/// Plate lines that arrive before any marker are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameState {
    pub current_frame: Option<u64>,
}

impl FrameState {
    pub fn new() -> Self { Self::default() }

    /// Consume one raw log line, updating the current frame or yielding an event.
    pub fn step(&mut self, line: &str) -> Option<PlateEvent> {
        let line = line.trim();
        if let Some(caps) = RE_FRAME.captures(line) {
            match caps[1].parse::<u64>() {
                Ok(n) => self.current_frame = Some(n),
                Err(_) => debug!(line, "frame number out of range; line ignored"),
            }
            return None;
        }
        let caps = RE_PLATE.captures(line)?;
        let frame_number = self.current_frame?;
        let confidence = caps[2].parse::<f64>().ok()?;
        Some(PlateEvent { frame_number, plate_text: caps[1].to_string(), confidence })
    }
}

/// Lazily turns a stream of lines into plate events.
pub struct EventParser<I> {
    lines: I,
    state: FrameState,
}

impl<I> EventParser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Self { lines, state: FrameState::new() }
    }
}

impl<I> Iterator for EventParser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = PlateEvent;

    fn next(&mut self) -> Option<PlateEvent> {
        for line in self.lines.by_ref() {
            if let Some(ev) = self.state.step(line.as_ref()) {
                return Some(ev);
            }
        }
        None
    }
}

pub fn parse_lines<I>(lines: I) -> EventParser<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    EventParser::new(lines.into_iter())
}

/// Parse every event from a reader. Any read failure discards the events collected so far.
pub fn parse_reader<R: BufRead>(reader: R) -> io::Result<Vec<PlateEvent>> {
    let mut state = FrameState::new();
    let mut out = Vec::new();
    for line in reader.lines() {
        let l = line?;
        if let Some(ev) = state.step(&l) { out.push(ev); }
    }
    Ok(out)
}

pub fn read_log(path: &Path) -> Result<Vec<PlateEvent>, LogError> {
    let f = File::open(path).map_err(|e| LogError::from_io(path, e))?;
    let events = parse_reader(BufReader::new(f)).map_err(|e| LogError::from_io(path, e))?;
    debug!(path = %path.display(), events = events.len(), "parsed plate log");
    Ok(events)
}
