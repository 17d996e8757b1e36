//! Parser for ffmpeg's `-progress` key=value stream

/// Snapshot of one progress block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeProgress {
    pub frame: Option<u64>,
    /// Output position, `HH:MM:SS` without the fractional part
    pub out_time: Option<String>,
    /// Encoding speed, e.g. `1.5x`
    pub speed: Option<String>,
    /// The block ended with `progress=end`
    pub finished: bool,
}

/// Accumulates key=value lines until a `progress=` line closes the block
#[derive(Debug, Default)]
pub struct ProgressParser {
    current: EncodeProgress,
    blocks: u32,
}

impl ProgressParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line; returns a snapshot when a block is complete
    pub fn feed(&mut self, line: &str) -> Option<EncodeProgress> {
        let (key, value) = line.trim().split_once('=')?;
        let value = value.trim();

        match key {
            "frame" => self.current.frame = value.parse().ok(),
            "out_time" => {
                let trimmed = value.rsplit_once('.').map(|(whole, _)| whole).unwrap_or(value);
                self.current.out_time = Some(trimmed.to_string());
            }
            "speed" => self.current.speed = Some(value.to_string()),
            "progress" => {
                self.blocks += 1;
                self.current.finished = value == "end";
                return Some(self.current.clone());
            }
            _ => {}
        }

        None
    }

    /// Number of completed blocks seen so far
    pub fn blocks(&self) -> u32 {
        self.blocks
    }
}
