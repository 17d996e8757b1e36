// Business rules - filter construction and tool output interpretation

use std::path::Path;

use regex::Regex;

use crate::domain::model::*;
use crate::error::{QuadError, QuadResult};

#[cfg(test)]
mod tests;

/// Build the composite filter graph.
///
/// Input 0 is the 4-up recording, input 1 the background image. The slides
/// quadrant is scaled to `layout.main` and centred on the background; the
/// presenter quadrant becomes a picture-in-picture in the bottom-right corner.
pub fn build_filter_graph(presenter: CropRect, slides: CropRect, layout: &Layout) -> String {
    let canvas = layout.canvas;
    let main = layout.main;
    let margin = layout.margin;

    [
        format!("[1:v]scale={}:{}[bg]", canvas.width, canvas.height),
        format!("[0:v]crop={}[slides_cropped]", slides),
        format!("[slides_cropped]scale={}:{}[slides]", main.width, main.height),
        format!("[0:v]crop={}[presenter_raw]", presenter),
        format!("[presenter_raw]scale=-1:{}[presenter]", layout.pip_height),
        "[bg][slides]overlay=(W-w)/2:(H-h)/2[base]".to_string(),
        format!(
            "[base][presenter]overlay=x=W-w-{}:y=H-h-{}[outv]",
            margin, margin
        ),
    ]
    .join("; ")
}

/// Video filter for scene-change detection, optionally restricted to a crop box
pub fn scene_filter(params: &SceneParams) -> String {
    let select = format!("select='gt(scene,{})',showinfo", params.threshold);
    match params.crop {
        Some(rect) => format!("crop={},{}", rect, select),
        None => select,
    }
}

/// Audio filter for silence detection
pub fn silence_filter(params: &SilenceParams) -> String {
    format!(
        "silencedetect=noise={}dB:d={}",
        params.noise_db, params.min_gap
    )
}

fn compile(pattern: &str) -> QuadResult<Regex> {
    Regex::new(pattern).map_err(|e| QuadError::ToolOutput {
        tool: "ffmpeg".to_string(),
        message: format!("bad pattern {}: {}", pattern, e),
    })
}

/// Collect silences reported by ffmpeg's silencedetect filter.
///
/// A trailing `silence_start` without a matching end runs to `duration` when
/// it is known and is dropped otherwise. Starts are clamped at zero.
pub fn parse_silences(stderr: &str, duration: Option<f64>) -> QuadResult<Vec<Silence>> {
    let start_re = compile(r"silence_start:\s*(-?[0-9]+(?:\.[0-9]+)?(?:[eE][-+]?[0-9]+)?)")?;
    let end_re = compile(r"silence_end:\s*(-?[0-9]+(?:\.[0-9]+)?(?:[eE][-+]?[0-9]+)?)")?;

    let mut silences = Vec::new();
    let mut open: Option<f64> = None;

    for line in stderr.lines() {
        if let Some(caps) = start_re.captures(line) {
            let start: f64 = caps[1].parse().unwrap_or(0.0);
            open = Some(start.max(0.0));
        } else if let Some(caps) = end_re.captures(line) {
            let end: f64 = caps[1].parse().unwrap_or(0.0);
            let start = open.take().unwrap_or(0.0);
            if end > start {
                silences.push(Silence { start, end });
            }
        }
    }

    if let (Some(start), Some(end)) = (open, duration) {
        if end > start {
            silences.push(Silence { start, end });
        }
    }

    Ok(silences)
}

/// Collect `pts_time` values from showinfo lines, in order of appearance
pub fn parse_scene_times(stderr: &str) -> QuadResult<Vec<f64>> {
    let pts_re = compile(r"pts_time:\s*(-?[0-9]+(?:\.[0-9]+)?(?:[eE][-+]?[0-9]+)?)")?;

    Ok(stderr
        .lines()
        .filter(|line| line.contains("showinfo"))
        .filter_map(|line| pts_re.captures(line))
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .map(|t| t.max(0.0))
        .collect())
}

/// Non-silent spans of `[0, duration]` between the given silences
pub fn talk_segments(silences: &[Silence], duration: f64) -> Vec<Segment> {
    let mut sorted = silences.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut segments = Vec::new();
    let mut cursor = 0.0_f64;

    for silence in &sorted {
        let end = silence.start.min(duration);
        if end > cursor {
            segments.push(Segment { start: cursor, end });
        }
        cursor = cursor.max(silence.end);
    }

    if duration > cursor {
        segments.push(Segment {
            start: cursor,
            end: duration,
        });
    }

    segments
}

/// Output file name for a tagged video: same stem, `.mp4` extension
pub fn output_name_for(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string());
    format!("{}.mp4", stem)
}

/// Output file name for a video whose audio was replaced: `<stem>_synced.mp4`
pub fn synced_name_for(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string());
    format!("{}_synced.mp4", stem)
}

/// Envelope frames per second used when correlating audio
pub const ENVELOPE_RATE: u32 = 100;

/// Decode raw little-endian signed 16-bit PCM; a dangling odd byte is ignored
pub fn pcm_s16le_samples(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect()
}

/// Mean absolute amplitude of consecutive `window`-sample blocks.
/// A trailing partial block is dropped.
pub fn energy_envelope(samples: &[f32], window: usize) -> Vec<f32> {
    let window = window.max(1);
    samples
        .chunks_exact(window)
        .map(|block| block.iter().map(|s| s.abs()).sum::<f32>() / window as f32)
        .collect()
}

fn standardize(samples: &[f32]) -> Vec<f64> {
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / n;
    let variance = samples.iter().map(|&s| (s as f64 - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt() + 1e-10;
    samples.iter().map(|&s| (s as f64 - mean) / std).collect()
}

/// Full cross-correlation of two standardized signals.
///
/// For every lag the sum of `reference[n + lag] * candidate[n]` over the
/// overlap is taken; the lag with the largest absolute sum wins, the first
/// one on ties. The score is that peak divided by the reference length.
/// Returns `None` when either signal is empty.
pub fn cross_correlate(reference: &[f32], candidate: &[f32]) -> Option<Alignment> {
    if reference.is_empty() || candidate.is_empty() {
        return None;
    }

    let reference = standardize(reference);
    let candidate = standardize(candidate);
    let ref_len = reference.len() as i64;
    let cand_len = candidate.len() as i64;

    let mut best_lag = -(cand_len - 1);
    let mut best_peak = f64::NEG_INFINITY;
    for lag in -(cand_len - 1)..ref_len {
        let first = (-lag).max(0);
        let last = cand_len.min(ref_len - lag);
        let sum: f64 = (first..last)
            .map(|n| reference[(n + lag) as usize] * candidate[n as usize])
            .sum();
        if sum.abs() > best_peak {
            best_peak = sum.abs();
            best_lag = lag;
        }
    }

    Some(Alignment {
        lag: best_lag,
        score: best_peak / ref_len as f64,
    })
}

/// Audio filter that moves an external recording by `offset_seconds`.
///
/// Positive offsets delay every channel; negative ones trim the start and
/// rebase the timestamps so the trimmed audio begins at zero.
pub fn audio_offset_filter(offset_seconds: f64) -> String {
    if offset_seconds >= 0.0 {
        let millis = (offset_seconds * 1000.0).round() as u64;
        format!("adelay={}:all=1", millis)
    } else {
        format!("atrim=start={:.3},asetpts=PTS-STARTPTS", -offset_seconds)
    }
}

/// Keep the tail of a tool's stderr for error reports
pub fn stderr_tail(stderr: &str, max_chars: usize) -> String {
    let trimmed = stderr.trim_end();
    let count = trimmed.chars().count();
    if count <= max_chars {
        trimmed.to_string()
    } else {
        trimmed.chars().skip(count - max_chars).collect()
    }
}
