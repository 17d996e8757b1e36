//! FFmpeg execution adapter
//!
//! Frame extraction, composite encodes, audio replacement and the
//! silence/scene detectors all run through the `ffmpeg` binary. Detector
//! results are read back from stderr, decoded audio from stdout.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::adapters::exec_tool::{check_status, run_captured, spawn_error};
use crate::domain::model::*;
use crate::domain::rules::{
    audio_offset_filter, parse_scene_times, parse_silences, pcm_s16le_samples, scene_filter,
    silence_filter,
};
use crate::error::QuadResult;
use crate::ports::{AudioPort, EncodePort};

pub mod progress;

use progress::ProgressParser;

/// Interval between progress log lines during an encode
const PROGRESS_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Width of extracted preview frames
const PREVIEW_WIDTH: u32 = 1280;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    program: String,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter for the given binary
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-hide_banner").stdin(Stdio::null());
        cmd
    }

    /// Arguments after `-hide_banner` for a composite encode
    pub fn composite_args(job: &CompositeJob) -> Vec<String> {
        let settings = &job.settings;
        vec![
            "-y".to_string(),
            "-nostats".to_string(),
            "-progress".to_string(),
            "pipe:1".to_string(),
            "-i".to_string(),
            job.input.to_string_lossy().to_string(),
            "-i".to_string(),
            job.background.to_string_lossy().to_string(),
            "-filter_complex".to_string(),
            job.filter_graph.clone(),
            "-map".to_string(),
            "[outv]".to_string(),
            "-map".to_string(),
            "0:a?".to_string(),
            "-c:v".to_string(),
            settings.codec.clone(),
            "-crf".to_string(),
            settings.crf.to_string(),
            "-preset".to_string(),
            settings.preset.clone(),
            "-threads".to_string(),
            settings.threads.to_string(),
            "-c:a".to_string(),
            "copy".to_string(),
            job.output.to_string_lossy().to_string(),
        ]
    }

    /// Arguments after `-hide_banner` for decoding mono PCM to stdout
    pub fn pcm_args(input: &Path, seconds: u32, sample_rate: u32) -> Vec<String> {
        vec![
            "-nostats".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-t".to_string(),
            seconds.to_string(),
            "-vn".to_string(),
            "-ac".to_string(),
            "1".to_string(),
            "-ar".to_string(),
            sample_rate.to_string(),
            "-f".to_string(),
            "s16le".to_string(),
            "-".to_string(),
        ]
    }

    /// Arguments after `-hide_banner` for swapping in a shifted audio track
    pub fn replace_audio_args(job: &AudioSyncJob) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-nostats".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            job.video.to_string_lossy().to_string(),
            "-i".to_string(),
            job.audio.to_string_lossy().to_string(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-map".to_string(),
            "1:a:0".to_string(),
            "-af".to_string(),
            audio_offset_filter(job.offset_seconds),
            "-c:v".to_string(),
            "copy".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-shortest".to_string(),
            job.output.to_string_lossy().to_string(),
        ]
    }

    /// Run a detector pass and hand back its stderr
    async fn analyse(&self, input: &Path, filter_flag: &str, filter: &str) -> QuadResult<String> {
        let mut cmd = self.command();
        cmd.arg("-nostats")
            .arg("-i")
            .arg(input)
            .arg(filter_flag)
            .arg(filter)
            .args(["-f", "null", "-"]);

        let output = run_captured(&self.program, &mut cmd).await?;
        Ok(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

impl Default for FFmpegAdapter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl EncodePort for FFmpegAdapter {
    async fn extract_frame(&self, input: &Path, at_seconds: f64, output: &Path) -> QuadResult<()> {
        info!(
            "Extracting frame at {:.3}s from {} to {}",
            at_seconds,
            input.display(),
            output.display()
        );

        let mut cmd = self.command();
        cmd.args(["-loglevel", "error", "-y"])
            .arg("-ss")
            .arg(format!("{:.3}", at_seconds))
            .arg("-i")
            .arg(input)
            .args(["-frames:v", "1"])
            .arg("-vf")
            .arg(format!("scale={}:-1", PREVIEW_WIDTH))
            .args(["-q:v", "5"])
            .arg(output);

        run_captured(&self.program, &mut cmd).await?;
        Ok(())
    }

    async fn composite(&self, job: &CompositeJob) -> QuadResult<()> {
        debug!("Filter graph: {}", job.filter_graph);

        let mut child = self
            .command()
            .args(Self::composite_args(job))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(&self.program, e))?;

        // Drain stderr concurrently so a chatty encoder never blocks on a full pipe
        let stderr_task = child.stderr.take().map(|stderr| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = BufReader::new(stderr).read_to_string(&mut buf).await;
                buf
            })
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            let mut parser = ProgressParser::new();
            let mut last_log = Instant::now();

            while let Some(line) = lines.next_line().await? {
                if let Some(snapshot) = parser.feed(&line) {
                    if snapshot.finished || last_log.elapsed() >= PROGRESS_LOG_INTERVAL {
                        info!(
                            frame = ?snapshot.frame,
                            time = snapshot.out_time.as_deref().unwrap_or("-"),
                            speed = snapshot.speed.as_deref().unwrap_or("-"),
                            "Encoding {}",
                            job.output.display()
                        );
                        last_log = Instant::now();
                    }
                }
            }
            debug!("Progress stream closed after {} blocks", parser.blocks());
        } else {
            warn!("No progress stream available from {}", self.program);
        }

        let status = child.wait().await?;
        let stderr = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        check_status(&self.program, status, &stderr)
    }

    async fn detect_silence(
        &self,
        input: &Path,
        params: &SilenceParams,
        duration: Option<f64>,
    ) -> QuadResult<Vec<Silence>> {
        let filter = silence_filter(params);
        info!("Detecting silence in {} ({})", input.display(), filter);

        let stderr = self.analyse(input, "-af", &filter).await?;
        parse_silences(&stderr, duration)
    }

    async fn detect_scenes(&self, input: &Path, params: &SceneParams) -> QuadResult<Vec<f64>> {
        let filter = scene_filter(params);
        info!("Detecting scene changes in {} ({})", input.display(), filter);

        let stderr = self.analyse(input, "-filter:v", &filter).await?;
        parse_scene_times(&stderr)
    }
}

#[async_trait]
impl AudioPort for FFmpegAdapter {
    async fn decode_audio(&self, input: &Path, seconds: u32, sample_rate: u32) -> QuadResult<Vec<f32>> {
        debug!("Decoding {}s of audio from {} at {} Hz", seconds, input.display(), sample_rate);

        let mut cmd = self.command();
        cmd.args(Self::pcm_args(input, seconds, sample_rate));

        let output = run_captured(&self.program, &mut cmd).await?;
        Ok(pcm_s16le_samples(&output.stdout))
    }

    async fn replace_audio(&self, job: &AudioSyncJob) -> QuadResult<()> {
        info!(
            "Replacing audio of {} with {} ({:+.3}s)",
            job.video.display(),
            job.audio.display(),
            job.offset_seconds
        );

        let mut cmd = self.command();
        cmd.args(Self::replace_audio_args(job));
        run_captured(&self.program, &mut cmd).await?;
        Ok(())
    }
}
