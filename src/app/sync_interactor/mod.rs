// Sync interactor - Matches external audio recordings to videos and swaps them in

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::app::{discard_partial, ensure_input};
use crate::domain::model::*;
use crate::domain::rules;
use crate::error::{QuadError, QuadResult};
use crate::ports::*;
use crate::utils::path::{file_name_of, find_audio_files};

/// What happened to one video
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The audio was replaced
    Synced,
    /// A usable match was found and nothing was written
    DryRun,
    /// The best match scored below the threshold
    LowScore,
    NoMatch,
    /// The output already existed
    Skipped,
    /// The processed video was not found
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub name: String,
    pub video: PathBuf,
    pub output: PathBuf,
    pub matched: Option<AudioMatch>,
    pub outcome: SyncOutcome,
}

/// Per-video results of a batch run, in tag-file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncSummary {
    pub entries: Vec<SyncReport>,
}

impl SyncSummary {
    pub fn synced(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Synced))
    }

    pub fn unmatched(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::LowScore | SyncOutcome::NoMatch))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Failed(_) | SyncOutcome::Missing))
    }

    fn count(&self, pred: impl Fn(&SyncOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// An external recording, reduced to its loudness envelope
struct Candidate {
    path: PathBuf,
    envelope: Vec<f32>,
}

/// Interactor for the audio sync use cases
pub struct SyncAudioInteractor {
    audio_port: Arc<dyn AudioPort>,
    store: Arc<dyn TagStorePort>,
    settings: AudioSyncSettings,
}

impl SyncAudioInteractor {
    pub fn new(
        audio_port: Arc<dyn AudioPort>,
        store: Arc<dyn TagStorePort>,
        settings: AudioSyncSettings,
    ) -> Self {
        Self {
            audio_port,
            store,
            settings,
        }
    }

    /// Match one video against every recording in `audio_dir` and, unless
    /// `dry_run` is set, write `output` with the best match as its audio
    pub async fn sync_one(
        &self,
        video: &Path,
        audio_dir: &Path,
        output: &Path,
        dry_run: bool,
    ) -> QuadResult<SyncReport> {
        ensure_input(video)?;
        let candidates = self.load_candidates(audio_dir).await?;

        let (matched, outcome) = self.sync_video(video, &candidates, output, dry_run).await;
        Ok(SyncReport {
            name: file_name_of(video),
            video: video.to_path_buf(),
            output: output.to_path_buf(),
            matched,
            outcome,
        })
    }

    /// Sync every tagged video whose recorded path contains `filter`.
    ///
    /// The video synced for a tag entry is its composited output in
    /// `video_dir`; results go to `output_dir` as `<stem>_synced.mp4`.
    pub async fn run_batch(
        &self,
        filter: &str,
        video_dir: &Path,
        audio_dir: &Path,
        output_dir: &Path,
        dry_run: bool,
    ) -> QuadResult<SyncSummary> {
        if !self.store.exists() {
            return Err(QuadError::TagStore {
                path: self.store.location().display().to_string(),
                message: "no tag file; run `quadcut tag` first".to_string(),
            });
        }

        let tags = self.store.load()?;
        let selected: Vec<(&String, &TagRecord)> = tags
            .iter()
            .filter(|(_, record)| record.path.contains(filter))
            .collect();
        if selected.is_empty() {
            return Err(QuadError::invalid_parameter(
                "filter",
                format!("no tagged video path contains '{}'", filter),
            ));
        }

        let candidates = self.load_candidates(audio_dir).await?;
        if !dry_run {
            std::fs::create_dir_all(output_dir)?;
        }

        let total = selected.len();
        info!(
            "Matching {} video(s) against {} recording(s)",
            total,
            candidates.len()
        );

        let mut summary = SyncSummary::default();
        for (index, (name, _)) in selected.into_iter().enumerate() {
            let video = video_dir.join(rules::output_name_for(name));
            let output = output_dir.join(rules::synced_name_for(name));
            info!("[{}/{}] {}", index + 1, total, name);

            let (matched, outcome) = if !video.is_file() {
                warn!("Processed video not found: {}", video.display());
                (None, SyncOutcome::Missing)
            } else if !dry_run && output.exists() {
                info!("Output {} exists, skipping", output.display());
                (None, SyncOutcome::Skipped)
            } else {
                self.sync_video(&video, &candidates, &output, dry_run).await
            };

            summary.entries.push(SyncReport {
                name: name.clone(),
                video,
                output,
                matched,
                outcome,
            });
        }

        info!(
            "Sync finished: {} synced, {} unmatched, {} failed",
            summary.synced(),
            summary.unmatched(),
            summary.failed()
        );
        Ok(summary)
    }

    async fn sync_video(
        &self,
        video: &Path,
        candidates: &[Candidate],
        output: &Path,
        dry_run: bool,
    ) -> (Option<AudioMatch>, SyncOutcome) {
        let matched = match self.best_match(video, candidates).await {
            Ok(Some(matched)) => matched,
            Ok(None) => {
                warn!("No match found for {}", video.display());
                return (None, SyncOutcome::NoMatch);
            }
            Err(e) => {
                error!("Could not analyse {}: {}", video.display(), e);
                return (None, SyncOutcome::Failed(e.to_string()));
            }
        };

        info!(
            "Match: {} (score {:.4}, offset {:+.2}s)",
            file_name_of(&matched.audio),
            matched.score,
            matched.offset_seconds
        );

        if matched.score < self.settings.min_score {
            warn!(
                "Score {:.4} is below the threshold {}",
                matched.score, self.settings.min_score
            );
            return (Some(matched), SyncOutcome::LowScore);
        }
        if dry_run {
            return (Some(matched), SyncOutcome::DryRun);
        }

        let job = AudioSyncJob {
            video: video.to_path_buf(),
            audio: matched.audio.clone(),
            offset_seconds: matched.offset_seconds,
            output: output.to_path_buf(),
        };
        let outcome = match self.write_synced(&job).await {
            Ok(()) => {
                info!("Output: {}", output.display());
                SyncOutcome::Synced
            }
            Err(e) => {
                error!("Failed to sync {}: {}", video.display(), e);
                discard_partial(output);
                SyncOutcome::Failed(e.to_string())
            }
        };
        (Some(matched), outcome)
    }

    async fn write_synced(&self, job: &AudioSyncJob) -> QuadResult<()> {
        if let Some(parent) = job.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.audio_port.replace_audio(job).await
    }

    /// Best-scoring candidate for `video`; `None` when nothing correlates at all
    async fn best_match(&self, video: &Path, candidates: &[Candidate]) -> QuadResult<Option<AudioMatch>> {
        let samples = self
            .audio_port
            .decode_audio(video, self.settings.analysis_seconds, self.settings.sample_rate)
            .await?;
        let envelope = rules::energy_envelope(&samples, self.window());

        let mut best: Option<AudioMatch> = None;
        for candidate in candidates {
            let Some(alignment) = rules::cross_correlate(&envelope, &candidate.envelope) else {
                continue;
            };
            let offset_seconds = self.offset_seconds(alignment.lag);
            info!(
                "{}: score={:.4}, offset={:+.2}s",
                file_name_of(&candidate.path),
                alignment.score,
                offset_seconds
            );

            let current = best.as_ref().map_or(0.0, |b| b.score);
            if alignment.score > current {
                best = Some(AudioMatch {
                    audio: candidate.path.clone(),
                    offset_seconds,
                    score: alignment.score,
                });
            }
        }

        Ok(best)
    }

    /// Decode every recording under `audio_dir`; unreadable files are skipped
    async fn load_candidates(&self, audio_dir: &Path) -> QuadResult<Vec<Candidate>> {
        if !audio_dir.is_dir() {
            return Err(QuadError::InputFileNotFound {
                path: audio_dir.display().to_string(),
            });
        }

        let files = find_audio_files(audio_dir);
        if files.is_empty() {
            return Err(QuadError::invalid_parameter(
                "audio directory",
                format!("no audio files in {}", audio_dir.display()),
            ));
        }
        info!("Found {} audio file(s) in {}", files.len(), audio_dir.display());

        let seconds = self.settings.analysis_seconds.saturating_mul(2);
        let mut candidates = Vec::with_capacity(files.len());
        for path in files {
            let decoded = self
                .audio_port
                .decode_audio(&path, seconds, self.settings.sample_rate)
                .await;
            match decoded {
                Ok(samples) => candidates.push(Candidate {
                    envelope: rules::energy_envelope(&samples, self.window()),
                    path,
                }),
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        Ok(candidates)
    }

    fn window(&self) -> usize {
        (self.settings.sample_rate / rules::ENVELOPE_RATE).max(1) as usize
    }

    fn offset_seconds(&self, lag: i64) -> f64 {
        lag as f64 * self.window() as f64 / self.settings.sample_rate as f64
    }
}
