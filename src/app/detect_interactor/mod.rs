// Detect interactor - Talk boundaries, hard cuts and slide changes

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::app::{ensure_input, resolve_frame_size};
use crate::domain::model::*;
use crate::domain::rules;
use crate::error::QuadResult;
use crate::ports::*;

/// Silences found in a recording and the talks between them
#[derive(Debug, Clone, PartialEq)]
pub struct TalkReport {
    /// `None` when the duration could not be probed
    pub duration: Option<f64>,
    pub silences: Vec<Silence>,
    pub talks: Vec<Segment>,
}

/// Interactor for the detection use cases
pub struct DetectInteractor {
    probe_port: Arc<dyn ProbePort>,
    encode_port: Arc<dyn EncodePort>,
}

impl DetectInteractor {
    /// Create new detect interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>, encode_port: Arc<dyn EncodePort>) -> Self {
        Self {
            probe_port,
            encode_port,
        }
    }

    /// Find silences of at least `params.min_gap` seconds and the talks they separate
    pub async fn find_talks(&self, input: &Path, params: SilenceParams) -> QuadResult<TalkReport> {
        ensure_input(input)?;
        info!(
            "Looking for silences in {} (noise {} dB, gap {}s)",
            input.display(),
            params.noise_db,
            params.min_gap
        );

        let duration = match self.probe_port.duration(input).await {
            Ok(d) => Some(d),
            Err(e) => {
                warn!("Could not probe duration of {}: {}", input.display(), e);
                None
            }
        };

        let silences = self
            .encode_port
            .detect_silence(input, &params, duration)
            .await?;
        let talks = duration
            .map(|d| rules::talk_segments(&silences, d))
            .unwrap_or_default();

        info!("Found {} silence(s), {} talk(s)", silences.len(), talks.len());
        Ok(TalkReport {
            duration,
            silences,
            talks,
        })
    }

    /// Times of hard cuts across the whole frame
    pub async fn detect_cuts(&self, input: &Path, threshold: f64) -> QuadResult<Vec<f64>> {
        ensure_input(input)?;
        let params = SceneParams::new(threshold, None)?;
        info!("Detecting cuts in {} (threshold {})", input.display(), threshold);

        let times = self.encode_port.detect_scenes(input, &params).await?;
        info!("Found {} cut(s)", times.len());
        Ok(times)
    }

    /// Times of slide changes inside one quadrant
    pub async fn detect_slides(
        &self,
        input: &Path,
        threshold: f64,
        quadrant: Quadrant,
        layout: &Layout,
    ) -> QuadResult<Vec<f64>> {
        ensure_input(input)?;
        validate_threshold(threshold)?;

        let frame = resolve_frame_size(self.probe_port.as_ref(), layout.source, input).await?;
        let crop = quadrant.crop(frame, layout.inset)?;
        let params = SceneParams::new(threshold, Some(crop))?;
        info!(
            "Detecting slide changes in {} ({} crop {}, threshold {})",
            input.display(),
            quadrant,
            crop,
            threshold
        );

        let times = self.encode_port.detect_scenes(input, &params).await?;
        info!("Found {} slide change(s)", times.len());
        Ok(times)
    }
}
