// Application layer - Use case interactors

use std::path::Path;

use tracing::warn;

use crate::domain::model::{FrameSize, SourceSize};
use crate::error::{QuadError, QuadResult};
use crate::ports::ProbePort;

pub mod composite_interactor;
pub mod container;
pub mod detect_interactor;
pub mod doctor_interactor;
pub mod preview_interactor;
pub mod sync_interactor;
pub mod tag_interactor;
pub mod transfer_interactor;

// Re-export interactors
pub use composite_interactor::CompositeInteractor;
pub use detect_interactor::DetectInteractor;
pub use doctor_interactor::DoctorInteractor;
pub use preview_interactor::PreviewInteractor;
pub use sync_interactor::SyncAudioInteractor;
pub use tag_interactor::TagInteractor;
pub use transfer_interactor::{DownloadInteractor, UploadInteractor};

/// Fail early, before any tool is started, when an input file is missing
pub fn ensure_input(path: &Path) -> QuadResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(QuadError::InputFileNotFound {
            path: path.display().to_string(),
        })
    }
}

/// Frame size used for crop arithmetic on `input`
pub async fn resolve_frame_size(
    probe: &dyn ProbePort,
    source: SourceSize,
    input: &Path,
) -> QuadResult<FrameSize> {
    match source {
        SourceSize::Fixed(frame) => Ok(frame),
        SourceSize::Auto => probe.frame_size(input).await,
    }
}

/// A failed encode may leave a truncated file that a later run would skip
pub(crate) fn discard_partial(output: &Path) {
    if output.exists() {
        if let Err(e) = std::fs::remove_file(output) {
            warn!("Could not remove partial output {}: {}", output.display(), e);
        }
    }
}
