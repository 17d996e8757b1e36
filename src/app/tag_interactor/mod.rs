// Tag interactor - Walks a directory and records presenter/slides quadrants

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::model::*;
use crate::error::{QuadError, QuadResult};
use crate::ports::*;
use crate::utils::path::{file_name_of, find_videos};

/// Counts reported after a tagging session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSummary {
    pub found: usize,
    pub tagged: usize,
    pub already_tagged: usize,
    pub skipped: usize,
    pub invalid: usize,
    /// The user quit before the last file
    pub stopped_early: bool,
}

enum Answer {
    Quadrant(Quadrant),
    Skip,
    Invalid,
    Quit,
}

/// Interactor for the tagging use case
pub struct TagInteractor {
    probe_port: Arc<dyn ProbePort>,
    encode_port: Arc<dyn EncodePort>,
    render_port: Arc<dyn RenderPort>,
    prompt_port: Arc<dyn PromptPort>,
    store: Arc<dyn TagStorePort>,
}

impl TagInteractor {
    /// Create new tag interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        encode_port: Arc<dyn EncodePort>,
        render_port: Arc<dyn RenderPort>,
        prompt_port: Arc<dyn PromptPort>,
        store: Arc<dyn TagStorePort>,
    ) -> Self {
        Self {
            probe_port,
            encode_port,
            render_port,
            prompt_port,
            store,
        }
    }

    /// Tag every untagged video under `video_dir`
    pub async fn execute(&self, video_dir: &Path) -> QuadResult<TagSummary> {
        if !video_dir.is_dir() {
            return Err(QuadError::InputFileNotFound {
                path: video_dir.display().to_string(),
            });
        }

        let videos = find_videos(video_dir);
        let total = videos.len();
        let mut summary = TagSummary {
            found: total,
            ..TagSummary::default()
        };

        info!(
            "Found {} video(s) in {}, tags in {}",
            total,
            video_dir.display(),
            self.store.location().display()
        );

        let known = self.store.load()?;
        let thumbs = tempfile::TempDir::new()?;

        for (index, path) in videos.iter().enumerate() {
            let name = file_name_of(path);
            if known.contains_key(&name) {
                info!("[{}/{}] {} already tagged", index + 1, total, name);
                summary.already_tagged += 1;
                continue;
            }

            info!("[{}/{}] {}", index + 1, total, name);
            let thumb = thumbs.path().join(format!("frame-{}.jpg", index));
            self.show_middle_frame(path, &thumb).await;

            let presenter = match self.ask(&name, Role::Presenter)? {
                Answer::Quadrant(q) => q,
                Answer::Skip => {
                    summary.skipped += 1;
                    continue;
                }
                Answer::Invalid => {
                    summary.invalid += 1;
                    continue;
                }
                Answer::Quit => {
                    summary.stopped_early = true;
                    break;
                }
            };

            let slides = match self.ask(&name, Role::Slides)? {
                Answer::Quadrant(q) => q,
                Answer::Skip => {
                    summary.skipped += 1;
                    continue;
                }
                Answer::Invalid => {
                    summary.invalid += 1;
                    continue;
                }
                Answer::Quit => {
                    summary.stopped_early = true;
                    break;
                }
            };

            self.record(&name, path, presenter, slides)?;
            info!("Tagged {}: presenter={}, slides={}", name, presenter, slides);
            summary.tagged += 1;
        }

        Ok(summary)
    }

    fn ask(&self, name: &str, role: Role) -> QuadResult<Answer> {
        Ok(match self.prompt_port.ask_quadrant(name, role)? {
            Choice::Picked(q) => Answer::Quadrant(q),
            Choice::Skip => {
                info!("Skipping {}", name);
                Answer::Skip
            }
            Choice::Quit => Answer::Quit,
            Choice::Invalid(answer) => {
                warn!("Invalid choice '{}' for {}; moving on", answer, name);
                Answer::Invalid
            }
        })
    }

    /// Re-read the file and add the record, so each save is a wholesale rewrite
    fn record(&self, name: &str, path: &Path, presenter: Quadrant, slides: Quadrant) -> QuadResult<()> {
        let full_path: PathBuf = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let mut tags = self.store.load()?;
        tags.entry(name.to_string()).or_insert_with(|| {
            TagRecord::new(presenter, slides, full_path.to_string_lossy().to_string())
        });
        self.store.save(&tags)
    }

    /// Extract and render the middle frame; failures only warn
    async fn show_middle_frame(&self, video: &Path, thumb: &Path) {
        let at = match self.probe_port.duration(video).await {
            Ok(duration) => duration / 2.0,
            Err(e) => {
                warn!("Could not probe {}: {}", video.display(), e);
                return;
            }
        };

        if let Err(e) = self.encode_port.extract_frame(video, at, thumb).await {
            warn!("Could not extract a thumbnail from {}: {}", video.display(), e);
            return;
        }

        if let Err(e) = self.render_port.render(thumb).await {
            warn!("Could not render thumbnail {}: {}", thumb.display(), e);
        }
    }
}
