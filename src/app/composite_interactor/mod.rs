// Composite interactor - Turns tagged 4-up recordings into slides + presenter videos

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::app::{discard_partial, ensure_input, resolve_frame_size};
use crate::domain::model::*;
use crate::domain::rules;
use crate::error::{QuadError, QuadResult};
use crate::ports::*;

/// What happened to one tagged entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Done,
    /// The output already existed
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub name: String,
    pub output: PathBuf,
    pub outcome: EntryOutcome,
}

/// Per-entry results of a batch run, in tag-file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub entries: Vec<EntryReport>,
}

impl BatchSummary {
    pub fn done(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Done))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Interactor for the composite use cases
pub struct CompositeInteractor {
    probe_port: Arc<dyn ProbePort>,
    encode_port: Arc<dyn EncodePort>,
    store: Arc<dyn TagStorePort>,
    layout: Layout,
    settings: EncodeSettings,
}

impl CompositeInteractor {
    /// Create new composite interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        encode_port: Arc<dyn EncodePort>,
        store: Arc<dyn TagStorePort>,
        layout: Layout,
        settings: EncodeSettings,
    ) -> Self {
        Self {
            probe_port,
            encode_port,
            store,
            layout,
            settings,
        }
    }

    /// Composite every tagged entry into `output_dir`.
    ///
    /// Only a missing background, a missing tag file or an unusable output
    /// directory fail the run; entry failures are recorded and the loop goes on.
    pub async fn run_batch(&self, background: &Path, output_dir: &Path) -> QuadResult<BatchSummary> {
        if !background.is_file() {
            return Err(QuadError::InputFileNotFound {
                path: background.display().to_string(),
            });
        }
        if !self.store.exists() {
            return Err(QuadError::TagStore {
                path: self.store.location().display().to_string(),
                message: "no tag file; run `quadcut tag` first".to_string(),
            });
        }

        let tags = self.store.load()?;
        std::fs::create_dir_all(output_dir)?;

        let total = tags.len();
        info!("Processing {} tagged video(s) into {}", total, output_dir.display());

        let mut summary = BatchSummary::default();
        for (index, (name, record)) in tags.iter().enumerate() {
            let output = output_dir.join(rules::output_name_for(name));
            info!("[{}/{}] {}", index + 1, total, name);

            let outcome = if output.exists() {
                info!("Output {} exists, skipping", output.display());
                EntryOutcome::Skipped
            } else {
                match self.process_entry(record, background, &output).await {
                    Ok(()) => {
                        info!("Finished {}", output.display());
                        EntryOutcome::Done
                    }
                    Err(e) => {
                        error!("Failed {}: {}", name, e);
                        discard_partial(&output);
                        EntryOutcome::Failed(e.to_string())
                    }
                }
            };

            summary.entries.push(EntryReport {
                name: name.clone(),
                output,
                outcome,
            });
        }

        info!(
            "Batch finished: {} done, {} skipped, {} failed",
            summary.done(),
            summary.skipped(),
            summary.failed()
        );
        Ok(summary)
    }

    /// Composite a single recording
    pub async fn composite_one(
        &self,
        input: &Path,
        background: &Path,
        output: &Path,
        presenter: Quadrant,
        slides: Quadrant,
    ) -> QuadResult<()> {
        ensure_input(input)?;
        ensure_input(background)?;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let job = self.plan(input, background, output, presenter, slides).await?;
        let result = self.encode_port.composite(&job).await;
        if result.is_err() {
            discard_partial(output);
        }
        result
    }

    async fn process_entry(&self, record: &TagRecord, background: &Path, output: &Path) -> QuadResult<()> {
        let presenter = record.presenter_quadrant()?;
        let slides = record.slides_quadrant()?;
        let input = PathBuf::from(&record.path);
        ensure_input(&input)?;

        let job = self.plan(&input, background, output, presenter, slides).await?;
        self.encode_port.composite(&job).await
    }

    /// Build the encode job for one recording
    pub async fn plan(
        &self,
        input: &Path,
        background: &Path,
        output: &Path,
        presenter: Quadrant,
        slides: Quadrant,
    ) -> QuadResult<CompositeJob> {
        let frame = resolve_frame_size(self.probe_port.as_ref(), self.layout.source, input).await?;
        let presenter_rect = presenter.crop(frame, self.layout.inset)?;
        let slides_rect = slides.crop(frame, self.layout.inset)?;

        info!(
            "Presenter {} crop {}, slides {} crop {}",
            presenter, presenter_rect, slides, slides_rect
        );

        Ok(CompositeJob {
            input: input.to_path_buf(),
            background: background.to_path_buf(),
            output: output.to_path_buf(),
            filter_graph: rules::build_filter_graph(presenter_rect, slides_rect, &self.layout),
            settings: self.settings.clone(),
        })
    }
}
