//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};

use crate::app::composite_interactor::{BatchSummary, EntryOutcome};
use crate::app::container::AppContainer;
use crate::app::sync_interactor::{SyncOutcome, SyncReport};
use crate::cli::args::*;
use crate::domain::model::{Quadrant, SilenceParams};
use crate::domain::rules::synced_name_for;
use crate::utils::path::file_name_of;
use crate::utils::format_file_size;
use crate::utils::time::{format_timestamp, TimeParser};

/// Execute the tag command
pub async fn tag(container: &dyn AppContainer, args: TagArgs) -> Result<()> {
    let video_dir = args
        .video_dir
        .unwrap_or_else(|| container.config().video_dir());

    let summary = container
        .tag_interactor()
        .execute(&video_dir)
        .await
        .with_context(|| format!("Tagging {} failed", video_dir.display()))?;

    println!(
        "Tagged {}, skipped {}, invalid {}, already tagged {} (of {} found)",
        summary.tagged, summary.skipped, summary.invalid, summary.already_tagged, summary.found
    );
    if summary.stopped_early {
        println!("Stopped early; run again to continue");
    }
    Ok(())
}

/// Execute the find-talks command
pub async fn find_talks(container: &dyn AppContainer, args: FindTalksArgs) -> Result<()> {
    let detect = &container.config().detect;
    let params = SilenceParams::new(
        args.noise_db.unwrap_or(detect.silence_noise_db),
        args.min_gap.unwrap_or(detect.silence_min_gap),
    )?;

    let report = container
        .detect_interactor()
        .find_talks(&args.input, params)
        .await
        .context("Silence detection failed")?;

    println!("Silences ({}):", report.silences.len());
    for silence in &report.silences {
        println!(
            "  {} - {}  ({:.1}s)",
            format_timestamp(silence.start),
            format_timestamp(silence.end),
            silence.duration()
        );
    }

    match report.duration {
        Some(duration) => {
            println!("Talks ({}) in {}:", report.talks.len(), format_timestamp(duration));
            for (index, talk) in report.talks.iter().enumerate() {
                println!(
                    "  {}. {} - {}  ({:.1}s)",
                    index + 1,
                    format_timestamp(talk.start),
                    format_timestamp(talk.end),
                    talk.duration()
                );
            }
        }
        None => println!("Talks: unknown (duration could not be probed)"),
    }
    Ok(())
}

/// Execute the detect-cuts command
pub async fn detect_cuts(container: &dyn AppContainer, args: DetectCutsArgs) -> Result<()> {
    let threshold = args
        .threshold
        .unwrap_or(container.config().detect.scene_threshold);

    let times = container
        .detect_interactor()
        .detect_cuts(&args.input, threshold)
        .await
        .context("Cut detection failed")?;

    print_times("Cuts", &times);
    Ok(())
}

/// Execute the detect-slides command
pub async fn detect_slides(container: &dyn AppContainer, args: DetectSlidesArgs) -> Result<()> {
    let config = container.config();
    let threshold = args.threshold.unwrap_or(config.detect.slide_threshold);
    let quadrant: Quadrant = args
        .quadrant
        .as_deref()
        .unwrap_or(config.detect.slide_quadrant.as_str())
        .parse()?;

    let times = container
        .detect_interactor()
        .detect_slides(&args.input, threshold, quadrant, &config.layout)
        .await
        .context("Slide change detection failed")?;

    print_times("Slide changes", &times);
    Ok(())
}

fn print_times(label: &str, times: &[f64]) {
    println!("{} ({}):", label, times.len());
    for time in times {
        println!("  {}", format_timestamp(*time));
    }
}

/// Execute the preview command
pub async fn preview(container: &dyn AppContainer, args: PreviewArgs) -> Result<()> {
    let position = args
        .position
        .as_deref()
        .map(|p| TimeParser::new().parse_time(p))
        .transpose()?;

    let result = container
        .preview_interactor()
        .execute(&args.input, position, args.output.as_deref())
        .await
        .context("Preview failed")?;

    match result.image {
        Some(image) => println!(
            "Frame at {} saved to {}",
            format_timestamp(result.at_seconds),
            image.display()
        ),
        None => println!("Frame at {}", format_timestamp(result.at_seconds)),
    }
    Ok(())
}

/// Execute the process command
pub async fn process(container: &dyn AppContainer, args: ProcessArgs) -> Result<()> {
    let config = container.config();
    let background = args.background.unwrap_or_else(|| config.background());
    let output_dir = args.output_dir.unwrap_or_else(|| config.output_dir());

    let summary = container
        .composite_interactor()
        .run_batch(&background, &output_dir)
        .await
        .context("Batch processing failed")?;

    print_batch_summary(&summary);
    print_outputs(&output_dir)?;
    Ok(())
}

fn print_batch_summary(summary: &BatchSummary) {
    for entry in &summary.entries {
        match &entry.outcome {
            EntryOutcome::Done => println!("  done     {}", entry.name),
            EntryOutcome::Skipped => println!("  skipped  {}", entry.name),
            EntryOutcome::Failed(reason) => println!("  failed   {}: {}", entry.name, reason),
        }
    }
    println!(
        "Done: {}, skipped: {}, failed: {}",
        summary.done(),
        summary.skipped(),
        summary.failed()
    );
}

/// List the rendered files with their sizes
fn print_outputs(output_dir: &Path) -> Result<()> {
    let mut outputs: Vec<_> = std::fs::read_dir(output_dir)
        .with_context(|| format!("Cannot list {}", output_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("mp4"))
                .unwrap_or(false)
        })
        .collect();
    outputs.sort();

    println!("Outputs in {}:", output_dir.display());
    for path in outputs {
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        println!(
            "  {:>9.1} MB  {}",
            size as f64 / (1024.0 * 1024.0),
            path.file_name().unwrap_or_default().to_string_lossy()
        );
    }
    Ok(())
}

/// Execute the sync-audio command
pub async fn sync_audio(container: &dyn AppContainer, args: SyncAudioArgs) -> Result<()> {
    let config = container.config();
    let audio_dir = args.audio_dir.unwrap_or_else(|| config.audio_dir());
    let interactor = container.sync_audio_interactor();

    let Some(video) = args.video else {
        let filter = args.filter.unwrap_or_else(|| config.sync.room_filter.clone());
        let video_dir = args.video_dir.unwrap_or_else(|| config.output_dir());
        let output_dir = args.output_dir.unwrap_or_else(|| config.synced_dir());

        let summary = interactor
            .run_batch(&filter, &video_dir, &audio_dir, &output_dir, args.dry_run)
            .await
            .context("Audio sync failed")?;

        println!("{:<30} {:<24} {:>8} {:>9}  Result", "Video", "Audio match", "Score", "Offset");
        for entry in &summary.entries {
            print_sync_report(entry);
        }
        println!(
            "Synced: {}, unmatched: {}, failed: {}",
            summary.synced(),
            summary.unmatched(),
            summary.failed()
        );
        return Ok(());
    };

    let output = args
        .output
        .unwrap_or_else(|| video.with_file_name(synced_name_for(&file_name_of(&video))));
    let report = interactor
        .sync_one(&video, &audio_dir, &output, args.dry_run)
        .await
        .with_context(|| format!("Audio sync of {} failed", video.display()))?;

    print_sync_report(&report);
    match report.outcome {
        SyncOutcome::Synced => println!("Output: {}", report.output.display()),
        SyncOutcome::DryRun => println!("Dry run, nothing written"),
        SyncOutcome::LowScore => anyhow::bail!(
            "Best match scored below {}; pass --min-score to accept it",
            config.sync.min_score
        ),
        SyncOutcome::NoMatch => anyhow::bail!("No matching audio found in {}", audio_dir.display()),
        SyncOutcome::Failed(reason) => anyhow::bail!("Audio sync failed: {}", reason),
        SyncOutcome::Skipped | SyncOutcome::Missing => {}
    }
    Ok(())
}

fn print_sync_report(report: &SyncReport) {
    let result = match &report.outcome {
        SyncOutcome::Synced => "synced".to_string(),
        SyncOutcome::DryRun => "matched".to_string(),
        SyncOutcome::LowScore => "low score".to_string(),
        SyncOutcome::NoMatch => "no match".to_string(),
        SyncOutcome::Skipped => "skipped".to_string(),
        SyncOutcome::Missing => format!("missing {}", report.video.display()),
        SyncOutcome::Failed(reason) => format!("failed: {}", reason),
    };
    match &report.matched {
        Some(matched) => println!(
            "{:<30} {:<24} {:>8.4} {:>+8.2}s  {}",
            truncate(&report.name, 28),
            truncate(&file_name_of(&matched.audio), 22),
            matched.score,
            matched.offset_seconds,
            result
        ),
        None => println!(
            "{:<30} {:<24} {:>8} {:>9}  {}",
            truncate(&report.name, 28),
            "-",
            "-",
            "-",
            result
        ),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Execute the composite command
pub async fn composite(container: &dyn AppContainer, args: CompositeArgs) -> Result<()> {
    let presenter: Quadrant = args.presenter.parse()?;
    let slides: Quadrant = args.slides.parse()?;
    let background = args
        .background
        .unwrap_or_else(|| container.config().background());

    container
        .composite_interactor()
        .composite_one(&args.input, &background, &args.output, presenter, slides)
        .await
        .with_context(|| format!("Compositing {} failed", args.input.display()))?;

    println!("Wrote {}", args.output.display());
    Ok(())
}

/// Execute the download command
pub async fn download(container: &dyn AppContainer, args: DownloadArgs) -> Result<()> {
    let remote = container.config().webdav.remote()?;

    container
        .download_interactor()
        .execute(&remote, &args.remote_path, &args.local_dir)
        .await
        .with_context(|| format!("Download of {} failed", args.remote_path))?;

    println!("Downloaded {} to {}", args.remote_path, args.local_dir.display());
    Ok(())
}

/// Execute the upload command
pub async fn upload(container: &dyn AppContainer, args: UploadArgs) -> Result<()> {
    let summary = container
        .upload_interactor()?
        .execute(&args.local_dir, &args.remote_dir)
        .await
        .with_context(|| format!("Upload of {} failed", args.local_dir.display()))?;

    for (name, bytes) in &summary.uploaded {
        println!("  uploaded {}  {}", format_file_size(*bytes), name);
    }
    for (name, reason) in &summary.failed {
        println!("  failed   {}: {}", name, reason);
    }
    println!(
        "Uploaded: {}, failed: {}",
        summary.uploaded.len(),
        summary.failed.len()
    );

    if !summary.failed.is_empty() {
        anyhow::bail!("{} file(s) failed to upload", summary.failed.len());
    }
    Ok(())
}

/// Execute the doctor command
pub async fn doctor(container: &dyn AppContainer) -> Result<()> {
    let statuses = container
        .doctor_interactor()
        .execute(&container.config().tools)
        .await;

    for status in &statuses {
        let state = if status.available { "ok" } else { "missing" };
        println!(
            "{:<12} {:<8} {}  {}",
            status.name,
            state,
            status.program,
            status.version.as_deref().unwrap_or("")
        );
    }

    let missing = statuses.iter().filter(|s| !s.available).count();
    if missing > 0 {
        anyhow::bail!("{} tool(s) could not be started", missing);
    }
    Ok(())
}
