//! Path utilities

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Extensions the tagger treats as video
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "mov", "avi", "webm"];

/// Extensions searched for external audio recordings
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "aac", "flac", "ogg"];

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| extensions.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Check the extension against [`VIDEO_EXTENSIONS`], ignoring case
pub fn is_video_file(path: &Path) -> bool {
    has_extension(path, VIDEO_EXTENSIONS)
}

/// Check the extension against [`AUDIO_EXTENSIONS`], ignoring case
pub fn is_audio_file(path: &Path) -> bool {
    has_extension(path, AUDIO_EXTENSIONS)
}

/// All video files under `dir`, sorted by file name
pub fn find_videos(dir: &Path) -> Vec<PathBuf> {
    find_files(dir, is_video_file)
}

/// All audio files under `dir`, sorted by file name
pub fn find_audio_files(dir: &Path) -> Vec<PathBuf> {
    find_files(dir, is_audio_file)
}

fn find_files(dir: &Path, keep: fn(&Path) -> bool) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && keep(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

/// Expand a leading `~/` to `$HOME`
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ if path == "~" => std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}

/// File name as an owned string, falling back to the whole path
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("talk.mp4")));
        assert!(is_video_file(Path::new("/x/TALK.MOV")));
        assert!(is_video_file(Path::new("clip.webm")));
        assert!(!is_video_file(Path::new("notes.txt")));
        assert!(!is_video_file(Path::new("mp4")));
    }

    #[test]
    fn test_find_videos_sorted_and_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("room-b")).unwrap();
        fs::write(dir.path().join("b.mov"), b"x").unwrap();
        fs::write(dir.path().join("a.mp4"), b"x").unwrap();
        fs::write(dir.path().join("readme.md"), b"x").unwrap();
        fs::write(dir.path().join("room-b").join("c.mkv"), b"x").unwrap();

        let names: Vec<String> = find_videos(dir.path())
            .iter()
            .map(|p| file_name_of(p))
            .collect();

        assert_eq!(names, vec!["a.mp4", "b.mov", "c.mkv"]);
    }

    #[test]
    fn test_find_audio_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("day-2")).unwrap();
        fs::write(dir.path().join("room.WAV"), b"x").unwrap();
        fs::write(dir.path().join("talk.mp4"), b"x").unwrap();
        fs::write(dir.path().join("day-2").join("keynote.m4a"), b"x").unwrap();

        let names: Vec<String> = find_audio_files(dir.path())
            .iter()
            .map(|p| file_name_of(p))
            .collect();

        assert_eq!(names, vec!["keynote.m4a", "room.WAV"]);
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("rel/path"), PathBuf::from("rel/path"));
    }
}
