// Unit tests for business rules

use super::*;

fn uhd_crop(q: Quadrant) -> CropRect {
    q.crop(FrameSize::UHD, 4).unwrap()
}

#[test]
fn test_default_filter_graph() {
    let graph = build_filter_graph(
        uhd_crop(Quadrant::BottomRight),
        uhd_crop(Quadrant::TopLeft),
        &Layout::default(),
    );

    assert_eq!(
        graph,
        "[1:v]scale=2560:1440[bg]; \
         [0:v]crop=1912:1072:4:4[slides_cropped]; \
         [slides_cropped]scale=1920:1080[slides]; \
         [0:v]crop=1912:1072:1924:1084[presenter_raw]; \
         [presenter_raw]scale=-1:320[presenter]; \
         [bg][slides]overlay=(W-w)/2:(H-h)/2[base]; \
         [base][presenter]overlay=x=W-w-40:y=H-h-40[outv]"
    );
}

#[test]
fn test_filter_graph_follows_layout() {
    let layout = Layout {
        canvas: FrameSize::new(1920, 1080),
        main: FrameSize::new(1280, 720),
        pip_height: 240,
        margin: 16,
        ..Layout::default()
    };
    let graph = build_filter_graph(
        uhd_crop(Quadrant::TopLeft),
        uhd_crop(Quadrant::TopRight),
        &layout,
    );

    assert!(graph.starts_with("[1:v]scale=1920:1080[bg]"));
    assert!(graph.contains("[slides_cropped]scale=1280:720[slides]"));
    assert!(graph.contains("scale=-1:240[presenter]"));
    assert!(graph.ends_with("overlay=x=W-w-16:y=H-h-16[outv]"));
}

#[test]
fn test_scene_filter() {
    let plain = SceneParams::new(0.3, None).unwrap();
    assert_eq!(scene_filter(&plain), "select='gt(scene,0.3)',showinfo");

    let cropped = SceneParams::new(0.1, Some(uhd_crop(Quadrant::TopRight))).unwrap();
    assert_eq!(
        scene_filter(&cropped),
        "crop=1912:1072:1924:4,select='gt(scene,0.1)',showinfo"
    );
}

#[test]
fn test_silence_filter() {
    let params = SilenceParams::new(-35, 3.0).unwrap();
    assert_eq!(silence_filter(&params), "silencedetect=noise=-35dB:d=3");

    let params = SilenceParams::new(-40, 2.5).unwrap();
    assert_eq!(silence_filter(&params), "silencedetect=noise=-40dB:d=2.5");
}

const SILENCE_LOG: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'talk.mp4':
  Duration: 00:10:00.00, start: 0.000000, bitrate: 5000 kb/s
[silencedetect @ 0x55d0c8a3c6c0] silence_start: -0.00133333
[silencedetect @ 0x55d0c8a3c6c0] silence_end: 4.52 | silence_duration: 4.52133
[silencedetect @ 0x55d0c8a3c6c0] silence_start: 301.25
[silencedetect @ 0x55d0c8a3c6c0] silence_end: 309.5 | silence_duration: 8.25
[silencedetect @ 0x55d0c8a3c6c0] silence_start: 590
size=N/A time=00:10:00.00 bitrate=N/A speed= 412x
";

#[test]
fn test_parse_silences() {
    let silences = parse_silences(SILENCE_LOG, Some(600.0)).unwrap();

    assert_eq!(silences.len(), 3);
    assert_eq!(silences[0], Silence { start: 0.0, end: 4.52 });
    assert_eq!(silences[1], Silence { start: 301.25, end: 309.5 });
    // Open silence runs to the end of the file
    assert_eq!(silences[2], Silence { start: 590.0, end: 600.0 });
}

#[test]
fn test_parse_silences_without_duration_drops_open_silence() {
    let silences = parse_silences(SILENCE_LOG, None).unwrap();
    assert_eq!(silences.len(), 2);
}

#[test]
fn test_parse_silences_exponent_times() {
    let log = "\
[silencedetect @ 0x1] silence_start: 5e-05
[silencedetect @ 0x1] silence_end: 4.2 | silence_duration: 4.19995
[silencedetect @ 0x1] silence_start: 1.5E+02
";
    let silences = parse_silences(log, Some(200.0)).unwrap();

    assert_eq!(silences.len(), 2);
    assert!(silences[0].start < 0.001);
    assert_eq!(silences[0].end, 4.2);
    assert_eq!(silences[1], Silence { start: 150.0, end: 200.0 });
}

#[test]
fn test_parse_scene_times() {
    let log = "\
[Parsed_showinfo_1 @ 0x5581] config in time_base: 1/15360, frame_rate: 30/1
[Parsed_showinfo_1 @ 0x5581] n:   0 pts: 190464 pts_time:12.4    duration:    512 pos: 1234 fmt:yuv420p
[Parsed_showinfo_1 @ 0x5581] n:   1 pts: 951296 pts_time:61.9333 duration:    512 pos: 5678 fmt:yuv420p
frame=    2 fps=0.0 q=-0.0 Lsize=N/A time=00:01:02.00 bitrate=N/A speed= 120x
";
    let times = parse_scene_times(log).unwrap();
    assert_eq!(times, vec![12.4, 61.9333]);
}

#[test]
fn test_parse_scene_times_exponent() {
    let log = "[Parsed_showinfo_1 @ 0x5581] n:   0 pts: 1 pts_time:6.5e-05 duration: 512\n";
    let times = parse_scene_times(log).unwrap();
    assert_eq!(times.len(), 1);
    assert!(times[0] > 0.0 && times[0] < 0.001);
}

#[test]
fn test_parse_scene_times_ignores_other_lines() {
    let log = "pts_time:5.0 from some other filter\n";
    assert!(parse_scene_times(log).unwrap().is_empty());
}

#[test]
fn test_talk_segments_between_silences() {
    let silences = vec![
        Silence { start: 0.0, end: 4.52 },
        Silence { start: 301.25, end: 309.5 },
        Silence { start: 590.0, end: 600.0 },
    ];

    let talks = talk_segments(&silences, 600.0);
    assert_eq!(
        talks,
        vec![
            Segment { start: 4.52, end: 301.25 },
            Segment { start: 309.5, end: 590.0 },
        ]
    );
}

#[test]
fn test_talk_segments_without_silence() {
    let talks = talk_segments(&[], 120.0);
    assert_eq!(talks, vec![Segment { start: 0.0, end: 120.0 }]);
}

#[test]
fn test_talk_segments_unsorted_and_overlapping() {
    let silences = vec![
        Silence { start: 50.0, end: 60.0 },
        Silence { start: 10.0, end: 20.0 },
        Silence { start: 15.0, end: 25.0 },
    ];

    let talks = talk_segments(&silences, 100.0);
    assert_eq!(
        talks,
        vec![
            Segment { start: 0.0, end: 10.0 },
            Segment { start: 25.0, end: 50.0 },
            Segment { start: 60.0, end: 100.0 },
        ]
    );
}

#[test]
fn test_output_name_for() {
    assert_eq!(output_name_for("Keynote Day 1.mov"), "Keynote Day 1.mp4");
    assert_eq!(output_name_for("talk.mp4"), "talk.mp4");
    assert_eq!(output_name_for("archive.tar.mkv"), "archive.tar.mp4");
    assert_eq!(output_name_for("noext"), "noext.mp4");
}

#[test]
fn test_stderr_tail() {
    assert_eq!(stderr_tail("short\n", 500), "short");
    assert_eq!(stderr_tail("abcdefghij", 4), "ghij");
}

#[test]
fn test_synced_name_for() {
    assert_eq!(synced_name_for("2025-11-18 10-29-29.mov"), "2025-11-18 10-29-29_synced.mp4");
    assert_eq!(synced_name_for("talk.mp4"), "talk_synced.mp4");
}

#[test]
fn test_pcm_decoding() {
    let samples = pcm_s16le_samples(&[0x00, 0x40, 0x00, 0xC0, 0x00, 0x00, 0x7F]);
    assert_eq!(samples, vec![0.5, -0.5, 0.0]);
}

#[test]
fn test_energy_envelope() {
    let envelope = energy_envelope(&[0.5, -0.5, 1.0, -1.0, 0.2], 2);
    assert_eq!(envelope, vec![0.5, 1.0]);
    assert_eq!(energy_envelope(&[0.25, -0.75], 0), vec![0.25, 0.75]);
}

/// Deterministic noise; different `step` values give unrelated sequences
fn noise(len: usize, step: u32) -> Vec<f32> {
    let mut state: u32 = 0x2545_f491;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(step);
            (state >> 8) as f32 / (1u32 << 24) as f32 - 0.5
        })
        .collect()
}

#[test]
fn test_cross_correlate_finds_late_content() {
    // The candidate holds 30 samples of extra lead-in before the shared content
    let reference = noise(200, 1_013_904_223);
    let mut candidate = vec![0.0; 30];
    candidate.extend_from_slice(&reference);
    candidate.extend(noise(70, 12_345));

    let alignment = cross_correlate(&reference, &candidate).unwrap();
    assert_eq!(alignment.lag, -30);
    assert!(alignment.score > 0.5, "score {}", alignment.score);
}

#[test]
fn test_cross_correlate_finds_late_start() {
    // The candidate recording started 50 samples into the reference
    let reference = noise(200, 1_013_904_223);
    let candidate = reference[50..].to_vec();

    let alignment = cross_correlate(&reference, &candidate).unwrap();
    assert_eq!(alignment.lag, 50);
    assert!(alignment.score > 0.5, "score {}", alignment.score);
}

#[test]
fn test_cross_correlate_unrelated_signals_score_low() {
    let reference = noise(2000, 1_013_904_223);
    let candidate = noise(2000, 12_345);

    let alignment = cross_correlate(&reference, &candidate).unwrap();
    assert!(alignment.score < 0.2, "score {}", alignment.score);
    assert!(cross_correlate(&[], &candidate).is_none());
    assert!(cross_correlate(&reference, &[]).is_none());
}

#[test]
fn test_audio_offset_filter() {
    assert_eq!(audio_offset_filter(1.5), "adelay=1500:all=1");
    assert_eq!(audio_offset_filter(0.0), "adelay=0:all=1");
    assert_eq!(audio_offset_filter(-2.25), "atrim=start=2.250,asetpts=PTS-STARTPTS");
}
