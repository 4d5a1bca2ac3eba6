//! End-to-end session tests with synthetic collaborators: scripted
//! detectors, a counting frame source, and a recording sink. No camera,
//! model, or display is involved.

use anyhow::Result;

use badgewatch::{
    BoundingBox, Detection, Frame, FrameSource, RecordedOp, RecordingSink, ScriptedBackend,
    Session, SessionConfig, SessionState, SourceConfig, SourceStats, SyntheticSource,
};

/// Frame source that serves a fixed number of gray frames and counts how
/// often it is touched.
struct CountingSource {
    remaining: u64,
    connects: u64,
    reads: u64,
    closed: bool,
}

impl CountingSource {
    fn new(frames: u64) -> Self {
        Self {
            remaining: frames,
            connects: 0,
            reads: 0,
            closed: false,
        }
    }
}

impl FrameSource for CountingSource {
    fn connect(&mut self) -> Result<()> {
        self.connects += 1;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        self.reads += 1;
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(Frame::filled(64, 48, [32, 32, 32])))
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.reads,
            url: "test://counting".to_string(),
        }
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

fn detector_pair() -> (ScriptedBackend, ScriptedBackend) {
    let subject = ScriptedBackend::new(vec!["person".into()]);
    let marker = ScriptedBackend::new(vec!["card".into(), "lanyard".into()]);
    (subject, marker)
}

fn test_config() -> SessionConfig {
    SessionConfig {
        marker_labels: vec!["card".into(), "lanyard".into()],
        ..SessionConfig::default()
    }
}

#[test]
fn zero_subject_frame_emits_only_the_aggregate_overlay() -> Result<()> {
    let (subject, marker) = detector_pair();
    let mut session = Session::open(
        CountingSource::new(1),
        subject,
        marker,
        RecordingSink::new(),
        test_config(),
    )?;

    let original = Frame::filled(64, 48, [32, 32, 32]);
    let mut frame = original.clone();
    let report = session.step_frame(&mut frame, 0.1)?;

    assert_eq!(report.subjects, 0);
    assert_eq!(report.associated, 0);
    // Pixels untouched; the only draw call is the aggregate line.
    assert_eq!(frame, original);
    let texts = session.sink().text_ops();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("subjects: 0  |  with marker: 0"));
    assert_eq!(session.sink().presented_frames(), 1);
    Ok(())
}

#[test]
fn associated_and_unassociated_subjects_get_distinct_styles() -> Result<()> {
    let (mut subject, mut marker) = detector_pair();
    subject.push_frame(vec![
        Detection::new(BoundingBox::new(0, 0, 20, 40), 0, 0.9),
        Detection::new(BoundingBox::new(40, 0, 60, 40), 0, 0.9),
    ]);
    // One marker inside the first subject only.
    marker.push_frame(vec![Detection::new(BoundingBox::new(5, 10, 12, 16), 0, 0.9)]);

    let mut session = Session::open(
        CountingSource::new(1),
        subject,
        marker,
        RecordingSink::new(),
        test_config(),
    )?;

    let mut frame = Frame::filled(64, 48, [32, 32, 32]);
    let report = session.step_frame(&mut frame, 0.1)?;
    assert_eq!(report.subjects, 2);
    assert_eq!(report.associated, 1);

    let labels: Vec<&str> = session
        .sink()
        .text_ops()
        .into_iter()
        .filter(|t| !t.starts_with("subjects:"))
        .collect();
    assert_eq!(labels, vec!["with_marker", "without_marker"]);

    let rects: Vec<_> = session
        .sink()
        .ops
        .iter()
        .filter(|op| matches!(op, RecordedOp::Rect { .. }))
        .collect();
    assert_eq!(rects.len(), 2);
    Ok(())
}

#[test]
fn end_of_stream_closes_the_session_cleanly() -> Result<()> {
    let (subject, marker) = detector_pair();
    let mut session = Session::open(
        CountingSource::new(3),
        subject,
        marker,
        RecordingSink::new(),
        test_config(),
    )?;

    let summary = session.run()?;
    assert_eq!(summary.frames, 3);
    assert!(!summary.cancelled);
    assert_eq!(session.state(), SessionState::Closed);
    assert!(session.source().closed);
    // 3 frames plus the read that reported end of stream.
    assert_eq!(session.source().reads, 4);
    Ok(())
}

#[test]
fn cancel_signal_stops_the_loop() -> Result<()> {
    let (subject, marker) = detector_pair();
    let sink = RecordingSink::new().cancel_after_polls(2);
    let mut session = Session::open(
        CountingSource::new(100),
        subject,
        marker,
        sink,
        test_config(),
    )?;

    let summary = session.run()?;
    assert!(summary.cancelled);
    assert_eq!(summary.frames, 2);
    assert_eq!(session.state(), SessionState::Closed);
    Ok(())
}

#[test]
fn unresolved_marker_labels_abort_before_any_frame_is_read() {
    let subject = ScriptedBackend::new(vec!["person".into()]);
    // Marker detector whose class table matches nothing in the allow-list.
    let marker = ScriptedBackend::new(vec!["bicycle".into(), "dog".into()]);
    let source = CountingSource::new(10);

    let result = Session::open(source, subject, marker, RecordingSink::new(), test_config());
    assert!(result.is_err());
}

#[test]
fn marker_claims_are_not_deduplicated_across_subjects() -> Result<()> {
    let (mut subject, mut marker) = detector_pair();
    // Two overlapping subjects sharing the region around one marker.
    subject.push_frame(vec![
        Detection::new(BoundingBox::new(0, 0, 40, 48), 0, 0.9),
        Detection::new(BoundingBox::new(20, 0, 60, 48), 0, 0.9),
    ]);
    marker.push_frame(vec![Detection::new(BoundingBox::new(25, 20, 35, 30), 0, 0.9)]);

    let mut session = Session::open(
        CountingSource::new(1),
        subject,
        marker,
        RecordingSink::new(),
        test_config(),
    )?;

    let mut frame = Frame::filled(64, 48, [32, 32, 32]);
    let report = session.step_frame(&mut frame, 0.1)?;
    assert_eq!(report.subjects, 2);
    assert_eq!(report.associated, 2);
    Ok(())
}

#[test]
fn synthetic_source_runs_the_full_loop() -> Result<()> {
    // Stub-scheme source with a frame limit drives the same lifecycle the
    // daemon uses.
    let source = SyntheticSource::new(SourceConfig {
        url: "stub://pipeline-test".to_string(),
        width: 160,
        height: 120,
        frame_limit: 5,
    });
    let (subject, marker) = detector_pair();
    let mut session = Session::open(source, subject, marker, RecordingSink::new(), test_config())?;

    let summary = session.run()?;
    assert_eq!(summary.frames, 5);
    assert_eq!(session.sink().presented_frames(), 5);
    assert_eq!(session.state(), SessionState::Closed);
    Ok(())
}
