//! # Pipeline Tests
//!
//! End-to-end checks from plugin or bit-frame down to the bytes handed to the
//! display link.
//!
//! ## Coverage
//!
//! - **Wire shape**: every write is one frame, top command then bottom
//! - **Golden payloads**: the panel test pattern and single-dot frames
//! - **Backpressure**: a slow link drops frames instead of queueing them
//! - **Validation**: malformed frames never reach the panel splitter

use flipdot::display::DisplayConfig;
use flipdot::frame::{BitFrame, FrameMessage};
use flipdot::host::PluginHost;
use flipdot::pipeline::{Encoder, FrameWriter, Pipeline, PipelineStats};
use flipdot::protocol::commands::{self, START_MARKER};
use flipdot::protocol::panel::Panel;
use flipdot::transport::MemoryLink;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

const CONFIG: DisplayConfig = DisplayConfig::DUAL_28X14;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a frame and return the (top, bottom) payload hex.
fn payloads(frame: &BitFrame) -> (String, String) {
    let bytes = commands::encode_frame(frame, &CONFIG).unwrap();
    let [top, bottom] = commands::parse_frame(&bytes, &CONFIG).unwrap();
    assert_eq!(top.panel, Panel::Top);
    assert_eq!(bottom.panel, Panel::Bottom);
    (top.payload_hex(), bottom.payload_hex())
}

fn host_frame(plugin: &str) -> BitFrame {
    let mut host = PluginHost::new(CONFIG);
    host.load(plugin).unwrap();
    host.tick().unwrap().unwrap()
}

// ============================================================================
// GOLDEN PAYLOADS
// ============================================================================

#[test]
fn test_all_off_frame() {
    let (top, bottom) = payloads(&BitFrame::blank(&CONFIG));
    assert_eq!(top, "00".repeat(25));
    assert_eq!(bottom, "00".repeat(25));
}

#[test]
fn test_single_dot_top_left() {
    let mut frame = BitFrame::blank(&CONFIG);
    frame.set(0, 0, true);
    let (top, bottom) = payloads(&frame);
    assert_eq!(top, format!("02{}", "00".repeat(24)));
    assert_eq!(bottom, "00".repeat(25));
}

#[test]
fn test_single_dot_bottom_right() {
    let mut frame = BitFrame::blank(&CONFIG);
    frame.set(27, 7, true);
    let (top, bottom) = payloads(&frame);
    assert_eq!(top, "00".repeat(25));
    // Last column, top row of the bottom panel: final bit of the sequence
    assert_eq!(bottom, format!("{}10", "00".repeat(24)));
}

#[test]
fn test_panel_test_golden() {
    let frame = host_frame("panel_test");
    let bytes = commands::encode_frame(&frame, &CONFIG).unwrap();
    assert_eq!(bytes.len(), 56);

    let (top, bottom) = payloads(&frame);
    assert_eq!(top, format!("{}a0", "aa".repeat(24)));
    assert_eq!(bottom, format!("{}f0", "ff".repeat(24)));
    assert_eq!(bytes[27], 0x90);
    assert_eq!(bytes[55], 0xd8);
}

#[test]
fn test_frame_message_reaches_wire() {
    let mut bits = vec![0u8; 392];
    bits[0] = 1;
    let text = serde_json::json!({ "type": "frame", "bits": bits }).to_string();
    let frame = FrameMessage::parse(&text, &CONFIG).unwrap();
    let (top, _) = payloads(&frame);
    assert!(top.starts_with("02"));
}

// ============================================================================
// TRANSPORT
// ============================================================================

#[test]
fn test_slow_link_drops_instead_of_queueing() {
    let link = MemoryLink::new().with_delay(Duration::from_millis(2));
    let pipeline = Pipeline::start(CONFIG, link.clone(), 4).unwrap();
    let stats = pipeline.stats.clone();

    let frame = host_frame("panel_test");
    for _ in 0..1000 {
        pipeline.sender.send(frame.clone());
    }
    pipeline.finish().unwrap();

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.produced, 1000);
    assert_eq!(snapshot.written + snapshot.dropped, 1000);
    assert!(snapshot.dropped > 0);

    let writes = link.writes();
    assert_eq!(writes.len() as u64, snapshot.written);
    for write in &writes {
        assert_eq!(write.len(), 56);
        assert_eq!(write[0], START_MARKER);
        assert_eq!(write[28], START_MARKER);
        commands::parse_frame(write, &CONFIG).unwrap();
    }
}

#[test]
fn test_failed_writes_are_counted_and_skipped() {
    let link = MemoryLink::new();
    link.set_failing(true);
    let stats = Arc::new(PipelineStats::new());
    let mut writer = FrameWriter::new(
        link.clone(),
        Encoder::new(CONFIG, stats.clone()),
        stats.clone(),
    );

    assert!(!writer.write(&BitFrame::blank(&CONFIG)));
    link.set_failing(false);
    assert!(writer.write(&BitFrame::blank(&CONFIG)));

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.write_failures, 1);
    assert_eq!(snapshot.written, 1);
    assert_eq!(link.total_writes(), 1);
}

// ============================================================================
// VALIDATION
// ============================================================================

#[test]
fn test_invalid_frame_never_reaches_splitter() {
    let foreign = DisplayConfig {
        cols: 27,
        ..CONFIG
    };
    let frame = BitFrame::blank(&foreign);

    let link = MemoryLink::new();
    let stats = Arc::new(PipelineStats::new());
    let mut writer = FrameWriter::new(
        link.clone(),
        Encoder::new(CONFIG, stats.clone()),
        stats.clone(),
    );

    assert!(!writer.write(&frame));
    let snapshot = stats.snapshot();
    assert_eq!(snapshot.rejected, 1);
    assert_eq!(snapshot.split, 0);
    assert_eq!(snapshot.written, 0);
    assert!(link.writes().is_empty());
}

#[test]
fn test_malformed_messages_are_rejected() {
    let cases = [
        r#"{"type":"frame","bits":[0,1]}"#.to_string(),
        r#"{"type":"hello","bits":[]}"#.to_string(),
        serde_json::json!({ "type": "frame", "bits": vec![2u8; 392] }).to_string(),
        "not json".to_string(),
    ];
    for text in &cases {
        assert!(FrameMessage::parse(text, &CONFIG).is_err(), "{}", text);
    }
}
