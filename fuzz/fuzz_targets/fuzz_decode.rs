#![no_main]
use libfuzzer_sys::fuzz_target;
use zengif::{DecodeRequest, Limits, UnknownExtensionPolicy};

// Short LZW streams pad out to the full frame, so a few bytes can claim
// gigabytes of pixels. Keep every decode well under the fuzzer's RSS cap.
fn limits() -> Limits {
    Limits {
        max_pixels: Some(1 << 20),
        max_memory_bytes: Some(16 << 20),
        max_frames: Some(64),
        ..Limits::default()
    }
}

fuzz_target!(|data: &[u8]| {
    let limits = limits();

    // Probe and every decode configuration must never panic
    let _ = zengif::probe(data);
    let _ = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable);

    let Ok(doc) = DecodeRequest::new(data)
        .with_limits(&limits)
        .with_offsets(true)
        .with_unknown_extensions(UnknownExtensionPolicy::SkipSubBlocks)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    // Spans must stay inside the input and frames must be fully populated
    let offsets = doc.offsets().expect("offsets were requested");
    assert!(offsets.span.end <= data.len());
    assert!(doc.frames().len() <= 64);
    for (frame, spans) in doc.frames().iter().zip(&offsets.frames) {
        assert!(spans.span.end <= offsets.span.end);
        let expected = usize::from(frame.width()) * usize::from(frame.height());
        assert!(expected <= 1 << 20);
        assert_eq!(frame.pixels().len(), expected);
        assert_eq!(frame.indices().len(), expected);
        let _ = frame.to_rgba8();
    }
});
