//! Steps a single-buffered and a double-buffered producer side by side and reports, tick by
//! tick, whether the presented frame is torn.

use std::time::Duration;

use bufswap::{
    DrawOperation, DrawScheduler, DrawSequence, ManagerKind, PixelSurface, RateControl, RateMode,
    Rgba8, ScanoutSink, Source, SurfaceDesc, create_buffer_manager,
};

fn frame(desc: SurfaceDesc, color: Rgba8) -> anyhow::Result<Source> {
    let mut s = PixelSurface::new(desc);
    s.fill_rect(desc.bounds(), color)?;
    Ok(Source::image(s))
}

fn producer(kind: ManagerKind, sink: &ScanoutSink) -> anyhow::Result<DrawScheduler> {
    let desc = SurfaceDesc::new(64, 32)?;
    let frames = [
        frame(desc, Rgba8::opaque(220, 60, 60))?,
        frame(desc, Rgba8::opaque(60, 60, 220))?,
    ];
    let mut next = 0usize;
    let op = DrawOperation::new("video", desc.bounds(), move || {
        next = (next + 1) % frames.len();
        bufswap::PendingSource::ready(frames[next].clone())
    })?;
    let manager = create_buffer_manager(kind, desc, Some(sink.clone()))?;
    let mut s = DrawScheduler::new(
        manager,
        DrawSequence::new(vec![op]),
        RateControl::new(5, RateMode::ChunksPerTick),
    );
    s.set_auto(true);
    Ok(s)
}

fn torn(sink: &ScanoutSink) -> bool {
    sink.snapshot().is_some_and(|shown| {
        let first = &shown.data()[..4];
        shown.data().chunks_exact(4).any(|p| p != first)
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let single_sink = ScanoutSink::new();
    let double_sink = ScanoutSink::new();
    let mut single = producer(ManagerKind::Single, &single_sink)?;
    let mut double = producer(ManagerKind::NBuffer { count: 2 }, &double_sink)?;

    let dt = Duration::from_millis(16);
    let mut torn_ticks = [0u32; 2];
    for tick in 0..48 {
        single.tick(dt);
        double.tick(dt);
        let flags = [torn(&single_sink), torn(&double_sink)];
        for (count, flag) in torn_ticks.iter_mut().zip(flags) {
            *count += u32::from(flag);
        }
        println!(
            "tick {tick:>2}  single: {:<5}  double: {:<5}",
            if flags[0] { "TORN" } else { "ok" },
            if flags[1] { "TORN" } else { "ok" },
        );
    }

    println!(
        "torn ticks: single-buffered {}, double-buffered {}",
        torn_ticks[0], torn_ticks[1]
    );
    Ok(())
}
