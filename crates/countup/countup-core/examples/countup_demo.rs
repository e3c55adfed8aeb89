//! Counts a balance up in the terminal using wall-clock time.
//!
//! Run with `RUST_LOG=debug cargo run -p countup-core --example countup_demo`
//! to see lifecycle logging.

use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use countup_core::{CountupConfig, CountupController, Easing, SteppedTimeline};

fn main() -> Result<()> {
    env_logger::init();

    let config = CountupConfig::default()
        .with_range(0.0, 12_500.0)
        .with_duration_ms(2000)
        .with_decimal_places(2)
        .with_separators(".", ",")
        .with_prefix("$")
        .with_easing(Some(Easing::OutCubic));

    let sink = |text: &str| {
        print!("\r{text:>16}");
        let _ = std::io::stdout().flush();
    };
    let timeline = Rc::new(SteppedTimeline::new());
    let countup = CountupController::with_config(Rc::new(sink), timeline.clone(), config)?;

    let finished = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&finished);
    countup.on_finished(move || counter.set(counter.get() + 1));

    countup.start()?;
    drive(&timeline, &countup, Some(Duration::from_millis(800)));
    countup.update(-3_200.5)?;
    drive(&timeline, &countup, None);

    countup.set_prefix_before_minus(false);
    countup.update(99_999.99)?;
    drive(&timeline, &countup, None);
    println!();

    log::info!("finished {} of 3 runs", finished.get());
    Ok(())
}

/// Feed wall-clock time to the timeline until the run ends or `limit` passes.
fn drive(timeline: &SteppedTimeline, countup: &CountupController, limit: Option<Duration>) {
    let begun = Instant::now();
    let mut last = begun;
    while countup.is_running() {
        thread::sleep(timeline.frame_interval());
        let now = Instant::now();
        timeline.advance(now - last);
        last = now;
        if limit.is_some_and(|limit| now - begun >= limit) {
            return;
        }
    }
}
