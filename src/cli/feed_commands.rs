// Feed command implementations: generation and verification
use feedlab::{
    read_feed_file, write_feed_file, EventKind, FeedError, FeedResult, FeedValidator,
    GenerationProgress, GeneratorParams, OrderFlowGenerator, Spinner,
};
use std::path::Path;
use tracing::{debug, info};

pub fn generate_feed(
    out: &Path,
    count: usize,
    seed: u64,
    params: GeneratorParams,
    show_progress: bool,
) -> FeedResult<()> {
    // Parameters are rejected here, before the output file is touched
    let generator = OrderFlowGenerator::seeded(params, seed)?;

    info!("🎲 Generating feed");
    info!("   Iterations: {}", count);
    info!("   Seed: {}", seed);
    info!("   Base price: {}", params.base_price);
    info!(
        "   Burst/cancel/exec probability: {:.3}/{:.3}/{:.3}",
        params.burst_probability, params.cancel_probability, params.execute_probability
    );

    let progress = GenerationProgress::new(count, show_progress);
    let mut stream = generator.into_stream(count);
    let mut rows = 0u64;

    let written = write_feed_file(out, stream.by_ref(), |event| {
        rows += 1;
        if event.kind == EventKind::Add {
            progress.tick(rows);
        }
    });

    let written = match written {
        Ok(written) => written,
        Err(e) => {
            progress.finish_with_error(&e.to_string());
            return Err(e);
        }
    };
    progress.finish(written, &out.display().to_string());

    let generator = stream.generator();
    let stats = generator.stats();
    info!("✅ wrote {}", out.display());
    info!(
        "   {} rows: {} adds, {} cancels, {} executes ({} bursts)",
        stats.total_events(), stats.adds, stats.cancels, stats.executes, stats.bursts
    );
    debug!(
        "   Final clock {} ns, reference price {}, {} live orders",
        generator.clock(),
        generator.base_price(),
        generator.live_count()
    );
    Ok(())
}

pub fn verify_feed(file: &Path, show_progress: bool) -> FeedResult<()> {
    let spinner = Spinner::new(&format!("Reading {}...", file.display()), show_progress);
    let events = match read_feed_file(file) {
        Ok(events) => events,
        Err(e) => {
            spinner.finish_with_error(&e.to_string());
            return Err(e);
        }
    };
    spinner.finish(&format!("Loaded {} rows", events.len()));

    let result = FeedValidator::validate(&events);
    result.display();

    if result.passed {
        Ok(())
    } else {
        let names: Vec<&str> = result
            .critical_failures()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        Err(FeedError::VerificationFailed(format!(
            "{} failed {}",
            file.display(),
            names.join(", ")
        )))
    }
}
