use alertcore::alarm::{NullOutput, ToneOutput};
use alertcore::clock::{Clock, ManualClock, SystemClock};
use alertcore::geo::format_distance;
use alertcore::synthesis::PcmOutput;
use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::{bind_address, routes};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use tokio::sync::Mutex;
use workflow::config::MonitorConfig;
use workflow::runner::{drive, Runner};

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic driver for the alarm and proximity core")]
struct Args {
    /// Run the simulation on a virtual clock and print a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a monitor config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 5_000.0)]
    radius: f64,
    #[arg(long, default_value_t = 0.7)]
    volume: f32,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 40.7128, allow_hyphen_values = true)]
    origin_lat: f64,
    #[arg(long, default_value_t = -74.006, allow_hyphen_values = true)]
    origin_lon: f64,
    /// Simulated time covered by an offline run
    #[arg(long, default_value_t = 120)]
    duration_secs: u64,
    /// Play alarms through a silent output instead of the PCM renderer
    #[arg(long, default_value_t = false)]
    silent: bool,
    /// Keep the HTTP status bridge alive until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn build_output(silent: bool, config: &MonitorConfig) -> Box<dyn ToneOutput> {
    if silent {
        Box::new(NullOutput)
    } else {
        Box::new(PcmOutput::new(config.sample_rate, 8))
    }
}

fn run_offline(config: &MonitorConfig, duration_secs: u64, silent: bool) -> anyhow::Result<()> {
    let clock = Arc::new(ManualClock::new(0));
    let mut runner = Runner::new(config, clock.clone(), build_output(silent, config))
        .context("building offline runner")?;

    let end_ms = duration_secs.saturating_mul(1_000);
    let tick_ms = config.tick_ms.max(1);
    while clock.now_ms() < end_ms {
        let report = runner.step();
        if let Some(nearby) = &report.inserted {
            println!(
                "[{:>6} ms] {} {} {:?} {} away",
                clock.now_ms(),
                nearby.id(),
                nearby.incident.kind.label(),
                nearby.severity(),
                format_distance(nearby.distance_m)
            );
        }
        if let Some(profile) = report.escalated {
            println!("[{:>6} ms] alarm -> {}", clock.now_ms(), profile.name);
        }
        clock.advance(tick_ms);
    }
    runner.alarm_mut().stop();

    let status = runner.status();
    println!(
        "Offline run -> evaluated {}, retained {}, escalations {}, tones {}, feed {}",
        status.metrics.incidents_evaluated,
        status.metrics.incidents_retained,
        status.metrics.escalations,
        status.metrics.tones_emitted,
        status.feed.entries.len()
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&status).context("serializing offline status")?
    );
    Ok(())
}

fn serve(config: &MonitorConfig, silent: bool) -> anyhow::Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let runner =
        Runner::new(config, clock, build_output(silent, config)).context("building live runner")?;
    let runner = Arc::new(Mutex::new(runner));
    let tick = Duration::from_millis(config.tick_ms.max(1));

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for the live monitor")?;
    runtime.block_on(async {
        let driver = tokio::spawn(drive(runner.clone(), tick));
        let (address, server) = warp::serve(routes(runner.clone()))
            .try_bind_ephemeral(bind_address())
            .context("binding status bridge")?;
        let server = tokio::spawn(server);
        info!("status bridge listening on http://{} (Ctrl+C to stop)", address);

        signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
        driver.abort();
        server.abort();
        runner.lock().await.alarm_mut().stop();
        Ok::<(), anyhow::Error>(())
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        MonitorConfig::load(path)?
    } else {
        MonitorConfig::from_args(
            args.radius,
            args.volume,
            args.seed,
            args.origin_lat,
            args.origin_lon,
        )
    };

    if args.offline {
        run_offline(&config, args.duration_secs, args.silent)?;
    }
    if args.serve {
        serve(&config, args.silent)?;
    }
    if !args.offline && !args.serve {
        info!("nothing to do; pass --offline or --serve");
    }

    Ok(())
}
