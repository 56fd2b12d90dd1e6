use anyhow::Context;
use clap::Parser;
use fetch::DataClient;
use panel::PanelBridge;
use render::RecordingBackend;
use session::config::SessionConfig;
use session::controller::{SessionController, SessionStatus};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod fetch;
mod panel;
mod render;
mod session;

#[derive(Parser)]
#[command(author, version, about = "Map session driver for the HarborLens platform")]
struct Args {
    /// Load a session config from YAML
    #[arg(long)]
    session: Option<PathBuf>,
    /// Data provider base URL (endpoints /geoports, /geodata, /frequency)
    #[arg(long, default_value = "https://neuronserver.onrender.com")]
    base_url: String,
    /// Buffer radius in kilometers
    #[arg(long, default_value_t = 50.0)]
    radius_km: f64,
    /// Append a JSON session summary to the offline log
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Keep the panel bridge alive for the host UI
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.session {
        SessionConfig::load(path)?
    } else {
        SessionConfig::from_base_url(&args.base_url, args.radius_km)
    };

    let client = DataClient::new(&config);
    let bridge = PanelBridge::new();
    let mut controller = SessionController::new(config, RecordingBackend::new());

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating session runtime")?;

    let load_result = runtime.block_on(controller.load(&client));

    let model = controller.panel_model();
    bridge.publish(&model)?;

    match (&load_result, controller.status()) {
        (Ok(()), SessionStatus::Ready) => {
            println!(
                "Session ready -> ports {}, samples {}, ships {}, max density {}",
                model.port_count,
                model.sample_count,
                model.ships.len(),
                model.max_density
            );
        }
        (_, status) => {
            bridge.publish_status(&format!("Session did not reach ready: {}", status));
        }
    }

    if args.offline {
        let report = serde_json::to_string(&model).context("serializing session summary")?;
        let report_path = PathBuf::from("tools/data/session_summary.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        writeln!(file, "{}", report)?;
    }

    if args.serve {
        bridge.publish_status("Panel bridge running (Ctrl+C to stop)...");
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    controller.teardown();
    load_result.map_err(|err| anyhow::anyhow!(err))
}
