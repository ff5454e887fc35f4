use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facade_client::{Backend, Identity};
use facade_hw::{Camera, CapturePolicy};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "facade", about = "Facade kiosk CLI — backend health, registration, recognition")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "FACADE_BACKEND_URL", default_value = "http://127.0.0.1:5000")]
    backend: String,
    /// V4L2 camera device
    #[arg(long, env = "FACADE_CAMERA_DEVICE", default_value = "/dev/video0")]
    device: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe backend connectivity
    Health,
    /// Capture a frame and register it under an identity
    Register {
        /// Register under a plain name
        #[arg(long, conflicts_with_all = ["hospital_id", "employee_id"])]
        name: Option<String>,
        /// Hospital ID (badge variant, requires --employee-id)
        #[arg(long, requires = "employee_id")]
        hospital_id: Option<String>,
        /// Employee ID (badge variant, requires --hospital-id)
        #[arg(long, requires = "hospital_id")]
        employee_id: Option<String>,
        /// Submit the full frame instead of the 300x300 center crop
        #[arg(long)]
        full_frame: bool,
    },
    /// Capture a frame and ask the backend who it is
    Recognize {
        /// Submit the full frame instead of the 300x300 center crop
        #[arg(long)]
        full_frame: bool,
    },
    /// List V4L2 capture devices
    Devices,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let backend = Backend::new(&cli.backend, Duration::from_secs(10))?;

    match cli.command {
        Commands::Health => {
            let status = backend.health().await;
            let state = if status.connected { "connected" } else { "offline" };
            println!("{state}: {}", status.message);
        }
        Commands::Register {
            name,
            hospital_id,
            employee_id,
            full_frame,
        } => {
            let identity = match (name, hospital_id, employee_id) {
                (Some(name), _, _) => Identity::Name(name),
                (None, Some(hospital_id), Some(employee_id)) => Identity::Badge {
                    hospital_id,
                    employee_id,
                },
                _ => anyhow::bail!("provide --name or both --hospital-id and --employee-id"),
            };
            let blob = capture_blob(&cli.device, full_frame)?;
            let message = backend.register(&identity, blob).await?;
            println!("registered {}: {message}", identity.label());
        }
        Commands::Recognize { full_frame } => {
            let blob = capture_blob(&cli.device, full_frame)?;
            let result = backend.recognize(blob).await;
            if result.is_unknown() {
                println!("unknown ({})", result.message);
            } else {
                println!("{} — {:.0}%", result.label(), result.confidence);
            }
        }
        Commands::Devices => {
            for device in Camera::list_devices() {
                println!("{}\t{}\t{}", device.path, device.name, device.driver);
            }
        }
    }

    Ok(())
}

fn capture_blob(device: &str, full_frame: bool) -> Result<Vec<u8>> {
    let camera = Camera::open(device).with_context(|| format!("failed to open {device}"))?;
    let frame = camera.capture_frame()?;
    let policy = if full_frame {
        CapturePolicy::Full
    } else {
        CapturePolicy::CenterCrop(300)
    };
    Ok(facade_hw::to_jpeg(&frame, policy, 92)?)
}
