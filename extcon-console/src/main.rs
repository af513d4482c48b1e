//! extcon-usb-dummy console
//!
//! Attaches one dummy USB extcon device with a logging subscriber and drives
//! it from commands read on stdin.

mod console;
mod settings;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use extcon_dummy::{subscriber_handle, DebugFs, UsbDummyDriver};
use extcon_sim::{run_monitor_log_task, CableMonitor};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use console::{parse_command, Command, Console};
use settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "extcon_core=info,extcon_dummy=info,extcon_sim=info,extcon_usb_dummy=info".into()
        }))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(settings_path.as_deref());

    let driver = UsbDummyDriver::new(Arc::new(DebugFs::new()));
    let monitor = Arc::new(CableMonitor::new("usb-otg"));
    let log_task = settings.log_cable_events.then(|| {
        tokio::spawn(run_monitor_log_task(
            monitor.id().to_string(),
            monitor.subscribe(),
        ))
    });

    let device = match driver
        .on_attach(Some(&settings.device), Some(subscriber_handle(&monitor)))
        .await
    {
        Ok(device) => device,
        Err(e) => {
            error!("Failed to attach {}: {}", driver.name(), e);
            return ExitCode::FAILURE;
        }
    };

    let console = Console::new(driver, device, monitor);
    info!("Ready, type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => match console.execute(&command) {
                Ok(output) => {
                    print!("{}", output);
                    let _ = std::io::stdout().flush();
                }
                Err(e) => eprintln!("error: {}", e),
            },
            Err(e) => eprintln!("error: {}", e),
        }
    }

    console.shutdown().await;

    // The monitor was the last broadcast sender, so the log task ends here
    if let Some(task) = log_task {
        if let Ok(logged) = task.await {
            info!("{} cable events logged", logged);
        }
    }
    ExitCode::SUCCESS
}
