//! Line-based device console
//!
//! Each input line is one command. Endpoints are addressed either by bare
//! name (`vbus`) or by their debug path (`dummy_usb_extcon/vbus`), and every
//! read and write goes through the debug filesystem exactly like an external
//! writer would.

use std::sync::Arc;

use extcon_core::{CableState, CableStatus, SignalSnapshot};
use extcon_dummy::{DebugFsError, ExtconDevice, UsbDummyDriver, DEBUGFS_DIR};
use extcon_sim::CableMonitor;
use serde::Serialize;
use thiserror::Error;

/// Console errors
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("unknown command: {0} (try 'help')")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    DebugFs(#[from] DebugFsError),

    #[error("failed to encode status: {0}")]
    Status(#[from] serde_json::Error),
}

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Read(String),
    Write { endpoint: String, value: String },
    List,
    Suspend,
    Resume,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  read <endpoint>            print an endpoint value (alias: cat)
  write <endpoint> <value>   write an integer to an endpoint
  echo <value> > <endpoint>  same as write
  ls                         list endpoints
  suspend                    simulate system suspend
  resume                     simulate system resume
  status                     print device status as JSON
  help                       show this text
  quit                       detach the device and exit (alias: exit)
";

/// Parse one input line; blank lines and `#` comments yield `None`
pub fn parse_command(line: &str) -> Result<Option<Command>, ConsoleError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["read" | "cat", endpoint] => Command::Read(endpoint.to_string()),
        ["read" | "cat", ..] => return Err(ConsoleError::Usage("read <endpoint>")),
        ["write", endpoint, value] => Command::Write {
            endpoint: endpoint.to_string(),
            value: value.to_string(),
        },
        ["write", ..] => return Err(ConsoleError::Usage("write <endpoint> <value>")),
        ["echo", value, ">", endpoint] => Command::Write {
            endpoint: endpoint.to_string(),
            value: value.to_string(),
        },
        ["echo", ..] => return Err(ConsoleError::Usage("echo <value> > <endpoint>")),
        ["ls"] => Command::List,
        ["suspend"] => Command::Suspend,
        ["resume"] => Command::Resume,
        ["status"] => Command::Status,
        ["help"] => Command::Help,
        ["quit" | "exit"] => Command::Quit,
        [word, ..] => return Err(ConsoleError::UnknownCommand(word.to_string())),
        [] => return Ok(None),
    };
    Ok(Some(command))
}

/// Debug path for an endpoint given by bare name or full path
pub fn endpoint_path(endpoint: &str) -> String {
    if endpoint.contains('/') {
        endpoint.to_string()
    } else {
        format!("{}/{}", DEBUGFS_DIR, endpoint)
    }
}

/// Snapshot printed by the `status` command
#[derive(Debug, Clone, Serialize)]
pub struct DeviceStatus {
    pub name: String,
    pub signals: SignalSnapshot,
    pub cables: CableStatus,
    pub state: CableState,
    pub resolutions: u64,
    pub wakeup_capable: bool,
    pub subscriber: SubscriberStatus,
}

/// What the subscriber has observed
#[derive(Debug, Clone, Serialize)]
pub struct SubscriberStatus {
    pub id: String,
    pub state: CableState,
    pub notifications: usize,
    pub saw_conflict: bool,
}

/// An attached device together with its driver and subscriber
pub struct Console {
    driver: UsbDummyDriver,
    device: ExtconDevice,
    monitor: Arc<CableMonitor>,
}

impl Console {
    pub fn new(driver: UsbDummyDriver, device: ExtconDevice, monitor: Arc<CableMonitor>) -> Self {
        Self {
            driver,
            device,
            monitor,
        }
    }

    /// Run a command, returning the text to print
    ///
    /// `Quit` is handled by the caller and prints nothing here.
    pub fn execute(&self, command: &Command) -> Result<String, ConsoleError> {
        let debugfs = self.driver.debugfs();
        match command {
            Command::Read(endpoint) => Ok(debugfs.read(&endpoint_path(endpoint))?),
            Command::Write { endpoint, value } => {
                // Shell `echo` appends a newline
                let text = format!("{}\n", value);
                let written = debugfs.write(&endpoint_path(endpoint), &text)?;
                Ok(format!("{} bytes written\n", written))
            }
            Command::List => {
                let mut out = String::new();
                for name in debugfs.list(DEBUGFS_DIR) {
                    out.push_str(&name);
                    out.push('\n');
                }
                Ok(out)
            }
            Command::Suspend => {
                self.driver.on_suspend(&self.device);
                Ok(String::new())
            }
            Command::Resume => {
                self.driver.on_resume(&self.device);
                Ok(String::new())
            }
            Command::Status => {
                let mut json = serde_json::to_string_pretty(&self.status())?;
                json.push('\n');
                Ok(json)
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    pub fn status(&self) -> DeviceStatus {
        DeviceStatus {
            name: self.device.name().to_string(),
            signals: self.device.snapshot(),
            cables: self.device.cable_status(),
            state: self.device.cable_state(),
            resolutions: self.device.resolution_count(),
            wakeup_capable: self.device.is_wakeup_capable(),
            subscriber: SubscriberStatus {
                id: self.monitor.id().to_string(),
                state: self.monitor.state(),
                notifications: self.monitor.notification_count(),
                saw_conflict: self.monitor.saw_conflict(),
            },
        }
    }

    /// Detach the device and wait for its work to stop
    pub async fn shutdown(self) {
        self.driver.on_detach(self.device).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extcon_dummy::{subscriber_handle, DebugFs, DeviceNode};
    use proptest::prelude::*;
    use std::time::Duration;

    async fn console() -> Console {
        let driver = UsbDummyDriver::new(Arc::new(DebugFs::new()));
        let monitor = Arc::new(CableMonitor::new("otg"));
        let node = DeviceNode {
            id_det: true,
            vbus_det: true,
            default_id: true,
            ..Default::default()
        };
        let device = driver
            .on_attach(Some(&node), Some(subscriber_handle(&monitor)))
            .await
            .unwrap();
        Console::new(driver, device, monitor)
    }

    fn run(console: &Console, line: &str) -> Result<String, ConsoleError> {
        let command = parse_command(line)?.expect("command");
        console.execute(&command)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("cat vbus").unwrap(),
            Some(Command::Read("vbus".into()))
        );
        assert_eq!(
            parse_command("  write id 0x1 ").unwrap(),
            Some(Command::Write {
                endpoint: "id".into(),
                value: "0x1".into()
            })
        );
        assert_eq!(
            parse_command("echo 1 > dummy_usb_extcon/vbus").unwrap(),
            Some(Command::Write {
                endpoint: "dummy_usb_extcon/vbus".into(),
                value: "1".into()
            })
        );
        assert_eq!(parse_command("exit").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("# comment").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_command("frobnicate"),
            Err(ConsoleError::UnknownCommand(w)) if w == "frobnicate"
        ));
        assert!(matches!(parse_command("read"), Err(ConsoleError::Usage(_))));
        assert!(matches!(parse_command("echo 1 vbus"), Err(ConsoleError::Usage(_))));
    }

    #[test]
    fn test_endpoint_path() {
        assert_eq!(endpoint_path("vbus"), "dummy_usb_extcon/vbus");
        assert_eq!(endpoint_path("dummy_usb_extcon/id"), "dummy_usb_extcon/id");
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_then_status() {
        let console = console().await;
        assert_eq!(run(&console, "read vbus").unwrap(), "0\n");

        assert_eq!(run(&console, "echo 1 > vbus").unwrap(), "2 bytes written\n");
        tokio::time::sleep(Duration::from_millis(25)).await;

        assert_eq!(run(&console, "cat vbus").unwrap(), "1\n");
        let status = console.status();
        assert_eq!(status.state, CableState::Usb);
        assert_eq!(status.subscriber.state, CableState::Usb);

        let json = run(&console, "status").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["state"], "Usb");
        assert_eq!(value["signals"]["vbus"], true);

        console.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejects_bad_input_and_unknown_endpoint() {
        let console = console().await;
        assert!(matches!(
            run(&console, "write vbus abc"),
            Err(ConsoleError::DebugFs(DebugFsError::InvalidInput(_)))
        ));
        assert!(matches!(
            run(&console, "read nope"),
            Err(ConsoleError::DebugFs(DebugFsError::NotFound(_)))
        ));
        console.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_applies_override() {
        let console = console().await;
        run(&console, "write override_on_resume 1").unwrap();
        run(&console, "write resume_id 0").unwrap();
        run(&console, "suspend").unwrap();
        run(&console, "resume").unwrap();
        tokio::time::sleep(Duration::from_millis(25)).await;

        assert_eq!(console.status().state, CableState::UsbHost);
        assert_eq!(run(&console, "read id").unwrap(), "0\n");
        console.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_endpoints() {
        let console = console().await;
        let listing = run(&console, "ls").unwrap();
        let names: Vec<&str> = listing.lines().collect();
        assert_eq!(
            names,
            vec!["id", "override_on_resume", "resume_id", "resume_vbus", "vbus"]
        );
        console.shutdown().await;
    }

    proptest! {
        #[test]
        fn parse_never_panics(line in ".{0,40}") {
            let _ = parse_command(&line);
        }
    }
}
