use std::process::Stdio;

use compact_str::CompactString;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::messages::ShellCommand;

/// Service that starts programs on behalf of the panel
pub struct ProcessService {
    command_rx: mpsc::Receiver<ShellCommand>,
}

impl ProcessService {
    pub fn new(command_rx: mpsc::Receiver<ShellCommand>) -> Self {
        Self { command_rx }
    }

    /// Run the process service until every command sender is gone
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("Starting process service");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                ShellCommand::LaunchApp { exec, args } => Self::launch(&exec, &args),
            }
        }

        Ok(())
    }

    /// Spawn in background - don't wait for result
    fn launch(exec: &str, args: &[String]) {
        debug!("Launching {} {:?}", exec, args);

        let result = tokio::process::Command::new(exec)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        if let Err(e) = result {
            error!("Failed to launch '{}': {}", exec, e);
        }
    }
}

/// Handle the view uses to start programs detached from the panel
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    command_tx: mpsc::Sender<ShellCommand>,
}

impl ProcessLauncher {
    pub fn new(command_tx: mpsc::Sender<ShellCommand>) -> Self {
        Self { command_tx }
    }

    /// Queue `exec` with `args`; returns false when the process service is unavailable
    pub fn start_detached(&self, exec: &str, args: &[String]) -> bool {
        let cmd = ShellCommand::LaunchApp {
            exec: CompactString::from(exec),
            args: args.to_vec(),
        };

        match self.command_tx.try_send(cmd) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not launch '{}': {}", exec, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_detached_queues_command() {
        let (tx, mut rx) = mpsc::channel(4);
        let launcher = ProcessLauncher::new(tx);

        assert!(launcher.start_detached("skybar-settings", &["--battery".to_string()]));
        assert_eq!(
            rx.try_recv().unwrap(),
            ShellCommand::LaunchApp {
                exec: "skybar-settings".into(),
                args: vec!["--battery".to_string()],
            }
        );
    }

    #[test]
    fn test_start_detached_without_service() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let launcher = ProcessLauncher::new(tx);
        assert!(!launcher.start_detached("true", &[]));
    }
}
