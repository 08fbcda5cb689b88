//! Shared test infrastructure for binary-level tests.

use donate::config::{default_config, write_config, GatewayKind};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// A scratch config directory with a zero-delay simulated gateway.
pub struct TestEnv {
    _dir: TempDir,
    config_path: PathBuf,
}

impl TestEnv {
    pub fn setup() -> Self {
        let dir = tempfile::tempdir().expect("create tempdir");
        let config_path = dir.path().join("config.json");
        let mut config = default_config();
        config.gateway = GatewayKind::Simulated;
        config.simulated_delay_ms = 0;
        write_config(&config_path, &config).expect("write test config");
        Self {
            _dir: dir,
            config_path,
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_donate"));
        cmd.arg("--config")
            .arg(&self.config_path)
            .args(args)
            .env_remove("DONATE_API_URL")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run `donate` with the given args and no stdin.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .stdin(Stdio::null())
            .output()
            .expect("spawn donate")
    }

    /// Run `donate` feeding `input` on stdin.
    pub fn run_with_input(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn donate");
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("write stdin");
        child.wait_with_output().expect("wait for donate")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
