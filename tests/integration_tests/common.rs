// shared utilities for integration tests

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// path to the gsq binary built for this test run
pub fn gsq_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_gsq"))
}

/// an isolated directory holding the config and state files for one test
pub struct TestEnv {
    dir: TempDir,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create test directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// config path passed to every command; the file need not exist
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    pub fn write_config(&self, content: &str) -> PathBuf {
        self.write("config.json", content)
    }

    fn command(&self, args: &[&str]) -> Command {
        let config_path = self.config_path();
        let mut cmd = Command::new(gsq_binary_path());
        cmd.arg("--config")
            .arg(config_path)
            .args(args)
            .env_remove("GSQ_CONFIG")
            .env_remove("GSQ_LOG");
        cmd
    }

    /// run gsq with this env's config
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("Failed to run gsq")
    }

    /// run gsq, feeding `input` on stdin
    pub fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn gsq");

        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(input.as_bytes())
            .expect("Failed to write stdin");

        child.wait_with_output().expect("Failed to wait for gsq")
    }
}

#[allow(dead_code)]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// parse the single JSON-RPC line printed on stdout
#[allow(dead_code)]
pub fn parse_json(output: &Output) -> serde_json::Value {
    let text = stdout(output);
    serde_json::from_str(text.trim())
        .unwrap_or_else(|e| panic!("invalid JSON output ({}): {}", e, text))
}

/// exit code of a finished command
#[allow(dead_code)]
pub fn exit_code(output: &Output) -> i32 {
    output.status.code().expect("gsq was killed by a signal")
}
