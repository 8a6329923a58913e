//! External evaluation oracle: area and timing queries via process spawn.

use std::fs;
use std::io;
use std::process::{Command, ExitStatus};

use log::trace;

use crate::schema::OracleConfig;

/// Measurement source for a selected pattern subset.
///
/// Implementations answer two query kinds about the same subset: the
/// implementation area of the selected patterns, and the static timing of
/// the reference design with those patterns available. Both calls block
/// until the measurement completes; this layer imposes no timeout.
pub trait Oracle {
    /// Implementation area of the selected patterns.
    fn area(&mut self, patterns: &[&str]) -> Result<u64, OracleError>;

    /// Static timing estimate for the reference design given the patterns.
    fn timing(&mut self, patterns: &[&str]) -> Result<f64, OracleError>;
}

/// Errors from a single oracle invocation. All are fatal for the current
/// run: no retries, no degraded fallback.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("Oracle I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Oracle exited with {0}")]
    ExitStatus(ExitStatus),
    #[error("Malformed oracle response: {0:?}")]
    MalformedResponse(String),
}

/// Oracle backed by the external evaluator binary.
///
/// The selected subset is staged in a working file which is rewritten
/// before every query; iterations are strictly sequential so reuse across
/// calls is safe. Area queries run `<command> area <work_path>`, timing
/// queries run `<command> isel <bitcode> <work_path> [bcconf]`.
pub struct ProcessOracle {
    config: OracleConfig,
}

impl ProcessOracle {
    /// Create an oracle from its location and context.
    pub fn new(config: OracleConfig) -> Self {
        Self { config }
    }

    fn stage(&self, patterns: &[&str]) -> Result<(), OracleError> {
        let mut text = String::new();
        for pattern in patterns {
            text.push_str(pattern);
            text.push('\n');
        }
        fs::write(&self.config.work_path, text)?;
        Ok(())
    }

    fn query(&self, command: &mut Command, prefix: &str) -> Result<String, OracleError> {
        trace!("oracle call: {command:?}");
        let output = command.output()?;
        if !output.status.success() {
            return Err(OracleError::ExitStatus(output.status));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_response(stdout.trim(), prefix)
    }
}

/// Extract the value field from a single-line `<prefix> <value>` response.
fn parse_response(line: &str, prefix: &str) -> Result<String, OracleError> {
    match line.strip_prefix(prefix) {
        Some(value) => Ok(value.trim().to_string()),
        None => Err(OracleError::MalformedResponse(line.to_string())),
    }
}

impl Oracle for ProcessOracle {
    fn area(&mut self, patterns: &[&str]) -> Result<u64, OracleError> {
        self.stage(patterns)?;
        let mut command = Command::new(&self.config.command);
        command.arg("area").arg(&self.config.work_path);
        let value = self.query(&mut command, "Area:")?;
        value
            .parse()
            .map_err(|_| OracleError::MalformedResponse(value))
    }

    fn timing(&mut self, patterns: &[&str]) -> Result<f64, OracleError> {
        self.stage(patterns)?;
        let mut command = Command::new(&self.config.command);
        command
            .arg("isel")
            .arg(&self.config.bitcode)
            .arg(&self.config.work_path);
        if let Some(bcconf) = &self.config.bcconf {
            command.arg(bcconf);
        }
        let value = self.query(&mut command, "STA:")?;
        value
            .parse()
            .map_err(|_| OracleError::MalformedResponse(value))
    }
}
