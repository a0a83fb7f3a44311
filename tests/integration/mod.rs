//! Shared fixtures for resolver integration tests
//!
//! [`ScriptedRunner`] stands in for the host: it knows which package manager
//! binaries are "installed" and what each invocation prints, and records every
//! lookup and spawn so tests can assert on how often the host was touched.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;
use whichprovides::{CommandOutput, CommandRunner, Invocation, ProvidesConfig, Result};

#[derive(Default)]
struct Script {
    installed: HashMap<String, PathBuf>,
    responses: HashMap<(String, Vec<String>), CommandOutput>,
    finds: Vec<String>,
    runs: Vec<Invocation>,
}

/// Scripted host. Clones share the same script and call log.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    script: Arc<Mutex<Script>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `name` on the search path; `--version` exits with `version_exit`.
    pub fn with_tool(self, name: &str, version_exit: i32) -> Self {
        {
            let mut script = self.script.lock().unwrap();
            script
                .installed
                .insert(name.to_string(), PathBuf::from(format!("/usr/bin/{}", name)));
            script.responses.insert(
                (name.to_string(), vec!["--version".to_string()]),
                CommandOutput::new(version_exit, format!("{} 1.0", name)),
            );
        }
        self
    }

    /// Scripts the output of `program args...`.
    pub fn with_response(self, program: &str, args: &[&str], code: i32, stdout: &str) -> Self {
        self.script.lock().unwrap().responses.insert(
            (
                program.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
            ),
            CommandOutput::new(code, stdout),
        );
        self
    }

    pub fn find_count(&self, name: &str) -> usize {
        let script = self.script.lock().unwrap();
        script.finds.iter().filter(|n| n.as_str() == name).count()
    }

    pub fn spawn_count(&self, program: &str) -> usize {
        let script = self.script.lock().unwrap();
        script
            .runs
            .iter()
            .filter(|inv| inv.program_name() == program)
            .count()
    }

    pub fn total_spawns(&self) -> usize {
        self.script.lock().unwrap().runs.len()
    }
}

impl CommandRunner for ScriptedRunner {
    fn find(&self, name: &str) -> Option<PathBuf> {
        let mut script = self.script.lock().unwrap();
        script.finds.push(name.to_string());
        script.installed.get(name).cloned()
    }

    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let mut script = self.script.lock().unwrap();
        script.runs.push(invocation.clone());
        let key = (invocation.program_name(), invocation.args_lossy());
        Ok(script
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| CommandOutput::new(1, "")))
    }
}

/// Writes an os-release file with the given contents.
pub fn os_release(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

/// Default configuration reading the distro from `file`.
pub fn config_for(file: &NamedTempFile) -> ProvidesConfig {
    ProvidesConfig {
        os_release_path: file.path().to_path_buf(),
        ..ProvidesConfig::default()
    }
}
