//! Delegated command engine
//!
//! Instead of the built-in command table, a terminal can hand every submitted
//! line to an external engine that answers with a list of [`Action`]s.
//!
//! The process protocol (see [`ProcessEngine`]):
//!
//! ```text
//! <program> [args..] commands        -> ["help","ls",...]
//! <program> [args..] handle <line>   -> [{"kind":"print","text":"..."}, ...]
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::action::{decode_actions, decode_names, Action};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// An external command-processing module
pub trait CommandEngine {
    /// Must complete before the first call to anything else
    fn init(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Known command names (for tab completion)
    fn commands(&mut self) -> Result<Value, EngineError>;

    /// Process one trimmed input line
    fn handle_command(&mut self, input: &str) -> Result<Value, EngineError>;
}

/// Engine backed by an executable, run once per request
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: String,
    args: Vec<String>,
}

impl ProcessEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn run(&self, request: &[&str]) -> Result<Value, EngineError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .args(request)
            .output()
            .map_err(|source| EngineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(EngineError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // Unparsable output counts as "no actions"
        Ok(serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
            debug!("{} printed invalid JSON: {}", self.program, e);
            Value::Null
        }))
    }
}

impl CommandEngine for ProcessEngine {
    fn init(&mut self) -> Result<(), EngineError> {
        let path = Path::new(&self.program);
        // Bare names are resolved through PATH when spawned
        if path.components().count() > 1 && !path.exists() {
            return Err(EngineError::NotFound(path.to_path_buf()));
        }
        Ok(())
    }

    fn commands(&mut self) -> Result<Value, EngineError> {
        self.run(&["commands"])
    }

    fn handle_command(&mut self, input: &str) -> Result<Value, EngineError> {
        self.run(&["handle", input])
    }
}

/// A started engine plus what it told us at startup
pub struct DelegatedEngine {
    engine: Box<dyn CommandEngine>,
    ready: bool,
    commands: Vec<String>,
}

impl DelegatedEngine {
    /// Initialise the engine and fetch its command list. A failed init leaves
    /// the engine "not ready" rather than failing the terminal.
    pub fn start(mut engine: Box<dyn CommandEngine>) -> Self {
        if let Err(e) = engine.init() {
            warn!("Command engine failed to initialise: {}", e);
            return Self {
                engine,
                ready: false,
                commands: Vec::new(),
            };
        }

        let commands = match engine.commands() {
            Ok(list) => decode_names(list),
            Err(e) => {
                warn!("Command engine did not list its commands: {}", e);
                Vec::new()
            }
        };
        info!("Command engine ready ({} commands)", commands.len());

        Self {
            engine,
            ready: true,
            commands,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn handle(&mut self, line: &str) -> Result<Vec<Action>, EngineError> {
        self.engine.handle_command(line).map(decode_actions)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedEngine;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_start_collects_commands() {
        let engine = DelegatedEngine::start(Box::new(ScriptedEngine::replying(json!([]))));
        assert!(engine.is_ready());
        assert_eq!(engine.commands(), ["help", "theme"]);
    }

    #[test]
    fn test_failed_init_is_not_ready() {
        let mut scripted = ScriptedEngine::replying(json!([]));
        scripted.fail_init = true;
        let engine = DelegatedEngine::start(Box::new(scripted));
        assert!(!engine.is_ready());
        assert!(engine.commands().is_empty());
    }

    #[test]
    fn test_non_array_command_list_is_empty() {
        let mut scripted = ScriptedEngine::replying(json!([]));
        scripted.names = json!("help ls");
        let engine = DelegatedEngine::start(Box::new(scripted));
        assert!(engine.is_ready());
        assert!(engine.commands().is_empty());
    }

    #[test]
    fn test_handle_decodes_actions() {
        let mut engine = DelegatedEngine::start(Box::new(ScriptedEngine::replying(json!([
            {"kind": "print", "text": "hi"}
        ]))));
        assert_eq!(
            engine.handle("echo hi").unwrap(),
            vec![Action::Print { text: "hi".to_string() }]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_process_engine_protocol() {
        let script = r#"
            case "$1" in
                commands) echo '["help","ls"]' ;;
                handle) case "$2" in
                    garbage) echo 'not json' ;;
                    crash) echo err >&2; exit 3 ;;
                    *) printf '[{"kind":"print","text":"%s"}]' "$2" ;;
                esac ;;
            esac
        "#;
        let process = ProcessEngine::new(
            "sh",
            vec!["-c".to_string(), script.to_string(), "sh".to_string()],
        );
        let mut engine = DelegatedEngine::start(Box::new(process));

        assert!(engine.is_ready());
        assert_eq!(engine.commands(), ["help", "ls"]);
        assert_eq!(
            engine.handle("echo hi").unwrap(),
            vec![Action::Print { text: "echo hi".to_string() }]
        );
        assert!(engine.handle("garbage").unwrap().is_empty());

        match engine.handle("crash") {
            Err(EngineError::Failed { program, stderr, .. }) => {
                assert_eq!(program, "sh");
                assert_eq!(stderr, "err");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_program_path() {
        let mut engine = ProcessEngine::new("/definitely/not/here/cmd-engine", Vec::new());
        assert!(matches!(engine.init(), Err(EngineError::NotFound(_))));
    }
}
