use std::path::PathBuf;
use std::str::FromStr;

use safewatch_api::models::{ParseNameError, Position, SensorKind, ThresholdField};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// One line typed on stdin.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Status,
    Alerts,
    Acknowledge(String),
    Clear,
    Export(Option<PathBuf>),
    SetThreshold(ThresholdField, String),
    ResetThreshold(Option<ThresholdField>),
    Sensors,
    AddSensor {
        kind: SensorKind,
        position: Position,
        label: String,
    },
    RenameSensor(String, String),
    ToggleSensor(String),
    RemoveSensor { id: String, confirmed: bool },
    Trigger(String),
    Plans,
    UsePlan(String),
    AddPlan(PathBuf),
    RemovePlan(String),
    Profiles,
    SaveProfile { email: String, display_name: Option<String> },
    UseProfile(Option<String>),
    RemoveProfile(String),
    ExportProfiles(PathBuf),
    ImportProfiles(PathBuf),
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseCommandError {
    #[error("Unknown command `{0}`, type `help`")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    Name(#[from] ParseNameError),

    #[error("Not a number: {0}")]
    Number(String),
}

pub const HELP: &str = "\
status                         current readings and severities
alerts                         journal, newest first
ack <id>                       acknowledge an alert
clear                          clear the journal
export [file]                  journal as CSV
set <field> <value>            edit a threshold (saved after a short pause)
reset [field]                  restore one or every threshold
sensors                        sensors on the active plan
add <kind> <x> <y> [label]     place a sensor on the active plan
rename <id> <label>            rename a sensor
toggle <id>                    enable or disable a sensor
remove <id> [yes]              remove a sensor
trigger <id>                   simulate an alarm on a sensor
plans | plan <id>              list plans or switch the active one
plan add <image> | plan rm <id>
profiles                       list profiles
profile save <email> [name]    save a profile
profile use <email|none>       set the active profile
profile rm <email>             remove a profile
profile export|import <file>   profiles as JSON
quit";

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(ParseCommandError::Usage("help"));
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("help" | "?", _) => Command::Help,
            ("status", []) => Command::Status,
            ("alerts", []) => Command::Alerts,
            ("ack", [id]) => Command::Acknowledge(id.to_string()),
            ("ack", _) => return Err(ParseCommandError::Usage("ack <id>")),
            ("clear", []) => Command::Clear,
            ("export", []) => Command::Export(None),
            ("export", [path]) => Command::Export(Some(PathBuf::from(path))),
            ("set", [field, value]) => Command::SetThreshold(field.parse()?, value.to_string()),
            ("set", _) => return Err(ParseCommandError::Usage("set <field> <value>")),
            ("reset", []) => Command::ResetThreshold(None),
            ("reset", [field]) => Command::ResetThreshold(Some(field.parse()?)),
            ("sensors", []) => Command::Sensors,
            ("add", [kind, x, y, label @ ..]) => Command::AddSensor {
                kind: kind.parse()?,
                position: Position::new(number(x)?, number(y)?),
                label: label.join(" "),
            },
            ("add", _) => return Err(ParseCommandError::Usage("add <kind> <x> <y> [label]")),
            ("rename", [id, label @ ..]) if !label.is_empty() => {
                Command::RenameSensor(id.to_string(), label.join(" "))
            }
            ("rename", _) => return Err(ParseCommandError::Usage("rename <id> <label>")),
            ("toggle", [id]) => Command::ToggleSensor(id.to_string()),
            ("remove", [id]) => Command::RemoveSensor {
                id: id.to_string(),
                confirmed: false,
            },
            ("remove", [id, answer]) => Command::RemoveSensor {
                id: id.to_string(),
                confirmed: matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
            },
            ("trigger", [id]) => Command::Trigger(id.to_string()),
            ("plans", []) => Command::Plans,
            ("plan", ["add", path]) => Command::AddPlan(PathBuf::from(path)),
            ("plan", ["rm", id]) => Command::RemovePlan(id.to_string()),
            ("plan", [id]) => Command::UsePlan(id.to_string()),
            ("plan", _) => return Err(ParseCommandError::Usage("plan <id> | plan add <image> | plan rm <id>")),
            ("profiles", []) => Command::Profiles,
            ("profile", ["save", email, name @ ..]) => Command::SaveProfile {
                email: email.to_string(),
                display_name: (!name.is_empty()).then(|| name.join(" ")),
            },
            ("profile", ["use", "none"]) => Command::UseProfile(None),
            ("profile", ["use", email]) => Command::UseProfile(Some(email.to_string())),
            ("profile", ["rm", email]) => Command::RemoveProfile(email.to_string()),
            ("profile", ["export", path]) => Command::ExportProfiles(PathBuf::from(path)),
            ("profile", ["import", path]) => Command::ImportProfiles(PathBuf::from(path)),
            ("profile", _) => return Err(ParseCommandError::Usage("profile save|use|rm|export|import ...")),
            ("quit" | "exit", []) => Command::Quit,
            (other, _) => return Err(ParseCommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

fn number(raw: &str) -> Result<f64, ParseCommandError> {
    raw.parse::<f64>()
        .map_err(|_| ParseCommandError::Number(raw.to_string()))
}

pub struct CommandHandler {
    pub cmd_tx: mpsc::Sender<Command>,
    pub cmd_rx: mpsc::Receiver<Command>,
}

impl CommandHandler {
    pub fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        CommandHandler { cmd_tx, cmd_rx }
    }

    /// Read stdin line by line and forward every parsed command.
    pub fn start_stdin_processor(&self) {
        tokio::spawn({
            let cmd_tx_owned = self.cmd_tx.to_owned();
            async move {
                let mut lines = BufReader::new(io::stdin()).lines();

                loop {
                    let line = match lines.next_line().await {
                        Ok(Some(line)) => line,
                        Ok(None) => {
                            tracing::debug!("stdin closed");
                            break;
                        }
                        Err(e) => {
                            tracing::error!("failed to read stdin: {}", e);
                            break;
                        }
                    };

                    if line.trim().is_empty() {
                        continue;
                    }

                    match line.parse::<Command>() {
                        Ok(command) => {
                            tracing::debug!("Receive: {:?}", command);

                            if cmd_tx_owned.send(command).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => println!("{e}"),
                    }
                }
            }
        });
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("status".parse(), Ok(Command::Status));
        assert_eq!("ACK evt-3".parse(), Ok(Command::Acknowledge("evt-3".to_string())));
        assert_eq!("export".parse(), Ok(Command::Export(None)));
        assert_eq!("reset smoke".parse(), Ok(Command::ResetThreshold(Some(ThresholdField::Smoke))));
    }

    #[test]
    fn test_parse_add_sensor() {
        let command: Command = "add temp 12.5 80 Roof Panel".parse().unwrap();

        assert_eq!(
            command,
            Command::AddSensor {
                kind: SensorKind::Temperature,
                position: Position::new(12.5, 80.0),
                label: "Roof Panel".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_remove_needs_yes() {
        assert_eq!(
            "remove s-gate".parse(),
            Ok(Command::RemoveSensor {
                id: "s-gate".to_string(),
                confirmed: false
            })
        );
        assert_eq!(
            "remove s-gate yes".parse(),
            Ok(Command::RemoveSensor {
                id: "s-gate".to_string(),
                confirmed: true
            })
        );
    }

    #[test]
    fn test_parse_profile_commands() {
        assert_eq!(
            "profile save ada@example.com Ada Lovelace".parse(),
            Ok(Command::SaveProfile {
                email: "ada@example.com".to_string(),
                display_name: Some("Ada Lovelace".to_string()),
            })
        );
        assert_eq!("profile use none".parse(), Ok(Command::UseProfile(None)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("fly".parse::<Command>(), Err(ParseCommandError::Unknown("fly".to_string())));
        assert_eq!(
            "add door x 10".parse::<Command>(),
            Err(ParseCommandError::Number("x".to_string()))
        );
        assert!(matches!("set humidity 3".parse::<Command>(), Err(ParseCommandError::Name(_))));
        assert!(matches!("ack".parse::<Command>(), Err(ParseCommandError::Usage(_))));
    }
}
