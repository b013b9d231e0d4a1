use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::form_data::FormField;
use crate::types::UserType;

/// Signup Wizard - drive a resumable marketplace signup session
#[derive(Parser, Debug)]
#[command(name = "signup-wizard")]
#[command(about = "Step through the rental marketplace signup flow; progress is kept between runs")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the saved session (overrides config and SIGNUP_WIZARD_DIR)
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Print the session as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current step and form data
    Show,
    /// Set form fields, e.g. `set userType=boarding_owner fullName="A B"`
    Set {
        /// One or more `field=value` assignments
        #[arg(required = true, value_parser = parse_assignment)]
        assignments: Vec<(FormField, String)>,
    },
    /// Merge a JSON object into the form data (`null` clears a field)
    Patch {
        /// JSON object, e.g. '{"phone":"0771234567","district":null}'
        json: String,
    },
    /// Clear form fields back to empty
    Clear {
        /// Field names, e.g. `phone postalCode`
        #[arg(required = true, value_parser = parse_field)]
        fields: Vec<FormField>,
    },
    /// Go to the next step
    Next,
    /// Go back one step
    Prev,
    /// Jump to a step number (1-7); other numbers are ignored
    Goto {
        #[arg(allow_negative_numbers = true)]
        step: i64,
    },
    /// Discard the session and its saved state
    Reset,
    /// List the steps and which ones a role visits
    Steps {
        /// Role to show the path for (defaults to the session's role)
        #[arg(long, value_parser = parse_role)]
        role: Option<UserType>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

fn parse_field(s: &str) -> Result<FormField, String> {
    FormField::parse(s).map_err(|e| e.to_string())
}

fn parse_role(s: &str) -> Result<UserType, String> {
    s.parse()
        .map_err(|_| format!("unknown role '{}' (expected boarding_finder or boarding_owner)", s))
}

fn parse_assignment(s: &str) -> Result<(FormField, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{}'", s))?;
    Ok((parse_field(name.trim())?, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("fullName=A B").unwrap(),
            (FormField::FullName, "A B".to_string())
        );
        assert_eq!(
            parse_assignment("description=a=b").unwrap(),
            (FormField::Description, "a=b".to_string())
        );
        assert!(parse_assignment("fullName").is_err());
        assert!(parse_assignment("nickname=x").is_err());
    }

    #[test]
    fn test_goto_accepts_out_of_range_numbers() {
        let cli = Cli::try_parse_from(["signup-wizard", "goto", "-1"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Goto { step: -1 })));

        let cli = Cli::try_parse_from(["signup-wizard", "goto", "--", "-9"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Goto { step: -9 })));

        let cli = Cli::try_parse_from(["signup-wizard", "goto", "4294967296"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Goto { step: 4_294_967_296 })));

        assert!(Cli::try_parse_from(["signup-wizard", "goto", "two"]).is_err());
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["signup-wizard", "goto", "4"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Goto { step: 4 })));

        let cli = Cli::try_parse_from([
            "signup-wizard",
            "--storage-dir",
            "/tmp/s",
            "set",
            "userType=boarding_finder",
        ])
        .unwrap();
        assert_eq!(cli.storage_dir, Some(PathBuf::from("/tmp/s")));
        match cli.command {
            Some(Commands::Set { assignments }) => {
                assert_eq!(assignments[0].0, FormField::UserType);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli =
            Cli::try_parse_from(["signup-wizard", "steps", "--role", "boarding_owner"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Steps {
                role: Some(UserType::BoardingOwner)
            })
        ));
    }
}
