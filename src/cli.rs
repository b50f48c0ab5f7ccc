use clap::{Args, Parser, Subcommand};

/// bookform - appointment request form rules from the terminal
#[derive(Debug, Parser)]
#[command(name = "bookform")]
#[command(about = "Check booking times and contact details against the appointment form rules", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (if not specified, starts an interactive form session)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Snap a time to the booking grid and window
    Snap {
        /// Time value (HH:MM)
        #[arg(required = true)]
        time: String,
    },

    /// Check a single contact field
    #[command(alias = "validate")]
    Check {
        /// Field name (fullName, mobile, email)
        #[arg(required = true)]
        field: String,

        /// Value to check
        #[arg(default_value = "")]
        value: String,
    },

    /// Show the selectable dates and booking hours
    Window {
        /// Date to treat as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },

    /// Submit a complete appointment request
    Submit(SubmitArgs),

    /// View or write the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigActions,
    },
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Full name
    #[arg(long, default_value = "")]
    pub full_name: String,

    /// Mobile number
    #[arg(long, default_value = "")]
    pub mobile: String,

    /// Email address (optional)
    #[arg(long, default_value = "")]
    pub email: String,

    /// Appointment date (YYYY-MM-DD), defaults to tomorrow
    #[arg(long)]
    pub date: Option<String>,

    /// Appointment time (HH:MM), snapped before submitting
    #[arg(long)]
    pub time: Option<String>,

    /// Print the outcome and resulting page as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum ConfigActions {
    /// Show the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit() {
        let cli = Cli::try_parse_from([
            "bookform",
            "submit",
            "--full-name",
            "John Doe",
            "--mobile",
            "9876543210",
            "--time",
            "10:07",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Submit(args)) => {
                assert_eq!(args.full_name, "John Doe");
                assert_eq!(args.email, "");
                assert_eq!(args.time.as_deref(), Some("10:07"));
                assert!(!args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_means_session() {
        let cli = Cli::try_parse_from(["bookform"]).unwrap();
        assert!(cli.command.is_none());
    }
}
