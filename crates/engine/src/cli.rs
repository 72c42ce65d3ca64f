use argh::FromArgs;
use uuid::Uuid;

/// RSVP engine operator tool
#[derive(Debug, FromArgs)]
pub struct CliOptions {
    /// print version information and exit
    #[argh(switch, short = 'V')]
    pub version: bool,

    #[argh(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
pub enum Command {
    Migrate(MigrateCommand),
    Party(PartyCommand),
    Guest(GuestCommand),
}

/// apply pending database migrations
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "migrate")]
pub struct MigrateCommand {}

/// print the party roll-up as JSON
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "party")]
pub struct PartyCommand {
    /// party id
    #[argh(positional)]
    pub party_id: Uuid,
}

/// print a guest's view as JSON
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "guest")]
pub struct GuestCommand {
    /// rsvp id
    #[argh(positional)]
    pub rsvp_id: Uuid,
}

/// What the binary does for a parsed command line.
#[derive(Debug)]
pub enum Invocation {
    Version,
    /// No subcommand given.
    Usage,
    Run(Command),
}

impl CliOptions {
    /// Parse the process arguments, exiting on `-V`, `--help` or a missing
    /// subcommand.
    pub fn parse() -> Command {
        let args: CliOptions = argh::from_env();

        match args.invocation() {
            Invocation::Run(command) => command,
            Invocation::Version => {
                println!("rsvp-engine {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Invocation::Usage => {
                eprintln!("{}", usage());
                eprintln!("\nError: a subcommand is required.");
                std::process::exit(2);
            }
        }
    }

    pub fn invocation(self) -> Invocation {
        if self.version {
            return Invocation::Version;
        }
        match self.command {
            Some(command) => Invocation::Run(command),
            None => Invocation::Usage,
        }
    }
}

fn usage() -> String {
    match CliOptions::from_args(&["rsvp-engine"], &["--help"]) {
        Err(early_exit) => early_exit.output,
        Ok(_) => String::new(),
    }
}
