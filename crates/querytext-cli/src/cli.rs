use clap::{ArgAction, Parser, Subcommand, ValueHint};
use querytext_config::config::PlanFormat;

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the query text described by a plan file
    #[command(arg_required_else_help = true)]
    #[clap(name = "build", visible_alias = "b")]
    Build {
        /// Plan file to read, or `-` for stdin
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        plan: String,

        /// Reject plans whose groups do not balance
        #[arg(required = false, short, long)]
        strict: bool,

        /// Limit to append when the plan declares none
        #[arg(required = false, short, long)]
        limit: Option<u64>,

        /// Plan format, overriding the file extension
        #[arg(required = false, short, long)]
        format: Option<PlanFormat>,
    },

    /// List the supported comparison operators
    #[clap(name = "operators", visible_alias = "ops")]
    Operators,

    /// Print the configuration file to stdout
    Config,

    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,
}
