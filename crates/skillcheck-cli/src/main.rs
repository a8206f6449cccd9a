//! skillcheck CLI: invite candidates, score submissions, record results, and summarise them.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "skillcheck",
    version,
    about = "Assessment scoring and grading engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a submission against an assessment without recording it
    Score {
        /// Assessment file (.toml or .json snapshot)
        #[arg(long)]
        assessment: PathBuf,

        /// Submission JSON ({"answers": {...}, "timeSpent": ...})
        #[arg(long)]
        submission: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Score a submission, record the result, and notify
    Submit {
        /// Assessment file (.toml or .json snapshot)
        #[arg(long)]
        assessment: PathBuf,

        /// Submission JSON
        #[arg(long)]
        submission: PathBuf,

        /// Invitation JSON written by `invite`; updated in place
        #[arg(long, conflicts_with_all = ["candidate_name", "phone", "email"])]
        invitation: Option<PathBuf>,

        /// Candidate name, for a submission without an invitation
        #[arg(long, required_unless_present = "invitation")]
        candidate_name: Option<String>,

        /// Candidate phone number for the result SMS
        #[arg(long)]
        phone: Option<String>,

        /// Candidate email
        #[arg(long)]
        email: Option<String>,

        /// Recruiter phone number (overrides config)
        #[arg(long)]
        recruiter_phone: Option<String>,

        /// Records directory (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Issue an invitation and send its access code to the candidate
    Invite {
        /// Assessment file (.toml or .json snapshot)
        #[arg(long)]
        assessment: PathBuf,

        /// Candidate name
        #[arg(long)]
        candidate_name: String,

        /// Candidate phone number for the invitation SMS
        #[arg(long)]
        phone: Option<String>,

        /// Candidate email
        #[arg(long)]
        email: Option<String>,

        /// Days until the access code expires
        #[arg(long)]
        expires_in_days: Option<u32>,

        /// Records directory (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate assessment files
    Validate {
        /// Path to assessment file or directory
        #[arg(long)]
        assessment: PathBuf,
    },

    /// Summarise recorded results
    Stats {
        /// Records directory
        #[arg(long, default_value = "./skillcheck-results")]
        records: PathBuf,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Include per-question statistics
        #[arg(long)]
        questions: bool,
    },

    /// Create starter config and example assessment
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(
                    "skillcheck=info"
                        .parse()
                        .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
                ),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            assessment,
            submission,
            format,
        } => commands::score::execute(assessment, submission, format),
        Commands::Submit {
            assessment,
            submission,
            invitation,
            candidate_name,
            phone,
            email,
            recruiter_phone,
            output,
            config,
        } => {
            commands::submit::execute(commands::submit::SubmitArgs {
                assessment,
                submission,
                invitation,
                candidate_name,
                phone,
                email,
                recruiter_phone,
                output,
                config,
            })
            .await
        }
        Commands::Invite {
            assessment,
            candidate_name,
            phone,
            email,
            expires_in_days,
            output,
            config,
        } => {
            commands::invite::execute(commands::invite::InviteArgs {
                assessment,
                candidate_name,
                phone,
                email,
                expires_in_days,
                output,
                config,
            })
            .await
        }
        Commands::Validate { assessment } => commands::validate::execute(assessment),
        Commands::Stats {
            records,
            format,
            questions,
        } => commands::stats::execute(records, format, questions),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
