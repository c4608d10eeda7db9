// ABOUTME: CLI argument definitions for Linear CLI application
// ABOUTME: Defines global flags and the auth, whoami, issue, cycle and team command trees

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::parse_duration;
use crate::constants::{files, limits};

#[derive(Parser, Debug)]
#[command(name = "linear")]
#[command(about = "Manage Linear issues and cycles from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose diagnostics
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_input: bool,

    /// API request timeout (e.g. 10s, 2m, 500ms)
    #[arg(long, global = true, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Linear API key (overrides env and stored auth)
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    /// Show current Linear user
    Whoami,
    /// Manage issues
    Issue {
        #[command(subcommand)]
        command: IssueCommand,
    },
    /// Manage cycles
    Cycle {
        #[command(subcommand)]
        command: CycleCommand,
    },
    /// Manage teams
    Team {
        #[command(subcommand)]
        command: TeamCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AuthCommand {
    /// Store a Linear API key
    Login,
    /// Show authentication status
    Status,
    /// Remove stored authentication
    Logout,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TeamCommand {
    /// List teams
    List,
}

#[derive(Subcommand, Debug, Clone)]
pub enum IssueCommand {
    /// List issues
    List(IssueListArgs),
    /// View issue details
    View(IssueViewArgs),
    /// Create an issue
    Create(IssueCreateArgs),
    /// Update an issue
    Update(IssueUpdateArgs),
    /// Close an issue
    Close {
        /// Issue identifier (e.g., ENG-123) or ID
        issue_id: String,
    },
    /// Reopen an issue
    Reopen {
        /// Issue identifier (e.g., ENG-123) or ID
        issue_id: String,
    },
    /// Add a comment to an issue
    Comment(IssueCommentArgs),
    /// Download issue attachments
    Attachments(DownloadArgs),
    /// Download uploads linked from the issue description and comments
    Uploads(DownloadArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct IssueListArgs {
    /// Team key or ID
    #[arg(long)]
    pub team: Option<String>,

    /// Assignee (me, id, or email)
    #[arg(long)]
    pub assignee: Option<String>,

    /// Workflow state name or ID
    #[arg(long)]
    pub state: Option<String>,

    /// Comma-separated label names or IDs
    #[arg(long = "label")]
    pub labels: Option<String>,

    /// Project name or ID
    #[arg(long)]
    pub project: Option<String>,

    /// Cycle ID or 'current'
    #[arg(long)]
    pub cycle: Option<String>,

    /// Search issue titles
    #[arg(long)]
    pub search: Option<String>,

    /// Priority (0-4)
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=4))]
    pub priority: Option<i64>,

    /// Maximum number of issues
    #[arg(long, default_value_t = limits::DEFAULT_ISSUE_LIMIT)]
    pub limit: i64,

    /// Pagination cursor
    #[arg(long)]
    pub after: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct IssueViewArgs {
    /// Issue identifier (e.g., ENG-123) or ID
    pub issue_id: String,

    /// Include comments
    #[arg(long)]
    pub comments: bool,

    /// Maximum number of comments
    #[arg(long, default_value_t = limits::DEFAULT_COMMENTS_LIMIT)]
    pub comments_limit: i64,

    /// Include uploads
    #[arg(long)]
    pub uploads: bool,

    /// Maximum number of uploads/comments to scan
    #[arg(long, default_value_t = limits::DEFAULT_UPLOADS_LIMIT)]
    pub uploads_limit: i64,
}

#[derive(Args, Debug, Clone, Default)]
pub struct IssueCreateArgs {
    /// Team key or ID
    #[arg(long)]
    pub team: Option<String>,

    /// Issue title
    #[arg(long)]
    pub title: Option<String>,

    /// Issue description or '-' for stdin
    #[arg(long)]
    pub description: Option<String>,

    /// Assignee (me, id, or email)
    #[arg(long)]
    pub assignee: Option<String>,

    /// Workflow state name or ID
    #[arg(long)]
    pub state: Option<String>,

    /// Priority (0-4)
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=4))]
    pub priority: Option<i64>,

    /// Project name or ID
    #[arg(long)]
    pub project: Option<String>,

    /// Cycle ID or 'current'
    #[arg(long)]
    pub cycle: Option<String>,

    /// Comma-separated label names or IDs
    #[arg(long)]
    pub labels: Option<String>,

    /// Comma-separated issue IDs or keys this issue blocks
    #[arg(long)]
    pub blocks: Option<String>,

    /// Comma-separated issue IDs or keys blocking this issue
    #[arg(long)]
    pub blocked_by: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct IssueUpdateArgs {
    /// Issue identifier (e.g., ENG-123) or ID
    pub issue_id: String,

    /// Team key or ID
    #[arg(long)]
    pub team: Option<String>,

    /// Issue title
    #[arg(long)]
    pub title: Option<String>,

    /// Issue description or '-' for stdin
    #[arg(long)]
    pub description: Option<String>,

    /// Assignee (me, id, or email)
    #[arg(long)]
    pub assignee: Option<String>,

    /// Workflow state name or ID
    #[arg(long)]
    pub state: Option<String>,

    /// Priority (0-4)
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=4))]
    pub priority: Option<i64>,

    /// Project name or ID
    #[arg(long)]
    pub project: Option<String>,

    /// Cycle ID or 'current'
    #[arg(long)]
    pub cycle: Option<String>,

    /// Comma-separated label names or IDs
    #[arg(long)]
    pub labels: Option<String>,

    /// Comma-separated issue IDs or keys this issue blocks
    #[arg(long)]
    pub blocks: Option<String>,

    /// Comma-separated issue IDs or keys blocking this issue
    #[arg(long)]
    pub blocked_by: Option<String>,

    /// Comma-separated issue IDs or keys to remove from blocks
    #[arg(long)]
    pub remove_blocks: Option<String>,

    /// Comma-separated issue IDs or keys to remove from blocked-by
    #[arg(long)]
    pub remove_blocked_by: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct IssueCommentArgs {
    /// Issue identifier (e.g., ENG-123) or ID
    pub issue_id: String,

    /// Comment body or '-' for stdin
    #[arg(long)]
    pub body: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DownloadArgs {
    /// Issue identifier (e.g., ENG-123) or ID
    pub issue_id: String,

    /// Directory to save files into
    #[arg(long, default_value = files::DEFAULT_DOWNLOAD_DIR)]
    pub dir: PathBuf,

    /// Maximum number of attachments/comments to scan
    #[arg(long, default_value_t = limits::DEFAULT_ATTACHMENT_SCAN_LIMIT)]
    pub limit: i64,

    /// Overwrite existing files
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CycleCommand {
    /// List cycles for a team
    List(CycleListArgs),
    /// View cycle details
    View {
        /// Cycle ID
        cycle_id: String,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CycleListArgs {
    /// Team key or ID
    #[arg(long)]
    pub team: Option<String>,

    /// Only show current/active cycles
    #[arg(long)]
    pub current: bool,

    /// Maximum number of cycles to fetch
    #[arg(long, default_value_t = limits::DEFAULT_CYCLE_LIMIT)]
    pub limit: i64,

    /// Pagination cursor
    #[arg(long)]
    pub after: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "linear");
        for name in ["auth", "whoami", "issue", "cycle", "team"] {
            assert!(cli.find_subcommand(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "linear", "team", "list", "--json", "-q", "--timeout", "2m", "--api-key", "k",
        ])
        .unwrap();
        assert!(cli.global.json);
        assert!(cli.global.quiet);
        assert_eq!(cli.global.timeout, Some(Duration::from_secs(120)));
        assert_eq!(cli.global.api_key.as_deref(), Some("k"));
        assert!(matches!(
            cli.command,
            Commands::Team {
                command: TeamCommand::List
            }
        ));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["linear", "--timeout", "soon", "whoami"]).is_err());
    }

    #[test]
    fn test_issue_list_defaults() {
        let cli = Cli::try_parse_from(["linear", "issue", "list", "--label", "bug,ui"]).unwrap();
        match cli.command {
            Commands::Issue {
                command: IssueCommand::List(args),
            } => {
                assert_eq!(args.limit, 50);
                assert_eq!(args.priority, None);
                assert_eq!(args.labels.as_deref(), Some("bug,ui"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_priority_range() {
        assert!(Cli::try_parse_from(["linear", "issue", "list", "--priority", "0"]).is_ok());
        assert!(Cli::try_parse_from(["linear", "issue", "list", "--priority", "5"]).is_err());
    }

    #[test]
    fn test_update_relation_flags() {
        let cli = Cli::try_parse_from([
            "linear",
            "issue",
            "update",
            "ENG-1",
            "--blocks",
            "ENG-2",
            "--remove-blocked-by",
            "ENG-3",
        ])
        .unwrap();
        match cli.command {
            Commands::Issue {
                command: IssueCommand::Update(args),
            } => {
                assert_eq!(args.issue_id, "ENG-1");
                assert_eq!(args.blocks.as_deref(), Some("ENG-2"));
                assert_eq!(args.remove_blocked_by.as_deref(), Some("ENG-3"));
                assert_eq!(args.blocked_by, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_download_defaults() {
        let cli = Cli::try_parse_from(["linear", "issue", "uploads", "ENG-1"]).unwrap();
        match cli.command {
            Commands::Issue {
                command: IssueCommand::Uploads(args),
            } => {
                assert_eq!(args.dir, PathBuf::from("attachments"));
                assert_eq!(args.limit, 50);
                assert!(!args.overwrite);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
