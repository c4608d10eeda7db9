// ABOUTME: Wires settings, credentials and the API client together and dispatches commands
// ABOUTME: Maps failures to process exit codes and prints error hints on stderr

use anyhow::Result;
use linear_sdk::{CredentialStore, LinearApi, LinearClient, LinearError};
use log::debug;
use secrecy::{ExposeSecret, SecretString};
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::{AuthCommand, Commands, CycleCommand, GlobalArgs, IssueCommand, TeamCommand};
use crate::cli_output::CliOutput;
use crate::commands::auth::Prompt;
use crate::commands::{auth, cycle, issue, workspace};
use crate::config::Config;
use crate::constants::{env, timeouts};
use crate::credentials::{resolve_api_key, schema_cache_path};
use crate::download::Downloader;
use crate::output::{Format, Renderer};

/// Effective options after merging flags over config over defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub format: Format,
    pub use_color: bool,
    pub quiet: bool,
    pub no_input: bool,
    pub progress: bool,
    pub timeout: Duration,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub default_team: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: Format::Table,
            use_color: false,
            quiet: false,
            no_input: false,
            progress: false,
            timeout: timeouts::DEFAULT_REQUEST_TIMEOUT,
            api_key: None,
            api_url: None,
            default_team: None,
        }
    }
}

impl Settings {
    pub fn resolve(global: &GlobalArgs, config: &Config) -> Result<Self> {
        let format = if global.json {
            Format::Json
        } else {
            config.output_format().unwrap_or_default()
        };
        let timeout = match global.timeout {
            Some(timeout) => timeout,
            None => config
                .timeout()?
                .unwrap_or(timeouts::DEFAULT_REQUEST_TIMEOUT),
        };
        let use_color = !global.no_color
            && std::env::var_os(env::NO_COLOR).is_none()
            && io::stdout().is_terminal();

        Ok(Self {
            format,
            use_color,
            quiet: global.quiet,
            no_input: global.no_input,
            progress: !global.quiet && format != Format::Json && io::stderr().is_terminal(),
            timeout,
            api_key: global.api_key.clone(),
            api_url: config.api_url.clone(),
            default_team: config.default_team.clone(),
        })
    }
}

/// Builds the API client for a resolved key.
pub type Connector =
    Box<dyn Fn(SecretString, &Settings) -> Result<Arc<dyn LinearApi>, LinearError> + Send + Sync>;

pub fn connect_live(api_key: SecretString, settings: &Settings) -> Result<Arc<dyn LinearApi>, LinearError> {
    let client = LinearClient::builder()
        .auth_token(api_key)
        .timeout(settings.timeout)
        .base_url(settings.api_url.clone())
        .schema_path(schema_cache_path().ok())
        .build()?;
    Ok(Arc::new(client))
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::new(secret.expose_secret().to_string().into_boxed_str())
}

pub struct App<W: Write> {
    settings: Settings,
    store: CredentialStore,
    out: Renderer<W>,
    input: Box<dyn BufRead>,
    interactive: bool,
    connector: Connector,
}

impl<W: Write> App<W> {
    pub fn new(settings: Settings, store: CredentialStore, out: Renderer<W>, input: Box<dyn BufRead>) -> Self {
        Self {
            settings,
            store,
            out,
            input,
            interactive: false,
            connector: Box::new(connect_live),
        }
    }

    /// Prompt on the terminal instead of reading lines from the input.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connector = connector;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_output(self) -> W {
        self.out.into_inner()
    }

    fn connect(&self) -> Result<(Arc<dyn LinearApi>, SecretString)> {
        let (api_key, source) = resolve_api_key(self.settings.api_key.as_deref(), &self.store)?
            .ok_or_else(|| {
                anyhow::Error::new(LinearError::Unauthorized).context("No Linear API key configured")
            })?;
        debug!("using API key from {}", source);

        let api = (self.connector)(copy_secret(&api_key), &self.settings)?;
        Ok((api, api_key))
    }

    fn downloader(&self, api_key: SecretString) -> Result<Downloader> {
        Ok(Downloader::new(self.settings.timeout, Some(api_key))?.with_progress(self.settings.progress))
    }

    fn with_default_team(&self, team: Option<String>) -> Option<String> {
        team.or_else(|| self.settings.default_team.clone())
    }

    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Auth { command } => self.auth(command),
            Commands::Whoami => {
                let (api, _) = self.connect()?;
                workspace::whoami(api.as_ref(), &mut self.out).await
            }
            Commands::Team {
                command: TeamCommand::List,
            } => {
                let (api, _) = self.connect()?;
                workspace::team_list(api.as_ref(), &mut self.out).await
            }
            Commands::Cycle { command } => self.cycle(command).await,
            Commands::Issue { command } => self.issue(command).await,
        }
    }

    fn auth(&mut self, command: AuthCommand) -> Result<()> {
        let flag_key = self.settings.api_key.as_deref();
        match command {
            AuthCommand::Login => {
                let mut prompt = Prompt {
                    input: &mut self.input,
                    interactive: self.interactive,
                    no_input: self.settings.no_input,
                };
                auth::login(&self.store, flag_key, &mut prompt, &mut self.out)
            }
            AuthCommand::Status => auth::status(&self.store, flag_key, &mut self.out),
            AuthCommand::Logout => auth::logout(&self.store, &mut self.out),
        }
    }

    async fn cycle(&mut self, command: CycleCommand) -> Result<()> {
        let (api, _) = self.connect()?;
        match command {
            CycleCommand::List(mut args) => {
                args.team = self.with_default_team(args.team);
                cycle::list(api.as_ref(), &args, &mut self.out).await
            }
            CycleCommand::View { cycle_id } => cycle::view(api.as_ref(), &cycle_id, &mut self.out).await,
        }
    }

    async fn issue(&mut self, command: IssueCommand) -> Result<()> {
        // Comment bodies are checked before any network work.
        let comment_body = match &command {
            IssueCommand::Comment(args) if args.body.as_deref() != Some("-") => {
                Some(args.body.clone().unwrap_or_default())
            }
            _ => None,
        };
        if let Some(body) = comment_body {
            linear_sdk::issues::validate_comment_body(&body)?;
        }

        let (api, api_key) = self.connect()?;
        let api = api.as_ref();
        match command {
            IssueCommand::List(mut args) => {
                args.team = self.with_default_team(args.team);
                issue::list(api, &args, &mut self.out).await
            }
            IssueCommand::View(args) => issue::view(api, &args, &mut self.out).await,
            IssueCommand::Create(mut args) => {
                args.team = self.with_default_team(args.team);
                issue::create(api, &args, &mut self.input, &mut self.out).await
            }
            IssueCommand::Update(args) => issue::update(api, &args, &mut self.input, &mut self.out).await,
            IssueCommand::Close { issue_id } => issue::close(api, &issue_id, &mut self.out).await,
            IssueCommand::Reopen { issue_id } => issue::reopen(api, &issue_id, &mut self.out).await,
            IssueCommand::Comment(args) => issue::comment(api, &args, &mut self.input, &mut self.out).await,
            IssueCommand::Attachments(args) => {
                let downloader = self.downloader(api_key)?;
                issue::attachments(api, &args, &downloader, &mut self.out).await
            }
            IssueCommand::Uploads(args) => {
                let downloader = self.downloader(api_key)?;
                issue::uploads(api, &args, &downloader, &mut self.out).await
            }
        }
    }
}

fn linear_error(err: &anyhow::Error) -> Option<&LinearError> {
    err.chain().find_map(|cause| cause.downcast_ref::<LinearError>())
}

/// Exit code of the first `LinearError` in the chain, 1 for anything else.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    linear_error(err).map_or(1, LinearError::exit_code)
}

pub fn report_error(output: &CliOutput, err: &anyhow::Error) {
    output.error(&format!("{:#}", err));
    if let Some(help) = linear_error(err).and_then(LinearError::help_text) {
        output.hint(help);
    }
}
