use std::{
    fmt::Write as _,
    fs::{self, File},
    process::ExitCode,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use uploadvalidator_api::{BASE_URL_ENV, GerritClient};
use uploadvalidator_engine::{EditAction, EditReport, PanelState, SettingsPanel, edit_and_save, load};
use uploadvalidator_tui::{AppOptions, TuiConfig};
use uploadvalidator_types::{NoticeLevel, SETTINGS, SettingDescriptor, find_setting};
use uploadvalidator_util::{UserPreferences, app_config_dir, redact_sensitive};

const LOG_FILE_NAME: &str = "uvadmin.log";
const CATALOG_WIDTH: usize = 88;

/// Edit the list settings of the uploadvalidator Gerrit plugin.
#[derive(Parser, Debug)]
#[command(name = "uvadmin", version, about)]
struct Cli {
    /// Gerrit base URL (defaults to $GERRIT_URL, then the last server used)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Open every setting read-only
    #[arg(long, global = true)]
    read_only: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every uploadvalidator setting of a project
    Show {
        #[command(flatten)]
        repo: RepoArg,
        /// Print the settings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add values to a setting and save
    Add(EditArgs),
    /// Remove values from a setting and save
    Remove(EditArgs),
    /// List the settings this tool can edit
    Settings,
    /// Open the interactive editor
    Tui {
        /// Project to open (defaults to the last one opened)
        #[arg(long)]
        repo: Option<String>,
    },
}

#[derive(Args, Debug)]
struct RepoArg {
    /// Gerrit project name, e.g. platform/build
    #[arg(long)]
    repo: String,
}

#[derive(Args, Debug)]
struct EditArgs {
    #[command(flatten)]
    repo: RepoArg,
    /// Setting key, see `uvadmin settings`
    setting: String,
    /// Values to add or remove
    #[arg(required = true)]
    values: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {}", redact_sensitive(&format!("{error:#}")));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let interactive = matches!(cli.command, None | Some(Command::Tui { .. }));
    init_tracing(interactive);

    let preferences = Arc::new(UserPreferences::new().unwrap_or_else(|error| {
        warn!(%error, "preferences unavailable; continuing without persistence");
        UserPreferences::ephemeral()
    }));

    match cli.command {
        Some(Command::Settings) => {
            print!("{}", render_catalog(SETTINGS));
            Ok(())
        }
        Some(Command::Show { repo, json }) => {
            let client = connect(cli.url, &preferences)?;
            let mut panel = SettingsPanel::new();
            let state = load(&mut panel, &client, &repo.repo).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(panel.configuration())?);
            } else {
                print!("{}", render_panel(&panel, &state));
            }
            Ok(())
        }
        Some(Command::Add(args)) => run_edit(cli.url, cli.read_only, &preferences, args, EditAction::Add).await,
        Some(Command::Remove(args)) => run_edit(cli.url, cli.read_only, &preferences, args, EditAction::Remove).await,
        Some(Command::Tui { repo }) => run_tui(cli.url, cli.read_only, preferences, repo).await,
        None => run_tui(cli.url, cli.read_only, preferences, None).await,
    }
}

/// Sends log output to a file while the terminal UI owns the screen, and to
/// stderr otherwise.
fn init_tracing(interactive: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if interactive {
        let directory = app_config_dir();
        let file = fs::create_dir_all(&directory).and_then(|_| File::create(directory.join(LOG_FILE_NAME)));
        match file {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
            Err(error) => eprintln!("warning: logging disabled: {error}"),
        }
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolves the server URL (`--url`, `$GERRIT_URL`, then preferences) and
/// builds an authenticated client.
fn connect(url: Option<String>, preferences: &UserPreferences) -> Result<GerritClient> {
    let url = url
        .or_else(|| std::env::var(BASE_URL_ENV).ok())
        .or_else(|| preferences.server_url());
    let client = GerritClient::from_env(url).context("cannot set up the Gerrit client")?;
    debug!(base_url = %client.base_url, authenticated = client.is_authenticated(), "connected");
    if let Err(error) = preferences.set_server_url(Some(client.base_url.clone())) {
        warn!(%error, "failed to remember server url");
    }
    Ok(client)
}

fn resolve_setting(name: &str) -> Result<&'static SettingDescriptor> {
    find_setting(name).ok_or_else(|| {
        let known: Vec<&str> = SETTINGS.iter().map(|setting| setting.key).collect();
        anyhow!("unknown setting '{name}'; expected one of: {}", known.join(", "))
    })
}

async fn run_edit(
    url: Option<String>,
    read_only: bool,
    preferences: &UserPreferences,
    args: EditArgs,
    action: EditAction,
) -> Result<()> {
    let setting = resolve_setting(&args.setting)?;
    if read_only {
        return Err(anyhow!("--read-only is set; refusing to modify '{}'", setting.key));
    }
    let client = connect(url, preferences)?;
    let mut panel = SettingsPanel::new();
    let report = edit_and_save(&mut panel, &client, &args.repo.repo, setting.key, action, &args.values)
        .await
        .with_context(|| format!("could not update {} on {}", setting.key, args.repo.repo))?;
    print!("{}", render_report(setting, action, &report));
    Ok(())
}

async fn run_tui(
    url: Option<String>,
    read_only: bool,
    preferences: Arc<UserPreferences>,
    repo: Option<String>,
) -> Result<()> {
    let repo = repo
        .or_else(|| preferences.last_repository())
        .context("no project given; pass --repo")?;
    let client = connect(url, &preferences)?;
    let options = AppOptions {
        server_url: client.base_url.clone(),
        read_only,
    };
    uploadvalidator_tui::run(TuiConfig {
        api: Arc::new(client),
        preferences,
        repo,
        options,
    })
    .await
}

fn render_catalog(settings: &[SettingDescriptor]) -> String {
    let width = settings.iter().map(|setting| setting.key.len()).max().unwrap_or(0);
    let indent = " ".repeat(width + 2);
    let mut out = String::new();
    for setting in settings {
        let line = format!("{:width$}  {}", setting.key, setting.description);
        let options = textwrap::Options::new(CATALOG_WIDTH).subsequent_indent(&indent);
        let _ = writeln!(out, "{}", textwrap::fill(&line, options));
    }
    out
}

fn render_panel(panel: &SettingsPanel, state: &PanelState) -> String {
    let repo = panel.repo_name().unwrap_or_default();
    if *state == PanelState::Empty {
        return format!("{repo}: uploadvalidator is not configured for this project\n");
    }
    let mut out = format!("{repo}\n");
    for row in panel.editors() {
        let marker = if row.editable { "" } else { " (locked)" };
        let _ = writeln!(out, "  {} [{}]{marker}", row.descriptor.display_name, row.descriptor.key);
        if !row.populated {
            let _ = writeln!(out, "    (not set)");
        }
        for entry in row.editor.entries() {
            let _ = writeln!(out, "    - {entry}");
        }
    }
    for (key, setting) in panel.configuration() {
        if find_setting(key).is_none() {
            let _ = writeln!(out, "  [{key}]");
            for entry in &setting.values {
                let _ = writeln!(out, "    - {entry}");
            }
        }
    }
    out
}

fn render_report(setting: &SettingDescriptor, action: EditAction, report: &EditReport) -> String {
    let verb = match action {
        EditAction::Add => "added",
        EditAction::Remove => "removed",
    };
    let mut out = String::new();
    for value in &report.applied {
        let _ = writeln!(out, "{verb} '{value}' in {}", setting.key);
    }
    for value in &report.skipped {
        let reason = match action {
            EditAction::Add => "already present",
            EditAction::Remove => "not present",
        };
        let _ = writeln!(out, "skipped '{value}': {reason}");
    }
    for notice in &report.notices {
        if notice.level != NoticeLevel::Info {
            let _ = writeln!(out, "{notice}");
        }
    }
    if report.saved {
        let _ = writeln!(out, "saved");
    } else {
        let _ = writeln!(out, "nothing to save");
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uploadvalidator_types::{ConfigInfo, Notice};

    use super::*;

    #[test]
    fn edit_subcommand_parses_setting_and_values() {
        let cli = Cli::try_parse_from([
            "uvadmin",
            "--url",
            "https://review.example.com",
            "add",
            "--repo",
            "platform/build",
            "blockedFileExtension",
            "exe",
            "bat",
        ])
        .expect("valid arguments");
        assert_eq!(cli.url.as_deref(), Some("https://review.example.com"));
        match cli.command {
            Some(Command::Add(args)) => {
                assert_eq!(args.repo.repo, "platform/build");
                assert_eq!(args.setting, "blockedFileExtension");
                assert_eq!(args.values, vec!["exe".to_string(), "bat".to_string()]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn edit_requires_at_least_one_value() {
        assert!(Cli::try_parse_from(["uvadmin", "remove", "--repo", "p", "requiredFooter"]).is_err());
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["uvadmin", "--read-only"]).expect("valid arguments");
        assert!(cli.command.is_none());
        assert!(cli.read_only);
    }

    #[test]
    fn unknown_setting_is_rejected_with_catalog() {
        let error = resolve_setting("blockedExtensions").expect_err("unknown");
        let message = error.to_string();
        assert!(message.contains("blockedExtensions"));
        assert!(message.contains("blockedFileExtension"));
        assert!(resolve_setting("ref").is_ok());
    }

    #[test]
    fn panel_rendering_lists_entries_and_unset_settings() {
        let mut panel = SettingsPanel::new();
        let request = panel.activate("platform/build");
        let info: ConfigInfo = serde_json::from_value(json!({
            "plugin_config": { "uploadvalidator": {
                "blockedFileExtension": { "type": "ARRAY", "values": ["exe"] },
                "futureList": { "type": "ARRAY", "values": ["x"] }
            } }
        }))
        .expect("config info");
        panel.finish_load(request.generation, Ok(info));
        let text = render_panel(&panel, &panel.state());
        assert!(text.starts_with("platform/build\n"));
        assert!(text.contains("Blocked File Extensions [blockedFileExtension]\n    - exe\n"));
        assert!(text.contains("(not set)"));
        assert!(text.contains("  [futureList]\n    - x\n"));
    }

    #[test]
    fn report_mentions_skips_and_warnings() {
        let setting = resolve_setting("blockedFileExtension").expect("known");
        let report = EditReport {
            applied: vec!["bat".into()],
            skipped: vec!["exe".into()],
            saved: true,
            notices: vec![Notice::warning("Value already exists."), Notice::info("Settings saved.")],
        };
        let text = render_report(setting, EditAction::Add, &report);
        assert_eq!(
            text,
            "added 'bat' in blockedFileExtension\nskipped 'exe': already present\n[warning] Value already exists.\nsaved\n"
        );
    }

    #[test]
    fn catalog_lists_every_setting() {
        let text = render_catalog(SETTINGS);
        let keys: Vec<&str> = text
            .lines()
            .filter(|line| !line.starts_with(' '))
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        let expected: Vec<&str> = SETTINGS.iter().map(|setting| setting.key).collect();
        assert_eq!(keys, expected);
        assert!(text.lines().all(|line| line.chars().count() <= CATALOG_WIDTH));
    }
}
