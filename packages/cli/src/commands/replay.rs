use super::{load_config, load_page};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use scriptcard_editor::{
    Anchor, CardId, ClipboardError, CopyAttempt, ErrandCopy, MemoryClipboard, Millis, NodeId,
    ScriptCardApp,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Page description (JSON markup)
    pub page: PathBuf,

    /// Event script (JSON)
    #[arg(short, long)]
    pub script: PathBuf,

    /// Editor config file (defaults to scriptcard.config.json in the cwd)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the final page snapshot as JSON
    #[arg(long)]
    pub snapshot: bool,
}

/// Recorded user session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub events: Vec<Step>,
}

/// One event, optionally at a host timestamp. Time never runs backwards;
/// steps without `at` happen at the previous step's time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<Millis>,
    #[serde(flatten)]
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    Input { name: String, value: String },
    Click { node: usize },
    Copy { card: usize },
    EditInput { value: String },
    Key { key: String },
    Blur,
    ResetCard { card: usize },
    ClearForm,
    ToggleErrand { form: usize },
    ErrandInput { form: usize, id: String, value: String },
    CopyErrand { form: usize },
    ClearErrand { form: usize },
    /// Make every following clipboard write fail
    FailClipboard {
        #[serde(default)]
        message: Option<String>,
    },
    RestoreClipboard,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid event script")
    }
}

pub fn replay(args: ReplayArgs, cwd: &Path) -> Result<()> {
    let config = load_config(args.config.as_ref(), cwd)?;
    let page = load_page(&args.page)?;
    let source = fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let script = Script::from_json(&source)?;

    let mut app = ScriptCardApp::new(page, config, MemoryClipboard::new())?;
    info!(events = script.events.len(), "Replaying script");

    println!("▶️  {} {}", "Replaying".green().bold(), args.script.display());
    println!();

    let mut now: Millis = 0;
    for (index, step) in script.events.iter().enumerate() {
        if let Some(at) = step.at {
            now = now.max(at);
        }
        let fired = app.tick(now);
        if fired > 0 {
            println!("   {:>6}ms  {} {} task(s)", now, "⏱".dimmed(), fired);
        }

        let line = run_step(&mut app, &step.event, now)
            .with_context(|| format!("Event {} ({:?}) failed", index, step.event))?;
        println!("   {:>6}ms  {}", now, line);
    }

    println!();
    match app.clipboard().contents() {
        Some(text) => {
            println!("📋 {}", "Clipboard".green().bold());
            for line in text.lines() {
                println!("   {}", line);
            }
        }
        None => println!("📋 {}", "Clipboard is empty".dimmed()),
    }

    if args.snapshot {
        println!();
        println!("{}", serde_json::to_string_pretty(&app.snapshot())?);
    }

    Ok(())
}

fn run_step(app: &mut ScriptCardApp<MemoryClipboard>, event: &Event, now: Millis) -> Result<String> {
    let anchor = Anchor::default();

    let line = match event {
        Event::Input { name, value } => {
            if app.input_field(name, value) {
                format!("input {} = {:?}", name, value)
            } else {
                format!("{} input {}", "ignored".yellow(), name)
            }
        }
        Event::Click { node } => {
            let outcome = app.click_node(NodeId(*node), &anchor, now)?;
            format!("click {} → {}", NodeId(*node), serde_json::to_string(&outcome)?)
        }
        Event::Copy { card } => {
            let attempt = app.validate_and_copy(CardId(*card), &anchor, now)?;
            format!("copy {} → {}", CardId(*card), describe(&attempt))
        }
        Event::EditInput { value } => {
            app.edit_input(value)?;
            format!("edit {:?}", value)
        }
        Event::Key { key } => match app.edit_key(key)? {
            Some(text) => format!("key {} → committed {:?}", key, text),
            None => format!("key {}", key),
        },
        Event::Blur => match app.blur() {
            Some(text) => format!("blur → committed {:?}", text),
            None => "blur".to_string(),
        },
        Event::ResetCard { card } => {
            app.reset_card(CardId(*card))?;
            format!("reset {}", CardId(*card))
        }
        Event::ClearForm => {
            app.clear_form();
            "clear form".to_string()
        }
        Event::ToggleErrand { form } => {
            let collapsed = app.toggle_errand(*form)?;
            format!("errand {} collapsed = {}", form, collapsed)
        }
        Event::ErrandInput { form, id, value } => {
            app.errand_input(*form, id, value)?;
            format!("errand {} {} = {:?}", form, id, value)
        }
        Event::CopyErrand { form } => match app.copy_errand(*form, now)? {
            ErrandCopy::Copied(_) => format!("errand {} {}", form, "copied".green()),
            ErrandCopy::NothingToCopy => format!("errand {} {}", form, "nothing to copy".yellow()),
            ErrandCopy::Failed => format!("errand {} {}", form, "copy failed".red()),
        },
        Event::ClearErrand { form } => {
            app.clear_errand(*form, now)?;
            format!("errand {} cleared", form)
        }
        Event::FailClipboard { message } => {
            let message = message.clone().unwrap_or_else(|| "denied".to_string());
            app.clipboard_mut()
                .set_failure(Some(ClipboardError::Unavailable(message)));
            "clipboard now failing".to_string()
        }
        Event::RestoreClipboard => {
            app.clipboard_mut().set_failure(None);
            "clipboard restored".to_string()
        }
    };

    Ok(line)
}

fn describe(attempt: &CopyAttempt) -> String {
    match attempt {
        CopyAttempt::Copied { .. } => "copied".green().to_string(),
        CopyAttempt::CopyFailed { error } => format!("{} ({})", "failed".red(), error),
        CopyAttempt::NeedsForm { node } => format!("{} at {}", "form required".yellow(), node),
        CopyAttempt::NeedsEdit { node } => format!("{} {}", "editing".yellow(), node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptcard_editor::{EditorConfig, Page};

    const SUPPORT_PAGE: &str = include_str!("../../../../demos/support_page.json");

    #[test]
    fn test_parse_script() {
        let json = r#"{
            "events": [
                { "event": "input", "name": "customerName", "value": "Alex" },
                { "event": "copy", "card": 1, "at": 500 },
                { "event": "key", "key": "Enter" },
                { "event": "failClipboard" },
                { "event": "blur" }
            ]
        }"#;

        let script = Script::from_json(json).unwrap();

        assert_eq!(script.events.len(), 5);
        assert_eq!(script.events[1].at, Some(500));
        assert_eq!(script.events[1].event, Event::Copy { card: 1 });
        assert_eq!(
            script.events[3].event,
            Event::FailClipboard { message: None }
        );
        assert_eq!(script.events[4].event, Event::Blur);
    }

    #[test]
    fn test_unknown_event_rejected() {
        assert!(Script::from_json(r#"{ "events": [{ "event": "drag" }] }"#).is_err());
    }

    #[test]
    fn test_run_steps_against_support_page() {
        let page = Page::from_json(SUPPORT_PAGE).unwrap();
        let mut app =
            ScriptCardApp::new(page, EditorConfig::default(), MemoryClipboard::new()).unwrap();

        let events = [
            Event::Copy { card: 1 },
            Event::EditInput {
                value: "refund".to_string(),
            },
            Event::Key {
                key: "Enter".to_string(),
            },
            Event::Click { node: 4 },
            Event::EditInput {
                value: "Friday".to_string(),
            },
            Event::Blur,
            Event::Copy { card: 1 },
        ];
        for event in &events {
            run_step(&mut app, event, 0).unwrap();
        }

        assert_eq!(
            app.clipboard().contents(),
            Some("I'll look into refund for you.\nExpect an update by Friday.")
        );
    }

    #[test]
    fn test_edit_without_session_fails_step() {
        let page = Page::from_json(SUPPORT_PAGE).unwrap();
        let mut app =
            ScriptCardApp::new(page, EditorConfig::default(), MemoryClipboard::new()).unwrap();

        assert!(run_step(
            &mut app,
            &Event::EditInput {
                value: "x".to_string()
            },
            0
        )
        .is_err());
    }
}
