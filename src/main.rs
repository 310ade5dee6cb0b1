use std::time::Duration;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};

use ai_draft::config::{API_KEY_ENV, DEFAULT_HEARTBEAT_SECS, DraftConfig};
use ai_draft::draft::export::clipboard_text;
use ai_draft::draft::prompt::PRESETS;
use ai_draft::draft::{DraftGenerator, Tone};
use ai_draft::heartbeat::Heartbeat;
use ai_draft::llm::create_client;
use ai_draft::session::{Command, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = DraftConfig::from_env();

    eprintln!("✉️  AI Draft v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    if config.llm.api_key.is_none() {
        eprintln!("   Warning: {API_KEY_ENV} not set, drafts will use the local fallback");
    }
    eprintln!("   Records: {}", config.output_dir.display());

    run(config).await?;
    Ok(())
}

async fn run(config: DraftConfig) -> ai_draft::Result<()> {
    let generator = DraftGenerator::new(create_client(&config.llm)?);

    let mut heartbeat = Heartbeat::new(
        config
            .heartbeat_interval
            .unwrap_or(Duration::from_secs(DEFAULT_HEARTBEAT_SECS)),
    );
    if config.heartbeat_interval.is_some() {
        heartbeat.start();
    }

    let tone = match config.initial_tone.as_deref() {
        Some(label) => label.parse()?,
        None => Tone::default(),
    };
    let mut session = Session::new(config.initial_recipients.clone(), tone);

    eprintln!("   Type a prompt and press Enter. /help for commands.\n");
    eprintln!("   {}", session.status());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprint!("> ");
    while let Some(line) = lines.next_line().await? {
        match session.handle_command(&line) {
            Command::Nothing => {}
            Command::Notice(text) => eprintln!("   {text}"),
            Command::Output(text) => println!("{text}"),
            Command::Help => print_help(),
            Command::Quit => break,
            Command::ToggleHeartbeat => {
                heartbeat.toggle();
                eprintln!("   {}", heartbeat.status());
            }
            Command::Generate(prompt) => generate(&generator, &mut session, &prompt).await,
            Command::Save => {
                if let Some(record) = session.sent_record(Utc::now()) {
                    match record.save_to(&config.output_dir).await {
                        Ok(path) => eprintln!("   Saved {}", path.display()),
                        Err(e) => eprintln!("   Could not save record: {e}"),
                    }
                }
            }
        }
        eprint!("> ");
    }

    heartbeat.stop();
    Ok(())
}

async fn generate(generator: &DraftGenerator, session: &mut Session, prompt: &str) {
    match generator.generate(&session.request(prompt)).await {
        Ok(outcome) => {
            if let Some(advisory) = &outcome.advisory {
                eprintln!("⚠️  {advisory}");
            }
            println!("{}\n", clipboard_text(&outcome.result.subject, &outcome.result.body));
            eprintln!("   (source: {})", outcome.result.source.label());
            session.record(&outcome);
        }
        Err(e) => eprintln!("   {e}"),
    }
}

fn print_help() {
    eprintln!("Commands:");
    eprintln!("  <text>            draft an email from the prompt");
    eprintln!("  /to <list>        set recipients (comma, semicolon or newline separated)");
    eprintln!("  /add <address>    add one recipient");
    eprintln!("  /remove <n>       remove recipient number n");
    eprintln!(
        "  /tone <name>      set tone ({})",
        Tone::ALL.map(|t| t.to_string()).join(", ")
    );
    eprintln!("  /preset <n>       draft from a canned prompt (0 = default)");
    for (i, preset) in PRESETS.iter().enumerate() {
        eprintln!("      {}: {}", i + 1, preset);
    }
    eprintln!("  /subject <text>   replace the last draft's subject");
    eprintln!("  /body <text>      replace the last draft's body (\\n for line breaks)");
    eprintln!("  /raw              print the last raw AI output");
    eprintln!("  /mailto           print a mailto: link for the last draft");
    eprintln!("  /save             save the last draft as a JSON record");
    eprintln!("  /heartbeat        toggle the heartbeat and show the last beat");
    eprintln!("  /quit             exit");
}
