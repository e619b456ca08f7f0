//! email-classifier — classify emails from the command line
//!
//! Usage:
//!   email-classifier [demo]                          Classify the built-in sample emails
//!   email-classifier classify --subject <s> --body <b>
//!   email-classifier batch <emails.json>             Classify a JSON array of {subject, body}
//!   email-classifier categories                      List the category vocabulary

use anyhow::{bail, Context};
use email_classifier::{
    ClassificationResult, ClassifierConfig, EmailClassifier, EmailMessage, ScriptedGateway,
    ScriptedReply,
};
use std::path::PathBuf;
use std::sync::Arc;

const DRY_RUN_REPLY: &str =
    "Category: personal\nConfidence: 0.5\nReasoning: Dry run, no model was called.";

const SAMPLE_EMAILS: [(&str, &str); 4] = [
    (
        "URGENT: Server down - need immediate attention",
        "Our main server has crashed and customers cannot access the website. This needs immediate attention as it's affecting our revenue.",
    ),
    (
        "Meeting invitation: Project kickoff next Tuesday",
        "Hi team, I'd like to schedule our project kickoff meeting for next Tuesday at 2 PM. Please let me know if you're available.",
    ),
    (
        "Weekly project status update",
        "Here's our weekly update on the mobile app project. We've completed 3 features this week and are on track for the milestone.",
    ),
    (
        "Congratulations! You've won $1,000,000!",
        "Click here to claim your prize! This is definitely not spam and totally legitimate.",
    ),
];

struct GlobalOptions {
    config_path: Option<PathBuf>,
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    // The original script read its key from .env; keep that convenience.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(args).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let (options, rest) = split_global_options(args)?;
    let command = rest.first().map(String::as_str).unwrap_or("demo");

    match command {
        "demo" => cmd_demo(&build_classifier(&options)?).await,
        "classify" => cmd_classify(&build_classifier(&options)?, &rest[1..]).await,
        "batch" => cmd_batch(&build_classifier(&options)?, &rest[1..]).await,
        "categories" => {
            for category in email_classifier::Category::ALL {
                println!("{category}");
            }
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("email-classifier {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command: {other}")
        }
    }
}

fn print_usage() {
    println!(
        r#"email-classifier — classify emails with a chat-completion model

USAGE:
    email-classifier [OPTIONS] [COMMAND]

COMMANDS:
    demo                                  Classify the built-in sample emails (default)
    classify --subject <s> --body <b>     Classify one email
    batch <emails.json>                   Classify a JSON array of {{"subject", "body"}}
    categories                            List the category vocabulary
    version                               Show version information
    help                                  Show this help message

OPTIONS:
    --config <file.yaml>                  Load configuration from a YAML file
    --dry-run                             Use a canned reply instead of calling the API

ENVIRONMENT:
    OPENAI_API_KEY                        API key (also read from ./.env)
    OPENAI_BASE_URL                       API base URL
    EMAIL_CLASSIFIER_MODEL                Model name
    AI_HTTP_TIMEOUT_SECS                  Request timeout in seconds
    AI_PROXY_URL                          HTTP proxy
    RUST_LOG                              Log filter (default: warn)"#
    );
}

fn split_global_options(args: Vec<String>) -> anyhow::Result<(GlobalOptions, Vec<String>)> {
    let mut options = GlobalOptions {
        config_path: None,
        dry_run: false,
    };
    let mut rest = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config requires a path")?;
                options.config_path = Some(PathBuf::from(path));
            }
            "--dry-run" => options.dry_run = true,
            _ => rest.push(arg),
        }
    }
    Ok((options, rest))
}

fn build_classifier(options: &GlobalOptions) -> anyhow::Result<EmailClassifier> {
    let base = match &options.config_path {
        Some(path) => ClassifierConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ClassifierConfig::default(),
    };
    let config = base.with_overrides(|key| std::env::var(key).ok());

    if options.dry_run {
        let gateway = ScriptedGateway::repeating(ScriptedReply::text(DRY_RUN_REPLY));
        return Ok(EmailClassifier::with_gateway(Arc::new(gateway), &config));
    }
    Ok(EmailClassifier::from_config(&config)?)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn prefix(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

fn print_result(result: &ClassificationResult) {
    if result.success() {
        println!("✅ Category: {}", result.category());
        println!("📊 Confidence: {:.2}", result.confidence());
        println!("💭 Reasoning: {}", result.reasoning());
    } else {
        println!("❌ Error: {}", result.error().unwrap_or_default());
    }
}

async fn cmd_demo(classifier: &EmailClassifier) -> anyhow::Result<()> {
    let emails: Vec<EmailMessage> = SAMPLE_EMAILS
        .iter()
        .map(|(subject, body)| EmailMessage::new(*subject, *body))
        .collect();

    println!("🤖 AI Email Classifier Demo");
    println!("{}", "=".repeat(50));

    for (i, email) in emails.iter().enumerate() {
        println!("\n📧 Email {}:", i + 1);
        println!("Subject: {}", email.subject);
        println!("Body: {}...", prefix(&email.body, 100));

        let result = classifier.classify_email(&email.subject, &email.body).await;
        print_result(&result);
        println!("{}", "-".repeat(50));
    }

    println!("\n🔄 Batch Classification:");
    for result in classifier.classify_batch(&emails).await {
        if result.success() {
            println!(
                "'{}...' → {} ({:.2})",
                prefix(result.original_subject().unwrap_or_default(), 30),
                result.category(),
                result.confidence()
            );
        }
    }
    Ok(())
}

async fn cmd_classify(classifier: &EmailClassifier, args: &[String]) -> anyhow::Result<()> {
    let subject = flag_value(args, "--subject").context("classify requires --subject <s>")?;
    let body = flag_value(args, "--body").unwrap_or_default();

    println!("Subject: {subject}");
    let result = classifier.classify_email(subject, body).await;
    print_result(&result);
    if !result.success() {
        bail!("classification failed: {}", result.reasoning());
    }
    Ok(())
}

async fn cmd_batch(classifier: &EmailClassifier, args: &[String]) -> anyhow::Result<()> {
    let path = args.first().context("batch requires a JSON file path")?;
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let emails: Vec<EmailMessage> = serde_json::from_str(&contents)
        .with_context(|| format!("{path} is not a JSON array of {{subject, body}} objects"))?;

    let results = classifier.classify_batch(&emails).await;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
