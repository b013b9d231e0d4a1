//! Signup Wizard - command-line entry point
//!
//! Each invocation resumes the saved session, applies one command and saves
//! the result, the way a page reload resumes the signup form.

use anyhow::Context;
use strum::IntoEnumIterator;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use signup_wizard::cli::{Cli, Commands};
use signup_wizard::persistence::FileStore;
use signup_wizard::{
    FormDataPatch, FormField, KeyValueAdapter, SignupWizard, Step, StepSequencer, UserType,
    WizardConfig,
};

type FileWizard = SignupWizard<KeyValueAdapter<FileStore>>;

/// Initialize the logger; `RUST_LOG` overrides the default `info` level
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logger();

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<WizardConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from: {:?}", path);
            WizardConfig::load_from_file(path)?
        }
        None => WizardConfig::default(),
    }
    .apply_env();

    if let Some(dir) = &cli.storage_dir {
        config.storage_dir = dir.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    debug!("Using storage directory {:?}", config.storage_dir);

    let mut wizard = SignupWizard::initialize(config.file_adapter());

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => {}
        Commands::Set { assignments } => {
            let mut patch = FormDataPatch::new();
            for (field, value) in &assignments {
                patch.set_str(*field, value)?;
            }
            wizard.update_form_data(&patch);
        }
        Commands::Patch { json } => {
            let patch = FormDataPatch::from_json(&json).context("Invalid form data patch")?;
            wizard.update_form_data(&patch);
        }
        Commands::Clear { fields } => {
            let patch = fields
                .into_iter()
                .fold(FormDataPatch::new(), FormDataPatch::clearing);
            wizard.update_form_data(&patch);
        }
        Commands::Next => {
            wizard.next_step();
        }
        Commands::Prev => {
            wizard.prev_step();
        }
        Commands::Goto { step } => {
            if Step::from_number(u8::try_from(step).unwrap_or(0)).is_none() {
                println!("Step {} does not exist; staying put", step);
            }
            wizard.go_to_step(step);
        }
        Commands::Reset => {
            wizard.reset();
            println!("✓ Signup session reset");
        }
        Commands::Steps { role } => {
            print_steps(role.unwrap_or(wizard.user_type()), wizard.current_step());
            return Ok(());
        }
    }

    if cli.json {
        print_json(&wizard)?;
    } else {
        print_session(&wizard);
    }
    Ok(())
}

fn print_session(wizard: &FileWizard) {
    let step = wizard.current_step();
    let role = wizard.user_type();

    println!(
        "Step {}/{}: {} ({}% done)",
        step.number(),
        Step::TOTAL_STEPS,
        step,
        wizard.progress_percent()
    );
    println!("Role: {}", role);
    for violation in wizard.snapshot().violations() {
        println!("⚠ {}", violation);
    }

    let shown = wizard.form_data().redacted();
    for field in FormField::iter() {
        let hidden = field.is_owner_only() && role != UserType::BoardingOwner;
        if field == FormField::UserType || hidden {
            continue;
        }
        let marker = if step.fields().contains(&field) { ">" } else { " " };
        println!(
            "{} {:<16} {}",
            marker,
            field.to_string(),
            shown.value(field).unwrap_or("-")
        );
    }
}

fn print_json(wizard: &FileWizard) -> anyhow::Result<()> {
    let value = serde_json::json!({
        "currentStep": wizard.current_step().number(),
        "formData": wizard.form_data().redacted(),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_steps(role: UserType, current: Step) {
    let path = StepSequencer::reachable_steps(role);
    println!("Steps for role '{}':", role);
    for step in Step::iter() {
        let visited = if path.contains(&step) { "visit" } else { "skip" };
        let here = if step == current { " <- current" } else { "" };
        println!("  {}. {:<24} {}{}", step.number(), step.title(), visited, here);
    }
}
