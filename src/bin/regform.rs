//! CLI binary for regform.
//!
//! A thin shim over the library crate that fills a form from CLI flags,
//! submits it, and prints the composed payload.

use anyhow::{Context, Result};
use clap::Parser;
use regform::form::encode::split_data_url;
use regform::config::MIB;
use regform::{
    submit, Field, FormConfig, FormState, Gender, ImageFile, LogTransmitter, SubmitOutcome,
    ValidationErrors,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

/// Largest `--max-image-mb` whose byte count still fits in a `u64`.
const MAX_IMAGE_MB: u64 = u64::MAX / MIB;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Validate and print the payload as JSON
  regform --first-name Ana --last-name Ivanova --email a@b.com \
          --password abcd --birth-date 2000-01-01 --image avatar.png --json

  # Also write the 128x128 preview thumbnail
  regform ... --image avatar.jpg --preview preview.png

  # Accept larger images
  regform ... --max-image-mb 5

EXIT CODES:
  0  payload composed
  2  validation failed (one "field: message" line per failing field)
  1  any other failure (unreadable image, bad flags)
"#;

/// Validate a registration and encode its image as a data URL.
#[derive(Parser, Debug)]
#[command(
    name = "regform",
    version,
    about = "Validate a registration form and encode its image as a data URL",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[arg(long, env = "REGFORM_FIRST_NAME", default_value = "")]
    first_name: String,

    #[arg(long, env = "REGFORM_LAST_NAME", default_value = "")]
    last_name: String,

    #[arg(long, env = "REGFORM_EMAIL", default_value = "")]
    email: String,

    #[arg(long, env = "REGFORM_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    #[arg(long, env = "REGFORM_GENDER", value_enum)]
    gender: Option<GenderArg>,

    /// Birth date, e.g. 2000-01-01.
    #[arg(long, env = "REGFORM_BIRTH_DATE", default_value = "")]
    birth_date: String,

    /// Image to upload (PNG or JPEG).
    #[arg(long, env = "REGFORM_IMAGE")]
    image: Option<PathBuf>,

    /// Images must be smaller than this many MiB.
    #[arg(long, env = "REGFORM_MAX_IMAGE_MB", default_value_t = 2,
          value_parser = clap::value_parser!(u64).range(1..=MAX_IMAGE_MB))]
    max_image_mb: u64,

    /// Minimum password length.
    #[arg(long, env = "REGFORM_MIN_PASSWORD_LEN", default_value_t = 4)]
    min_password_len: usize,

    /// Write the preview thumbnail (PNG) to this file.
    #[arg(long, env = "REGFORM_PREVIEW")]
    preview: Option<PathBuf>,

    /// Print the payload as JSON on stdout.
    #[arg(long, env = "REGFORM_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "REGFORM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "REGFORM_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(v: GenderArg) -> Self {
        match v {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", red("✘"), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    let config = FormConfig::builder()
        .max_image_bytes(image_limit_bytes(cli.max_image_mb)?)
        .min_password_len(cli.min_password_len)
        .build()
        .context("Invalid configuration")?;

    let mut form = fill_form(cli, config).await?;

    // Without a preview there is nothing to write; validation reports why.
    if let (Some(path), Some(url)) = (&cli.preview, form.preview()) {
        write_preview(url, path).await?;
    }

    match submit(&mut form, &LogTransmitter).await {
        SubmitOutcome::Submitted(payload) => {
            if cli.json {
                let json = serde_json::to_string_pretty(&payload)
                    .context("Failed to serialise payload")?;
                println!("{json}");
            }
            if !cli.quiet {
                let image = split_data_url(payload.image())
                    .map(|(mime, bytes)| format!("{mime}, {} bytes", bytes.len()))
                    .unwrap_or_default();
                eprintln!(
                    "{} Registration for {} composed  {}",
                    green("✔"),
                    payload.email(),
                    dim(&image)
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Invalid(errors) => {
            print_errors(&errors);
            Ok(ExitCode::from(2))
        }
        SubmitOutcome::EncodeFailed(e) => Err(e).context("Failed to encode image"),
        SubmitOutcome::TransmitFailed { error, .. } => Err(error).context("Submission failed"),
    }
}

fn image_limit_bytes(mb: u64) -> Result<u64> {
    mb.checked_mul(MIB)
        .with_context(|| format!("--max-image-mb {mb} does not fit in bytes"))
}

/// Map CLI args onto a fresh form.
async fn fill_form(cli: &Cli, config: FormConfig) -> Result<FormState> {
    let mut form = FormState::new(config);
    form.set_text(Field::FirstName, cli.first_name.as_str())?;
    form.set_text(Field::LastName, cli.last_name.as_str())?;
    form.set_text(Field::Email, cli.email.as_str())?;
    form.set_text(Field::Password, cli.password.as_str())?;
    form.set_text(Field::BirthDate, cli.birth_date.as_str())?;
    if let Some(gender) = cli.gender {
        form.set_gender(gender.into());
    }

    if let Some(ref path) = cli.image {
        let file = ImageFile::from_path(path)
            .await
            .with_context(|| format!("Failed to open image {:?}", path))?;
        form.select_image(Some(file)).await;
    }
    Ok(form)
}

/// Decode the preview data URL and write it as a PNG file.
async fn write_preview(url: &str, path: &Path) -> Result<()> {
    let (_, png) = split_data_url(url).context("Preview is not a base64 data URL")?;
    tokio::fs::write(path, png)
        .await
        .with_context(|| format!("Failed to write preview to {:?}", path))?;
    tracing::info!("Preview written to {}", path.display());
    Ok(())
}

fn print_errors(errors: &ValidationErrors) {
    for (field, error) in errors.iter() {
        eprintln!("{field}: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("regform").chain(args.iter().copied()))
    }

    #[test]
    fn max_image_mb_is_bounded_to_u64_bytes() {
        let cli = parse(&["--max-image-mb", &MAX_IMAGE_MB.to_string()]).unwrap();
        assert_eq!(
            image_limit_bytes(cli.max_image_mb).unwrap(),
            MAX_IMAGE_MB * MIB
        );

        assert!(parse(&["--max-image-mb", &(MAX_IMAGE_MB + 1).to_string()]).is_err());
        assert!(parse(&["--max-image-mb", "0"]).is_err());
        assert!(image_limit_bytes(MAX_IMAGE_MB + 1).is_err());
    }

    #[tokio::test]
    async fn preview_without_image_reports_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("preview.png");
        let cli = parse(&[
            "--first-name",
            "Ana",
            "--last-name",
            "Ivanova",
            "--email",
            "a@b.com",
            "--password",
            "abcd",
            "--birth-date",
            "2000-01-01",
            "--preview",
            out.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(run(&cli).await.unwrap(), ExitCode::from(2));
        assert!(!out.exists());
    }
}
