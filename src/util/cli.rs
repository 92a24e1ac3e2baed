use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::core::types::ClientId;
use crate::db::{self, MemoryStore};
use crate::password::{PasswordError, PasswordGenerator, DEFAULT_LENGTH};
use crate::redirect::{RedirectPolicy, SafeRedirectChecker};

#[derive(Parser)]
#[clap(
    name = "kenmon-util",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct Options {
    /// Comma separated hosts trusted as redirect targets
    #[clap(long, env = "LOGIN_REDIRECT_ALLOWED_HOSTS", default_value = "")]
    allowed_hosts: String,
    /// JSON file of registered OAuth applications
    #[clap(long, env = "OAUTH_APPLICATIONS")]
    applications: Option<PathBuf>,
    #[clap(subcommand)]
    command: SubCommand,
}

#[derive(Subcommand)]
enum SubCommand {
    CheckRedirect(CheckRedirect),
    GeneratePassword(GeneratePassword),
}

#[derive(Args)]
struct CheckRedirect {
    #[clap(short, long)]
    url: String,
    #[clap(long)]
    host: String,
    #[clap(long)]
    client_id: Option<String>,
    /// Treat the request as having arrived over https
    #[clap(long)]
    secure: bool,
}

#[derive(Args)]
struct GeneratePassword {
    #[clap(short, long, default_value_t = DEFAULT_LENGTH)]
    length: usize,
    /// Characters to fill the password with after the leading digit and letter
    #[clap(short, long)]
    chars: Vec<String>,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] db::Error),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Unsafe,
}

fn get_store(opts: &Options) -> Result<MemoryStore, Error> {
    match &opts.applications {
        Some(path) => Ok(MemoryStore::load_json(path)?),
        None => Ok(MemoryStore::new()),
    }
}

fn check_redirect<W: Write>(c: &CheckRedirect, opts: &Options, out: &mut W) -> Result<Outcome, Error> {
    let store = get_store(opts)?;
    let policy = RedirectPolicy::from_delimited_hosts(&opts.allowed_hosts);
    let checker = SafeRedirectChecker::new(store, policy);

    let client_id = c.client_id.as_ref().map(|id| ClientId(id.to_string()));
    let safe = checker.is_safe(&c.url, &c.host, client_id.as_ref(), c.secure);

    if safe {
        writeln!(out, "safe")?;
        Ok(Outcome::Done)
    } else {
        writeln!(out, "unsafe")?;
        Ok(Outcome::Unsafe)
    }
}

fn generate_password<W: Write>(c: &GeneratePassword, out: &mut W) -> Result<Outcome, Error> {
    let chars: Vec<&str> = c.chars.iter().map(AsRef::as_ref).collect();
    let chars = if chars.is_empty() { None } else { Some(&chars[..]) };

    let password = PasswordGenerator::new().generate(c.length, chars)?;
    writeln!(out, "{}", password.as_ref())?;

    Ok(Outcome::Done)
}

pub fn run_cli_action<W: Write>(opts: Options, out: &mut W) -> Result<Outcome, Error> {
    use SubCommand::*;

    match &opts.command {
        CheckRedirect(c) => check_redirect(c, &opts, out),
        GeneratePassword(c) => generate_password(c, out),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn run(args: &[&str]) -> (Result<Outcome, Error>, String) {
        let opts = Options::try_parse_from(args.iter().copied()).unwrap();
        let mut out = Vec::new();
        let result = run_cli_action(opts, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn check_redirect_against_allow_list() {
        let (result, out) = run(&[
            "kenmon-util",
            "--allowed-hosts",
            "test.edx.org",
            "check-redirect",
            "--url",
            "https://test.edx.org/courses",
            "--host",
            "edx.org",
            "--secure",
        ]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(out, "safe\n");
    }

    #[test]
    fn check_redirect_reports_unsafe() {
        let (result, out) = run(&[
            "kenmon-util",
            "check-redirect",
            "--url",
            "http://edx.org/courses",
            "--host",
            "edx.org",
            "--secure",
        ]);
        assert_eq!(result.unwrap(), Outcome::Unsafe);
        assert_eq!(out, "unsafe\n");
    }

    #[test]
    fn check_redirect_with_application_registry() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"client_id": "mobile", "redirect_uris": ["https://test.com/test"]}}]"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let (result, _) = run(&[
            "kenmon-util",
            "--applications",
            path,
            "check-redirect",
            "--url",
            "https://test.com/test",
            "--host",
            "edx.org",
            "--client-id",
            "mobile",
        ]);
        assert_eq!(result.unwrap(), Outcome::Done);
    }

    #[test]
    fn generate_password_with_chars() {
        let (result, out) = run(&[
            "kenmon-util",
            "generate-password",
            "--length",
            "12",
            "--chars",
            "!",
        ]);
        assert_eq!(result.unwrap(), Outcome::Done);
        assert_eq!(&out.trim_end()[2..], "!".repeat(10));
    }

    #[test]
    fn generate_password_rejects_short_length() {
        let (result, out) = run(&["kenmon-util", "generate-password", "--length", "7"]);
        assert!(matches!(result, Err(Error::Password(PasswordError::InvalidLength { .. }))));
        assert!(out.is_empty());
    }

    #[test]
    fn generate_password_defaults_to_twelve() {
        let (result, out) = run(&["kenmon-util", "generate-password"]);
        assert_eq!(result.unwrap(), Outcome::Done);

        let password = out.trim_end();
        assert_eq!(password.len(), DEFAULT_LENGTH);
        assert!(password[..1].chars().all(|c| c.is_ascii_digit()));
        assert!(password[1..2].chars().all(|c| c.is_ascii_alphabetic()));
    }
}
