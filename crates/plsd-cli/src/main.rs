//! plsd: the private-ledger demo driver
//!
//! Runs the full lifecycle against the stores named in the settings file:
//! initialise the ledger, publish a payload as block 0, unlock and decrypt
//! it, check chain consistency, rotate the time-key, then decrypt and check
//! again to show that rotation left the ciphertext readable.

use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing::info;

use plsd_core::Settings;
use plsd_crypto::{token_gen, User};
use plsd_ledger::Ledger;

#[derive(Parser, Debug)]
#[command(
    name = "plsd",
    version,
    about = "Time-evolving pairing-based ledger for sensitive data"
)]
struct Cli {
    /// Path to the settings file (one value per line)
    #[arg(long, env = "PLSD_SETTINGS", default_value = "test/settings.txt")]
    settings: PathBuf,

    /// Payload to publish; a demo payload is created when the file is absent
    #[arg(long, env = "PLSD_INPUT", default_value = "test/payload.bin")]
    input: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PLSD_LOG", default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        settings = %cli.settings.display(),
        "plsd starting"
    );

    let settings = Settings::load(&cli.settings)
        .with_context(|| format!("loading settings from {}", cli.settings.display()))?;
    let ledger = Ledger::new(settings);

    let s = ledger.init().context("initialising the ledger")?;

    let user = User::generate();
    let token = token_gen(user.public_key(), &s);

    let input = ensure_payload(&cli.input)?;
    let index = ledger
        .add_block(&user, &token, &input)
        .with_context(|| format!("publishing {}", input.display()))?;
    println!("published {} as block {index}", input.display());

    let unlocked = user.unlock(&ledger.encapsulated_key(index)?);
    let decrypted = input.with_extension("dec");
    ledger
        .decrypt_block(index, &unlocked, &decrypted)
        .context("decrypting the freshly published block")?;
    println!("decrypted block {index} to {}", decrypted.display());

    ensure!(ledger.verify_chain(), "ledger failed its consistency check");

    let s_new = ledger.rotate(&s).context("rotating the time-key")?;
    ensure!(s_new != s, "rotation returned the old time-key");
    println!("time-key rotated");

    let unlocked = user.unlock(&ledger.encapsulated_key(index)?);
    let decrypted_again = input.with_extension("dec2");
    ledger
        .decrypt_block(index, &unlocked, &decrypted_again)
        .context("decrypting after rotation")?;
    println!(
        "decrypted block {index} again to {}",
        decrypted_again.display()
    );

    ensure!(
        ledger.verify_chain(),
        "ledger failed its consistency check after rotation"
    );
    ensure!(
        fs::read(&decrypted)? == fs::read(&decrypted_again)?,
        "decryptions before and after rotation differ"
    );

    println!("ledger consistent, before and after rotation");
    Ok(())
}

/// Make sure there is something to publish; the demo writes its own payload
/// when the named file does not exist.
fn ensure_payload(path: &PathBuf) -> Result<PathBuf> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, b"plsd demo payload: rotate me and I still decrypt\n")
            .with_context(|| format!("creating demo payload {}", path.display()))?;
        info!(path = %path.display(), "created demo payload");
    }
    Ok(path.clone())
}

fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
