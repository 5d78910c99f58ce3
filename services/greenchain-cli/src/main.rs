mod command;
mod config;
mod host;
mod render;

use anyhow::bail;
use command::{Command, USAGE};
use config::CliConfig;
use gc_backend_http::HttpRewardsBackend;
use gc_client_core::{
    AppParts, CLAIM_PREFIX, ClientError, GreenChainApp, Notice, PageContext, Renderer,
};
use gc_session::{RocksDbStore, SessionStore, SystemClock};
use host::{ConfiguredWallet, TokioTimer};
use render::TerminalRenderer;
use std::io::Write;
use std::rc::Rc;
use tracing::info;
use uuid::Uuid;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let command = Command::parse(std::env::args().skip(1))?;
    match command {
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
        Command::SampleCodes(count) => {
            let mut out = std::io::stdout().lock();
            for code in sample_codes(count) {
                writeln!(out, "{code}")?;
            }
            return Ok(());
        }
        _ => {}
    }

    let config = CliConfig::from_env();
    let store = RocksDbStore::open_default(&config.session_db)?;
    let backend = HttpRewardsBackend::new(config.api_url.clone());
    info!(
        "greenchain {} using {} (sessions in {})",
        env!("CARGO_PKG_VERSION"),
        backend.endpoint(),
        config.session_db
    );

    let renderer = Rc::new(TerminalRenderer::stdout());
    let app = GreenChainApp::new(AppParts {
        page: page_for(&command),
        provider: Rc::new(ConfiguredWallet::new(config.wallet_address.clone())),
        sessions: SessionStore::new(Rc::new(store), Rc::new(SystemClock)),
        backend: Rc::new(backend),
        scanner: None,
        renderer: renderer.clone(),
        timer: Rc::new(TokioTimer),
    });

    run(&app, renderer.as_ref(), command).await;

    if renderer.failed() {
        bail!("command did not complete");
    }
    Ok(())
}

/// Claims go through the recycle page's manual-entry flow; everything else
/// drives the client directly.
fn page_for(command: &Command) -> PageContext {
    match command {
        Command::Claim(_) => PageContext::Recycle,
        _ => PageContext::Other,
    }
}

async fn run(app: &GreenChainApp, renderer: &dyn Renderer, command: Command) {
    match command {
        Command::Connect => app.connect().await,
        Command::Disconnect => app.disconnect(),
        Command::Status => {
            app.boot().await;
            if app.address().is_none() {
                renderer.wallet(app.page(), None);
            }
        }
        Command::Balance => {
            app.boot().await;
            if app.address().is_none() {
                renderer.notify(&Notice::Error(ClientError::NotConnected));
                return;
            }
            app.refresh_balance().await;
        }
        Command::Claim(code) => {
            app.boot().await;
            app.submit_manual(&code).await;
        }
        Command::Ngos => {
            app.boot().await;
            if let Err(err) = app.show_donation_options().await {
                renderer.notify(&Notice::Error(err));
            }
        }
        Command::Convert(amount) => {
            app.boot().await;
            app.refresh_balance().await;
            app.convert_tokens(amount).await;
        }
        Command::Donate {
            ngo_address,
            amount,
        } => {
            app.boot().await;
            app.refresh_balance().await;
            app.donate(&ngo_address, amount).await;
        }
        Command::Help | Command::SampleCodes(_) => {}
    }
}

/// Fresh claim codes in the backend's format: the prefix plus eight hex
/// characters of a random UUID.
fn sample_codes(count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let id = Uuid::new_v4().simple().to_string();
            format!("{CLAIM_PREFIX}{}", &id[..8])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gc_client_core::ClaimCode;
    use std::collections::HashSet;

    #[test]
    fn sample_codes_are_valid_claims() {
        let codes = sample_codes(20);
        assert_eq!(codes.len(), 20);
        for code in &codes {
            assert!(ClaimCode::parse(code).is_ok());
            assert_eq!(code.len(), CLAIM_PREFIX.len() + 8);
            assert!(code[CLAIM_PREFIX.len()..].chars().all(|c| c.is_ascii_hexdigit()));
        }
        assert_eq!(codes.iter().collect::<HashSet<_>>().len(), 20);
    }

    #[test]
    fn only_claims_use_the_recycle_flow() {
        assert_eq!(page_for(&Command::Claim("x".to_owned())), PageContext::Recycle);
        assert_eq!(page_for(&Command::Balance), PageContext::Other);
        assert_eq!(page_for(&Command::Convert(1)), PageContext::Other);
    }
}
