//! Handlers for each CLI command.
//!
//! Data commands drive a [`DataOrchestrator`] the same way an interactive
//! host would: change the query, then apply results from the channel
//! until nothing is loading.

use color_eyre::eyre::{eyre, Result};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::adapters::{DirectorySaver, ReqwestHttpClient, SessionFile};
use crate::auth::{AuthClient, LoginOutcome, SessionStore};
use crate::config::DashboardConfig;
use crate::error::ApiError;
use crate::export::ExportCoordinator;
use crate::gateway::ApiGateway;
use crate::orchestrator::{settle, DataOrchestrator};
use crate::state::{Filter, FilterPatch, RequestStatus};
use crate::traits::{HttpClient, SessionStorage};

use super::render::{render_charts, render_list};

const LOGIN_NOTICE: &str = "You are not signed in. Run `cvedash login` first.";

/// Everything a command needs, wired from one config.
pub struct CommandContext<C> {
    pub config: DashboardConfig,
    pub session: Arc<SessionStore>,
    pub gateway: Arc<ApiGateway<C>>,
    pub auth: AuthClient<C>,
}

impl CommandContext<ReqwestHttpClient> {
    pub fn from_config(config: DashboardConfig) -> Self {
        let storage = match &config.session_dir {
            Some(dir) => SessionFile::in_dir(dir),
            None => SessionFile::new(),
        };
        Self::new(config, ReqwestHttpClient::new(), storage)
    }
}

impl<C: HttpClient + Clone + 'static> CommandContext<C> {
    pub fn new<S: SessionStorage + 'static>(config: DashboardConfig, http: C, storage: S) -> Self {
        let session = Arc::new(SessionStore::initialize(storage));
        let gateway = Arc::new(ApiGateway::new(
            config.api_url.clone(),
            http.clone(),
            Arc::clone(&session),
        ));
        let auth = AuthClient::new(config.api_url.clone(), http);
        Self {
            config,
            session,
            gateway,
            auth,
        }
    }
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn not_signed_in() -> color_eyre::Report {
    eyre!(LOGIN_NOTICE)
}

/// Turn a failed resource into a report, sending auth failures to login.
/// Retryable failures carry the recovery hint.
fn report(err: &ApiError) -> color_eyre::Report {
    if err.requires_reauth() {
        return not_signed_in();
    }
    if err.is_retryable() {
        return eyre!("{} ({})", err.user_message(), err.category().recovery_hint());
    }
    eyre!("{}", err.user_message())
}

pub async fn handle_login<C: HttpClient + Clone + 'static>(
    ctx: &CommandContext<C>,
    email: Option<String>,
) -> Result<()> {
    if ctx.session.has_token() {
        let who = ctx
            .session
            .subject()
            .unwrap_or_else(|| "the current account".to_string());
        println!("Already signed in as {}. Run `cvedash logout` to switch accounts.", who);
        return Ok(());
    }

    let email = match email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ")?;

    match ctx.auth.login_into(&ctx.session, &email, &password).await {
        Ok(LoginOutcome::SignedIn) => {
            println!("Signed in as {}.", email.trim());
            Ok(())
        }
        Ok(LoginOutcome::AlreadySignedIn) => {
            println!("Already signed in.");
            Ok(())
        }
        Err(ApiError::Server { detail, .. }) => Err(eyre!("Login failed: {}", detail)),
        Err(e) => Err(eyre!(e.user_message())),
    }
}

pub async fn handle_register<C: HttpClient + Clone + 'static>(
    ctx: &CommandContext<C>,
    email: Option<String>,
) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;

    match ctx.auth.register(&email, &password, &confirm).await {
        Ok(()) => {
            println!("Account created. Run `cvedash login` to sign in.");
            Ok(())
        }
        Err(ApiError::Server { detail, .. }) => Err(eyre!("Signup failed: {}", detail)),
        Err(e) => Err(eyre!(e.user_message())),
    }
}

pub fn handle_logout<C>(ctx: &CommandContext<C>) -> Result<()> {
    ctx.session.clear();
    println!("Logged out.");
    Ok(())
}

pub fn handle_whoami<C>(ctx: &CommandContext<C>) -> Result<()> {
    if !ctx.session.has_token() {
        return Err(not_signed_in());
    }
    match ctx.session.claims() {
        Some(claims) => {
            let who = claims.sub.as_deref().unwrap_or("(unknown account)");
            match claims.expires_at() {
                Some(at) => println!(
                    "{} (session expires {})",
                    who,
                    at.format("%Y-%m-%d %H:%M UTC")
                ),
                None => println!("{}", who),
            }
        }
        None => println!("Signed in."),
    }
    Ok(())
}

/// Print one page of the filtered catalog.
///
/// Only the list resource is fetched. Any page other than 1 needs the page
/// count first, so page 1 is loaded before moving to `page`.
pub async fn handle_list<C: HttpClient + Clone + 'static>(
    ctx: &CommandContext<C>,
    page: u32,
    filter: Filter,
) -> Result<()> {
    let (mut orchestrator, mut message_rx) = DataOrchestrator::new(Arc::clone(&ctx.gateway));
    orchestrator.set_stats_enabled(false);
    orchestrator.set_draft_filter(
        FilterPatch::cve_id(filter.cve_id).with_event_name(filter.event_name),
    );
    orchestrator.apply_filter();
    if orchestrator.login_required() {
        return Err(not_signed_in());
    }
    settle(&mut orchestrator, &mut message_rx).await;

    if page != 1 && orchestrator.list().is_ready() {
        if !orchestrator.set_page(page) {
            return Err(eyre!(
                "Page {} is out of range (1 to {})",
                page,
                orchestrator.query().total_pages()
            ));
        }
        settle(&mut orchestrator, &mut message_rx).await;
    }

    if orchestrator.login_required() {
        return Err(not_signed_in());
    }
    match orchestrator.list() {
        RequestStatus::Ready(list) => {
            print!("{}", render_list(list, orchestrator.query()));
            Ok(())
        }
        RequestStatus::Failed(err) => Err(report(err)),
        _ => Err(eyre!("The list did not finish loading")),
    }
}

pub async fn handle_stats<C: HttpClient + Clone + 'static>(ctx: &CommandContext<C>) -> Result<()> {
    let (mut orchestrator, mut message_rx) = DataOrchestrator::new(Arc::clone(&ctx.gateway));
    orchestrator.start();
    if orchestrator.login_required() {
        return Err(not_signed_in());
    }
    settle(&mut orchestrator, &mut message_rx).await;

    if orchestrator.login_required() {
        return Err(not_signed_in());
    }
    match (orchestrator.charts(), orchestrator.stats()) {
        (Some(charts), _) => {
            print!("{}", render_charts(&charts));
            Ok(())
        }
        (None, RequestStatus::Failed(err)) => Err(report(err)),
        _ => Err(eyre!("Statistics did not finish loading")),
    }
}

pub async fn handle_export<C: HttpClient + Clone + 'static>(
    ctx: &CommandContext<C>,
    filter: Filter,
) -> Result<()> {
    if !ctx.session.has_token() {
        return Err(not_signed_in());
    }
    let saver = DirectorySaver::new(&ctx.config.export_dir);
    let coordinator = ExportCoordinator::new(Arc::clone(&ctx.gateway), saver);

    match coordinator.trigger_export(&filter).await {
        Ok(path) => {
            println!("Saved {}", path.display());
            Ok(())
        }
        Err(ApiError::Unauthenticated) => {
            ctx.session.clear();
            Err(not_signed_in())
        }
        Err(e) => {
            let notice = coordinator.take_notice().unwrap_or_else(|| e.user_message());
            Err(eyre!("{} ({})", notice, e))
        }
    }
}

pub async fn handle_status<C: HttpClient + Clone + 'static>(ctx: &CommandContext<C>) -> Result<()> {
    match ctx.gateway.health_check().await {
        Ok(true) => {
            println!("{}: OK", ctx.gateway.base_url());
            Ok(())
        }
        Ok(false) => Err(eyre!("{}: backend reported a problem", ctx.gateway.base_url())),
        Err(e) => Err(eyre!("{}: {}", ctx.gateway.base_url(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_adds_hint_only_for_retryable_errors() {
        let server = ApiError::Server {
            status: 503,
            detail: "warming up".to_string(),
        };
        let text = report(&server).to_string();
        assert!(text.starts_with("Failed to fetch data: warming up"));
        assert!(text.contains("Change the filter or page to retry"));

        let garbled = ApiError::InvalidResponse("Unexpected response from server".to_string());
        assert_eq!(report(&garbled).to_string(), "Unexpected response from server");
    }

    #[test]
    fn test_report_sends_auth_failures_to_login() {
        assert_eq!(report(&ApiError::Unauthenticated).to_string(), LOGIN_NOTICE);
    }
}
