//! Interactive OAuth consent flow.
//!
//! Opens the consent page in a browser, receives the redirect on a local
//! listener and stores the resulting session.

use anyhow::{Context, Result};
use google_calendar::Client;
use google_calendar::types::MinAccessRole;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use crate::app_config;
use crate::session::{Session, SessionData};

/// Read/write access is needed to delete and insert mirror events
pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

const REDIRECT_PORT: u16 = 8085;

pub fn redirect_uri() -> String {
    format!("http://localhost:{}/callback", REDIRECT_PORT)
}

pub fn redirect_address() -> String {
    format!("127.0.0.1:{}", REDIRECT_PORT)
}

/// Run the consent flow and save the session at `session_path`.
/// Returns the account email (the primary calendar's id).
pub async fn authenticate(session_path: &Path) -> Result<String> {
    let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();

    let creds = app_config::load()?;

    let mut client = Client::new(
        creds.client_id.clone(),
        creds.client_secret.clone(),
        redirect_uri(),
        String::new(),
        String::new(),
    );

    let auth_url = client.user_consent_url(&scopes);

    eprintln!("\nOpen this URL in your browser to authenticate:\n");
    eprintln!("{}\n", auth_url);

    // Try to open the browser automatically
    if open::that(&auth_url).is_err() {
        eprintln!("(Could not open browser automatically, please copy the URL above)");
    }

    let listener = TcpListener::bind(redirect_address())
        .await
        .context("Failed to bind OAuth callback listener")?;
    let (code, state) = wait_for_callback(&listener).await?;

    eprintln!("\nReceived authorization code, exchanging for tokens...");

    let access_token = client
        .get_access_token(&code, &state)
        .await
        .context("Failed to exchange code for tokens")?;

    let mut session = Session::new(
        session_path.to_path_buf(),
        creds,
        SessionData::from(&access_token),
    );

    let calendars = session
        .client()
        .calendar_list()
        .list_all(MinAccessRole::default(), false, false)
        .await
        .context("Failed to fetch calendars")?
        .body;

    // user email (i.e. primary calendar)
    let account_email = calendars
        .iter()
        .find(|cal| cal.primary)
        .map(|cal| cal.id.clone())
        .ok_or_else(|| anyhow::anyhow!("No primary calendar found"))?;

    session.set_account_email(account_email.clone());
    session.save()?;

    eprintln!("Authentication successful!");

    Ok(account_email)
}

async fn wait_for_callback(listener: &TcpListener) -> Result<(String, String)> {
    let (stream, _) = listener
        .accept()
        .await
        .context("Failed to accept OAuth callback")?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .context("Failed to read OAuth callback request line")?;

    let (code, state) = parse_callback(&request_line)?;

    // Send a response to the browser
    let response = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>\
        <h1>Authentication successful!</h1>\
        <p>You can close this window and return to the terminal.</p>\
        </body></html>";

    let mut stream = reader.into_inner();
    stream
        .write_all(response.as_bytes())
        .await
        .context("Failed to write OAuth callback response")?;
    stream.flush().await?;

    Ok((code, state))
}

/// Extract `code` and `state` from a request line such as
/// `GET /callback?code=xxx&state=yyy HTTP/1.1`.
fn parse_callback(request_line: &str) -> Result<(String, String)> {
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Invalid HTTP request"))?;

    let url = url::Url::parse(&format!("http://localhost{}", url_part))?;

    if let Some((_, error)) = url.query_pairs().find(|(k, _)| k == "error") {
        anyhow::bail!("Authorization was denied: {}", error);
    }

    let code = url
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
        .ok_or_else(|| anyhow::anyhow!("No code in callback"))?;

    let state = url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string())
        .ok_or_else(|| anyhow::anyhow!("No state in callback"))?;

    Ok((code, state))
}
