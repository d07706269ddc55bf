//! Dashboard server with optional in-place editing
//!
//! `GET /` renders the page from the data files on every request. With an
//! [`EditSession`] attached, each editable section is one form whose
//! buttons post to `/edit`, `/add`, `/remove` or `/save`. Every post first
//! applies the form's field values to the working copy, then runs its
//! action and redirects back to `/`, where the outcome is shown once.

use anyhow::Result;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::ItemId;
use crate::editor::{Alert, EditError, EditEvent, EditSession, FieldEdit, ListKind, Section};
use crate::generator::Generator;
use crate::Dashboard;

/// Server state
pub struct ServerState {
    dashboard: Dashboard,
    generator: Generator,
    session: Option<Mutex<EditSession>>,
    alert: Mutex<Option<Alert>>,
}

impl ServerState {
    pub fn new(dashboard: &Dashboard, session: Option<EditSession>) -> Result<Self> {
        Ok(Self {
            dashboard: dashboard.clone(),
            generator: Generator::new(dashboard)?,
            session: session.map(Mutex::new),
            alert: Mutex::new(None),
        })
    }
}

/// Build the router
pub fn router(state: Arc<ServerState>) -> Router {
    let base_dir = &state.dashboard.base_dir;
    let data_dir = base_dir.join("data");
    let assets_dir = base_dir.join("assets");

    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/edit", post(edit_handler))
        .route("/add", post(add_handler))
        .route("/remove", post(remove_handler))
        .route("/save", post(save_handler))
        .nest_service("/data", ServeDir::new(data_dir))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(
    dashboard: &Dashboard,
    ip: &str,
    port: u16,
    session: Option<EditSession>,
) -> Result<()> {
    let editable = session.is_some();
    if let Some(session) = &session {
        if !session.has_token() {
            tracing::warn!("No GitHub token provided; saving will fail.");
        }
        tokio::spawn(log_events(session.subscribe()));
    }

    let state = Arc::new(ServerState::new(dashboard, session)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if editable {
        println!("Editing enabled.");
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Log edit events as they happen
async fn log_events(mut events: broadcast::Receiver<EditEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => tracing::debug!("Edit event: {:?}", event),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::debug!("Skipped {} edit events", n)
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let mut data = state.dashboard.loader().load_all().await;
    let alert = state.alert.lock().await.take();

    let editable = match &state.session {
        Some(session) => {
            session.lock().await.apply_to(&mut data);
            true
        }
        None => false,
    };

    match state.generator.render_page(&data, editable, alert) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Render failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Render failed").into_response()
        }
    }
}

/// Submitted form fields, in document order
type Fields = Vec<(String, String)>;

fn field<'a>(fields: &'a Fields, name: &str) -> Result<&'a str, EditError> {
    fields
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .ok_or_else(|| EditError::InvalidTarget(format!("missing {}", name)))
}

/// The `<target>.<field>` inputs of a section form
fn field_edits(fields: &Fields) -> Result<Vec<FieldEdit>, EditError> {
    fields
        .iter()
        .filter(|(key, _)| !key.starts_with('_'))
        .map(|(key, value)| FieldEdit::parse(key, value))
        .collect()
}

/// Apply the form's field values, then run `f` against the session. Any
/// error becomes the pending alert; the response redirects back to the
/// page.
async fn with_session<F>(state: &ServerState, fields: &Fields, f: F) -> Response
where
    F: FnOnce(&mut EditSession) -> Result<(), EditError>,
{
    let Some(session) = &state.session else {
        return (StatusCode::FORBIDDEN, "Editing is disabled").into_response();
    };

    let result = {
        let mut session = session.lock().await;
        field_edits(fields).and_then(|edits| {
            session.apply_edits(&edits)?;
            f(&mut *session)
        })
    };
    if let Err(e) = result {
        tracing::warn!("Edit rejected: {}", e);
        *state.alert.lock().await = Some(Alert::error(e.to_string()));
    }
    Redirect::to("/").into_response()
}

async fn edit_handler(
    State(state): State<Arc<ServerState>>,
    Form(fields): Form<Fields>,
) -> Response {
    with_session(&state, &fields, |_| Ok(())).await
}

async fn add_handler(
    State(state): State<Arc<ServerState>>,
    Form(fields): Form<Fields>,
) -> Response {
    with_session(&state, &fields, |session| {
        let list: ListKind = field(&fields, "_list")?.parse()?;
        session.add_item(list);
        Ok(())
    })
    .await
}

async fn remove_handler(
    State(state): State<Arc<ServerState>>,
    Form(fields): Form<Fields>,
) -> Response {
    with_session(&state, &fields, |session| {
        let list: ListKind = field(&fields, "_list")?.parse()?;
        let raw = field(&fields, "_item")?;
        let id: ItemId = raw.parse().unwrap_or_else(|e| match e {});
        if session.remove_item(list, &id) {
            Ok(())
        } else {
            Err(EditError::UnknownItem(raw.to_string()))
        }
    })
    .await
}

/// Apply the section's pending field values and commit it
async fn save_handler(
    State(state): State<Arc<ServerState>>,
    Form(fields): Form<Fields>,
) -> Response {
    let Some(session) = &state.session else {
        return (StatusCode::FORBIDDEN, "Editing is disabled").into_response();
    };

    let prepared = field(&fields, "_section")
        .and_then(|s| s.parse::<Section>())
        .and_then(|section| Ok((section, field_edits(&fields)?)));

    let alert = match prepared {
        Ok((section, edits)) => {
            let mut session = session.lock().await;
            match session.apply_edits(&edits) {
                Ok(()) => session.save(section).await,
                Err(e) => Alert::error(e.to_string()),
            }
        }
        Err(e) => Alert::error(e.to_string()),
    };
    *state.alert.lock().await = Some(alert);
    Redirect::to("/").into_response()
}
