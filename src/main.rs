use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use api_haven::state::app_state::RequestStatus;
use api_haven::{App, Config, Event};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for output.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("api_haven=info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;
    tracing::debug!(base_url = %config.api_base_url, origin = %config.origin, "config loaded");

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let mut app = App::new(&config, tx)?;
    app.init().await;

    match std::env::args().nth(1).as_deref() {
        None | Some("list") => print_tree(&app),
        Some("send") => send_selected(&mut app, &mut rx).await,
        Some(other) => anyhow::bail!("unknown command `{other}` (expected `list` or `send`)"),
    }
    Ok(())
}

fn print_tree(app: &App) {
    let selection = app.store.selection();
    for collection in app.store.collections() {
        let marker = if selection.collection_id.as_deref() == Some(collection.id.as_str()) {
            '>'
        } else {
            ' '
        };
        println!("{marker} {} ({})", collection.name, collection.requests.len());
        for request in &collection.requests {
            let marker = if selection.request_id.as_deref() == Some(request.id.as_str()) {
                '*'
            } else {
                ' '
            };
            println!("    {marker} {:<7} {}", request.method.as_str(), request.name);
        }
    }
    if let Some(error) = app.store.last_error() {
        println!("\n(offline: {error})");
    }
    if let Some(response) = &app.state.response {
        println!("\nlast response: {}", response.summary());
    }
}

async fn send_selected(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Event>) {
    let sent = app.send_request();
    if sent && let Some(event) = rx.recv().await {
        app.handle_event(event);
    }

    match (&app.state.request_status, &app.state.response) {
        (RequestStatus::Idle, Some(response)) if sent => {
            println!("{}", response.summary());
            println!("{}", response.body.raw());
        }
        _ => {
            if let Some(notification) = app.state.notifications.last() {
                eprintln!("{}: {}", notification.title, notification.description);
            }
        }
    }
}
