//! Request flow demonstration.
//!
//! This example shows a locale moving through two requests and a navigation:
//! 1. A first request picks the locale up from the query string
//! 2. The resolved fields are committed to the session
//! 3. A second request with no query falls back to the session
//! 4. A live-session navigation re-resolves from the new URL
//!
//! Run with: `RUST_LOG=request_locale=debug cargo run --example request_flow`

use std::sync::Arc;

use request_locale::web::{LocalePlug, NavigationHook, Pipeline};
use request_locale::{
    store, Attrs, Carrier, Config, Conn, MemorySessionStore, Params, Session, SessionStore,
    Socket, DEFAULT_SESSION_KEY,
};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
[locale]
sources = ["query", "cookie", "session", "accept_language"]
params = ["locale", "lang"]

[language]
sources = ["query", "session", "accept_language"]
params = ["language", "lng"]
accept_language_filter = "fr"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_toml_str(CONFIG)?;
    let sessions = Arc::new(MemorySessionStore::new());
    let pipeline = Pipeline::new().plug(
        LocalePlug::new(config.clone()).with_extra([("region", "CH")].into_iter().collect()),
    );

    println!("=== First request ===");
    let mut conn = Conn::new("req-0001")
        .with_host("shop.example.ch")
        .with_session(Session::new("sid-42", sessions.clone()));
    conn.add_query_param("lang", "fr-CH");
    conn.add_header("Accept-Language", "de-CH, fr;q=0.8");

    let conn = pipeline.run(conn).into_inner();
    conn.commit_session();
    println!("   attributes: {:?}", store::get(&conn));
    println!(
        "   session:    {:?}",
        sessions.load("sid-42").get(DEFAULT_SESSION_KEY)
    );

    println!("\n=== Second request ===");
    let conn = Conn::new("req-0002").with_session(Session::new("sid-42", sessions.clone()));
    let conn = pipeline.run(conn).into_inner();
    println!("   locale:     {}", store::fetch(&conn, "locale")?);
    println!("   assigns:    {:?}", conn.assigns());

    println!("\n=== Navigation ===");
    let hook = NavigationHook::new(config);
    let socket = Socket::mount("sock-0001", sessions.load("sid-42"));
    let socket = hook
        .handle_params(
            Params::new(),
            "https://shop.example.ch/kasse?locale=de-CH",
            socket,
            &Attrs::new(),
        )
        .into_inner();
    println!("   locale:     {}", store::fetch(&socket, "locale")?);
    println!("   host:       {:?}", socket.host());

    Ok(())
}
