//! Single binary web server: JSON API over one score sheet with undo/redo and AI commentary.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, DATA_DIR (snapshot directory), GEMINI_API_KEY, GEMINI_MODEL.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use okey_score_web::{
    request_insight, GameSession, GeminiProvider, JsonFileStore, PlayerId, SheetError,
};
use serde::Deserialize;
use std::sync::RwLock;

/// In-memory state: the one game, mirrored to `DATA_DIR` on every commit.
type AppState = Data<RwLock<GameSession<JsonFileStore>>>;

/// Names longer than this are cut at the edge before reaching the sheet.
const MAX_NAME_CHARS: usize = 24;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct SetScoreBody {
    /// Raw cell text; sanitized by the sheet.
    value: String,
}

#[derive(Deserialize)]
struct RenamePlayerBody {
    name: String,
}

/// Path segments: round index and player id (e.g. /api/rounds/{round}/scores/{player_id})
#[derive(Deserialize)]
struct ScoreCellPath {
    round: u32,
    player_id: PlayerId,
}

/// Path segment: player id (e.g. /api/players/{player_id})
#[derive(Deserialize)]
struct PlayerPath {
    player_id: PlayerId,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn sheet_error(e: SheetError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        SheetError::UnknownPlayer(_) | SheetError::UnknownRound(_) => {
            HttpResponse::NotFound().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// Run one edit against the session and answer with the refreshed dashboard.
fn edit<T>(
    state: &AppState,
    f: impl FnOnce(&mut GameSession<JsonFileStore>) -> Result<T, SheetError>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match f(&mut *g) {
        Ok(_) => HttpResponse::Ok().json(g.dashboard()),
        Err(e) => sheet_error(e),
    }
}

fn clamp_name(raw: &str) -> String {
    raw.trim().chars().take(MAX_NAME_CHARS).collect()
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "okey-score-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Current sheet with totals, ranks, chart series and commentary state.
#[get("/api/dashboard")]
async fn api_dashboard(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(g) => HttpResponse::Ok().json(g.dashboard()),
        Err(_) => lock_error(),
    }
}

/// Set one score cell from raw input.
#[put("/api/rounds/{round}/scores/{player_id}")]
async fn api_set_score(
    state: AppState,
    path: Path<ScoreCellPath>,
    body: Json<SetScoreBody>,
) -> HttpResponse {
    edit(&state, |s| s.set_score(path.round, path.player_id, &body.value))
}

/// Rename a player.
#[put("/api/players/{player_id}/name")]
async fn api_rename_player(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<RenamePlayerBody>,
) -> HttpResponse {
    let name = clamp_name(&body.name);
    edit(&state, |s| s.rename_player(path.player_id, name))
}

/// Seat a new player (name and colour from the player count).
#[post("/api/players")]
async fn api_add_player(state: AppState) -> HttpResponse {
    edit(&state, |s| s.add_player())
}

/// Remove a player and their scores (at least one player always remains).
#[delete("/api/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    edit(&state, |s| s.remove_player(path.player_id))
}

/// Append an empty round.
#[post("/api/rounds")]
async fn api_add_round(state: AppState) -> HttpResponse {
    edit(&state, |s| Ok(s.add_round()))
}

/// Remove the last round (no-op when there are none).
#[delete("/api/rounds/last")]
async fn api_remove_last_round(state: AppState) -> HttpResponse {
    edit(&state, |s| Ok(s.remove_last_round()))
}

#[post("/api/undo")]
async fn api_undo(state: AppState) -> HttpResponse {
    edit(&state, |s| Ok(s.undo()))
}

#[post("/api/redo")]
async fn api_redo(state: AppState) -> HttpResponse {
    edit(&state, |s| Ok(s.redo()))
}

/// Start a new game: default roster, history and stored snapshot cleared.
#[post("/api/new-game")]
async fn api_new_game(state: AppState) -> HttpResponse {
    edit(&state, |s| {
        s.new_game();
        Ok(())
    })
}

/// Ask for commentary. The session lock is released while the provider works, so edits
/// keep flowing; the answer is about the standings captured here.
#[post("/api/insight")]
async fn api_insight(state: AppState, provider: Data<GeminiProvider>) -> HttpResponse {
    let pending = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        if g.insight().is_pending() {
            return HttpResponse::Conflict()
                .json(serde_json::json!({ "error": "Commentary already in progress" }));
        }
        g.begin_insight()
    };
    let Some((request, requested_at)) = pending else {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Nothing to analyze yet" }));
    };

    let text = request_insight(provider.get_ref(), &request).await;

    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.finish_insight(text, requested_at);
    HttpResponse::Ok().json(g.dashboard())
}

/// Download the score table as CSV.
#[get("/api/export.csv")]
async fn api_export_csv(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match okey_score_web::to_csv_string(g.sheet()) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(("Content-Disposition", "attachment; filename=\"scores.csv\""))
            .body(csv),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "data".to_string()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| default_data_dir());
    let bind = (host.as_str(), port);

    let provider = GeminiProvider::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    if !provider.has_api_key() {
        log::warn!("GEMINI_API_KEY not set; commentary will always fall back");
    }
    log::info!("Commentary model: {}", provider.model());

    let session = GameSession::open(JsonFileStore::new(&data_dir));
    log::info!("Snapshots stored in {}", data_dir);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(session));
    let provider = Data::new(provider);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(provider.clone())
            .service(api_health)
            .service(favicon)
            .service(api_dashboard)
            .service(api_set_score)
            .service(api_rename_player)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_add_round)
            .service(api_remove_last_round)
            .service(api_undo)
            .service(api_redo)
            .service(api_new_game)
            .service(api_insight)
            .service(api_export_csv)
    })
    .bind(bind)?
    .run()
    .await
}
