//! Single binary web server: contests and forecast logs held in memory, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, CATALOG_PATH (JSON bracket catalog;
//! built-in 2022 World Cup if unset).

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use world_cup_forecast::{
    cancel_last, champion, next_match, predictions, progress,
    resolve_standings, submit_forecast, BracketCatalog, CancelOutcome, Contest, ContestError,
    ForecastError, MatchNumber, Score,
};

/// In-memory state: contests by code.
type AppState = Data<RwLock<HashMap<String, Contest>>>;
type CatalogState = Data<BracketCatalog>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateContestBody {
    code: String,
}

#[derive(Deserialize)]
struct JoinBody {
    name: String,
}

#[derive(Deserialize)]
struct ForecastBody {
    /// "2:0" form.
    score: String,
}

#[derive(Deserialize)]
struct ContestPath {
    code: String,
}

#[derive(Deserialize)]
struct PlayerPath {
    code: String,
    name: String,
}

#[derive(Deserialize)]
struct GroupPath {
    code: String,
    name: String,
    group: String,
}

#[derive(Deserialize)]
struct MatchPath {
    code: String,
    match_number: MatchNumber,
}

fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": what }))
}

fn contest_error(e: ContestError) -> HttpResponse {
    match e {
        ContestError::PlayerNotFound(_) | ContestError::UnknownMatch(_) => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": e.to_string() }))
        }
        ContestError::InvalidName => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

/// Next match for a player, or the champion once every match has a forecast.
fn next_response(catalog: &BracketCatalog, contest: &Contest, name: &str) -> HttpResponse {
    let player = match contest.player(name) {
        Some(p) => p,
        None => return not_found("No player"),
    };
    let log = &player.forecasts;
    HttpResponse::Ok().json(serde_json::json!({
        "player": player.name,
        "progress": progress(catalog, log),
        "next_match": next_match(catalog, log),
        "champion": champion(catalog, log),
    }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "world-cup-forecast",
    })
}

/// Create a contest (409 if the code is taken).
#[post("/api/contests")]
async fn api_create_contest(state: AppState, body: Json<CreateContestBody>) -> HttpResponse {
    let contest = match Contest::new(body.code.as_str()) {
        Ok(c) => c,
        Err(e) => return contest_error(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    if g.contains_key(&contest.code) {
        return HttpResponse::Conflict()
            .json(serde_json::json!({ "error": "Such contest already exists" }));
    }
    log::info!("Created contest {}", contest.code);
    let code = contest.code.clone();
    g.insert(code.clone(), contest);
    match g.get(&code) {
        Some(c) => HttpResponse::Ok().json(c),
        None => HttpResponse::InternalServerError().finish(),
    }
}

#[get("/api/contests/{code}")]
async fn api_get_contest(state: AppState, path: Path<ContestPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get(&path.code) {
        Some(c) => HttpResponse::Ok().json(c),
        None => not_found("No contest"),
    }
}

/// Join a contest by name, resuming the existing log if the name is known.
#[post("/api/contests/{code}/players")]
async fn api_join_contest(
    state: AppState,
    catalog: CatalogState,
    path: Path<ContestPath>,
    body: Json<JoinBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let contest = match g.get_mut(&path.code) {
        Some(c) => c,
        None => return not_found("No contest"),
    };
    match contest.join(&body.name) {
        Ok(_) => next_response(&catalog, contest, &body.name),
        Err(e) => contest_error(e),
    }
}

#[get("/api/contests/{code}/players/{name}/next")]
async fn api_next_match(
    state: AppState,
    catalog: CatalogState,
    path: Path<PlayerPath>,
) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get(&path.code) {
        Some(c) => next_response(&catalog, c, &path.name),
        None => not_found("No contest"),
    }
}

/// Submit a score for the player's next match.
#[post("/api/contests/{code}/players/{name}/forecasts")]
async fn api_submit_forecast(
    state: AppState,
    catalog: CatalogState,
    path: Path<PlayerPath>,
    body: Json<ForecastBody>,
) -> HttpResponse {
    let score: Score = match body.score.parse() {
        Ok(s) => s,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": format!("{}", e) }))
        }
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let contest = match g.get_mut(&path.code) {
        Some(c) => c,
        None => return not_found("No contest"),
    };
    let player = match contest.player_mut(&path.name) {
        Ok(p) => p,
        Err(e) => return contest_error(e),
    };
    match submit_forecast(&catalog, &mut player.forecasts, score) {
        Ok(_) => next_response(&catalog, contest, &path.name),
        Err(e @ ForecastError::TournamentComplete)
        | Err(e @ ForecastError::UnresolvedMatch { .. }) => {
            HttpResponse::Conflict().json(serde_json::json!({ "error": e.to_string() }))
        }
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Cancel the player's most recent forecast.
#[delete("/api/contests/{code}/players/{name}/forecasts/last")]
async fn api_cancel_forecast(
    state: AppState,
    catalog: CatalogState,
    path: Path<PlayerPath>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let contest = match g.get_mut(&path.code) {
        Some(c) => c,
        None => return not_found("No contest"),
    };
    let player = match contest.player_mut(&path.name) {
        Ok(p) => p,
        Err(e) => return contest_error(e),
    };
    match cancel_last(&mut player.forecasts) {
        CancelOutcome::Cancelled(_) => next_response(&catalog, contest, &path.name),
        CancelOutcome::NothingToCancel => {
            HttpResponse::Ok()
                .json(serde_json::json!({ "cancelled": false, "message": "Nothing to cancel" }))
        }
    }
}

/// Standings of one group as forecast by the player.
#[get("/api/contests/{code}/players/{name}/groups/{group}")]
async fn api_group_standings(
    state: AppState,
    catalog: CatalogState,
    path: Path<GroupPath>,
) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let player = match g.get(&path.code).and_then(|c| c.player(&path.name)) {
        Some(p) => p,
        None => return not_found("No player"),
    };
    if catalog.group(&path.group).is_none() {
        return not_found("No group");
    }
    match resolve_standings(&catalog, &path.group, &player.forecasts) {
        Some(table) => HttpResponse::Ok().json(table),
        None => HttpResponse::Conflict()
            .json(serde_json::json!({ "error": "Group matches not all forecast" })),
    }
}

/// Every player's forecast for one match, plus who is still missing it.
#[get("/api/contests/{code}/predictions/{match_number}")]
async fn api_predictions(
    state: AppState,
    catalog: CatalogState,
    path: Path<MatchPath>,
) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let contest = match g.get(&path.code) {
        Some(c) => c,
        None => return not_found("No contest"),
    };
    let all = match predictions(&catalog, contest, path.match_number) {
        Ok(p) => p,
        Err(e) => return contest_error(e),
    };
    let missing: Vec<&str> = all
        .iter()
        .filter(|p| p.score.is_none())
        .map(|p| p.player.as_str())
        .collect();
    HttpResponse::Ok().json(serde_json::json!({ "predictions": all, "missing": missing }))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn load_catalog() -> Result<BracketCatalog, world_cup_forecast::ConfigurationError> {
    match std::env::var("CATALOG_PATH") {
        Ok(path) => {
            log::info!("Loading catalog from {}", path);
            BracketCatalog::from_path(path)
        }
        Err(_) => BracketCatalog::world_cup_2022(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let catalog = match load_catalog() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()));
        }
    };
    log::info!("Using catalog {} ({} matches)", catalog.name, catalog.match_count());

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<String, Contest>::new()));
    let catalog = Data::new(catalog);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(catalog.clone())
            .service(api_health)
            .service(api_create_contest)
            .service(api_get_contest)
            .service(api_join_contest)
            .service(api_next_match)
            .service(api_submit_forecast)
            .service(api_cancel_forecast)
            .service(api_group_standings)
            .service(api_predictions)
    })
    .bind(bind)?
    .run()
    .await
}
