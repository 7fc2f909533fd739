use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};

use core::battle::command::BattleCommand;
use core::battle::mapper::Phase;
use core::battle::models::{BattleRequest, Combatant, Side};
use core::battle::outcome::BattleOutcome;
use core::battle::runtime::BattleRuntime;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn not_found(battle_id: &str) -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody { error: format!("no battle with id '{battle_id}'") }))
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message.into() }))
}

#[derive(Debug, Serialize)]
pub struct StartBattleResponse {
    pub battle_id: String,
    pub state: BattleSnapshot,
}

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub id: String,
    pub name: String,
    pub duration_turns: i32,
}

#[derive(Debug, Serialize)]
pub struct CombatantView {
    pub id: String,
    pub name: String,
    pub side: Side,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub statuses: Vec<StatusView>,
}

impl From<&Combatant> for CombatantView {
    fn from(c: &Combatant) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            side: c.side,
            hp: c.hp,
            max_hp: c.max_hp,
            mp: c.mp,
            max_mp: c.max_mp,
            statuses: c
                .statuses
                .effects()
                .iter()
                .map(|s| StatusView { id: s.id.clone(), name: s.name.clone(), duration_turns: s.duration_turns })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BattleSnapshot {
    pub battle_id: String,
    pub phase: &'static str,
    pub turn_count: u32,
    pub finished: bool,
    pub party: Vec<CombatantView>,
    pub enemies: Vec<CombatantView>,
    pub outcome: Option<BattleOutcome>,
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::WaitCtb => "wait_ctb",
        Phase::PrepareActor => "prepare_actor",
        Phase::PlayerCommand => "player_command",
        Phase::EnemyCommand => "enemy_command",
        Phase::ResolveAction => "resolve_action",
        Phase::PostResolve => "post_resolve",
        Phase::BattleEnd => "battle_end",
    }
}

fn snapshot(battle_id: &str, runtime: &BattleRuntime) -> BattleSnapshot {
    BattleSnapshot {
        battle_id: battle_id.to_string(),
        phase: phase_name(runtime.mapper.phase()),
        turn_count: runtime.session.turn_count,
        finished: runtime.is_finished(),
        party: runtime.session.party.iter().map(CombatantView::from).collect(),
        enemies: runtime.session.enemies.iter().map(CombatantView::from).collect(),
        outcome: runtime.mapper.outcome().cloned(),
    }
}

/// `POST /battles`: boots a battle from the caller's request plus the
/// enemy roster named by `enemy_party_id`, the same "single source of
/// truth" seed that decides every roll made afterward (10.6, 8).
pub async fn start_battle(
    State(state): State<AppState>,
    Json(request): Json<BattleRequest>,
) -> Result<Json<StartBattleResponse>, (StatusCode, Json<ErrorBody>)> {
    let party_ids = state
        .enemy_parties
        .get(&request.enemy_party_id)
        .ok_or_else(|| bad_request(format!("unknown enemy_party_id '{}'", request.enemy_party_id)))?;

    let mut enemies: Vec<(Combatant, Vec<String>)> = Vec::with_capacity(party_ids.len());
    for (index, template_id) in party_ids.iter().enumerate() {
        let template = state
            .registry
            .enemy_template(template_id)
            .ok_or_else(|| bad_request(format!("enemy template '{template_id}' is not registered")))?;
        let mut combatant = Combatant::new(
            format!("{}_{index}", template.id),
            template.name.clone(),
            Side::Enemy,
            template.hp,
            template.mp,
            template.base_stats.clone(),
        );
        combatant.max_hp = template.hp;
        combatant.max_mp = template.mp;
        enemies.push((combatant, template.skill_ids.clone()));
    }
    let enemy_refs: Vec<(&Combatant, Vec<String>)> = enemies.iter().map(|(c, ids)| (c, ids.clone())).collect();

    let runtime = BattleRuntime::new(&request, enemy_refs, &state.registry);
    let battle_id = uuid::Uuid::new_v4().to_string();
    let response = StartBattleResponse { battle_id: battle_id.clone(), state: snapshot(&battle_id, &runtime) };
    state.battles.insert(battle_id, runtime);

    tracing::info!(enemy_party_id = %request.enemy_party_id, "battle created");
    Ok(Json(response))
}

/// `POST /battles/:id/command`: deposits a player command (4.2's
/// `on_player_command`); only takes effect if the battle is currently
/// waiting on that exact actor.
pub async fn submit_command(
    State(state): State<AppState>,
    Path(battle_id): Path<String>,
    Json(command): Json<BattleCommand>,
) -> Result<Json<BattleSnapshot>, (StatusCode, Json<ErrorBody>)> {
    let mut runtime = state.battles.get_mut(&battle_id).ok_or_else(|| not_found(&battle_id))?;
    runtime.on_player_command(command);
    Ok(Json(snapshot(&battle_id, &runtime)))
}

#[derive(Debug, Deserialize)]
pub struct TickRequest {
    #[serde(default = "default_dt")]
    pub dt: f32,
}

fn default_dt() -> f32 {
    1.0
}

/// `POST /battles/:id/tick`: advances the host clock by `dt`, running
/// every phase transition that needs no further input (10.6).
pub async fn tick_battle(
    State(state): State<AppState>,
    Path(battle_id): Path<String>,
    Json(body): Json<TickRequest>,
) -> Result<Json<BattleSnapshot>, (StatusCode, Json<ErrorBody>)> {
    let mut runtime = state.battles.get_mut(&battle_id).ok_or_else(|| not_found(&battle_id))?;
    runtime.tick(&battle_id, &state.registry, body.dt);
    Ok(Json(snapshot(&battle_id, &runtime)))
}

/// `GET /battles/:id`: a read-only snapshot, no state advanced.
pub async fn get_battle(
    State(state): State<AppState>,
    Path(battle_id): Path<String>,
) -> Result<Json<BattleSnapshot>, (StatusCode, Json<ErrorBody>)> {
    let runtime = state.battles.get(&battle_id).ok_or_else(|| not_found(&battle_id))?;
    Ok(Json(snapshot(&battle_id, &runtime)))
}

/// `GET /battles/:id/outcome`: 409 until `BATTLE_END`, then the same
/// `BattleOutcome` the enclosing overworld subsystem commits (4.10).
pub async fn get_outcome(
    State(state): State<AppState>,
    Path(battle_id): Path<String>,
) -> impl IntoResponse {
    let Some(runtime) = state.battles.get(&battle_id) else {
        return not_found(&battle_id).into_response();
    };
    match runtime.mapper.outcome() {
        Some(outcome) => Json(outcome.clone()).into_response(),
        None => (StatusCode::CONFLICT, Json(ErrorBody { error: "battle has not finished yet".to_string() })).into_response(),
    }
}
