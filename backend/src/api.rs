use crate::errors::ApiError;
use crate::models::*;
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use base64::Engine;
use rand::rngs::OsRng;
use tower_http::cors::{Any, CorsLayer};
use zk_predicates::groth16::{self, ZkError};
use zk_predicates::transport::ProofBundle;
use zk_predicates::types::{PredicateInput, PredicateKind};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/v1/predicates", get(list_predicates))
        .route("/api/v1/prove/:predicate", post(prove))
        .route("/api/v1/verify/:predicate", post(verify))
        .route("/api/v1/zk/vk/:predicate", get(get_vk))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

fn predicate_from_path(key: &str) -> Result<PredicateKind, ApiError> {
    PredicateKind::from_key(key)
        .ok_or_else(|| ApiError::NotFound(format!("unknown predicate: {key}")))
}

async fn list_predicates() -> Json<PredicateListResponse> {
    Json(PredicateListResponse {
        predicates: PredicateKind::ALL
            .iter()
            .map(|kind| PredicateDescriptor {
                key: kind.as_key().to_string(),
                placeholder: kind.placeholder().to_string(),
            })
            .collect(),
    })
}

async fn prove(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ProveRequest>,
) -> Result<Json<ProveResponse>, ApiError> {
    let kind = predicate_from_path(&key)?;

    let input = PredicateInput::parse(kind, &req.value)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let keys = state.ensure_keys(kind).await?;

    tracing::info!(predicate = kind.as_key(), "generating proof");

    let proof_text = tokio::task::spawn_blocking(move || {
        // OS randomness so proofs are not deterministic.
        let mut rng = OsRng;
        let (proof, public_inputs) = groth16::prove(&input, keys.pk.as_ref(), &mut rng)?;

        // Fail closed if the proof doesn't verify.
        groth16::verify(keys.vk.as_ref(), &proof, &public_inputs)?;

        ProofBundle::bundle(&proof, &public_inputs)?.to_json()
    })
    .await
    .map_err(|_| ApiError::Internal)?
    .map_err(|err| {
        // Unsatisfied predicates and proving errors alike surface as one
        // generic message; the detail stays in the log.
        tracing::warn!(predicate = kind.as_key(), %err, "proof generation failed");
        ApiError::ProofFailed
    })?;

    tracing::info!(predicate = kind.as_key(), "proof generated");

    Ok(Json(ProveResponse { predicate: key, proof: proof_text }))
}

async fn verify(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let kind = predicate_from_path(&key)?;
    let keys = state.ensure_keys(kind).await?;

    // A proof string that cannot be reconstructed is a malformed payload,
    // distinct from a sound verification run that reports an invalid proof.
    let (proof, public_inputs) = ProofBundle::from_json(&req.proof)
        .and_then(|bundle| bundle.unbundle())
        .map_err(|_| ApiError::BadRequest("invalid proof payload".to_string()))?;

    let ok = match groth16::verify(keys.vk.as_ref(), &proof, &public_inputs) {
        Ok(()) => true,
        Err(ZkError::VerificationFailed) => false,
        Err(err) => {
            tracing::warn!(predicate = kind.as_key(), %err, "verification failed to run");
            return Err(ApiError::BadRequest("verification failed to run".to_string()));
        }
    };

    Ok(Json(VerifyResponse { ok }))
}

async fn get_vk(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ZkVkResponse>, ApiError> {
    let kind = predicate_from_path(&key)?;
    let keys = state.ensure_keys(kind).await?;

    let vk_bytes = groth16::serialize_vk(keys.vk.as_ref()).map_err(|_| ApiError::Internal)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(vk_bytes);

    Ok(Json(ZkVkResponse {
        curve: "bn254".to_string(),
        proof_system: "groth16".to_string(),
        vk_b64: b64,
    }))
}
