use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredicateListResponse {
    pub predicates: Vec<PredicateDescriptor>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredicateDescriptor {
    /// Key used in the prove/verify/vk routes.
    pub key: String,
    /// Hint shown next to the input field.
    pub placeholder: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProveRequest {
    /// Raw input string, exactly as typed.
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProveResponse {
    pub predicate: String,

    /// The proof in text transport form. This exact string is what a user
    /// copies and later pastes into the verifier.
    pub proof: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// A previously generated proof string.
    pub proof: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ZkVkResponse {
    pub curve: String,
    pub proof_system: String,
    pub vk_b64: String,
}
