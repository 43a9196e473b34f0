//! Route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use icebot_core::{
    ChatMessage, Conversation, ProfileBrief, SavedMessage, StyleFlags, StyleMode, ValidationError,
};
use icebot_understanding::ScanOutcome;

use crate::error::{ApiError, FailedAction, ResultExt};
use crate::server::GatewayState;
use crate::user::UserId;

type ApiResult<T> = Result<T, ApiError>;

fn bad_request(err: ValidationError) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, err.to_string())
}

/// Health check endpoint.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "icebot",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRequest {
    #[serde(default)]
    pub flags: StyleFlags,
    pub mode: String,
    pub value: bool,
}

/// Apply one toggle to a style selection, enforcing the asshole override.
pub async fn set_style(Json(req): Json<StyleRequest>) -> ApiResult<Json<StyleFlags>> {
    let mode: StyleMode = req.mode.parse().map_err(bad_request)?;
    Ok(Json(req.flags.set_mode(mode, req.value)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub style: StyleFlags,
}

pub async fn generate(
    State(state): State<GatewayState>,
    user: UserId,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<Json<Value>> {
    let message = state
        .bot
        .generate_ice_breaker(user.as_str(), &req.profile, &req.style)
        .await
        .or_api(FailedAction::Generate)?;
    Ok(Json(json!({ "message": message })))
}

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    #[serde(default)]
    pub message: String,
}

pub async fn enhance(
    State(state): State<GatewayState>,
    user: UserId,
    Json(req): Json<EnhanceRequest>,
) -> ApiResult<Json<Value>> {
    let message = state
        .bot
        .enhance_message(user.as_str(), &req.message)
        .await
        .or_api(FailedAction::Enhance)?;
    Ok(Json(json!({ "message": message })))
}

pub async fn profile(
    State(state): State<GatewayState>,
    user: UserId,
    Json(brief): Json<ProfileBrief>,
) -> ApiResult<Json<Value>> {
    let profile = state
        .bot
        .generate_profile(user.as_str(), &brief)
        .await
        .or_api(FailedAction::Profile)?;
    Ok(Json(json!({ "profile": profile })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub mime_hint: Option<String>,
}

pub async fn analyze(
    State(state): State<GatewayState>,
    user: UserId,
    Json(req): Json<ImageRequest>,
) -> ApiResult<Json<Value>> {
    let result = state
        .scanner
        .vision()
        .analyze(user.as_str(), &req.image, req.mime_hint.as_deref())
        .await
        .or_api(FailedAction::Analyze)?;
    Ok(Json(json!({ "analysis": result.raw_text.trim() })))
}

pub async fn scan(
    State(state): State<GatewayState>,
    user: UserId,
    Json(req): Json<ImageRequest>,
) -> ApiResult<Json<ScanOutcome>> {
    let outcome = state
        .scanner
        .scan(user.as_str(), &req.image, req.mime_hint.as_deref())
        .await
        .or_api(FailedAction::Analyze)?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub message: String,
    #[serde(default)]
    pub was_regenerated: bool,
}

pub async fn feedback(
    State(state): State<GatewayState>,
    user: UserId,
    Json(req): Json<FeedbackRequest>,
) -> StatusCode {
    state
        .bot
        .record_feedback(user.as_str(), &req.message, req.was_regenerated)
        .await;
    StatusCode::NO_CONTENT
}

pub async fn list_conversations(
    State(state): State<GatewayState>,
    user: UserId,
) -> ApiResult<Json<Vec<Conversation>>> {
    let list = state
        .store
        .list_conversations(user.as_str())
        .await
        .or_api(FailedAction::Store)?;
    Ok(Json(list))
}

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub name: String,
}

pub async fn create_conversation(
    State(state): State<GatewayState>,
    user: UserId,
    Json(req): Json<CreateConversationRequest>,
) -> ApiResult<(StatusCode, Json<Conversation>)> {
    let conversation = state
        .store
        .add_conversation(user.as_str(), req.name.trim())
        .await
        .or_api(FailedAction::Store)?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

pub async fn delete_conversation(
    State(state): State<GatewayState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .store
        .delete_conversation(user.as_str(), id)
        .await
        .or_api(FailedAction::Store)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<Uuid>,
}

pub async fn reorder_conversations(
    State(state): State<GatewayState>,
    user: UserId,
    Json(req): Json<ReorderRequest>,
) -> ApiResult<StatusCode> {
    state
        .store
        .reorder_conversations(user.as_str(), &req.ids)
        .await
        .or_api(FailedAction::Store)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendMessageRequest {
    pub text: String,
    #[serde(default)]
    pub is_match: bool,
}

pub async fn append_message(
    State(state): State<GatewayState>,
    user: UserId,
    Path(id): Path<Uuid>,
    Json(req): Json<AppendMessageRequest>,
) -> ApiResult<Json<Conversation>> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(bad_request(ValidationError::EmptyMessage));
    }
    let conversation = state
        .store
        .append_message(user.as_str(), id, ChatMessage::new(text, req.is_match))
        .await
        .or_api(FailedAction::Store)?;
    Ok(Json(conversation))
}

/// Generate an answer to the match's latest message and append it.
pub async fn reply(
    State(state): State<GatewayState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Conversation>> {
    let conversation = state
        .store
        .get_conversation(user.as_str(), id)
        .await
        .or_api(FailedAction::Store)?;
    let message = state
        .bot
        .reply_to_conversation(user.as_str(), &conversation)
        .await
        .or_api(FailedAction::Generate)?;
    let conversation = state
        .store
        .append_message(user.as_str(), id, message)
        .await
        .or_api(FailedAction::Store)?;
    Ok(Json(conversation))
}

/// Replace a message's text and store the conversation.
async fn replace_message(
    state: &GatewayState,
    mut conversation: Conversation,
    message_id: Uuid,
    text: String,
    enhanced: bool,
) -> ApiResult<Json<Conversation>> {
    if !conversation.replace_text(message_id, text, enhanced) {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("Not found: message {message_id}"),
        ));
    }
    state
        .store
        .update_conversation(conversation.clone())
        .await
        .or_api(FailedAction::Store)?;
    Ok(Json(conversation))
}

pub async fn regenerate(
    State(state): State<GatewayState>,
    user: UserId,
    Path((id, message_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Conversation>> {
    let conversation = state
        .store
        .get_conversation(user.as_str(), id)
        .await
        .or_api(FailedAction::Store)?;
    let text = state
        .bot
        .regenerate_reply(user.as_str(), &conversation, message_id)
        .await
        .or_api(FailedAction::Generate)?;
    replace_message(&state, conversation, message_id, text, false).await
}

pub async fn enhance_in_place(
    State(state): State<GatewayState>,
    user: UserId,
    Path((id, message_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Conversation>> {
    let conversation = state
        .store
        .get_conversation(user.as_str(), id)
        .await
        .or_api(FailedAction::Store)?;
    let text = state
        .bot
        .enhance_in_conversation(user.as_str(), &conversation, message_id)
        .await
        .or_api(FailedAction::Enhance)?;
    replace_message(&state, conversation, message_id, text, true).await
}

pub async fn list_saved(
    State(state): State<GatewayState>,
    user: UserId,
) -> ApiResult<Json<Vec<SavedMessage>>> {
    let saved = state
        .store
        .list_saved(user.as_str())
        .await
        .or_api(FailedAction::Store)?;
    Ok(Json(saved))
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub text: String,
}

pub async fn save_message(
    State(state): State<GatewayState>,
    user: UserId,
    Json(req): Json<SaveRequest>,
) -> ApiResult<(StatusCode, Json<SavedMessage>)> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(bad_request(ValidationError::EmptyMessage));
    }
    let saved = state
        .store
        .add_saved(user.as_str(), text)
        .await
        .or_api(FailedAction::Store)?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn delete_saved(
    State(state): State<GatewayState>,
    user: UserId,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .store
        .delete_saved(user.as_str(), id)
        .await
        .or_api(FailedAction::Store)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SuccessRequest {
    pub success: bool,
}

pub async fn set_saved_success(
    State(state): State<GatewayState>,
    user: UserId,
    Path(id): Path<Uuid>,
    Json(req): Json<SuccessRequest>,
) -> ApiResult<StatusCode> {
    state
        .store
        .set_saved_success(user.as_str(), id, req.success)
        .await
        .or_api(FailedAction::Store)?;
    Ok(StatusCode::NO_CONTENT)
}
