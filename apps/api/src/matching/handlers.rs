//! Axum route handlers for the Matching API.

use std::collections::BTreeSet;

use anyhow::anyhow;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::documents::extract_text;
use crate::errors::AppError;
use crate::matching::batch::{match_batch, MatchPair};
use crate::matching::experience::extract_experience_years;
use crate::matching::role_gap::analyze_role_gap;
use crate::matching::scorer::{ExtractedProfile, MatchResult};
use crate::matching::skill_extractor::extract_skills;
use crate::matching::vocabulary::Skill;
use crate::state::AppState;

pub const MAX_BATCH_PAIRS: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SkillsResponse {
    pub skills: BTreeSet<Skill>,
}

#[derive(Debug, Serialize)]
pub struct ExperienceResponse {
    pub experience_years: f64,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub resume_text: String,
    pub jd_text: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchMatchRequest {
    pub pairs: Vec<MatchPair>,
}

#[derive(Debug, Serialize)]
pub struct BatchMatchResponse {
    pub results: Vec<MatchResult>,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoleGapRequest {
    pub role: String,
    pub resume_text: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RoleGapResponse {
    pub role: String,
    pub known_role: bool,
    /// Candidate skills the gap was computed from.
    pub skills: BTreeSet<Skill>,
    pub matched: BTreeSet<Skill>,
    pub missing: BTreeSet<Skill>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/skills/extract
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Json<SkillsResponse> {
    Json(SkillsResponse {
        skills: extract_skills(&request.text, &state.vocabulary),
    })
}

/// POST /api/v1/experience/extract
pub async fn handle_extract_experience(Json(request): Json<TextRequest>) -> Json<ExperienceResponse> {
    Json(ExperienceResponse {
        experience_years: extract_experience_years(&request.text),
    })
}

/// POST /api/v1/match
///
/// Scores a resume against a job description. The resume may be empty;
/// the job description may not.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    Ok(Json(score(&state, &request.resume_text, &request.jd_text)))
}

/// POST /api/v1/match/batch
pub async fn handle_match_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchMatchRequest>,
) -> Result<Json<BatchMatchResponse>, AppError> {
    if request.pairs.len() > MAX_BATCH_PAIRS {
        return Err(AppError::Validation(format!(
            "at most {MAX_BATCH_PAIRS} pairs per batch, got {}",
            request.pairs.len()
        )));
    }
    if let Some(i) = request.pairs.iter().position(|p| p.jd_text.trim().is_empty()) {
        return Err(AppError::Validation(format!("pairs[{i}].jd_text cannot be empty")));
    }

    let vocabulary = state.vocabulary.clone();
    let scorer = state.scorer.clone();
    let results = tokio::task::spawn_blocking(move || {
        match_batch(&request.pairs, &vocabulary, scorer.as_ref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("batch scoring task failed: {e}")))?;

    Ok(Json(BatchMatchResponse { results }))
}

/// POST /api/v1/match/upload
///
/// Multipart form: `resume` (PDF/DOCX/TXT/MD file) and `jd_text` (text field).
pub async fn handle_match_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MatchResult>, AppError> {
    let upload = read_resume_upload(&mut multipart, "jd_text").await?;
    let jd_text = upload
        .form_value
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("jd_text cannot be empty".to_string()))?;

    info!(
        "Scoring uploaded resume '{}' ({} bytes)",
        upload.filename,
        upload.bytes.len()
    );
    let resume_text = extract_upload_text(upload.filename, upload.bytes).await?;

    Ok(Json(score(&state, &resume_text, &jd_text)))
}

/// GET /api/v1/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: state.roles.role_names().map(str::to_string).collect(),
    })
}

/// POST /api/v1/roles/gap
///
/// Candidate skills = explicit `skills` ∪ skills found in `resume_text`.
pub async fn handle_role_gap(
    State(state): State<AppState>,
    Json(request): Json<RoleGapRequest>,
) -> Json<RoleGapResponse> {
    let mut candidate: BTreeSet<Skill> =
        request.skills.iter().filter_map(|s| Skill::new(s)).collect();
    if let Some(text) = request.resume_text.as_deref() {
        candidate.extend(extract_skills(text, state.roles.all_skills()));
    }

    Json(role_gap_response(&state, request.role, candidate))
}

/// POST /api/v1/roles/gap/upload
///
/// Multipart form: `resume` file and `role` text field.
pub async fn handle_role_gap_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RoleGapResponse>, AppError> {
    let upload = read_resume_upload(&mut multipart, "role").await?;
    let role = upload
        .form_value
        .ok_or_else(|| AppError::Validation("missing 'role' field".to_string()))?;

    info!(
        "Role gap for uploaded resume '{}' against '{role}'",
        upload.filename
    );
    let resume_text = extract_upload_text(upload.filename, upload.bytes).await?;
    let candidate = extract_skills(&resume_text, state.roles.all_skills());

    Ok(Json(role_gap_response(&state, role, candidate)))
}

fn role_gap_response(
    state: &AppState,
    role: String,
    candidate: BTreeSet<Skill>,
) -> RoleGapResponse {
    let gap = analyze_role_gap(&candidate, &role, &state.roles);

    RoleGapResponse {
        known_role: state.roles.contains_role(&role),
        role,
        skills: candidate,
        matched: gap.matched,
        missing: gap.missing,
    }
}

/// The `resume` file plus one named text field from a multipart form.
struct ResumeUpload {
    filename: String,
    bytes: Vec<u8>,
    form_value: Option<String>,
}

async fn read_resume_upload(
    multipart: &mut Multipart,
    text_field: &str,
) -> Result<ResumeUpload, AppError> {
    let mut resume: Option<(String, Vec<u8>)> = None;
    let mut form_value: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                resume = Some((filename, bytes.to_vec()));
            }
            Some(other) if other == text_field => form_value = Some(field.text().await?),
            _ => {}
        }
    }

    let (filename, bytes) =
        resume.ok_or_else(|| AppError::Validation("missing 'resume' file field".to_string()))?;

    Ok(ResumeUpload {
        filename,
        bytes,
        form_value,
    })
}

/// Document parsing is CPU-bound and may panic on malformed input; keep it off the runtime.
async fn extract_upload_text(filename: String, bytes: Vec<u8>) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || extract_text(&filename, &bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow!("document extraction task failed: {e}")))??;
    Ok(text)
}

fn score(state: &AppState, resume_text: &str, jd_text: &str) -> MatchResult {
    let candidate = ExtractedProfile::from_text(resume_text, &state.vocabulary);
    let requirement = ExtractedProfile::from_text(jd_text, &state.vocabulary);
    state.scorer.score(&candidate, &requirement)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::matching::vocabulary::{RoleVocabulary, SkillVocabulary};
    use crate::routes::build_router;

    use super::*;

    fn app() -> Router {
        let state = AppState::new(
            Config::default(),
            SkillVocabulary::new(["python", "sql", "aws", "c", "c++"]).unwrap(),
            RoleVocabulary::new([("data analyst", vec!["python", "sql", "excel"])]).unwrap(),
        );
        build_router(state)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_match_endpoint_scores() {
        let (status, body) = post_json(
            app(),
            "/api/v1/match",
            json!({
                "resume_text": "2 years of Python and SQL",
                "jd_text": "4 years of Python, SQL and AWS"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], json!(55.0));
        assert_eq!(body["matched_skills"], json!(["python", "sql"]));
        assert_eq!(body["missing_skills"], json!(["aws"]));
        assert_eq!(body["experience_match_percent"], json!(50.0));
    }

    #[tokio::test]
    async fn test_match_rejects_blank_jd() {
        let (status, body) = post_json(
            app(),
            "/api/v1/match",
            json!({ "resume_text": "python", "jd_text": "   " }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_extract_skills_endpoint() {
        let (status, body) = post_json(
            app(),
            "/api/v1/skills/extract",
            json!({ "text": "I wrote C++ code" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"], json!(["c++"]));
    }

    #[tokio::test]
    async fn test_extract_experience_endpoint() {
        let (status, body) = post_json(
            app(),
            "/api/v1/experience/extract",
            json!({ "text": "3 years here, 10+ years overall" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["experience_years"], json!(10.0));
    }

    #[tokio::test]
    async fn test_batch_endpoint_and_limit() {
        let (status, body) = post_json(
            app(),
            "/api/v1/match/batch",
            json!({ "pairs": [
                { "resume_text": "python", "jd_text": "python" },
                { "resume_text": "", "jd_text": "python and 3 years" }
            ]}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"][0]["score"], json!(100.0));
        assert_eq!(body["results"][1]["score"], json!(0.0));

        let pairs: Vec<Value> = (0..=MAX_BATCH_PAIRS)
            .map(|_| json!({ "resume_text": "", "jd_text": "sql" }))
            .collect();
        let (status, _) = post_json(app(), "/api/v1/match/batch", json!({ "pairs": pairs })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_role_gap_endpoint() {
        let (status, body) = post_json(
            app(),
            "/api/v1/roles/gap",
            json!({
                "role": "Data Analyst",
                "skills": ["Excel"],
                "resume_text": "Built dashboards in Python"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["known_role"], json!(true));
        assert_eq!(body["skills"], json!(["excel", "python"]));
        assert_eq!(body["matched"], json!(["excel", "python"]));
        assert_eq!(body["missing"], json!(["sql"]));
    }

    #[tokio::test]
    async fn test_role_gap_unknown_role() {
        let (status, body) = post_json(
            app(),
            "/api/v1/roles/gap",
            json!({ "role": "unknown-role", "skills": ["python"] }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["known_role"], json!(false));
        assert_eq!(body["matched"], json!([]));
        assert_eq!(body["missing"], json!([]));
    }

    #[tokio::test]
    async fn test_list_roles() {
        let response = app()
            .oneshot(Request::get("/api/v1/roles").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["roles"], json!(["data analyst"]));
    }

    fn multipart_body(boundary: &str, parts: &[(&str, Option<&str>, &str)]) -> String {
        let mut body = String::new();
        for (name, filename, content) in parts {
            body.push_str(&format!("--{boundary}\r\n"));
            match filename {
                Some(f) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{boundary}--\r\n"));
        body
    }

    async fn post_multipart(uri: &str, body: String) -> (StatusCode, Value) {
        let boundary = "X-SKILLMATCH-BOUNDARY";
        let response = app()
            .oneshot(
                Request::post(uri)
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_upload_text_resume() {
        let body = multipart_body(
            "X-SKILLMATCH-BOUNDARY",
            &[
                ("resume", Some("resume.txt"), "2 years of Python and SQL"),
                ("jd_text", None, "4 years of Python, SQL and AWS"),
            ],
        );
        let (status, body) = post_multipart("/api/v1/match/upload", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], json!(55.0));
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_type() {
        let body = multipart_body(
            "X-SKILLMATCH-BOUNDARY",
            &[
                ("resume", Some("resume.rtf"), "binary"),
                ("jd_text", None, "python"),
            ],
        );
        let (status, body) = post_multipart("/api/v1/match/upload", body).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn test_upload_requires_resume_field() {
        let body = multipart_body("X-SKILLMATCH-BOUNDARY", &[("jd_text", None, "python")]);
        let (status, _) = post_multipart("/api/v1/match/upload", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_role_gap_upload_reports_detected_skills() {
        let body = multipart_body(
            "X-SKILLMATCH-BOUNDARY",
            &[
                ("resume", Some("resume.txt"), "Analyst using Python and Excel daily"),
                ("role", None, "data analyst"),
            ],
        );
        let (status, body) = post_multipart("/api/v1/roles/gap/upload", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "data analyst");
        assert_eq!(body["known_role"], json!(true));
        assert_eq!(body["skills"], json!(["excel", "python"]));
        assert_eq!(body["matched"], json!(["excel", "python"]));
        assert_eq!(body["missing"], json!(["sql"]));
    }

    #[tokio::test]
    async fn test_role_gap_upload_unknown_role_keeps_skills() {
        let body = multipart_body(
            "X-SKILLMATCH-BOUNDARY",
            &[
                ("resume", Some("resume.md"), "SQL and Python"),
                ("role", None, "astronaut"),
            ],
        );
        let (status, body) = post_multipart("/api/v1/roles/gap/upload", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["known_role"], json!(false));
        assert_eq!(body["skills"], json!(["python", "sql"]));
        assert_eq!(body["matched"], json!([]));
        assert_eq!(body["missing"], json!([]));
    }

    #[tokio::test]
    async fn test_role_gap_upload_requires_role_field() {
        let body = multipart_body(
            "X-SKILLMATCH-BOUNDARY",
            &[("resume", Some("resume.txt"), "python")],
        );
        let (status, body) = post_multipart("/api/v1/roles/gap/upload", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
