//! Job posting endpoints and wire types.

use bon::Builder;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::calendar::format_date_for_api;
use crate::client::{ApiError, ApiRequest, AuthPipeline};

/// Application status of a posting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum JobStatus {
    #[default]
    Saved,
    Applied,
    Rejected,
    Interviewed,
    Expired,
}

/// Visual weight for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Neutral,
    Info,
    Danger,
    Warning,
    Muted,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Saved,
        JobStatus::Applied,
        JobStatus::Rejected,
        JobStatus::Interviewed,
        JobStatus::Expired,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Saved => "Saved",
            Self::Applied => "Applied",
            Self::Rejected => "Rejected",
            Self::Interviewed => "Interviewing",
            Self::Expired => "Expired",
        }
    }

    pub fn tone(self) -> BadgeTone {
        match self {
            Self::Saved => BadgeTone::Neutral,
            Self::Applied => BadgeTone::Info,
            Self::Rejected => BadgeTone::Danger,
            Self::Interviewed => BadgeTone::Warning,
            Self::Expired => BadgeTone::Muted,
        }
    }
}

/// Body of `POST /job-posts` and `PUT /job-posts/{id}`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use jobblog::api::{JobPostRequest, JobStatus};
///
/// let closing = NaiveDate::from_ymd_opt(2025, 9, 30)
///     .and_then(|d| d.and_hms_opt(18, 0, 0))
///     .unwrap();
/// let post = JobPostRequest::builder()
///     .company_name("Acme")
///     .title("Backend Engineer")
///     .closing_date_time(closing)
///     .build();
/// assert_eq!(post.status, JobStatus::Saved);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct JobPostRequest {
    #[builder(into)]
    pub company_name: String,
    #[builder(into)]
    pub title: String,
    #[builder(into, default)]
    pub description: String,
    #[builder(into, default)]
    pub apply_url: String,
    #[serde(with = "local_date_time")]
    pub closing_date_time: NaiveDateTime,
    #[builder(default)]
    pub status: JobStatus,
}

impl JobPostRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.company_name.trim().is_empty() {
            return Err(ApiError::InvalidRequest("company name is required".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(ApiError::InvalidRequest("title is required".to_string()));
        }
        Ok(())
    }
}

impl From<&JobPost> for JobPostRequest {
    fn from(post: &JobPost) -> Self {
        Self {
            company_name: post.company_name.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            apply_url: post.apply_url.clone(),
            closing_date_time: post.closing_date_time,
            status: post.status,
        }
    }
}

/// Full posting as returned by `GET /job-posts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPost {
    pub id: i64,
    pub company_name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub apply_url: String,
    #[serde(with = "local_date_time")]
    pub closing_date_time: NaiveDateTime,
    pub status: JobStatus,
    #[serde(default)]
    pub created_by: String,
    #[serde(with = "local_date_time")]
    pub created_at: NaiveDateTime,
    #[serde(with = "local_date_time")]
    pub updated_at: NaiveDateTime,
}

/// List entry returned by `/job-posts/my` and `/job-posts/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostSummary {
    pub id: i64,
    pub company_name: String,
    pub title: String,
    pub status: JobStatus,
    #[serde(with = "local_date_time")]
    pub closing_date_time: NaiveDateTime,
    #[serde(with = "local_date_time")]
    pub created_at: NaiveDateTime,
    #[serde(with = "local_date_time")]
    pub updated_at: NaiveDateTime,
}

/// Job posting endpoints.
#[derive(Debug, Clone)]
pub struct JobPostApi {
    pipeline: AuthPipeline,
}

impl JobPostApi {
    pub fn new(pipeline: AuthPipeline) -> Self {
        Self { pipeline }
    }

    /// Create a posting and return its id.
    pub async fn create(&self, post: &JobPostRequest) -> Result<i64, ApiError> {
        post.validate()?;
        self.pipeline
            .send_json(ApiRequest::post("/job-posts").with_json(post)?)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<JobPost, ApiError> {
        self.pipeline
            .send_json(ApiRequest::get(format!("/job-posts/{id}")))
            .await
    }

    /// Postings created by the signed-in user.
    pub async fn list_mine(&self) -> Result<Vec<JobPostSummary>, ApiError> {
        self.pipeline
            .send_json(ApiRequest::get("/job-posts/my"))
            .await
    }

    /// Postings whose closing date falls in `[from, to]`.
    ///
    /// Either bound may be open, but not both.
    pub async fn search(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<JobPostSummary>, ApiError> {
        if from.is_none() && to.is_none() {
            return Err(ApiError::InvalidRequest(
                "search needs at least one of from/to".to_string(),
            ));
        }
        let mut request = ApiRequest::get("/job-posts/search");
        if let Some(from) = from {
            request = request.with_query("from", format_date_for_api(from));
        }
        if let Some(to) = to {
            request = request.with_query("to", format_date_for_api(to));
        }
        self.pipeline.send_json(request).await
    }

    /// Postings closing on a single day.
    pub async fn search_day(&self, day: NaiveDate) -> Result<Vec<JobPostSummary>, ApiError> {
        self.search(Some(day), Some(day)).await
    }

    pub async fn update(&self, id: i64, post: &JobPostRequest) -> Result<(), ApiError> {
        post.validate()?;
        self.pipeline
            .send(ApiRequest::put(format!("/job-posts/{id}")).with_json(post)?)
            .await?;
        Ok(())
    }

    /// Change only the status of an existing posting.
    pub async fn set_status(&self, id: i64, status: JobStatus) -> Result<(), ApiError> {
        let current = self.get(id).await?;
        let mut request = JobPostRequest::from(&current);
        request.status = status;
        self.update(id, &request).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.pipeline
            .send(ApiRequest::delete(format!("/job-posts/{id}")))
            .await?;
        Ok(())
    }
}

/// Serde adapter for backend `LocalDateTime` values, which omit seconds when
/// they are zero and may carry a fraction.
pub(crate) mod local_date_time {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format("%Y-%m-%dT%H:%M:%S"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid local date-time: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .unwrap()
    }

    #[test]
    fn status_wire_format_is_screaming_snake() {
        assert_eq!(serde_json::to_value(JobStatus::Interviewed).unwrap(), json!("INTERVIEWED"));
        assert_eq!("applied".parse::<JobStatus>().unwrap(), JobStatus::Applied);
        assert_eq!(JobStatus::Expired.to_string(), "EXPIRED");
    }

    #[test]
    fn labels_and_tones_cover_every_status() {
        let labels: Vec<_> = JobStatus::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["Saved", "Applied", "Rejected", "Interviewing", "Expired"]);
        assert_eq!(JobStatus::Rejected.tone(), BadgeTone::Danger);
        assert_eq!(JobStatus::default(), JobStatus::Saved);
    }

    #[test]
    fn request_serializes_camel_case() {
        let post = JobPostRequest::builder()
            .company_name("Acme")
            .title("Backend Engineer")
            .apply_url("https://acme.example/jobs/1")
            .closing_date_time(at(2025, 9, 30, 18, 0))
            .status(JobStatus::Applied)
            .build();
        assert_eq!(
            serde_json::to_value(&post).unwrap(),
            json!({
                "companyName": "Acme",
                "title": "Backend Engineer",
                "description": "",
                "applyUrl": "https://acme.example/jobs/1",
                "closingDateTime": "2025-09-30T18:00:00",
                "status": "APPLIED"
            })
        );
    }

    #[test]
    fn summary_accepts_minute_precision_and_fractions() {
        let summary: JobPostSummary = serde_json::from_value(json!({
            "id": 7,
            "companyName": "Acme",
            "title": "SRE",
            "status": "SAVED",
            "closingDateTime": "2025-09-30T18:00",
            "createdAt": "2025-09-01T09:15:42.123456",
            "updatedAt": "2025-09-02T10:00:00"
        }))
        .unwrap();
        assert_eq!(summary.closing_date_time, at(2025, 9, 30, 18, 0));
        assert_eq!(summary.created_at.date(), NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    }

    #[test]
    fn validation_requires_company_and_title() {
        let post = JobPostRequest::builder()
            .company_name("  ")
            .title("Engineer")
            .closing_date_time(at(2025, 9, 30, 18, 0))
            .build();
        assert!(matches!(post.validate(), Err(ApiError::InvalidRequest(_))));
    }
}
