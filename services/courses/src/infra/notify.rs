use anyhow::Context as _;
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::repository::NotifierPort;
use crate::error::CoursesServiceError;

/// HTTP client for the notification dispatcher. Callers treat delivery as
/// best-effort; this impl just reports what happened.
#[derive(Clone)]
pub struct HttpNotifier {
    pub client: Client,
    pub base_url: String,
}

#[derive(Serialize)]
struct NotifyBody<'a> {
    user_id: Uuid,
    subject: &'a str,
    body: &'a str,
}

impl NotifierPort for HttpNotifier {
    async fn notify(
        &self,
        user_id: Uuid,
        subject: &str,
        body: &str,
    ) -> Result<(), CoursesServiceError> {
        let resp = self
            .client
            .post(format!("{}/notify", self.base_url))
            .json(&NotifyBody {
                user_id,
                subject,
                body,
            })
            .send()
            .await
            .context("send notification")?;
        resp.error_for_status().context("notification rejected")?;
        Ok(())
    }
}
