//! Google Calendar gateway implementation

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;
use memora_core::{CalendarGateway, SessionProvider};
use memora_domain::constants::{EVENT_DURATION_MINUTES, EVENT_REMINDER_METHOD};
use memora_domain::{CalendarConfig, MemoraError, NewReminder, Result};
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::types::{
    CreatedEvent, EventDateTime, EventPayload, EventReminderOverride, EventReminders,
};
use crate::http::HttpClient;

const EVENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Google Calendar gateway
///
/// Holds no token state: the provider access token is read from the session
/// on every call, so a reconnect takes effect immediately. The HTTP client
/// is built with a single attempt - the workflow layer owns retry policy.
pub struct GoogleCalendarGateway {
    session: Arc<dyn SessionProvider>,
    http_client: HttpClient,
    api_base: String,
    timezone: String,
}

impl GoogleCalendarGateway {
    /// Create a gateway from the calendar configuration.
    pub fn new(session: Arc<dyn SessionProvider>, config: &CalendarConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(StdDuration::from_secs(15))
            .max_attempts(1)
            .build()?;

        Ok(Self {
            session,
            http_client,
            api_base: config.api_base_url.trim_end_matches('/').to_string(),
            timezone: config.timezone.clone(),
        })
    }

    /// Current provider token, or the user-actionable auth error.
    async fn provider_token(&self) -> Result<String> {
        self.session
            .current_session()
            .await
            .and_then(|session| session.provider_access_token)
            .ok_or_else(|| {
                MemoraError::AuthRequired(
                    "no access token available, please reconnect your Google Calendar".into(),
                )
            })
    }

    fn event_payload(&self, reminder: &NewReminder) -> EventPayload {
        let start = reminder.scheduled_at();
        let end = start + Duration::minutes(EVENT_DURATION_MINUTES);

        EventPayload {
            summary: reminder.title.clone(),
            description: reminder.description.clone(),
            start: EventDateTime {
                date_time: start.format(EVENT_TIME_FORMAT).to_string(),
                time_zone: self.timezone.clone(),
            },
            end: EventDateTime {
                date_time: end.format(EVENT_TIME_FORMAT).to_string(),
                time_zone: self.timezone.clone(),
            },
            reminders: EventReminders {
                use_default: false,
                overrides: vec![EventReminderOverride {
                    method: EVENT_REMINDER_METHOD.to_string(),
                    minutes: reminder.lead_minutes,
                }],
            },
        }
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendarGateway {
    async fn check_connection(&self, owner_id: &str) -> bool {
        let Ok(token) = self.provider_token().await else {
            debug!(owner_id, "no provider token; calendar not connected");
            return false;
        };

        let url = format!("{}/users/me/calendarList", self.api_base);
        let request = self.http_client.request(Method::GET, &url).bearer_auth(token);

        match self.http_client.send(request).await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                let status = response.status().as_u16();
                if status == 403 {
                    warn!(owner_id, "calendar permissions missing; re-authentication needed");
                } else {
                    warn!(owner_id, status, "calendar connectivity probe rejected");
                }
                false
            }
            Err(err) => {
                warn!(owner_id, error = %err, "calendar connectivity probe failed");
                false
            }
        }
    }

    async fn create_event(&self, owner_id: &str, reminder: &NewReminder) -> Result<String> {
        // Token check happens before any network traffic.
        let token = self.provider_token().await?;

        let payload = self.event_payload(reminder);
        let url = format!("{}/calendars/primary/events", self.api_base);

        debug!(owner_id, summary = %payload.summary, "creating calendar event");

        let request =
            self.http_client.request(Method::POST, &url).bearer_auth(token).json(&payload);
        let response = self.http_client.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let message = read_error_message(response).await;
            if status.as_u16() == 401 {
                return Err(MemoraError::AuthRequired(format!(
                    "calendar rejected the access token ({message}), please reconnect your \
                     Google Calendar"
                )));
            }
            return Err(MemoraError::ExternalApi { status: status.as_u16(), message });
        }

        let created: CreatedEvent = response.json().await.map_err(|e| {
            MemoraError::Internal(format!("failed to parse calendar response: {e}"))
        })?;

        info!(owner_id, event_id = %created.id, "calendar event created");

        Ok(created.id)
    }
}

/// Pull the human-readable message out of the provider's error envelope,
/// falling back to the raw body.
async fn read_error_message(response: reqwest::Response) -> String {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ErrorBody,
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
    serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body)
}
