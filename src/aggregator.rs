//! Request-kind dispatch and multi-provider orchestration
//!
//! One aggregator instance serves every request but keeps no state between
//! them; each call builds its provider results fresh and discards them once
//! the response is assembled. Independent providers are dispatched
//! concurrently; the news lookup alone is sequenced after geocoding because
//! its search term is the resolved place name.

use crate::config::AggregatorConfig;
use crate::extract::{self, AdventureSection, TipsSection, TodoSection};
use crate::models::{
    AdventurePlan, AdventureRequest, AdventureResponse, ProviderResult, RequestKind,
};
use crate::providers::{
    self, ChatApi, ChatClient, GeocodingClient, NewsClient, WeatherClient,
};
use crate::{AggregatorError, Result, normalize};
use std::time::Duration;
use tracing::{info, instrument};

/// Exact prompt that switches a request onto the single-answer branch
pub const SPECIAL_TRIGGER: &str = "what is the meaning of adventure?";

/// Answer substituted when the special model call yields nothing usable
const DEFAULT_ANSWER: &str = "Adventure is wherever you start looking for it.";

/// Multi-source fetch-and-normalize orchestrator
pub struct Aggregator {
    timeout: Duration,
    geocoding: GeocodingClient,
    weather: WeatherClient,
    news: NewsClient,
    chat: ChatClient,
}

impl Aggregator {
    /// Build an aggregator and its provider clients from the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the shared HTTP client cannot be
    /// constructed.
    pub fn new(config: &AggregatorConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.providers.timeout_ms);

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("adventure-aggregator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AggregatorError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            timeout,
            geocoding: GeocodingClient::new(
                http.clone(),
                config.providers.geocoding_base_url.as_str(),
            ),
            weather: WeatherClient::new(
                http.clone(),
                config.providers.weather_base_url.as_str(),
                config.providers.weather_api_key.clone(),
            ),
            news: NewsClient::new(
                http.clone(),
                config.providers.news_base_url.as_str(),
                config.providers.news_api_key.clone(),
            ),
            chat: ChatClient::new(http, &config.providers),
        })
    }

    /// Handle one aggregation request end to end.
    ///
    /// A single provider's failure never aborts the request; its field takes
    /// the documented default and the response still succeeds.
    ///
    /// # Errors
    ///
    /// Returns a validation error for requests that fail their invariants.
    /// Anything else bubbling up here is unexpected and maps to the generic
    /// 500 at the web boundary.
    #[instrument(skip(self, request, api_key), fields(kind = %kind, destination = %request.destination))]
    pub async fn handle(
        &self,
        kind: RequestKind,
        request: &AdventureRequest,
        api_key: Option<&str>,
    ) -> Result<AdventureResponse> {
        request.validate(kind)?;

        // easter egg: the exact trigger phrase bypasses the plan pipeline
        if let Some(prompt) = request.special_prompt.as_deref()
            && is_special_trigger(prompt)
        {
            info!("special trigger matched, skipping plan pipeline");
            return Ok(self.special(prompt, api_key).await);
        }

        match kind {
            RequestKind::Place => {
                let place = self.resolve_place(&request.destination).await;
                Ok(AdventureResponse {
                    place: Some(place.value),
                    ..AdventureResponse::default()
                })
            }
            RequestKind::Weather => {
                let weather = self.current_weather(&request.destination).await;
                Ok(AdventureResponse {
                    weather: Some(weather.value),
                    ..AdventureResponse::default()
                })
            }
            RequestKind::Plan => {
                let hours = required_hours(request)?;
                let plan =
                    generate_plan(&self.chat, self.timeout, &request.destination, hours, api_key)
                        .await;
                Ok(AdventureResponse::default().with_plan(plan))
            }
            RequestKind::Combined => {
                let hours = required_hours(request)?;

                // place, weather and the plan calls are independent
                let (place, weather, plan) = futures::join!(
                    self.resolve_place(&request.destination),
                    self.current_weather(&request.destination),
                    generate_plan(&self.chat, self.timeout, &request.destination, hours, api_key),
                );

                // news relevance follows the resolved name; the raw
                // destination stands in when resolution fell back
                let term = news_search_term(&place, &request.destination);
                let news = self.top_headline(term).await;
                let (news_text, image) = news.value;

                Ok(AdventureResponse {
                    place: Some(place.value),
                    weather: Some(weather.value),
                    news: Some(news_text),
                    image: Some(image),
                    ..AdventureResponse::default()
                }
                .with_plan(plan))
            }
            RequestKind::Special => Err(AggregatorError::validation(
                "special requests require the trigger prompt",
            )),
        }
    }

    async fn resolve_place(&self, destination: &str) -> ProviderResult<String> {
        providers::timed(
            "geocoding",
            self.timeout,
            normalize::DEFAULT_PLACE.to_string(),
            async {
                let hits = self.geocoding.search(destination).await?;
                Ok(normalize::place_name(&hits))
            },
        )
        .await
    }

    async fn current_weather(&self, destination: &str) -> ProviderResult<String> {
        providers::timed(
            "weather",
            self.timeout,
            normalize::DEFAULT_WEATHER.to_string(),
            async {
                let payload = self.weather.current(destination).await?;
                Ok(normalize::weather_summary(&payload))
            },
        )
        .await
    }

    async fn top_headline(&self, term: &str) -> ProviderResult<(String, String)> {
        providers::timed(
            "news",
            self.timeout,
            (
                normalize::DEFAULT_NEWS.to_string(),
                normalize::DEFAULT_NEWS_IMAGE.to_string(),
            ),
            async {
                let payload = self.news.top_article(term).await?;
                Ok(normalize::headline(&payload))
            },
        )
        .await
    }

    async fn special(&self, prompt: &str, api_key: Option<&str>) -> AdventureResponse {
        let answer = providers::timed(
            "chat-special",
            self.timeout,
            DEFAULT_ANSWER.to_string(),
            async {
                let text = self.chat.complete(prompt, api_key).await?;
                let text = extract::strip_fences(&text).to_string();
                Ok((!text.is_empty()).then_some(text))
            },
        )
        .await;

        AdventureResponse {
            answer: Some(answer.value),
            ..AdventureResponse::default()
        }
    }
}

/// Whether a free-form prompt matches the hard-coded trigger phrase
#[must_use]
pub fn is_special_trigger(prompt: &str) -> bool {
    prompt.trim().eq_ignore_ascii_case(SPECIAL_TRIGGER)
}

/// Search term fed to the news lookup: the resolved place name, or the raw
/// destination when geocoding degraded to its default
fn news_search_term<'a>(place: &'a ProviderResult<String>, destination: &'a str) -> &'a str {
    if place.is_degraded() {
        destination
    } else {
        place.value.as_str()
    }
}

fn required_hours(request: &AdventureRequest) -> Result<f64> {
    request
        .duration_hours
        .ok_or_else(|| AggregatorError::validation("durationHours is required for plan requests"))
}

/// Generate an adventure plan through three concurrent model calls, one per
/// section. Each section is extracted independently; a section whose call or
/// parse fails takes its slice of the deterministic fallback, so one bad
/// answer never discards the other two.
pub(crate) async fn generate_plan(
    chat: &dyn ChatApi,
    ceiling: Duration,
    destination: &str,
    hours: f64,
    api_key: Option<&str>,
) -> AdventurePlan {
    let fallback = extract::fallback_plan(destination, hours);

    let adventure_prompt = format!(
        "For a {hours}h trip in {destination}, describe one short adventure. JSON: {{\"adventure\": \"desc\"}}"
    );
    let todo_prompt = format!(
        "For a {hours}h trip in {destination}, give 3 to-dos. JSON: {{\"todo\": [\"1\", \"2\", \"3\"]}}"
    );
    let tips_prompt = format!(
        "For a {hours}h trip in {destination}, give 3 tips. JSON: {{\"tips\": [\"1\", \"2\", \"3\"]}}"
    );

    let (adventure, todo, tips) = futures::join!(
        providers::timed(
            "chat-adventure",
            ceiling,
            fallback.adventure.clone(),
            async {
                let text = chat.complete(&adventure_prompt, api_key).await?;
                Ok(extract::parse_section::<AdventureSection>(&text).map(|section| section.adventure))
            }
        ),
        providers::timed("chat-todo", ceiling, fallback.todo.clone(), async {
            let text = chat.complete(&todo_prompt, api_key).await?;
            Ok(extract::parse_section::<TodoSection>(&text).map(|section| section.todo))
        }),
        providers::timed("chat-tips", ceiling, fallback.tips.clone(), async {
            let text = chat.complete(&tips_prompt, api_key).await?;
            Ok(extract::parse_section::<TipsSection>(&text).map(|section| section.tips))
        }),
    );

    AdventurePlan {
        adventure: adventure.value,
        todo: todo.value,
        tips: tips.value,
    }
}
