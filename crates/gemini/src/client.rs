use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tripweave_planner::{SelectionSet, TravelService};
use tripweave_shared::{
    DayPlan, District, Error, Itinerary, MapImage, MapPoint, PoiListing, Result, TripConfig,
    parse_generated,
};

use crate::prompt;

#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    pub api_key: String,
    pub endpoint: String,
    /// Districts, points of interest and map clicks.
    pub text_model: String,
    /// Itinerary generation.
    pub planner_model: String,
    pub image_model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_owned(),
            text_model: "gemini-2.5-flash".to_owned(),
            planner_model: "gemini-2.5-pro".to_owned(),
            image_model: "gemini-2.5-flash-image".to_owned(),
            timeout_secs: 120,
        }
    }
}

pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiClientConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Generation(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn build_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            model
        )
    }

    /// The API key goes in a header, never in the URL.
    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        let response = self
            .client
            .post(self.build_url(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tripweave_shared::bail!("HTTP {status}: {text}");
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        if let Some(error) = &parsed.error {
            tripweave_shared::bail!("Gemini API error: {}", error.message);
        }

        Ok(parsed)
    }

    async fn generate_text(&self, model: &str, parts: Vec<Part>, tools: Vec<Tool>) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content::user(parts)],
            tools,
            generation_config: None,
        };

        self.generate(model, &request).await?.text()
    }

    async fn generate_image(&self, prompt: String) -> Result<MapImage> {
        let request = GenerateRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            tools: vec![],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE"],
            }),
        };

        self.generate(&self.config.image_model, &request)
            .await?
            .image()
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    Error::Generation(err.without_url().to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

impl Content {
    fn user(parts: Vec<Part>) -> Self {
        Self { role: "user", parts }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            ..Default::default()
        }
    }

    fn image(image: &MapImage) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: image.mime_type.to_owned(),
                data: image.data.to_owned(),
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Tool {
    GoogleMaps {},
    GoogleSearch {},
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GenerateResponse {
    fn parts(self) -> impl Iterator<Item = Part> {
        self.candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
    }

    /// Text parts of the first candidate, joined.
    fn text(self) -> Result<String> {
        let text: String = self.parts().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            return Err(Error::EmptyResult("no text in response".to_owned()));
        }

        Ok(text)
    }

    fn image(self) -> Result<MapImage> {
        self.parts()
            .find_map(|p| p.inline_data)
            .map(|d| MapImage {
                mime_type: d.mime_type,
                data: d.data,
            })
            .ok_or_else(|| Error::EmptyResult("no image data received".to_owned()))
    }
}

#[async_trait]
impl TravelService for GeminiClient {
    #[tracing::instrument(skip(self))]
    async fn list_districts(&self, city: &str) -> Result<Vec<District>> {
        let text = self
            .generate_text(
                &self.config.text_model,
                vec![Part::text(prompt::districts(city))],
                vec![Tool::GoogleMaps {}],
            )
            .await?;

        parse_generated(&text)
    }

    #[tracing::instrument(skip(self))]
    async fn list_pois(&self, city: &str, district: &str) -> Result<PoiListing> {
        let text = self
            .generate_text(
                &self.config.text_model,
                vec![Part::text(prompt::pois(city, district))],
                vec![Tool::GoogleMaps {}],
            )
            .await?;

        parse_generated(&text)
    }

    #[tracing::instrument(skip_all, fields(days = trip.dates().days()))]
    async fn build_itinerary(
        &self,
        trip: &TripConfig,
        selections: &SelectionSet,
    ) -> Result<Itinerary> {
        let text = self
            .generate_text(
                &self.config.planner_model,
                vec![Part::text(prompt::itinerary(trip, selections))],
                vec![Tool::GoogleSearch {}, Tool::GoogleMaps {}],
            )
            .await?;

        let itinerary = Itinerary::from_json(&text)?;
        tracing::debug!(days = itinerary.len(), "itinerary parsed");

        Ok(itinerary)
    }

    #[tracing::instrument(skip_all, fields(title = %day.title))]
    async fn render_day_map(&self, day: &DayPlan) -> Result<MapImage> {
        let Some(prompt) = prompt::day_map(day) else {
            return Err(Error::EmptyInput(
                "No locations available for this day to generate a map.".to_owned(),
            ));
        };

        self.generate_image(prompt).await
    }

    #[tracing::instrument(skip_all)]
    async fn render_overall_map(&self, itinerary: &Itinerary) -> Result<MapImage> {
        self.generate_image(prompt::overall_map(itinerary)).await
    }

    #[tracing::instrument(skip(self, map))]
    async fn identify_location(&self, map: &MapImage, point: MapPoint) -> Result<String> {
        let text = self
            .generate_text(
                &self.config.text_model,
                vec![Part::image(map), Part::text(prompt::identify(point))],
                vec![],
            )
            .await?;

        Ok(text.trim().to_owned())
    }

    #[tracing::instrument(skip(self))]
    async fn render_region_map(&self, region: &str) -> Result<MapImage> {
        self.generate_image(prompt::region_map(region)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_build_url() {
        let client = GeminiClient::new(GeminiClientConfig {
            api_key: "test-key".to_owned(),
            endpoint: "http://localhost:9000/v1beta/".to_owned(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            client.build_url("gemini-2.5-flash"),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_failed_request_does_not_expose_the_api_key() {
        let client = GeminiClient::new(GeminiClientConfig {
            api_key: "SECRET-KEY-123".to_owned(),
            endpoint: "http://127.0.0.1:9".to_owned(),
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap();

        let err = client.list_districts("Paris").await.unwrap_err();

        assert!(matches!(err, Error::Generation(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!err.to_string().contains("127.0.0.1"));
    }

    #[test]
    fn test_image_request_shape() {
        let request = GenerateRequest {
            contents: vec![Content::user(vec![Part::text("draw".to_owned())])],
            tools: vec![],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE"],
            }),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "draw"}]}],
                "generationConfig": {"responseModalities": ["IMAGE"]}
            })
        );
    }

    #[test]
    fn test_tools_serialize_as_empty_objects() {
        let request = GenerateRequest {
            contents: vec![],
            tools: vec![Tool::GoogleSearch {}, Tool::GoogleMaps {}],
            generation_config: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap()["tools"],
            serde_json::json!([{"googleSearch": {}}, {"googleMaps": {}}])
        );
    }

    #[test]
    fn test_first_inline_image_is_returned() {
        let image = response(
            r#"{"candidates": [{"content": {"parts": [
                {"text": "Here is your map"},
                {"inlineData": {"mimeType": "image/png", "data": "iVBOR"}},
                {"inlineData": {"mimeType": "image/png", "data": "SECOND"}}
            ]}}]}"#,
        )
        .image()
        .unwrap();

        assert_eq!(image, MapImage::png("iVBOR"));
    }

    #[test]
    fn test_response_without_image_is_empty_result() {
        let err = response(r#"{"candidates": [{"content": {"parts": [{"text": "sorry"}]}}]}"#)
            .image()
            .unwrap_err();

        assert!(matches!(err, Error::EmptyResult(_)));
    }

    #[test]
    fn test_blocked_candidate_has_no_text() {
        let err = response(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#)
            .text()
            .unwrap_err();

        assert!(matches!(err, Error::EmptyResult(_)));
    }

    #[test]
    fn test_text_parts_are_joined() {
        let text = response(
            r#"{"candidates": [{"content": {"parts": [{"text": "```json\n[{\"name\": "}, {"text": "\"Marais\", \"description\": \"\"}]\n```"}]}}]}"#,
        )
        .text()
        .unwrap();

        let districts: Vec<District> = parse_generated(&text).unwrap();
        assert_eq!(districts[0].name, "Marais");
    }

    #[tokio::test]
    async fn test_empty_day_fails_before_any_request() {
        let client = GeminiClient::new(GeminiClientConfig {
            endpoint: "http://127.0.0.1:9".to_owned(),
            ..Default::default()
        })
        .unwrap();
        let day = DayPlan {
            title: "Rest in Kyoto".to_owned(),
            summary: String::new(),
            morning: vec![],
            afternoon: vec![],
            evening: vec![],
        };

        let err = client.render_day_map(&day).await.unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
    }
}
