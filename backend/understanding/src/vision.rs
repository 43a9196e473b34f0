/// Vision understanding: describe a profile photo with a vision model.
///
/// The analysis text is meant to be fed back in as the profile of an ice
/// breaker request.
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use icebot_composer::{execute_logged, PromptComposer, PromptInput};
use icebot_core::{CompletionClient, CompletionResult, IcebotError, ValidationError};

use crate::image::ImagePayload;
use crate::mime::detect_image_mime;

pub struct VisionAnalyzer {
    client: Arc<dyn CompletionClient>,
    composer: PromptComposer,
}

impl VisionAnalyzer {
    pub fn new(client: Arc<dyn CompletionClient>, composer: PromptComposer) -> Self {
        Self { client, composer }
    }

    /// Validate `image_data` and ask the vision model about it.
    ///
    /// Validation failures return before any network call.
    pub async fn analyze(
        &self,
        user_id: &str,
        image_data: &str,
        mime_hint: Option<&str>,
    ) -> Result<CompletionResult, IcebotError> {
        let payload = ImagePayload::parse(image_data, mime_hint)?;
        self.analyze_payload(user_id, &payload).await
    }

    /// Read an image from disk, detect its type by extension, and analyze it.
    pub async fn describe_file(
        &self,
        user_id: &str,
        path: impl AsRef<Path>,
    ) -> Result<CompletionResult, IcebotError> {
        let path = path.as_ref();
        let mime = detect_image_mime(path).ok_or(ValidationError::InvalidImageFormat)?;
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IcebotError::NotFound(path.display().to_string()),
            _ => IcebotError::Storage(format!("failed to read {}: {e}", path.display())),
        })?;

        let payload = ImagePayload::from_bytes(&bytes, mime)?;
        self.analyze_payload(user_id, &payload).await
    }

    async fn analyze_payload(
        &self,
        user_id: &str,
        payload: &ImagePayload,
    ) -> Result<CompletionResult, IcebotError> {
        info!(
            mime = payload.mime(),
            estimated_bytes = payload.estimated_size(),
            "[Vision] Analyzing profile photo"
        );

        let image_url = payload.data_url();
        let request = self.composer.compose(PromptInput::ImageAnalysis {
            image_url: &image_url,
        });

        let result = execute_logged(self.client.as_ref(), user_id, &request).await?;
        if result.raw_text.trim().is_empty() {
            return Err(IcebotError::EmptyResponse);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icebot_composer::providers::{MockClient, MockReply};
    use icebot_core::{TaskKind, UserContent};

    const JPEG: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10];

    fn analyzer(client: &Arc<MockClient>) -> VisionAnalyzer {
        VisionAnalyzer::new(client.clone(), PromptComposer::new("text", "vision"))
    }

    #[tokio::test]
    async fn sends_multimodal_request_to_vision_model() {
        let client = Arc::new(MockClient::new().with_response("Golden retriever, mountain trail"));
        let result = analyzer(&client)
            .analyze("u1", "data:image/jpeg;base64,/9j/4AAQ", None)
            .await
            .unwrap();
        assert_eq!(result.raw_text, "Golden retriever, mountain trail");

        let request = &client.requests()[0];
        assert_eq!(request.task, TaskKind::ImageAnalysis);
        assert_eq!(request.model, "vision");
        assert!(matches!(
            &request.user_content,
            UserContent::TextWithImage { image_url, .. } if image_url == "data:image/jpeg;base64,/9j/4AAQ"
        ));
        assert!(request.system_prompt.contains("dating profile analyzer"));
    }

    #[tokio::test]
    async fn oversized_payload_never_reaches_the_client() {
        let client = Arc::new(MockClient::new());
        let huge = "A".repeat(6 * 1024 * 1024);
        let err = analyzer(&client)
            .analyze("u1", &huge, Some("image/png"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IcebotError::Validation(ValidationError::PayloadTooLarge { .. })
        ));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn format_errors_never_reach_the_client() {
        let client = Arc::new(MockClient::new());
        let err = analyzer(&client).analyze("u1", "/9j/4AAQ", None).await.unwrap_err();
        assert!(matches!(
            err,
            IcebotError::Validation(ValidationError::InvalidImageFormat)
        ));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_analysis_is_empty_response() {
        let client = Arc::new(MockClient::new().with_response("   "));
        let err = analyzer(&client)
            .analyze("u1", "/9j/4AAQ", Some("image/jpeg"))
            .await
            .unwrap_err();
        assert!(matches!(err, IcebotError::EmptyResponse));
    }

    #[tokio::test]
    async fn upstream_errors_pass_through() {
        let client = Arc::new(MockClient::new().with_fallback(MockReply::Transport("timeout".into())));
        let err = analyzer(&client)
            .analyze("u1", "/9j/4AAQ", Some("image/jpeg"))
            .await
            .unwrap_err();
        assert!(matches!(err, IcebotError::Transport(_)));
    }

    #[tokio::test]
    async fn describe_file_detects_mime_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.JPG");
        tokio::fs::write(&path, JPEG).await.unwrap();

        let client = Arc::new(MockClient::new().with_response("Beach sunset"));
        analyzer(&client).describe_file("u1", &path).await.unwrap();

        let request = &client.requests()[0];
        assert!(matches!(
            &request.user_content,
            UserContent::TextWithImage { image_url, .. } if image_url.starts_with("data:image/jpeg;base64,/9j/")
        ));
    }

    #[tokio::test]
    async fn describe_file_rejects_missing_and_non_image_files() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockClient::new());
        let analyzer = analyzer(&client);

        let err = analyzer
            .describe_file("u1", dir.path().join("absent.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, IcebotError::NotFound(_)));

        let notes = dir.path().join("notes.txt");
        tokio::fs::write(&notes, b"hello").await.unwrap();
        let err = analyzer.describe_file("u1", &notes).await.unwrap_err();
        assert!(matches!(
            err,
            IcebotError::Validation(ValidationError::InvalidImageFormat)
        ));
        assert_eq!(client.call_count(), 0);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn analysis_emits_generation_events() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = Arc::new(
            MockClient::new()
                .then(MockReply::Text("Dog on a paddleboard".into()))
                .then(MockReply::Upstream {
                    status_code: 429,
                    message: None,
                }),
        );
        let analyzer = analyzer(&client);
        analyzer.analyze("u7", "/9j/4AAQ", Some("image/jpeg")).await.unwrap();
        analyzer
            .analyze("u7", "/9j/4AAQ", Some("image/jpeg"))
            .await
            .unwrap_err();

        let logs = captured.text();
        let events: Vec<&str> = logs
            .lines()
            .filter(|l| l.contains(icebot_logging::event_logger::EVENT_TARGET))
            .collect();
        assert_eq!(events.len(), 2);
        assert!(events[0].contains(r#""type":"completion""#));
        assert!(events[0].contains("image_analysis") && events[0].contains("u7"));
        assert!(events[1].contains(r#""type":"failure""#) && events[1].contains("429"));
    }
}
