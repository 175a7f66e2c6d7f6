//! Outbound transport tests with real HTTP assertions.
//!
//! Uses wiremock to intercept Discord API calls via serenity's `HttpBuilder::proxy()`.
//! Each test verifies the HTTP method, path, and body sent to Discord.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use panel_types::view::{announcement_message, panel_message, time_input_form};
    use panel_types::{ActionKind, InteractionRef, MessageContent, Responder};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::outbound::SerenityTransport;
    use crate::transport::PanelTransport;

    /// Create an Http client that routes all Discord API calls to a local wiremock server.
    fn proxy_http(proxy_url: &str) -> Arc<serenity::http::Http> {
        use serenity::model::id::ApplicationId;
        Arc::new(
            serenity::http::HttpBuilder::new("fake-token")
                .proxy(proxy_url)
                .ratelimiter_disabled(true)
                .application_id(ApplicationId::new(1))
                .build(),
        )
    }

    fn transport(server: &MockServer) -> SerenityTransport {
        SerenityTransport::new(proxy_http(&server.uri()))
    }

    fn message_json(message_id: u64, channel_id: u64) -> serde_json::Value {
        serde_json::json!({
            "id": message_id.to_string(),
            "channel_id": channel_id.to_string(),
            "author": {
                "id": "1",
                "username": "panel-bot",
                "global_name": null,
                "avatar": null,
                "bot": true
            },
            "content": "",
            "timestamp": "2024-01-01T00:00:00+00:00",
            "edited_timestamp": null,
            "tts": false,
            "mention_everyone": false,
            "mentions": [],
            "mention_roles": [],
            "attachments": [],
            "embeds": [],
            "pinned": false,
            "type": 0
        })
    }

    fn discord_error(code: u32, message: &str) -> serde_json::Value {
        serde_json::json!({ "code": code, "message": message })
    }

    fn interaction() -> InteractionRef {
        InteractionRef {
            id: 9,
            token: "tok".to_string(),
        }
    }

    // ── send_message ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_send_panel_posts_embed_and_buttons() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v10/channels/100/messages"))
            .and(body_string_contains("Bot Control Panel"))
            .and(body_string_contains("btn_custom_restart"))
            .and(body_string_contains(ActionKind::Online.action().illustration_url))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_json(555, 100)))
            .expect(1)
            .mount(&server)
            .await;

        let id = transport(&server)
            .send_message(100, &panel_message(ActionKind::Online))
            .await
            .unwrap();

        assert_eq!(id, 555);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_send_announcement_posts_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v10/channels/200/messages"))
            .and(body_string_contains("10:30 AM"))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_json(556, 200)))
            .expect(1)
            .mount(&server)
            .await;

        let content = announcement_message(ActionKind::DevMode.action(), Some("10:30 AM"));
        transport(&server).send_message(200, &content).await.unwrap();

        server.verify().await;
    }

    #[tokio::test]
    async fn test_send_permission_failure_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v10/channels/200/messages"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(discord_error(50013, "Missing Permissions")),
            )
            .mount(&server)
            .await;

        let err = transport(&server)
            .send_message(200, &MessageContent::text("hi"))
            .await
            .unwrap_err();

        assert_eq!(err.http_status, 403);
        assert_eq!(err.category, panel_types::ErrorCategory::PermissionDenied);
    }

    // ── fetch_message ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_fetch_existing_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v10/channels/100/messages/555"))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_json(555, 100)))
            .expect(1)
            .mount(&server)
            .await;

        transport(&server).fetch_message(100, 555).await.unwrap();
        server.verify().await;
    }

    #[tokio::test]
    async fn test_fetch_deleted_message_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v10/channels/100/messages/555"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(discord_error(10008, "Unknown Message")),
            )
            .mount(&server)
            .await;

        let err = transport(&server).fetch_message(100, 555).await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_not_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v10/channels/100/messages/555"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(discord_error(0, "Internal Server Error")),
            )
            .mount(&server)
            .await;

        let err = transport(&server).fetch_message(100, 555).await.unwrap_err();

        assert!(!err.is_not_found());
    }

    // ── edit_message ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_edit_swaps_panel_image() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v10/channels/100/messages/555"))
            .and(body_string_contains(ActionKind::Restart.action().illustration_url))
            .and(body_string_contains("btn_online"))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_json(555, 100)))
            .expect(1)
            .mount(&server)
            .await;

        transport(&server)
            .edit_message(100, 555, &panel_message(ActionKind::Restart))
            .await
            .unwrap();

        server.verify().await;
    }

    // ── respond ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_respond_to_interaction_is_ephemeral() {
        let server = MockServer::start().await;
        // flags 64 = EPHEMERAL
        Mock::given(method("POST"))
            .and(path("/api/v10/interactions/9/tok/callback"))
            .and(body_string_contains("Online announcement sent!"))
            .and(body_string_contains("64"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        transport(&server)
            .respond(
                &Responder::Interaction(interaction()),
                "Online announcement sent!",
            )
            .await
            .unwrap();

        server.verify().await;
    }

    #[tokio::test]
    async fn test_respond_to_message_replies_in_channel() {
        let server = MockServer::start().await;
        // serenity serializes the reply as "message_reference" in the body
        Mock::given(method("POST"))
            .and(path("/api/v10/channels/999/messages"))
            .and(body_string_contains("message_reference"))
            .and(body_string_contains("control panel channel"))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_json(557, 999)))
            .expect(1)
            .mount(&server)
            .await;

        transport(&server)
            .respond(
                &Responder::Message {
                    channel_id: 999,
                    message_id: 77,
                },
                "❌ This command can only be used in the control panel channel.",
            )
            .await
            .unwrap();

        server.verify().await;
    }

    #[tokio::test]
    async fn test_expired_interaction_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v10/interactions/9/tok/callback"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(discord_error(10062, "Unknown interaction")),
            )
            .mount(&server)
            .await;

        let err = transport(&server)
            .respond(&Responder::Interaction(interaction()), "late")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    // ── present_input_form ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_present_time_form_sends_modal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v10/interactions/9/tok/callback"))
            .and(body_string_contains("modal_dev_mode"))
            .and(body_string_contains("time_input"))
            .and(body_string_contains("e.g., 10:30 AM"))
            .and(body_string_contains("Enter Time for Dev Mode"))
            .and(body_string_contains("\"max_length\":100"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        transport(&server)
            .present_input_form(&interaction(), &time_input_form(ActionKind::DevMode))
            .await
            .unwrap();

        server.verify().await;
    }
}
