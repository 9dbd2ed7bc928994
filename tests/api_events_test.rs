//! Integration tests for the event mutation endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serial_test::serial;
    use tower::util::ServiceExt;

    use agenda::api::public::calendar::EventResponse;

    use crate::test_utils::{mock_token_endpoint, test_app};

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Tests a create lands on the primary (first-configured) account
    /// and returns the backend-assigned id
    #[tokio::test]
    #[serial]
    async fn it_creates_an_event_on_the_primary_source() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token_endpoint(&mut server);
        let _insert = server
            .mock("POST", "/calendars/primary/events")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": "new-1", "summary": "Dentist",
                    "start": {"dateTime": "2025-06-02T09:00:00Z"},
                    "end": {"dateTime": "2025-06-02T10:00:00Z"}}"#,
            )
            .create();
        let token_url = format!("{}/token", server.url());
        let app = test_app(&server.url(), &token_url, &server.url()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/events")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"title": "Dentist",
                            "start": "2025-06-02T09:00:00Z",
                            "end": "2025-06-02T10:00:00Z"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let event: EventResponse = body_json(response).await;
        assert_eq!(event.id, "new-1");
        assert_eq!(event.source_id, "work@test.com");
    }

    /// Tests an inverted time range is rejected before any backend call
    #[tokio::test]
    #[serial]
    async fn it_rejects_a_create_with_inverted_times() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token_endpoint(&mut server);
        let insert = server
            .mock("POST", "/calendars/primary/events")
            .expect(0)
            .create();
        let token_url = format!("{}/token", server.url());
        let app = test_app(&server.url(), &token_url, &server.url()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/events")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"title": "Dentist",
                            "start": "2025-06-02T10:00:00Z",
                            "end": "2025-06-02T09:00:00Z"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        insert.assert();
    }

    /// Tests a cancel deletes from the named source
    #[tokio::test]
    #[serial]
    async fn it_cancels_an_event_by_source_and_id() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token_endpoint(&mut server);
        let delete = server
            .mock("DELETE", "/calendars/primary/events/a1")
            .with_status(204)
            .create();
        let token_url = format!("{}/token", server.url());
        let app = test_app(&server.url(), &token_url, &server.url()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/events/personal@test.com/a1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        delete.assert();
    }

    /// Tests a backend rejection of the id pair surfaces as 404
    #[tokio::test]
    #[serial]
    async fn it_returns_404_for_an_unknown_event() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token_endpoint(&mut server);
        let _delete = server
            .mock("DELETE", "/calendars/primary/events/missing")
            .with_status(404)
            .create();
        let token_url = format!("{}/token", server.url());
        let app = test_app(&server.url(), &token_url, &server.url()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/events/work@test.com/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Tests a mutation against an unconfigured source is rejected
    /// without a backend call
    #[tokio::test]
    #[serial]
    async fn it_rejects_an_unknown_source() {
        let server = mockito::Server::new_async().await;
        let token_url = format!("{}/token", server.url());
        let app = test_app(&server.url(), &token_url, &server.url()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/events/stranger@test.com/a1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Tests a reschedule patches only the times; the title and
    /// description in the response are the backend's unchanged ones
    #[tokio::test]
    #[serial]
    async fn it_reschedules_preserving_identity() {
        let mut server = mockito::Server::new_async().await;
        let _token = mock_token_endpoint(&mut server);
        let patch = server
            .mock("PATCH", "/calendars/primary/events/a1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": "a1", "summary": "Strategy Call",
                    "description": "Quarterly review",
                    "start": {"dateTime": "2025-06-03T15:00:00Z"},
                    "end": {"dateTime": "2025-06-03T16:00:00Z"}}"#,
            )
            .create();
        let token_url = format!("{}/token", server.url());
        let app = test_app(&server.url(), &token_url, &server.url()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/events/work@test.com/a1")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"start": "2025-06-03T15:00:00Z",
                            "end": "2025-06-03T16:00:00Z"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let event: EventResponse = body_json(response).await;
        assert_eq!(event.id, "a1");
        assert_eq!(event.title, "Strategy Call");
        assert_eq!(event.description, "Quarterly review");
        assert_eq!(event.start, "2025-06-03T15:00:00+00:00");
        patch.assert();
    }
}
