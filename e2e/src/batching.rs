#[cfg(test)]
mod batching_e2e_tests {
    use std::time::{Duration, Instant};

    use ntex::{http::StatusCode, web::test};
    use serde_json::json;

    use crate::testkit::{init_app, init_graphql_request, json_body, scripted_environment};

    #[ntex::test]
    async fn batch_responses_keep_request_order() {
        let (engine, environment) = scripted_environment();
        let app = init_app("", environment).await;

        let req = init_graphql_request(json!([
            { "query": "{ first }", "variables": { "delay": 80 } },
            { "query": "{ second }", "variables": { "delay": 0 } },
            { "query": "{ third }", "variables": { "delay": 40 } }
        ]));
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        let queries: Vec<_> = body
            .as_array()
            .expect("batch responses should be a list")
            .iter()
            .map(|entry| entry["data"]["query"].clone())
            .collect();
        assert_eq!(
            queries,
            vec![json!("{ first }"), json!("{ second }"), json!("{ third }")]
        );
        assert_eq!(engine.calls(), 3);
    }

    #[ntex::test]
    async fn batch_entries_run_concurrently() {
        let (engine, environment) = scripted_environment();
        let app = init_app("", environment).await;

        let req = init_graphql_request(json!([
            { "query": "{ a }", "variables": { "delay": 100 } },
            { "query": "{ b }", "variables": { "delay": 100 } },
            { "query": "{ c }", "variables": { "delay": 100 } }
        ]));
        let started = Instant::now();
        let resp = test::call_service(&app, req.to_request()).await;
        let elapsed = started.elapsed();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(engine.peak_in_flight(), 3);
        assert!(
            elapsed < Duration::from_millis(250),
            "three 100ms entries took {:?}",
            elapsed
        );
    }

    #[ntex::test]
    async fn batch_status_is_the_worst_entry_status() {
        let (_, environment) = scripted_environment();
        let app = init_app("", environment).await;

        let req = init_graphql_request(json!([
            { "query": "{ a }" },
            { "query": "{ b }" },
            { "query": "{ fail }" },
            { "query": "{ d }" }
        ]));
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert_eq!(body.as_array().map(Vec::len), Some(4));
        assert_eq!(body[2], json!({ "errors": [{ "message": "scripted failure" }] }));
        assert_eq!(body[3]["data"]["query"], json!("{ d }"));
    }

    #[ntex::test]
    async fn status_hints_win_when_they_are_higher() {
        let (_, environment) = scripted_environment();
        let app = init_app("", environment).await;

        let req = init_graphql_request(json!([
            { "query": "{ fail }" },
            { "query": "{ unavailable }" },
            { "query": "{ ok }" }
        ]));
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[ntex::test]
    async fn empty_batch_is_rejected() {
        let (engine, environment) = scripted_environment();
        let app = init_app("", environment).await;

        let req = test::TestRequest::post()
            .uri("/graphql?query=%7B+me+%7D")
            .header("content-type", "application/json")
            .set_payload("[]")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(resp).await,
            json!({
                "errors": [{
                    "message": "Received an empty list in the batch request.",
                    "extensions": { "code": "BATCH_EMPTY_LIST" }
                }]
            })
        );
        assert_eq!(engine.calls(), 0);
    }

    #[ntex::test]
    async fn disabled_batching_rejects_lists_without_executing() {
        let (engine, environment) = scripted_environment();
        let app = init_app(
            r#"
            batching:
              enabled: false
            "#,
            environment,
        )
        .await;

        let req = init_graphql_request(json!([{ "query": "{ a }" }, { "query": "{ b }" }]));
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(resp).await,
            json!({
                "errors": [{
                    "message": "Batch GraphQL requests are not enabled.",
                    "extensions": { "code": "BATCH_NOT_ENABLED" }
                }]
            })
        );
        assert_eq!(engine.calls(), 0);

        let req = init_graphql_request(json!({ "query": "{ a }" }));
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[ntex::test]
    async fn query_string_does_not_leak_into_batch_entries() {
        let (_, environment) = scripted_environment();
        let app = init_app("", environment).await;

        let req = test::TestRequest::post()
            .uri("/graphql?operationName=FromQueryString&query=%7B+shared+%7D")
            .header("content-type", "application/json")
            .set_payload(json!([{ "query": "{ a }" }, {}]).to_string())
            .to_request();
        let resp = test::call_service(&app, req).await;

        let body = json_body(resp).await;
        assert_eq!(body[0]["data"]["operationName"], json!(null));
        assert_eq!(
            body[1],
            json!({ "errors": [{ "message": "Must provide query string." }] })
        );
    }

    #[ntex::test]
    async fn broken_entries_do_not_abort_their_siblings() {
        let (engine, environment) = scripted_environment();
        let app = init_app("", environment).await;

        let req = init_graphql_request(json!([
            { "query": "{ a }", "variables": "not json" },
            "{ b }",
            { "query": "{ panic }" },
            { "query": "{ c }", "variables": "{\"x\":1}" }
        ]));
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert_eq!(
            body[0],
            json!({ "errors": [{ "message": "Variables are invalid JSON." }] })
        );
        let not_a_dict = "GraphQL params should be a dict. Received \"{ b }\".";
        assert_eq!(body[1], json!({ "errors": [{ "message": not_a_dict }] }));
        assert_eq!(
            body[2],
            json!({ "errors": [{ "message": "Unexpected error" }] })
        );
        assert_eq!(body[3]["data"]["variables"], json!({ "x": 1 }));
        assert_eq!(engine.calls(), 2);
    }
}
