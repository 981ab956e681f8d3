#[cfg(test)]
mod graphiql_e2e_tests {
    use std::sync::Arc;

    use graphql_env_server::{
        ExecutionParams, ExecutionResponse, FormattedResponse, GraphiQLRenderer,
    };
    use ntex::{
        http::StatusCode,
        web::{self, test},
    };
    use serde_json::json;

    use crate::testkit::{init_app, json_body, scripted_environment};

    struct StaticConsole;

    impl GraphiQLRenderer for StaticConsole {
        fn render(
            &self,
            params: Option<&ExecutionParams>,
            response: &ExecutionResponse,
            formatted: &FormattedResponse,
        ) -> web::HttpResponse {
            let query = params.and_then(|params| params.query.as_deref()).unwrap_or("");
            web::HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(format!(
                    "<html><pre>{}</pre><pre>{}</pre><p>{} {}</p></html>",
                    query,
                    formatted.payload,
                    formatted.status.as_u16(),
                    response.items().len()
                ))
        }
    }

    fn browser_request(uri: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri(uri)
            .header("accept", "text/html,application/xhtml+xml")
    }

    #[ntex::test]
    async fn browsers_get_the_console() {
        let (_, environment) = scripted_environment();
        let environment = environment.with_graphiql_renderer(Arc::new(StaticConsole));
        let app = init_app("", environment).await;

        let req = browser_request("/graphql?query=%7B+me+%7D");
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let body = test::read_body(resp).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.starts_with("<html><pre>{ me }</pre>"));
        assert!(body.ends_with("<p>200 1</p></html>"));
    }

    #[ntex::test]
    async fn raw_flag_forces_json() {
        let (_, environment) = scripted_environment();
        let environment = environment.with_graphiql_renderer(Arc::new(StaticConsole));
        let app = init_app("", environment).await;

        let resp = test::call_service(
            &app,
            browser_request("/graphql?query=%7B+me+%7D&raw").to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["data"]["query"], json!("{ me }"));
    }

    #[ntex::test]
    async fn disabled_console_answers_json() {
        let (_, environment) = scripted_environment();
        let app = init_app(
            r#"
            graphiql:
              enabled: false
            "#,
            environment.with_graphiql_renderer(Arc::new(StaticConsole)),
        )
        .await;

        let req = browser_request("/graphql?query=%7B+me+%7D");
        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(json_body(resp).await["data"]["query"], json!("{ me }"));
    }

    #[ntex::test]
    async fn post_requests_never_render_the_console() {
        let (_, environment) = scripted_environment();
        let environment = environment.with_graphiql_renderer(Arc::new(StaticConsole));
        let app = init_app("", environment).await;

        let req = test::TestRequest::post()
            .uri("/graphql")
            .header("accept", "*/*")
            .header("content-type", "application/json")
            .set_payload(json!({ "query": "{ me }" }).to_string())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(json_body(resp).await["data"]["query"], json!("{ me }"));
    }
}
