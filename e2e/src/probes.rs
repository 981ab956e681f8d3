#[cfg(test)]
mod probes_e2e_tests {
    use ntex::web::test;

    use crate::testkit::{init_app, scripted_environment};

    #[ntex::test]
    async fn should_respond_to_health_probe() {
        let (engine, environment) = scripted_environment();
        let app = init_app("", environment).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(engine.calls(), 0);
    }
}
