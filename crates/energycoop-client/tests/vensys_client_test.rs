use energycoop_client::{VensysClient, VensysClientConfig, VensysHttpClient};
use energycoop_common::EnergyCoopError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> VensysHttpClient {
    let config = VensysClientConfig::new(&server.uri()).with_api_key("test-key");
    VensysHttpClient::new(config).unwrap()
}

#[tokio::test]
async fn test_mean_energy_yield_sends_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/Customer/MeanData/EnergyYield"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"data":{"value":1234.5}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).get_mean_energy_yield().await.unwrap();

    assert_eq!(response.unwrap().data.unwrap().value, 1234.5);
}

#[tokio::test]
async fn test_performance_passes_epoch_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/Customer/Performance"))
        .and(query_param("from", "1762300800"))
        .and(query_param("to", "1762387199"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"from":"2025-11-05T00:00:00","to":"2025-11-05T23:59:59",
                "data":[{"tid":"GF1","availability":99.5,"energyYield":4200.0}]}"#,
        ))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .get_performance(1_762_300_800, 1_762_387_199)
        .await
        .unwrap()
        .unwrap();

    let first = response.first().unwrap();
    assert_eq!(first.tid.as_deref(), Some("GF1"));
    assert_eq!(first.availability, 99.5);
    assert_eq!(response.from.as_deref(), Some("2025-11-05T00:00:00"));
}

#[tokio::test]
async fn test_empty_body_and_not_found_are_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/Customer/Performance/Current"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/Customer/MeanData/EnergyYield"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert!(client.get_current_performance().await.unwrap().is_none());
    assert!(client.get_mean_energy_yield().await.unwrap().is_none());
}

#[tokio::test]
async fn test_null_body_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/Customer/Performance/Current"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let response = client_for(&server).get_current_performance().await.unwrap();
    assert!(response.is_none());
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1.0/Customer/Performance/Current"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_current_performance()
        .await
        .unwrap_err();

    match err.downcast_ref::<EnergyCoopError>() {
        Some(EnergyCoopError::NetworkError(message)) => {
            assert!(message.contains("502"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
