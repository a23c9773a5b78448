//! HTTP-level tests for the OpenWeather provider and the IP position source,
//! run against a local wiremock server.

use std::sync::Arc;

use weather_card_core::{
    CityTable, Coordinates, FetchError, IpPosition, LocationError, OpenWeatherProvider,
    PositionOptions, PositionSource, RenderState, UnitPreference, WeatherCard, WeatherProvider,
    WeatherRequest,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_weather_json() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -99.13, "lat": 19.43 },
        "weather": [{ "id": 600, "main": "Snow", "description": "light snow", "icon": "13n" }],
        "main": {
            "temp": -1.6, "feels_like": -5.2, "temp_min": -3.0,
            "temp_max": 0.4, "pressure": 1020, "humidity": 91
        },
        "wind": { "speed": 4.1, "deg": 300 },
        "snow": { "1h": 2.5 },
        "sys": { "country": "MX" },
        "name": "Mexico City",
        "cod": 200
    })
}

#[tokio::test]
async fn sends_coordinates_key_and_units() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "19.43"))
        .and(query_param("lon", "-99.13"))
        .and(query_param("appid", "KEY"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather_json()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri());
    let snapshot = provider
        .current_weather(&WeatherRequest {
            coordinates: Coordinates::new(19.43, -99.13),
            units: UnitPreference::Imperial,
        })
        .await
        .unwrap();

    assert_eq!(snapshot.name.as_deref(), Some("Mexico City"));
    assert_eq!(snapshot.snow.unwrap().last_hour, Some(2.5));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
        )
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::new("BAD".into()).with_base_url(server.uri());
    let err = provider
        .current_weather(&WeatherRequest {
            coordinates: Coordinates::new(0.0, 0.0),
            units: UnitPreference::Metric,
        })
        .await
        .unwrap_err();

    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri());
    let err = provider
        .current_weather(&WeatherRequest {
            coordinates: Coordinates::new(0.0, 0.0),
            units: UnitPreference::Metric,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn card_toggle_issues_one_request_per_unit_system() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather_json()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_weather_json()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(OpenWeatherProvider::new("KEY".into()).with_base_url(server.uri()));
    let mut card = WeatherCard::new(
        provider,
        Arc::new(weather_card_core::FixedPosition::default()),
        CityTable::bundled().unwrap(),
    );

    card.set_search_input("Mexico City, MX");
    card.search_city().await.unwrap();
    card.toggle_units().await.unwrap();

    match card.render_state() {
        RenderState::Ready(view) => {
            assert_eq!(view.description.as_deref(), Some("Light snow"));
            assert_eq!(view.temperature, Some(-2));
            assert_eq!(view.temperature_symbol, "°F");
            assert_eq!(view.wind_speed, Some(4));
            assert_eq!(view.precipitation.kind.label(), "Snow");
        }
        other => panic!("unexpected state: {other:?}"),
    }
}

#[tokio::test]
async fn ip_position_reads_lat_lon() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success", "lat": 52.52, "lon": 13.41
        })))
        .mount(&server)
        .await;

    let source = IpPosition::with_url(format!("{}/json", server.uri()));
    let coords = source
        .current_position(&PositionOptions::default())
        .await
        .unwrap();

    assert_eq!(coords, Coordinates::new(52.52, 13.41));
}

#[tokio::test]
async fn ip_position_failure_status_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail", "message": "private range"
        })))
        .mount(&server)
        .await;

    let source = IpPosition::with_url(format!("{}/json", server.uri()));
    let err = source
        .current_position(&PositionOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LocationError::PositionUnavailable));
}

#[tokio::test]
async fn ip_position_forbidden_is_permission_denied() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let source = IpPosition::with_url(format!("{}/json", server.uri()));
    let err = source
        .current_position(&PositionOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LocationError::PermissionDenied));
}
