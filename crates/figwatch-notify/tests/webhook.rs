use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use figwatch_notify::{Notifier, OutboundAlert, WebhookNotifier};

fn sample_alert(alert_type: &str) -> OutboundAlert {
    OutboundAlert {
        id: 42,
        post_id: 7,
        alert_type: alert_type.to_string(),
        message: "High Priority: New post from Jerome Powell\nRates up....".to_string(),
    }
}

#[tokio::test]
async fn high_priority_alert_posts_high_priority_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/alerts"))
        .and(body_json(json!({
            "message": "High Priority: New post from Jerome Powell\nRates up....",
            "priority": "high",
            "data": { "alert_id": 42, "post_id": 7, "type": "high_priority" }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(format!("{}/hooks/alerts", server.uri())).unwrap();
    assert!(notifier.notify(&sample_alert("high_priority")).await);
}

#[tokio::test]
async fn other_alert_types_are_normal_priority() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "message": "High Priority: New post from Jerome Powell\nRates up....",
            "priority": "normal",
            "data": { "alert_id": 42, "post_id": 7, "type": "market_impact" }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(server.uri()).unwrap();
    assert!(notifier.notify(&sample_alert("market_impact")).await);
}

#[tokio::test]
async fn rejected_delivery_reports_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(server.uri()).unwrap();
    assert!(!notifier.notify(&sample_alert("high_priority")).await);
}

#[tokio::test]
async fn unreachable_endpoint_reports_false() {
    let server = MockServer::start().await;
    let url = server.uri();
    drop(server);

    let notifier = WebhookNotifier::new(url).unwrap();
    assert!(!notifier.notify(&sample_alert("high_priority")).await);
}
