//! Integration tests for name-filtered lookups using wiremock

use halctl::api::{ApiError, ClientSettings, Credentials, HalClient};
use halctl::resource::{
    find_by_name, find_unique_by_name, get_href, list_filtered, LinkedResource, ParentLink,
    ENVIRONMENTS, GROUPS,
};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HalClient {
    let settings = ClientSettings::new(
        Url::parse(&server.uri()).unwrap(),
        Credentials::new("admin", "secret"),
    );
    HalClient::new(settings).unwrap()
}

fn group(id: &str, name: &str, extra: Value) -> Value {
    let mut item = json!({
        "_links": {
            "self": {"href": format!("/api/v3/cmp/groups/{}/", id), "title": name},
            "parent": {}
        },
        "name": name,
        "id": id
    });
    if let (Some(obj), Some(extra)) = (item.as_object_mut(), extra.as_object()) {
        obj.extend(extra.clone());
    }
    item
}

fn groups_page(items: Vec<Value>) -> Value {
    json!({
        "_links": {"self": {"href": "/api/v3/cmp/groups/", "title": "List Groups"}},
        "total": items.len(),
        "count": items.len(),
        "_embedded": {"groups": items}
    })
}

mod find_by_name_tests {
    use super::*;

    /// An empty embedded list is a not-found error, never an empty success
    #[tokio::test]
    async fn test_empty_result_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/cmp/groups/"))
            .and(query_param("filter", "name:ops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(groups_page(vec![])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = find_by_name::<LinkedResource>(&client, &GROUPS, "ops")
            .await
            .unwrap_err();

        match &err {
            ApiError::NotFound { kind, name } => {
                assert_eq!(kind, "Group");
                assert_eq!(name, "ops");
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("permission"));
    }

    /// Two matches: index 0 is returned regardless of its contents
    #[tokio::test]
    async fn test_first_match_wins() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/cmp/groups/"))
            .and(query_param("filter", "name:ops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(groups_page(vec![
                group("GRP-2", "ops", json!({"description": "second in id order"})),
                group("GRP-1", "ops", json!({})),
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let found: LinkedResource = find_by_name(&client, &GROUPS, "ops").await.unwrap();

        assert_eq!(found.id.as_deref(), Some("GRP-2"));
        assert_eq!(found.href(), "/api/v3/cmp/groups/GRP-2/");
        assert_eq!(found.links.parent, ParentLink::Root);
        assert_eq!(found.fields["description"], "second in id order");
    }

    /// The strict variant refuses to pick among several matches
    #[tokio::test]
    async fn test_strict_lookup_rejects_ambiguity() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/cmp/groups/"))
            .and(query_param("filter", "name:ops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(groups_page(vec![
                group("GRP-2", "ops", json!({})),
                group("GRP-1", "ops", json!({})),
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = find_unique_by_name::<LinkedResource>(&client, &GROUPS, "ops")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Ambiguous { count: 2, .. }));
    }

    /// The strict variant returns a single match
    #[tokio::test]
    async fn test_strict_lookup_single_match() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/cmp/groups/"))
            .and(query_param("filter", "name:ops"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(groups_page(vec![group("GRP-1", "ops", json!({}))])),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let found: LinkedResource = find_unique_by_name(&client, &GROUPS, "ops").await.unwrap();
        assert_eq!(found.name, "ops");
    }

    /// Two identical lookups return identical results
    #[tokio::test]
    async fn test_repeated_lookup_is_identical() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/cmp/groups/"))
            .and(query_param("filter", "name:ops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(groups_page(vec![group(
                "GRP-1",
                "ops",
                json!({"rate": 3}),
            )])))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first: LinkedResource = find_by_name(&client, &GROUPS, "ops").await.unwrap();
        let second: LinkedResource = find_by_name(&client, &GROUPS, "ops").await.unwrap();

        assert_eq!(first, second);
    }

    /// Names are percent-encoded in the filter parameter
    #[tokio::test]
    async fn test_name_with_spaces_is_encoded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/cmp/groups/"))
            .and(query_param("filter", "name:the group"))
            .respond_with(ResponseTemplate::new(200).set_body_json(groups_page(vec![group(
                "GRP-1",
                "the group",
                json!({}),
            )])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let found: LinkedResource = find_by_name(&client, &GROUPS, "the group").await.unwrap();
        assert_eq!(found.name, "the group");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("filter=name:the%20group"));
    }

    /// The wrapper key follows the kind
    #[tokio::test]
    async fn test_kind_wrapper_key() {
        #[derive(Debug, Deserialize)]
        struct Environment {
            name: String,
            #[serde(rename = "resourceHandler")]
            resource_handler: String,
        }

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/cmp/environments/"))
            .and(query_param("filter", "name:aws-east"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "count": 1,
                "_embedded": {"environments": [
                    {
                        "_links": {"self": {"href": "/api/v3/cmp/environments/ENV-1/", "title": "aws-east"}},
                        "name": "aws-east",
                        "resourceHandler": "AWS"
                    }
                ]}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let env: Environment = find_by_name(&client, &ENVIRONMENTS, "aws-east").await.unwrap();
        assert_eq!(env.name, "aws-east");
        assert_eq!(env.resource_handler, "AWS");
    }

    /// Lookups go through the reauthenticating executor
    #[tokio::test]
    async fn test_lookup_reauthenticates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/cmp/groups/"))
            .and(bearer_token("fresh-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(groups_page(vec![group("GRP-1", "ops", json!({}))])),
            )
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v3/cmp/groups/"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v3/cmp/apiToken/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh-token"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let found: LinkedResource = find_by_name(&client, &GROUPS, "ops").await.unwrap();
        assert_eq!(found.name, "ops");
    }
}

mod collection_tests {
    use super::*;

    /// Totals are reported even when only the first page is returned
    #[tokio::test]
    async fn test_list_reports_total_and_count() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/cmp/groups/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 120,
                "count": 2,
                "_embedded": {"groups": [
                    group("GRP-1", "a", json!({})),
                    group("GRP-2", "b", json!({}))
                ]}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let page = list_filtered::<LinkedResource>(&client, &GROUPS, None)
            .await
            .unwrap();

        assert_eq!(page.total, 120);
        assert_eq!(page.count, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].name, "b");
    }

    /// Resources can be fetched directly by their self href
    #[tokio::test]
    async fn test_get_by_href() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/cmp/groups/GRP-1/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(group("GRP-1", "ops", json!({}))))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let found: LinkedResource = get_href(&client, "/api/v3/cmp/groups/GRP-1/").await.unwrap();
        assert_eq!(found.id.as_deref(), Some("GRP-1"));
    }

    /// Server errors during a lookup are not reported as not-found
    #[tokio::test]
    async fn test_server_error_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/cmp/groups/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = find_by_name::<LinkedResource>(&client, &GROUPS, "ops")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Server { .. }));
        assert!(!err.is_not_found());
    }
}
