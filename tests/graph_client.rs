use serde_json::json;
use triplet::graph::{
    Bearer, CreateEntityInput, CreateStatementInput, GraphApi, GraphError, GraphQlClient,
    ObjectType, StatementInput,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, body_string_contains, header, method, path},
};

async fn client(server: &MockServer, default_token: Option<&str>) -> GraphQlClient {
    GraphQlClient::with_endpoint(&format!("{}/graphql", server.uri()), default_token).unwrap()
}

#[tokio::test]
async fn test_list_predicates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("predicates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"predicates": {"edges": [
                {"node": {"id": "p1", "name": "Is a", "objectType": "ENTITY"}},
                {"node": {"id": "p2", "name": "Website", "objectType": "ANY_URI"}},
                {"node": {"id": "p3", "name": "Mass", "objectType": "FLOAT"}}
            ]}}
        })))
        .mount(&server)
        .await;

    let predicates = client(&server, None)
        .await
        .list_predicates(&Bearer::anonymous())
        .await
        .unwrap();

    assert_eq!(predicates.len(), 3);
    assert_eq!(predicates[0].object_type, ObjectType::Entity);
    assert_eq!(
        predicates[2].object_type,
        ObjectType::Unknown("FLOAT".to_string())
    );
}

#[tokio::test]
async fn test_list_templates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"templates": {"edges": [
                {"node": {"id": "t1", "entityId": "e-company",
                          "entity": {"name": "Company", "description": "A business"}}}
            ]}}
        })))
        .mount(&server)
        .await;

    let templates = client(&server, None)
        .await
        .list_templates(&Bearer::anonymous())
        .await
        .unwrap();

    assert_eq!(templates[0].name, "Company");
    assert_eq!(templates[0].entity_id, "e-company");
}

#[tokio::test]
async fn test_search_sends_name_and_request_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer user-jwt"))
        .and(body_partial_json(json!({"variables": {"name": "Acme"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"entityByName": {"nodes": [{"id": "e1", "name": "Acme Corp"}]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server, Some("default-jwt"))
        .await
        .search_entities_by_name(&Bearer::new("user-jwt"), " Acme ")
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Acme Corp");
}

#[tokio::test]
async fn test_default_token_used_when_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer default-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"entityByName": null}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = client(&server, Some("default-jwt"))
        .await
        .search_entities_by_name(&Bearer::anonymous(), "Nobody")
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_read_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("predicates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "rate limited"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("templates"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = client(&server, None).await;
    let auth = Bearer::anonymous();

    match client.list_predicates(&auth).await {
        Err(GraphError::Query(message)) => assert_eq!(message, "rate limited"),
        other => panic!("Expected query error, got {other:?}"),
    }
    match client.list_templates(&auth).await {
        Err(GraphError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("Expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_entity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": {"input": {
                "name": "Acme Corp",
                "statements": [{"predicateId": "p1", "objectEntityId": "e-company",
                                "citationUrls": [], "qualifiers": []}]
            }}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"createEntity": {"entity": {"id": "e42"}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server, None)
        .await
        .create_entity(
            &Bearer::anonymous(),
            CreateEntityInput {
                name: "Acme Corp".to_string(),
                statements: vec![StatementInput::entity("p1", "e-company")],
            },
        )
        .await
        .unwrap();

    assert_eq!(created.id, "e42");
}

#[tokio::test]
async fn test_create_statement() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": {"input": {"subjectId": "e1", "predicateId": "p2",
                                    "objectValue": "https://acme.example"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"createStatement": {"statement": {"id": "s7", "subject": {"id": "e1"}}}}
        })))
        .mount(&server)
        .await;

    let created = client(&server, None)
        .await
        .create_statement(
            &Bearer::anonymous(),
            CreateStatementInput {
                subject_id: "e1".to_string(),
                statement: StatementInput::value("p2", "https://acme.example"),
            },
        )
        .await
        .unwrap();

    assert_eq!(created.id, "s7");
    assert_eq!(created.subject_id, "e1");
}

#[tokio::test]
async fn test_rejected_mutation_keeps_raw_body() {
    let raw = r#"{"data":{"createEntity":null},"errors":[{"message":"You must be logged in"}]}"#;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(raw)
                .insert_header("Content-Type", "application/json"),
        )
        .mount(&server)
        .await;

    let result = client(&server, None)
        .await
        .create_entity(
            &Bearer::anonymous(),
            CreateEntityInput {
                name: "Acme Corp".to_string(),
                statements: vec![StatementInput::value("p2", "https://acme.example")],
            },
        )
        .await;

    match result {
        Err(GraphError::Rejected { body }) => assert_eq!(body, raw),
        other => panic!("Expected rejection, got {other:?}"),
    }
}
