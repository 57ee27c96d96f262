//! Tests for form schemas, form sessions and the deployment descriptor.
mod common;
use common::{fixed_canvas, place_at};
use glassbox::canvas::BlockId;
use glassbox::configure::{
    AUTOSAVE_DELAY_MS, ConfigurationStore, Debounce, DeploymentDescriptor, FieldKind, FormKind,
    FormSchema, FormSession, FormValues, NodeConfiguration, deploy_path,
};
use serde_json::json;

fn block_id() -> BlockId {
    BlockId::from("agent-1700000123456")
}

#[test]
fn test_descriptor_defaults() {
    let descriptor = DeploymentDescriptor::for_agent(&FormValues::new(), &block_id());
    let json = descriptor.to_json();

    assert_eq!(
        json,
        json!({
            "NodeConfiguration": [
                {
                    "type": "GET",
                    "workflowId": "wf_123456",
                    "nodeId": "get_code_documentation",
                    "description": "\"\"\"Data retrieval for public code documentation\"\"\"",
                    "url": "https://raw.githubusercontent.com/facebook/react/main/README.md",
                    "authToken": "",
                    "parameters": [],
                    "searchParams": {}
                },
                {
                    "type": "DecisionText",
                    "workflowId": "wf_123456",
                    "nodeId": "scraper",
                    "systemPrompt": "You are a Senior Software Engineer.",
                    "description": "\"\"\"Analyze raw github code documentation\"\"\"",
                    "model": "gemini-2.0-flash",
                    "apiKey": "apiKey",
                    "prompt": "Analyze public code documentation and return a report of it.",
                    "functionList": ["get_code_documentation", "retrieve_memories"]
                }
            ]
        })
    );
}

#[test]
fn test_descriptor_uses_form_values() {
    let values = FormValues::new()
        .with("nodeId", "reviewer")
        .with("nodeType", "Summarizer")
        .with("description", "release notes")
        .with("apiKey", "sk-test")
        .with("prompt", "Summarize the changes.")
        .with("systemPrompt", "");
    let descriptor = DeploymentDescriptor::for_agent(&values, &block_id());

    let NodeConfiguration::Retrieval(retrieval) = &descriptor.node_configuration[0] else {
        panic!("first node should be the retrieval node");
    };
    assert_eq!(retrieval.description, "\"\"\"Data retrieval for release notes\"\"\"");

    let NodeConfiguration::Agent(agent) = &descriptor.node_configuration[1] else {
        panic!("second node should be the agent node");
    };
    assert_eq!(agent.node_id, "reviewer");
    assert_eq!(agent.node_type, "Summarizer");
    assert_eq!(agent.description, "release notes");
    assert_eq!(agent.api_key, "sk-test");
    assert_eq!(agent.prompt, "Summarize the changes.");
    assert_eq!(
        agent.system_prompt, "You are a Senior Software Engineer.",
        "an empty value falls back to the default"
    );
}

#[test]
fn test_descriptor_is_byte_identical_for_identical_input() {
    let values: FormValues = [("prompt", "Go"), ("nodeId", "n1"), ("apiKey", "k")]
        .into_iter()
        .collect();
    let first = DeploymentDescriptor::for_agent(&values, &block_id()).to_json_string();
    let second = DeploymentDescriptor::for_agent(&values.clone(), &block_id()).to_json_string();

    assert_eq!(first.as_bytes(), second.as_bytes());
    assert!(first.starts_with("{\"NodeConfiguration\":[{\"type\":\"GET\",\"workflowId\""));
}

#[test]
fn test_short_id_handles_short_block_ids() {
    let descriptor = DeploymentDescriptor::for_agent(&FormValues::new(), &BlockId::from("a-1"));
    assert_eq!(descriptor.to_json()["NodeConfiguration"][1]["workflowId"], "wf_a-1");
}

#[test]
fn test_deploy_path_prefers_node_id() {
    let id = block_id();
    assert_eq!(
        deploy_path(&FormValues::new().with("nodeId", "scraper"), Some(&id)),
        "service/scraper.py"
    );
    assert_eq!(
        deploy_path(&FormValues::new(), Some(&id)),
        "service/agent-1700000123456.py"
    );
    assert_eq!(deploy_path(&FormValues::new(), None), "service/agent.py");
}

#[test]
fn test_form_kind_follows_category() {
    let mut canvas = fixed_canvas();
    let cases = [
        ("connect", FormKind::Start),
        ("agent", FormKind::Agent),
        ("send-email", FormKind::Output),
        ("web-search", FormKind::Output),
        ("code-interpreter", FormKind::Output),
    ];
    for (template_id, expected) in cases {
        let id = place_at(&mut canvas, template_id, 0.0, 0.0);
        let block = canvas.block(&id).unwrap();
        assert_eq!(FormKind::of(block), expected, "template {}", template_id);
    }
}

#[test]
fn test_agent_schema_fields() {
    let schema = FormSchema::for_kind(FormKind::Agent);
    let keys: Vec<&str> = schema.fields(None).iter().map(|f| f.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["nodeId", "nodeType", "systemPrompt", "description", "apiKey", "prompt"]
    );

    let api_key = &schema.fields(None)[4];
    assert!(api_key.is_masked());
    assert_eq!(api_key.placeholder(), "Enter API key");
    assert_eq!(schema.fields(None)[2].kind, FieldKind::TextArea);
    assert_eq!(schema.fields(None)[0].placeholder(), "Enter node id");
    assert!(schema.tabs().is_empty());
}

#[test]
fn test_output_schema_tabs() {
    let schema = FormSchema::for_kind(FormKind::Output);
    assert_eq!(
        schema.tabs(),
        vec!["Send Email", "Create Report", "Update Database", "Create Ticket"]
    );
    assert_eq!(schema.default_tab(), Some("Send Email"));
    assert_eq!(schema.fields(Some("Send Email"))[0].kind, FieldKind::Email);

    let ticket = schema.fields(Some("Create Ticket"));
    assert_eq!(ticket.len(), 5);
    assert_eq!(
        ticket[3].kind,
        FieldKind::Select {
            options: vec![
                "Low".to_string(),
                "Medium".to_string(),
                "High".to_string(),
                "Critical".to_string()
            ]
        }
    );
    assert!(schema.fields(Some("Nope")).is_empty());
}

#[test]
fn test_start_schema_accepts_extra_fields() {
    let schema = FormSchema::for_kind(FormKind::Start);
    let labels: Vec<&str> = schema.fields(None).iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["Links", "Documents", "Integration", "API"]);
    assert!(schema.accepts_extra_fields());
    assert!(!FormSchema::for_kind(FormKind::Agent).accepts_extra_fields());
}

#[test]
fn test_form_values_treat_empty_as_unset() {
    let values = FormValues::new().with("nodeId", "").with("prompt", "hi");
    assert_eq!(values.get("nodeId"), None);
    assert_eq!(values.display("nodeId"), "");
    assert_eq!(values.get_or("nodeId", "scraper"), "scraper");
    assert_eq!(values.get("prompt"), Some("hi"));
    assert_eq!(values.len(), 2);
}

#[test]
fn test_debounce_fires_once_after_quiet_period() {
    let mut debounce = Debounce::new(AUTOSAVE_DELAY_MS);
    assert!(!debounce.fire(5_000));

    debounce.touch(1_000);
    debounce.touch(1_500);
    assert!(!debounce.fire(2_000), "the second edit restarted the wait");
    assert!(debounce.fire(2_500));
    assert!(!debounce.fire(9_000));
    assert!(!debounce.is_pending());
}

#[test]
fn test_agent_session_autosaves_into_store() {
    let mut canvas = fixed_canvas();
    let id = place_at(&mut canvas, "agent", 0.0, 0.0);
    let mut store = ConfigurationStore::new();
    let mut session = FormSession::open(canvas.block(&id).unwrap(), &store);

    session.set_value("nodeId", "writer", 10_000);
    assert!(!session.poll_autosave(10_500, &mut store));
    assert!(store.is_empty());
    assert!(session.poll_autosave(11_000, &mut store));

    let saved = store.get(&id).expect("saved after the quiet period");
    assert_eq!(saved.values.get("nodeId"), Some("writer"));
    assert_eq!(saved.saved_at, 11_000);
    assert_eq!(saved.descriptor, session.descriptor().unwrap());
    assert_eq!(session.deploy_path(), "service/writer.py");

    // Reopening resumes from the saved values.
    let reopened = FormSession::open(canvas.block(&id).unwrap(), &store);
    assert_eq!(reopened.values().get("nodeId"), Some("writer"));
}

#[test]
fn test_non_agent_sessions_do_not_save() {
    let mut canvas = fixed_canvas();
    let id = place_at(&mut canvas, "send-email", 0.0, 0.0);
    let mut store = ConfigurationStore::new();
    let mut session = FormSession::open(canvas.block(&id).unwrap(), &store);

    assert_eq!(session.active_tab(), Some("Send Email"));
    assert!(session.select_tab("Create Ticket"));
    assert!(!session.select_tab("Missing"));
    assert_eq!(session.fields().len(), 5);

    session.set_value("ticketTitle", "Outage", 0);
    assert!(!session.poll_autosave(5_000, &mut store));
    assert!(!session.save(5_000, &mut store));
    assert!(session.descriptor().is_none());
    assert!(store.is_empty());
}

#[test]
fn test_start_session_extra_fields() {
    let mut canvas = fixed_canvas();
    let id = place_at(&mut canvas, "connect", 0.0, 0.0);
    let store = ConfigurationStore::new();
    let mut session = FormSession::open(canvas.block(&id).unwrap(), &store);

    let first = session.add_extra_field().unwrap().key.clone();
    let second = session.add_extra_field().unwrap().key.clone();
    assert_eq!((first.as_str(), second.as_str()), ("extra_0", "extra_1"));

    assert!(session.rename_extra_field(1, "Webhook"));
    assert!(!session.rename_extra_field(7, "Nope"));
    session.set_value("extra_0", "https://example.com", 0);

    let removed = session.remove_extra_field(0).unwrap();
    assert_eq!(removed.key, "extra_0");
    assert_eq!(session.values().get("extra_0"), None);
    assert_eq!(session.extra_fields().len(), 1);
    assert_eq!(session.extra_fields()[0].label, "Webhook");

    // Keys are never reused after a removal.
    assert_eq!(session.add_extra_field().unwrap().key, "extra_2");
}

#[test]
fn test_extra_fields_only_on_start_forms() {
    let mut canvas = fixed_canvas();
    let id = place_at(&mut canvas, "agent", 0.0, 0.0);
    let mut session = FormSession::open(canvas.block(&id).unwrap(), &ConfigurationStore::new());
    assert!(session.add_extra_field().is_none());
}
