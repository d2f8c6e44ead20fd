//! Command mapping over HTTP: both calling conventions, guards and failure policy.

use crate::integration::mock_server::{
    function_call_response, tool_call_response, MockServerFixture, CHAT_PATH,
};
use serde_json::json;
use voxcode::{CommandArgs, CommandMapping, EditorCommand, Transcription};

#[tokio::test]
async fn test_open_config_file_scenario() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_chat_for(
            "open the config file",
            json!({
                "model": "gpt-3.5-turbo-0613",
                "temperature": 0.2,
                "function_call": {"name": "executeCommand"}
            }),
            function_call_response(
                r#"{"command":"workbench.action.quickOpen","args":{"filename":"config"}}"#,
            ),
        )
        .await;
    let (mapper, _, notices) = fixture.mapper();

    let mapping = mapper
        .map(&Transcription::from_text("open the config file"))
        .await;

    mock.assert_async().await;
    assert_eq!(
        mapping,
        Some(CommandMapping {
            command: EditorCommand::QuickOpen,
            args: Some(CommandArgs::filename("config")),
        })
    );
    assert!(notices.is_empty());
}

#[tokio::test]
async fn test_save_scenario_has_no_args() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_chat(function_call_response(
            r#"{"command":"workbench.action.files.save"}"#,
        ))
        .await;
    let (mapper, _, _) = fixture.mapper();

    let mapping = mapper.map(&Transcription::from_text("save")).await.unwrap();
    assert_eq!(mapping.command.id(), "workbench.action.files.save");
    assert_eq!(mapping.args, None);
    assert_eq!(
        serde_json::to_value(&mapping).unwrap(),
        json!({"command": "workbench.action.files.save"})
    );
}

#[tokio::test]
async fn test_short_text_issues_no_request() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_chat_unreachable().await;
    let (mapper, _, notices) = fixture.mapper();

    for text in ["", "x", "no"] {
        assert_eq!(mapper.map(&Transcription::from_text(text)).await, None);
        assert_eq!(mapper.map_via_tools(&Transcription::from_text(text)).await, None);
    }

    mock.assert_async().await;
    assert!(notices.is_empty());
}

#[tokio::test]
async fn test_reply_without_function_call_is_absent() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_chat(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "I can't help with that."}}]
        }))
        .await;
    let (mapper, host, notices) = fixture.mapper();

    assert_eq!(
        mapper.map(&Transcription::from_text("sing me a song")).await,
        None
    );
    assert!(notices.is_empty());
    assert!(host.invocations().is_empty());
}

#[tokio::test]
async fn test_malformed_arguments_notify_exactly_once() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_chat(function_call_response(r#"{"command": "workbench.action"#))
        .await;
    let (mapper, _, notices) = fixture.mapper();

    assert_eq!(
        mapper.map(&Transcription::from_text("open main file")).await,
        None
    );
    assert_eq!(notices.len(), 1);
    assert_eq!(notices.errors().len(), 1);
}

#[tokio::test]
async fn test_out_of_set_command_is_rejected() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_chat(function_call_response(
            r#"{"command":"workbench.action.terminal.new"}"#,
        ))
        .await;
    let (mapper, host, notices) = fixture.mapper();

    let mapping = mapper
        .map(&Transcription::from_text("open a new terminal"))
        .await;
    assert_eq!(mapping, None);
    assert!(host.invocations().is_empty());
    assert!(notices.errors()[0].message.contains("workbench.action.terminal.new"));
}

#[tokio::test]
async fn test_http_error_degrades_to_absent() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error(
            CHAT_PATH,
            429,
            r#"{"error":{"message":"Rate limit exceeded","type":"rate_limit_error"}}"#,
        )
        .await;
    let (mapper, _, notices) = fixture.mapper();

    assert_eq!(
        mapper.map(&Transcription::from_text("close this editor")).await,
        None
    );
    let errors = notices.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("Rate limit exceeded"));
}

#[tokio::test]
async fn test_tools_protocol_maps_each_tool_name() {
    let table = [
        ("quickOpen", "workbench.action.quickOpen"),
        ("newFile", "workbench.action.files.newUntitledFile"),
        ("saveFile", "workbench.action.files.save"),
        ("closeEditor", "workbench.action.closeActiveEditor"),
        ("findInFiles", "workbench.action.findInFiles"),
        ("findReferences", "references-view.findReferences"),
    ];

    for (tool, host_id) in table {
        let mut fixture = MockServerFixture::new().await;
        let mock = fixture
            .mock_chat_for(
                "do the thing",
                json!({"tool_choice": "required", "temperature": 0.2}),
                tool_call_response(tool, "{}"),
            )
            .await;
        let (mapper, _, _) = fixture.mapper();

        let mapping = mapper
            .map_via_tools(&Transcription::from_text("do the thing"))
            .await
            .unwrap_or_else(|| panic!("no mapping for tool {}", tool));
        mock.assert_async().await;
        assert_eq!(mapping.command.id(), host_id);
    }
}

#[tokio::test]
async fn test_tools_protocol_normalizes_argument_shape() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_chat(tool_call_response(
            "findInFiles",
            r#"{"searchTerm":"fetchUser"}"#,
        ))
        .await;
    let (mapper, host, _) = fixture.mapper();

    let mapping = mapper
        .map_via_tools(&Transcription::from_text("search for fetch user"))
        .await
        .unwrap();
    assert_eq!(mapping.args, Some(CommandArgs::filename("fetchUser")));

    mapper.execute(&mapping).await;
    let calls = host.invocations();
    assert_eq!(calls[0].command, "workbench.action.findInFiles");
    assert_eq!(calls[0].args, Some(json!({"filename": "fetchUser"})));
}

#[tokio::test]
async fn test_unknown_tool_is_absent() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_chat(tool_call_response("formatDocument", "{}"))
        .await;
    let (mapper, _, notices) = fixture.mapper();

    assert_eq!(
        mapper
            .map_via_tools(&Transcription::from_text("format this document"))
            .await,
        None
    );
    assert_eq!(notices.errors().len(), 1);
}
