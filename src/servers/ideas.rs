//! Idea-tracker server: CRUD tools proxied to the remote idea API, with
//! list and detail widgets bound to the read/write tools.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use crate::mcp::ToolAnnotations;
use crate::mcp::envelope::ToolReply;
use crate::mcp::error::ToolError;
use crate::mcp::registry::{ToolDefinition, ToolRegistry};
use crate::mcp::schema::{FieldSpec, InputSchema, ValidatedArgs};
use crate::mcp::server::McpServer;
use crate::mcp::widget::{WidgetCatalog, WidgetSpec};
use crate::providers::ideate::{Idea, IdeaPatch, IdeateApi};

pub const SERVER_NAME: &str = "ideate";

const WIDGETS: &[WidgetSpec] = &[
    WidgetSpec {
        identifier: "ideas-list",
        title: "Ideas List UI",
        template_uri: "ui://widget/ideas-list.html",
        invoking: "Loading ideas...",
        invoked: "Ideas loaded",
        asset: "ideas-list",
    },
    WidgetSpec {
        identifier: "idea-detail",
        title: "Idea Detail UI",
        template_uri: "ui://widget/idea-detail.html",
        invoking: "Loading idea details...",
        invoked: "Idea details loaded",
        asset: "idea-detail",
    },
];

const URGENCY_DESCRIPTION: &str =
    "Urgency level (1=Not Important, 2=Low, 3=Medium, 4=High, 5=Immediate)";

#[derive(Debug, Deserialize)]
struct CreateInput {
    title: String,
    description: String,
    urgency: i64,
}

#[derive(Debug, Deserialize)]
struct IdOnlyInput {
    idea_id: String,
}

#[derive(Debug, Deserialize)]
struct ListInput {
    #[serde(rename = "includeArchived")]
    include_archived: bool,
    #[serde(rename = "archivedOnly")]
    archived_only: bool,
}

#[derive(Debug, Deserialize)]
struct UpdateInput {
    idea_id: String,
    title: Option<String>,
    description: Option<String>,
    urgency: Option<i64>,
    archived: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct AddNoteInput {
    idea_id: String,
    note: String,
}

#[derive(Debug, Serialize)]
struct IdeaOutput {
    idea: Idea,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    ideas: Vec<Idea>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct AckOutput {
    success: bool,
    message: String,
}

fn id_only_schema(description: &str) -> InputSchema {
    InputSchema::new().field("idea_id", FieldSpec::string(description).required())
}

pub fn build(assets_dir: &Path, api: Arc<dyn IdeateApi>) -> Result<McpServer> {
    let widgets = WidgetCatalog::load(assets_dir, WIDGETS)?;
    let mut registry = ToolRegistry::new();

    let detail_widget = widgets.get("idea-detail").cloned();
    let list_widget = widgets.get("ideas-list").cloned();

    let handler_api = api.clone();
    registry.register(
        ToolDefinition {
            name: "create_idea",
            title: "Create Idea",
            description: "Create a new idea in Ideate",
            schema: InputSchema::new()
                .field(
                    "title",
                    FieldSpec::string("The title of the idea").required(),
                )
                .field(
                    "description",
                    FieldSpec::string("The description of the idea").required(),
                )
                .field(
                    "urgency",
                    FieldSpec::integer(URGENCY_DESCRIPTION)
                        .bounds(1, 5)
                        .default_value(json!(3)),
                ),
            widget: detail_widget.clone(),
            annotations: Some(ToolAnnotations::MUTATING),
        },
        move |args| {
            let api = handler_api.clone();
            async move { create_idea(api, args).await }
        },
    )?;

    let handler_api = api.clone();
    registry.register(
        ToolDefinition {
            name: "get_idea",
            title: "Get Idea",
            description: "Get a specific idea by ID",
            schema: id_only_schema("The ID of the idea to retrieve"),
            widget: detail_widget.clone(),
            annotations: Some(ToolAnnotations::READ_ONLY),
        },
        move |args| {
            let api = handler_api.clone();
            async move { get_idea(api, args).await }
        },
    )?;

    let handler_api = api.clone();
    registry.register(
        ToolDefinition {
            name: "list_ideas",
            title: "List Ideas",
            description: "List all ideas with optional filtering",
            schema: InputSchema::new()
                .field(
                    "includeArchived",
                    FieldSpec::boolean("Include archived ideas").default_value(json!(false)),
                )
                .field(
                    "archivedOnly",
                    FieldSpec::boolean("Return only archived ideas").default_value(json!(false)),
                ),
            widget: list_widget,
            annotations: Some(ToolAnnotations::READ_ONLY),
        },
        move |args| {
            let api = handler_api.clone();
            async move { list_ideas(api, args).await }
        },
    )?;

    let handler_api = api.clone();
    registry.register(
        ToolDefinition {
            name: "update_idea",
            title: "Update Idea",
            description: "Update an existing idea",
            schema: id_only_schema("The ID of the idea to update")
                .field("title", FieldSpec::string("New title for the idea"))
                .field(
                    "description",
                    FieldSpec::string("New description for the idea"),
                )
                .field(
                    "urgency",
                    FieldSpec::integer("New urgency level").bounds(1, 5),
                )
                .field("archived", FieldSpec::boolean("Archive status")),
            widget: detail_widget.clone(),
            annotations: Some(ToolAnnotations::MUTATING),
        },
        move |args| {
            let api = handler_api.clone();
            async move { update_idea(api, args).await }
        },
    )?;

    let handler_api = api.clone();
    registry.register(
        ToolDefinition {
            name: "add_note",
            title: "Add Note",
            description: "Append a note to an existing idea (convenience wrapper around \
                          update_idea)",
            schema: id_only_schema("The ID of the idea to append a note to")
                .field(
                    "note",
                    FieldSpec::string("The note text to append").required(),
                ),
            widget: detail_widget,
            annotations: Some(ToolAnnotations::MUTATING),
        },
        move |args| {
            let api = handler_api.clone();
            async move { add_note(api, args).await }
        },
    )?;

    let handler_api = api.clone();
    registry.register(
        ToolDefinition {
            name: "archive_idea",
            title: "Archive Idea",
            description: "Archive an idea",
            schema: id_only_schema("The ID of the idea to archive"),
            widget: None,
            annotations: Some(ToolAnnotations::MUTATING),
        },
        move |args| {
            let api = handler_api.clone();
            async move { archive_idea(api, args).await }
        },
    )?;

    let handler_api = api.clone();
    registry.register(
        ToolDefinition {
            name: "restore_idea",
            title: "Restore Idea",
            description: "Restore (unarchive) an idea",
            schema: id_only_schema("The ID of the idea to restore"),
            widget: None,
            annotations: Some(ToolAnnotations::MUTATING),
        },
        move |args| {
            let api = handler_api.clone();
            async move { restore_idea(api, args).await }
        },
    )?;

    registry.register(
        ToolDefinition {
            name: "delete_idea",
            title: "Delete Idea",
            description: "Delete an idea permanently",
            schema: id_only_schema("The ID of the idea to delete"),
            widget: None,
            annotations: Some(ToolAnnotations::DESTRUCTIVE),
        },
        move |args| {
            let api = api.clone();
            async move { delete_idea(api, args).await }
        },
    )?;

    Ok(McpServer::new(SERVER_NAME, registry, widgets))
}

async fn create_idea(api: Arc<dyn IdeateApi>, args: ValidatedArgs) -> Result<ToolReply, ToolError> {
    let input: CreateInput = args.parse()?;
    let idea = api
        .create_idea(&input.title, &input.description, input.urgency)
        .await?;

    let text = format!("Created new idea: **{}**", idea.title);
    let idea_id = idea.id.clone();
    Ok(
        ToolReply::new(text, serde_json::to_value(IdeaOutput { idea })?)
            .meta_entry("operation", json!("create"))
            .meta_entry("createdAt", json!(Utc::now().to_rfc3339()))
            .meta_entry("ideaId", json!(idea_id)),
    )
}

async fn get_idea(api: Arc<dyn IdeateApi>, args: ValidatedArgs) -> Result<ToolReply, ToolError> {
    let input: IdOnlyInput = args.parse()?;
    let idea = api.get_idea(&input.idea_id).await?;

    let status = if idea.archived { "Archived" } else { "Active" };
    let text = format!(
        "**{}**\n\n{}\n\nUrgency: {}/5 | {} | {} notes",
        idea.title,
        idea.description,
        idea.urgency,
        status,
        idea.notes.len()
    );
    let idea_id = idea.id.clone();
    Ok(
        ToolReply::new(text, serde_json::to_value(IdeaOutput { idea })?)
            .meta_entry("loadedAt", json!(Utc::now().to_rfc3339()))
            .meta_entry("ideaId", json!(idea_id)),
    )
}

async fn list_ideas(api: Arc<dyn IdeateApi>, args: ValidatedArgs) -> Result<ToolReply, ToolError> {
    let input: ListInput = args.parse()?;
    let ideas = api
        .list_ideas(input.include_archived, input.archived_only)
        .await?;

    let filter_text = if input.archived_only { "archived " } else { "" };
    let text = format!("Found {} {}ideas", ideas.len(), filter_text);
    let output = ListOutput {
        count: ideas.len(),
        ideas,
    };

    Ok(ToolReply::new(text, serde_json::to_value(output)?)
        .meta_entry(
            "filters",
            json!({
                "includeArchived": input.include_archived,
                "archivedOnly": input.archived_only,
            }),
        )
        .meta_entry("lastSyncedAt", json!(Utc::now().to_rfc3339())))
}

async fn update_idea(api: Arc<dyn IdeateApi>, args: ValidatedArgs) -> Result<ToolReply, ToolError> {
    let input: UpdateInput = args.parse()?;

    let mut changes = Vec::new();
    if input.title.is_some() {
        changes.push("title");
    }
    if input.description.is_some() {
        changes.push("description");
    }
    if input.urgency.is_some() {
        changes.push("urgency");
    }
    if let Some(archived) = input.archived {
        changes.push(if archived { "archived" } else { "restored" });
    }

    let patch = IdeaPatch {
        title: input.title,
        description: input.description,
        urgency: input.urgency,
        archived: input.archived,
        notes: None,
    };
    let idea = api.update_idea(&input.idea_id, &patch).await?;

    let changes_text = if changes.is_empty() {
        String::new()
    } else {
        format!(" ({})", changes.join(", "))
    };
    let text = format!("Updated **{}**{}", idea.title, changes_text);
    let idea_id = idea.id.clone();
    Ok(
        ToolReply::new(text, serde_json::to_value(IdeaOutput { idea })?)
            .meta_entry("operation", json!("update"))
            .meta_entry("updatedAt", json!(Utc::now().to_rfc3339()))
            .meta_entry("changes", json!(changes))
            .meta_entry("ideaId", json!(idea_id)),
    )
}

async fn add_note(api: Arc<dyn IdeateApi>, args: ValidatedArgs) -> Result<ToolReply, ToolError> {
    let input: AddNoteInput = args.parse()?;

    // The backend treats the notes array as entries to append.
    let patch = IdeaPatch {
        notes: Some(vec![input.note]),
        ..Default::default()
    };
    let idea = api.update_idea(&input.idea_id, &patch).await?;

    let text = format!("Added note to **{}**", idea.title);
    let idea_id = idea.id.clone();
    Ok(
        ToolReply::new(text, serde_json::to_value(IdeaOutput { idea })?)
            .meta_entry("operation", json!("add_note"))
            .meta_entry("addedAt", json!(Utc::now().to_rfc3339()))
            .meta_entry("ideaId", json!(idea_id)),
    )
}

async fn archive_idea(api: Arc<dyn IdeateApi>, args: ValidatedArgs) -> Result<ToolReply, ToolError> {
    let input: IdOnlyInput = args.parse()?;
    api.archive_idea(&input.idea_id).await?;

    let message = format!("Idea {} has been archived", input.idea_id);
    ack_reply(message, "archive", "archivedAt", &input.idea_id)
}

async fn restore_idea(api: Arc<dyn IdeateApi>, args: ValidatedArgs) -> Result<ToolReply, ToolError> {
    let input: IdOnlyInput = args.parse()?;
    api.restore_idea(&input.idea_id).await?;

    let message = format!("Idea {} has been restored", input.idea_id);
    ack_reply(message, "restore", "restoredAt", &input.idea_id)
}

async fn delete_idea(api: Arc<dyn IdeateApi>, args: ValidatedArgs) -> Result<ToolReply, ToolError> {
    let input: IdOnlyInput = args.parse()?;
    api.delete_idea(&input.idea_id).await?;

    let message = format!("Idea {} has been deleted", input.idea_id);
    ack_reply(message, "delete", "deletedAt", &input.idea_id)
}

fn ack_reply(
    message: String,
    operation: &str,
    timestamp_key: &str,
    idea_id: &str,
) -> Result<ToolReply, ToolError> {
    let output = AckOutput {
        success: true,
        message: message.clone(),
    };
    Ok(ToolReply::new(message, serde_json::to_value(output)?)
        .meta_entry("operation", json!(operation))
        .meta_entry(timestamp_key, json!(Utc::now().to_rfc3339()))
        .meta_entry("ideaId", json!(idea_id)))
}
