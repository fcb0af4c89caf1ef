//! The built-in fixes.
//!
//! Each fix captures the node handles it needs when the diagnostic is built,
//! then repairs the tree in place when applied. All of them tolerate being
//! applied to an already-repaired document.

use crate::error::Result;
use crate::fix::{expect_input, missing_input, DocumentModel, Fix, Prompt, Server};
use crate::tree::{NodeId, YamlTree};

/// Append an entry to the document's `servers` list. Interactive: asks for
/// the URL.
pub struct AppendServerFix {
    url: Option<String>,
}

impl AppendServerFix {
    pub fn new() -> Self {
        Self { url: None }
    }

    /// Pre-filled variant for non-interactive callers.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }
}

impl Default for AppendServerFix {
    fn default() -> Self {
        Self::new()
    }
}

impl Fix for AppendServerFix {
    fn description(&self) -> String {
        "Add a server to the document".to_string()
    }

    fn interactive(&self) -> bool {
        true
    }

    fn prompts(&self) -> Vec<Prompt> {
        vec![Prompt::free_text("Server URL")]
    }

    fn set_input(&mut self, input: &[String]) -> Result<()> {
        expect_input(self, input, 1)?;
        self.url = Some(input[0].clone());
        Ok(())
    }

    fn apply(&self, tree: &mut YamlTree) -> Result<()> {
        let url = self.url.as_deref().ok_or_else(|| missing_input(self))?;
        // an empty answer means the user declined; leave the document alone
        if url.is_empty() {
            return Ok(());
        }
        let root = tree.root();
        let servers = match tree.get(root, "servers") {
            Some(servers) => servers,
            None => {
                let servers = tree.new_sequence();
                tree.insert_entry(root, "servers", servers);
                servers
            }
        };
        let exists = tree
            .sequence_items(servers)
            .iter()
            .any(|&item| tree.get_str(item, "url") == Some(url));
        if exists {
            return Ok(());
        }
        let entry = tree.new_mapping();
        let url_node = tree.new_scalar(url);
        tree.insert_entry(entry, "url", url_node);
        tree.push_element(servers, entry);
        Ok(())
    }

    fn apply_model(&self, model: &mut DocumentModel) -> Result<()> {
        let url = self.url.as_deref().ok_or_else(|| missing_input(self))?;
        if url.is_empty() {
            return Ok(());
        }
        let DocumentModel::OpenApi(model) = model;
        if model.servers.iter().any(|s| s.url == url) {
            return Ok(());
        }
        model.servers.push(Server::new(url));
        Ok(())
    }
}

/// Add a response with a fixed status code and description to an operation.
pub struct AddResponseFix {
    operation: NodeId,
    status: String,
    description: String,
}

impl AddResponseFix {
    pub fn new(
        operation: NodeId,
        status: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            status: status.into(),
            description: description.into(),
        }
    }
}

impl Fix for AddResponseFix {
    fn description(&self) -> String {
        format!("Add a {} response to the operation", self.status)
    }

    fn apply(&self, tree: &mut YamlTree) -> Result<()> {
        let responses = match tree.get(self.operation, "responses") {
            Some(responses) => responses,
            None => {
                let responses = tree.new_mapping();
                tree.insert_entry(self.operation, "responses", responses);
                responses
            }
        };
        if tree.contains_key(responses, &self.status) {
            return Ok(());
        }
        let response = tree.new_mapping();
        let description = tree.new_scalar(self.description.as_str());
        tree.insert_entry(response, "description", description);
        tree.insert_entry(responses, &self.status, response);
        Ok(())
    }
}

/// Remove trailing slashes from a server URL scalar.
pub struct StripTrailingSlashFix {
    url_node: NodeId,
}

impl StripTrailingSlashFix {
    pub fn new(url_node: NodeId) -> Self {
        Self { url_node }
    }
}

impl Fix for StripTrailingSlashFix {
    fn description(&self) -> String {
        "Remove the trailing slash from the server URL".to_string()
    }

    fn apply(&self, tree: &mut YamlTree) -> Result<()> {
        let Some(url) = tree.scalar_str(self.url_node).map(str::to_string) else {
            return Ok(());
        };
        let trimmed = url.trim_end_matches('/');
        if trimmed.is_empty() || trimmed == url {
            return Ok(());
        }
        tree.set_scalar(self.url_node, trimmed);
        Ok(())
    }
}

/// Reorder the declared `tags` list alphabetically by name.
pub struct SortTagsFix {
    tags_node: NodeId,
}

impl SortTagsFix {
    pub fn new(tags_node: NodeId) -> Self {
        Self { tags_node }
    }
}

impl Fix for SortTagsFix {
    fn description(&self) -> String {
        "Sort the declared tags alphabetically".to_string()
    }

    fn apply(&self, tree: &mut YamlTree) -> Result<()> {
        let mut items: Vec<NodeId> = tree.sequence_items(self.tags_node).to_vec();
        items.sort_by_key(|&item| {
            tree.get_str(item, "name").unwrap_or_default().to_string()
        });
        tree.set_sequence_items(self.tags_node, items);
        Ok(())
    }
}

/// Set an operation's `operationId`. Interactive: asks for the id.
pub struct SetOperationIdFix {
    operation: NodeId,
    operation_id: Option<String>,
}

impl SetOperationIdFix {
    pub fn new(operation: NodeId) -> Self {
        Self {
            operation,
            operation_id: None,
        }
    }
}

impl Fix for SetOperationIdFix {
    fn description(&self) -> String {
        "Set an operation id".to_string()
    }

    fn interactive(&self) -> bool {
        true
    }

    fn prompts(&self) -> Vec<Prompt> {
        vec![Prompt::free_text("Operation id")]
    }

    fn set_input(&mut self, input: &[String]) -> Result<()> {
        expect_input(self, input, 1)?;
        self.operation_id = Some(input[0].clone());
        Ok(())
    }

    fn apply(&self, tree: &mut YamlTree) -> Result<()> {
        let id = self
            .operation_id
            .as_deref()
            .ok_or_else(|| missing_input(self))?;
        if id.is_empty() || tree.contains_key(self.operation, "operationId") {
            return Ok(());
        }
        let value = tree.new_scalar(id);
        tree.insert_entry(self.operation, "operationId", value);
        Ok(())
    }
}

/// Add a tag to an operation. Interactive: offers the document's declared
/// tags as choices, or free text when none are declared.
pub struct AddTagsFix {
    operation: NodeId,
    declared: Vec<String>,
    tag: Option<String>,
}

impl AddTagsFix {
    pub fn new(operation: NodeId, declared: Vec<String>) -> Self {
        Self {
            operation,
            declared,
            tag: None,
        }
    }
}

impl Fix for AddTagsFix {
    fn description(&self) -> String {
        "Add a tag to the operation".to_string()
    }

    fn interactive(&self) -> bool {
        true
    }

    fn prompts(&self) -> Vec<Prompt> {
        if self.declared.is_empty() {
            vec![Prompt::free_text("Tag name")]
        } else {
            vec![Prompt::choice("Tag to apply", self.declared.clone())]
        }
    }

    fn set_input(&mut self, input: &[String]) -> Result<()> {
        expect_input(self, input, 1)?;
        self.tag = Some(input[0].clone());
        Ok(())
    }

    fn apply(&self, tree: &mut YamlTree) -> Result<()> {
        let tag = self.tag.as_deref().ok_or_else(|| missing_input(self))?;
        if tag.is_empty() {
            return Ok(());
        }
        let tags = match tree.get(self.operation, "tags") {
            Some(tags) => tags,
            None => {
                let tags = tree.new_sequence();
                tree.insert_entry(self.operation, "tags", tags);
                tags
            }
        };
        let exists = tree
            .sequence_items(tags)
            .iter()
            .any(|&item| tree.scalar_str(item) == Some(tag));
        if exists {
            return Ok(());
        }
        let value = tree.new_scalar(tag);
        tree.push_element(tags, value);
        Ok(())
    }
}

/// Bound an open schema by adding `maxProperties`. Interactive: asks for the
/// limit.
pub struct SetMaxPropertiesFix {
    schema: NodeId,
    max: Option<u64>,
}

impl SetMaxPropertiesFix {
    pub fn new(schema: NodeId) -> Self {
        Self { schema, max: None }
    }
}

impl Fix for SetMaxPropertiesFix {
    fn description(&self) -> String {
        "Set maxProperties on the schema".to_string()
    }

    fn interactive(&self) -> bool {
        true
    }

    fn prompts(&self) -> Vec<Prompt> {
        vec![Prompt::free_text("Maximum number of properties")]
    }

    fn set_input(&mut self, input: &[String]) -> Result<()> {
        expect_input(self, input, 1)?;
        let max = input[0]
            .trim()
            .parse::<u64>()
            .map_err(|_| crate::error::OaslintError::FixApply {
                message: format!("'{}' is not a non-negative integer", input[0]),
            })?;
        self.max = Some(max);
        Ok(())
    }

    fn apply(&self, tree: &mut YamlTree) -> Result<()> {
        let max = self.max.ok_or_else(|| missing_input(self))?;
        if tree.contains_key(self.schema, "maxProperties") {
            return Ok(());
        }
        let value = tree.new_scalar(max.to_string());
        tree.insert_entry(self.schema, "maxProperties", value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OaslintError;
    use crate::tree::load;

    #[test]
    fn append_server_creates_list_and_is_idempotent() {
        let mut tree = load::parse("openapi: 3.0.3\npaths: {}\n").unwrap();
        let mut fix = AppendServerFix::new();
        fix.set_input(&["https://api.example.com".to_string()]).unwrap();
        fix.apply(&mut tree).unwrap();
        fix.apply(&mut tree).unwrap();
        let servers = tree.get(tree.root(), "servers").unwrap();
        assert_eq!(tree.sequence_items(servers).len(), 1);
    }

    #[test]
    fn append_server_without_input_fails() {
        let mut tree = load::parse("openapi: 3.0.3\n").unwrap();
        let fix = AppendServerFix::new();
        assert!(matches!(
            fix.apply(&mut tree),
            Err(OaslintError::FixApply { .. })
        ));
    }

    #[test]
    fn empty_answers_add_nothing() {
        let mut tree = load::parse("openapi: 3.0.3\npaths: {}\n").unwrap();
        let mut server = AppendServerFix::new();
        server.set_input(&[String::new()]).unwrap();
        server.apply(&mut tree).unwrap();
        assert!(tree.get(tree.root(), "servers").is_none());

        let mut op_id = SetOperationIdFix::new(tree.root());
        op_id.set_input(&[String::new()]).unwrap();
        op_id.apply(&mut tree).unwrap();
        assert!(tree.get(tree.root(), "operationId").is_none());

        let mut tag = AddTagsFix::new(tree.root(), Vec::new());
        tag.set_input(&[String::new()]).unwrap();
        tag.apply(&mut tree).unwrap();
        assert!(tree.get(tree.root(), "tags").is_none());
    }

    #[test]
    fn append_server_applies_to_model_too() {
        let mut model =
            DocumentModel::from_source("openapi: 3.0.3\npaths: {}\n").unwrap();
        let fix = AppendServerFix::with_url("https://api.example.com");
        fix.apply_model(&mut model).unwrap();
        fix.apply_model(&mut model).unwrap();
        let DocumentModel::OpenApi(model) = &model;
        assert_eq!(model.servers.len(), 1);
    }

    #[test]
    fn add_response_does_not_replace_existing_code() {
        let mut tree = load::parse(concat!(
            "responses:\n",
            "  \"401\":\n",
            "    description: original\n",
        ))
        .unwrap();
        let fix = AddResponseFix::new(tree.root(), "401", "Unauthorized");
        fix.apply(&mut tree).unwrap();
        let responses = tree.get(tree.root(), "responses").unwrap();
        let existing = tree.get(responses, "401").unwrap();
        assert_eq!(tree.get_str(existing, "description"), Some("original"));
    }

    #[test]
    fn add_response_creates_responses_mapping() {
        let mut tree = load::parse("operationId: listPets\n").unwrap();
        let fix = AddResponseFix::new(tree.root(), "401", "Unauthorized");
        fix.apply(&mut tree).unwrap();
        let responses = tree.get(tree.root(), "responses").unwrap();
        let added = tree.get(responses, "401").unwrap();
        assert_eq!(tree.get_str(added, "description"), Some("Unauthorized"));
    }

    #[test]
    fn strip_trailing_slash_leaves_clean_urls_alone() {
        let mut tree = load::parse("url: https://api.example.com/\n").unwrap();
        let url_node = tree.get(tree.root(), "url").unwrap();
        let fix = StripTrailingSlashFix::new(url_node);
        fix.apply(&mut tree).unwrap();
        assert_eq!(tree.scalar_str(url_node), Some("https://api.example.com"));
        fix.apply(&mut tree).unwrap();
        assert_eq!(tree.scalar_str(url_node), Some("https://api.example.com"));
    }

    #[test]
    fn sort_tags_orders_by_name() {
        let mut tree = load::parse(concat!(
            "tags:\n",
            "  - name: users\n",
            "  - name: auth\n",
        ))
        .unwrap();
        let tags = tree.get(tree.root(), "tags").unwrap();
        SortTagsFix::new(tags).apply(&mut tree).unwrap();
        let names: Vec<&str> = tree
            .sequence_items(tags)
            .to_vec()
            .into_iter()
            .map(|item| tree.get_str(item, "name").unwrap())
            .collect();
        assert_eq!(names, ["auth", "users"]);
    }

    #[test]
    fn set_operation_id_keeps_existing_value() {
        let mut tree = load::parse("operationId: original\n").unwrap();
        let mut fix = SetOperationIdFix::new(tree.root());
        fix.set_input(&["replacement".to_string()]).unwrap();
        fix.apply(&mut tree).unwrap();
        assert_eq!(tree.get_str(tree.root(), "operationId"), Some("original"));
    }

    #[test]
    fn add_tags_offers_declared_tags_as_choices() {
        let fix = AddTagsFix::new(
            crate::tree::YamlTree::new().root(),
            vec!["auth".to_string(), "users".to_string()],
        );
        let prompts = fix.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].kind, crate::fix::PromptKind::Choice);
        assert_eq!(prompts[0].choices, ["auth", "users"]);
    }

    #[test]
    fn add_tags_is_idempotent() {
        let mut tree = load::parse("tags:\n  - users\n").unwrap();
        let mut fix = AddTagsFix::new(tree.root(), vec!["users".to_string()]);
        fix.set_input(&["users".to_string()]).unwrap();
        fix.apply(&mut tree).unwrap();
        let tags = tree.get(tree.root(), "tags").unwrap();
        assert_eq!(tree.sequence_items(tags).len(), 1);
    }

    #[test]
    fn wrong_answer_count_is_an_input_error() {
        let mut fix = AddTagsFix::new(crate::tree::YamlTree::new().root(), Vec::new());
        let err = fix
            .set_input(&["a".to_string(), "b".to_string()])
            .unwrap_err();
        assert!(matches!(
            err,
            OaslintError::FixInput {
                expected: 1,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn max_properties_rejects_non_numeric_input() {
        let mut fix = SetMaxPropertiesFix::new(crate::tree::YamlTree::new().root());
        assert!(fix.set_input(&["many".to_string()]).is_err());
        assert!(fix.set_input(&["16".to_string()]).is_ok());
    }

    #[test]
    fn max_properties_inserts_once() {
        let mut tree = load::parse("type: object\nadditionalProperties: true\n").unwrap();
        let mut fix = SetMaxPropertiesFix::new(tree.root());
        fix.set_input(&["16".to_string()]).unwrap();
        fix.apply(&mut tree).unwrap();
        fix.apply(&mut tree).unwrap();
        assert_eq!(tree.get_str(tree.root(), "maxProperties"), Some("16"));
    }
}
