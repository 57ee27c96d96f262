use crate::canvas::BlockInstance;
use crate::registry::BlockCategory;
use serde::Serialize;

/// Which side-panel form a block is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Start,
    Agent,
    Output,
}

impl From<BlockCategory> for FormKind {
    fn from(category: BlockCategory) -> Self {
        match category {
            BlockCategory::Start => FormKind::Start,
            BlockCategory::Agent => FormKind::Agent,
            BlockCategory::Output | BlockCategory::Tool => FormKind::Output,
        }
    }
}

impl FormKind {
    pub fn of(block: &BlockInstance) -> Self {
        block.category.into()
    }
}

/// How a field is rendered. No variant carries validation rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    TextArea,
    Email,
    Select { options: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FormField {
    pub fn new(key: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
        }
    }

    fn select(key: &str, label: &str, options: &[&str]) -> Self {
        Self::new(
            key,
            label,
            FieldKind::Select {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        )
    }

    pub fn placeholder(&self) -> String {
        if self.key == "apiKey" {
            "Enter API key".to_string()
        } else {
            format!("Enter {}", self.label.to_lowercase())
        }
    }

    /// Secrets are typed into a masked input.
    pub fn is_masked(&self) -> bool {
        self.key == "apiKey"
    }
}

/// Fields either form one list, or are grouped under sub-tabs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormLayout {
    Fields(Vec<FormField>),
    Tabs(Vec<(String, Vec<FormField>)>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    pub kind: FormKind,
    pub title: String,
    pub layout: FormLayout,
}

impl FormSchema {
    pub fn for_kind(kind: FormKind) -> Self {
        match kind {
            FormKind::Start => Self::start(),
            FormKind::Agent => Self::agent(),
            FormKind::Output => Self::output(),
        }
    }

    fn start() -> Self {
        Self {
            kind: FormKind::Start,
            title: "Start Block".to_string(),
            layout: FormLayout::Fields(vec![
                FormField::new("links", "Links", FieldKind::Text),
                FormField::new("documents", "Documents", FieldKind::Text),
                FormField::new("integration", "Integration", FieldKind::Text),
                FormField::new("api", "API", FieldKind::Text),
            ]),
        }
    }

    fn agent() -> Self {
        Self {
            kind: FormKind::Agent,
            title: "Agent Block".to_string(),
            layout: FormLayout::Fields(vec![
                FormField::new("nodeId", "Node ID", FieldKind::Text),
                FormField::new("nodeType", "Node Type", FieldKind::Text),
                FormField::new("systemPrompt", "System Prompt", FieldKind::TextArea),
                FormField::new("description", "Description", FieldKind::TextArea),
                FormField::new("apiKey", "API Key", FieldKind::Text),
                FormField::new("prompt", "Prompt", FieldKind::TextArea),
            ]),
        }
    }

    fn output() -> Self {
        let tabs = vec![
            (
                "Send Email".to_string(),
                vec![
                    FormField::new("emailAddress", "Email Address", FieldKind::Email),
                    FormField::new("subjectLine", "Subject Line", FieldKind::Text),
                    FormField::new("emailBody", "Body", FieldKind::TextArea),
                ],
            ),
            (
                "Create Report".to_string(),
                vec![
                    FormField::select("reportType", "Report Type", &["PDF", "Excel", "CSV"]),
                    FormField::select(
                        "exportFormat",
                        "Export Format",
                        &["PDF", "XLSX", "CSV", "JSON"],
                    ),
                ],
            ),
            (
                "Update Database".to_string(),
                vec![
                    FormField::select(
                        "targetDatabase",
                        "Target Database",
                        &["MySQL", "PostgreSQL", "MongoDB"],
                    ),
                    FormField::new("mapping", "Mapping", FieldKind::TextArea),
                ],
            ),
            (
                "Create Ticket".to_string(),
                vec![
                    FormField::select(
                        "targetSystem",
                        "Target System",
                        &["Jira", "ServiceNow", "Zendesk"],
                    ),
                    FormField::new("ticketTitle", "Ticket Title", FieldKind::Text),
                    FormField::new("ticketBody", "Ticket Body", FieldKind::TextArea),
                    FormField::select(
                        "priority",
                        "Priority",
                        &["Low", "Medium", "High", "Critical"],
                    ),
                    FormField::new("assignee", "Assignee", FieldKind::Text),
                ],
            ),
        ];
        Self {
            kind: FormKind::Output,
            title: "Output Block".to_string(),
            layout: FormLayout::Tabs(tabs),
        }
    }

    pub fn tabs(&self) -> Vec<&str> {
        match &self.layout {
            FormLayout::Fields(_) => Vec::new(),
            FormLayout::Tabs(tabs) => tabs.iter().map(|(name, _)| name.as_str()).collect(),
        }
    }

    pub fn default_tab(&self) -> Option<&str> {
        self.tabs().into_iter().next()
    }

    /// The fields shown for `tab`. Untabbed forms ignore the tab.
    pub fn fields(&self, tab: Option<&str>) -> &[FormField] {
        match &self.layout {
            FormLayout::Fields(fields) => fields,
            FormLayout::Tabs(tabs) => tab
                .and_then(|wanted| tabs.iter().find(|(name, _)| name == wanted))
                .map(|(_, fields)| fields.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Start blocks let the user append their own free-text fields.
    pub fn accepts_extra_fields(&self) -> bool {
        self.kind == FormKind::Start
    }
}
