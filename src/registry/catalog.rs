use super::template::{BlockCategory, BlockTemplate};

/// The static block palette.
#[derive(Debug, Clone)]
pub struct Registry {
    templates: Vec<BlockTemplate>,
}

impl Registry {
    pub fn new(templates: Vec<BlockTemplate>) -> Self {
        Self { templates }
    }

    /// The blocks offered by the builder sidebar.
    pub fn builtin() -> Self {
        use BlockCategory::*;
        Self::new(vec![
            BlockTemplate::new(
                "connect",
                "Connect",
                "Choose the sources your agents will use",
                "Link",
                "green",
                Start,
            ),
            BlockTemplate::new(
                "agent",
                "Agent",
                "Configure how agents act on data",
                "Robot",
                "blue",
                Agent,
            ),
            BlockTemplate::new(
                "send-email",
                "Send Email",
                "Draft and send automated emails",
                "Email",
                "white",
                Output,
            ),
            BlockTemplate::new(
                "create-report",
                "Create Report",
                "Turn insights into charts or reports",
                "Chart",
                "white",
                Output,
            ),
            BlockTemplate::new(
                "update-database",
                "Update Database",
                "Add or update records in your system",
                "Box",
                "white",
                Output,
            ),
            BlockTemplate::new(
                "create-ticket",
                "Create Ticket",
                "Escalate issues into support tickets",
                "Ticket",
                "white",
                Output,
            ),
            BlockTemplate::new(
                "web-search",
                "Web Search",
                "Look up pages and documentation for an agent",
                "Globe",
                "white",
                Tool,
            ),
            BlockTemplate::new(
                "code-interpreter",
                "Code Interpreter",
                "Run generated code and hand results to the next step",
                "Terminal",
                "white",
                Tool,
            )
            .agent_like(),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&BlockTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Templates of one category, in palette order.
    pub fn by_category(&self, category: BlockCategory) -> impl Iterator<Item = &BlockTemplate> {
        self.templates
            .iter()
            .filter(move |t| t.category == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
