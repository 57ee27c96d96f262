//! # Glassbox - Workflow Canvas Graph Model
//!
//! **Glassbox** is the model behind a visual AI workflow builder. Blocks are
//! dragged from a palette onto a canvas, agents are wired to the tools they
//! call and to the agents that follow them, and each agent is configured
//! into a deployment descriptor that external services turn into code.
//!
//! ## Core Workflow
//!
//! 1.  **Pick Templates**: The [`registry::Registry`] lists the palette blocks, grouped by category.
//! 2.  **Build the Graph**: Drop templates onto a [`canvas::CanvasModel`] and connect them. Tool blocks stack below their agent; downstream agents sit to its right.
//! 3.  **Configure**: Selecting a block opens a [`configure::FormSession`]. Agent forms produce a [`configure::DeploymentDescriptor`].
//! 4.  **Deploy**: The [`dispatch`] flows create a repository, submit agents and provision hosting through an [`dispatch::ActionDispatcher`].
//!
//! [`workspace::Workspace`] ties these together for a host UI.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glassbox::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let registry = Registry::builtin();
//!     let mut canvas = CanvasModel::new();
//!
//!     let agent_template = registry.get("agent").ok_or("no agent template")?;
//!     let email_template = registry.get("send-email").ok_or("no email template")?;
//!     let agent = canvas.place_block(agent_template, Position::new(400.0, 200.0)).id.clone();
//!     let email = canvas.place_block(email_template, Position::new(900.0, 600.0)).id.clone();
//!
//!     // The email block snaps into the agent's tool chain.
//!     canvas.try_connect(&agent, &email, ConnectionKind::AgentToTool)?;
//!     for block in canvas.derived_linear_order() {
//!         println!("{} at ({}, {})", block.title, block.position.x, block.position.y);
//!     }
//!
//!     let values = FormValues::new().with("nodeId", "scraper");
//!     let descriptor = DeploymentDescriptor::for_agent(&values, &agent);
//!     println!("{}", descriptor.to_json_pretty());
//!     Ok(())
//! }
//! ```

pub mod canvas;
pub mod configure;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod scenario;
pub mod settings;
pub mod workspace;
