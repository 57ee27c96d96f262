use super::block::{BlockInstance, ConnectionKind};
use super::model::CanvasModel;
use ahash::AHashSet;
use std::collections::VecDeque;

impl CanvasModel {
    /// Tool blocks attached to `agent_id`, top to bottom.
    pub fn tool_chain_of(&self, agent_id: &str) -> Vec<&BlockInstance> {
        let mut chain: Vec<&BlockInstance> = self
            .connections
            .iter()
            .filter(|c| c.kind == ConnectionKind::AgentToTool && c.from.as_str() == agent_id)
            .filter_map(|c| self.block(&c.to))
            .collect();
        chain.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
        chain
    }

    /// Every block that follows `block_id` when it is dragged.
    ///
    /// Walks outgoing edges only: the tool chain and downstream agents, then
    /// their chains and agents in turn. Upstream agents are never included,
    /// nor is `block_id` itself.
    pub fn connected_set_of(&self, block_id: &str) -> Vec<&BlockInstance> {
        self.connected_indices(block_id)
            .into_iter()
            .map(|i| &self.blocks[i])
            .collect()
    }

    pub(super) fn connected_indices(&self, block_id: &str) -> Vec<usize> {
        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        let mut found = Vec::new();

        visited.insert(block_id);
        queue.push_back(block_id);

        while let Some(current) = queue.pop_front() {
            for connection in self.connections.iter().filter(|c| c.from.as_str() == current) {
                let next = connection.to.as_str();
                if !visited.insert(next) {
                    continue;
                }
                if let Some(index) = self.index_of(next) {
                    found.push(index);
                }
                queue.push_back(next);
            }
        }
        found
    }
}
