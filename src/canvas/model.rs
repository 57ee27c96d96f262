use super::block::{BlockId, BlockInstance, Connection, ConnectionKind};
use super::geometry::{AGENT_SPACING, Position, TOOL_CHAIN_SPACING};
use crate::error::ConnectionError;
use crate::registry::BlockTemplate;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the millisecond stamps used in block ids.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall-clock stamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl<F> Clock for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn now_millis(&self) -> u64 {
        self()
    }
}

/// The authoritative set of placed blocks and the connections between them.
///
/// Every mutation goes through this type. Operations never fail on bad input:
/// unknown ids and invalid connections leave the model untouched.
pub struct CanvasModel {
    pub(super) blocks: Vec<BlockInstance>,
    pub(super) connections: Vec<Connection>,
    clock: Box<dyn Clock>,
    last_stamp: Option<u64>,
}

impl fmt::Debug for CanvasModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasModel")
            .field("blocks", &self.blocks)
            .field("connections", &self.connections)
            .finish_non_exhaustive()
    }
}

impl Default for CanvasModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasModel {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            blocks: Vec::new(),
            connections: Vec::new(),
            clock: Box::new(clock),
            last_stamp: None,
        }
    }

    pub fn blocks(&self) -> &[BlockInstance] {
        &self.blocks
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn block(&self, id: &str) -> Option<&BlockInstance> {
        self.blocks.iter().find(|b| b.id.as_str() == id)
    }

    pub fn selected(&self) -> Option<&BlockInstance> {
        self.blocks.iter().find(|b| b.selected)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub(super) fn index_of(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id.as_str() == id)
    }

    /// The agent holding `id` in its tool chain, if any.
    pub fn parent_of(&self, id: &str) -> Option<&BlockId> {
        self.connections
            .iter()
            .find(|c| c.kind == ConnectionKind::AgentToTool && c.to.as_str() == id)
            .map(|c| &c.from)
    }

    fn next_id(&mut self, template_id: &str) -> BlockId {
        let now = self.clock.now_millis();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last_stamp = Some(stamp);
        BlockId::new(format!("{}-{}", template_id, stamp))
    }

    /// Places a new block so that `drop_point` lands on its centre.
    pub fn place_block(&mut self, template: &BlockTemplate, drop_point: Position) -> &BlockInstance {
        let id = self.next_id(&template.id);
        let position = drop_point.centered_block_origin();
        log::debug!("Placing '{}' at ({}, {})", id, position.x, position.y);
        self.blocks
            .push(BlockInstance::from_template(template, id, position));
        &self.blocks[self.blocks.len() - 1]
    }

    /// Marks `id` as the only selected block and returns it.
    ///
    /// An unknown id leaves the current selection as it is.
    pub fn select_block(&mut self, id: &str) -> Option<&BlockInstance> {
        let index = self.index_of(id)?;
        for (i, block) in self.blocks.iter_mut().enumerate() {
            block.selected = i == index;
        }
        Some(&self.blocks[index])
    }

    /// Moves a block towards `to`, dragging its group along.
    ///
    /// The target is clamped to non-negative coordinates and the whole group
    /// translates by the same delta. Returns `false` for an unknown id.
    pub fn move_block(&mut self, id: &str, to: Position) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let delta = to.clamped() - self.blocks[index].position;
        let group = self.drag_group(index);
        let delta = self.limit_delta(&group, delta);
        self.translate(&group, delta);
        true
    }

    /// Shrinks `delta` so that no member on the canvas is pushed past its
    /// top or left edge. Members already off-canvas do not constrain it.
    fn limit_delta(&self, indices: &[usize], delta: Position) -> Position {
        let (mut dx, mut dy) = (delta.x, delta.y);
        for &member in indices {
            let p = self.blocks[member].position;
            if p.x >= 0.0 {
                dx = dx.max(-p.x);
            }
            if p.y >= 0.0 {
                dy = dy.max(-p.y);
            }
        }
        Position::new(dx, dy)
    }

    /// Indices of the blocks that move together when `index` is dragged.
    fn drag_group(&self, index: usize) -> Vec<usize> {
        let block = &self.blocks[index];
        let anchor = if block.is_agent_capable() {
            Some(index)
        } else {
            self.parent_of(&block.id).and_then(|p| self.index_of(p))
        };

        let mut group = vec![index];
        if let Some(anchor) = anchor {
            if anchor != index {
                group.push(anchor);
            }
            let anchor_id = self.blocks[anchor].id.as_str();
            group.extend(
                self.connected_indices(anchor_id)
                    .into_iter()
                    .filter(|&i| i != index),
            );
        }
        group
    }

    pub(super) fn translate(&mut self, indices: &[usize], delta: Position) {
        for &i in indices {
            let block = &mut self.blocks[i];
            block.position = block.position + delta;
        }
    }

    /// Connects two blocks, or does nothing if the connection is not allowed.
    pub fn connect(&mut self, from: &str, to: &str, kind: ConnectionKind) -> Option<&Connection> {
        match self.try_connect(from, to, kind) {
            Ok(connection) => Some(connection),
            Err(reason) => {
                log::debug!("Declined connection: {}", reason);
                None
            }
        }
    }

    /// Connects two blocks and lays the target out next to its source.
    ///
    /// Agent-to-tool targets stack below the source's tool chain; agent-to-agent
    /// targets sit to the right of the source. The target's own connected set
    /// follows it, but never past the top or left edge of the canvas.
    pub fn try_connect(
        &mut self,
        from: &str,
        to: &str,
        kind: ConnectionKind,
    ) -> Result<&Connection, ConnectionError> {
        let source_index = self
            .index_of(from)
            .ok_or_else(|| ConnectionError::UnknownBlock(from.into()))?;
        let target_index = self
            .index_of(to)
            .ok_or_else(|| ConnectionError::UnknownBlock(to.into()))?;
        if source_index == target_index {
            return Err(ConnectionError::SelfLoop(from.into()));
        }

        let source = &self.blocks[source_index];
        let target = &self.blocks[target_index];
        if !source.is_agent_capable() {
            return Err(ConnectionError::InvalidSource {
                block_id: source.id.clone(),
                kind,
            });
        }
        let target_fits = match kind {
            ConnectionKind::AgentToTool => target.is_tool(),
            ConnectionKind::AgentToAgent => target.is_agent_capable(),
        };
        if !target_fits {
            return Err(ConnectionError::InvalidTarget {
                block_id: target.id.clone(),
                kind,
            });
        }
        if self
            .connections
            .iter()
            .any(|c| c.kind == kind && c.from.as_str() == from && c.to.as_str() == to)
        {
            return Err(ConnectionError::Duplicate {
                from: from.into(),
                to: to.into(),
                kind,
            });
        }
        if kind == ConnectionKind::AgentToTool {
            if let Some(parent) = self.parent_of(to) {
                return Err(ConnectionError::TargetAlreadyParented {
                    target: to.into(),
                    parent: parent.clone(),
                });
            }
        }

        let origin = source.position;
        let slot = match kind {
            ConnectionKind::AgentToTool => {
                let base = self
                    .tool_chain_of(from)
                    .last()
                    .map_or(origin.y, |tail| tail.position.y);
                Position::new(origin.x, base + TOOL_CHAIN_SPACING)
            }
            ConnectionKind::AgentToAgent => Position::new(origin.x + AGENT_SPACING, origin.y),
        };

        // Whatever already hangs off the source stays put, even if the
        // target can reach it.
        let anchored = self.connected_indices(from);
        let delta = slot - self.blocks[target_index].position;
        let followers: Vec<usize> = self
            .connected_indices(to)
            .into_iter()
            .filter(|i| *i != source_index && *i != target_index && !anchored.contains(i))
            .collect();
        let follower_delta = self.limit_delta(&followers, delta);
        self.translate(&[target_index], delta);
        self.translate(&followers, follower_delta);

        log::debug!("Connected '{}' -> '{}' ({})", from, to, kind);
        self.connections
            .push(Connection::new(from.into(), to.into(), kind));
        Ok(&self.connections[self.connections.len() - 1])
    }

    /// Removes a block and every connection touching it.
    pub fn remove_block(&mut self, id: &str) -> Option<BlockInstance> {
        let index = self.index_of(id)?;
        let removed = self.blocks.remove(index);
        let before = self.connections.len();
        self.connections.retain(|c| !c.touches(id));
        log::debug!(
            "Removed '{}' and {} dependent connection(s)",
            id,
            before - self.connections.len()
        );
        Some(removed)
    }

    /// Removes a single connection. Block positions are left where they are.
    pub fn remove_connection(&mut self, from: &str, to: &str, kind: ConnectionKind) -> bool {
        let before = self.connections.len();
        self.connections
            .retain(|c| !(c.kind == kind && c.from.as_str() == from && c.to.as_str() == to));
        before != self.connections.len()
    }
}
