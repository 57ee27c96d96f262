use super::block::{BlockId, BlockInstance, Connection};
use super::geometry::{COLUMN_TOLERANCE, Segment};
use super::model::CanvasModel;
use itertools::Itertools;
use serde::Serialize;
use std::iter;

/// A serializable picture of the canvas, with the derived linear order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSnapshot {
    pub blocks: Vec<BlockInstance>,
    pub connections: Vec<Connection>,
    pub linear_order: Vec<BlockId>,
}

impl CanvasModel {
    /// Left-to-right reading order of every placed block.
    ///
    /// Blocks are swept by ascending x. A block within `COLUMN_TOLERANCE` of
    /// the first block of the current column joins that column, and each
    /// column is read top to bottom. This ignores declared connections.
    pub fn derived_linear_order(&self) -> Vec<&BlockInstance> {
        let mut by_x: Vec<&BlockInstance> = self.blocks.iter().collect();
        by_x.sort_by(|a, b| {
            a.position
                .x
                .total_cmp(&b.position.x)
                .then(a.position.y.total_cmp(&b.position.y))
        });

        let mut ordered = Vec::with_capacity(by_x.len());
        let mut column: Vec<&BlockInstance> = Vec::new();
        for block in by_x {
            let starts_column = column
                .first()
                .is_some_and(|head| block.position.x - head.position.x > COLUMN_TOLERANCE);
            if starts_column {
                column.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
                ordered.append(&mut column);
            }
            column.push(block);
        }
        column.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
        ordered.append(&mut column);
        ordered
    }

    /// Centre-to-centre arrows between consecutive blocks of the linear order.
    pub fn progress_arrows(&self) -> Vec<Segment> {
        self.derived_linear_order()
            .into_iter()
            .tuple_windows()
            .map(|(a, b)| Segment {
                from: a.center(),
                to: b.center(),
            })
            .collect()
    }

    /// Connector lines from an agent down through its tool chain.
    pub fn chain_connectors(&self, agent_id: &str) -> Vec<Segment> {
        let Some(agent) = self.block(agent_id) else {
            return Vec::new();
        };
        iter::once(agent)
            .chain(self.tool_chain_of(agent_id))
            .tuple_windows()
            .map(|(upper, lower)| Segment {
                from: upper.center(),
                to: lower.center(),
            })
            .collect()
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            blocks: self.blocks.clone(),
            connections: self.connections.clone(),
            linear_order: self
                .derived_linear_order()
                .into_iter()
                .map(|b| b.id.clone())
                .collect(),
        }
    }
}
