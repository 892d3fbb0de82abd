use crate::block::{BasicBlock, BlockId};
use crate::function::FunctionBody;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    pub blocks: IndexMap<BlockId, BasicBlock>,
    pub edges: HashMap<BlockId, Vec<BlockId>>,
    pub reverse_edges: HashMap<BlockId, Vec<BlockId>>,
    pub entry: BlockId,
}

impl ControlFlowGraph {
    pub fn from_function(body: &FunctionBody) -> Self {
        let mut edges = HashMap::new();
        let mut reverse_edges = HashMap::new();

        for (block_id, block) in &body.blocks {
            let successors = block.terminator.successors();
            edges.insert(*block_id, successors.clone());

            for succ in successors {
                reverse_edges
                    .entry(succ)
                    .or_insert_with(Vec::new)
                    .push(*block_id);
            }
        }

        Self {
            blocks: body.blocks.clone(),
            edges,
            reverse_edges,
            entry: body.entry_block,
        }
    }

    pub fn predecessors(&self, block: BlockId) -> &[BlockId] {
        self.reverse_edges
            .get(&block)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn successors(&self, block: BlockId) -> &[BlockId] {
        self.edges.get(&block).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn is_reachable(&self, block: BlockId) -> bool {
        self.reachable_blocks().contains(&block)
    }

    pub fn reachable_blocks(&self) -> HashSet<BlockId> {
        self.reachable_from(self.entry, None)
    }

    /// Blocks reachable from `start` without passing through `avoid`.
    pub fn reachable_from(&self, start: BlockId, avoid: Option<BlockId>) -> HashSet<BlockId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        if Some(start) != avoid {
            queue.push_back(start);
        }

        while let Some(current) = queue.pop_front() {
            if visited.insert(current) {
                for &succ in self.successors(current) {
                    if Some(succ) != avoid {
                        queue.push_back(succ);
                    }
                }
            }
        }

        visited
    }

    pub fn exit_blocks(&self) -> Vec<BlockId> {
        self.blocks
            .values()
            .filter(|b| b.terminator.is_return())
            .map(|b| b.id)
            .collect()
    }

    /// Every path from the entry to `b` passes through `a`.
    pub fn dominates(&self, a: BlockId, b: BlockId) -> bool {
        if a == b {
            return true;
        }
        !self.reachable_from(self.entry, Some(a)).contains(&b)
    }

    /// Every path from `b` to a returning block passes through `a`.
    pub fn post_dominates(&self, a: BlockId, b: BlockId) -> bool {
        if a == b {
            return true;
        }
        let exits: HashSet<BlockId> = self.exit_blocks().into_iter().collect();
        self.reachable_from(b, Some(a))
            .iter()
            .all(|block| !exits.contains(block))
    }
}

#[derive(Debug, Clone)]
pub struct Loop {
    pub header: BlockId,
    pub blocks: HashSet<BlockId>,
    pub back_edges: Vec<(BlockId, BlockId)>,
    pub exits: HashSet<BlockId>,
}

#[derive(Debug, Clone)]
pub struct LoopAnalysis {
    pub loops: Vec<Loop>,
    pub loop_headers: HashSet<BlockId>,
    pub loop_depth: HashMap<BlockId, usize>,
}

impl LoopAnalysis {
    pub fn from_cfg(cfg: &ControlFlowGraph) -> Self {
        let reachable = cfg.reachable_blocks();
        let mut back_edges = Vec::new();
        let mut loop_headers = HashSet::new();

        for (&block, successors) in &cfg.edges {
            if !reachable.contains(&block) {
                continue;
            }
            for &succ in successors {
                if cfg.dominates(succ, block) {
                    back_edges.push((block, succ));
                    loop_headers.insert(succ);
                }
            }
        }
        back_edges.sort();

        let mut loops = Vec::new();
        for (tail, header) in back_edges {
            let mut loop_blocks = HashSet::from([header]);
            let mut queue = VecDeque::from([tail]);

            while let Some(block) = queue.pop_front() {
                if loop_blocks.insert(block) {
                    for &pred in cfg.predecessors(block) {
                        queue.push_back(pred);
                    }
                }
            }

            let exits = loop_blocks
                .iter()
                .flat_map(|&block| cfg.successors(block).iter().copied())
                .filter(|succ| !loop_blocks.contains(succ))
                .collect();

            loops.push(Loop {
                header,
                blocks: loop_blocks,
                back_edges: vec![(tail, header)],
                exits,
            });
        }

        let mut loop_depth = HashMap::new();
        for loop_info in &loops {
            for &block in &loop_info.blocks {
                *loop_depth.entry(block).or_insert(0) += 1;
            }
        }

        Self {
            loops,
            loop_headers,
            loop_depth,
        }
    }

    pub fn is_in_loop(&self, block: BlockId) -> bool {
        self.loop_depth.contains_key(&block)
    }

    pub fn get_loop_depth(&self, block: BlockId) -> usize {
        self.loop_depth.get(&block).cloned().unwrap_or(0)
    }
}
