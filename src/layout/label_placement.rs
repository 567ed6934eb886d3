// Label placement along the dial's arc. Labels live on a ring, so collision
// avoidance is one-dimensional in angle: overlapping runs of labels are moved
// as a block, centered on where their members want to be.

const SEPARATION_EPS: f64 = 1e-9;

/// Angular width of a label drawn tangentially at `radius`, in degrees.
pub(crate) fn angular_width(text_width: f64, radius: f64, padding: f64) -> f64 {
    if radius <= 0.0 {
        return 0.0;
    }
    ((text_width + padding) / radius).to_degrees()
}

#[derive(Debug)]
struct Block {
    members: Vec<usize>,
    offsets: Vec<f64>,
    start: f64,
}

impl Block {
    fn single(idx: usize, desired: f64) -> Self {
        Self {
            members: vec![idx],
            offsets: vec![0.0],
            start: desired,
        }
    }

    fn first(&self) -> usize {
        self.members[0]
    }

    fn last(&self) -> usize {
        self.members[self.members.len() - 1]
    }

    fn end(&self) -> f64 {
        self.start + self.offsets[self.offsets.len() - 1]
    }

    fn absorb(&mut self, other: Block, link: f64, desired: &[f64]) {
        let base = self.offsets[self.offsets.len() - 1] + link;
        self.members.extend(other.members);
        self.offsets.extend(other.offsets.into_iter().map(|o| base + o));
        // Least-squares placement: the block sits at the mean of what its
        // members asked for.
        let sum: f64 = self
            .members
            .iter()
            .zip(&self.offsets)
            .map(|(&idx, offset)| desired[idx] - offset)
            .sum();
        self.start = sum / self.members.len() as f64;
    }
}

/// Spread label angles so that neighbours are at least
/// `max(min_gap, (width_a + width_b) / 2)` apart. Labels that already clear
/// each other keep their desired angle. Returns angles in input order.
pub(crate) fn spread_angles(desired: &[f64], widths: &[f64], min_gap: f64) -> Vec<f64> {
    let n = desired.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| desired[a].total_cmp(&desired[b]).then(a.cmp(&b)));
    let gap = |a: usize, b: usize| {
        let wa = widths.get(a).copied().unwrap_or(0.0);
        let wb = widths.get(b).copied().unwrap_or(0.0);
        ((wa + wb) / 2.0).max(min_gap)
    };

    let mut blocks: Vec<Block> = Vec::with_capacity(n);
    for idx in order {
        let mut block = Block::single(idx, desired[idx]);
        while let Some(mut prev) = blocks.pop() {
            let link = gap(prev.last(), block.first());
            if block.start - prev.end() >= link - SEPARATION_EPS {
                blocks.push(prev);
                break;
            }
            prev.absorb(block, link, desired);
            block = prev;
        }
        blocks.push(block);
    }

    let mut resolved = vec![0.0; n];
    for block in blocks {
        for (idx, offset) in block.members.iter().zip(&block.offsets) {
            resolved[*idx] = block.start + offset;
        }
    }
    resolved
}
