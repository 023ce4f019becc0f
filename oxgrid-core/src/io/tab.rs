//! LAST tabular input shape: a digit-leading line whose fields 1-5 and 6-10
//! describe the two sides, with field 11 a comma list encoding the gapless
//! blocks (`size` items) and the gaps between them (`gap1:gap2` items).

use crate::types::{Block, Bp};

use super::{aa_to_nt_factors, AlignmentRecord};

struct TabSide {
    name: String,
    seq_len: Bp,
    aln_beg: Bp,
    is_translated: bool,
}

fn parse_side(block_sum: Bp, fields: &[&str]) -> Option<TabSide> {
    let mut aln_beg = fields[1].parse::<Bp>().ok()?;
    let span = fields[2].parse::<Bp>().ok()?;
    let seq_len = fields[4].parse::<Bp>().ok()?;
    if fields[3] == "-" {
        aln_beg -= seq_len;
    }
    Some(TabSide {
        name: fields[0].to_string(),
        seq_len,
        aln_beg,
        // Fewer aligned letters than the declared span: translated DNA.
        is_translated: block_sum < span,
    })
}

/// Expand the size/gap item list into gapless blocks. The accumulators stay
/// in each side's own units; emitted positions and sizes are rescaled so
/// both axes are nucleotide-equivalent.
fn expand_blocks(items: &[Vec<Bp>], side1: &TabSide, side2: &TabSide) -> Vec<Block> {
    let (size_mul, mul1, mul2) = aa_to_nt_factors(side1.is_translated, side2.is_translated);
    let mut beg1 = side1.aln_beg;
    let mut beg2 = side2.aln_beg;
    let mut blocks = Vec::new();
    for item in items {
        if item.len() > 1 {
            beg1 += item[0];
            beg2 += item[1];
        } else {
            let size = item[0];
            blocks.push(Block::new(beg1 * mul1, beg2 * mul2, size * size_mul));
            beg1 += size * mul2;
            beg2 += size * mul1;
        }
    }
    blocks
}

pub fn parse_line(fields: &[&str]) -> Option<AlignmentRecord> {
    if fields.len() < 12 {
        return None;
    }
    let items: Vec<Vec<Bp>> = fields[11]
        .split(',')
        .map(|item| item.split(':').map(|t| t.parse::<Bp>().ok()).collect())
        .collect::<Option<_>>()?;
    if items.is_empty() {
        return None;
    }
    let block_sum1: Bp = items.iter().map(|i| i[0]).sum();
    let block_sum2: Bp = items.iter().map(|i| i[i.len() - 1]).sum();

    let side1 = parse_side(block_sum1, &fields[1..6])?;
    let side2 = parse_side(block_sum2, &fields[6..11])?;
    let (_, mul1, mul2) = aa_to_nt_factors(side1.is_translated, side2.is_translated);

    Some(AlignmentRecord {
        seq_name1: side1.name.clone(),
        seq_len1: side1.seq_len * mul1,
        seq_name2: side2.name.clone(),
        seq_len2: side2.seq_len * mul2,
        blocks: expand_blocks(&items, &side1, &side2),
    })
}
